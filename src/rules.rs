// 🏷️ Category suggestion rules - rules as data
//
// A description like "Uber to airport" suggests "Transport". Rules are a
// priority-ordered list that can be loaded from JSON, so new keywords do not
// need code changes.

use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionRule {
    /// Rule ID for tracking
    pub id: String,

    /// Pattern to match anywhere in the text; `*` stands for any run of characters
    pub pattern: String,

    /// Category to suggest
    pub category: String,

    /// Priority (higher = tried first)
    #[serde(default)]
    pub priority: i32,
}

impl SuggestionRule {
    pub fn new(id: &str, pattern: &str, category: &str, priority: i32) -> Self {
        SuggestionRule {
            id: id.to_string(),
            pattern: pattern.to_string(),
            category: category.to_string(),
            priority,
        }
    }

    /// Case-insensitive match against free text
    pub fn matches(&self, text: &str) -> bool {
        let pattern = self.pattern.to_lowercase();
        let text = text.to_lowercase();

        if pattern.is_empty() {
            return false;
        }
        if !pattern.contains('*') {
            return text.contains(&pattern);
        }

        // Each piece must appear, in order, anywhere in the text
        let mut pos = 0;
        for part in pattern.split('*').filter(|p| !p.is_empty()) {
            match text[pos..].find(part) {
                Some(found) => pos += found + part.len(),
                None => return false,
            }
        }

        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub category: String,
    pub rule_id: String,
}

// ============================================================================
// RULE LIST
// ============================================================================

#[derive(Debug, Clone)]
pub struct SuggestionRules {
    rules: Vec<SuggestionRule>,
}

impl SuggestionRules {
    pub fn new() -> Self {
        SuggestionRules { rules: Vec::new() }
    }

    /// Built-in keyword heuristics
    pub fn with_defaults() -> Self {
        SuggestionRules::from_rules(vec![
            SuggestionRule::new("food-lunch", "lunch", "Food", 10),
            SuggestionRule::new("food-dinner", "dinner", "Food", 10),
            SuggestionRule::new("food-breakfast", "breakfast", "Food", 10),
            SuggestionRule::new("food-grocery", "grocer", "Food", 5),
            SuggestionRule::new("transport-uber", "uber", "Transport", 10),
            SuggestionRule::new("transport-taxi", "taxi", "Transport", 10),
            SuggestionRule::new("transport-bus", "bus", "Transport", 5),
            SuggestionRule::new("transport-fuel", "fuel", "Transport", 5),
            SuggestionRule::new("housing-rent", "rent", "Housing", 10),
            SuggestionRule::new("fun-movie", "movie", "Entertainment", 10),
            SuggestionRule::new("fun-netflix", "netflix", "Entertainment", 10),
            SuggestionRule::new("utilities-electric", "electric*bill", "Utilities", 20),
            SuggestionRule::new("utilities-water", "water bill", "Utilities", 20),
        ])
    }

    /// Load rules from a JSON array file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;

        let rules: Vec<SuggestionRule> = serde_json::from_str(&content).map_err(|e| {
            TrackerError::Rules(format!("{}: {}", path.as_ref().display(), e))
        })?;

        debug!(count = rules.len(), "loaded suggestion rules");
        Ok(SuggestionRules::from_rules(rules))
    }

    pub fn from_rules(mut rules: Vec<SuggestionRule>) -> Self {
        // Stable sort keeps file order among equal priorities
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        SuggestionRules { rules }
    }

    pub fn add_rule(&mut self, rule: SuggestionRule) {
        self.rules.push(rule);
        self.rules.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// First matching rule, by priority
    pub fn suggest(&self, description: &str) -> Option<Suggestion> {
        self.rules.iter().find(|r| r.matches(description)).map(|r| Suggestion {
            category: r.category.clone(),
            rule_id: r.id.clone(),
        })
    }

    /// Like `suggest`, but only rules whose category is in `known`
    pub fn suggest_from(&self, description: &str, known: &[String]) -> Option<Suggestion> {
        self.rules
            .iter()
            .filter(|r| known.iter().any(|k| k == &r.category))
            .find(|r| r.matches(description))
            .map(|r| Suggestion {
                category: r.category.clone(),
                rule_id: r.id.clone(),
            })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for SuggestionRules {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_substring_match() {
        let rule = SuggestionRule::new("t1", "Lunch", "Food", 0);

        assert!(rule.matches("team lunch"));
        assert!(rule.matches("LUNCH"));
        assert!(!rule.matches("dinner"));
    }

    #[test]
    fn test_wildcard_match() {
        let rule = SuggestionRule::new("t2", "electric*bill", "Utilities", 0);

        assert!(rule.matches("Electricity bill"));
        assert!(rule.matches("electric company bill"));
        assert!(rule.matches("Electricity bill March"));
        assert!(rule.matches("paid the electric bill"));
        assert!(!rule.matches("bill for electric"));
        assert!(!rule.matches("electric"));

        let middle = SuggestionRule::new("t3", "a*b*c", "X", 0);
        assert!(middle.matches("axxbyyc"));
        assert!(!middle.matches("axxcyyb"));
    }

    #[test]
    fn test_default_rules() {
        let rules = SuggestionRules::with_defaults();

        assert_eq!(rules.suggest("Uber to airport").unwrap().category, "Transport");
        assert_eq!(rules.suggest("lunch with Sam").unwrap().category, "Food");
        assert_eq!(rules.suggest("Electricity bill March").unwrap().category, "Utilities");
        assert!(rules.suggest("birthday present").is_none());
    }

    #[test]
    fn test_priority_wins() {
        let mut rules = SuggestionRules::new();
        rules.add_rule(SuggestionRule::new("general", "coffee", "Food", 1));
        rules.add_rule(SuggestionRule::new("specific", "coffee beans", "Groceries", 50));

        let s = rules.suggest("coffee beans 1kg").unwrap();
        assert_eq!(s.category, "Groceries");
        assert_eq!(s.rule_id, "specific");
    }

    #[test]
    fn test_suggest_only_known_categories() {
        let rules = SuggestionRules::with_defaults();
        let known = vec!["Food".to_string()];

        assert!(rules.suggest_from("taxi home", &known).is_none());
        assert_eq!(rules.suggest_from("taxi lunch", &known).unwrap().category, "Food");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": "gym", "pattern": "gym", "category": "Health", "priority": 3}},
                {{"id": "pharmacy", "pattern": "pharma*", "category": "Health"}}
            ]"#
        )
        .unwrap();

        let rules = SuggestionRules::from_file(file.path()).unwrap();
        assert_eq!(rules.rule_count(), 2);
        assert_eq!(rules.suggest("Pharmacy run").unwrap().rule_id, "pharmacy");
    }

    #[test]
    fn test_load_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            SuggestionRules::from_file(file.path()),
            Err(TrackerError::Rules(_))
        ));
    }
}
