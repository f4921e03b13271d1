// 📊 Reporting Engine - derived views over the ledger
//
// Pure reads: nothing here writes to the database. Every report over an empty
// ledger comes back as `Outcome::NoData` rather than an empty table.

use crate::auth::Session;
use crate::entities::Expense;
use crate::error::{Outcome, Result};
use crate::ledger::list_expenses;
use chrono::Datelike;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

// ============================================================================
// MONTH KEY
// ============================================================================

/// Calendar month; orders chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        YearMonth { year, month }
    }

    pub fn of(expense: &Expense) -> Self {
        YearMonth::new(expense.date.year(), expense.date.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ============================================================================
// MONTHLY BY CATEGORY
// ============================================================================

/// Dense month x category table of summed amounts.
///
/// Months are chronological, categories alphabetical; any (month, category)
/// pair without expenses reads as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotals {
    pub months: Vec<YearMonth>,
    pub categories: Vec<String>,
    amounts: HashMap<(YearMonth, String), f64>,
}

impl MonthlyTotals {
    pub fn get(&self, month: YearMonth, category: &str) -> f64 {
        self.amounts
            .get(&(month, category.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// One row per month, one value per category (zero filled)
    pub fn rows(&self) -> Vec<(YearMonth, Vec<f64>)> {
        self.months
            .iter()
            .map(|m| {
                let values = self.categories.iter().map(|c| self.get(*m, c)).collect();
                (*m, values)
            })
            .collect()
    }

    pub fn month_total(&self, month: YearMonth) -> f64 {
        self.categories.iter().map(|c| self.get(month, c)).sum()
    }

    pub fn grand_total(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// Sparse view: only pairs that actually have expenses
    pub fn to_nested(&self) -> BTreeMap<YearMonth, BTreeMap<String, f64>> {
        let mut nested: BTreeMap<YearMonth, BTreeMap<String, f64>> = BTreeMap::new();
        for ((month, category), amount) in &self.amounts {
            nested
                .entry(*month)
                .or_default()
                .insert(category.clone(), *amount);
        }
        nested
    }
}

pub fn monthly_totals_from(expenses: &[Expense]) -> Outcome<MonthlyTotals> {
    if expenses.is_empty() {
        return Outcome::NoData;
    }

    let mut months = BTreeSet::new();
    let mut categories = BTreeSet::new();
    let mut amounts: HashMap<(YearMonth, String), f64> = HashMap::new();

    for e in expenses {
        let month = YearMonth::of(e);
        months.insert(month);
        categories.insert(e.category.clone());
        *amounts.entry((month, e.category.clone())).or_insert(0.0) += e.amount;
    }

    Outcome::Data(MonthlyTotals {
        months: months.into_iter().collect(),
        categories: categories.into_iter().collect(),
        amounts,
    })
}

pub fn monthly_totals(conn: &Connection, session: &Session) -> Result<Outcome<MonthlyTotals>> {
    let expenses = list_expenses(conn, session)?;
    Ok(monthly_totals_from(&expenses))
}

// ============================================================================
// MONTHLY SPENDING (all categories)
// ============================================================================

pub fn monthly_spending_from(expenses: &[Expense]) -> Outcome<Vec<(YearMonth, f64)>> {
    if expenses.is_empty() {
        return Outcome::NoData;
    }

    let mut by_month: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for e in expenses {
        *by_month.entry(YearMonth::of(e)).or_insert(0.0) += e.amount;
    }

    Outcome::Data(by_month.into_iter().collect())
}

pub fn monthly_spending(
    conn: &Connection,
    session: &Session,
) -> Result<Outcome<Vec<(YearMonth, f64)>>> {
    let expenses = list_expenses(conn, session)?;
    Ok(monthly_spending_from(&expenses))
}

// ============================================================================
// CATEGORY TOTALS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    /// Fraction of overall spending, 0.0..=1.0
    pub share: f64,
}

/// Per-category sums, largest first. Zero totals are left out.
pub fn category_totals_from(expenses: &[Expense]) -> Outcome<Vec<CategoryTotal>> {
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for e in expenses {
        *sums.entry(e.category.as_str()).or_insert(0.0) += e.amount;
    }
    sums.retain(|_, total| *total > 0.0);

    if sums.is_empty() {
        return Outcome::NoData;
    }

    let overall: f64 = sums.values().sum();
    let mut totals: Vec<CategoryTotal> = sums
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
            share: total / overall,
        })
        .collect();

    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    Outcome::Data(totals)
}

pub fn category_totals(conn: &Connection, session: &Session) -> Result<Outcome<Vec<CategoryTotal>>> {
    let expenses = list_expenses(conn, session)?;
    Ok(category_totals_from(&expenses))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tests::session_for;
    use crate::db::open_in_memory;
    use crate::entities::{add_category, NewExpense};
    use crate::ledger::{record_expense, total_spent};

    fn setup() -> (Connection, Session) {
        let conn = open_in_memory().unwrap();
        let session = session_for(&conn, "alice");
        add_category(&conn, &session, "Food").unwrap();
        add_category(&conn, &session, "Transport").unwrap();
        add_category(&conn, &session, "Gifts").unwrap();
        (conn, session)
    }

    fn record(conn: &Connection, session: &Session, date: &str, category: &str, amount: &str) {
        record_expense(conn, session, &NewExpense::new(date, category, amount, "")).unwrap();
    }

    #[test]
    fn test_food_scenario() {
        let (conn, session) = setup();
        record_expense(
            &conn,
            &session,
            &NewExpense::new("2024-01-05", "Food", "12.50", "lunch"),
        )
        .unwrap();

        assert_eq!(total_spent(&conn, &session).unwrap(), 12.5);

        let totals = category_totals(&conn, &session).unwrap().into_data().unwrap();
        assert_eq!(
            totals,
            vec![CategoryTotal {
                category: "Food".to_string(),
                total: 12.5,
                share: 1.0,
            }]
        );
    }

    #[test]
    fn test_two_month_scenario() {
        let (conn, session) = setup();
        record(&conn, &session, "2024-01-10", "Food", "10");
        record(&conn, &session, "2024-02-01", "Food", "20");

        let report = monthly_totals(&conn, &session).unwrap().into_data().unwrap();

        let expected: BTreeMap<YearMonth, BTreeMap<String, f64>> = BTreeMap::from([
            (YearMonth::new(2024, 1), BTreeMap::from([("Food".to_string(), 10.0)])),
            (YearMonth::new(2024, 2), BTreeMap::from([("Food".to_string(), 20.0)])),
        ]);
        assert_eq!(report.to_nested(), expected);
        assert_eq!(report.months[0].to_string(), "2024-01");

        println!("✅ Two-month report test PASSED");
    }

    #[test]
    fn test_dense_table_is_zero_filled() {
        let (conn, session) = setup();
        record(&conn, &session, "2024-03-02", "Transport", "4");
        record(&conn, &session, "2024-01-10", "Food", "10");
        record(&conn, &session, "2024-01-11", "Food", "5");

        let report = monthly_totals(&conn, &session).unwrap().into_data().unwrap();

        assert_eq!(report.months, vec![YearMonth::new(2024, 1), YearMonth::new(2024, 3)]);
        assert_eq!(report.categories, vec!["Food", "Transport"]);
        assert_eq!(
            report.rows(),
            vec![
                (YearMonth::new(2024, 1), vec![15.0, 0.0]),
                (YearMonth::new(2024, 3), vec![0.0, 4.0]),
            ]
        );
        assert_eq!(report.month_total(YearMonth::new(2024, 1)), 15.0);
    }

    #[test]
    fn test_monthly_sum_equals_total_spent() {
        let (conn, session) = setup();
        record(&conn, &session, "2023-12-31", "Gifts", "40.25");
        record(&conn, &session, "2024-01-01", "Food", "3.5");
        record(&conn, &session, "2024-01-15", "Transport", "12");
        record(&conn, &session, "2024-02-29", "Food", "7.75");

        let report = monthly_totals(&conn, &session).unwrap().into_data().unwrap();
        let from_rows: f64 = report.rows().iter().flat_map(|(_, v)| v.iter()).sum();

        let total = total_spent(&conn, &session).unwrap();
        assert!((report.grand_total() - total).abs() < 1e-9);
        assert!((from_rows - total).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_spending() {
        let (conn, session) = setup();
        record(&conn, &session, "2024-02-01", "Food", "20");
        record(&conn, &session, "2024-01-10", "Food", "10");
        record(&conn, &session, "2024-01-12", "Transport", "5");

        let spending = monthly_spending(&conn, &session).unwrap().into_data().unwrap();
        assert_eq!(
            spending,
            vec![(YearMonth::new(2024, 1), 15.0), (YearMonth::new(2024, 2), 20.0)]
        );
    }

    #[test]
    fn test_category_totals_sorted_and_zero_omitted() {
        let (conn, session) = setup();
        record(&conn, &session, "2024-01-01", "Food", "10");
        record(&conn, &session, "2024-01-02", "Transport", "30");
        record(&conn, &session, "2024-01-03", "Gifts", "0");

        let totals = category_totals(&conn, &session).unwrap().into_data().unwrap();

        let names: Vec<&str> = totals.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(names, vec!["Transport", "Food"]);
        assert_eq!(totals[0].share, 0.75);
        assert_eq!(totals[1].share, 0.25);
    }

    #[test]
    fn test_empty_ledger_is_no_data() {
        let (conn, session) = setup();

        assert!(monthly_totals(&conn, &session).unwrap().is_no_data());
        assert!(monthly_spending(&conn, &session).unwrap().is_no_data());
        assert!(category_totals(&conn, &session).unwrap().is_no_data());
    }

    #[test]
    fn test_only_zero_amounts_is_no_data_for_categories() {
        let (conn, session) = setup();
        record(&conn, &session, "2024-01-03", "Gifts", "0");

        assert!(category_totals(&conn, &session).unwrap().is_no_data());
        // The dense table still has a row for the month
        assert!(!monthly_totals(&conn, &session).unwrap().is_no_data());
    }
}
