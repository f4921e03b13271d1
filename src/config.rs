// ⚙️ Runtime configuration and logging setup

use crate::cli::Cli;
use crate::error::{Result, TrackerError};
use crate::rules::SuggestionRules;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "expense_tracker=info";
const VERBOSE_LOG_FILTER: &str = "expense_tracker=debug";

/// Settings resolved from flags and environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub rules_path: Option<PathBuf>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub verbose: bool,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        AppConfig {
            db_path: cli.db.clone(),
            rules_path: cli.rules.clone(),
            username: cli.username.clone(),
            password: cli.password.clone(),
            verbose: cli.verbose,
        }
    }

    /// Rules file if configured, built-in rules otherwise
    pub fn load_rules(&self) -> Result<SuggestionRules> {
        match &self.rules_path {
            Some(path) => SuggestionRules::from_file(path),
            None => Ok(SuggestionRules::with_defaults()),
        }
    }

    /// Both credentials, or `NotAuthenticated`
    pub fn credentials(&self) -> Result<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.trim().is_empty() => Ok((u, p)),
            _ => Err(TrackerError::NotAuthenticated),
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    // A second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn config(args: &[&str]) -> AppConfig {
        let mut argv = vec!["expense-tracker"];
        argv.extend_from_slice(args);
        argv.push("total");
        AppConfig::from_cli(&Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_credentials_required() {
        let cfg = config(&["--db", "x.db"]);
        let mut cfg = AppConfig {
            username: None,
            password: None,
            ..cfg
        };
        assert!(matches!(cfg.credentials(), Err(TrackerError::NotAuthenticated)));

        cfg.username = Some("alice".to_string());
        assert!(cfg.credentials().is_err());

        cfg.password = Some("secret".to_string());
        assert_eq!(cfg.credentials().unwrap(), ("alice", "secret"));
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(config(&["-v"]).log_filter(), "expense_tracker=debug");
        assert_eq!(config(&[]).log_filter(), "expense_tracker=info");
    }

    #[test]
    fn test_load_rules() {
        let defaults = AppConfig {
            rules_path: None,
            ..config(&[])
        };
        assert!(defaults.load_rules().unwrap().rule_count() > 0);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "gym", "pattern": "gym", "category": "Health"}}]"#).unwrap();

        let from_file = AppConfig {
            rules_path: Some(file.path().to_path_buf()),
            ..config(&[])
        };
        assert_eq!(from_file.load_rules().unwrap().rule_count(), 1);

        let missing = AppConfig {
            rules_path: Some(PathBuf::from("/nonexistent/rules.json")),
            ..config(&[])
        };
        assert!(matches!(missing.load_rules(), Err(TrackerError::Io(_))));
    }
}
