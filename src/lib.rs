// Expense Tracker - Core Library
// Exposes the ledger, reports and identity shell to the CLI, the TUI and tests

pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod export;
pub mod ledger;
pub mod reports;
pub mod rules;
pub mod tracker;

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use auth::{
    current_user, login, register, request_password_reset, reset_password,
    Registration, ResetToken, Session, User,
};
pub use config::{init_logging, AppConfig};
pub use db::{open_database, open_in_memory, setup_database};
pub use entities::{
    add_category, find_category, list_categories,
    Category, Expense, ExpenseFilter, NewExpense,
};
pub use error::{Outcome, Result, TrackerError};
pub use export::{export_all, write_monthly_report};
pub use ledger::{filter_expenses, list_expenses, record_expense, total_spent};
pub use reports::{
    category_totals, monthly_spending, monthly_totals,
    CategoryTotal, MonthlyTotals, YearMonth,
};
pub use rules::{Suggestion, SuggestionRule, SuggestionRules};
pub use tracker::Tracker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
