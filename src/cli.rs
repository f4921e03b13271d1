//! Command-line definition.
//!
//! Every option can also come from the environment, so a shell profile can
//! hold the database path and credentials:
//!
//!   EXPENSE_TRACKER_DB=~/expenses.db EXPENSE_TRACKER_USER=alice expense-tracker total

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "expense-tracker", version, about = "Personal expense tracker")]
pub struct Cli {
    /// SQLite database file (created if missing)
    #[arg(long, global = true, env = "EXPENSE_TRACKER_DB", default_value = "expenses.db")]
    pub db: PathBuf,

    /// JSON file with category suggestion rules (built-in rules if omitted)
    #[arg(long, global = true, env = "EXPENSE_TRACKER_RULES")]
    pub rules: Option<PathBuf>,

    /// Username for commands that need a login
    #[arg(long, short = 'u', global = true, env = "EXPENSE_TRACKER_USER")]
    pub username: Option<String>,

    /// Password for commands that need a login
    #[arg(long, short = 'p', global = true, env = "EXPENSE_TRACKER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a new user (uses --username/--password)
    Register {
        #[arg(long)]
        email: String,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: String,
    },

    /// Get a one-time password reset token
    RequestReset {
        #[arg(long)]
        email: String,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: String,
    },

    /// Set a new password using a reset token
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long)]
        new_password: String,
    },

    /// Register a spending category
    AddCategory { name: String },

    /// List categories
    Categories,

    /// Record an expense
    AddExpense(AddExpenseArgs),

    /// List expenses, optionally filtered
    List(ListArgs),

    /// Total amount spent
    Total,

    /// Aggregate reports
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },

    /// Export all expenses to CSV
    Export {
        #[arg(long, default_value = "expenses_export.csv")]
        out: PathBuf,
    },

    /// Interactive terminal UI
    Tui,
}

impl Command {
    /// Account commands and the TUI (which has its own login screen) run logged out
    pub fn needs_login(&self) -> bool {
        !matches!(
            self,
            Command::Register { .. }
                | Command::RequestReset { .. }
                | Command::ResetPassword { .. }
                | Command::Tui
        )
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AddExpenseArgs {
    /// YYYY-MM-DD; today if omitted
    #[arg(long, default_value = "")]
    pub date: String,

    /// Category name; may be omitted with --suggest
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub amount: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Pick the category from the description when --category is missing
    #[arg(long)]
    pub suggest: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ListArgs {
    /// Case-insensitive match on category or description
    #[arg(long, default_value = "")]
    pub keyword: String,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ReportKind {
    /// Month x category table
    Monthly {
        /// Also write the table as CSV
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Totals per category with share of spending
    Categories,
    /// Total per month
    Spending,
}
