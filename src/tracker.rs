// 🧭 Tracker - one connection, one optional session
//
// Front ends (CLI and TUI) talk to this instead of threading a connection and
// a session around. Anything that needs a user fails with `NotAuthenticated`
// until `login` succeeds.

use crate::auth::{self, Registration, ResetToken, Session, User};
use crate::db;
use crate::entities::{self, Expense, ExpenseFilter, NewExpense};
use crate::error::{Outcome, Result, TrackerError};
use crate::export;
use crate::ledger;
use crate::reports::{self, CategoryTotal, MonthlyTotals, YearMonth};
use crate::rules::{Suggestion, SuggestionRules};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

pub struct Tracker {
    conn: Connection,
    session: Option<Session>,
    rules: SuggestionRules,
}

impl Tracker {
    pub fn new(conn: Connection, rules: SuggestionRules) -> Self {
        Tracker {
            conn,
            session: None,
            rules,
        }
    }

    pub fn open(path: &Path, rules: SuggestionRules) -> Result<Self> {
        Ok(Tracker::new(db::open_database(path)?, rules))
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Tracker::new(db::open_in_memory()?, SuggestionRules::with_defaults()))
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(TrackerError::NotAuthenticated)
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    // ------------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------------

    pub fn register(&self, registration: &Registration) -> Result<i64> {
        auth::register(&self.conn, registration)
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<&Session> {
        let session = auth::login(&self.conn, username, password)?;
        Ok(&*self.session.insert(session))
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!(user_id = session.user_id(), "logged out");
        }
    }

    pub fn current_user(&self) -> Result<User> {
        auth::current_user(&self.conn, self.session()?)
    }

    pub fn request_password_reset(
        &self,
        username: &str,
        email: &str,
        date_of_birth: &str,
    ) -> Result<ResetToken> {
        auth::request_password_reset(&self.conn, username, email, date_of_birth)
    }

    pub fn reset_password(&self, username: &str, token: &str, new_password: &str) -> Result<()> {
        auth::reset_password(&self.conn, username, token, new_password)
    }

    // ------------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------------

    pub fn add_category(&self, name: &str) -> Result<Option<i64>> {
        entities::add_category(&self.conn, self.session()?, name)
    }

    pub fn categories(&self) -> Result<Vec<String>> {
        entities::list_categories(&self.conn, self.session()?)
    }

    /// Suggest a registered category for a description
    pub fn suggest_category(&self, description: &str) -> Result<Option<Suggestion>> {
        let known = self.categories()?;
        Ok(self.rules.suggest_from(description, &known))
    }

    // ------------------------------------------------------------------------
    // Ledger
    // ------------------------------------------------------------------------

    pub fn record_expense(&self, input: &NewExpense) -> Result<i64> {
        ledger::record_expense(&self.conn, self.session()?, input)
    }

    pub fn expenses(&self) -> Result<Vec<Expense>> {
        ledger::list_expenses(&self.conn, self.session()?)
    }

    pub fn filter_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        ledger::filter_expenses(&self.conn, self.session()?, filter)
    }

    pub fn total_spent(&self) -> Result<f64> {
        ledger::total_spent(&self.conn, self.session()?)
    }

    // ------------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------------

    pub fn monthly_totals(&self) -> Result<Outcome<MonthlyTotals>> {
        reports::monthly_totals(&self.conn, self.session()?)
    }

    pub fn monthly_spending(&self) -> Result<Outcome<Vec<(YearMonth, f64)>>> {
        reports::monthly_spending(&self.conn, self.session()?)
    }

    pub fn category_totals(&self) -> Result<Outcome<Vec<CategoryTotal>>> {
        reports::category_totals(&self.conn, self.session()?)
    }

    pub fn export_all(&self, path: &Path) -> Result<Outcome<usize>> {
        export::export_all_to_path(&self.conn, self.session()?, path)
    }

    /// Write the monthly report CSV; returns the report that was written
    pub fn export_monthly_report(&self, path: &Path) -> Result<Outcome<MonthlyTotals>> {
        let outcome = self.monthly_totals()?;
        if let Outcome::Data(report) = &outcome {
            export::write_monthly_report_to_path(report, path)?;
        }
        Ok(outcome)
    }
}
