// 💸 Expense entity and input validation
//
// Raw input (as typed in a form or passed on the command line) is validated
// here, before anything reaches the ledger.

use crate::error::{Result, TrackerError};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored expense. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub description: String,
}

/// Unvalidated expense input
#[derive(Debug, Clone, Default)]
pub struct NewExpense {
    /// `YYYY-MM-DD`; blank means today
    pub date: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

impl NewExpense {
    pub fn new(date: &str, category: &str, amount: &str, description: &str) -> Self {
        NewExpense {
            date: date.to_string(),
            category: category.to_string(),
            amount: amount.to_string(),
            description: description.to_string(),
        }
    }
}

/// Parse a monetary amount; must be finite and non-negative
pub fn parse_amount(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        // `+ 0.0` folds "-0" into a plain zero
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v + 0.0),
        _ => Err(TrackerError::InvalidAmount(trimmed.to_string())),
    }
}

/// Parse an expense date. Blank input falls back to today's local date.
pub fn parse_expense_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Local::now().date_naive());
    }

    parse_date(trimmed)
}

/// Four-digit years only; dates are stored as text and must sort as text
fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()
        .filter(|d| (0..=9999).contains(&d.year()))
        .ok_or_else(|| TrackerError::InvalidDate(input.to_string()))
}

fn parse_bound(input: Option<&str>) -> Result<Option<NaiveDate>> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some),
    }
}

/// Keyword + inclusive date range filter. Missing bounds are open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub keyword: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn keyword(keyword: &str) -> Self {
        ExpenseFilter {
            keyword: keyword.to_string(),
            ..Default::default()
        }
    }

    /// Build a filter from text input; blank bounds stay open
    pub fn parse(keyword: &str, start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Ok(ExpenseFilter {
            keyword: keyword.trim().to_string(),
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.keyword.is_empty() && self.start.is_none() && self.end.is_none()
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(start) = self.start {
            if expense.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if expense.date > end {
                return false;
            }
        }

        if self.keyword.is_empty() {
            return true;
        }

        let needle = self.keyword.to_lowercase();
        expense.category.to_lowercase().contains(&needle)
            || expense.description.to_lowercase().contains(&needle)
    }
}
