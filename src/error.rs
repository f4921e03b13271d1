// ⚠️ Error taxonomy for the tracker library
// Binaries wrap these in anyhow; the library surfaces them typed so callers
// can tell a rejected input apart from a storage failure.

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),

    /// Username or email already registered (the field name is carried)
    #[error("A user with this {0} is already registered")]
    DuplicateUser(String),

    #[error("Amount must be a non-negative number, got '{0}'")]
    InvalidAmount(String),

    #[error("Unknown or empty category '{0}'")]
    InvalidCategory(String),

    #[error("Date must be YYYY-MM-DD, got '{0}'")]
    InvalidDate(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Reset token is invalid, expired or already used")]
    InvalidResetToken,

    /// Hashing failed or a stored credential is not a valid PHC string
    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Suggestion rules error: {0}")]
    Rules(String),

    #[error("Database operation failed: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// True when a rusqlite error is a UNIQUE / FK constraint violation
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Outcome of a report or export: either data, or a distinct "nothing to show".
///
/// An empty ledger is not a failure, so it is not a `TrackerError`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Data(T),
    NoData,
}

impl<T> Outcome<T> {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Outcome::NoData)
    }

    /// Borrow the data, if any
    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Data(t) => Some(t),
            Outcome::NoData => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Outcome::Data(t) => Some(t),
            Outcome::NoData => None,
        }
    }
}
