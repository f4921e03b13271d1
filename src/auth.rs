// 🔐 Identity shell - registration, login and password reset
//
// Credentials are stored as Argon2 PHC strings. There is no way to read a
// password back; a forgotten password goes through a single-use reset token
// instead.

use crate::error::{is_constraint_violation, Result, TrackerError};
use argon2::{
    password_hash::{Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::rngs::OsRng;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

const RESET_TOKEN_TTL_MINUTES: i64 = 30;

// ============================================================================
// SESSION CONTEXT
// ============================================================================

/// Authenticated user context.
///
/// Only `login` can produce one, so holding a `Session` is proof the user
/// authenticated. Every ledger, registry and report call takes it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: i64,
    username: String,
}

impl Session {
    pub(crate) fn new(user_id: i64, username: String) -> Self {
        Session { user_id, username }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

// ============================================================================
// USER
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

/// Registration input, as typed by the user
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub date_of_birth: String,
}

/// One-time reset token handed back to the user who proved their identity
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| TrackerError::Credential(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a candidate against a stored PHC string
fn verify_password(candidate: &str, stored_hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| TrackerError::Credential(e.to_string()))?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(TrackerError::Credential(e.to_string())),
    }
}

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub(crate) fn parse_birth_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| TrackerError::InvalidDate(trimmed.to_string()))?;

    if date > Utc::now().date_naive() {
        return Err(TrackerError::InvalidDate(trimmed.to_string()));
    }

    Ok(date)
}

/// Register a new user. Username and email must both be unused.
pub fn register(conn: &Connection, registration: &Registration) -> Result<i64> {
    let username = registration.username.trim();
    let email = registration.email.trim();
    let password = registration.password.trim();

    if username.is_empty() {
        return Err(TrackerError::InvalidInput("username is required".to_string()));
    }
    if password.is_empty() {
        return Err(TrackerError::InvalidInput("password is required".to_string()));
    }
    if !email.contains('@') {
        return Err(TrackerError::InvalidInput(format!("'{}' is not an email address", email)));
    }
    let date_of_birth = parse_birth_date(&registration.date_of_birth)?;

    let hash = hash_password(password)?;

    let result = conn.execute(
        "INSERT INTO users (username, password_hash, email, date_of_birth)
         VALUES (?1, ?2, ?3, ?4)",
        params![username, hash, email, date_of_birth.to_string()],
    );

    match result {
        Ok(_) => {
            let id = conn.last_insert_rowid();
            info!(user_id = id, username, "user registered");
            Ok(id)
        }
        Err(e) if is_constraint_violation(&e) => {
            let username_taken: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
                [username],
                |row| row.get(0),
            )?;
            let field = if username_taken { "username" } else { "email" };
            warn!(username, field, "registration rejected: duplicate user");
            Err(TrackerError::DuplicateUser(field.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Check a username/password pair and open a session
pub fn login(conn: &Connection, username: &str, password: &str) -> Result<Session> {
    let username = username.trim();

    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT id, password_hash FROM users WHERE username = ?1",
            [username],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    if let Some((id, stored_hash)) = row {
        if verify_password(password.trim(), &stored_hash)? {
            info!(user_id = id, username, "logged in");
            return Ok(Session::new(id, username.to_string()));
        }
    }

    warn!(username, "login failed");
    Err(TrackerError::InvalidCredentials)
}

/// Load the profile of the session's user
pub fn current_user(conn: &Connection, session: &Session) -> Result<User> {
    let user = conn
        .query_row(
            "SELECT id, username, email, date_of_birth FROM users WHERE id = ?1",
            [session.user_id()],
            |row| {
                let dob: String = row.get(3)?;
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                    date_of_birth: NaiveDate::parse_from_str(&dob, "%Y-%m-%d").map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                })
            },
        )
        .optional()?;

    user.ok_or(TrackerError::NotAuthenticated)
}

// ============================================================================
// PASSWORD RESET
// ============================================================================

/// Issue a reset token once username, email and birth date all match.
///
/// The token is only returned here; the database keeps its hash.
pub fn request_password_reset(
    conn: &Connection,
    username: &str,
    email: &str,
    date_of_birth: &str,
) -> Result<ResetToken> {
    request_password_reset_at(conn, username, email, date_of_birth, Utc::now())
}

pub(crate) fn request_password_reset_at(
    conn: &Connection,
    username: &str,
    email: &str,
    date_of_birth: &str,
    now: DateTime<Utc>,
) -> Result<ResetToken> {
    let dob = NaiveDate::parse_from_str(date_of_birth.trim(), "%Y-%m-%d")
        .map_err(|_| TrackerError::InvalidDate(date_of_birth.trim().to_string()))?;

    let user_id: Option<i64> = conn
        .query_row(
            "SELECT id FROM users WHERE username = ?1 AND email = ?2 AND date_of_birth = ?3",
            params![username.trim(), email.trim(), dob.to_string()],
            |row| row.get(0),
        )
        .optional()?;

    let Some(user_id) = user_id else {
        warn!(username, "password reset request did not match a user");
        return Err(TrackerError::InvalidCredentials);
    };

    let pruned = conn.execute(
        "DELETE FROM password_resets WHERE used = 1 OR expires_at <= ?1",
        [now.to_rfc3339()],
    )?;
    if pruned > 0 {
        debug!(pruned, "stale reset tokens removed");
    }

    let token = uuid::Uuid::new_v4().simple().to_string();
    let expires_at = now + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

    conn.execute(
        "INSERT INTO password_resets (user_id, token_hash, expires_at) VALUES (?1, ?2, ?3)",
        params![user_id, hash_token(&token), expires_at.to_rfc3339()],
    )?;

    info!(user_id, "password reset token issued");
    Ok(ResetToken { token, expires_at })
}

/// Consume a reset token and replace the user's password
pub fn reset_password(
    conn: &Connection,
    username: &str,
    token: &str,
    new_password: &str,
) -> Result<()> {
    reset_password_at(conn, username, token, new_password, Utc::now())
}

pub(crate) fn reset_password_at(
    conn: &Connection,
    username: &str,
    token: &str,
    new_password: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    let new_password = new_password.trim();
    if new_password.is_empty() {
        return Err(TrackerError::InvalidInput("password is required".to_string()));
    }

    let tx = conn.unchecked_transaction()?;

    let pending: Option<(i64, String)> = tx
        .query_row(
            "SELECT r.user_id, r.expires_at
             FROM password_resets r
             JOIN users u ON u.id = r.user_id
             WHERE u.username = ?1 AND r.token_hash = ?2 AND r.used = 0",
            params![username.trim(), hash_token(token.trim())],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((user_id, expires_at)) = pending else {
        warn!(username, "reset attempted with unknown token");
        return Err(TrackerError::InvalidResetToken);
    };

    let expired = DateTime::parse_from_rfc3339(&expires_at)
        .map(|t| t.with_timezone(&Utc) <= now)
        .unwrap_or(true);
    if expired {
        warn!(user_id, "reset attempted with expired token");
        return Err(TrackerError::InvalidResetToken);
    }

    tx.execute(
        "UPDATE users SET password_hash = ?1 WHERE id = ?2",
        params![hash_password(new_password)?, user_id],
    )?;
    // Every outstanding token dies with the old password
    tx.execute(
        "UPDATE password_resets SET used = 1 WHERE user_id = ?1",
        [user_id],
    )?;
    tx.commit()?;

    info!(user_id, "password reset completed");
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
