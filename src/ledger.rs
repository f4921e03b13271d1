// 📒 Expense Ledger - append-only, scoped to the session user
//
// Every read filters on the session's user id; there is no way to reach
// another user's rows through this module.

use crate::auth::Session;
use crate::entities::category::find_category;
use crate::entities::expense::{parse_amount, parse_expense_date, DATE_FORMAT};
use crate::entities::{Expense, ExpenseFilter, NewExpense};
use crate::error::{Result, TrackerError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::{debug, info, warn};

/// Validate and append one expense. Returns the new row id.
///
/// Nothing is written unless category, amount and date are all valid.
pub fn record_expense(conn: &Connection, session: &Session, input: &NewExpense) -> Result<i64> {
    let category_name = input.category.trim();
    if category_name.is_empty() {
        warn!("expense rejected: no category");
        return Err(TrackerError::InvalidCategory(String::new()));
    }

    let category = find_category(conn, category_name)?.ok_or_else(|| {
        warn!(category = category_name, "expense rejected: unknown category");
        TrackerError::InvalidCategory(category_name.to_string())
    })?;

    let amount = parse_amount(&input.amount).map_err(|e| {
        warn!(amount = input.amount.as_str(), "expense rejected: bad amount");
        e
    })?;

    let date = parse_expense_date(&input.date)?;
    let description = input.description.trim();

    conn.execute(
        "INSERT INTO expenses (user_id, date, category_id, amount, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            session.user_id(),
            date.format(DATE_FORMAT).to_string(),
            category.id,
            amount,
            description,
        ],
    )?;

    let id = conn.last_insert_rowid();
    info!(
        expense_id = id,
        user_id = session.user_id(),
        category = category.name.as_str(),
        amount,
        "expense recorded"
    );

    Ok(id)
}

fn expense_from_row(row: &Row) -> rusqlite::Result<Expense> {
    let date_str: String = row.get(2)?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date,
        category: row.get(3)?,
        amount: row.get(4)?,
        description: row.get(5)?,
    })
}

/// All of the user's expenses, oldest date first (ties in insertion order)
pub fn list_expenses(conn: &Connection, session: &Session) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(
        "SELECT e.id, e.user_id, e.date, c.name, e.amount, e.description
         FROM expenses e
         JOIN categories c ON c.id = e.category_id
         WHERE e.user_id = ?1
         ORDER BY e.date, e.id",
    )?;

    let expenses = stmt
        .query_map([session.user_id()], expense_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!(user_id = session.user_id(), count = expenses.len(), "listed expenses");
    Ok(expenses)
}

/// Expenses inside the filter's date range whose category or description
/// contains the keyword (case-insensitive)
pub fn filter_expenses(
    conn: &Connection,
    session: &Session,
    filter: &ExpenseFilter,
) -> Result<Vec<Expense>> {
    let matching: Vec<Expense> = list_expenses(conn, session)?
        .into_iter()
        .filter(|e| filter.matches(e))
        .collect();

    debug!(
        user_id = session.user_id(),
        keyword = filter.keyword.as_str(),
        count = matching.len(),
        "filtered expenses"
    );
    Ok(matching)
}

/// Sum of all the user's amounts; 0 when there are none
pub fn total_spent(conn: &Connection, session: &Session) -> Result<f64> {
    let total: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0.0) FROM expenses WHERE user_id = ?1",
        [session.user_id()],
        |row| row.get(0),
    )?;

    Ok(total)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tests::session_for;
    use crate::db::open_in_memory;
    use crate::entities::add_category;

    fn setup() -> (Connection, Session) {
        let conn = open_in_memory().unwrap();
        let session = session_for(&conn, "alice");
        add_category(&conn, &session, "Food").unwrap();
        add_category(&conn, &session, "Transport").unwrap();
        (conn, session)
    }

    fn expense_count(conn: &Connection, session: &Session) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user_id = ?1",
            [session.user_id()],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_record_then_list() {
        let (conn, session) = setup();

        let id = record_expense(
            &conn,
            &session,
            &NewExpense::new("2024-01-05", "Food", "12.50", "lunch"),
        )
        .unwrap();

        let expenses = list_expenses(&conn, &session).unwrap();
        assert_eq!(expenses.len(), 1);

        let e = &expenses[0];
        assert_eq!(e.id, id);
        assert_eq!(e.user_id, session.user_id());
        assert_eq!(e.date.to_string(), "2024-01-05");
        assert_eq!(e.category, "Food");
        assert_eq!(e.amount, 12.5);
        assert_eq!(e.description, "lunch");

        println!("✅ Record/list test PASSED");
    }

    #[test]
    fn test_unregistered_category_rejected() {
        let (conn, session) = setup();
        record_expense(&conn, &session, &NewExpense::new("2024-01-05", "Food", "1", "")).unwrap();

        for category in ["Rent", "", "food"] {
            let err = record_expense(
                &conn,
                &session,
                &NewExpense::new("2024-01-06", category, "5", ""),
            )
            .unwrap_err();
            assert!(matches!(err, TrackerError::InvalidCategory(_)));
        }

        assert_eq!(list_expenses(&conn, &session).unwrap().len(), 1);
    }

    #[test]
    fn test_non_numeric_amount_rejected() {
        let (conn, session) = setup();

        for amount in ["abc", "", "-1", "1.2.3"] {
            let err = record_expense(
                &conn,
                &session,
                &NewExpense::new("2024-01-06", "Food", amount, ""),
            )
            .unwrap_err();
            assert!(matches!(err, TrackerError::InvalidAmount(_)));
        }

        assert_eq!(expense_count(&conn, &session), 0);
    }

    #[test]
    fn test_invalid_date_rejected() {
        let (conn, session) = setup();

        let err = record_expense(
            &conn,
            &session,
            &NewExpense::new("2024-13-01", "Food", "3", ""),
        )
        .unwrap_err();

        assert!(matches!(err, TrackerError::InvalidDate(_)));
        assert_eq!(expense_count(&conn, &session), 0);
    }

    #[test]
    fn test_blank_date_defaults_to_today() {
        let (conn, session) = setup();
        record_expense(&conn, &session, &NewExpense::new("", "Food", "3", "")).unwrap();

        let expenses = list_expenses(&conn, &session).unwrap();
        assert_eq!(expenses[0].date, chrono::Local::now().date_naive());
    }

    #[test]
    fn test_list_sorted_by_date() {
        let (conn, session) = setup();
        record_expense(&conn, &session, &NewExpense::new("2024-03-01", "Food", "3", "c")).unwrap();
        record_expense(&conn, &session, &NewExpense::new("2024-01-01", "Food", "1", "a")).unwrap();
        record_expense(&conn, &session, &NewExpense::new("2024-01-01", "Food", "2", "b")).unwrap();

        let descriptions: Vec<String> = list_expenses(&conn, &session)
            .unwrap()
            .into_iter()
            .map(|e| e.description)
            .collect();
        assert_eq!(descriptions, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_expenses_are_private() {
        let (conn, alice) = setup();
        let bob = session_for(&conn, "bob");

        record_expense(&conn, &alice, &NewExpense::new("2024-01-05", "Food", "10", "")).unwrap();
        record_expense(&conn, &bob, &NewExpense::new("2024-01-05", "Food", "99", "")).unwrap();

        let alice_rows = list_expenses(&conn, &alice).unwrap();
        assert_eq!(alice_rows.len(), 1);
        assert!(alice_rows.iter().all(|e| e.user_id == alice.user_id()));

        assert_eq!(total_spent(&conn, &alice).unwrap(), 10.0);
        assert_eq!(total_spent(&conn, &bob).unwrap(), 99.0);
    }

    #[test]
    fn test_total_spent() {
        let (conn, session) = setup();
        assert_eq!(total_spent(&conn, &session).unwrap(), 0.0);

        record_expense(&conn, &session, &NewExpense::new("2024-01-05", "Food", "12.50", "lunch")).unwrap();
        record_expense(&conn, &session, &NewExpense::new("2024-01-07", "Transport", "2.25", "bus")).unwrap();

        let sum: f64 = list_expenses(&conn, &session)
            .unwrap()
            .iter()
            .map(|e| e.amount)
            .sum();
        assert_eq!(total_spent(&conn, &session).unwrap(), sum);
        assert_eq!(sum, 14.75);
    }

    #[test]
    fn test_filter_january_lunch() {
        let (conn, session) = setup();
        record_expense(&conn, &session, &NewExpense::new("2024-01-05", "Food", "12.50", "Team LUNCH")).unwrap();
        record_expense(&conn, &session, &NewExpense::new("2024-01-20", "Food", "8", "dinner")).unwrap();
        record_expense(&conn, &session, &NewExpense::new("2024-02-02", "Food", "9", "lunch")).unwrap();
        record_expense(&conn, &session, &NewExpense::new("2023-12-31", "Food", "7", "lunch")).unwrap();

        let filter = ExpenseFilter::parse("lunch", Some("2024-01-01"), Some("2024-01-31")).unwrap();
        let rows = filter_expenses(&conn, &session, &filter).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Team LUNCH");

        // Empty keyword and open range return everything
        let all = filter_expenses(&conn, &session, &ExpenseFilter::default()).unwrap();
        assert_eq!(all.len(), 4);

        println!("✅ Filter test PASSED");
    }
}
