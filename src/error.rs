//! Error types for student database operations
//!
//! Every failure coming out of the database layer is converted into one of
//! these variants at the repository boundary, so callers never see raw
//! `rusqlite` errors.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Result alias used by the database layer
pub type Result<T> = std::result::Result<T, StudentDbError>;

#[derive(Error, Debug)]
pub enum StudentDbError {
    /// The database link could not be established or is no longer usable
    #[error("Connection error: {0}")]
    Connection(String),

    /// Dropping, creating or seeding the students table failed
    #[error("Could not initialize table: {0}")]
    Schema(String),

    /// A uniqueness, not-null or check constraint rejected the statement
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// No student row has the requested id
    #[error("Student ID {0} doesn't exist")]
    NotFound(i64),

    /// An argument was malformed before reaching the database
    #[error("Invalid input: {0}")]
    Input(String),

    /// Any other query failure
    #[error("Query error: {0}")]
    Query(String),
}

impl StudentDbError {
    /// Convert a `rusqlite` error raised by a data statement.
    ///
    /// Constraint violations keep their own variant; everything else is
    /// reported as a query failure with the given context.
    pub(crate) fn from_statement(context: &str, err: rusqlite::Error) -> Self {
        if is_constraint_violation(&err) {
            StudentDbError::Constraint(err.to_string())
        } else {
            StudentDbError::Query(format!("{}: {}", context, err))
        }
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint_error() -> rusqlite::Error {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE t (v TEXT NOT NULL UNIQUE)", [])
            .unwrap();
        conn.execute("INSERT INTO t (v) VALUES ('a')", []).unwrap();
        conn.execute("INSERT INTO t (v) VALUES ('a')", [])
            .unwrap_err()
    }

    #[test]
    fn test_constraint_violation_is_classified() {
        let err = StudentDbError::from_statement("insert", constraint_error());
        assert!(matches!(err, StudentDbError::Constraint(_)));
    }

    #[test]
    fn test_other_errors_become_query_errors() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let raw = conn
            .execute("SELECT * FROM missing_table", [])
            .unwrap_err();
        let err = StudentDbError::from_statement("select", raw);
        match err {
            StudentDbError::Query(msg) => assert!(msg.starts_with("select: ")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            StudentDbError::NotFound(42).to_string(),
            "Student ID 42 doesn't exist"
        );
        assert_eq!(
            StudentDbError::Input("bad date".to_string()).to_string(),
            "Invalid input: bad date"
        );
    }
}
