//! Database schema management
//!
//! This module owns the DDL and seed data for the students table.

use crate::error::{Result, StudentDbError};
use rusqlite::{params, Connection};
use tracing::info;

/// Name of the only table managed by studentdb
pub const STUDENTS_TABLE_NAME: &str = "students";

/// Schema definitions for the students table
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    pub const DROP_STUDENTS_TABLE: &'static str = "DROP TABLE IF EXISTS students";

    /// SQL for creating the students table
    pub const STUDENTS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS students (
            student_id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL CHECK (first_name <> ''),
            last_name TEXT NOT NULL CHECK (last_name <> ''),
            email TEXT NOT NULL UNIQUE CHECK (email <> ''),
            enrollment_date DATE NOT NULL
        );
    "#;

    pub const INSERT_STUDENT: &'static str = r#"
        INSERT INTO students (first_name, last_name, email, enrollment_date)
        VALUES (?1, ?2, ?3, ?4)
    "#;

    /// Rows inserted every time the table is (re)created:
    /// first name, last name, email, enrollment date
    pub const SEED_STUDENTS: &'static [(&'static str, &'static str, &'static str, &'static str)] =
        &[
            ("John", "Doe", "john.doe@example.com", "2023-09-01"),
            ("Jane", "Smith", "jane.smith@example.com", "2023-09-01"),
            ("Jim", "Beam", "jim.beam@example.com", "2023-09-02"),
        ];
}

/// Schema manager for the students database
pub struct SchemaManager<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaManager<'a> {
    /// Create a new schema manager for the given connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Drop and recreate the students table, then insert the seed rows.
    ///
    /// All three steps share one transaction: if any of them fails the
    /// previous table and its rows are left untouched.
    pub fn initialize(&self) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| StudentDbError::Schema(format!("Failed to begin transaction: {}", e)))?;

        tx.execute(SchemaDefinitions::DROP_STUDENTS_TABLE, [])
            .map_err(|e| StudentDbError::Schema(format!("Failed to drop students table: {}", e)))?;

        tx.execute(SchemaDefinitions::STUDENTS_TABLE, [])
            .map_err(|e| {
                StudentDbError::Schema(format!("Failed to create students table: {}", e))
            })?;

        {
            let mut stmt = tx.prepare(SchemaDefinitions::INSERT_STUDENT).map_err(|e| {
                StudentDbError::Schema(format!("Failed to prepare seed insert: {}", e))
            })?;
            for (first_name, last_name, email, date) in SchemaDefinitions::SEED_STUDENTS {
                stmt.execute(params![first_name, last_name, email, date])
                    .map_err(|e| {
                        StudentDbError::Schema(format!("Failed to insert seed student: {}", e))
                    })?;
            }
        }

        tx.commit()
            .map_err(|e| StudentDbError::Schema(format!("Failed to commit schema: {}", e)))?;

        info!(
            "students table initialized with {} seed rows",
            SchemaDefinitions::SEED_STUDENTS.len()
        );
        Ok(())
    }

    /// Check the current schema status
    pub fn check_status(&self) -> Result<SchemaStatus> {
        let exists: i32 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [STUDENTS_TABLE_NAME],
                |row| row.get(0),
            )
            .map_err(|e| StudentDbError::Query(format!("Failed to check schema status: {}", e)))?;

        if exists == 0 {
            Ok(SchemaStatus::NotInitialized)
        } else {
            Ok(SchemaStatus::Current)
        }
    }
}

/// Status of the database schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// The students table does not exist yet
    NotInitialized,

    /// The students table exists
    Current,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_schema_not_initialized() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);

        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::NotInitialized
        );
    }

    #[test]
    fn test_schema_initialize() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);

        manager.initialize().unwrap();

        assert_eq!(manager.check_status().unwrap(), SchemaStatus::Current);
        assert_eq!(count(&conn), 3);
    }

    #[test]
    fn test_initialize_resets_existing_rows() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();

        conn.execute(
            "INSERT INTO students (first_name, last_name, email, enrollment_date)
             VALUES ('A', 'B', 'a@b.com', '2024-01-01')",
            [],
        )
        .unwrap();
        assert_eq!(count(&conn), 4);

        manager.initialize().unwrap();
        assert_eq!(count(&conn), 3);

        // ids restart once the table is recreated
        let max_id: i64 = conn
            .query_row("SELECT MAX(student_id) FROM students", [], |row| row.get(0))
            .unwrap();
        assert_eq!(max_id, 3);
    }

    #[test]
    fn test_failed_initialize_rolls_back() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();
        conn.execute("DELETE FROM students WHERE student_id = 3", [])
            .unwrap();

        // A temp table shadows the real one: the drop removes the temp table,
        // the create is skipped, and the seed collides with main.students.
        conn.execute("CREATE TEMP TABLE students (x INTEGER)", [])
            .unwrap();

        let err = manager.initialize().unwrap_err();
        assert!(matches!(err, StudentDbError::Schema(_)));

        // the drop was rolled back together with the failed insert
        let temp_tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_temp_master WHERE type='table' AND name='students'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(temp_tables, 1);

        let main_rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM main.students", [], |row| row.get(0))
            .unwrap();
        assert_eq!(main_rows, 2);
    }
}
