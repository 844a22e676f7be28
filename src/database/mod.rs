//! Database module
//!
//! This module provides all database functionality for studentdb:
//!
//! - **core**: SQLite connection wrapper and students schema management
//! - **students**: the student data access layer
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/           # Foundation
//! │   ├── connection  # SQLite DatabaseConn wrapper
//! │   └── schema      # students DDL, seed rows, status check
//! │
//! └── students/       # Data access
//!     └── repository  # parameterized student queries
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use studentdb::database::StudentDatabase;
//!
//! let db = StudentDatabase::open("students.sqlite3")?;
//! db.initialize_schema()?;
//!
//! let student = db.add_student("Ada", "Lovelace", "ada@example.com", "2024-01-15")?;
//! db.update_student_email(student.student_id, "ada@analytical.engine")?;
//!
//! for s in db.get_all_students()? {
//!     println!("{} {} <{}>", s.first_name, s.last_name, s.email);
//! }
//! ```

pub mod core;
pub mod students;

use crate::config::StudentDbConfig;
use anyhow::Context;
use tracing::info;

pub use self::core::{
    DatabaseConn, SchemaDefinitions, SchemaManager, SchemaStatus, STUDENTS_TABLE_NAME,
};

pub use students::{
    parse_enrollment_date, Student, StudentDatabase, StudentRepository, ENROLLMENT_DATE_FORMAT,
};

/// Open the database a configuration points at
///
/// Creates the data directory when the file lives there. Fails when the
/// database cannot be opened, e.g. because its directory does not exist.
pub fn open_configured(config: &StudentDbConfig) -> anyhow::Result<StudentDatabase> {
    let db = match config.sqlite_path() {
        Some(path) => {
            if config.uses_data_dir() {
                ensure_data_dir(&config.data_dir)?;
            }
            StudentDatabase::open(&path)
                .with_context(|| format!("Could not connect to database '{}'", config.dbname))?
        }
        None => StudentDatabase::open_in_memory().context("Could not create in-memory database")?,
    };
    info!("connected to '{}' as '{}'", config.dbname, config.user);
    Ok(db)
}

/// Ensure the data directory exists
pub fn ensure_data_dir(data_dir: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create data directory '{}': {}", data_dir, e))
}
