#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! studentdb - manage a students table from an interactive shell
//!
//! studentdb keeps a single `students` table in an SQLite database and offers
//! a small command language to reset it, add, update, delete and list
//! students. It can be used as both a command-line application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | Command grammar, interactive shell and the `studentdb` binary | All above + `clap`, `rustyline`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`database`]**: connection handling, schema and the student data access layer
//! - **[`lens`]**: rendering of student rows in the supported output formats
//! - **`shell`** (`cli` feature): command grammar and the read-eval-print loop
//! - **[`config`]**: configuration loading
//! - **[`error`]**: the error taxonomy returned by every database operation
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use studentdb::database::StudentDatabase;
//!
//! let mut db = StudentDatabase::open_in_memory()?;
//! db.initialize_schema()?;
//!
//! let ada = db.add_student("Ada", "Lovelace", "ada@example.com", "2024-01-15")?;
//! assert_eq!(db.get_student(ada.student_id)?, Some(ada));
//!
//! db.close()?;
//! ```
//!
//! ## Running the shell on any reader/writer
//!
//! ```rust,ignore
//! use studentdb::{OutputFormat, StudentDatabase, StudentShell};
//!
//! let db = StudentDatabase::open_in_memory()?;
//! let mut shell = StudentShell::new(db, OutputFormat::Table);
//! shell.run(&b"init\ngetallstudents\nq\n"[..], std::io::stdout())?;
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod lens;
#[cfg(feature = "cli")]
pub mod shell;

pub use config::StudentDbConfig;
pub use database::{open_configured, SchemaStatus, Student, StudentDatabase};
pub use error::StudentDbError;
pub use lens::students::StudentLens;
pub use lens::utils::OutputFormat;
#[cfg(feature = "cli")]
pub use shell::{ShellCommand, ShellState, StudentShell};
