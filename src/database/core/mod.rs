//! Core database infrastructure
//!
//! This module provides the foundational database components:
//! - `DatabaseConn`: owned SQLite connection with explicit close
//! - `SchemaManager`: students table creation, seeding and status check
//! - `SchemaStatus`: schema state enumeration

mod connection;
mod schema;

pub use connection::DatabaseConn;
pub use schema::{SchemaDefinitions, SchemaManager, SchemaStatus, STUDENTS_TABLE_NAME};
