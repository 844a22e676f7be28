//! Lens module
//!
//! Lenses combine data access results with output formatting so the same
//! rendering can be reused by the interactive shell and by library users.
//!
//! # Architecture
//!
//! - `students`: [`students::StudentLens`], renders student rows
//! - `utils`: [`utils::OutputFormat`], shared by every renderer

pub mod students;
pub mod utils;
