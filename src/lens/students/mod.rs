//! Student lens
//!
//! Renders student rows in any [`OutputFormat`]. The shell uses it for
//! `init`, `getstudent` and `getallstudents`.
//!
//! # Example
//!
//! ```rust,ignore
//! use studentdb::database::StudentDatabase;
//! use studentdb::lens::students::StudentLens;
//! use studentdb::lens::utils::OutputFormat;
//!
//! let db = StudentDatabase::open_in_memory()?;
//! db.initialize_schema()?;
//!
//! let lens = StudentLens::new();
//! println!("{}", lens.format_results(&db.get_all_students()?, &OutputFormat::Table));
//! ```

use crate::database::Student;
use crate::lens::utils::OutputFormat;

/// Column headers, in table order
pub const STUDENT_COLUMNS: [&str; 5] = [
    "ID",
    "First Name",
    "Last Name",
    "Email",
    "Enrollment Date",
];

/// Formatting lens for student rows
pub struct StudentLens;

impl StudentLens {
    /// Create a new student lens
    pub fn new() -> Self {
        Self
    }

    /// Format rows for display
    pub fn format_results(&self, students: &[Student], format: &OutputFormat) -> String {
        match format {
            OutputFormat::Table => {
                #[cfg(feature = "display")]
                {
                    use tabled::settings::Style;
                    use tabled::Table;
                    Table::new(students).with(Style::rounded()).to_string()
                }
                #[cfg(not(feature = "display"))]
                {
                    self.format_psv(students)
                }
            }
            OutputFormat::Markdown => {
                #[cfg(feature = "display")]
                {
                    use tabled::settings::Style;
                    use tabled::Table;
                    Table::new(students).with(Style::markdown()).to_string()
                }
                #[cfg(not(feature = "display"))]
                {
                    self.format_psv(students)
                }
            }
            OutputFormat::Json => serde_json::to_string(students).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(students).unwrap_or_default(),
            OutputFormat::JsonLine => students
                .iter()
                .filter_map(|s| serde_json::to_string(s).ok())
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Psv => self.format_psv(students),
        }
    }

    fn format_psv(&self, students: &[Student]) -> String {
        let mut lines = vec![STUDENT_COLUMNS.join("|")];
        lines.extend(students.iter().map(|s| {
            format!(
                "{}|{}|{}|{}|{}",
                s.student_id, s.first_name, s.last_name, s.email, s.enrollment_date
            )
        }));
        lines.join("\n")
    }
}

impl Default for StudentLens {
    fn default() -> Self {
        Self::new()
    }
}
