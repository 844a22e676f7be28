//! Student repository
//!
//! Parameterized data access for the students table. Every `rusqlite` failure
//! is converted into a [`StudentDbError`] before it leaves this module.

use crate::error::{Result, StudentDbError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Date format accepted for enrollment dates
pub const ENROLLMENT_DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_STUDENT_COLUMNS: &str =
    "SELECT student_id, first_name, last_name, email, enrollment_date FROM students";

/// A row of the students table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct Student {
    #[cfg_attr(feature = "display", tabled(rename = "ID"))]
    pub student_id: i64,
    #[cfg_attr(feature = "display", tabled(rename = "First Name"))]
    pub first_name: String,
    #[cfg_attr(feature = "display", tabled(rename = "Last Name"))]
    pub last_name: String,
    #[cfg_attr(feature = "display", tabled(rename = "Email"))]
    pub email: String,
    #[cfg_attr(feature = "display", tabled(rename = "Enrollment Date"))]
    pub enrollment_date: NaiveDate,
}

impl Student {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Student {
            student_id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            enrollment_date: row.get(4)?,
        })
    }
}

/// Parse an enrollment date in `YYYY-MM-DD` form
///
/// Only four-digit years and zero-padded months and days are accepted, so the
/// stored text always equals the input.
pub fn parse_enrollment_date(date: &str) -> Result<NaiveDate> {
    if !has_date_shape(date) {
        return Err(StudentDbError::Input(format!(
            "'{}' is not a valid date, expected YYYY-MM-DD",
            date
        )));
    }
    NaiveDate::parse_from_str(date, ENROLLMENT_DATE_FORMAT).map_err(|e| {
        StudentDbError::Input(format!(
            "'{}' is not a valid date, expected YYYY-MM-DD ({})",
            date, e
        ))
    })
}

fn has_date_shape(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Repository for student data operations
pub struct StudentRepository<'a> {
    conn: &'a Connection,
}

impl<'a> StudentRepository<'a> {
    /// Create a new student repository
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a student and return the stored row with its assigned id
    pub fn add(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        enrollment_date: &str,
    ) -> Result<Student> {
        let enrollment_date = parse_enrollment_date(enrollment_date)?;

        self.conn
            .execute(
                "INSERT INTO students (first_name, last_name, email, enrollment_date)
                 VALUES (?1, ?2, ?3, ?4)",
                params![first_name, last_name, email, enrollment_date],
            )
            .map_err(|e| StudentDbError::from_statement("Could not add student", e))?;

        let student_id = self.conn.last_insert_rowid();
        info!("added student {} ({} {})", student_id, first_name, last_name);

        Ok(Student {
            student_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            enrollment_date,
        })
    }

    /// Change the email of an existing student
    ///
    /// Zero affected rows means the id does not exist.
    pub fn update_email(&self, student_id: i64, new_email: &str) -> Result<()> {
        let affected = self
            .conn
            .execute(
                "UPDATE students SET email = ?1 WHERE student_id = ?2",
                params![new_email, student_id],
            )
            .map_err(|e| {
                StudentDbError::from_statement(
                    &format!("Could not update student id {} email", student_id),
                    e,
                )
            })?;

        if affected == 0 {
            return Err(StudentDbError::NotFound(student_id));
        }

        info!("updated email of student {}", student_id);
        Ok(())
    }

    /// Delete a student by id
    ///
    /// Zero affected rows means the id does not exist.
    pub fn delete(&self, student_id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute(
                "DELETE FROM students WHERE student_id = ?1",
                params![student_id],
            )
            .map_err(|e| {
                StudentDbError::from_statement(
                    &format!("Could not delete student with ID {}", student_id),
                    e,
                )
            })?;

        if affected == 0 {
            return Err(StudentDbError::NotFound(student_id));
        }

        info!("deleted student {}", student_id);
        Ok(())
    }

    /// Get a student by id, `None` if there is no such row
    pub fn get(&self, student_id: i64) -> Result<Option<Student>> {
        let query = format!("{} WHERE student_id = ?1", SELECT_STUDENT_COLUMNS);
        self.conn
            .query_row(&query, params![student_id], Student::from_row)
            .optional()
            .map_err(|e| {
                StudentDbError::Query(format!(
                    "Could not get student with ID {}: {}",
                    student_id, e
                ))
            })
    }

    /// Get all students ordered by id
    pub fn get_all(&self) -> Result<Vec<Student>> {
        let query = format!("{} ORDER BY student_id", SELECT_STUDENT_COLUMNS);
        let mut stmt = self
            .conn
            .prepare(&query)
            .map_err(|e| StudentDbError::Query(format!("Could not get students: {}", e)))?;

        let students = stmt
            .query_map([], Student::from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| StudentDbError::Query(format!("Could not get students: {}", e)))?;

        debug!("fetched {} students", students.len());
        Ok(students)
    }

    /// Get the number of students
    pub fn count(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
            .map_err(|e| StudentDbError::Query(format!("Could not count students: {}", e)))?;
        Ok(count)
    }
}
