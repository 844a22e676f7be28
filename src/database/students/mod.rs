//! Student database storage
//!
//! `StudentDatabase` is the data access layer of studentdb: it owns the
//! single connection and exposes one method per student operation.

mod repository;

pub use repository::{parse_enrollment_date, Student, StudentRepository, ENROLLMENT_DATE_FORMAT};

use crate::database::core::{DatabaseConn, SchemaManager, SchemaStatus};
use crate::error::Result;
use tracing::info;

/// Main student database (SQLite backend)
///
/// Holds exactly one open connection until [`StudentDatabase::close`] is
/// called or the value is dropped.
pub struct StudentDatabase {
    db: DatabaseConn,
}

impl StudentDatabase {
    /// Open the student database at the specified path
    ///
    /// The students table is not created here; run
    /// [`StudentDatabase::initialize_schema`] for that.
    pub fn open(path: &str) -> Result<Self> {
        let db = DatabaseConn::open_path(path)?;
        let database = Self { db };
        database.log_schema_status()?;
        Ok(database)
    }

    /// Create an in-memory student database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let db = DatabaseConn::open_in_memory()?;
        Ok(Self { db })
    }

    fn log_schema_status(&self) -> Result<()> {
        match self.schema_status()? {
            SchemaStatus::Current => info!("students table found"),
            SchemaStatus::NotInitialized => {
                info!("students table not found, run `init` to create it")
            }
        }
        Ok(())
    }

    /// Get a student repository bound to the open connection
    pub fn students(&self) -> Result<StudentRepository<'_>> {
        Ok(StudentRepository::new(self.db.conn()?))
    }

    /// Whether the students table exists
    pub fn schema_status(&self) -> Result<SchemaStatus> {
        SchemaManager::new(self.db.conn()?).check_status()
    }

    /// Drop and recreate the students table and insert the seed rows
    pub fn initialize_schema(&self) -> Result<()> {
        SchemaManager::new(self.db.conn()?).initialize()
    }

    /// Add a student, returning the stored row with its assigned id
    pub fn add_student(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        enrollment_date: &str,
    ) -> Result<Student> {
        self.students()?
            .add(first_name, last_name, email, enrollment_date)
    }

    /// Change a student's email
    pub fn update_student_email(&self, student_id: i64, new_email: &str) -> Result<()> {
        self.students()?.update_email(student_id, new_email)
    }

    /// Delete a student by id
    pub fn delete_student(&self, student_id: i64) -> Result<()> {
        self.students()?.delete(student_id)
    }

    /// Get one student, `None` when the id does not exist
    pub fn get_student(&self, student_id: i64) -> Result<Option<Student>> {
        self.students()?.get(student_id)
    }

    /// Get all students in ascending id order
    pub fn get_all_students(&self) -> Result<Vec<Student>> {
        self.students()?.get_all()
    }

    /// Number of stored students
    pub fn count_students(&self) -> Result<u64> {
        self.students()?.count()
    }

    /// Whether the connection is still open
    pub fn is_open(&self) -> bool {
        self.db.is_open()
    }

    /// Release the connection; safe to call more than once
    pub fn close(&mut self) -> Result<()> {
        self.db.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StudentDbError;

    fn seeded() -> StudentDatabase {
        let db = StudentDatabase::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        db
    }

    #[test]
    fn test_open_in_memory() {
        let db = StudentDatabase::open_in_memory().unwrap();
        assert_eq!(db.schema_status().unwrap(), SchemaStatus::NotInitialized);
    }

    #[test]
    fn test_initialize_then_list() {
        let db = seeded();
        let students = db.get_all_students().unwrap();

        let ids: Vec<i64> = students.iter().map(|s| s.student_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let names: Vec<(&str, &str)> = students
            .iter()
            .map(|s| (s.first_name.as_str(), s.last_name.as_str()))
            .collect();
        assert_eq!(names, vec![("John", "Doe"), ("Jane", "Smith"), ("Jim", "Beam")]);
    }

    #[test]
    fn test_add_increases_count_with_larger_id() {
        let db = seeded();
        let before = db.get_all_students().unwrap();
        let max_before = before.iter().map(|s| s.student_id).max().unwrap();

        let added = db.add_student("A", "B", "a@b.com", "2024-01-01").unwrap();

        assert_eq!(db.count_students().unwrap(), before.len() as u64 + 1);
        assert!(added.student_id > max_before);
    }

    #[test]
    fn test_round_trip() {
        let db = seeded();
        let added = db
            .add_student("Grace", "Hopper", "grace@navy.mil", "2024-03-09")
            .unwrap();
        let fetched = db.get_student(added.student_id).unwrap().unwrap();

        assert_eq!(fetched.first_name, "Grace");
        assert_eq!(fetched.last_name, "Hopper");
        assert_eq!(fetched.email, "grace@navy.mil");
        assert_eq!(fetched.enrollment_date.to_string(), "2024-03-09");
    }

    #[test]
    fn test_delete_then_get() {
        let db = seeded();
        db.delete_student(2).unwrap();
        assert_eq!(db.get_student(2).unwrap(), None);
    }

    #[test]
    fn test_close_twice_and_use_after_close() {
        let mut db = seeded();
        db.close().unwrap();
        db.close().unwrap();
        assert!(!db.is_open());

        let err = db.get_all_students().unwrap_err();
        assert!(matches!(err, StudentDbError::Connection(_)));
    }
}
