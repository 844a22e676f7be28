//! Interactive student shell
//!
//! Reads one line at a time, parses it into a [`ShellCommand`], runs it
//! against the [`StudentDatabase`] and prints either the result or a single
//! `ERROR:` line. A failed command never ends the loop; only `exit`/`q` or
//! end of input does.
//!
//! ```text
//! AwaitingInput --line--> Dispatching --done--> AwaitingInput
//!       |
//!       +--exit / q / EOF--> Exited
//! ```

mod command;

pub use command::{help_text, ParseError, ShellCommand};

use crate::database::StudentDatabase;
use crate::error::StudentDbError;
use crate::lens::students::StudentLens;
use crate::lens::utils::OutputFormat;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Prompt printed before every read
pub const PROMPT: &str = "Enter command (or 'q' or 'exit' to quit): ";

/// Where the shell is in its read-dispatch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    AwaitingInput,
    Dispatching,
    Exited,
}

/// Read-eval-print loop over the student commands
pub struct StudentShell {
    db: StudentDatabase,
    lens: StudentLens,
    format: OutputFormat,
    state: ShellState,
}

impl StudentShell {
    /// Create a shell that owns the database handle
    pub fn new(db: StudentDatabase, format: OutputFormat) -> Self {
        Self {
            db,
            lens: StudentLens::new(),
            format,
            state: ShellState::AwaitingInput,
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    /// Borrow the database handle
    pub fn database(&self) -> &StudentDatabase {
        &self.db
    }

    /// Run the loop until `exit`/`q` or end of input, then close the connection.
    ///
    /// Only I/O failures on `input` or `output` end the loop with an error.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> anyhow::Result<()> {
        writeln!(output, "{}\n", help_text())?;

        let mut line = String::new();
        while self.state != ShellState::Exited {
            write!(output, "{}", PROMPT)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                debug!("end of input");
                writeln!(output)?;
                self.execute(ShellCommand::Exit, &mut output)?;
                continue;
            }

            self.handle_line(&line, &mut output)?;
        }

        self.close();
        Ok(())
    }

    /// Run the loop on a terminal line editor with history.
    ///
    /// Ctrl-C discards the current line; Ctrl-D behaves like `exit`.
    pub fn run_interactive<W: Write>(&mut self, mut output: W) -> anyhow::Result<()> {
        let mut editor = DefaultEditor::new()?;
        writeln!(output, "{}\n", help_text())?;

        while self.state != ShellState::Exited {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history_entry(line.as_str())?;
                    }
                    self.handle_line(&line, &mut output)?;
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => {
                    debug!("end of input");
                    self.execute(ShellCommand::Exit, &mut output)?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.close();
        Ok(())
    }

    /// Parse and run a single input line, writing the outcome to `output`.
    pub fn handle_line<W: Write>(
        &mut self,
        line: &str,
        output: &mut W,
    ) -> std::io::Result<ShellState> {
        match ShellCommand::parse(line) {
            Ok(Some(command)) => self.execute(command, output),
            Ok(None) => Ok(self.state),
            Err(e) => {
                writeln!(output, "{}", e)?;
                Ok(self.state)
            }
        }
    }

    fn execute<W: Write>(
        &mut self,
        command: ShellCommand,
        output: &mut W,
    ) -> std::io::Result<ShellState> {
        if command.is_mutating() {
            info!("running {:?}", command);
        } else {
            debug!("running {:?}", command);
        }

        self.state = ShellState::Dispatching;
        self.state = match self.dispatch(command) {
            Ok((message, next)) => {
                writeln!(output, "{}", message)?;
                next
            }
            Err(e) => {
                writeln!(output, "ERROR: {}", e)?;
                ShellState::AwaitingInput
            }
        };
        Ok(self.state)
    }

    /// Run one command, returning the text to print and the state to move to
    fn dispatch(&mut self, command: ShellCommand) -> Result<(String, ShellState), StudentDbError> {
        let mut next = ShellState::AwaitingInput;
        let message = match command {
            ShellCommand::Init => {
                self.db.initialize_schema()?;
                let students = self.db.get_all_students()?;
                format!(
                    "Students table initialized.\n{}",
                    self.lens.format_results(&students, &self.format)
                )
            }
            ShellCommand::AddStudent {
                first_name,
                last_name,
                email,
                enrollment_date,
            } => {
                let student =
                    self.db
                        .add_student(&first_name, &last_name, &email, &enrollment_date)?;
                format!(
                    "Added student {} {} with ID {}.",
                    student.first_name, student.last_name, student.student_id
                )
            }
            ShellCommand::DeleteStudent { student_id } => {
                self.db.delete_student(student_id)?;
                format!("Student with ID {} removed successfully.", student_id)
            }
            ShellCommand::UpdateStudentEmail {
                student_id,
                new_email,
            } => {
                self.db.update_student_email(student_id, &new_email)?;
                format!(
                    "Updated student with ID {} email to {}.",
                    student_id, new_email
                )
            }
            ShellCommand::GetStudent { student_id } => match self.db.get_student(student_id)? {
                Some(student) => self.lens.format_results(&[student], &self.format),
                None => format!("Student with ID {} not found.", student_id),
            },
            ShellCommand::GetAllStudents => {
                let students = self.db.get_all_students()?;
                if students.is_empty() {
                    "No students found.".to_string()
                } else {
                    self.lens.format_results(&students, &self.format)
                }
            }
            ShellCommand::Help => help_text(),
            ShellCommand::Exit => {
                next = ShellState::Exited;
                "Exiting the program...".to_string()
            }
        };
        Ok((message, next))
    }

    fn close(&mut self) {
        if let Err(e) = self.db.close() {
            warn!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> StudentShell {
        let db = StudentDatabase::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        StudentShell::new(db, OutputFormat::Psv)
    }

    fn run_line(shell: &mut StudentShell, line: &str) -> String {
        let mut out = Vec::new();
        shell.handle_line(line, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_malformed_input_keeps_running() {
        let mut shell = shell();
        let out = run_line(&mut shell, "addstudent OnlyOneArg");

        assert!(out.contains("required arguments were not provided"));
        assert_eq!(shell.state(), ShellState::AwaitingInput);
        assert_eq!(shell.database().count_students().unwrap(), 3);
    }

    #[test]
    fn test_unknown_command() {
        let mut shell = shell();
        let out = run_line(&mut shell, "frobnicate 1 2");
        assert!(out.starts_with("Invalid command 'frobnicate'"));
        assert_eq!(shell.state(), ShellState::AwaitingInput);
    }

    #[test]
    fn test_failed_operation_prints_error_line() {
        let mut shell = shell();
        let out = run_line(&mut shell, "deletestudent 9999");
        assert_eq!(out, "ERROR: Student ID 9999 doesn't exist\n");
        assert_eq!(shell.state(), ShellState::AwaitingInput);
    }

    #[test]
    fn test_get_all_students() {
        let mut shell = shell();
        let out = run_line(&mut shell, "getallstudents");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "1|John|Doe|john.doe@example.com|2023-09-01");
    }

    #[test]
    fn test_get_all_students_empty() {
        let mut shell = shell();
        for id in 1..=3 {
            run_line(&mut shell, &format!("deletestudent {}", id));
        }
        assert_eq!(run_line(&mut shell, "getallstudents"), "No students found.\n");
    }

    #[test]
    fn test_get_student_not_found() {
        let mut shell = shell();
        assert_eq!(
            run_line(&mut shell, "getstudent 42"),
            "Student with ID 42 not found.\n"
        );
    }

    #[test]
    fn test_exit_commands() {
        for line in ["exit", "q", "EXIT"] {
            let mut shell = shell();
            let out = run_line(&mut shell, line);
            assert_eq!(out, "Exiting the program...\n");
            assert_eq!(shell.state(), ShellState::Exited);
        }
    }

    #[test]
    fn test_blank_line_is_ignored() {
        let mut shell = shell();
        assert_eq!(run_line(&mut shell, "   "), "");
        assert_eq!(shell.state(), ShellState::AwaitingInput);
    }
}
