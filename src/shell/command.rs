//! Shell command grammar
//!
//! Every input line is tokenized on whitespace and handed to clap in
//! multicall mode, so the first token picks the [`ShellCommand`] variant and
//! the rest are its typed positionals. Command names are case-insensitive;
//! arguments are kept as typed.

use clap::{CommandFactory, Parser, Subcommand};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(multicall = true, disable_help_subcommand = true)]
struct CommandLine {
    #[command(subcommand)]
    command: ShellCommand,
}

/// A parsed shell command
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Create the students table and populate it with initial data
    #[command(name = "init")]
    Init,

    /// Add a student (DATE is YYYY-MM-DD)
    #[command(name = "addstudent")]
    AddStudent {
        #[arg(value_name = "FIRST_NAME")]
        first_name: String,
        #[arg(value_name = "LAST_NAME")]
        last_name: String,
        #[arg(value_name = "EMAIL")]
        email: String,
        #[arg(value_name = "DATE")]
        enrollment_date: String,
    },

    /// Remove a student
    #[command(name = "deletestudent")]
    DeleteStudent {
        #[arg(value_name = "ID", allow_negative_numbers = true)]
        student_id: i64,
    },

    /// Update a student's email
    #[command(name = "updatestudentemail")]
    UpdateStudentEmail {
        #[arg(value_name = "ID", allow_negative_numbers = true)]
        student_id: i64,
        #[arg(value_name = "NEW_EMAIL")]
        new_email: String,
    },

    /// Show a single student
    #[command(name = "getstudent")]
    GetStudent {
        #[arg(value_name = "ID", allow_negative_numbers = true)]
        student_id: i64,
    },

    /// Show all students
    #[command(name = "getallstudents")]
    GetAllStudents,

    /// Show this help
    #[command(name = "help", visible_alias = "h")]
    Help,

    /// Quit
    #[command(name = "exit", visible_alias = "q")]
    Exit,
}

/// Why an input line could not be turned into a command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid command '{0}'. Enter help or h for available commands")]
    Unknown(String),

    /// clap's rendered message, including the usage line
    #[error("{0}")]
    Usage(String),
}

impl ShellCommand {
    /// Parse one input line
    ///
    /// Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<ShellCommand>, ParseError> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };

        let name = name.to_lowercase();
        if CommandLine::command().find_subcommand(&name).is_none() {
            return Err(ParseError::Unknown(name));
        }

        CommandLine::try_parse_from(std::iter::once(name.as_str()).chain(tokens))
            .map(|parsed| Some(parsed.command))
            .map_err(|e| ParseError::Usage(e.render().to_string().trim_end().to_string()))
    }

    /// Whether running this command can change stored data
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            ShellCommand::Init
                | ShellCommand::AddStudent { .. }
                | ShellCommand::DeleteStudent { .. }
                | ShellCommand::UpdateStudentEmail { .. }
        )
    }
}

/// Render the command summary printed by `help`
pub fn help_text() -> String {
    let command = CommandLine::command();
    let entries: Vec<(String, String)> = command
        .get_subcommands()
        .map(|sub| {
            let mut usage = std::iter::once(sub.get_name())
                .chain(sub.get_visible_aliases())
                .collect::<Vec<_>>()
                .join(" | ");
            for arg in sub.get_positionals() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| arg.get_id().to_string().to_uppercase());
                usage.push_str(&format!(" <{}>", value_name));
            }
            let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
            (usage, about)
        })
        .collect();

    let width = entries.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);

    let mut lines = vec!["Available commands:".to_string()];
    lines.extend(
        entries
            .iter()
            .map(|(usage, about)| format!("  {:<width$}  {}", usage, about, width = width)),
    );
    lines.join("\n")
}
