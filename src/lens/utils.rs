//! Output format shared by the student lens and the shell

/// How row sets are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Pretty table with rounded borders
    #[default]
    Table,
    /// Markdown table
    Markdown,
    /// Compact JSON array
    Json,
    /// Indented JSON array
    JsonPretty,
    /// One JSON object per line
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}
