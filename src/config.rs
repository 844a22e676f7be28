use anyhow::{anyhow, bail, Result};
use config::{Config, FileFormat};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Database name that selects a transient in-memory database
pub const IN_MEMORY_DBNAME: &str = ":memory:";

/// Settings read from `studentdb.toml` and `STUDENTDB_*` variables
///
/// `dbname` selects the SQLite database. `user` and `password` are accepted
/// for compatibility with server-backed setups but are not used for
/// authentication: SQLite files have no accounts. `user` only appears in the
/// startup banner and logs, and `password` is never printed.
pub struct StudentDbConfig {
    /// Name of the database to connect to
    pub dbname: String,

    /// Account name shown in the banner; not checked by SQLite
    pub user: String,

    /// Accepted but unused by the embedded backend; never printed
    pub password: Option<String>,

    /// Path to the directory holding database files
    pub data_dir: String,
}

/// Example configuration printed when no configuration file is found
pub const EXAMPLE_CONFIG: &str = r#"### studentdb configuration file

### database name (":memory:" for a throwaway in-memory database,
### or a path ending in .sqlite3)
dbname = "students"

### user the connection is made for
user = "student"

### optional password
# password = ""

### directory for database files
# data_dir = "~/.studentdb"
"#;

impl StudentDbConfig {
    /// Load the configuration from a TOML file, then `STUDENTDB_*` environment variables.
    ///
    /// Without an explicit path `$HOME/.studentdb/studentdb.toml` is used.
    /// A missing file, a malformed file, or a missing `dbname`/`user` is an error.
    pub fn new(path: &Option<String>) -> Result<StudentDbConfig> {
        let path = match path {
            Some(p) => p.clone(),
            None => Self::config_file_path(),
        };

        if !Path::new(path.as_str()).exists() {
            bail!("Configuration file '{}' not found", path);
        }

        let settings = Config::builder()
            .add_source(config::File::new(path.as_str(), FileFormat::Toml))
            // Add in settings from the environment (with a prefix of STUDENTDB)
            // E.g., `STUDENTDB_DBNAME=test ./studentdb` would set the database name
            .add_source(config::Environment::with_prefix("STUDENTDB"))
            .build()
            .map_err(|e| anyhow!("Failed to build configuration from '{}': {}", path, e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    /// Build a configuration from already-parsed key/value pairs
    pub fn from_map(config: &HashMap<String, String>) -> Result<StudentDbConfig> {
        let dbname = required(config, "dbname")?;
        let user = required(config, "user")?;

        let password = config
            .get("password")
            .filter(|p| !p.is_empty())
            .cloned();

        let data_dir = match config.get("data_dir").filter(|d| !d.is_empty()) {
            Some(d) => expand_home(d),
            None => Self::default_data_dir(),
        };

        Ok(StudentDbConfig {
            dbname,
            user,
            password,
            data_dir,
        })
    }

    /// Configuration for a throwaway in-memory database
    pub fn in_memory(user: &str) -> StudentDbConfig {
        StudentDbConfig {
            dbname: IN_MEMORY_DBNAME.to_string(),
            user: user.to_string(),
            password: None,
            data_dir: Self::default_data_dir(),
        }
    }

    /// Get the path to the SQLite database file, `None` for in-memory databases
    pub fn sqlite_path(&self) -> Option<String> {
        if self.dbname == IN_MEMORY_DBNAME {
            return None;
        }
        if self.dbname.contains('/') || self.dbname.ends_with(".sqlite3") {
            return Some(expand_home(&self.dbname));
        }
        let data_dir = self.data_dir.trim_end_matches('/');
        Some(format!("{}/{}.sqlite3", data_dir, self.dbname))
    }

    /// Whether the database file lives in the data directory
    pub fn uses_data_dir(&self) -> bool {
        matches!(self.sqlite_path(), Some(p) if p.starts_with(self.data_dir.trim_end_matches('/')))
    }

    /// Log a warning for settings the embedded backend cannot honor
    pub fn warn_unused(&self) {
        if self.password.is_some() {
            warn!("password is set but the embedded SQLite backend does not authenticate");
        }
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let lines = [
            format!("Database:           {}", self.dbname),
            format!(
                "SQLite Path:        {}",
                self.sqlite_path()
                    .unwrap_or_else(|| "(in memory)".to_string())
            ),
            format!("User:               {}", self.user),
            format!(
                "Password:           {}",
                if self.password.is_some() {
                    "(set)"
                } else {
                    "(none)"
                }
            ),
            format!("Data Directory:     {}", self.data_dir),
        ];
        lines.join("\n")
    }

    /// Get the default config file path
    pub fn config_file_path() -> String {
        format!("{}/studentdb.toml", Self::default_data_dir())
    }

    fn default_data_dir() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        format!("{}/.studentdb", home_dir)
    }
}

fn required(config: &HashMap<String, String>, key: &str) -> Result<String> {
    match config.get(key) {
        Some(v) if !v.is_empty() => Ok(v.clone()),
        _ => Err(anyhow!("Missing required configuration key '{}'", key)),
    }
}

fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => format!("{}/{}", home.to_string_lossy(), rest),
        _ => path.to_string(),
    }
}
