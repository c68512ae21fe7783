/// Process configuration
///
/// Read once at startup from the environment.

use crate::error::{ExpenseError, Result};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "EXPENSE_TRACKER_DB";
pub const LOG_FILTER_VAR: &str = "EXPENSE_TRACKER_LOG";
pub const LOG_FORMAT_VAR: &str = "EXPENSE_TRACKER_LOG_FORMAT";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ExpenseError::Config(format!(
                "unknown log format '{}' (expected 'compact' or 'json')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// `EnvFilter` directive, e.g. `info` or `expense_tracker_lib=debug`
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = match lookup(DB_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let log_filter = lookup(LOG_FILTER_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            database_path,
            log_filter,
            log_format,
        })
    }
}

/// `<data dir>/expense-tracker/expenses.db`, or `~/.expense-tracker/expenses.db`
fn default_database_path() -> Result<PathBuf> {
    if let Some(data) = dirs::data_dir() {
        return Ok(data.join("expense-tracker").join("expenses.db"));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| ExpenseError::Config("could not find a home directory".to_string()))?;
    Ok(home.join(".expense-tracker").join("expenses.db"))
}
