/// Error types for expense-tracker
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for expense-tracker operations
#[derive(Error, Debug)]
pub enum ExpenseError {
    /// Storage errors: database unreachable, statement failed, commit failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chart drawing failed
    #[error("Chart rendering error: {0}")]
    Chart(String),

    /// PNG encoding failed
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rejected user input (raised by the command-line front end only)
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for expense-tracker operations
pub type Result<T> = std::result::Result<T, ExpenseError>;

/// Convert ExpenseError to a user-friendly error message
impl ExpenseError {
    pub fn user_message(&self) -> String {
        match self {
            ExpenseError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            ExpenseError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            ExpenseError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            ExpenseError::Chart(msg) => {
                format!("Could not draw chart: {}", msg)
            }
            ExpenseError::Image(e) => {
                format!("Could not encode chart image: {}", e)
            }
            ExpenseError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            ExpenseError::InvalidExpense(reason) => {
                format!("Invalid expense: {}", reason)
            }
            ExpenseError::Generic(msg) => msg.clone(),
        }
    }
}
