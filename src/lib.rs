/// expense-tracker library
///
/// Record expenses, summarize them, and chart spending by category and by day.

pub mod chart;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod telemetry;

// Re-exports for convenience
pub use crate::core::{ExpenseBook, Summary};
pub use db::Database;
pub use error::{ExpenseError, Result};
