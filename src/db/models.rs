/// Data models for the expense store
///
/// `Expense` maps to the `expenses` table; the rest are inputs and query shapes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category filter value that disables category filtering
pub const ALL_CATEGORIES: &str = "all";

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: String, // YYYY-MM-DD
}

/// Input for recording a new expense. The store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
}

impl NewExpense {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            date: date.into(),
        }
    }
}

/// Sum of amounts recorded on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DailyTotal {
    pub date: String,
    pub total: f64,
}

/// Category restriction for filtered listings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    /// Interpret a raw filter value. `"all"` and the empty string mean no filter.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Exact(raw.to_string())
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "{}", ALL_CATEGORIES),
            CategoryFilter::Exact(name) => write!(f, "{}", name),
        }
    }
}

/// Search criteria for `list_filtered`; both parts must match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    /// Case-insensitive substring of the description. Empty matches everything.
    pub search: String,
    pub category: CategoryFilter,
}

impl ExpenseFilter {
    pub fn new(search: impl Into<String>, category: &str) -> Self {
        Self {
            search: search.into(),
            category: CategoryFilter::parse(category),
        }
    }

    /// True when neither part restricts the result
    pub fn is_unrestricted(&self) -> bool {
        self.search.is_empty() && self.category == CategoryFilter::All
    }
}
