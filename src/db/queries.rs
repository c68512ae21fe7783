/// The statement set for the expense store
///
/// Every statement binds its parameters; nothing user-supplied is spliced into SQL.

use crate::db::models::*;
use crate::db::Database;
use crate::error::Result;
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::debug;

const SELECT_EXPENSES: &str = "SELECT id, description, amount, category, date FROM expenses";

/// Turn a search term into a LIKE pattern matching it as a literal substring
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

impl Database {
    /// Record a new expense
    ///
    /// Field contents are stored as given; validation belongs to the caller.
    ///
    /// # Returns
    /// * `Ok(i64)` - The id assigned by the store
    /// * `Err(ExpenseError)` - If the write cannot be committed
    pub async fn insert_expense(&self, input: &NewExpense) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO expenses (description, amount, category, date)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&input.description)
        .bind(input.amount)
        .bind(&input.category)
        .bind(&input.date)
        .fetch_one(self.pool())
        .await?;

        let id: i64 = row.get(0);
        debug!(id, category = %input.category, date = %input.date, "Inserted expense");
        Ok(id)
    }

    /// Delete an expense by id
    ///
    /// Deleting a missing id is not an error.
    ///
    /// # Returns
    /// * `Ok(true)` if a row was removed, `Ok(false)` if there was nothing to remove
    pub async fn delete_expense(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        let removed = result.rows_affected() > 0;
        debug!(id, removed, "Deleted expense");
        Ok(removed)
    }

    /// Get expense by id
    pub async fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(
            "SELECT id, description, amount, category, date FROM expenses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(expense)
    }

    /// All expenses, newest date first
    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            "SELECT id, description, amount, category, date FROM expenses ORDER BY date DESC, id DESC",
        )
        .fetch_all(self.pool())
        .await?;

        debug!(count = expenses.len(), "Listed expenses");
        Ok(expenses)
    }

    /// Expenses matching `filter`, newest date first
    ///
    /// # Arguments
    /// * `filter` - description substring (case-insensitive) and category restriction
    pub async fn filter_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_EXPENSES);
        builder.push(" WHERE 1=1");

        if !filter.search.is_empty() {
            builder.push(" AND LOWER(description) LIKE ");
            builder.push_bind(like_pattern(&filter.search));
            builder.push(" ESCAPE '\\'");
        }

        if let CategoryFilter::Exact(category) = &filter.category {
            builder.push(" AND category = ");
            builder.push_bind(category.clone());
        }

        builder.push(" ORDER BY date DESC, id DESC");

        let expenses = builder
            .build_query_as::<Expense>()
            .fetch_all(self.pool())
            .await?;

        debug!(
            search = %filter.search,
            category = %filter.category,
            count = expenses.len(),
            "Filtered expenses"
        );
        Ok(expenses)
    }

    /// Per-date sums for dates in `start..=end`, oldest first
    ///
    /// Dates compare as ISO strings. Days without expenses are absent.
    pub async fn daily_totals_between(&self, start: &str, end: &str) -> Result<Vec<DailyTotal>> {
        let totals = sqlx::query_as::<_, DailyTotal>(
            r#"
            SELECT date, SUM(amount) AS total
            FROM expenses
            WHERE date >= ? AND date <= ?
            GROUP BY date
            ORDER BY date ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;

        debug!(start, end, days = totals.len(), "Summed daily totals");
        Ok(totals)
    }

    /// Distinct category labels in use, sorted
    pub async fn categories(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT DISTINCT category FROM expenses ORDER BY category")
            .fetch_all(self.pool())
            .await?;

        Ok(rows.iter().map(|row| row.get::<String, _>(0)).collect())
    }
}
