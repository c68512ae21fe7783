// The expense book: store, clock and charts behind one handle
//
// This is what a front end talks to. It owns no state of its own beyond the
// shared database handle and the clock.

use crate::chart::{self, ChartImage};
use crate::core::clock::{Clock, SystemClock};
use crate::core::summary::{self, Summary};
use crate::core::window::TrailingWindow;
use crate::db::{DailyTotal, Database, Expense, ExpenseFilter, NewExpense};
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything the overview page shows
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub expenses: Vec<Expense>,
    pub summary: Summary,
    pub categories: BTreeSet<String>,
    pub category_chart: Option<ChartImage>,
    pub daily_chart: Option<ChartImage>,
}

pub struct ExpenseBook {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl ExpenseBook {
    /// Create a book on the local wall clock
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Record an expense and return its id
    pub async fn add(&self, expense: &NewExpense) -> Result<i64> {
        let id = self.db.insert_expense(expense).await?;
        info!(id, amount = expense.amount, category = %expense.category, "Recorded expense");
        Ok(id)
    }

    /// Remove an expense. Unknown ids are ignored.
    pub async fn remove(&self, id: i64) -> Result<bool> {
        let removed = self.db.delete_expense(id).await?;
        if removed {
            info!(id, "Removed expense");
        }
        Ok(removed)
    }

    pub async fn list(&self) -> Result<Vec<Expense>> {
        self.db.list_expenses().await
    }

    pub async fn filter(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        self.db.filter_expenses(filter).await
    }

    /// Categories currently in use
    pub async fn categories(&self) -> Result<Vec<String>> {
        self.db.categories().await
    }

    /// Summary over every stored expense
    pub async fn summary(&self) -> Result<Summary> {
        let expenses = self.db.list_expenses().await?;
        Ok(summary::summarize(&expenses, self.clock.as_ref()))
    }

    /// The window ending at the clock's today
    pub fn window(&self) -> TrailingWindow {
        TrailingWindow::ending(self.clock.today())
    }

    /// Per-date totals for the trailing seven days, oldest first
    pub async fn daily_totals(&self) -> Result<Vec<DailyTotal>> {
        let window = self.window();
        self.db
            .daily_totals_between(&window.start_key(), &window.end_key())
            .await
    }

    pub async fn category_chart(&self) -> Result<Option<ChartImage>> {
        let summary = self.summary().await?;
        chart::render_category_chart(&summary.categories)
    }

    pub async fn daily_chart(&self) -> Result<Option<ChartImage>> {
        let daily = self.daily_totals().await?;
        chart::render_daily_chart(&daily)
    }

    /// Build the full overview from one scan plus the windowed query
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let expenses = self.db.list_expenses().await?;
        let summary = summary::summarize(&expenses, self.clock.as_ref());
        let categories = summary::distinct_categories(&expenses);
        let daily = self.daily_totals().await?;

        let category_chart = chart::render_category_chart(&summary.categories)?;
        let daily_chart = chart::render_daily_chart(&daily)?;

        debug!(
            expenses = expenses.len(),
            days = daily.len(),
            "Built dashboard"
        );

        Ok(Dashboard {
            expenses,
            summary,
            categories,
            category_chart,
            daily_chart,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use chrono::{Duration, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    async fn setup() -> ExpenseBook {
        let db = Arc::new(Database::in_memory().await.unwrap());
        ExpenseBook::with_clock(db, Arc::new(FixedClock(today())))
    }

    fn days_ago(days: i64) -> String {
        (today() - Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let book = setup().await;

        let id = book
            .add(&NewExpense::new("Coffee", 4.5, "Food", "2024-03-01"))
            .await
            .unwrap();
        assert_eq!(book.list().await.unwrap().len(), 1);

        assert!(book.remove(id).await.unwrap());
        assert!(!book.remove(id).await.unwrap());
        assert!(book.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_uses_injected_clock() {
        let book = setup().await;
        book.add(&NewExpense::new("Rent", 900.0, "Housing", "2024-02-01"))
            .await
            .unwrap();
        book.add(&NewExpense::new("Lunch", 12.0, "Food", "2024-03-02"))
            .await
            .unwrap();

        let summary = book.summary().await.unwrap();
        assert_eq!(summary.total, 912.0);
        assert_eq!(summary.current_month_total, 12.0);
    }

    #[tokio::test]
    async fn test_daily_totals_window() {
        let book = setup().await;
        for (amount, offset) in [(5.0, 0), (10.0, 1), (20.0, 10), (1.0, 6), (2.0, 7)] {
            book.add(&NewExpense::new("x", amount, "Food", days_ago(offset)))
                .await
                .unwrap();
        }

        let daily = book.daily_totals().await.unwrap();
        let dates: Vec<&str> = daily.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec![days_ago(6), days_ago(1), days_ago(0)]);
        assert_eq!(daily[1].total, 10.0);
        assert_eq!(daily[2].total, 5.0);
    }

    #[tokio::test]
    async fn test_empty_book_has_no_charts() {
        let book = setup().await;
        assert!(book.category_chart().await.unwrap().is_none());
        assert!(book.daily_chart().await.unwrap().is_none());
        assert!(book.daily_totals().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dashboard() {
        let book = setup().await;
        book.add(&NewExpense::new("Coffee", 4.5, "Food", days_ago(0)))
            .await
            .unwrap();
        book.add(&NewExpense::new("Bus", 2.0, "Transportation", days_ago(30)))
            .await
            .unwrap();

        let dashboard = book.dashboard().await.unwrap();
        assert_eq!(dashboard.expenses.len(), 2);
        assert_eq!(dashboard.summary.total, 6.5);
        assert_eq!(
            dashboard.categories.iter().collect::<Vec<_>>(),
            vec!["Food", "Transportation"]
        );
        assert!(dashboard.category_chart.is_some());
        assert!(dashboard.daily_chart.is_some());

        let json = serde_json::to_value(&dashboard).unwrap();
        assert!(!json["category_chart"]["base64"].as_str().unwrap().is_empty());
    }
}
