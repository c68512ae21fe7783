// Summary statistics over a snapshot of expenses
//
// Everything here is recomputed from the full record set on every call.

use crate::core::clock::Clock;
use crate::db::Expense;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Totals derived from a set of expenses
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Sum of every amount
    pub total: f64,
    /// Sum of amounts dated in the clock's current month
    pub current_month_total: f64,
    /// Sum per category. Only categories that occur are present.
    pub categories: BTreeMap<String, f64>,
}

/// The `YYYY-MM` prefix shared by every ISO date in `date`'s month
pub fn current_month_prefix(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Summarize `expenses` as of the clock's current month
pub fn summarize(expenses: &[Expense], clock: &dyn Clock) -> Summary {
    let month = current_month_prefix(clock.today());
    let mut summary = Summary::default();

    for expense in expenses {
        summary.total += expense.amount;

        if expense.date.starts_with(&month) {
            summary.current_month_total += expense.amount;
        }

        *summary
            .categories
            .entry(expense.category.clone())
            .or_insert(0.0) += expense.amount;
    }

    summary
}

/// Distinct category labels present in `expenses`
pub fn distinct_categories(expenses: &[Expense]) -> BTreeSet<String> {
    expenses.iter().map(|e| e.category.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;

    const EPSILON: f64 = 1e-9;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    fn expense(id: i64, amount: f64, category: &str, date: &str) -> Expense {
        Expense {
            id,
            description: format!("expense {}", id),
            amount,
            category: category.to_string(),
            date: date.to_string(),
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(1, 4.5, "Food", "2024-03-01"),
            expense(2, 2.0, "Transportation", "2024-03-01"),
            expense(3, 900.0, "Housing", "2024-02-28"),
            expense(4, 12.25, "Food", "2024-03-14"),
            expense(5, -3.0, "Food", "2023-03-10"),
        ]
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize(&[], &clock());
        assert_eq!(summary, Summary::default());
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn test_totals() {
        let summary = summarize(&sample(), &clock());

        assert!((summary.total - 915.75).abs() < EPSILON);
        // 2024-03 only; the 2023-03 refund has the wrong year
        assert!((summary.current_month_total - 18.75).abs() < EPSILON);
        assert!((summary.categories["Food"] - 13.75).abs() < EPSILON);
        assert!((summary.categories["Housing"] - 900.0).abs() < EPSILON);
        assert_eq!(summary.categories.len(), 3);
    }

    #[test]
    fn test_total_ignores_order() {
        let forward = summarize(&sample(), &clock());
        let mut reversed = sample();
        reversed.reverse();
        let backward = summarize(&reversed, &clock());

        assert!((forward.total - backward.total).abs() < EPSILON);
        assert_eq!(
            forward.categories.keys().collect::<Vec<_>>(),
            backward.categories.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_categories_partition_total() {
        let summary = summarize(&sample(), &clock());
        let partitioned: f64 = summary.categories.values().sum();
        assert!((partitioned - summary.total).abs() < EPSILON);
    }

    #[test]
    fn test_month_boundary_follows_clock() {
        let expenses = sample();
        let april = FixedClock(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(summarize(&expenses, &april).current_month_total, 0.0);
    }

    #[test]
    fn test_month_prefix() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(current_month_prefix(date), "2024-01");
    }

    #[test]
    fn test_distinct_categories() {
        let categories = distinct_categories(&sample());
        assert_eq!(
            categories.into_iter().collect::<Vec<_>>(),
            vec!["Food", "Housing", "Transportation"]
        );
    }
}
