// expense-tracker - where did the money go?
//
// This is the main entry point. Parses CLI args and dispatches to handlers.
// Input validation lives here; the library stores whatever it's given.

use anyhow::Context;
use chrono::NaiveDate;
use expense_tracker_lib::{
    chart::ChartImage,
    config::Config,
    core::{Clock, SystemClock},
    db::{ExpenseFilter, NewExpense, ALL_CATEGORIES},
    telemetry, Database, ExpenseBook, ExpenseError,
};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = args[1].as_str();
    match command {
        "version" | "-v" | "--version" => {
            println!("expense-tracker v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        "help" | "-h" | "--help" => {
            print_usage();
            return Ok(());
        }
        _ => {}
    }

    let config = Config::from_env().context("reading configuration")?;
    telemetry::init(&config).context("initializing logging")?;

    let db = Database::new(&config.database_path)
        .await
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    let db = Arc::new(db);
    let book = ExpenseBook::new(Arc::clone(&db));

    let outcome = match command {
        "add" => handle_add(&book, &args[2..]).await,
        "delete" => handle_delete(&book, &args[2..]).await,
        "list" => handle_list(&book).await,
        "filter" => handle_filter(&book, &args[2..]).await,
        "summary" => handle_summary(&book).await,
        "daily" => handle_daily(&book).await,
        "chart" => handle_chart(&book, &args[2..]).await,
        "categories" => handle_categories(&book).await,
        "status" => handle_status(&db).await,
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    };

    db.close().await;

    if let Err(e) = outcome {
        eprintln!("✗ {}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

/// Validate `add` arguments: description, amount, category, optional date
fn parse_new_expense(args: &[String], today: NaiveDate) -> Result<NewExpense, ExpenseError> {
    let [description, amount, category, rest @ ..] = args else {
        return Err(ExpenseError::InvalidExpense(
            "usage: add <description> <amount> <category> [YYYY-MM-DD]".to_string(),
        ));
    };

    let description = description.trim();
    if description.is_empty() {
        return Err(ExpenseError::InvalidExpense(
            "description must not be empty".to_string(),
        ));
    }

    let amount: f64 = amount
        .trim()
        .parse()
        .ok()
        .filter(|a: &f64| a.is_finite())
        .ok_or_else(|| ExpenseError::InvalidExpense(format!("'{}' is not an amount", amount)))?;

    let category = category.trim();
    if category.is_empty() {
        return Err(ExpenseError::InvalidExpense(
            "category must not be empty".to_string(),
        ));
    }

    let date = match rest.first() {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            ExpenseError::InvalidExpense(format!("'{}' is not a YYYY-MM-DD date", raw))
        })?,
        None => today,
    };

    Ok(NewExpense::new(
        description,
        amount,
        category,
        date.format("%Y-%m-%d").to_string(),
    ))
}

async fn handle_add(book: &ExpenseBook, args: &[String]) -> Result<(), ExpenseError> {
    let expense = parse_new_expense(args, SystemClock.today())?;
    let id = book.add(&expense).await?;
    println!(
        "✓ Added #{}: {} ${:.2} ({}, {})",
        id, expense.description, expense.amount, expense.category, expense.date
    );
    Ok(())
}

async fn handle_delete(book: &ExpenseBook, args: &[String]) -> Result<(), ExpenseError> {
    let id: i64 = args
        .first()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ExpenseError::InvalidExpense("usage: delete <id>".to_string()))?;

    if book.remove(id).await? {
        println!("✓ Deleted #{}", id);
    } else {
        println!("Nothing to delete: #{} does not exist", id);
    }
    Ok(())
}

async fn handle_list(book: &ExpenseBook) -> Result<(), ExpenseError> {
    let expenses = book.list().await?;

    if expenses.is_empty() {
        println!("No expenses recorded.");
        return Ok(());
    }

    println!("{}", "=".repeat(72));
    for expense in &expenses {
        println!(
            "{:>5}  {}  {:<30} {:<16} {:>10.2}",
            expense.id, expense.date, expense.description, expense.category, expense.amount
        );
    }
    println!("{}", "=".repeat(72));
    Ok(())
}

async fn handle_filter(book: &ExpenseBook, args: &[String]) -> Result<(), ExpenseError> {
    let mut search = String::new();
    let mut category = ALL_CATEGORIES.to_string();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--search" => {
                i += 1;
                if let Some(term) = args.get(i) {
                    search = term.clone();
                }
            }
            "--category" => {
                i += 1;
                if let Some(name) = args.get(i) {
                    category = name.clone();
                }
            }
            other => {
                return Err(ExpenseError::InvalidExpense(format!(
                    "unexpected filter argument '{}'",
                    other
                )))
            }
        }
        i += 1;
    }

    let expenses = book.filter(&ExpenseFilter::new(search, &category)).await?;
    let body = serde_json::json!({ "expenses": expenses });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

async fn handle_summary(book: &ExpenseBook) -> Result<(), ExpenseError> {
    let summary = book.summary().await?;

    println!("\nSpending Summary");
    println!("{}", "=".repeat(40));
    println!("  Total:          ${:>12.2}", summary.total);
    println!("  This month:     ${:>12.2}", summary.current_month_total);

    if !summary.categories.is_empty() {
        println!("\nBy category:");
        for (category, total) in &summary.categories {
            println!("  {:<16}${:>12.2}", category, total);
        }
    }
    println!("{}", "=".repeat(40));
    Ok(())
}

async fn handle_daily(book: &ExpenseBook) -> Result<(), ExpenseError> {
    let window = book.window();
    let daily = book.daily_totals().await?;

    println!("\nDaily spending {} .. {}", window.start_key(), window.end_key());
    if daily.is_empty() {
        println!("  No expenses in the last 7 days.");
    }
    for day in &daily {
        println!("  {}  ${:>10.2}", day.date, day.total);
    }
    Ok(())
}

async fn handle_chart(book: &ExpenseBook, args: &[String]) -> Result<(), ExpenseError> {
    let kind = args.first().map(String::as_str).unwrap_or("");
    let out = match args.get(1).map(String::as_str) {
        Some("--out") => Some(args.get(2).ok_or_else(|| {
            ExpenseError::InvalidExpense("--out needs a file path".to_string())
        })?),
        Some(other) => {
            return Err(ExpenseError::InvalidExpense(format!(
                "unexpected chart argument '{}'",
                other
            )))
        }
        None => None,
    };

    let chart: Option<ChartImage> = match kind {
        "category" => book.category_chart().await?,
        "daily" => book.daily_chart().await?,
        _ => {
            return Err(ExpenseError::InvalidExpense(
                "usage: chart <category|daily> [--out FILE]".to_string(),
            ))
        }
    };

    let Some(chart) = chart else {
        println!("No data to chart.");
        return Ok(());
    };

    match out {
        Some(path) => {
            std::fs::write(path, chart.png_bytes())?;
            println!("✓ Wrote {}", path);
        }
        None => println!("{}", chart.data_uri()),
    }
    Ok(())
}

async fn handle_categories(book: &ExpenseBook) -> Result<(), ExpenseError> {
    for category in book.categories().await? {
        println!("{}", category);
    }
    Ok(())
}

async fn handle_status(db: &Database) -> Result<(), ExpenseError> {
    let stats = db.stats().await?;

    println!("\nexpense-tracker Status");
    println!("{}", "=".repeat(60));
    println!("  Database:    {}", db.path().display());
    println!("  Expenses:    {}", stats.total_expenses);
    println!("  Connections: {} ({} idle)", stats.pool_size, stats.idle_connections);
    println!("{}", "=".repeat(60));
    Ok(())
}

fn print_usage() {
    println!(
        r#"expense-tracker v{} - Keep an eye on where the money goes

USAGE:
    expense-tracker <COMMAND> [OPTIONS]

COMMANDS:
    add <description> <amount> <category> [date]
                                 Record an expense (date defaults to today)
    delete <id>                  Delete an expense
    list                         List all expenses, newest first
    filter [--search TERM] [--category NAME]
                                 Filtered listing as JSON
    summary                      Totals overall, this month, per category
    daily                        Totals per day for the last 7 days
    chart <category|daily> [--out FILE]
                                 Render a chart (PNG file or data URI)
    categories                   List categories in use
    status                       Show database stats
    version                      Show version
    help                         Show this help

ENVIRONMENT:
    EXPENSE_TRACKER_DB           Database file (default: <data dir>/expense-tracker/expenses.db)
    EXPENSE_TRACKER_LOG          Log filter, e.g. info or expense_tracker_lib=debug
    EXPENSE_TRACKER_LOG_FORMAT   compact (default) or json

EXAMPLES:
    expense-tracker add "Coffee" 4.50 Food 2024-03-01
    expense-tracker filter --search cof --category all
    expense-tracker chart category --out categories.png
"#,
        env!("CARGO_PKG_VERSION")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_parse_full_expense() {
        let expense =
            parse_new_expense(&args(&["Coffee", "4.50", "Food", "2024-03-01"]), today()).unwrap();
        assert_eq!(expense.description, "Coffee");
        assert_eq!(expense.amount, 4.5);
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.date, "2024-03-01");
    }

    #[test]
    fn test_parse_defaults_date_to_today() {
        let expense = parse_new_expense(&args(&["Bus", "2", "Transportation"]), today()).unwrap();
        assert_eq!(expense.date, "2024-03-10");
    }

    #[test]
    fn test_parse_accepts_refunds() {
        let expense = parse_new_expense(&args(&["Refund", "-12.5", "Food"]), today()).unwrap();
        assert_eq!(expense.amount, -12.5);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        let cases = [
            args(&["Coffee", "4.50"]),
            args(&["  ", "4.50", "Food"]),
            args(&["Coffee", "four", "Food"]),
            args(&["Coffee", "inf", "Food"]),
            args(&["Coffee", "4.50", ""]),
            args(&["Coffee", "4.50", "Food", "03/01/2024"]),
        ];

        for case in &cases {
            assert!(
                matches!(
                    parse_new_expense(case, today()),
                    Err(ExpenseError::InvalidExpense(_))
                ),
                "accepted {:?}",
                case
            );
        }
    }
}
