//! Table rendering for the CLI
//!
//! Pure render-to-String functions so output stays testable; the CLI layer
//! decides when to print. Monetary values use Brazilian locale formatting.

use colored::Colorize;
use rust_decimal::Decimal;
use tabled::{settings::Style, Table, Tabled};

use crate::portfolio::{MetricRow, PortfolioTotals};
use crate::projection::Projection;
use crate::universe::UniverseEntry;
use crate::utils::{format_currency, format_pct};

#[derive(Tabled)]
struct UniverseRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    fund_type: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "DY 12m")]
    trailing_yield: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

/// Render the universe snapshot. Unknown cached values render as dashes.
pub fn universe_table(entries: &[UniverseEntry]) -> String {
    let rows: Vec<UniverseRow> = entries
        .iter()
        .map(|e| UniverseRow {
            ticker: e.ticker.clone(),
            name: e.name.clone(),
            fund_type: e.fund_type.clone(),
            price: if e.last_price > Decimal::ZERO {
                format_currency(e.last_price)
            } else {
                "-".to_string()
            },
            trailing_yield: if e.trailing_yield_pct > Decimal::ZERO {
                format_pct(e.trailing_yield_pct)
            } else {
                "-".to_string()
            },
            updated: if e.last_updated.is_empty() {
                "never".to_string()
            } else {
                e.last_updated.clone()
            },
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Qty")]
    quantity: i64,
    #[tabled(rename = "Avg Cost")]
    average_cost: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "DY 12m")]
    trailing_yield: String,
    #[tabled(rename = "Market Value")]
    market_value: String,
    #[tabled(rename = "Monthly Income")]
    monthly_income: String,
}

/// Render the per-position metrics table.
pub fn metrics_table(rows: &[MetricRow]) -> String {
    let table_rows: Vec<PositionRow> = rows
        .iter()
        .map(|r| PositionRow {
            ticker: r.ticker.clone(),
            quantity: r.quantity,
            average_cost: format_currency(r.average_cost),
            price: format_currency(r.current_price),
            change: format_pct(r.pct_change),
            trailing_yield: format_pct(r.trailing_yield_pct),
            market_value: format_currency(r.market_value),
            monthly_income: format_currency(r.monthly_income),
        })
        .collect();

    Table::new(table_rows).with(Style::rounded()).to_string()
}

/// Print the aggregate portfolio figures.
pub fn print_totals(totals: &PortfolioTotals) {
    println!(
        "{} {}",
        "Total market value:".bold(),
        format_currency(totals.market_value)
    );
    println!(
        "{} {}",
        "Est. monthly income:".bold(),
        format_currency(totals.monthly_income)
    );
    println!(
        "{} {}",
        "Average yield:".bold(),
        format_pct(totals.average_yield_pct)
    );
}

#[derive(Tabled)]
struct ProjectionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Wealth")]
    wealth: String,
    #[tabled(rename = "Monthly Income")]
    monthly_income: String,
}

fn format_currency_f64(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(d) => format_currency(d.round_dp(2)),
        None => format!("R$ {:.2}", value),
    }
}

/// Render the trajectory sampled yearly (every 12th month plus the final one).
pub fn projection_table(projection: &Projection) -> String {
    let last_idx = projection.points.len().saturating_sub(1);
    let rows: Vec<ProjectionRow> = projection
        .points
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 12 == 0 || *i == last_idx)
        .map(|(_, p)| ProjectionRow {
            date: p.date.format("%m/%Y").to_string(),
            wealth: format_currency_f64(p.wealth),
            monthly_income: format_currency_f64(p.monthly_income),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print the goal summary: time to independence, or how far the horizon got.
pub fn print_projection_summary(projection: &Projection, target_monthly_income: f64) {
    let Some(last) = projection.final_point() else {
        println!("{}", "Nothing to project (zero horizon).".yellow());
        return;
    };

    match projection.goal_in_years_months() {
        Some((years, months)) => {
            println!(
                "{} {}",
                "✓".green().bold(),
                format!(
                    "Financial independence reached in {} year(s) and {} month(s)",
                    years, months
                )
                .green()
            );
            println!(
                "  Target passive income: {}",
                format_currency_f64(target_monthly_income)
            );
        }
        None => {
            println!(
                "{} {}",
                "!".yellow().bold(),
                "Target not reached within the horizon.".yellow()
            );
            println!("  Consider raising the contribution, extending the horizon, or lowering the target.");
        }
    }

    println!("  Final wealth:  {}", format_currency_f64(last.wealth));
    println!(
        "  Final monthly income: {}",
        format_currency_f64(last.monthly_income)
    );
}
