//! Command handlers
//!
//! Each handler is a full synchronous round trip: load state, compute, render,
//! save. Commands that may reach the quote API load the configuration up
//! front, so a missing Brapi key fails before any state is touched.

use anyhow::bail;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::info;

use crate::config;
use crate::error::{FiitrackError, Result};
use crate::portfolio::{compute_metrics, normalize_ticker};
use crate::pricing::LiveMarket;
use crate::projection::{simulate, ProjectionParams};
use crate::report;
use crate::store::{PortfolioStore, UniverseStore};
use crate::universe::{self, UniverseEntry};

use super::{Cli, Commands, PortfolioCommands};

pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Explore { search } => handle_explore(search.as_deref()),
        Commands::Refresh { search } => handle_refresh(search.as_deref()).await,
        Commands::Bootstrap => handle_bootstrap().await,
        Commands::Portfolio { action } => match action {
            PortfolioCommands::Show => handle_portfolio_show().await,
            PortfolioCommands::Buy {
                ticker,
                quantity,
                price,
            } => handle_operation(&ticker, quantity, price),
            PortfolioCommands::Sell {
                ticker,
                quantity,
                price,
            } => handle_operation(&ticker, -quantity, price),
        },
        Commands::Project {
            contribution,
            target,
            annual_return,
            dividend_growth,
            contribution_growth,
            years,
        } => {
            handle_project(
                contribution,
                target,
                annual_return / 100.0,
                dividend_growth / 100.0,
                contribution_growth / 100.0,
                years,
            )
            .await
        }
    }
}

fn handle_explore(search: Option<&str>) -> Result<()> {
    let entries = UniverseStore::open_default()?.load()?;
    if entries.is_empty() {
        println!(
            "{} Universe is empty. Run {} first.",
            "!".yellow().bold(),
            "fiitrack bootstrap".bold()
        );
        return Ok(());
    }

    let filtered: Vec<UniverseEntry> = entries
        .into_iter()
        .filter(|e| search.map(|s| e.matches_search(s)).unwrap_or(true))
        .collect();

    if filtered.is_empty() {
        println!("No funds match the search.");
        return Ok(());
    }

    println!("{}", report::universe_table(&filtered));
    println!("{} funds listed.", filtered.len());
    Ok(())
}

async fn handle_refresh(search: Option<&str>) -> Result<()> {
    let config = config::load()?;
    let market = LiveMarket::new(&config)?;

    let store = UniverseStore::open_default()?;
    let mut entries = store.load()?;
    if entries.is_empty() {
        println!(
            "{} Universe is empty. Run {} first.",
            "!".yellow().bold(),
            "fiitrack bootstrap".bold()
        );
        return Ok(());
    }

    let total = entries
        .iter()
        .filter(|e| search.map(|s| e.matches_search(s)).unwrap_or(true))
        .count() as u64;
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}").unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let refreshed = universe::refresh_universe(&mut entries, search, &market, |ticker, _, _| {
        bar.set_message(ticker.to_string());
        bar.inc(1);
    })
    .await;
    bar.finish_and_clear();

    store.save(&entries)?;
    println!(
        "{} Refreshed {} of {} universe entries.",
        "✓".green().bold(),
        refreshed,
        entries.len()
    );
    Ok(())
}

async fn handle_bootstrap() -> Result<()> {
    let config = config::load()?;
    let market = LiveMarket::new(&config)?;

    let bar = ProgressBar::new_spinner();
    let entries = universe::bootstrap_universe(market.client(), market.api_key(), |ticker, done, total| {
        bar.set_message(format!("{} ({}/{})", ticker, done, total));
        bar.tick();
    })
    .await?;
    bar.finish_and_clear();

    if entries.is_empty() {
        bail!("Bootstrap produced no universe entries");
    }

    UniverseStore::open_default()?.save(&entries)?;
    println!(
        "{} Universe rebuilt with {} funds.",
        "✓".green().bold(),
        entries.len()
    );
    Ok(())
}

async fn handle_portfolio_show() -> Result<()> {
    let portfolio = PortfolioStore::open_default()?.load()?;
    if portfolio.is_empty() {
        println!("Portfolio is empty. Add funds with {}.", "fiitrack portfolio buy".bold());
        return Ok(());
    }

    // Live fallback for tickers missing from the snapshot needs the API key
    let config = config::load()?;
    let market = LiveMarket::new(&config)?;
    let universe = UniverseStore::open_default()?.load()?;

    let (rows, totals) = compute_metrics(&portfolio, &universe, &market).await;

    println!("{}", report::metrics_table(&rows));
    report::print_totals(&totals);
    Ok(())
}

/// Validate and apply a buy/sell, then prune and persist.
fn handle_operation(ticker: &str, quantity_delta: i64, price: Decimal) -> Result<()> {
    validate_operation(ticker, quantity_delta, price)?;

    let store = PortfolioStore::open_default()?;
    let mut portfolio = store.load()?;

    portfolio.apply_operation(ticker, quantity_delta, price);
    portfolio.prune();
    store.save(&portfolio)?;

    let ticker = normalize_ticker(ticker);
    let verb = if quantity_delta > 0 { "Bought" } else { "Sold" };
    info!("{} {} x{}", verb, ticker, quantity_delta.abs());
    match portfolio.find(&ticker) {
        Some(pos) => println!(
            "{} {} {} quota(s) of {}. Position: {} @ {}",
            "✓".green().bold(),
            verb,
            quantity_delta.abs(),
            ticker,
            pos.quantity,
            crate::utils::format_currency(pos.average_cost)
        ),
        None => println!(
            "{} {} {} quota(s) of {}. Position closed.",
            "✓".green().bold(),
            verb,
            quantity_delta.abs(),
            ticker
        ),
    }
    Ok(())
}

fn validate_operation(ticker: &str, quantity_delta: i64, price: Decimal) -> Result<()> {
    if normalize_ticker(ticker).is_empty() {
        return Err(FiitrackError::Validation("ticker must not be empty".to_string()).into());
    }
    if quantity_delta == 0 {
        return Err(FiitrackError::Validation("quantity must not be zero".to_string()).into());
    }
    if price <= Decimal::ZERO {
        return Err(
            FiitrackError::Validation("operation price must be positive".to_string()).into(),
        );
    }
    Ok(())
}

async fn handle_project(
    contribution: f64,
    target: f64,
    yearly_return: f64,
    yearly_dividend_growth: f64,
    yearly_contribution_growth: f64,
    years: u32,
) -> Result<()> {
    let portfolio = PortfolioStore::open_default()?.load()?;

    // Seed the simulation from current portfolio totals; an empty portfolio
    // starts from zero capital and the engine's default implied yield.
    let (start_capital, current_income) = if portfolio.is_empty() {
        (0.0, 0.0)
    } else {
        let config = config::load()?;
        let market = LiveMarket::new(&config)?;
        let universe = UniverseStore::open_default()?.load()?;
        let (_, totals) = compute_metrics(&portfolio, &universe, &market).await;
        (
            totals.market_value.to_f64().unwrap_or(0.0),
            totals.monthly_income.to_f64().unwrap_or(0.0),
        )
    };

    println!(
        "Current wealth: {}   Current monthly income: {}",
        crate::utils::format_currency(
            Decimal::from_f64_retain(start_capital).unwrap_or(Decimal::ZERO)
        ),
        crate::utils::format_currency(
            Decimal::from_f64_retain(current_income).unwrap_or(Decimal::ZERO)
        )
    );

    let params = ProjectionParams {
        start_capital,
        current_monthly_income: current_income,
        monthly_contribution: contribution,
        target_monthly_income: target,
        yearly_return,
        yearly_dividend_growth,
        yearly_contribution_growth,
        max_years: years,
    };
    let projection = simulate(&params);

    println!("{}", report::projection_table(&projection));
    report::print_projection_summary(&projection, target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_rejects_empty_ticker() {
        let result = validate_operation("  ", 10, dec!(100));
        assert!(result.unwrap_err().to_string().contains("ticker"));
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let result = validate_operation("HGLG11", 0, dec!(100));
        assert!(result.unwrap_err().to_string().contains("quantity"));
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        assert!(validate_operation("HGLG11", 10, dec!(0)).is_err());
        assert!(validate_operation("HGLG11", 10, dec!(-5)).is_err());
    }

    #[test]
    fn test_validate_accepts_sane_operation() {
        assert!(validate_operation("hglg11", -5, dec!(99.90)).is_ok());
    }
}
