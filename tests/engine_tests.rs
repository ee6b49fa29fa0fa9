//! Integration tests for the dashboard core
//!
//! These tests verify end-to-end flows across the stores and engines:
//! - buy/sell reconciliation persisted through the portfolio store
//! - metric resolution from the universe snapshot with live-source fallback
//! - projection seeding from portfolio totals and goal detection

use chrono::NaiveDate;
use fiitrack::portfolio::{compute_metrics, Portfolio};
use fiitrack::pricing::MarketData;
use fiitrack::projection::{simulate_from, ProjectionParams};
use fiitrack::store::{PortfolioStore, UniverseStore};
use fiitrack::universe::UniverseEntry;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use tempfile::TempDir;

#[derive(Default)]
struct FakeMarket {
    prices: HashMap<String, Decimal>,
    yields: HashMap<String, Decimal>,
}

impl MarketData for FakeMarket {
    async fn price(&self, ticker: &str) -> Option<Decimal> {
        self.prices.get(ticker).copied()
    }

    async fn trailing_yield(&self, ticker: &str) -> Option<Decimal> {
        self.yields.get(ticker).copied()
    }
}

fn snapshot_entry(ticker: &str, price: Decimal, yield_pct: Decimal) -> UniverseEntry {
    let mut entry = UniverseEntry::bare(ticker, ticker, "FII");
    entry.last_price = price;
    entry.trailing_yield_pct = yield_pct;
    entry.last_updated = "2025-01-10 12:00".to_string();
    entry
}

#[test]
fn test_operations_survive_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = PortfolioStore::at(dir.path().join("portfolio.json"));

    let mut portfolio = store.load().unwrap();
    portfolio.apply_operation("hglg11", 10, dec!(100));
    portfolio.prune();
    store.save(&portfolio).unwrap();

    // Separate session: buy more, then over-sell a second fund
    let mut portfolio = store.load().unwrap();
    portfolio.apply_operation("HGLG11", 10, dec!(200));
    portfolio.apply_operation("MXRF11", 50, dec!(10));
    portfolio.apply_operation("MXRF11", -80, dec!(11));
    portfolio.prune();
    store.save(&portfolio).unwrap();

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.positions.len(), 1);
    let pos = reloaded.find("HGLG11").unwrap();
    assert_eq!(pos.quantity, 20);
    assert_eq!(pos.average_cost, dec!(150));
}

#[tokio::test]
async fn test_metrics_prefer_snapshot_and_fall_back_to_live() {
    let mut portfolio = Portfolio::default();
    portfolio.apply_operation("HGLG11", 10, dec!(150));
    portfolio.apply_operation("VINO11", 100, dec!(9));
    portfolio.prune();

    // HGLG11 is cached; VINO11 is only known to the live sources
    let universe = vec![snapshot_entry("HGLG11", dec!(165), dec!(8.4))];
    let market = FakeMarket {
        prices: HashMap::from([
            // Snapshot must win over this stale live price
            ("HGLG11".to_string(), dec!(1)),
            ("VINO11".to_string(), dec!(8.50)),
        ]),
        yields: HashMap::from([("VINO11".to_string(), dec!(0.10))]),
    };

    let (rows, totals) = compute_metrics(&portfolio, &universe, &market).await;

    assert_eq!(rows[0].current_price, dec!(165));
    assert_eq!(rows[1].current_price, dec!(8.50));
    assert_eq!(rows[1].trailing_yield_pct, dec!(10));

    let expected_value = dec!(1650) + dec!(850);
    assert_eq!(totals.market_value, expected_value);
}

#[tokio::test]
async fn test_universe_refresh_feeds_metrics_without_live_calls() {
    let dir = TempDir::new().unwrap();
    let universe_store = UniverseStore::at(dir.path().join("universe.csv"));

    let mut entries = vec![UniverseEntry::bare("MXRF11", "MAXI RENDA", "FII")];
    let market = FakeMarket {
        prices: HashMap::from([("MXRF11".to_string(), dec!(10.50))]),
        yields: HashMap::from([("MXRF11".to_string(), dec!(0.12))]),
    };
    fiitrack::universe::refresh_universe(&mut entries, None, &market, |_, _, _| {}).await;
    universe_store.save(&entries).unwrap();

    let mut portfolio = Portfolio::default();
    portfolio.apply_operation("MXRF11", 100, dec!(10));
    portfolio.prune();

    // An empty market proves the snapshot alone resolves the quote
    let universe = universe_store.load().unwrap();
    let (rows, totals) = compute_metrics(&portfolio, &universe, &FakeMarket::default()).await;

    assert_eq!(rows[0].current_price, dec!(10.50));
    assert_eq!(rows[0].trailing_yield_pct, dec!(12));
    assert_eq!(totals.market_value, dec!(1050));
    // 12% / 100 * 10.50 / 12 * 100 = 10.50
    assert_eq!(totals.monthly_income, dec!(10.50));
}

#[tokio::test]
async fn test_projection_seeded_from_portfolio_totals() {
    let mut portfolio = Portfolio::default();
    portfolio.apply_operation("HGLG11", 300, dec!(160));
    portfolio.prune();

    let universe = vec![snapshot_entry("HGLG11", dec!(166.67), dec!(9))];
    let (_, totals) = compute_metrics(&portfolio, &universe, &FakeMarket::default()).await;

    let start_capital = totals.market_value.to_f64().unwrap();
    let current_income = totals.monthly_income.to_f64().unwrap();
    assert!(start_capital > 49_000.0 && start_capital < 51_000.0);

    let params = ProjectionParams {
        start_capital,
        current_monthly_income: current_income,
        monthly_contribution: 1_000.0,
        target_monthly_income: 5_000.0,
        yearly_return: 0.06,
        yearly_dividend_growth: 0.02,
        yearly_contribution_growth: 0.0,
        max_years: 40,
    };
    let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let projection = simulate_from(start, &params);

    assert_eq!(projection.points.len(), 40 * 12);
    assert_eq!(projection.points[0].wealth, start_capital);
    assert_eq!(projection.points[0].monthly_income, current_income);

    // R$ 5.000/month is reachable well inside 40 years with these inputs
    let goal = projection.goal_month.expect("goal should be reached");
    assert!(goal > 0);
    assert!(projection.points[goal].monthly_income >= 5_000.0);
    assert!(projection.points[goal - 1].monthly_income < 5_000.0);
}

#[test]
fn test_malformed_store_recovers_and_session_continues() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portfolio.json");
    std::fs::write(&path, r#"{"positions": [{"ticker": 12}]}"#).unwrap();

    let store = PortfolioStore::at(&path);
    let mut portfolio = store.load().unwrap();
    assert!(portfolio.is_empty());

    // The session continues: a fresh buy persists normally
    portfolio.apply_operation("BTLG11", 5, dec!(95.50));
    portfolio.prune();
    store.save(&portfolio).unwrap();

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.find("BTLG11").unwrap().quantity, 5);
}
