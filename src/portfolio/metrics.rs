//! Per-position and aggregate portfolio metrics
//!
//! Price and yield resolution prefers the persisted universe snapshot; only
//! tickers missing from it (or cached with an unknown price) fall back to live
//! market lookups. Unavailable data degrades to zero, so an offline session
//! still renders a complete table.

use rust_decimal::Decimal;
use tracing::debug;

use crate::pricing::MarketData;
use crate::universe::UniverseEntry;

use super::Portfolio;

/// Derived metrics for one position. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub ticker: String,
    pub quantity: i64,
    pub average_cost: Decimal,
    pub current_price: Decimal,
    /// Percent change of the current price over the average cost.
    pub pct_change: Decimal,
    pub trailing_yield_pct: Decimal,
    pub market_value: Decimal,
    pub monthly_income: Decimal,
}

/// Aggregates over all metric rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioTotals {
    pub market_value: Decimal,
    pub monthly_income: Decimal,
    pub average_yield_pct: Decimal,
}

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Compute metric rows and totals for every position.
///
/// An empty portfolio yields an empty row set and all-zero totals.
pub async fn compute_metrics<M: MarketData>(
    portfolio: &Portfolio,
    universe: &[UniverseEntry],
    market: &M,
) -> (Vec<MetricRow>, PortfolioTotals) {
    let mut rows = Vec::with_capacity(portfolio.positions.len());

    for pos in &portfolio.positions {
        let (price, yield_pct) = resolve_quote(&pos.ticker, universe, market).await;

        let quantity = Decimal::from(pos.quantity);
        let market_value = quantity * price;
        let pct_change = if pos.average_cost > Decimal::ZERO {
            (price - pos.average_cost) / pos.average_cost * HUNDRED
        } else {
            Decimal::ZERO
        };
        let monthly_income = yield_pct / HUNDRED * price / MONTHS_PER_YEAR * quantity;

        rows.push(MetricRow {
            ticker: pos.ticker.clone(),
            quantity: pos.quantity,
            average_cost: pos.average_cost,
            current_price: price,
            pct_change,
            trailing_yield_pct: yield_pct,
            market_value,
            monthly_income,
        });
    }

    let totals = aggregate(&rows);
    (rows, totals)
}

/// Resolve (price, yield pct) for a ticker: universe snapshot first, live
/// sources as fallback, zero when nothing is available.
async fn resolve_quote<M: MarketData>(
    ticker: &str,
    universe: &[UniverseEntry],
    market: &M,
) -> (Decimal, Decimal) {
    if let Some(entry) = universe.iter().find(|e| e.ticker == ticker) {
        if entry.last_price > Decimal::ZERO {
            return (entry.last_price, entry.trailing_yield_pct);
        }
    }

    debug!("No cached quote for {}, falling back to live sources", ticker);
    let price = market.price(ticker).await.unwrap_or(Decimal::ZERO);
    let yield_pct = market
        .trailing_yield(ticker)
        .await
        .map(|fraction| fraction * HUNDRED)
        .unwrap_or(Decimal::ZERO);

    (price, yield_pct)
}

fn aggregate(rows: &[MetricRow]) -> PortfolioTotals {
    let market_value: Decimal = rows.iter().map(|r| r.market_value).sum();
    let monthly_income: Decimal = rows.iter().map(|r| r.monthly_income).sum();
    let average_yield_pct = if market_value > Decimal::ZERO {
        monthly_income * MONTHS_PER_YEAR / market_value * HUNDRED
    } else {
        Decimal::ZERO
    };

    PortfolioTotals {
        market_value,
        monthly_income,
        average_yield_pct,
    }
}
