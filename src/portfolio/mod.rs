//! Portfolio engine
//!
//! Reconciles buy/sell operations into position state using a quantity-weighted
//! average cost (preço médio), and derives per-position and aggregate metrics.
//! All quantities and prices are `Decimal`; the engine is total over its inputs
//! and leaves validation to the CLI layer.

pub mod metrics;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use metrics::{compute_metrics, MetricRow, PortfolioTotals};

/// A single FII holding.
///
/// The JSON field is `avg_price` for compatibility with portfolio documents
/// written by earlier versions of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub ticker: String,
    pub quantity: i64,
    #[serde(rename = "avg_price")]
    pub average_cost: Decimal,
}

/// Ordered collection of positions, ticker unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default)]
    pub positions: Vec<Position>,
}

/// Normalize a user-entered ticker for lookups: trimmed and upper-cased.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl Portfolio {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn find(&self, ticker: &str) -> Option<&Position> {
        let ticker = normalize_ticker(ticker);
        self.positions.iter().find(|p| p.ticker == ticker)
    }

    /// Apply a buy (positive delta) or sell (negative delta) at the given price.
    ///
    /// An over-sell zeroes the position out instead of going negative; callers
    /// must [`prune`](Self::prune) afterwards to drop emptied positions. The
    /// caller is responsible for ensuring `operation_price > 0`.
    pub fn apply_operation(&mut self, ticker: &str, quantity_delta: i64, operation_price: Decimal) {
        let ticker = normalize_ticker(ticker);

        if let Some(pos) = self.positions.iter_mut().find(|p| p.ticker == ticker) {
            let new_quantity = pos.quantity + quantity_delta;
            if new_quantity <= 0 {
                pos.quantity = 0;
                pos.average_cost = Decimal::ZERO;
            } else {
                // Sells go through the same blend as buys; a sell priced away
                // from the current average shifts it.
                let old_qty = Decimal::from(pos.quantity);
                let delta = Decimal::from(quantity_delta);
                pos.average_cost =
                    (old_qty * pos.average_cost + delta * operation_price) / Decimal::from(new_quantity);
                pos.quantity = new_quantity;
            }
            return;
        }

        self.positions.push(Position {
            ticker,
            quantity: quantity_delta,
            average_cost: operation_price,
        });
    }

    /// Drop positions whose quantity reached zero.
    pub fn prune(&mut self) {
        self.positions.retain(|p| p.quantity > 0);
    }
}
