//! Trailing dividend-yield estimation from public fund sites
//!
//! Providers are tried in fixed priority order (Funds Explorer first, then
//! Status Invest); the first positive, sane value wins. Anything a provider
//! scrapes outside the open interval (0%, 50%) is treated as not-found to keep
//! scraping garbage out of the engines.

pub mod fundsexplorer;
pub mod statusinvest;

use reqwest::Client;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Ranked yield providers, first success wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YieldProvider {
    FundsExplorer,
    StatusInvest,
}

pub const PROVIDER_CHAIN: &[YieldProvider] =
    &[YieldProvider::FundsExplorer, YieldProvider::StatusInvest];

impl YieldProvider {
    pub fn name(self) -> &'static str {
        match self {
            YieldProvider::FundsExplorer => "Funds Explorer",
            YieldProvider::StatusInvest => "Status Invest",
        }
    }

    async fn fetch(self, client: &Client, ticker: &str) -> Option<Decimal> {
        match self {
            YieldProvider::FundsExplorer => fundsexplorer::fetch_yield(client, ticker).await,
            YieldProvider::StatusInvest => statusinvest::fetch_yield(client, ticker).await,
        }
    }
}

/// Upper sanity bound for a trailing-12-month yield, in percent.
const MAX_SANE_YIELD_PCT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Accept a scraped percentage only when it is in (0, 50); convert to a fraction.
pub(crate) fn accept_yield_pct(pct: Decimal) -> Option<Decimal> {
    if pct > Decimal::ZERO && pct < MAX_SANE_YIELD_PCT {
        Some(pct / Decimal::ONE_HUNDRED)
    } else {
        None
    }
}

/// Estimate the trailing-12-month yield for a ticker as a fraction in (0, 0.5).
///
/// Returns `None` when every provider fails or reports an insane value; errors
/// never cross this boundary.
pub async fn estimate_trailing_yield(client: &Client, ticker: &str) -> Option<Decimal> {
    for provider in PROVIDER_CHAIN {
        match provider.fetch(client, ticker).await {
            Some(fraction) => {
                debug!(
                    "{} yield for {}: {}",
                    provider.name(),
                    ticker,
                    fraction
                );
                return Some(fraction);
            }
            None => {
                warn!("{} had no usable yield for {}", provider.name(), ticker);
            }
        }
    }
    None
}
