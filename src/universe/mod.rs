//! Tradable fund universe - cached snapshot, refresh and bootstrap
//!
//! The universe is the table of tickers the explore page works from. Price
//! and yield columns are cached values, refreshed only on explicit user
//! action. Bootstrap builds the ticker list itself: the Brapi full listing
//! when it answers, otherwise a fixed list of known IFIX constituents fetched
//! one by one.

use chrono::Local;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::pricing::{brapi, MarketData};

/// One row of the universe snapshot. Zero price/yield and an empty timestamp
/// mean "never refreshed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseEntry {
    pub ticker: String,
    pub name: String,
    pub fund_type: String,
    #[serde(default)]
    pub last_price: Decimal,
    #[serde(default)]
    pub trailing_yield_pct: Decimal,
    #[serde(default)]
    pub last_updated: String,
}

impl UniverseEntry {
    /// Entry with no cached market data yet.
    pub fn bare(ticker: &str, name: &str, fund_type: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: name.to_string(),
            fund_type: fund_type.to_string(),
            last_price: Decimal::ZERO,
            trailing_yield_pct: Decimal::ZERO,
            last_updated: String::new(),
        }
    }

    /// Case-insensitive substring match over ticker and name.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_uppercase();
        needle.is_empty()
            || self.ticker.to_uppercase().contains(&needle)
            || self.name.to_uppercase().contains(&needle)
    }
}

/// Known IFIX constituents used when the Brapi listing is unavailable.
pub const FALLBACK_TICKERS: &[&str] = &[
    "HGLG11", "KNRI11", "XPML11", "BTLG11", "VISC11", "MXRF11", "BCFF11", "KNCR11", "GGRC11",
    "HGRU11", "PVBI11", "RBRR11", "RZTR11", "VILG11", "XPLG11", "ALZR11", "BRCR11", "CVBI11",
    "DEVA11", "GALG11", "HGBS11", "HGCR11", "HGFF11", "HGPO11", "HGRE11", "HSML11", "HTMX11",
    "IRDM11", "JSRE11", "KNHY11", "KNIP11", "KNSC11", "LVBI11", "MALL11", "PATL11", "RBRF11",
    "RBRP11", "RBRY11", "RECT11", "RECR11", "RNGO11", "RURA11", "SADI11", "TGAR11", "TRXF11",
    "VGIR11", "VIFI11", "VINO11", "VRTA11", "XPCI11",
];

fn refresh_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}

/// Refresh cached price and yield for every entry matching the search filter.
///
/// Per-ticker failures degrade to zero fields; the timestamp is stamped either
/// way so stale rows are visible. The progress callback receives
/// (ticker, done, total).
pub async fn refresh_universe<M, F>(
    entries: &mut [UniverseEntry],
    search: Option<&str>,
    market: &M,
    mut progress: F,
) -> usize
where
    M: MarketData,
    F: FnMut(&str, usize, usize),
{
    let indices: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| search.map(|s| e.matches_search(s)).unwrap_or(true))
        .map(|(i, _)| i)
        .collect();

    let total = indices.len();
    let stamp = refresh_timestamp();

    for (done, idx) in indices.into_iter().enumerate() {
        let ticker = entries[idx].ticker.clone();

        let price = market.price(&ticker).await.unwrap_or(Decimal::ZERO);
        let yield_pct = market
            .trailing_yield(&ticker)
            .await
            .map(|fraction| fraction * Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::ZERO);

        let entry = &mut entries[idx];
        entry.last_price = price;
        entry.trailing_yield_pct = yield_pct;
        entry.last_updated = stamp.clone();

        progress(&ticker, done + 1, total);
    }

    total
}

/// Build the universe ticker list from scratch.
///
/// Tries the Brapi full listing first; on failure falls back to
/// [`FALLBACK_TICKERS`], fetching each quote individually and using the ticker
/// itself as the name when a quote fails.
pub async fn bootstrap_universe<F>(
    client: &Client,
    api_key: &str,
    mut progress: F,
) -> Result<Vec<UniverseEntry>>
where
    F: FnMut(&str, usize, usize),
{
    match brapi::fetch_fund_list(client, api_key).await {
        Ok(listings) => {
            info!("Brapi listing returned {} funds", listings.len());
            Ok(listings
                .into_iter()
                .map(|l| UniverseEntry::bare(&l.ticker, &l.name, &l.kind))
                .collect())
        }
        Err(e) => {
            warn!(
                "Brapi listing unavailable ({}), falling back to {} known tickers",
                e,
                FALLBACK_TICKERS.len()
            );

            let total = FALLBACK_TICKERS.len();
            let mut entries = Vec::with_capacity(total);
            for (done, ticker) in FALLBACK_TICKERS.iter().enumerate() {
                let name = match brapi::fetch_quote(client, api_key, ticker).await {
                    Ok(quote) => quote.name.unwrap_or_else(|| ticker.to_string()),
                    Err(e) => {
                        warn!("No quote for {} during bootstrap: {}", ticker, e);
                        ticker.to_string()
                    }
                };
                entries.push(UniverseEntry::bare(ticker, &name, "FII"));
                progress(ticker, done + 1, total);
            }
            Ok(entries)
        }
    }
}
