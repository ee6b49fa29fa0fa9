//! Market data access - Brapi quotes plus the scraped yield chain
//!
//! All lookups degrade to `None` instead of propagating errors, so the engines
//! downstream only ever see definite numeric values. Results are memoized with
//! asymmetric TTLs: prices move intraday (30 minutes), trailing yields barely
//! move day to day (24 hours).

pub mod brapi;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;

/// Which external call a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Price,
    TrailingYield,
}

impl CallKind {
    fn ttl(self) -> Duration {
        match self {
            CallKind::Price => Duration::minutes(30),
            CallKind::TrailingYield => Duration::hours(24),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Decimal,
    expires_at: DateTime<Utc>,
}

/// Read access to spot prices and trailing yields.
///
/// Implementations must not fail across this boundary: an unavailable value is
/// `None`, never an error. Yields are fractions in the open interval (0, 0.5).
#[allow(async_fn_in_trait)]
pub trait MarketData {
    async fn price(&self, ticker: &str) -> Option<Decimal>;
    async fn trailing_yield(&self, ticker: &str) -> Option<Decimal>;
}

/// Live market data client: Brapi for prices, the scraping chain for yields,
/// with a per-process TTL cache in front of both.
pub struct LiveMarket {
    client: reqwest::Client,
    api_key: String,
    cache: Mutex<HashMap<(String, CallKind), CacheEntry>>,
}

impl LiveMarket {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key: config.brapi_api_key.clone(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn cache_get(&self, ticker: &str, kind: CallKind) -> Option<Decimal> {
        let cache = self.cache.lock().ok()?;
        let entry = cache.get(&(ticker.to_string(), kind))?;
        if entry.expires_at > Utc::now() {
            debug!("Cache hit for {} {:?}", ticker, kind);
            Some(entry.value)
        } else {
            None
        }
    }

    fn cache_put(&self, ticker: &str, kind: CallKind, value: Decimal) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(
                (ticker.to_string(), kind),
                CacheEntry {
                    value,
                    expires_at: Utc::now() + kind.ttl(),
                },
            );
        }
    }
}

impl MarketData for LiveMarket {
    async fn price(&self, ticker: &str) -> Option<Decimal> {
        if let Some(cached) = self.cache_get(ticker, CallKind::Price) {
            return Some(cached);
        }

        match brapi::fetch_quote(&self.client, &self.api_key, ticker).await {
            Ok(quote) => {
                self.cache_put(ticker, CallKind::Price, quote.price);
                Some(quote.price)
            }
            Err(e) => {
                warn!("Price lookup failed for {}: {}", ticker, e);
                None
            }
        }
    }

    async fn trailing_yield(&self, ticker: &str) -> Option<Decimal> {
        if let Some(cached) = self.cache_get(ticker, CallKind::TrailingYield) {
            return Some(cached);
        }

        let estimate = crate::scraping::estimate_trailing_yield(&self.client, ticker).await?;
        self.cache_put(ticker, CallKind::TrailingYield, estimate);
        Some(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_market() -> LiveMarket {
        LiveMarket::new(&Config {
            brapi_api_key: "test-key".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_ttl_is_asymmetric() {
        assert_eq!(CallKind::Price.ttl(), Duration::minutes(30));
        assert_eq!(CallKind::TrailingYield.ttl(), Duration::hours(24));
    }

    #[test]
    fn test_cache_hit_within_ttl() {
        let market = test_market();
        market.cache_put("HGLG11", CallKind::Price, dec!(160.10));

        assert_eq!(market.cache_get("HGLG11", CallKind::Price), Some(dec!(160.10)));
        // A different call kind for the same ticker is a separate entry
        assert_eq!(market.cache_get("HGLG11", CallKind::TrailingYield), None);
    }

    #[test]
    fn test_cache_miss_after_expiry() {
        let market = test_market();
        {
            let mut cache = market.cache.lock().unwrap();
            cache.insert(
                ("MXRF11".to_string(), CallKind::Price),
                CacheEntry {
                    value: dec!(10.50),
                    expires_at: Utc::now() - Duration::seconds(1),
                },
            );
        }

        assert_eq!(market.cache_get("MXRF11", CallKind::Price), None);
    }
}
