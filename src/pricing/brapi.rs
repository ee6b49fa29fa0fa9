//! Brapi.dev API client
//!
//! Two endpoints are used: the single-ticker quote (spot price and short name)
//! and the full listing, which seeds the tradable fund universe.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

const BASE_URL: &str = "https://brapi.dev/api";

#[derive(Debug, Deserialize)]
struct BrapiQuoteResponse {
    results: Vec<BrapiQuoteResult>,
}

#[derive(Debug, Deserialize)]
struct BrapiQuoteResult {
    #[allow(dead_code)]
    symbol: String,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BrapiListResponse {
    stocks: Vec<BrapiListedStock>,
}

#[derive(Debug, Deserialize)]
struct BrapiListedStock {
    stock: String,
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Spot quote for a single ticker.
#[derive(Debug, Clone)]
pub struct BrapiQuote {
    pub ticker: String,
    pub price: Decimal,
    pub name: Option<String>,
}

/// One entry from the Brapi full listing.
#[derive(Debug, Clone)]
pub struct BrapiListing {
    pub ticker: String,
    pub name: String,
    pub kind: String,
}

/// Fetch the current quote for a ticker.
pub async fn fetch_quote(client: &Client, api_key: &str, ticker: &str) -> Result<BrapiQuote> {
    let url = format!("{}/quote/{}", BASE_URL, ticker);

    let response = client
        .get(&url)
        .query(&[("token", api_key)])
        .send()
        .await
        .context("Failed to send request to Brapi.dev")?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Brapi.dev returned error status: {}",
            response.status()
        ));
    }

    let data: BrapiQuoteResponse = response
        .json()
        .await
        .context("Failed to parse Brapi.dev quote response")?;

    let quote = data
        .results
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No quote data returned for {}", ticker))?;

    let price = quote
        .regular_market_price
        .and_then(Decimal::from_f64_retain)
        .filter(|p| *p > Decimal::ZERO)
        .ok_or_else(|| anyhow!("No price available for {}", ticker))?;

    Ok(BrapiQuote {
        ticker: ticker.to_string(),
        price,
        name: quote.short_name,
    })
}

/// Fetch the full Brapi listing, keeping only fund tickers (suffix `11`).
pub async fn fetch_fund_list(client: &Client, api_key: &str) -> Result<Vec<BrapiListing>> {
    info!("Fetching full ticker list from Brapi.dev");

    let url = format!("{}/quote/list", BASE_URL);

    let response = client
        .get(&url)
        .query(&[("token", api_key)])
        .send()
        .await
        .context("Failed to send request to Brapi.dev")?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Brapi.dev returned error status: {}",
            response.status()
        ));
    }

    let data: BrapiListResponse = response
        .json()
        .await
        .context("Failed to parse Brapi.dev list response")?;

    let mut listings: Vec<BrapiListing> = data
        .stocks
        .into_iter()
        .filter(|s| s.stock.ends_with("11"))
        .map(|s| BrapiListing {
            name: s.name.clone().unwrap_or_else(|| s.stock.clone()),
            kind: s.kind.unwrap_or_else(|| "FII".to_string()),
            ticker: s.stock,
        })
        .collect();

    listings.sort_by(|a, b| a.ticker.cmp(&b.ticker));

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn should_skip_online_tests() -> bool {
        std::env::var("FIITRACK_SKIP_ONLINE_TESTS")
            .map(|v| v != "0")
            .unwrap_or(true)
    }

    #[test]
    fn test_quote_response_parsing() {
        let raw = r#"{"results":[{"symbol":"HGLG11","regularMarketPrice":160.45,"shortName":"CSHG LOG FDO INV IMOB"}]}"#;
        let parsed: BrapiQuoteResponse = serde_json::from_str(raw).unwrap();

        let quote = &parsed.results[0];
        assert_eq!(quote.symbol, "HGLG11");
        // from_f64_retain keeps the full binary expansion, so compare rounded
        assert_eq!(
            quote
                .regular_market_price
                .and_then(Decimal::from_f64_retain)
                .map(|p| p.round_dp(2)),
            Some(dec!(160.45))
        );
        assert_eq!(quote.short_name.as_deref(), Some("CSHG LOG FDO INV IMOB"));
    }

    #[test]
    fn test_list_response_keeps_fund_suffix_only() {
        let raw = r#"{"stocks":[
            {"stock":"PETR4","name":"PETROBRAS","type":"stock"},
            {"stock":"HGLG11","name":"CSHG LOG","type":"fund"},
            {"stock":"MXRF11","name":null,"type":null}
        ]}"#;
        let parsed: BrapiListResponse = serde_json::from_str(raw).unwrap();

        let funds: Vec<_> = parsed
            .stocks
            .into_iter()
            .filter(|s| s.stock.ends_with("11"))
            .collect();
        assert_eq!(funds.len(), 2);
        assert_eq!(funds[0].stock, "HGLG11");
    }

    #[tokio::test]
    async fn test_fetch_quote_online() {
        if should_skip_online_tests() {
            return;
        }
        let api_key = match std::env::var("BRAPI_API_KEY") {
            Ok(key) => key,
            Err(_) => return,
        };

        let client = Client::new();
        let result = fetch_quote(&client, &api_key, "MXRF11").await;
        if let Err(e) = &result {
            eprintln!("Skipping Brapi quote test: {}", e);
            return;
        }
        let quote = result.unwrap();
        assert_eq!(quote.ticker, "MXRF11");
        assert!(quote.price > Decimal::ZERO);
    }
}
