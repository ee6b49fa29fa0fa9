//! Funds Explorer scraper (primary yield provider)
//!
//! Reads the public fund page and scans the indicator widgets for a
//! percentage. When the widgets are missing (layout changes), falls back to
//! scanning indicator tables for a "dividend yield" labelled cell.

use reqwest::Client;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use tracing::warn;

use crate::utils::parse_br_percent;

use super::accept_yield_pct;

const BASE_URL: &str = "https://www.fundsexplorer.com.br/funds";

pub async fn fetch_yield(client: &Client, ticker: &str) -> Option<Decimal> {
    let url = format!("{}/{}", BASE_URL, ticker.to_lowercase());

    let response = match client.get(&url).send().await {
        Ok(r) if r.status().is_success() => r,
        Ok(r) => {
            warn!("Funds Explorer returned {} for {}", r.status(), ticker);
            return None;
        }
        Err(e) => {
            warn!("Funds Explorer request failed for {}: {}", ticker, e);
            return None;
        }
    };

    let html = response.text().await.ok()?;
    parse_yield(&html)
}

/// Extract the yield from a fund page, as a fraction in (0, 0.5).
fn parse_yield(html: &str) -> Option<Decimal> {
    let document = Html::parse_document(html);

    let indicator = Selector::parse("span.indicator-value").ok()?;
    for element in document.select(&indicator) {
        let text = element.text().collect::<String>();
        if let Some(fraction) = parse_br_percent(&text).and_then(accept_yield_pct) {
            return Some(fraction);
        }
    }

    parse_yield_from_tables(&document)
}

/// Table fallback: find a cell labelled "dividend yield" (or "dy") and read
/// the cell right after it.
fn parse_yield_from_tables(document: &Html) -> Option<Decimal> {
    let row_sel = Selector::parse("table tr").ok()?;
    let cell_sel = Selector::parse("td, th").ok()?;

    for row in document.select(&row_sel) {
        let cells: Vec<String> = row
            .select(&cell_sel)
            .map(|c| c.text().collect::<String>())
            .collect();

        for (i, cell) in cells.iter().enumerate() {
            let label = cell.to_lowercase();
            if label.contains("dividend yield") || label.contains("dy") {
                if let Some(next) = cells.get(i + 1) {
                    if let Some(fraction) = parse_br_percent(next).and_then(accept_yield_pct) {
                        return Some(fraction);
                    }
                }
            }
        }
    }
    None
}
