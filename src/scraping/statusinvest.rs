//! Status Invest scraper (secondary yield provider)

use reqwest::Client;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use tracing::warn;

use crate::utils::parse_br_percent;

use super::accept_yield_pct;

const BASE_URL: &str = "https://statusinvest.com.br/fundos-imobiliarios";

pub async fn fetch_yield(client: &Client, ticker: &str) -> Option<Decimal> {
    let url = format!("{}/{}", BASE_URL, ticker.to_lowercase());

    let response = match client.get(&url).send().await {
        Ok(r) if r.status().is_success() => r,
        Ok(r) => {
            warn!("Status Invest returned {} for {}", r.status(), ticker);
            return None;
        }
        Err(e) => {
            warn!("Status Invest request failed for {}: {}", ticker, e);
            return None;
        }
    };

    let html = response.text().await.ok()?;
    parse_yield(&html)
}

/// Extract the yield from a fund page, as a fraction in (0, 0.5).
///
/// Status Invest renders its indicators as `div.value` blocks with
/// `strong.value` highlights; the first sane percentage in either wins.
fn parse_yield(html: &str) -> Option<Decimal> {
    let document = Html::parse_document(html);

    for css in ["div.value", "strong.value"] {
        let selector = Selector::parse(css).ok()?;
        for element in document.select(&selector) {
            let text = element.text().collect::<String>();
            if let Some(fraction) = parse_br_percent(&text).and_then(accept_yield_pct) {
                return Some(fraction);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_yield_from_value_divs() {
        let html = r#"
            <div class="info">
                <div class="value">R$ 10,45</div>
                <div class="value">12,10%</div>
            </div>
        "#;
        assert_eq!(parse_yield(html), Some(dec!(0.121)));
    }

    #[test]
    fn test_parse_yield_from_strong_tags() {
        let html = r#"<strong class="value">6,95%</strong>"#;
        assert_eq!(parse_yield(html), Some(dec!(0.0695)));
    }

    #[test]
    fn test_parse_yield_rejects_out_of_range() {
        let html = r#"<div class="value">75,00%</div>"#;
        assert_eq!(parse_yield(html), None);
    }
}
