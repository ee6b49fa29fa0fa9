//! Formatting and parsing helpers shared across the dashboard
//!
//! Output follows Brazilian locale conventions (thousands `.`, decimals `,`),
//! and the scrapers hand their raw percentage text to [`parse_br_percent`].

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Format as Brazilian Real with symbol: "R$ 1.234,56"
pub fn format_currency(value: Decimal) -> String {
    format!("R$ {}", format_decimal_br(value))
}

/// Format a number using Brazilian separators: "1.234,56"
pub fn format_decimal_br(value: Decimal) -> String {
    let negative = value < Decimal::ZERO;
    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}{},{}", sign, grouped, frac_part)
}

/// Format a percentage with two decimals: "12,34%"
pub fn format_pct(value: Decimal) -> String {
    format!("{}%", format_decimal_br(value))
}

static PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?\d+(?:\.\d{3})*(?:,\d+)?|-?\d+(?:\.\d+)?)\s*%").expect("valid regex"));

/// Parse a pt-BR percentage string ("12,34%", "8%") into a Decimal percent value.
///
/// Returns None when no percentage is present or the number does not parse.
pub fn parse_br_percent(text: &str) -> Option<Decimal> {
    let caps = PERCENT_RE.captures(text.trim())?;
    let normalized = caps.get(1)?.as_str().replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}
