//! Monetary value parsing and pt-BR formatting.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use super::patterns::{BRL_AMOUNT, CURRENCY_PREFIX, INVARIANT_AMOUNT};

/// Parse a monetary text, trying pt-BR (`2.500,50`) before invariant (`2500.50`).
pub fn parse_monetary(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let cleaned = CURRENCY_PREFIX.replace(trimmed, "");

    parse_with(&cleaned, &BRL_AMOUNT, '.').or_else(|| parse_with(&cleaned, &INVARIANT_AMOUNT, ','))
}

fn parse_with(s: &str, shape: &regex::Regex, group_separator: char) -> Option<Decimal> {
    let caps = shape.captures(s)?;
    let sign = &caps[1];
    let integer_part = caps[2].replace(group_separator, "");

    let normalized = match caps.get(3) {
        Some(fraction) => format!("{}{}.{}", sign, integer_part, fraction.as_str()),
        None => format!("{}{}", sign, integer_part),
    };

    Decimal::from_str(&normalized).ok()
}

/// Format an amount with two decimals in pt-BR style (2.500,50).
pub fn format_brl_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let s = format!("{:.2}", rounded.abs());

    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return s;
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{}{},{}", sign, formatted, decimal_part)
}

/// Canonical text of a monetary value, used on both sides of a comparison.
///
/// Unparseable input comes back unchanged; the failure is logged.
pub fn normalize_monetary(raw: &str) -> String {
    match parse_monetary(raw) {
        Some(amount) => format_brl_amount(amount),
        None => {
            warn!("Could not convert value {:?} to a decimal", raw);
            raw.to_string()
        }
    }
}
