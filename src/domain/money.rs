//! Decimal helpers for amounts and balances.
//!
//! Amounts travel as text (what the user typed, what the back end stores) and
//! are only turned into [`Decimal`] for comparison and arithmetic.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Parse user or back-end decimal text.
///
/// Accepts an optional leading `-`, digits, and at most one `.`; either side
/// of the point may be empty (`"5."`, `".5"`) but not both. Returns `None`
/// for anything else, including values that overflow [`Decimal`].
#[must_use]
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let normalized = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    };

    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

/// Format with exactly two fractional digits, rounding half away from zero.
#[must_use]
pub fn format_fixed2(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
