//! Price cleanup into an exact two-decimal amount.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::normalize::is_not_available;

/// Normalizes one price cell. Currency symbols, thousands separators and
/// units are discarded; the remaining digits and decimal point are parsed
/// exactly and rounded half-to-even to two places. Negative amounts cannot
/// occur because the minus sign is stripped with the rest of the noise.
pub fn normalize_price(raw: Option<&str>) -> Option<Decimal> {
    let value = raw?;
    let trimmed = value.trim();
    if trimmed.is_empty() || is_not_available(trimmed) {
        return None;
    }
    let cleaned: String = value
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    if cleaned.chars().filter(|ch| *ch == '.').count() > 1 {
        return None;
    }
    if !cleaned.bytes().any(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let mut body = cleaned.trim_end_matches('.').to_string();
    if body.starts_with('.') {
        body.insert(0, '0');
    }
    let parsed = Decimal::from_str(&body).ok()?;
    let mut amount = parsed.round_dp(2);
    amount.rescale(2);
    Some(amount)
}
