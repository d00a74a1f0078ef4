//! Quantity cleanup into a positive whole-unit count.

use crate::normalize::is_not_available;

/// Spelled-out counts that show up in free-text quantity fields.
const NUMBER_WORDS: &[(&str, i64)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// Normalizes one quantity cell. Number words win over digit extraction, and
/// any digit-derived count below one is lifted to one since every surviving
/// order line represents at least a single unit.
pub fn normalize_quantity(raw: Option<&str>) -> Option<i64> {
    let value = raw?;
    let trimmed = value.trim();
    if trimmed.is_empty() || is_not_available(trimmed) {
        return None;
    }
    let lowered = trimmed.to_ascii_lowercase();
    if let Some(count) = NUMBER_WORDS
        .iter()
        .find_map(|(word, count)| (*word == lowered).then_some(*count))
    {
        return Some(count);
    }
    let digits: String = trimmed
        .chars()
        .filter(|ch| ch.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    let count: i64 = digits.parse().ok()?;
    Some(count.max(1))
}
