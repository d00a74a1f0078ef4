//! Date canonicalization: a cleanup pass, a cascade of known formats, then
//! three heuristics for the stragglers.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Tokens that mean "no date", checked before any parsing.
const NOT_A_DATE: &[&str] = &["", "N/A", "pending", "nan", "NaN"];

/// Formats tried in order, first hit wins. Each carries a shape pattern that
/// pins the field widths (`chrono` alone would accept a two-digit year for
/// `%Y`, which must fall through to the two-digit formats instead).
struct KnownFormat {
    strptime: &'static str,
    shape: &'static str,
}

const KNOWN_FORMATS: &[KnownFormat] = &[
    KnownFormat { strptime: "%Y-%m-%d", shape: r"^\d{4}-\d{1,2}-\d{1,2}$" },
    KnownFormat { strptime: "%m/%d/%Y", shape: r"^\d{1,2}/\d{1,2}/\d{4}$" },
    KnownFormat { strptime: "%d-%m-%Y", shape: r"^\d{1,2}-\d{1,2}-\d{4}$" },
    KnownFormat { strptime: "%b %d, %Y", shape: r"^[A-Za-z]{3} \d{1,2}, \d{4}$" },
    KnownFormat { strptime: "%B %d, %Y", shape: r"^[A-Za-z]{3,9} \d{1,2}, \d{4}$" },
    KnownFormat { strptime: "%m/%d/%y", shape: r"^\d{1,2}/\d{1,2}/\d{2}$" },
    KnownFormat { strptime: "%d/%m/%y", shape: r"^\d{1,2}/\d{1,2}/\d{2}$" },
    KnownFormat { strptime: "%Y%m%d", shape: r"^\d{8}$" },
];

fn format_shapes() -> &'static Vec<Regex> {
    static SHAPES: OnceLock<Vec<Regex>> = OnceLock::new();
    SHAPES.get_or_init(|| {
        KNOWN_FORMATS
            .iter()
            .map(|format| Regex::new(format.shape).expect("format shape pattern is valid"))
            .collect()
    })
}

/// Normalizes one date cell to a calendar date.
///
/// The cell is first reduced to digits, separators and spaces, which silences
/// ordinal suffixes and other annotations. The known formats run in order;
/// whatever they miss goes through the month-year, ambiguous-slash and
/// year-only heuristics. Impossible dates come back `None`.
pub fn normalize_date(raw: Option<&str>) -> Option<NaiveDate> {
    let value = raw?;
    if NOT_A_DATE.contains(&value.trim()) {
        return None;
    }
    let cleaned: String = value
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '/' | '-' | '.') || ch.is_whitespace())
        .collect();
    let cleaned = cleaned.trim();
    for (format, shape) in KNOWN_FORMATS.iter().zip(format_shapes()) {
        if !shape.is_match(cleaned) {
            continue;
        }
        if let Ok(parsed) = NaiveDate::parse_from_str(cleaned, format.strptime) {
            return Some(parsed);
        }
    }
    parse_month_year(cleaned)
        .or_else(|| parse_ambiguous_slash(cleaned))
        .or_else(|| parse_bare_year(cleaned))
}

/// `MM-YYYY` pins the day to the first of the month.
fn parse_month_year(cleaned: &str) -> Option<NaiveDate> {
    let (month, year) = cleaned.split_once('-')?;
    if !digit_run(month, 1, 2) || !digit_run(year, 4, 4) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Slash triples that the known formats rejected. Month-first is tried ahead
/// of day-first, and a year shorter than four digits is assumed to sit in the
/// 2000s.
fn parse_ambiguous_slash(cleaned: &str) -> Option<NaiveDate> {
    let mut parts = cleaned.split('/');
    let (first, second, year_part) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    if !digit_run(first, 1, 2) || !digit_run(second, 1, 2) || !digit_run(year_part, 2, 4) {
        return None;
    }
    let mut year: i32 = year_part.parse().ok()?;
    if year_part.len() < 4 {
        year += 2000;
    }
    let a: u32 = first.parse().ok()?;
    let b: u32 = second.parse().ok()?;
    NaiveDate::from_ymd_opt(year, a, b).or_else(|| NaiveDate::from_ymd_opt(year, b, a))
}

/// A bare `YYYY` pins the date to January 1 of that year.
fn parse_bare_year(cleaned: &str) -> Option<NaiveDate> {
    if !digit_run(cleaned, 4, 4) {
        return None;
    }
    NaiveDate::from_ymd_opt(cleaned.parse().ok()?, 1, 1)
}

fn digit_run(part: &str, min: usize, max: usize) -> bool {
    part.len() >= min && part.len() <= max && part.bytes().all(|byte| byte.is_ascii_digit())
}
