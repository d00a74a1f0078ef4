//! Customer-name cleanup: strip stray punctuation and digits, then title-case
//! whatever words remain.

/// Marker written into name cells that a human needs to re-source. The
/// pipeline emits it for rows that have a contact channel but no usable name,
/// and the normalizer passes it through untouched on later runs.
pub const NAME_VERIFICATION_SENTINEL: &str = "Verify Name with Data Manager";

/// True when the name cell is absent or holds a known not-a-value token.
pub fn is_missing_name(raw: Option<&str>) -> bool {
    match raw {
        None => true,
        Some(value) => matches!(value.trim(), "" | "nan" | "NaN" | "N/A"),
    }
}

/// Drops every character that is not an ASCII letter or whitespace, then
/// capitalizes each remaining word. A cell holding only noise collapses to an
/// empty string rather than null, so downstream review can still see the row
/// had a (worthless) entry.
pub fn normalize_name(raw: Option<&str>) -> Option<String> {
    let value = raw?;
    if value == NAME_VERIFICATION_SENTINEL {
        return Some(value.to_string());
    }
    let cleaned: String = value
        .chars()
        .filter(|ch| ch.is_ascii_alphabetic() || ch.is_whitespace())
        .collect();
    let words: Vec<String> = cleaned.split_whitespace().map(capitalize_word).collect();
    Some(words.join(" "))
}

fn capitalize_word(word: &str) -> String {
    // Words are pure ASCII letters here, so byte indexing is safe.
    if word.len() <= 1 {
        return word.to_ascii_uppercase();
    }
    let (head, tail) = word.split_at(1);
    format!("{}{}", head.to_ascii_uppercase(), tail.to_ascii_lowercase())
}
