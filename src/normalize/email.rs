//! Email repair: typo'd provider domains, stray whitespace, duplicated `@`
//! signs, then a final shape check before the value is trusted.

use std::sync::OnceLock;

use regex::Regex;

/// Provider-domain typos worth fixing automatically, applied in order.
/// Substring match on purpose: the typo can sit mid-string when the cell has
/// trailing junk that the later shape check will reject anyway.
const DOMAIN_CORRECTIONS: &[(&str, &str)] = &[
    ("@gmal.com", "@gmail.com"),
    ("@gmai.com", "@gmail.com"),
    ("@yaho.com", "@yahoo.com"),
    ("@hotmal.com", "@hotmail.com"),
    ("@otlook.com", "@outlook.com"),
    ("@aol.cm", "@aol.com"),
    ("@gmil.com", "@gmail.com"),
    ("@yhaoo.com", "@yahoo.com"),
];

fn address_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("address shape pattern is valid")
    })
}

/// Normalizes one email cell. Returns `None` for blank cells and for anything
/// that still fails the shape check after repair.
pub fn normalize_email(raw: Option<&str>) -> Option<String> {
    let value = raw?;
    if value.trim().is_empty() {
        return None;
    }
    let mut cleaned: String = value.chars().filter(|ch| !ch.is_whitespace()).collect();
    for (typo, replacement) in DOMAIN_CORRECTIONS {
        if cleaned.contains(typo) {
            cleaned = cleaned.replace(typo, replacement);
        }
    }
    let cleaned = keep_first_at(&cleaned);
    let (local, domain) = cleaned.split_once('@')?;
    let local: String = local
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'))
        .collect();
    let domain: String = domain
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-'))
        .collect::<String>()
        .to_ascii_lowercase();
    let candidate = format!("{local}@{domain}");
    if address_shape().is_match(&candidate) {
        Some(candidate)
    } else {
        None
    }
}

/// Keeps the first `@` and drops any later ones, so `a@@b.com` and `a@b@c.com`
/// both resolve around the earliest separator.
fn keep_first_at(value: &str) -> String {
    let mut kept_one = false;
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '@' {
            if kept_one {
                continue;
            }
            kept_one = true;
        }
        out.push(ch);
    }
    out
}
