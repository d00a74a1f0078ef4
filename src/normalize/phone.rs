//! Phone canonicalization into dash-grouped digit blocks with an explicit
//! country code.

/// Reduces a phone cell to digits and regroups them. Ten digits are treated
/// as North American and gain a `1-` prefix; an eleventh leading `1` is
/// folded into that prefix. Longer values keep their first digits as the
/// country code. Anything with seven digits or fewer is unusable.
pub fn normalize_phone(raw: Option<&str>) -> Option<String> {
    let value = raw?;
    if value.trim().is_empty() {
        return None;
    }
    let digits: String = value.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.len() == 10 {
        return Some(nanp(&digits));
    }
    if digits.len() == 11 && digits.starts_with('1') {
        return Some(nanp(&digits[1..]));
    }
    if digits.len() <= 7 {
        // Seven digits is a bare local number with no area code. Too little
        // to canonicalize, so treat it the same as shorter fragments.
        return None;
    }
    let code_len = if digits.len() > 10 { 3 } else { 1 };
    let (code, rest) = digits.split_at(code_len);
    let grouped = match rest.len() {
        9 | 10 => format!("{}-{}-{}", &rest[..3], &rest[3..6], &rest[6..]),
        8 => format!("{}-{}-{}", &rest[..3], &rest[3..5], &rest[5..]),
        7 => format!("{}-{}", &rest[..3], &rest[3..]),
        _ => rest.to_string(),
    };
    Some(format!("{code}-{grouped}"))
}

fn nanp(digits: &str) -> String {
    format!("1-{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..])
}
