//! Per-field canonicalization for messy export data.
//!
//! Every function here is a pure, total mapping from one raw cell to either a
//! canonical value or `None` ("could not normalize"). Malformed input never
//! raises; it nulls. The caller decides how nulls surface (report tallies,
//! review flags). Field normalizers are independent of each other and carry
//! no state, so they can be applied column by column in any order.

pub mod date;
pub mod email;
pub mod money;
pub mod name;
pub mod phone;
pub mod quantity;

pub use date::normalize_date;
pub use email::normalize_email;
pub use money::normalize_price;
pub use name::{NAME_VERIFICATION_SENTINEL, is_missing_name, normalize_name};
pub use phone::normalize_phone;
pub use quantity::normalize_quantity;

/// Not-available markers shared by the numeric normalizers. Dates carry a
/// longer token list of their own.
pub(crate) fn is_not_available(trimmed: &str) -> bool {
    matches!(trimmed, "N/A" | "nan")
}

/// True when a raw cell holds something other than whitespace. Used by the
/// name-verification rule to decide whether a contact channel exists.
pub fn has_content(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| !value.trim().is_empty())
}
