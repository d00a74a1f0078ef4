use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Typed outcome of normalizing a single raw field.
///
/// A normalizer that cannot make sense of its input yields `None` at the call
/// site rather than a variant here, so numeric and string nulls stay
/// distinguishable in the pipeline's column stores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CanonicalValue {
    Text(String),
    Email(String),
    Phone(String),
    Date(NaiveDate),
    Money(Decimal),
    Count(i64),
}

impl CanonicalValue {
    pub fn as_display(&self) -> String {
        match self {
            CanonicalValue::Text(s) => s.clone(),
            CanonicalValue::Email(s) => s.clone(),
            CanonicalValue::Phone(s) => s.clone(),
            CanonicalValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CanonicalValue::Money(m) => m.to_string(),
            CanonicalValue::Count(n) => n.to_string(),
        }
    }

    /// Numeric projection for column statistics; text-like variants have none.
    pub fn metric(&self) -> Option<f64> {
        match self {
            CanonicalValue::Money(m) => m.to_f64(),
            CanonicalValue::Count(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl fmt::Display for CanonicalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Renders an optional canonical value the way the cleaned CSV expects it:
/// `None` becomes an empty cell.
pub fn render_cell(value: Option<&CanonicalValue>) -> String {
    value.map(CanonicalValue::as_display).unwrap_or_default()
}
