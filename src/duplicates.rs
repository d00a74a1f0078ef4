//! Composite-key duplicate detection across the whole record set.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The natural key a repeated order shares: canonical email, canonical order
/// date, raw product. Missing components compare equal, so two records
/// lacking the same field can still collide.
pub type OrderKey = (Option<String>, Option<NaiveDate>, Option<String>);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub flagged: usize,
    pub groups: usize,
}

/// Flags every member of a key group of size two or more, first occurrences
/// included. Returns one flag per input record, in order.
pub fn flag_duplicates(keys: &[OrderKey]) -> (Vec<bool>, DuplicateReport) {
    let mut counts: HashMap<&OrderKey, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    let flags: Vec<bool> = keys
        .iter()
        .map(|key| counts.get(key).is_some_and(|count| *count > 1))
        .collect();
    let flagged = flags.iter().filter(|flag| **flag).count();
    let groups = counts.values().filter(|count| **count > 1).count();
    (flags, DuplicateReport { flagged, groups })
}
