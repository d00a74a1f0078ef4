//! Fixed-order orchestration: verification flagging, per-field
//! normalization, the derived total, then the whole-table analyses.
//!
//! The pipeline mutates the materialized table in place, writing canonical
//! cell renderings back into their source columns and appending (or
//! refreshing) the three derived columns. Analyses run last, over the
//! completed canonical columns.

use rust_decimal::Decimal;

use crate::{
    data::{CanonicalValue, render_cell},
    duplicates::{self, OrderKey},
    fields::{FieldMap, FieldRole},
    normalize,
    outliers,
    report::{CleanReport, FieldTally},
};

pub const VERIFICATION_COLUMN: &str = "name_verification";
pub const VERIFICATION_OK: &str = "OK";
pub const TOTAL_COLUMN: &str = "total_value";
pub const DUPLICATE_COLUMN: &str = "duplicate_flag";

pub struct RecordPipeline {
    fields: FieldMap,
}

pub struct PipelineOutcome {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub report: CleanReport,
}

impl RecordPipeline {
    pub fn new(fields: FieldMap) -> Self {
        Self { fields }
    }

    /// Runs the full cleaning pass over a materialized table. Rows narrower
    /// or wider than the header row are squared off first.
    pub fn run(&self, headers: &[String], mut rows: Vec<Vec<String>>) -> PipelineOutcome {
        square_rows(&mut rows, headers.len());

        let verification = self.flag_unverifiable_names(&mut rows);
        let mut tallies = Vec::new();

        if let Some(idx) = self.fields.index_of(FieldRole::CustomerName) {
            let (_, tally) = normalize_column(&mut rows, idx, FieldRole::CustomerName, |raw| {
                normalize::normalize_name(raw).map(CanonicalValue::Text)
            });
            tallies.push(tally);
        }
        let emails = self.normalize_role(&mut rows, FieldRole::CustomerEmail, &mut tallies, |raw| {
            normalize::normalize_email(raw).map(CanonicalValue::Email)
        });
        if let Some(idx) = self.fields.index_of(FieldRole::CustomerPhone) {
            let (_, tally) = normalize_column(&mut rows, idx, FieldRole::CustomerPhone, |raw| {
                normalize::normalize_phone(raw).map(CanonicalValue::Phone)
            });
            tallies.push(tally);
        }
        let order_dates = self.normalize_role(&mut rows, FieldRole::OrderDate, &mut tallies, |raw| {
            normalize::normalize_date(raw).map(CanonicalValue::Date)
        });
        if let Some(idx) = self.fields.index_of(FieldRole::ShippingDate) {
            let (_, tally) = normalize_column(&mut rows, idx, FieldRole::ShippingDate, |raw| {
                normalize::normalize_date(raw).map(CanonicalValue::Date)
            });
            tallies.push(tally);
        }
        let prices = self.normalize_role(&mut rows, FieldRole::ProductPrice, &mut tallies, |raw| {
            normalize::normalize_price(raw).map(CanonicalValue::Money)
        });
        let quantities =
            self.normalize_role(&mut rows, FieldRole::QuantityOrdered, &mut tallies, |raw| {
                normalize::normalize_quantity(raw).map(CanonicalValue::Count)
            });

        let totals = derive_totals(&prices, &quantities);

        let price_samples = metric_samples(&prices);
        let quantity_samples = metric_samples(&quantities);
        let total_samples = metric_samples(&totals);

        let product_idx = self.fields.index_of(FieldRole::ProductOrdered);
        let keys: Vec<OrderKey> = (0..rows.len())
            .map(|i| {
                let email = match &emails[i] {
                    Some(CanonicalValue::Email(email)) => Some(email.clone()),
                    _ => None,
                };
                let date = match &order_dates[i] {
                    Some(CanonicalValue::Date(date)) => Some(*date),
                    _ => None,
                };
                let product = product_idx
                    .and_then(|idx| non_empty(&rows[i][idx]))
                    .map(str::to_string);
                (email, date, product)
            })
            .collect();
        let (duplicate_flags, duplicate_report) = duplicates::flag_duplicates(&keys);

        let mut headers = headers.to_vec();
        let verification_idx = ensure_column(&mut headers, &mut rows, VERIFICATION_COLUMN);
        let total_idx = ensure_column(&mut headers, &mut rows, TOTAL_COLUMN);
        let duplicate_idx = ensure_column(&mut headers, &mut rows, DUPLICATE_COLUMN);
        for (i, row) in rows.iter_mut().enumerate() {
            row[verification_idx] = if verification[i] {
                normalize::NAME_VERIFICATION_SENTINEL.to_string()
            } else {
                VERIFICATION_OK.to_string()
            };
            row[total_idx] = render_cell(totals[i].as_ref());
            row[duplicate_idx] = duplicate_flags[i].to_string();
        }

        let report = CleanReport {
            rows: rows.len(),
            fields: tallies,
            needs_verification: verification.iter().filter(|flagged| **flagged).count(),
            outliers: vec![
                outliers::detect_outliers(FieldRole::ProductPrice.header(), &price_samples),
                outliers::detect_outliers(FieldRole::QuantityOrdered.header(), &quantity_samples),
                outliers::detect_outliers(TOTAL_COLUMN, &total_samples),
            ],
            duplicates: duplicate_report,
        };

        PipelineOutcome {
            headers,
            rows,
            report,
        }
    }

    /// Marks rows whose name is missing while a contact channel exists. The
    /// sentinel goes into the name cell here so the name normalizer can pass
    /// it through in the next step. A sentinel left by an earlier run still
    /// counts as missing, which keeps re-cleaning stable.
    fn flag_unverifiable_names(&self, rows: &mut [Vec<String>]) -> Vec<bool> {
        let Some(name_idx) = self.fields.index_of(FieldRole::CustomerName) else {
            return vec![false; rows.len()];
        };
        let email_idx = self.fields.index_of(FieldRole::CustomerEmail);
        let phone_idx = self.fields.index_of(FieldRole::CustomerPhone);
        let mut flags = Vec::with_capacity(rows.len());
        for row in rows.iter_mut() {
            let missing = normalize::is_missing_name(non_empty(&row[name_idx]))
                || row[name_idx] == normalize::NAME_VERIFICATION_SENTINEL;
            let has_contact = normalize::has_content(cell_at(row, email_idx))
                || normalize::has_content(cell_at(row, phone_idx));
            let flagged = missing && has_contact;
            if flagged {
                row[name_idx] = normalize::NAME_VERIFICATION_SENTINEL.to_string();
            }
            flags.push(flagged);
        }
        flags
    }

    fn normalize_role(
        &self,
        rows: &mut [Vec<String>],
        role: FieldRole,
        tallies: &mut Vec<FieldTally>,
        normalize: impl Fn(Option<&str>) -> Option<CanonicalValue>,
    ) -> Vec<Option<CanonicalValue>> {
        match self.fields.index_of(role) {
            Some(idx) => {
                let (column, tally) = normalize_column(rows, idx, role, normalize);
                tallies.push(tally);
                column
            }
            None => vec![None; rows.len()],
        }
    }
}

fn normalize_column(
    rows: &mut [Vec<String>],
    idx: usize,
    role: FieldRole,
    normalize: impl Fn(Option<&str>) -> Option<CanonicalValue>,
) -> (Vec<Option<CanonicalValue>>, FieldTally) {
    let mut column = Vec::with_capacity(rows.len());
    let mut tally = FieldTally::new(role);
    for row in rows.iter_mut() {
        let present = !row[idx].is_empty();
        let canonical = normalize(non_empty(&row[idx]));
        tally.observe(present, canonical.is_some());
        row[idx] = render_cell(canonical.as_ref());
        column.push(canonical);
    }
    (column, tally)
}

/// Price times quantity, null when either side is null or the product does
/// not fit a decimal.
fn derive_totals(
    prices: &[Option<CanonicalValue>],
    quantities: &[Option<CanonicalValue>],
) -> Vec<Option<CanonicalValue>> {
    prices
        .iter()
        .zip(quantities)
        .map(|(price, quantity)| match (price, quantity) {
            (Some(CanonicalValue::Money(price)), Some(CanonicalValue::Count(quantity))) => price
                .checked_mul(Decimal::from(*quantity))
                .map(CanonicalValue::Money),
            _ => None,
        })
        .collect()
}

/// Non-null values of a canonical column paired with their 1-based rows.
fn metric_samples(column: &[Option<CanonicalValue>]) -> Vec<(usize, f64)> {
    column
        .iter()
        .enumerate()
        .filter_map(|(idx, value)| Some((idx + 1, value.as_ref()?.metric()?)))
        .collect()
}

fn square_rows(rows: &mut [Vec<String>], width: usize) {
    for row in rows.iter_mut() {
        if row.len() < width {
            row.resize(width, String::new());
        } else if row.len() > width {
            row.truncate(width);
        }
    }
}

/// Reuses an existing column of this name (re-cleaning an already cleaned
/// file) or appends a fresh one, keeping the rows square either way.
fn ensure_column(headers: &mut Vec<String>, rows: &mut [Vec<String>], name: &str) -> usize {
    if let Some(idx) = headers.iter().position(|header| header == name) {
        return idx;
    }
    headers.push(name.to_string());
    for row in rows.iter_mut() {
        row.push(String::new());
    }
    headers.len() - 1
}

fn non_empty(cell: &str) -> Option<&str> {
    (!cell.is_empty()).then_some(cell)
}

fn cell_at(row: &[String], idx: Option<usize>) -> Option<&str> {
    idx.and_then(|idx| row.get(idx)).map(String::as_str)
}
