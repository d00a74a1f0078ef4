//! The cleaning report: what was normalized, what was nulled, what needs a
//! human, and what the whole-table analyses found.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::duplicates::DuplicateReport;
use crate::fields::FieldRole;
use crate::outliers::OutlierReport;
use crate::table;

/// Per-column normalization counts. `present` is the number of non-empty raw
/// cells, `normalized` how many produced a canonical value, `nulled` how many
/// were present but unusable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldTally {
    pub column: String,
    pub present: usize,
    pub normalized: usize,
    pub nulled: usize,
}

impl FieldTally {
    pub fn new(role: FieldRole) -> Self {
        Self {
            column: role.header().to_string(),
            present: 0,
            normalized: 0,
            nulled: 0,
        }
    }

    pub fn observe(&mut self, present: bool, normalized: bool) {
        if present {
            self.present += 1;
        }
        if normalized {
            self.normalized += 1;
        } else if present {
            self.nulled += 1;
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CleanReport {
    pub rows: usize,
    pub fields: Vec<FieldTally>,
    pub needs_verification: usize,
    pub outliers: Vec<OutlierReport>,
    pub duplicates: DuplicateReport,
}

impl CleanReport {
    pub fn render_console(&self) {
        println!("Rows processed: {}", self.rows);
        println!("Needs verification: {}", self.needs_verification);
        println!(
            "Duplicates flagged: {} across {} group(s)",
            self.duplicates.flagged, self.duplicates.groups
        );
        if !self.fields.is_empty() {
            println!();
            let rows = self
                .fields
                .iter()
                .map(|tally| {
                    vec![
                        tally.column.clone(),
                        tally.present.to_string(),
                        tally.normalized.to_string(),
                        tally.nulled.to_string(),
                    ]
                })
                .collect::<Vec<_>>();
            table::print_table(&string_row(&["column", "present", "normalized", "nulled"]), &rows);
        }
        if !self.outliers.is_empty() {
            println!();
            let rows = self
                .outliers
                .iter()
                .map(|report| {
                    vec![
                        report.column.clone(),
                        report.analyzed.to_string(),
                        bound_cell(report.lower_bound),
                        bound_cell(report.upper_bound),
                        if report.has_data() {
                            report.outliers.len().to_string()
                        } else {
                            "no data".to_string()
                        },
                    ]
                })
                .collect::<Vec<_>>();
            table::print_table(
                &string_row(&["column", "analyzed", "lower_bound", "upper_bound", "outliers"]),
                &rows,
            );
            let detail = self
                .outliers
                .iter()
                .flat_map(|report| {
                    report.outliers.iter().map(|outlier| {
                        vec![
                            report.column.clone(),
                            outlier.row.to_string(),
                            format_value(outlier.value),
                        ]
                    })
                })
                .collect::<Vec<_>>();
            if !detail.is_empty() {
                println!();
                table::print_table(&string_row(&["column", "row", "value"]), &detail);
            }
        }
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating report file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing report JSON")
    }
}

fn string_row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

fn bound_cell(bound: Option<f64>) -> String {
    bound.map(|value| format!("{value:.2}")).unwrap_or_default()
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
