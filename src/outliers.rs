//! IQR-based outlier detection over a completed numeric column.

use serde::{Deserialize, Serialize};

/// One flagged value with the 1-based data row it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outlier {
    pub row: usize,
    pub value: f64,
}

/// Bounds and flagged values for one analyzed column. The bounds are `None`
/// when the column had no usable values to analyze.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierReport {
    pub column: String,
    pub analyzed: usize,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    pub outliers: Vec<Outlier>,
}

impl OutlierReport {
    pub fn has_data(&self) -> bool {
        self.analyzed > 0
    }
}

/// Computes 1.5×IQR bounds over the non-null values of one column and
/// partitions them. The lower bound is clamped to zero since the analyzed
/// quantities cannot be negative. Values sitting exactly on a bound are in
/// range; only strict excursions are flagged.
pub fn detect_outliers(column: &str, samples: &[(usize, f64)]) -> OutlierReport {
    if samples.is_empty() {
        return OutlierReport {
            column: column.to_string(),
            analyzed: 0,
            lower_bound: None,
            upper_bound: None,
            outliers: Vec::new(),
        };
    }
    let mut sorted: Vec<f64> = samples.iter().map(|(_, value)| *value).collect();
    sorted.sort_by(f64::total_cmp);
    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower = (q1 - 1.5 * iqr).max(0.0);
    let upper = q3 + 1.5 * iqr;
    let outliers = samples
        .iter()
        .filter(|(_, value)| *value < lower || *value > upper)
        .map(|(row, value)| Outlier {
            row: *row,
            value: *value,
        })
        .collect();
    OutlierReport {
        column: column.to_string(),
        analyzed: samples.len(),
        lower_bound: Some(lower),
        upper_bound: Some(upper),
        outliers,
    }
}

/// Quantile with linear interpolation between the closest ranks, matching
/// how the usual dataframe tooling computes quartiles. `sorted` must be
/// non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = (sorted.len() - 1) as f64 * q;
    let below = position.floor() as usize;
    let above = position.ceil() as usize;
    let fraction = position - below as f64;
    sorted[below] + (sorted[above] - sorted[below]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[f64]) -> Vec<(usize, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(idx, value)| (idx + 1, *value))
            .collect()
    }

    #[test]
    fn flags_the_lone_extreme() {
        let report = detect_outliers("product_price", &rows(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]));
        assert_eq!(report.lower_bound, Some(0.0));
        assert_eq!(report.upper_bound, Some(8.5));
        assert_eq!(report.outliers.len(), 1);
        assert_eq!(report.outliers[0].row, 6);
        assert_eq!(report.outliers[0].value, 100.0);
    }

    #[test]
    fn interpolated_quartiles() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        assert_eq!(quantile(&sorted, 0.25), 2.25);
        assert_eq!(quantile(&sorted, 0.75), 4.75);
        assert_eq!(quantile(&sorted, 0.5), 3.5);
    }

    #[test]
    fn values_inside_the_bounds_are_not_flagged() {
        let report = detect_outliers("quantity", &rows(&[1.0, 2.0, 3.0, 4.0, 5.0, 8.0]));
        assert_eq!(report.lower_bound, Some(0.0));
        assert_eq!(report.upper_bound, Some(8.5));
        assert!(report.outliers.is_empty());
    }

    #[test]
    fn constant_column_has_no_outliers() {
        let report = detect_outliers("quantity", &rows(&[5.0, 5.0, 5.0, 5.0]));
        assert_eq!(report.lower_bound, Some(5.0));
        assert_eq!(report.upper_bound, Some(5.0));
        assert!(report.outliers.is_empty());
    }

    #[test]
    fn single_value_is_its_own_quartiles() {
        let report = detect_outliers("total_value", &rows(&[42.0]));
        assert_eq!(report.lower_bound, Some(42.0));
        assert_eq!(report.upper_bound, Some(42.0));
        assert!(report.outliers.is_empty());
    }

    #[test]
    fn empty_column_reports_no_data() {
        let report = detect_outliers("product_price", &[]);
        assert!(!report.has_data());
        assert_eq!(report.lower_bound, None);
        assert_eq!(report.upper_bound, None);
        assert!(report.outliers.is_empty());
    }
}
