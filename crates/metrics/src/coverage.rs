//! Per-date factor coverage.

use nazare_panel::float_column;
use nazare_primitives::DateSeries;
use polars::prelude::*;

use crate::MetricsError;
use crate::group::partition_by_date;

/// Fraction of rows with a non-missing `factor_col` value per date.
///
/// NaN values count as missing, matching the pairwise-complete treatment
/// used by the correlation metrics.
///
/// # Errors
/// Returns an error if a required column is absent.
pub fn coverage_by_date(df: &DataFrame, factor_col: &str) -> Result<DateSeries, MetricsError> {
    let parts = partition_by_date(df)?;
    let mut dates = Vec::with_capacity(parts.len());
    let mut values = Vec::with_capacity(parts.len());
    for (date, part) in parts {
        let xs = float_column(&part, factor_col)?;
        let valid = xs.iter().filter(|v| v.is_finite()).count();
        dates.push(date);
        values.push(valid as f64 / xs.len() as f64);
    }
    Ok(DateSeries::new(dates, values))
}

#[cfg(test)]
mod tests {
    use nazare_primitives::Date;

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn fraction_non_missing_per_date() {
        let df = df! {
            "date" => &[d(1), d(1), d(1), d(2), d(2)],
            "asset" => &["A", "B", "C", "A", "B"],
            "alpha" => &[Some(1.0), None, Some(f64::NAN), Some(2.0), Some(3.0)],
        }
        .unwrap();
        let cov = coverage_by_date(&df, "alpha").unwrap();
        assert_eq!(cov.get(d(1)), Some(1.0 / 3.0));
        assert_eq!(cov.get(d(2)), Some(1.0));
    }

    #[test]
    fn missing_column_is_an_error() {
        let df = df! {
            "date" => &[d(1)],
            "asset" => &["A"],
        }
        .unwrap();
        assert!(matches!(
            coverage_by_date(&df, "alpha").unwrap_err(),
            MetricsError::Schema(nazare_panel::SchemaError::MissingColumn(_))
        ));
    }
}
