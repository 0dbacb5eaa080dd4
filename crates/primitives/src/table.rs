//! Date-by-quantile table type.

use serde::{Deserialize, Serialize};

use crate::Date;

/// A date × quantile grid of `f64` values in ascending date order.
///
/// Quantile labels run 1..=Q (1 = lowest factor values). Cells with no
/// members hold `NaN`. Used for per-quantile mean forward returns and
/// per-quantile turnover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileTable {
    dates: Vec<Date>,
    n_quantiles: u32,
    /// Row-major values (dates.len() * n_quantiles).
    values: Vec<f64>,
}

impl QuantileTable {
    /// Create a table from per-date rows, each of length `n_quantiles`.
    #[must_use]
    pub fn from_rows(dates: Vec<Date>, n_quantiles: u32, rows: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(dates.len(), rows.len());
        debug_assert!(rows.iter().all(|r| r.len() == n_quantiles as usize));
        debug_assert!(dates.windows(2).all(|w| w[0] <= w[1]));
        let values = rows.into_iter().flatten().collect();
        Self { dates, n_quantiles, values }
    }

    /// Number of dates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the table has no dates.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of quantiles Q.
    #[must_use]
    pub const fn n_quantiles(&self) -> u32 {
        self.n_quantiles
    }

    /// The date index.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// The row for one date, indexed by quantile − 1.
    #[must_use]
    pub fn row(&self, date: Date) -> Option<&[f64]> {
        let q = self.n_quantiles as usize;
        self.dates.iter().position(|&d| d == date).map(|i| &self.values[i * q..(i + 1) * q])
    }

    /// Cell value for (date, quantile); quantile in 1..=Q.
    #[must_use]
    pub fn get(&self, date: Date, quantile: u32) -> Option<f64> {
        if quantile == 0 || quantile > self.n_quantiles {
            return None;
        }
        self.row(date).map(|r| r[(quantile - 1) as usize])
    }

    /// One quantile's values across all dates, as a [`crate::DateSeries`].
    #[must_use]
    pub fn column(&self, quantile: u32) -> Option<crate::DateSeries> {
        if quantile == 0 || quantile > self.n_quantiles {
            return None;
        }
        let q = self.n_quantiles as usize;
        let idx = (quantile - 1) as usize;
        let values = (0..self.dates.len()).map(|i| self.values[i * q + idx]).collect();
        Some(crate::DateSeries::new(self.dates.clone(), values))
    }

    /// NaN-skipping mean per quantile, indexed by quantile − 1.
    #[must_use]
    pub fn quantile_means(&self) -> Vec<f64> {
        (1..=self.n_quantiles)
            .map(|q| self.column(q).map_or(f64::NAN, |s| s.mean()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn table_rows_and_cells() {
        let t = QuantileTable::from_rows(
            vec![d(1), d(2)],
            2,
            vec![vec![0.1, -0.05], vec![f64::NAN, 0.2]],
        );
        assert_eq!(t.len(), 2);
        assert_eq!(t.n_quantiles(), 2);
        assert_eq!(t.get(d(1), 1), Some(0.1));
        assert_eq!(t.get(d(1), 2), Some(-0.05));
        assert!(t.get(d(2), 1).unwrap().is_nan());
        assert_eq!(t.get(d(1), 3), None);
        assert_eq!(t.get(d(3), 1), None);
    }

    #[test]
    fn column_skips_nothing_means_skip_nan() {
        let t = QuantileTable::from_rows(
            vec![d(1), d(2)],
            2,
            vec![vec![1.0, 3.0], vec![f64::NAN, 5.0]],
        );
        let col1 = t.column(1).unwrap();
        assert_eq!(col1.len(), 2);
        assert_relative_eq!(col1.mean(), 1.0, epsilon = 1e-12);
        let means = t.quantile_means();
        assert_relative_eq!(means[1], 4.0, epsilon = 1e-12);
    }
}
