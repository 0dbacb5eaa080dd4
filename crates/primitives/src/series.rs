//! Date-indexed series type.

use serde::{Deserialize, Serialize};

use crate::Date;

/// A date-indexed `f64` series in ascending date order.
///
/// Missing observations are represented as `NaN` and are skipped by the
/// summary statistics. The series is a pure value: constructed once,
/// never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateSeries {
    dates: Vec<Date>,
    values: Vec<f64>,
}

impl DateSeries {
    /// Create a new series from parallel date/value vectors.
    ///
    /// Dates must already be in ascending order; callers producing
    /// per-date results are responsible for sorting before assembly.
    #[must_use]
    pub fn new(dates: Vec<Date>, values: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        debug_assert!(dates.windows(2).all(|w| w[0] <= w[1]));
        Self { dates, values }
    }

    /// Create an empty series.
    #[must_use]
    pub const fn empty() -> Self {
        Self { dates: Vec::new(), values: Vec::new() }
    }

    /// Number of entries (including NaN entries).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The date index.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// The values, parallel to [`Self::dates`].
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at a specific date.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<f64> {
        self.dates.iter().position(|&d| d == date).map(|i| self.values[i])
    }

    /// Iterate over (date, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Number of finite (non-NaN) values.
    #[must_use]
    pub fn count_finite(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Mean of the finite values; NaN when there are none.
    #[must_use]
    pub fn mean(&self) -> f64 {
        let finite: Vec<f64> = self.values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return f64::NAN;
        }
        finite.iter().sum::<f64>() / finite.len() as f64
    }

    /// Sample standard deviation (ddof=1) of the finite values; NaN when
    /// fewer than two.
    #[must_use]
    pub fn std(&self) -> f64 {
        let finite: Vec<f64> = self.values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.len() < 2 {
            return f64::NAN;
        }
        let mean = finite.iter().sum::<f64>() / finite.len() as f64;
        let var =
            finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (finite.len() - 1) as f64;
        var.sqrt()
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
    fn series_accessors() {
        let s = DateSeries::new(vec![d(1), d(2), d(3)], vec![0.1, f64::NAN, 0.3]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.count_finite(), 2);
        assert_eq!(s.get(d(1)), Some(0.1));
        assert!(s.get(d(2)).unwrap().is_nan());
        assert_eq!(s.get(d(4)), None);
    }

    #[test]
    fn mean_and_std_skip_nan() {
        let s = DateSeries::new(vec![d(1), d(2), d(3), d(4)], vec![1.0, f64::NAN, 2.0, 3.0]);
        assert_relative_eq!(s.mean(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(s.std(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_statistics_are_nan() {
        let s = DateSeries::new(vec![d(1)], vec![5.0]);
        assert!(s.std().is_nan());
        assert!(DateSeries::empty().mean().is_nan());
    }
}
