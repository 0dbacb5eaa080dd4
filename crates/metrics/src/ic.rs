//! Information coefficients and their information ratio.

use std::str::FromStr;

use nazare_math::{pearson, spearman};
use nazare_panel::float_column;
use nazare_primitives::DateSeries;
use polars::prelude::*;

use crate::MetricsError;
use crate::group::partition_by_date;

/// Correlation method for the information coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcMethod {
    /// Pearson correlation of raw values.
    Pearson,
    /// Spearman rank correlation.
    Spearman,
}

impl IcMethod {
    /// The method name as used in configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
        }
    }
}

impl std::fmt::Display for IcMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IcMethod {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pearson" => Ok(Self::Pearson),
            "spearman" => Ok(Self::Spearman),
            other => Err(MetricsError::InvalidParameter(format!("unknown IC method: {other}"))),
        }
    }
}

/// Per-date information coefficient of `factor_col` against `return_col`.
///
/// Each date contributes one entry: the correlation over that date's
/// complete (factor, return) pairs, or `NaN` when fewer than two pairs
/// remain or either side is constant.
///
/// # Errors
/// Returns an error if a required column is absent or the panel cannot
/// be partitioned.
pub fn ic_series(
    df: &DataFrame,
    factor_col: &str,
    return_col: &str,
    method: IcMethod,
) -> Result<DateSeries, MetricsError> {
    let parts = partition_by_date(df)?;
    let mut dates = Vec::with_capacity(parts.len());
    let mut values = Vec::with_capacity(parts.len());
    for (date, part) in parts {
        let xs = float_column(&part, factor_col)?;
        let ys = float_column(&part, return_col)?;
        let ic = match method {
            IcMethod::Pearson => pearson(&xs, &ys),
            IcMethod::Spearman => spearman(&xs, &ys),
        };
        dates.push(date);
        values.push(ic);
    }
    Ok(DateSeries::new(dates, values))
}

/// Information ratio of an IC series: mean over standard deviation of
/// the finite entries.
///
/// Returns `NaN` when fewer than two finite entries remain or the
/// standard deviation is zero.
#[must_use]
pub fn icir(series: &DateSeries) -> f64 {
    if series.count_finite() < 2 {
        return f64::NAN;
    }
    let std = series.std();
    if std == 0.0 || !std.is_finite() {
        return f64::NAN;
    }
    series.mean() / std
}
