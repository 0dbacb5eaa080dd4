//! Portfolio-sort factor returns: quantile bucket means and the
//! high-minus-low spread.

use nazare_math::{TTestResult, ttest_1samp};
use nazare_metrics::{assign_quantiles, long_short_series, quantile_returns};
use nazare_panel::require_columns;
use nazare_primitives::{DateSeries, QuantileTable};
use polars::prelude::*;

use crate::ModelError;

/// Factor returns estimated by sorting the cross-section into quantile
/// portfolios rather than regressing.
#[derive(Debug, Clone)]
pub struct SortFactorReturns {
    /// Mean forward return per (date, quantile) bucket.
    pub table: QuantileTable,
    /// Top-minus-bottom bucket spread per date.
    pub spread: DateSeries,
}

impl SortFactorReturns {
    /// Two-sided t-test of the spread against a zero mean.
    ///
    /// NaN-filled when fewer than two dates carry a finite spread.
    #[must_use]
    pub fn spread_t_test(&self) -> TTestResult {
        ttest_1samp(self.spread.values(), 0.0)
    }
}

/// Bucket the cross-section into `n_groups` per date by `factor_col` and
/// average `fwd_col` within each bucket.
///
/// # Errors
/// Returns an error when a required column is absent or `n_groups < 2`.
pub fn sort_factor_returns(
    df: &DataFrame,
    factor_col: &str,
    fwd_col: &str,
    n_groups: u32,
) -> Result<SortFactorReturns, ModelError> {
    require_columns(df, &[factor_col, fwd_col])?;
    let bucketed = assign_quantiles(df.clone().lazy(), factor_col, n_groups)?.collect()?;
    let table = quantile_returns(&bucketed, fwd_col, n_groups)?;
    let spread = long_short_series(&table);
    Ok(SortFactorReturns { table, spread })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nazare_primitives::Date;

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn panel() -> DataFrame {
        df! {
            "date" => &[d(1), d(1), d(1), d(1), d(2), d(2), d(2), d(2)],
            "asset" => &["A", "B", "C", "D", "A", "B", "C", "D"],
            "alpha" => &[1.0, 2.0, 3.0, 4.0, 4.0, 3.0, 2.0, 1.0],
            "fwd_ret_1" => &[0.01, 0.02, 0.03, 0.04, 0.04, 0.03, 0.02, 0.01],
        }
        .unwrap()
    }

    #[test]
    fn bucket_means_and_spread() {
        let out = sort_factor_returns(&panel(), "alpha", "fwd_ret_1", 2).unwrap();
        assert_eq!(out.table.n_quantiles(), 2);
        // date 1: low bucket {A, B}, high bucket {C, D}
        assert_relative_eq!(out.table.get(d(1), 1).unwrap(), 0.015, epsilon = 1e-12);
        assert_relative_eq!(out.table.get(d(1), 2).unwrap(), 0.035, epsilon = 1e-12);
        assert_relative_eq!(out.spread.get(d(1)).unwrap(), 0.02, epsilon = 1e-12);
        assert_relative_eq!(out.spread.get(d(2)).unwrap(), 0.02, epsilon = 1e-12);
    }

    #[test]
    fn spread_t_test_on_constant_spread() {
        let out = sort_factor_returns(&panel(), "alpha", "fwd_ret_1", 2).unwrap();
        let t = out.spread_t_test();
        assert_eq!(t.nobs, 2);
        // zero-variance spread degenerates to NaN, never a crash
        assert!(t.statistic.is_nan());
    }

    #[test]
    fn too_few_groups_is_rejected() {
        let err = sort_factor_returns(&panel(), "alpha", "fwd_ret_1", 1).unwrap_err();
        assert!(matches!(err, ModelError::Metrics(_)));
    }

    #[test]
    fn missing_factor_column_fails_fast() {
        let err = sort_factor_returns(&panel(), "beta", "fwd_ret_1", 2).unwrap_err();
        assert!(matches!(err, ModelError::Schema(_)));
    }
}
