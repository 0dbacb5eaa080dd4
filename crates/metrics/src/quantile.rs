//! Quantile portfolio assignment, returns, spreads, and turnover.

use std::collections::HashSet;

use nazare_panel::{ASSET_COL, float_column};
use nazare_primitives::{DateSeries, QuantileTable};
use polars::prelude::*;

use crate::MetricsError;
use crate::group::partition_by_date;

/// Name of the assigned quantile label column.
pub const QUANTILE_COL: &str = "quantile";

/// Assign per-date quantile labels 1..=Q on `factor_col`.
///
/// Within each date, non-missing factor values are ranked ascending with
/// first-occurrence tie-breaking and split into `n_quantiles` near-equal
/// buckets, label 1 holding the lowest values. Rows with missing factor
/// values, and entire dates with fewer non-missing values than
/// `n_quantiles`, receive null labels.
///
/// # Errors
/// Returns [`MetricsError::InvalidParameter`] when `n_quantiles < 2`.
pub fn assign_quantiles(
    lf: LazyFrame,
    factor_col: &str,
    n_quantiles: u32,
) -> Result<LazyFrame, MetricsError> {
    if n_quantiles < 2 {
        return Err(MetricsError::InvalidParameter(format!(
            "n_quantiles must be >= 2, got {n_quantiles}"
        )));
    }
    // NaN counts as missing, matching coverage; rank would otherwise
    // order it above every finite value
    let factor = when(col(factor_col).cast(DataType::Float64).is_not_nan())
        .then(col(factor_col).cast(DataType::Float64))
        .otherwise(lit(NULL));
    let options = RankOptions { method: RankMethod::Ordinal, descending: false };
    let rank = factor.clone().rank(options, None).cast(DataType::Int64).over([col("date")]);
    let n = factor.count().cast(DataType::Int64).over([col("date")]);
    let label = ((rank - lit(1i64)) * lit(i64::from(n_quantiles)))
        .floor_div(n.clone())
        + lit(1i64);
    Ok(lf.with_column(
        when(n.gt_eq(lit(i64::from(n_quantiles))))
            .then(label)
            .otherwise(lit(NULL))
            .cast(DataType::UInt32)
            .alias(QUANTILE_COL),
    ))
}

/// Per-date mean of `return_col` within each quantile bucket.
///
/// Requires the [`QUANTILE_COL`] column produced by [`assign_quantiles`].
/// A cell is `NaN` when the bucket has no members with a non-missing
/// return on that date.
///
/// # Errors
/// Returns an error if a required column is absent.
pub fn quantile_returns(
    df: &DataFrame,
    return_col: &str,
    n_quantiles: u32,
) -> Result<QuantileTable, MetricsError> {
    if df.column(QUANTILE_COL).is_err() {
        return Err(MetricsError::MissingColumn(QUANTILE_COL.to_string()));
    }
    let parts = partition_by_date(df)?;
    let mut dates = Vec::with_capacity(parts.len());
    let mut rows = Vec::with_capacity(parts.len());
    for (date, part) in parts {
        let labels = label_column(&part)?;
        let rets = float_column(&part, return_col)?;
        let mut sums = vec![0.0; n_quantiles as usize];
        let mut counts = vec![0usize; n_quantiles as usize];
        for (label, ret) in labels.iter().zip(rets.iter()) {
            if let Some(q) = label {
                if (1..=n_quantiles).contains(q) && ret.is_finite() {
                    sums[(q - 1) as usize] += ret;
                    counts[(q - 1) as usize] += 1;
                }
            }
        }
        let row: Vec<f64> = sums
            .iter()
            .zip(counts.iter())
            .map(|(s, &c)| if c == 0 { f64::NAN } else { s / c as f64 })
            .collect();
        dates.push(date);
        rows.push(row);
    }
    Ok(QuantileTable::from_rows(dates, n_quantiles, rows))
}

/// Per-date long-short spread: top quantile mean return minus bottom
/// quantile mean return.
///
/// `NaN` on dates where either leg is empty.
#[must_use]
pub fn long_short_series(table: &QuantileTable) -> DateSeries {
    let q = table.n_quantiles();
    let values = table
        .dates()
        .iter()
        .map(|&date| {
            let top = table.get(date, q).unwrap_or(f64::NAN);
            let bottom = table.get(date, 1).unwrap_or(f64::NAN);
            top - bottom
        })
        .collect();
    DateSeries::new(table.dates().to_vec(), values)
}

/// Per-date, per-quantile turnover: the fraction of a bucket's current
/// members that were not in the same bucket on the previous date.
///
/// The first date carries `NaN` (no prior membership), as does any
/// bucket with no current members. An asset absent from the panel on the
/// previous date counts as an entrant.
///
/// # Errors
/// Returns an error if a required column is absent.
pub fn quantile_turnover(df: &DataFrame, n_quantiles: u32) -> Result<QuantileTable, MetricsError> {
    if df.column(QUANTILE_COL).is_err() {
        return Err(MetricsError::MissingColumn(QUANTILE_COL.to_string()));
    }
    let parts = partition_by_date(df)?;
    let mut dates = Vec::with_capacity(parts.len());
    let mut rows = Vec::with_capacity(parts.len());
    let mut prev: Option<Vec<HashSet<String>>> = None;
    for (date, part) in parts {
        let members = bucket_members(&part, n_quantiles)?;
        let row: Vec<f64> = match &prev {
            None => vec![f64::NAN; n_quantiles as usize],
            Some(prev_members) => members
                .iter()
                .zip(prev_members.iter())
                .map(|(current, previous)| {
                    if current.is_empty() {
                        f64::NAN
                    } else {
                        let entrants = current.difference(previous).count();
                        entrants as f64 / current.len() as f64
                    }
                })
                .collect(),
        };
        dates.push(date);
        rows.push(row);
        prev = Some(members);
    }
    Ok(QuantileTable::from_rows(dates, n_quantiles, rows))
}

fn label_column(df: &DataFrame) -> Result<Vec<Option<u32>>, MetricsError> {
    Ok(df.column(QUANTILE_COL)?.u32()?.into_iter().collect())
}

fn bucket_members(
    df: &DataFrame,
    n_quantiles: u32,
) -> Result<Vec<HashSet<String>>, MetricsError> {
    let labels = label_column(df)?;
    let assets = df.column(ASSET_COL)?.str()?;
    let mut members = vec![HashSet::new(); n_quantiles as usize];
    for (label, asset) in labels.iter().zip(assets.into_iter()) {
        if let (Some(q), Some(name)) = (label, asset) {
            if (1..=n_quantiles).contains(q) {
                members[(q - 1) as usize].insert(name.to_string());
            }
        }
    }
    Ok(members)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nazare_primitives::Date;

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn labels_for(df: DataFrame, n_quantiles: u32) -> Vec<Option<u32>> {
        assign_quantiles(df.lazy(), "alpha", n_quantiles)
            .unwrap()
            .sort(["date", "asset"], SortMultipleOptions::default())
            .collect()
            .unwrap()
            .column(QUANTILE_COL)
            .unwrap()
            .u32()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn labels_split_evenly() {
        let df = df! {
            "date" => &[d(1), d(1), d(1), d(1)],
            "asset" => &["A", "B", "C", "D"],
            "alpha" => &[4.0, 1.0, 3.0, 2.0],
        }
        .unwrap();
        // ascending: B(1) D(2) C(3) A(4) -> halves
        assert_eq!(labels_for(df, 2), vec![Some(2), Some(1), Some(2), Some(1)]);
    }

    #[test]
    fn uneven_dates_put_extra_members_low() {
        let df = df! {
            "date" => &[d(1), d(1), d(1), d(1), d(1)],
            "asset" => &["A", "B", "C", "D", "E"],
            "alpha" => &[1.0, 2.0, 3.0, 4.0, 5.0],
        }
        .unwrap();
        // 5 names, 2 buckets: floor(rank0 * 2 / 5) + 1 -> [1, 1, 1, 2, 2]
        assert_eq!(
            labels_for(df, 2),
            vec![Some(1), Some(1), Some(1), Some(2), Some(2)]
        );
    }

    #[test]
    fn missing_factor_and_thin_dates_get_null() {
        let df = df! {
            "date" => &[d(1), d(1), d(1), d(2)],
            "asset" => &["A", "B", "C", "A"],
            "alpha" => &[Some(1.0), None, Some(2.0), Some(1.0)],
        }
        .unwrap();
        // date 1: two valid -> labels, null row stays null
        // date 2: one valid < Q -> all null
        assert_eq!(labels_for(df, 2), vec![Some(1), None, Some(2), None]);
    }

    #[test]
    fn nan_factor_treated_as_missing() {
        let df = df! {
            "date" => &[d(1), d(1), d(1)],
            "asset" => &["A", "B", "C"],
            "alpha" => &[1.0, f64::NAN, 2.0],
        }
        .unwrap();
        // the NaN row gets no label and does not inflate the date's
        // valid count or claim the top bucket
        assert_eq!(labels_for(df, 2), vec![Some(1), None, Some(2)]);
    }

    #[test]
    fn ties_break_by_row_order() {
        let df = df! {
            "date" => &[d(1), d(1)],
            "asset" => &["A", "B"],
            "alpha" => &[1.0, 1.0],
        }
        .unwrap();
        assert_eq!(labels_for(df, 2), vec![Some(1), Some(2)]);
    }

    #[test]
    fn rejects_degenerate_quantile_count() {
        let df = df! {
            "date" => &[d(1)],
            "asset" => &["A"],
            "alpha" => &[1.0],
        }
        .unwrap();
        assert!(assign_quantiles(df.lazy(), "alpha", 1).is_err());
    }

    fn labeled_panel() -> DataFrame {
        let df = df! {
            "date" => &[d(1), d(1), d(2), d(2)],
            "asset" => &["A", "B", "A", "B"],
            "alpha" => &[1.0, 2.0, 2.0, 1.0],
            "fwd_ret_1" => &[0.1, -0.05, 0.09, -0.06],
        }
        .unwrap();
        assign_quantiles(df.lazy(), "alpha", 2).unwrap().collect().unwrap()
    }

    #[test]
    fn bucket_means_per_date() {
        let table = quantile_returns(&labeled_panel(), "fwd_ret_1", 2).unwrap();
        assert_eq!(table.len(), 2);
        // date 1: A low, B high
        assert_relative_eq!(table.get(d(1), 1).unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(table.get(d(1), 2).unwrap(), -0.05, epsilon = 1e-12);
        // date 2: factor flipped, so buckets flip
        assert_relative_eq!(table.get(d(2), 1).unwrap(), -0.06, epsilon = 1e-12);
        assert_relative_eq!(table.get(d(2), 2).unwrap(), 0.09, epsilon = 1e-12);
    }

    #[test]
    fn long_short_is_top_minus_bottom() {
        let table = quantile_returns(&labeled_panel(), "fwd_ret_1", 2).unwrap();
        let ls = long_short_series(&table);
        assert_relative_eq!(ls.get(d(1)).unwrap(), -0.15, epsilon = 1e-12);
        assert_relative_eq!(ls.get(d(2)).unwrap(), 0.15, epsilon = 1e-12);
    }

    #[test]
    fn empty_bucket_yields_nan_cell() {
        let df = df! {
            "date" => &[d(1), d(1)],
            "asset" => &["A", "B"],
            "alpha" => &[1.0, 2.0],
            "fwd_ret_1" => &[Some(0.1), None],
        }
        .unwrap();
        let labeled = assign_quantiles(df.lazy(), "alpha", 2).unwrap().collect().unwrap();
        let table = quantile_returns(&labeled, "fwd_ret_1", 2).unwrap();
        assert_relative_eq!(table.get(d(1), 1).unwrap(), 0.1, epsilon = 1e-12);
        assert!(table.get(d(1), 2).unwrap().is_nan());
    }

    #[test]
    fn turnover_counts_entrants() {
        // date 1: low {A, B}, high {C, D}
        // date 2: low {A, C}, high {B, D} -> half of each bucket is new
        let df = df! {
            "date" => &[d(1), d(1), d(1), d(1), d(2), d(2), d(2), d(2)],
            "asset" => &["A", "B", "C", "D", "A", "B", "C", "D"],
            "alpha" => &[1.0, 2.0, 3.0, 4.0, 1.0, 3.0, 2.0, 4.0],
        }
        .unwrap();
        let labeled = assign_quantiles(df.lazy(), "alpha", 2).unwrap().collect().unwrap();
        let table = quantile_turnover(&labeled, 2).unwrap();
        assert!(table.get(d(1), 1).unwrap().is_nan());
        assert!(table.get(d(1), 2).unwrap().is_nan());
        assert_relative_eq!(table.get(d(2), 1).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(table.get(d(2), 2).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn stable_membership_has_zero_turnover() {
        let df = df! {
            "date" => &[d(1), d(1), d(2), d(2)],
            "asset" => &["A", "B", "A", "B"],
            "alpha" => &[1.0, 2.0, 1.0, 2.0],
        }
        .unwrap();
        let labeled = assign_quantiles(df.lazy(), "alpha", 2).unwrap().collect().unwrap();
        let table = quantile_turnover(&labeled, 2).unwrap();
        assert_relative_eq!(table.get(d(2), 1).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(table.get(d(2), 2).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn new_asset_counts_as_entrant() {
        let df = df! {
            "date" => &[d(1), d(1), d(2), d(2)],
            "asset" => &["A", "B", "C", "B"],
            "alpha" => &[1.0, 2.0, 1.0, 2.0],
        }
        .unwrap();
        let labeled = assign_quantiles(df.lazy(), "alpha", 2).unwrap().collect().unwrap();
        let table = quantile_turnover(&labeled, 2).unwrap();
        assert_relative_eq!(table.get(d(2), 1).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(table.get(d(2), 2).unwrap(), 0.0, epsilon = 1e-12);
    }
}
