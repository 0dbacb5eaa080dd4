//! Per-asset lag alignment.

use polars::prelude::*;

use crate::contract::{ASSET_COL, DATE_COL};

/// Add one `{column}_lag{periods}` column per listed column, holding the
/// original shifted forward in time by `periods` rows within each asset.
///
/// Useful for aligning signals observed at `t - periods` with outcomes
/// at `t` without leaking future information.
pub fn lag_by_asset(lf: LazyFrame, columns: &[&str], periods: u32) -> LazyFrame {
    let sort_options = SortMultipleOptions::new().with_maintain_order(true);
    let mut lf = lf.sort([DATE_COL], sort_options);
    for &column in columns {
        lf = lf.with_column(
            col(column)
                .shift(lit(i64::from(periods)))
                .over([col(ASSET_COL)])
                .alias(format!("{column}_lag{periods}")),
        );
    }
    lf
}
