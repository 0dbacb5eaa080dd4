//! Per-date partitioning of panel frames.

use nazare_panel::{DATE_COL, date_column};
use nazare_primitives::Date;
use polars::prelude::*;

use crate::MetricsError;

/// Split `df` into per-date frames in ascending date order.
///
/// Each date's slice is materialized in isolation, so no per-date
/// computation downstream can observe another date's rows.
///
/// # Errors
/// Returns an error if the date column is absent, not a date dtype, or
/// holds nulls.
pub fn partition_by_date(df: &DataFrame) -> Result<Vec<(Date, DataFrame)>, MetricsError> {
    let sorted = df
        .clone()
        .lazy()
        .sort([DATE_COL], SortMultipleOptions::new().with_maintain_order(true))
        .collect()?;
    let parts = sorted.partition_by_stable([DATE_COL], true)?;
    parts
        .into_iter()
        .map(|part| {
            let dates = date_column(&part)?;
            let date = dates
                .first()
                .copied()
                .ok_or_else(|| MetricsError::InvalidParameter("empty partition".to_string()))?;
            Ok((date, part))
        })
        .collect()
}
