//! Per-date preprocessing transforms.

use polars::prelude::*;

use crate::PreprocessError;

/// A preprocessing step over a panel.
///
/// Each step consumes the panel and returns a new panel with one column
/// replaced (or rows filtered). Cross-sectional steps handle each date's
/// slice independently, so no step can move information across dates.
pub trait Transform: Send + Sync + std::fmt::Debug {
    /// Apply the transform to a panel.
    ///
    /// # Errors
    /// Returns an error if the underlying query cannot be built.
    fn apply(&self, lf: LazyFrame) -> Result<LazyFrame, PreprocessError>;

    /// Returns the name of this transform.
    fn name(&self) -> &str;
}

/// Clamp a column element-wise to `[lower, upper]`.
///
/// A pure pointwise map; nulls pass through untouched. Either bound may
/// be infinite for a one-sided clamp.
#[derive(Debug, Clone)]
pub struct Clip {
    column: String,
    lower: f64,
    upper: f64,
}

impl Clip {
    /// Create a clamp of `column` to `[lower, upper]`.
    ///
    /// # Errors
    /// Returns [`PreprocessError::InvalidParameter`] when `lower > upper`
    /// or either bound is NaN.
    pub fn new(column: impl Into<String>, lower: f64, upper: f64) -> Result<Self, PreprocessError> {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(PreprocessError::InvalidParameter(format!(
                "clip bounds must satisfy lower <= upper, got ({lower}, {upper})"
            )));
        }
        Ok(Self { column: column.into(), lower, upper })
    }
}

impl Transform for Clip {
    fn apply(&self, lf: LazyFrame) -> Result<LazyFrame, PreprocessError> {
        let target = col(&self.column).cast(DataType::Float64);
        Ok(lf.with_column(
            when(target.clone().lt(lit(self.lower)))
                .then(lit(self.lower))
                .when(target.clone().gt(lit(self.upper)))
                .then(lit(self.upper))
                .otherwise(target)
                .alias(&self.column),
        ))
    }

    fn name(&self) -> &str {
        "clip"
    }
}

/// Standardize a column to zero mean and unit variance per date.
///
/// Dates with fewer than two observations, or a degenerate (zero)
/// standard deviation, yield nulls for that date's rows.
#[derive(Debug, Clone)]
pub struct ZScore {
    column: String,
}

impl ZScore {
    /// Create a per-date z-score of `column`.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Transform for ZScore {
    fn apply(&self, lf: LazyFrame) -> Result<LazyFrame, PreprocessError> {
        let target = col(&self.column);
        let mean = target.clone().mean().over([col("date")]);
        let std = target.clone().std(1).over([col("date")]);
        Ok(lf.with_column(
            when(std.clone().gt(lit(0.0)))
                .then((target - mean) / std)
                .otherwise(lit(NULL))
                .alias(&self.column),
        ))
    }

    fn name(&self) -> &str {
        "zscore"
    }
}

/// Replace a column with average-tie ranks scaled to [0, 1] per date.
///
/// The lowest value maps to 0 and the highest to 1; a date with a single
/// observation maps to 0.5 (the midpoint). Nulls stay null.
#[derive(Debug, Clone)]
pub struct Rank {
    column: String,
}

impl Rank {
    /// Create a per-date rank mapping of `column`.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Transform for Rank {
    fn apply(&self, lf: LazyFrame) -> Result<LazyFrame, PreprocessError> {
        let target = col(&self.column);
        let options = RankOptions { method: RankMethod::Average, descending: false };
        let rank = target
            .clone()
            .rank(options, None)
            .cast(DataType::Float64)
            .over([col("date")]);
        let n = target.clone().count().cast(DataType::Float64).over([col("date")]);
        Ok(lf.with_column(
            when(target.is_null())
                .then(lit(NULL))
                .when(n.clone().gt(lit(1.0)))
                .then((rank - lit(1.0)) / (n - lit(1.0)))
                .otherwise(lit(0.5))
                .alias(&self.column),
        ))
    }

    fn name(&self) -> &str {
        "rank"
    }
}

/// Drop rows where any listed column is null or NaN.
#[derive(Debug, Clone)]
pub struct DropNa {
    columns: Vec<String>,
}

impl DropNa {
    /// Create a row filter over `columns`.
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { columns: columns.into_iter().map(Into::into).collect() }
    }
}

impl Transform for DropNa {
    fn apply(&self, lf: LazyFrame) -> Result<LazyFrame, PreprocessError> {
        let mut lf = lf;
        for column in &self.columns {
            lf = lf.filter(
                col(column)
                    .is_not_null()
                    .and(col(column).cast(DataType::Float64).is_not_nan()),
            );
        }
        Ok(lf)
    }

    fn name(&self) -> &str {
        "dropna"
    }
}
