//! Panel schema contract: canonical (date, asset) key construction and
//! validation.

use nazare_primitives::Date;
use polars::prelude::*;

use crate::SchemaError;

/// Name of the date key column.
pub const DATE_COL: &str = "date";
/// Name of the asset key column.
pub const ASSET_COL: &str = "asset";

/// Convert a flat table into a canonical panel keyed by (date, asset).
///
/// Renames `date_col`/`asset_col` to the canonical names, parses the
/// date column to a date dtype (string or date input), rejects duplicate
/// keys, and sorts ascending by (date, asset) when `sort` is set.
///
/// # Errors
/// [`SchemaError::MissingColumn`] for an absent key column,
/// [`SchemaError::DateParse`] when the date column cannot be parsed, and
/// [`SchemaError::DuplicateKeys`] when the key is not unique.
pub fn ensure_panel_index(
    df: DataFrame,
    date_col: &str,
    asset_col: &str,
    sort: bool,
) -> Result<DataFrame, SchemaError> {
    for needed in [date_col, asset_col] {
        if df.column(needed).is_err() {
            return Err(SchemaError::MissingColumn(needed.to_string()));
        }
    }
    let date_dtype = df.column(date_col)?.dtype().clone();

    let mut lf = df.lazy().rename([date_col, asset_col], [DATE_COL, ASSET_COL], true);
    match date_dtype {
        DataType::Date => {}
        DataType::String => {
            lf = lf.with_column(
                col(DATE_COL).str().to_date(StrptimeOptions::default()).alias(DATE_COL),
            );
        }
        other => {
            return Err(SchemaError::DateParse(format!(
                "date column has dtype {other}, expected Date or String"
            )));
        }
    }
    if sort {
        lf = lf.sort(
            [DATE_COL, ASSET_COL],
            SortMultipleOptions::new().with_maintain_order(true),
        );
    }
    let out = lf
        .collect()
        .map_err(|e| SchemaError::DateParse(format!("date column parse failed: {e}")))?;

    let dupes = count_duplicate_keys(&out)?;
    if dupes > 0 {
        return Err(SchemaError::DuplicateKeys { count: dupes });
    }
    Ok(out)
}

/// Validate that `df` is a canonical panel.
///
/// The first two columns must be exactly `date` (date dtype) and
/// `asset`, and the key must be unique. Called defensively by
/// downstream operations that assume the contract.
///
/// # Errors
/// [`SchemaError::WrongLayout`] for misnamed or mistyped key columns,
/// [`SchemaError::DuplicateKeys`] for a non-unique key.
pub fn validate_panel(df: &DataFrame) -> Result<(), SchemaError> {
    let names = df.get_column_names_str();
    if names.len() < 2 || names[0] != DATE_COL || names[1] != ASSET_COL {
        return Err(SchemaError::WrongLayout(format!(
            "first columns must be ({DATE_COL}, {ASSET_COL}), got {names:?}"
        )));
    }
    if df.column(DATE_COL)?.dtype() != &DataType::Date {
        return Err(SchemaError::WrongLayout(format!(
            "{DATE_COL} column must have Date dtype, got {}",
            df.column(DATE_COL)?.dtype()
        )));
    }
    let dupes = count_duplicate_keys(df)?;
    if dupes > 0 {
        return Err(SchemaError::DuplicateKeys { count: dupes });
    }
    Ok(())
}

/// Verify that every column in `required` is present.
///
/// # Errors
/// Returns [`SchemaError::MissingColumn`] for the first absent column.
pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), SchemaError> {
    let names = df.get_column_names_str();
    for needed in required {
        if !names.contains(needed) {
            return Err(SchemaError::MissingColumn((*needed).to_string()));
        }
    }
    Ok(())
}

/// Extract the date column of `df` as `Date` values, row by row.
///
/// Null dates are rejected; the panel key must be fully populated.
///
/// # Errors
/// Returns an error if the column is absent, not a date dtype, or holds
/// nulls.
pub fn date_column(df: &DataFrame) -> Result<Vec<Date>, SchemaError> {
    let dates = df.column(DATE_COL)?.date()?;
    dates
        .as_date_iter()
        .map(|d| d.ok_or_else(|| SchemaError::WrongLayout("null date in panel".to_string())))
        .collect()
}

/// Extract a column of `df` as `f64` values with nulls mapped to NaN.
///
/// # Errors
/// Returns [`SchemaError::MissingColumn`] for an absent column.
pub fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, SchemaError> {
    if df.column(name).is_err() {
        return Err(SchemaError::MissingColumn(name.to_string()));
    }
    let values = df.column(name)?.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

fn count_duplicate_keys(df: &DataFrame) -> Result<usize, SchemaError> {
    let dupes = df
        .clone()
        .lazy()
        .group_by([col(DATE_COL), col(ASSET_COL)])
        .agg([len().alias("n")])
        .filter(col("n").gt(lit(1u32)))
        .collect()?;
    Ok(dupes.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn converts_and_sorts_flat_table() {
        let df = df! {
            "dt" => &["2024-01-02", "2024-01-01", "2024-01-01"],
            "ticker" => &["A", "B", "A"],
            "close" => &[11.0, 20.0, 10.0],
        }
        .unwrap();
        let panel = ensure_panel_index(df, "dt", "ticker", true).unwrap();
        assert!(validate_panel(&panel).is_ok());
        assert_eq!(date_column(&panel).unwrap(), vec![d(1), d(1), d(2)]);
        let assets: Vec<&str> =
            panel.column("asset").unwrap().str().unwrap().into_no_null_iter().collect();
        assert_eq!(assets, vec!["A", "B", "A"]);
    }

    #[test]
    fn accepts_native_date_dtype() {
        let df = df! {
            "date" => &[d(1), d(2)],
            "asset" => &["A", "A"],
        }
        .unwrap();
        let panel = ensure_panel_index(df, "date", "asset", true).unwrap();
        assert!(validate_panel(&panel).is_ok());
    }

    #[test]
    fn rejects_missing_key_column() {
        let df = df! {
            "date" => &["2024-01-01"],
        }
        .unwrap();
        let err = ensure_panel_index(df, "date", "asset", true).unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn(ref c) if c == "asset"));
    }

    #[test]
    fn rejects_duplicate_keys_with_count() {
        let df = df! {
            "date" => &["2024-01-01", "2024-01-01", "2024-01-02"],
            "asset" => &["A", "A", "A"],
        }
        .unwrap();
        let err = ensure_panel_index(df, "date", "asset", true).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateKeys { count: 1 }));
    }

    #[test]
    fn rejects_unparseable_date_dtype() {
        let df = df! {
            "date" => &[1.5, 2.5],
            "asset" => &["A", "B"],
        }
        .unwrap();
        let err = ensure_panel_index(df, "date", "asset", true).unwrap_err();
        assert!(matches!(err, SchemaError::DateParse(_)));
    }

    #[test]
    fn validate_rejects_misordered_columns() {
        let df = df! {
            "asset" => &["A"],
            "date" => &[d(1)],
        }
        .unwrap();
        assert!(matches!(validate_panel(&df).unwrap_err(), SchemaError::WrongLayout(_)));
    }

    #[test]
    fn float_column_maps_nulls_to_nan() {
        let df = df! {
            "x" => &[Some(1.0), None],
        }
        .unwrap();
        let xs = float_column(&df, "x").unwrap();
        assert_eq!(xs[0], 1.0);
        assert!(xs[1].is_nan());
        assert!(matches!(
            float_column(&df, "y").unwrap_err(),
            SchemaError::MissingColumn(_)
        ));
    }

    #[test]
    fn require_columns_reports_first_absent() {
        let df = df! {
            "date" => &[d(1)],
            "asset" => &["A"],
            "close" => &[10.0],
        }
        .unwrap();
        assert!(require_columns(&df, &["close"]).is_ok());
        assert!(matches!(
            require_columns(&df, &["close", "alpha"]).unwrap_err(),
            SchemaError::MissingColumn(ref c) if c == "alpha"
        ));
    }
}
