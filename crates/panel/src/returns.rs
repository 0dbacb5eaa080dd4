//! Trailing and forward return construction from a price column.

use nazare_primitives::Horizon;
use polars::prelude::*;

use crate::contract::{ASSET_COL, DATE_COL};

/// Add a trailing simple return column `ret_{periods}` computed per asset
/// from `price_col`.
///
/// The panel is sorted by date within each asset before shifting; the
/// first `periods` rows of each asset are null.
pub fn add_returns(lf: LazyFrame, price_col: &str, periods: u32) -> LazyFrame {
    let sort_options = SortMultipleOptions::new().with_maintain_order(true);
    let price = col(price_col).cast(DataType::Float64);
    lf.sort([DATE_COL], sort_options).with_column(
        (price.clone() / price.shift(lit(i64::from(periods))) - lit(1.0))
            .over([col(ASSET_COL)])
            .alias(format!("ret_{periods}")),
    )
}

/// Add one forward simple return column per horizon, computed per asset
/// from `price_col`.
///
/// For horizon `h` the column `fwd_ret_{h}` holds
/// `price(t + h) / price(t) - 1`, aligned at the observation date `t`.
/// The last `h` rows of each asset are null.
pub fn add_forward_returns(lf: LazyFrame, price_col: &str, horizons: &[Horizon]) -> LazyFrame {
    let sort_options = SortMultipleOptions::new().with_maintain_order(true);
    let mut lf = lf.sort([DATE_COL], sort_options);
    for &h in horizons {
        let price = col(price_col).cast(DataType::Float64);
        lf = lf.with_column(
            (price.clone().shift(lit(-i64::from(u32::from(h)))) / price - lit(1.0))
                .over([col(ASSET_COL)])
                .alias(h.fwd_return_column()),
        );
    }
    lf
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn panel() -> LazyFrame {
        df! {
            "date" => &[1, 1, 2, 2, 3, 3],
            "asset" => &["A", "B", "A", "B", "A", "B"],
            "close" => &[10.0, 20.0, 11.0, 19.0, 12.0, 18.0],
        }
        .unwrap()
        .lazy()
    }

    fn column_for(df: &DataFrame, asset: &str, name: &str) -> Vec<Option<f64>> {
        df.clone()
            .lazy()
            .filter(col("asset").eq(lit(asset)))
            .sort(["date"], SortMultipleOptions::default())
            .collect()
            .unwrap()
            .column(name)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn trailing_returns_per_asset() {
        let out = add_returns(panel(), "close", 1).collect().unwrap();
        let a = column_for(&out, "A", "ret_1");
        assert_eq!(a[0], None);
        assert_relative_eq!(a[1].unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(a[2].unwrap(), 1.0 / 11.0, epsilon = 1e-12);
    }

    #[test]
    fn forward_returns_aligned_at_observation_date() {
        let out =
            add_forward_returns(panel(), "close", &[Horizon::from(1)]).collect().unwrap();
        let a = column_for(&out, "A", "fwd_ret_1");
        let b = column_for(&out, "B", "fwd_ret_1");
        assert_relative_eq!(a[0].unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(a[1].unwrap(), 1.0 / 11.0, epsilon = 1e-12);
        assert_eq!(a[2], None);
        assert_relative_eq!(b[0].unwrap(), -0.05, epsilon = 1e-12);
        assert_relative_eq!(b[1].unwrap(), -1.0 / 19.0, epsilon = 1e-12);
    }

    #[test]
    fn multiple_horizons_add_one_column_each() {
        let out = add_forward_returns(panel(), "close", &[Horizon::from(1), Horizon::from(2)])
            .collect()
            .unwrap();
        let a2 = column_for(&out, "A", "fwd_ret_2");
        assert_relative_eq!(a2[0].unwrap(), 0.2, epsilon = 1e-12);
        assert_eq!(a2[1], None);
        assert_eq!(a2[2], None);
    }

    #[test]
    fn forward_returns_do_not_cross_assets() {
        // a lone asset date at the panel end must not borrow another
        // asset's price
        let lf = df! {
            "date" => &[1, 2, 2],
            "asset" => &["A", "A", "B"],
            "close" => &[10.0, 11.0, 50.0],
        }
        .unwrap()
        .lazy();
        let out = add_forward_returns(lf, "close", &[Horizon::from(1)]).collect().unwrap();
        let b = column_for(&out, "B", "fwd_ret_1");
        assert_eq!(b, vec![None]);
    }
}
