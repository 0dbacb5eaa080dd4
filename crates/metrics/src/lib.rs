#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/nazare/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod group;
pub use group::partition_by_date;

mod ic;
pub use ic::{IcMethod, ic_series, icir};

mod quantile;
pub use quantile::{QUANTILE_COL, assign_quantiles, long_short_series, quantile_returns, quantile_turnover};

mod coverage;
pub use coverage::coverage_by_date;

mod error;
pub use error::MetricsError;
