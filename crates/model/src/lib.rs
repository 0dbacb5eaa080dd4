#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/nazare/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{RegressionConfig, RegressionMethod};

mod factor_returns;
pub use factor_returns::{FactorReturnSeries, MultiFactorReturns, multi_factor_returns, regression_factor_returns};

mod sort;
pub use sort::{SortFactorReturns, sort_factor_returns};

mod error;
pub use error::{ConfigError, ModelError};
