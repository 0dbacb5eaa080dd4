#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/nazare/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod rank;
pub use rank::{rank_average, rank_first};

mod correlation;
pub use correlation::{pearson, spearman};

mod regression;
pub use regression::{RegressionFit, ols_fit, rlm_fit, wls_fit};

mod stats;
pub use stats::{OlsAlphaResult, TTestResult, ols_alpha_tstat, ttest_1samp, ttest_ind};

mod error;
pub use error::MathError;
