#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/nazare/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod horizon;
pub use horizon::Horizon;

mod series;
pub use series::DateSeries;

mod table;
pub use table::QuantileTable;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
