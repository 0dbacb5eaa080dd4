#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/nazare/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod contract;
pub use contract::{
    ASSET_COL, DATE_COL, date_column, ensure_panel_index, float_column, require_columns,
    validate_panel,
};

mod returns;
pub use returns::{add_forward_returns, add_returns};

mod align;
pub use align::lag_by_asset;

mod error;
pub use error::SchemaError;
