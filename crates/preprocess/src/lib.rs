#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/nazare/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod transform;
pub use transform::{Clip, DropNa, Rank, Transform, ZScore};

mod pipeline;
pub use pipeline::Pipeline;

mod error;
pub use error::PreprocessError;
