//! # nazare
//!
//! A cross-sectional factor evaluation toolkit.
//!
//! This crate provides a unified interface to the nazare ecosystem.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Core type definitions
//! - `panel`: Panel data contract and return construction
//! - `math`: Statistical and regression helpers
//! - `preprocess`: Cross-sectional factor preprocessing
//! - `metrics`: Information coefficients and quantile portfolios
//! - `model`: Cross-sectional factor-return extraction
//! - `eval`: Single-factor evaluation jobs
//!
//! ## Example
//!
//! ```rust,ignore
//! // With default features (all components):
//! use nazare::eval::SingleFactorJob;
//! use nazare::primitives::Horizon;
//!
//! // Or with specific features only:
//! // [dependencies]
//! // nazare = { version = "0.1", default-features = false, features = ["metrics"] }
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use nazare_primitives as primitives;
#[cfg(feature = "panel")]
#[doc(inline)]
pub use nazare_panel as panel;
#[cfg(feature = "math")]
#[doc(inline)]
pub use nazare_math as math;
#[cfg(feature = "preprocess")]
#[doc(inline)]
pub use nazare_preprocess as preprocess;
#[cfg(feature = "metrics")]
#[doc(inline)]
pub use nazare_metrics as metrics;
#[cfg(feature = "model")]
#[doc(inline)]
pub use nazare_model as model;
#[cfg(feature = "eval")]
#[doc(inline)]
pub use nazare_eval as eval;

#[cfg(all(test, feature = "full"))]
mod tests {
    use polars::prelude::*;

    use crate::eval::SingleFactorJob;
    use crate::primitives::{Date, Horizon};

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn facade_wires_a_full_job() {
        let panel = df! {
            "date" => &[d(1), d(1), d(2), d(2), d(3), d(3)],
            "asset" => &["A", "B", "A", "B", "A", "B"],
            "close" => &[10.0, 20.0, 11.0, 19.0, 12.0, 18.0],
            "alpha" => &[1.0, 2.0, 1.5, 0.5, 1.2, 0.2],
        }
        .unwrap();
        let result = SingleFactorJob::new("alpha", "close")
            .with_quantiles(2)
            .run(&panel)
            .unwrap();
        assert_eq!(result.horizons(), vec![Horizon::new(1)]);
        assert_eq!(result.ic(Horizon::new(1)).unwrap().len(), 2);
    }
}
