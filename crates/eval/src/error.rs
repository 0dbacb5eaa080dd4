use nazare_primitives::Horizon;

/// Errors surfaced by evaluation jobs.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// The job configuration is unusable.
    #[error("invalid job configuration: {0}")]
    Config(String),

    /// A horizon cannot be derived from the panel's date span.
    #[error(
        "insufficient data for horizon {horizon}: need {required} distinct dates, have {available}"
    )]
    InsufficientData {
        /// The horizon that could not be derived.
        horizon: Horizon,
        /// Distinct dates needed for at least one forward return.
        required: usize,
        /// Distinct dates present in the panel.
        available: usize,
    },

    /// The panel violates the data contract.
    #[error(transparent)]
    Schema(#[from] nazare_panel::SchemaError),

    /// A metric computation failed.
    #[error(transparent)]
    Metrics(#[from] nazare_metrics::MetricsError),

    /// A preprocessing step failed.
    #[error(transparent)]
    Preprocess(#[from] nazare_preprocess::PreprocessError),

    /// An underlying dataframe operation failed.
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
