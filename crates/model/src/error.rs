//! Error types for factor-return extraction.

/// Configuration rejected before any per-date work starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Regression method name not recognized.
    #[error("unknown regression method: {0}")]
    UnknownMethod(String),

    /// WLS selected without a weight column.
    #[error("weighted least squares requires a weight column")]
    WlsRequiresWeights,

    /// No loading columns given.
    #[error("at least one loading column is required")]
    EmptyLoadings,
}

/// Errors that can occur during factor-return extraction.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Panel contract violation.
    #[error(transparent)]
    Schema(#[from] nazare_panel::SchemaError),

    /// Metric computation error.
    #[error(transparent)]
    Metrics(#[from] nazare_metrics::MetricsError),

    /// Statistical computation error.
    #[error(transparent)]
    Math(#[from] nazare_math::MathError),

    /// Required column is absent.
    #[error("missing column: {0}")]
    MissingColumn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ConfigError::UnknownMethod("lasso".to_string());
        assert!(err.to_string().contains("lasso"));

        let err = ModelError::from(ConfigError::WlsRequiresWeights);
        assert!(err.to_string().contains("weight column"));
    }
}
