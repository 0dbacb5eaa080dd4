//! Error types for metric computation.

/// Errors that can occur while computing metrics.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Panel contract violation.
    #[error(transparent)]
    Schema(#[from] nazare_panel::SchemaError),

    /// Invalid parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Required column is absent.
    #[error("missing column: {0}")]
    MissingColumn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MetricsError::InvalidParameter("n_quantiles must be >= 2".to_string());
        assert!(err.to_string().contains("n_quantiles"));

        let err = MetricsError::MissingColumn("quantile".to_string());
        assert!(err.to_string().contains("quantile"));
    }
}
