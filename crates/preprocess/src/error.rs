//! Error types for preprocessing.

/// Errors that can occur while preprocessing a panel.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    /// Invalid parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PreprocessError::InvalidParameter("clip bounds".to_string());
        assert!(err.to_string().contains("clip bounds"));
    }
}
