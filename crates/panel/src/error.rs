//! Error types for the panel contract.

/// Errors raised when a table violates the (date, asset) panel contract.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Required column is absent.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Duplicate (date, asset) keys.
    #[error("{count} duplicate (date, asset) keys")]
    DuplicateKeys {
        /// Number of duplicated keys.
        count: usize,
    },

    /// Date column could not be parsed to a date dtype.
    #[error("date parse failure: {0}")]
    DateParse(String),

    /// Key columns are misnamed, misordered, or mistyped.
    #[error("invalid panel layout: {0}")]
    WrongLayout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SchemaError::MissingColumn("close".to_string());
        assert!(err.to_string().contains("close"));

        let err = SchemaError::DuplicateKeys { count: 3 };
        assert!(err.to_string().contains('3'));

        let err = SchemaError::DateParse("not-a-date".to_string());
        assert!(err.to_string().contains("not-a-date"));
    }
}
