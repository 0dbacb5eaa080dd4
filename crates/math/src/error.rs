//! Error types for statistical operations.

/// Errors that can occur during statistical operations.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Insufficient observations for the requested fit.
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations.
        required: usize,
        /// Actual number of observations.
        actual: usize,
    },

    /// Linear algebra error.
    #[error("linear algebra error: {0}")]
    LinearAlgebra(String),

    /// Empty data.
    #[error("empty data provided")]
    EmptyData,
}

impl MathError {
    /// Returns whether this error is recoverable (a per-date degeneracy
    /// callers may map to NaN rather than aborting a whole series).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientData { .. } | Self::LinearAlgebra(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MathError::DimensionMismatch { expected: 10, actual: 5 };
        assert!(err.to_string().contains("10") && err.to_string().contains("5"));

        let err = MathError::InsufficientData { required: 2, actual: 1 };
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn error_is_recoverable() {
        assert!(MathError::InsufficientData { required: 2, actual: 0 }.is_recoverable());
        assert!(!MathError::EmptyData.is_recoverable());
    }
}
