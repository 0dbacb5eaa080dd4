//! Regression method selection and configuration.

use std::str::FromStr;

use crate::ConfigError;

/// Per-date regression method for factor-return extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegressionMethod {
    /// Ordinary least squares.
    #[default]
    Ols,
    /// Weighted least squares with caller-supplied per-row weights.
    Wls,
    /// Robust linear model (Huber iteratively reweighted least squares).
    Rlm,
}

impl RegressionMethod {
    /// The method name as used in configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ols => "ols",
            Self::Wls => "wls",
            Self::Rlm => "rlm",
        }
    }
}

impl std::fmt::Display for RegressionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegressionMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ols" => Ok(Self::Ols),
            "wls" => Ok(Self::Wls),
            "rlm" => Ok(Self::Rlm),
            other => Err(ConfigError::UnknownMethod(other.to_string())),
        }
    }
}

/// Configuration for the per-date regressions.
#[derive(Debug, Clone)]
pub struct RegressionConfig {
    /// Regression method.
    pub method: RegressionMethod,
    /// Whether to fit an intercept.
    pub intercept: bool,
    /// Weight column for WLS; ignored by the other methods.
    pub weight_col: Option<String>,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self::new(RegressionMethod::Ols)
    }
}

impl RegressionConfig {
    /// Create a config for `method` with an intercept and no weights.
    #[must_use]
    pub const fn new(method: RegressionMethod) -> Self {
        Self { method, intercept: true, weight_col: None }
    }

    /// Set the intercept flag, builder style.
    #[must_use]
    pub const fn with_intercept(mut self, intercept: bool) -> Self {
        self.intercept = intercept;
        self
    }

    /// Set the WLS weight column, builder style.
    #[must_use]
    pub fn with_weight_col(mut self, weight_col: impl Into<String>) -> Self {
        self.weight_col = Some(weight_col.into());
        self
    }

    /// Reject inconsistent configuration before any date is processed.
    ///
    /// # Errors
    /// Returns [`ConfigError::WlsRequiresWeights`] when WLS is selected
    /// without a weight column.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.method == RegressionMethod::Wls && self.weight_col.is_none() {
            return Err(ConfigError::WlsRequiresWeights);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ols", RegressionMethod::Ols)]
    #[case("WLS", RegressionMethod::Wls)]
    #[case("Rlm", RegressionMethod::Rlm)]
    fn method_parses_case_insensitively(#[case] name: &str, #[case] expected: RegressionMethod) {
        assert_eq!(name.parse::<RegressionMethod>().unwrap(), expected);
    }

    #[test]
    fn unknown_method_fails_fast() {
        let err = "lasso".parse::<RegressionMethod>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMethod(ref m) if m == "lasso"));
    }

    #[test]
    fn wls_requires_weight_column() {
        let config = RegressionConfig::new(RegressionMethod::Wls);
        assert!(matches!(config.validate().unwrap_err(), ConfigError::WlsRequiresWeights));
        assert!(config.with_weight_col("mcap").validate().is_ok());
    }

    #[test]
    fn default_is_ols() {
        let config = RegressionConfig::default();
        assert_eq!(config.method, RegressionMethod::Ols);
        assert!(config.validate().is_ok());
    }
}
