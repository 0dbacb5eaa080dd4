//! Immutable results of a single-factor evaluation job.

use std::collections::BTreeMap;

use nazare_primitives::{DateSeries, Horizon, QuantileTable};

/// Per-horizon evaluation outputs.
#[derive(Debug, Clone)]
pub(crate) struct HorizonMetrics {
    pub(crate) ic: DateSeries,
    pub(crate) icir: f64,
    pub(crate) quantile_returns: QuantileTable,
    pub(crate) long_short: DateSeries,
}

/// Everything a [`SingleFactorJob`](crate::SingleFactorJob) reports.
///
/// Per-horizon metrics are keyed by horizon; turnover and coverage
/// depend only on the factor column and are reported once.
#[derive(Debug, Clone)]
pub struct SingleFactorResult {
    factor: String,
    per_horizon: BTreeMap<Horizon, HorizonMetrics>,
    turnover: QuantileTable,
    coverage: DateSeries,
}

impl SingleFactorResult {
    pub(crate) const fn new(
        factor: String,
        per_horizon: BTreeMap<Horizon, HorizonMetrics>,
        turnover: QuantileTable,
        coverage: DateSeries,
    ) -> Self {
        Self { factor, per_horizon, turnover, coverage }
    }

    /// Name of the evaluated factor column.
    #[must_use]
    pub fn factor(&self) -> &str {
        &self.factor
    }

    /// Evaluated horizons in ascending order.
    #[must_use]
    pub fn horizons(&self) -> Vec<Horizon> {
        self.per_horizon.keys().copied().collect()
    }

    /// Per-date information coefficients for one horizon.
    #[must_use]
    pub fn ic(&self, horizon: Horizon) -> Option<&DateSeries> {
        self.per_horizon.get(&horizon).map(|m| &m.ic)
    }

    /// Information ratio of the IC series for one horizon.
    #[must_use]
    pub fn icir(&self, horizon: Horizon) -> Option<f64> {
        self.per_horizon.get(&horizon).map(|m| m.icir)
    }

    /// Per-date quantile bucket mean returns for one horizon.
    #[must_use]
    pub fn quantile_returns(&self, horizon: Horizon) -> Option<&QuantileTable> {
        self.per_horizon.get(&horizon).map(|m| &m.quantile_returns)
    }

    /// Per-date top-minus-bottom spread for one horizon.
    #[must_use]
    pub fn long_short(&self, horizon: Horizon) -> Option<&DateSeries> {
        self.per_horizon.get(&horizon).map(|m| &m.long_short)
    }

    /// Per-date, per-quantile bucket turnover.
    #[must_use]
    pub const fn turnover(&self) -> &QuantileTable {
        &self.turnover
    }

    /// Per-date fraction of rows with a usable factor value.
    #[must_use]
    pub const fn coverage(&self) -> &DateSeries {
        &self.coverage
    }
}
