//! Single-factor evaluation job orchestration.

use std::collections::BTreeMap;

use nazare_metrics::{
    IcMethod, assign_quantiles, coverage_by_date, ic_series, icir, long_short_series,
    quantile_returns, quantile_turnover,
};
use nazare_panel::{DATE_COL, add_forward_returns, require_columns, validate_panel};
use nazare_preprocess::Pipeline;
use nazare_primitives::Horizon;
use polars::prelude::*;

use crate::EvalError;
use crate::result::{HorizonMetrics, SingleFactorResult};

/// Evaluation of one factor column against forward returns derived from
/// a price column.
///
/// The job owns the full flow: panel validation, preprocessing, forward
/// return construction, and per-horizon metrics. The input panel is
/// never mutated.
#[derive(Debug)]
pub struct SingleFactorJob {
    factor: String,
    price_col: String,
    horizons: Vec<Horizon>,
    n_quantiles: u32,
    ic_method: IcMethod,
    preprocess: Option<Pipeline>,
}

impl SingleFactorJob {
    /// A job evaluating `factor` against forward returns of `price_col`,
    /// with a one-period horizon, quintile buckets, and rank IC.
    pub fn new(factor: impl Into<String>, price_col: impl Into<String>) -> Self {
        Self {
            factor: factor.into(),
            price_col: price_col.into(),
            horizons: vec![Horizon::new(1)],
            n_quantiles: 5,
            ic_method: IcMethod::Spearman,
            preprocess: None,
        }
    }

    /// Replace the evaluated horizons.
    #[must_use]
    pub fn with_horizons(mut self, horizons: impl IntoIterator<Item = Horizon>) -> Self {
        self.horizons = horizons.into_iter().collect();
        self
    }

    /// Replace the number of quantile buckets.
    #[must_use]
    pub const fn with_quantiles(mut self, n_quantiles: u32) -> Self {
        self.n_quantiles = n_quantiles;
        self
    }

    /// Replace the IC correlation method.
    #[must_use]
    pub const fn with_ic_method(mut self, method: IcMethod) -> Self {
        self.ic_method = method;
        self
    }

    /// Apply `pipeline` to the panel before any metric is computed.
    #[must_use]
    pub fn with_preprocess(mut self, pipeline: Pipeline) -> Self {
        self.preprocess = Some(pipeline);
        self
    }

    fn validate(&self) -> Result<(), EvalError> {
        if self.horizons.is_empty() {
            return Err(EvalError::Config("at least one horizon is required".to_string()));
        }
        if self.horizons.iter().any(|h| h.periods() == 0) {
            return Err(EvalError::Config("horizons must be positive".to_string()));
        }
        if self.n_quantiles < 2 {
            return Err(EvalError::Config(format!(
                "n_quantiles must be >= 2, got {}",
                self.n_quantiles
            )));
        }
        Ok(())
    }

    /// Run the job against a validated panel.
    ///
    /// # Errors
    /// Fails fast on an unusable configuration, a panel violating the
    /// data contract, or a horizon not derivable from the panel's date
    /// span. Per-date degeneracies yield NaN entries, never errors.
    pub fn run(&self, panel: &DataFrame) -> Result<SingleFactorResult, EvalError> {
        self.validate()?;
        validate_panel(panel)?;
        require_columns(panel, &[&self.factor, &self.price_col])?;

        let mut lf = panel.clone().lazy();
        if let Some(pipeline) = &self.preprocess {
            lf = pipeline.apply(lf)?;
        }
        let full = add_forward_returns(lf, &self.price_col, &self.horizons).collect()?;

        let available = full.column(DATE_COL)?.n_unique()?;
        for &h in &self.horizons {
            let required = h.periods() as usize + 1;
            if available < required {
                return Err(EvalError::InsufficientData { horizon: h, required, available });
            }
        }

        let labeled =
            assign_quantiles(full.lazy(), &self.factor, self.n_quantiles)?.collect()?;
        let turnover = quantile_turnover(&labeled, self.n_quantiles)?;
        let coverage = coverage_by_date(&labeled, &self.factor)?;

        let mut per_horizon = BTreeMap::new();
        for &h in &self.horizons {
            let fwd = h.fwd_return_column();
            // restrict to rebalance dates: at least one forward return
            // must exist on the date
            let rebal = labeled
                .clone()
                .lazy()
                .filter(col(&fwd).is_not_null().any(false).over([col(DATE_COL)]))
                .collect()?;
            let ic = ic_series(&rebal, &self.factor, &fwd, self.ic_method)?;
            let table = quantile_returns(&rebal, &fwd, self.n_quantiles)?;
            let long_short = long_short_series(&table);
            per_horizon.insert(
                h,
                HorizonMetrics { icir: icir(&ic), ic, quantile_returns: table, long_short },
            );
        }

        Ok(SingleFactorResult::new(self.factor.clone(), per_horizon, turnover, coverage))
    }
}
