//! Per-date cross-sectional regression of forward returns on loadings.

use ndarray::{Array1, Array2};
use nazare_math::{RegressionFit, ols_fit, rlm_fit, wls_fit};
use nazare_metrics::partition_by_date;
use nazare_panel::{ASSET_COL, DATE_COL, float_column, require_columns};
use nazare_primitives::{Date, DateSeries};
use polars::prelude::*;

use crate::{ModelError, RegressionConfig, RegressionMethod};

/// Per-date factor returns extracted from single-loading regressions.
///
/// All series share one complete date index: dates whose cross-section
/// could not be fitted hold `NaN` entries rather than being dropped.
#[derive(Debug, Clone)]
pub struct FactorReturnSeries {
    /// Per-date slope coefficient on the loading (the factor return).
    pub returns: DateSeries,
    /// Per-date fitted intercept; `NaN` when no intercept was requested.
    pub intercepts: DateSeries,
    /// Per-date t-statistic of the slope.
    pub t_stats: DateSeries,
    /// Per-date two-sided p-value of the slope.
    pub p_values: DateSeries,
    /// Per-date coefficient of determination.
    pub r_squared: DateSeries,
    /// Per-date count of observations used in the fit.
    pub nobs: DateSeries,
    /// Residuals panel (date, asset, residual); null where the row was
    /// not part of a fit.
    pub residuals: DataFrame,
}

/// Per-date coefficient series from multi-loading regressions, keyed by
/// loading name in the caller's order.
#[derive(Debug, Clone)]
pub struct MultiFactorReturns {
    loadings: Vec<String>,
    series: Vec<DateSeries>,
}

impl MultiFactorReturns {
    /// Loading names in column order.
    #[must_use]
    pub fn loadings(&self) -> &[String] {
        &self.loadings
    }

    /// Coefficient series for one loading.
    #[must_use]
    pub fn get(&self, loading: &str) -> Option<&DateSeries> {
        self.loadings.iter().position(|l| l == loading).map(|i| &self.series[i])
    }

    /// Iterate over (loading, series) pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DateSeries)> {
        self.loadings.iter().map(String::as_str).zip(self.series.iter())
    }
}

/// Regress `fwd_col` on a single `loading` independently per date.
///
/// Dates with fewer than two valid observations, or a degenerate
/// cross-section (for example a constant loading), yield `NaN` rows; the
/// date index is never shortened.
///
/// # Errors
/// Fails fast on invalid configuration or absent columns before any
/// date is processed; per-date degeneracies never error.
pub fn regression_factor_returns(
    df: &DataFrame,
    loading: &str,
    fwd_col: &str,
    config: &RegressionConfig,
) -> Result<FactorReturnSeries, ModelError> {
    config.validate()?;
    let mut needed = vec![loading, fwd_col];
    if let Some(w) = &config.weight_col {
        needed.push(w.as_str());
    }
    require_columns(df, &needed)?;

    let parts = partition_by_date(df)?;
    let n_dates = parts.len();
    let mut dates = Vec::with_capacity(n_dates);
    let mut slopes = Vec::with_capacity(n_dates);
    let mut intercepts = Vec::with_capacity(n_dates);
    let mut t_stats = Vec::with_capacity(n_dates);
    let mut p_values = Vec::with_capacity(n_dates);
    let mut r_squared = Vec::with_capacity(n_dates);
    let mut nobs = Vec::with_capacity(n_dates);
    let mut res_dates: Vec<Date> = Vec::new();
    let mut res_assets: Vec<String> = Vec::new();
    let mut res_values: Vec<Option<f64>> = Vec::new();

    for (date, part) in parts {
        let xs = float_column(&part, loading)?;
        let ys = float_column(&part, fwd_col)?;
        let ws = match &config.weight_col {
            Some(w) => Some(float_column(&part, w)?),
            None => None,
        };

        let valid: Vec<usize> = (0..part.height())
            .filter(|&i| {
                xs[i].is_finite()
                    && ys[i].is_finite()
                    && ws.as_ref().is_none_or(|w| w[i].is_finite())
            })
            .collect();

        let fit = if valid.len() < 2 {
            None
        } else {
            let y = Array1::from_iter(valid.iter().map(|&i| ys[i]));
            let x = Array2::from_shape_fn((valid.len(), 1), |(r, _)| xs[valid[r]]);
            let w = ws.as_ref().map(|w| Array1::from_iter(valid.iter().map(|&i| w[i])));
            fit_one_date(&y, &x, w.as_ref(), config)?
        };

        dates.push(date);
        match &fit {
            Some(fit) => {
                slopes.push(fit.coef(0));
                intercepts.push(fit.intercept().unwrap_or(f64::NAN));
                t_stats.push(fit.t_stats[0]);
                p_values.push(fit.p_values[0]);
                r_squared.push(fit.r_squared);
                nobs.push(valid.len() as f64);
            }
            None => {
                slopes.push(f64::NAN);
                intercepts.push(f64::NAN);
                t_stats.push(f64::NAN);
                p_values.push(f64::NAN);
                r_squared.push(f64::NAN);
                nobs.push(f64::NAN);
            }
        }

        let assets = part.column(ASSET_COL)?.str()?;
        let mut row_residual = vec![None; part.height()];
        if let Some(fit) = &fit {
            for (j, &i) in valid.iter().enumerate() {
                row_residual[i] = Some(fit.residuals[j]);
            }
        }
        for (i, asset) in assets.into_iter().enumerate() {
            res_dates.push(date);
            res_assets.push(asset.unwrap_or_default().to_string());
            res_values.push(row_residual[i]);
        }
    }

    let residuals = df! {
        DATE_COL => res_dates,
        ASSET_COL => res_assets,
        "residual" => res_values,
    }?;

    Ok(FactorReturnSeries {
        returns: DateSeries::new(dates.clone(), slopes),
        intercepts: DateSeries::new(dates.clone(), intercepts),
        t_stats: DateSeries::new(dates.clone(), t_stats),
        p_values: DateSeries::new(dates.clone(), p_values),
        r_squared: DateSeries::new(dates.clone(), r_squared),
        nobs: DateSeries::new(dates, nobs),
        residuals,
    })
}

/// Regress `fwd_col` on several `loadings` simultaneously per date.
///
/// A date needs at least `loadings.len() + 1` valid observations (one
/// more with an intercept) to fit; otherwise that date's row is `NaN`
/// across every coefficient. The date index is never shortened.
///
/// # Errors
/// Fails fast on invalid configuration, absent columns, or an empty
/// loading list.
pub fn multi_factor_returns(
    df: &DataFrame,
    loadings: &[&str],
    fwd_col: &str,
    config: &RegressionConfig,
) -> Result<MultiFactorReturns, ModelError> {
    config.validate()?;
    if loadings.is_empty() {
        return Err(crate::ConfigError::EmptyLoadings.into());
    }
    let mut needed: Vec<&str> = loadings.to_vec();
    needed.push(fwd_col);
    if let Some(w) = &config.weight_col {
        needed.push(w.as_str());
    }
    require_columns(df, &needed)?;

    let k = loadings.len();
    let required = k + 1 + usize::from(config.intercept);
    let parts = partition_by_date(df)?;
    let mut dates = Vec::with_capacity(parts.len());
    let mut coefs: Vec<Vec<f64>> = vec![Vec::with_capacity(parts.len()); k];

    for (date, part) in parts {
        let loading_cols: Vec<Vec<f64>> = loadings
            .iter()
            .map(|l| float_column(&part, l))
            .collect::<Result<_, _>>()?;
        let ys = float_column(&part, fwd_col)?;
        let ws = match &config.weight_col {
            Some(w) => Some(float_column(&part, w)?),
            None => None,
        };

        let valid: Vec<usize> = (0..part.height())
            .filter(|&i| {
                ys[i].is_finite()
                    && loading_cols.iter().all(|c| c[i].is_finite())
                    && ws.as_ref().is_none_or(|w| w[i].is_finite())
            })
            .collect();

        let fit = if valid.len() < required {
            None
        } else {
            let y = Array1::from_iter(valid.iter().map(|&i| ys[i]));
            let x = Array2::from_shape_fn((valid.len(), k), |(r, c)| loading_cols[c][valid[r]]);
            let w = ws.as_ref().map(|w| Array1::from_iter(valid.iter().map(|&i| w[i])));
            fit_one_date(&y, &x, w.as_ref(), config)?
        };

        dates.push(date);
        for (c, series) in coefs.iter_mut().enumerate() {
            series.push(fit.as_ref().map_or(f64::NAN, |f| f.coef(c)));
        }
    }

    let series = coefs.into_iter().map(|values| DateSeries::new(dates.clone(), values)).collect();
    Ok(MultiFactorReturns {
        loadings: loadings.iter().map(ToString::to_string).collect(),
        series,
    })
}

/// Fit one date's cross-section; recoverable numeric degeneracies
/// (singular design, too few rows) collapse to `None` rather than
/// aborting the whole series.
fn fit_one_date(
    y: &Array1<f64>,
    x: &Array2<f64>,
    w: Option<&Array1<f64>>,
    config: &RegressionConfig,
) -> Result<Option<RegressionFit>, ModelError> {
    let result = match (config.method, w) {
        (RegressionMethod::Wls, Some(w)) => wls_fit(y, x, w, config.intercept),
        (RegressionMethod::Rlm, _) => rlm_fit(y, x, config.intercept),
        _ => ols_fit(y, x, config.intercept),
    };
    match result {
        Ok(fit) => Ok(Some(fit)),
        Err(e) if e.is_recoverable() => Ok(None),
        Err(e) => Err(ModelError::Math(e)),
    }
}
