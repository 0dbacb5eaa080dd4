//! t-test helpers for return series.

use ndarray::{Array1, Array2};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::regression::ols_fit;

/// Result of a one- or two-sample t-test.
#[derive(Debug, Clone, Copy)]
pub struct TTestResult {
    /// The t-statistic.
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Degrees of freedom.
    pub df: f64,
    /// Number of finite observations used (both samples combined for the
    /// two-sample test).
    pub nobs: usize,
}

impl TTestResult {
    const fn nan(nobs: usize) -> Self {
        Self { statistic: f64::NAN, p_value: f64::NAN, df: f64::NAN, nobs }
    }
}

/// One-sample t-test of the mean of `values` against `popmean`.
///
/// Non-finite entries are dropped. Fewer than two finite observations,
/// or a zero sample standard deviation, yields `NaN` fields.
#[must_use]
pub fn ttest_1samp(values: &[f64], popmean: f64) -> TTestResult {
    let xs: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = xs.len();
    if n < 2 {
        return TTestResult::nan(n);
    }
    let mean = xs.iter().sum::<f64>() / n as f64;
    let var = xs.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    if var == 0.0 {
        return TTestResult::nan(n);
    }
    let df = (n - 1) as f64;
    let statistic = (mean - popmean) / (var / n as f64).sqrt();
    TTestResult { statistic, p_value: two_sided_p(statistic, df), df, nobs: n }
}

/// Welch's two-sample t-test of the means of `a` and `b`.
///
/// Does not assume equal variances; degrees of freedom follow the
/// Welch–Satterthwaite approximation. Non-finite entries are dropped
/// from each sample independently.
#[must_use]
pub fn ttest_ind(a: &[f64], b: &[f64]) -> TTestResult {
    let xs: Vec<f64> = a.iter().copied().filter(|v| v.is_finite()).collect();
    let ys: Vec<f64> = b.iter().copied().filter(|v| v.is_finite()).collect();
    let (na, nb) = (xs.len(), ys.len());
    if na < 2 || nb < 2 {
        return TTestResult::nan(na + nb);
    }
    let mean_a = xs.iter().sum::<f64>() / na as f64;
    let mean_b = ys.iter().sum::<f64>() / nb as f64;
    let var_a = xs.iter().map(|v| (v - mean_a).powi(2)).sum::<f64>() / (na - 1) as f64;
    let var_b = ys.iter().map(|v| (v - mean_b).powi(2)).sum::<f64>() / (nb - 1) as f64;

    let se_a = var_a / na as f64;
    let se_b = var_b / nb as f64;
    let denom = (se_a + se_b).sqrt();
    if denom == 0.0 {
        return TTestResult::nan(na + nb);
    }
    let statistic = (mean_a - mean_b) / denom;
    let df = (se_a + se_b).powi(2)
        / (se_a.powi(2) / (na - 1) as f64 + se_b.powi(2) / (nb - 1) as f64);
    TTestResult { statistic, p_value: two_sided_p(statistic, df), df, nobs: na + nb }
}

/// Result of an intercept regression of a return series, optionally
/// against a benchmark.
#[derive(Debug, Clone, Copy)]
pub struct OlsAlphaResult {
    /// Estimated intercept (alpha).
    pub alpha: f64,
    /// Estimated slope (beta) on the benchmark, when one was supplied.
    pub beta: Option<f64>,
    /// t-statistic of the intercept.
    pub t_stat: f64,
    /// Two-sided p-value of the intercept.
    pub p_value: f64,
    /// Coefficient of determination (0 for the mean-only test).
    pub r_squared: f64,
    /// Number of complete observations used.
    pub nobs: usize,
}

impl OlsAlphaResult {
    const fn nan(nobs: usize) -> Self {
        Self {
            alpha: f64::NAN,
            beta: None,
            t_stat: f64::NAN,
            p_value: f64::NAN,
            r_squared: f64::NAN,
            nobs,
        }
    }
}

/// OLS alpha of `y`, against `x` with an intercept when a benchmark is
/// supplied, or on the intercept alone (a mean test) when `x` is `None`.
///
/// Observations where either side is non-finite are dropped; fewer than
/// three complete observations, or a degenerate design, yields `NaN`
/// fields.
#[must_use]
pub fn ols_alpha_tstat(y: &[f64], x: Option<&[f64]>) -> OlsAlphaResult {
    match x {
        None => {
            let ys: Vec<f64> = y.iter().copied().filter(|v| v.is_finite()).collect();
            let n = ys.len();
            if n < 3 {
                return OlsAlphaResult::nan(n);
            }
            let t = ttest_1samp(&ys, 0.0);
            let alpha = ys.iter().sum::<f64>() / n as f64;
            OlsAlphaResult {
                alpha,
                beta: None,
                t_stat: t.statistic,
                p_value: t.p_value,
                r_squared: 0.0,
                nobs: n,
            }
        }
        Some(bench) => {
            debug_assert_eq!(y.len(), bench.len());
            let pairs: Vec<(f64, f64)> = y
                .iter()
                .zip(bench.iter())
                .filter(|(a, b)| a.is_finite() && b.is_finite())
                .map(|(&a, &b)| (a, b))
                .collect();
            let n = pairs.len();
            if n < 3 {
                return OlsAlphaResult::nan(n);
            }
            let ys = Array1::from_iter(pairs.iter().map(|(a, _)| *a));
            let xs = Array2::from_shape_fn((n, 1), |(i, _)| pairs[i].1);
            match ols_fit(&ys, &xs, true) {
                Ok(fit) => {
                    // intercept is the last parameter
                    let a_idx = fit.params.len() - 1;
                    OlsAlphaResult {
                        alpha: fit.params[a_idx],
                        beta: Some(fit.coef(0)),
                        t_stat: fit.t_stats[a_idx],
                        p_value: fit.p_values[a_idx],
                        r_squared: fit.r_squared,
                        nobs: n,
                    }
                }
                Err(_) => OlsAlphaResult::nan(n),
            }
        }
    }
}

fn two_sided_p(t: f64, df: f64) -> f64 {
    if !t.is_finite() || !(df > 0.0) {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
        Err(_) => f64::NAN,
    }
}
