//! Cross-sectional regression fits: OLS, WLS, and Huber robust.

use ndarray::{Array1, Array2};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::MathError;

/// Huber tuning constant for 95% efficiency under normal errors.
const HUBER_C: f64 = 1.345;
/// Maximum IRLS iterations for the robust fit.
const RLM_MAX_ITER: usize = 50;
/// IRLS convergence tolerance on the parameter change.
const RLM_TOL: f64 = 1e-8;

/// Result of a least-squares fit with asymptotic diagnostics.
///
/// Parameters are ordered with the loading coefficients first and the
/// intercept (when fitted) last. `std_errors`, `t_stats` and `p_values`
/// are parallel to `params` and hold `NaN` when the residual degrees of
/// freedom are zero.
#[derive(Debug, Clone)]
pub struct RegressionFit {
    /// Estimated parameters, intercept last when present.
    pub params: Array1<f64>,
    /// Whether an intercept column was fitted.
    pub has_intercept: bool,
    /// Asymptotic standard errors.
    pub std_errors: Array1<f64>,
    /// t-statistics (params / std_errors).
    pub t_stats: Array1<f64>,
    /// Two-sided p-values under Student's t with n − p degrees of freedom.
    pub p_values: Array1<f64>,
    /// Residuals in the original (unweighted) scale.
    pub residuals: Array1<f64>,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Number of observations.
    pub nobs: usize,
}

impl RegressionFit {
    /// The j-th loading coefficient.
    #[must_use]
    pub fn coef(&self, j: usize) -> f64 {
        self.params[j]
    }

    /// The fitted intercept, if one was included.
    #[must_use]
    pub fn intercept(&self) -> Option<f64> {
        self.has_intercept.then(|| self.params[self.params.len() - 1])
    }

    /// Residual degrees of freedom (n − p).
    #[must_use]
    pub fn df_resid(&self) -> usize {
        self.nobs - self.params.len()
    }
}

/// Ordinary least squares of `y` on the loading matrix `x`.
///
/// # Errors
/// Returns an error on dimension mismatch, fewer observations than
/// parameters, or a singular normal system.
pub fn ols_fit(
    y: &Array1<f64>,
    x: &Array2<f64>,
    intercept: bool,
) -> Result<RegressionFit, MathError> {
    fit_weighted(y, x, None, intercept)
}

/// Weighted least squares of `y` on `x` with observation weights `weights`.
///
/// Minimizes `sum(w_i * (y_i - X_i beta)^2)`. Weights must be positive.
///
/// # Errors
/// Returns an error on dimension mismatch, non-positive weights, fewer
/// observations than parameters, or a singular normal system.
pub fn wls_fit(
    y: &Array1<f64>,
    x: &Array2<f64>,
    weights: &Array1<f64>,
    intercept: bool,
) -> Result<RegressionFit, MathError> {
    if weights.len() != y.len() {
        return Err(MathError::DimensionMismatch { expected: y.len(), actual: weights.len() });
    }
    if weights.iter().any(|&w| !w.is_finite() || w <= 0.0) {
        return Err(MathError::LinearAlgebra("weights must be finite and positive".to_string()));
    }
    fit_weighted(y, x, Some(weights.clone()), intercept)
}

/// Robust linear fit of `y` on `x` via Huber iteratively reweighted
/// least squares.
///
/// Starts from the OLS solution and reweights observations whose scaled
/// residual exceeds the Huber constant until the parameters converge.
/// Standard errors come from the final reweighted system.
///
/// # Errors
/// Returns an error on dimension mismatch, fewer observations than
/// parameters, or a singular normal system.
pub fn rlm_fit(
    y: &Array1<f64>,
    x: &Array2<f64>,
    intercept: bool,
) -> Result<RegressionFit, MathError> {
    let mut fit = fit_weighted(y, x, None, intercept)?;

    for _ in 0..RLM_MAX_ITER {
        let scale = mad_scale(&fit.residuals);
        if scale <= 0.0 {
            // residuals are (near) identical, nothing left to reweight
            break;
        }
        let weights: Array1<f64> = fit
            .residuals
            .iter()
            .map(|&r| {
                let u = (r / scale).abs();
                if u <= HUBER_C { 1.0 } else { HUBER_C / u }
            })
            .collect();
        let next = fit_weighted(y, x, Some(weights), intercept)?;
        let delta = next
            .params
            .iter()
            .zip(fit.params.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        fit = next;
        if delta < RLM_TOL {
            break;
        }
    }
    Ok(fit)
}

/// Normalized median absolute deviation of `values`.
fn mad_scale(values: &Array1<f64>) -> f64 {
    let med = median(values.as_slice().unwrap_or(&[]));
    let deviations: Vec<f64> = values.iter().map(|&v| (v - med).abs()).collect();
    median(&deviations) / 0.6745
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 { (sorted[mid - 1] + sorted[mid]) / 2.0 } else { sorted[mid] }
}

/// Shared weighted fit: builds the design matrix, solves the normal
/// equations, and computes diagnostics from the weighted system.
fn fit_weighted(
    y: &Array1<f64>,
    x: &Array2<f64>,
    weights: Option<Array1<f64>>,
    intercept: bool,
) -> Result<RegressionFit, MathError> {
    let n = y.len();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if x.nrows() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: x.nrows() });
    }

    let k = x.ncols();
    let p = k + usize::from(intercept);
    if n < p {
        return Err(MathError::InsufficientData { required: p, actual: n });
    }

    // Design matrix with the intercept column last.
    let mut design = Array2::ones((n, p));
    for i in 0..n {
        for j in 0..k {
            design[[i, j]] = x[[i, j]];
        }
    }

    // Row-scale by sqrt(w) so the normal equations carry the weights.
    let sqrt_w: Array1<f64> =
        weights.as_ref().map_or_else(|| Array1::ones(n), |w| w.mapv(f64::sqrt));
    let mut design_w = design.clone();
    for i in 0..n {
        for j in 0..p {
            design_w[[i, j]] *= sqrt_w[i];
        }
    }
    let y_w: Array1<f64> = y.iter().zip(sqrt_w.iter()).map(|(yi, si)| yi * si).collect();

    let xtx = design_w.t().dot(&design_w);
    let xty = design_w.t().dot(&y_w);
    let params = solve_linear_system(&xtx, &xty)?;

    let fitted = design.dot(&params);
    let residuals = y - &fitted;

    // Weighted residual sum of squares drives the error variance.
    let w = weights.unwrap_or_else(|| Array1::ones(n));
    let ss_res_w: f64 = residuals.iter().zip(w.iter()).map(|(r, wi)| wi * r * r).sum();

    let df = n - p;
    let (std_errors, t_stats, p_values) = if df == 0 {
        let nan = Array1::from_elem(p, f64::NAN);
        (nan.clone(), nan.clone(), nan)
    } else {
        let sigma2 = ss_res_w / df as f64;
        let xtx_inv = invert(&xtx)?;
        let std_errors: Array1<f64> =
            (0..p).map(|j| (sigma2 * xtx_inv[[j, j]]).sqrt()).collect();
        let t_stats: Array1<f64> =
            params.iter().zip(std_errors.iter()).map(|(b, se)| b / se).collect();
        let t_dist = StudentsT::new(0.0, 1.0, df as f64)
            .map_err(|e| MathError::LinearAlgebra(e.to_string()))?;
        let p_values: Array1<f64> = t_stats
            .iter()
            .map(|&t| if t.is_finite() { 2.0 * (1.0 - t_dist.cdf(t.abs())) } else { f64::NAN })
            .collect();
        (std_errors, t_stats, p_values)
    };

    // Centered total SS with an intercept, uncentered without one.
    let ss_tot: f64 = if intercept {
        let y_mean = y.mean().unwrap_or(0.0);
        y.iter().map(|yi| (yi - y_mean).powi(2)).sum()
    } else {
        y.iter().map(|yi| yi.powi(2)).sum()
    };
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    Ok(RegressionFit {
        params,
        has_intercept: intercept,
        std_errors,
        t_stats,
        p_values,
        residuals,
        r_squared,
        nobs: n,
    })
}

/// Solve a linear system Ax = b using Gaussian elimination with partial
/// pivoting.
fn solve_linear_system(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, MathError> {
    let n = a.nrows();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if a.ncols() != n {
        return Err(MathError::LinearAlgebra("matrix must be square".to_string()));
    }
    if b.len() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: b.len() });
    }

    let mut aug = Array2::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = a[[i, j]];
        }
        aug[[i, n]] = b[i];
    }

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = aug[[col, col]].abs();
        for row in (col + 1)..n {
            if aug[[row, col]].abs() > max_val {
                max_val = aug[[row, col]].abs();
                max_row = row;
            }
        }

        if max_val < 1e-14 {
            return Err(MathError::LinearAlgebra(
                "matrix is singular or nearly singular".to_string(),
            ));
        }

        if max_row != col {
            for j in 0..=n {
                let tmp = aug[[col, j]];
                aug[[col, j]] = aug[[max_row, j]];
                aug[[max_row, j]] = tmp;
            }
        }

        for row in (col + 1)..n {
            let factor = aug[[row, col]] / aug[[col, col]];
            for j in col..=n {
                aug[[row, j]] -= factor * aug[[col, j]];
            }
        }
    }

    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = aug[[i, n]];
        for j in (i + 1)..n {
            sum -= aug[[i, j]] * x[j];
        }
        x[i] = sum / aug[[i, i]];
    }

    Ok(x)
}

/// Invert a square matrix by solving one system per unit column.
fn invert(a: &Array2<f64>) -> Result<Array2<f64>, MathError> {
    let n = a.nrows();
    let mut inv = Array2::zeros((n, n));
    for j in 0..n {
        let mut e = Array1::zeros(n);
        e[j] = 1.0;
        let col = solve_linear_system(a, &e)?;
        for i in 0..n {
            inv[[i, j]] = col[i];
        }
    }
    Ok(inv)
}
