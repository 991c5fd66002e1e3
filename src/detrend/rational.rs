//! Rational baseline fit: `b(x) = a / (x + b) + c`
//!
//! Models a warm-up transient that settles toward the asymptote `c`.
//! Parameters are found by Levenberg-Marquardt on the 3x3 normal equations
//! with an analytic Jacobian:
//!
//! ```text
//! ∂f/∂a = 1 / (x + b)
//! ∂f/∂b = -a / (x + b)²
//! ∂f/∂c = 1
//! ```

use crate::error::{AnalysisError, Result};
use crate::series::MeasurementSeries;
use serde::{Deserialize, Serialize};

const LAMBDA_INITIAL: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e16;
const DIAG_FLOOR: f64 = 1e-12;

/// Starting point for the optimizer
///
/// `c` defaults to the smallest observed count when left unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialGuess {
    pub a: f64,
    pub b: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
}

impl Default for InitialGuess {
    fn default() -> Self {
        Self {
            a: 1000.0,
            b: 1.0,
            c: None,
        }
    }
}

/// Rational fit settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RationalFitParams {
    pub initial_guess: InitialGuess,
    /// Optimizer iteration cap
    pub max_iterations: usize,
    /// Relative tolerance on cost reduction and parameter step
    pub tolerance: f64,
}

impl Default for RationalFitParams {
    fn default() -> Self {
        Self {
            initial_guess: InitialGuess::default(),
            max_iterations: 10_000,
            tolerance: 1e-10,
        }
    }
}

impl RationalFitParams {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(AnalysisError::invalid(
                "rational fit iteration cap must be >= 1",
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(AnalysisError::invalid(format!(
                "rational fit tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        let guess = &self.initial_guess;
        if !guess.a.is_finite() || !guess.b.is_finite() || guess.c.is_some_and(|c| !c.is_finite())
        {
            return Err(AnalysisError::invalid(
                "rational fit initial guess must be finite",
            ));
        }
        Ok(())
    }
}

/// Fitted model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RationalModel {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl RationalModel {
    fn from_array(p: [f64; 3]) -> Self {
        Self {
            a: p[0],
            b: p[1],
            c: p[2],
        }
    }

    /// Evaluate the model; `None` at the pole `x == -b`
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        let d = x + self.b;
        if d == 0.0 {
            return None;
        }
        let value = self.a / d + self.c;
        value.is_finite().then_some(value)
    }
}

/// Outcome of a converged fit
#[derive(Debug, Clone, PartialEq)]
pub struct RationalFit {
    pub model: RationalModel,
    /// Baseline evaluated at every input iteration
    pub baseline: Vec<f64>,
    /// Optimizer iterations used
    pub iterations: usize,
    /// Final sum of squared residuals
    pub residual_sum_squares: f64,
}

/// Fit `a / (x + b) + c` to the series by nonlinear least squares
pub fn fit_rational(series: &MeasurementSeries, params: &RationalFitParams) -> Result<RationalFit> {
    params.validate()?;

    let x = series.iterations();
    let y = series.counts();
    let guess = params.initial_guess;
    let mut p = [
        guess.a,
        guess.b,
        guess.c.unwrap_or(series.min_count() as f64),
    ];

    let mut cost = sum_squares(&p, &x, &y).ok_or_else(|| AnalysisError::FitDivergence {
        iterations: 0,
        reason: format!("model undefined at initial guess (b = {})", p[1]),
    })?;
    let mut lambda = LAMBDA_INITIAL;

    for iter in 1..=params.max_iterations {
        let (jtj, jtr) = normal_equations(&p, &x, &y);

        // Raise damping until a step lowers the cost. If no step helps before
        // lambda saturates, p is a stationary point in floating point.
        loop {
            let mut damped = jtj;
            for i in 0..3 {
                damped[i][i] += lambda * jtj[i][i].max(DIAG_FLOOR);
            }

            if let Some(delta) = solve_3x3(damped, jtr) {
                let candidate = [p[0] + delta[0], p[1] + delta[1], p[2] + delta[2]];
                if let Some(new_cost) = sum_squares(&candidate, &x, &y) {
                    if new_cost <= cost {
                        let small_step = (0..3).all(|i| {
                            delta[i].abs() <= params.tolerance * (p[i].abs() + params.tolerance)
                        });
                        let small_reduction = cost - new_cost <= params.tolerance * cost;

                        p = candidate;
                        cost = new_cost;
                        lambda = (lambda / 10.0).max(LAMBDA_MIN);

                        if small_step || small_reduction {
                            return finish(p, &x, cost, iter);
                        }
                        break;
                    }
                }
            }

            lambda *= 10.0;
            if lambda > LAMBDA_MAX {
                tracing::debug!(iter, cost, "damping saturated at stationary point");
                return finish(p, &x, cost, iter);
            }
        }

        if iter % 100 == 0 {
            tracing::trace!(iter, cost, lambda, a = p[0], b = p[1], c = p[2], "rational fit");
        }
    }

    Err(AnalysisError::FitDivergence {
        iterations: params.max_iterations,
        reason: format!(
            "no convergence within the iteration cap (residual sum of squares {:.4})",
            cost
        ),
    })
}

/// Evaluate the converged model at every iteration, surfacing poles
fn finish(p: [f64; 3], x: &[f64], cost: f64, iterations: usize) -> Result<RationalFit> {
    let model = RationalModel::from_array(p);
    let baseline = x
        .iter()
        .map(|&xi| model.evaluate(xi))
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| AnalysisError::FitDivergence {
            iterations,
            reason: format!("fitted model is undefined inside the data (b = {})", model.b),
        })?;

    tracing::debug!(
        iterations,
        a = model.a,
        b = model.b,
        c = model.c,
        residual_sum_squares = cost,
        "rational fit converged"
    );

    Ok(RationalFit {
        model,
        baseline,
        iterations,
        residual_sum_squares: cost,
    })
}

/// Sum of squared residuals; `None` when the model is undefined or not finite
fn sum_squares(p: &[f64; 3], x: &[f64], y: &[f64]) -> Option<f64> {
    let mut total = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let d = xi + p[1];
        if d == 0.0 {
            return None;
        }
        let r = yi - (p[0] / d + p[2]);
        total += r * r;
    }
    total.is_finite().then_some(total)
}

/// Accumulate `JᵀJ` and `Jᵀr` at `p`
fn normal_equations(p: &[f64; 3], x: &[f64], y: &[f64]) -> ([[f64; 3]; 3], [f64; 3]) {
    let mut jtj = [[0.0f64; 3]; 3];
    let mut jtr = [0.0f64; 3];

    for (&xi, &yi) in x.iter().zip(y) {
        let d = xi + p[1];
        let jac = [1.0 / d, -p[0] / (d * d), 1.0];
        let r = yi - (p[0] / d + p[2]);

        for i in 0..3 {
            jtr[i] += jac[i] * r;
            for j in 0..3 {
                jtj[i][j] += jac[i] * jac[j];
            }
        }
    }

    (jtj, jtr)
}

/// Gaussian elimination with partial pivoting; `None` when singular
fn solve_3x3(mut a: [[f64; 3]; 3], mut rhs: [f64; 3]) -> Option<[f64; 3]> {
    for k in 0..3 {
        let pivot = (k..3).max_by(|&i, &j| a[i][k].abs().total_cmp(&a[j][k].abs()))?;
        if a[pivot][k].abs() < 1e-300 || !a[pivot][k].is_finite() {
            return None;
        }
        a.swap(k, pivot);
        rhs.swap(k, pivot);

        for row in (k + 1)..3 {
            let factor = a[row][k] / a[k][k];
            for col in k..3 {
                a[row][col] -= factor * a[k][col];
            }
            rhs[row] -= factor * rhs[k];
        }
    }

    let mut out = [0.0f64; 3];
    for k in (0..3).rev() {
        let tail: f64 = ((k + 1)..3).map(|col| a[k][col] * out[col]).sum();
        out[k] = (rhs[k] - tail) / a[k][k];
    }
    out.iter().all(|v| v.is_finite()).then_some(out)
}
