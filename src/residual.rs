//! Mean-preserving detrend
//!
//! `residual[i] = count[i] - (baseline[i] - mean(count))`
//!
//! Only the baseline's fluctuation is removed, so the residual stays centred
//! on the original level instead of on zero.

use crate::error::{AnalysisError, Result};

/// Subtract `baseline` from `counts`, keeping `mean` as the level
pub fn build_residual(counts: &[f64], baseline: &[f64], mean: f64) -> Result<Vec<f64>> {
    if counts.len() != baseline.len() {
        return Err(AnalysisError::LengthMismatch {
            expected: counts.len(),
            actual: baseline.len(),
        });
    }

    Ok(counts
        .iter()
        .zip(baseline)
        .map(|(count, base)| count - (base - mean))
        .collect())
}
