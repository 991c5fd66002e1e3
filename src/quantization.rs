//! Quantization noise floor
//!
//! Rounding a continuous quantity to the nearest multiple of `step` adds an
//! independent error that is uniform on `[-step/2, step/2]`, whose variance
//! is `step² / 12`.

use crate::error::{AnalysisError, Result};

/// Default quantization step of the tick counter
pub const DEFAULT_STEP: i64 = 16;

/// Known quantization step of an acquisition setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizationModel {
    step: i64,
}

impl QuantizationModel {
    /// Create a model, rejecting non-positive steps
    pub fn new(step: i64) -> Result<Self> {
        if step <= 0 {
            return Err(AnalysisError::invalid(format!(
                "quantization step must be positive, got {}",
                step
            )));
        }
        Ok(Self { step })
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Variance contributed by quantization: `step² / 12`
    pub fn variance(&self) -> f64 {
        let s = self.step as f64;
        s * s / 12.0
    }
}

impl Default for QuantizationModel {
    fn default() -> Self {
        Self { step: DEFAULT_STEP }
    }
}

/// Shorthand for `QuantizationModel::new(step)?.variance()`
pub fn quantization_variance(step: i64) -> Result<f64> {
    Ok(QuantizationModel::new(step)?.variance())
}
