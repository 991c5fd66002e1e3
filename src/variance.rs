//! Quantization-corrected variance
//!
//! Quantization noise adds independently to the physical noise, so the
//! physical ("real") variance is the measured variance minus the
//! quantization floor. When the floor exceeds the measurement the real
//! variance is reported as exactly zero.

use crate::stats::population_variance;
use serde::{Deserialize, Serialize};

/// Measured and corrected spread of one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceCorrection {
    /// Population variance of the series (denominator N)
    pub measured_variance: f64,
    /// Quantization floor that was subtracted
    pub quantization_variance: f64,
    /// `max(0, measured - quantization)`
    pub real_variance: f64,
    /// `sqrt(real_variance)`
    pub real_std: f64,
}

impl VarianceCorrection {
    /// Correct an already-measured variance
    pub fn from_measured(measured_variance: f64, quantization_variance: f64) -> Self {
        let real_variance = (measured_variance - quantization_variance).max(0.0);
        Self {
            measured_variance,
            quantization_variance,
            real_variance,
            real_std: real_variance.sqrt(),
        }
    }
}

/// Measure `series` and subtract the quantization floor
pub fn correct_variance(series: &[f64], quantization_variance: f64) -> VarianceCorrection {
    VarianceCorrection::from_measured(population_variance(series), quantization_variance)
}
