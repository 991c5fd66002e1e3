//! Detrending strategies
//!
//! A strategy turns a measurement series into a baseline: the slow drift
//! that the residual builder later removes. Two shapes are supported:
//!
//! - [`DetrendStrategy::RationalFit`]: parametric warm-up curve `a/(x+b) + c`
//! - [`DetrendStrategy::MovingAverage`]: centered windowed mean
//!
//! Strategy choice is explicit. A failed fit is reported, never replaced by
//! the other strategy.

mod moving_average;
mod rational;

pub use moving_average::moving_average;
pub use rational::{
    fit_rational, InitialGuess, RationalFit, RationalFitParams, RationalModel,
};

use crate::error::{AnalysisError, Result};
use crate::series::MeasurementSeries;
use serde::{Deserialize, Serialize};

/// Default moving-average window
pub const DEFAULT_WINDOW: usize = 75;

/// How the baseline is estimated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DetrendStrategy {
    RationalFit(RationalFitParams),
    MovingAverage { window: usize },
}

impl Default for DetrendStrategy {
    fn default() -> Self {
        Self::MovingAverage {
            window: DEFAULT_WINDOW,
        }
    }
}

/// Extra information a strategy produced along with its baseline
#[derive(Debug, Clone, PartialEq)]
pub enum BaselineOrigin {
    Rational {
        model: RationalModel,
        iterations: usize,
        residual_sum_squares: f64,
    },
    MovingAverage { window: usize },
}

/// Estimated slow-varying component, aligned 1:1 with the series
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    values: Vec<f64>,
    origin: BaselineOrigin,
}

impl Baseline {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn origin(&self) -> &BaselineOrigin {
        &self.origin
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl DetrendStrategy {
    /// Reject settings that cannot produce a baseline
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::RationalFit(params) => params.validate(),
            Self::MovingAverage { window } if *window < 1 => Err(AnalysisError::invalid(
                format!("moving-average window must be >= 1, got {}", window),
            )),
            Self::MovingAverage { .. } => Ok(()),
        }
    }

    /// Estimate the baseline of `series`
    pub fn compute_baseline(&self, series: &MeasurementSeries) -> Result<Baseline> {
        self.validate()?;

        match self {
            Self::RationalFit(params) => {
                let fit = fit_rational(series, params)?;
                Ok(Baseline {
                    values: fit.baseline,
                    origin: BaselineOrigin::Rational {
                        model: fit.model,
                        iterations: fit.iterations,
                        residual_sum_squares: fit.residual_sum_squares,
                    },
                })
            }
            Self::MovingAverage { window } => Ok(Baseline {
                values: moving_average(&series.counts(), *window)?,
                origin: BaselineOrigin::MovingAverage { window: *window },
            }),
        }
    }

    /// Human label used in reports, e.g. `Moving Average (window=75)`
    pub fn label(&self) -> String {
        match self {
            Self::RationalFit(_) => "Rational fit".to_string(),
            Self::MovingAverage { window } => format!("Moving Average (window={})", window),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_moving_average() {
        assert_eq!(
            DetrendStrategy::default(),
            DetrendStrategy::MovingAverage { window: 75 }
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            DetrendStrategy::RationalFit(RationalFitParams::default()).label(),
            "Rational fit"
        );
        assert_eq!(
            DetrendStrategy::MovingAverage { window: 25 }.label(),
            "Moving Average (window=25)"
        );
    }

    #[test]
    fn test_moving_average_baseline() {
        let series = MeasurementSeries::from_counts(&[100, 102, 98, 101, 99]).unwrap();
        let baseline = DetrendStrategy::MovingAverage { window: 3 }
            .compute_baseline(&series)
            .unwrap();
        assert_eq!(baseline.len(), 5);
        assert_eq!(baseline.values()[0], 101.0);
        assert_eq!(
            baseline.origin(),
            &BaselineOrigin::MovingAverage { window: 3 }
        );
    }

    #[test]
    fn test_rational_baseline_carries_model() {
        let series = MeasurementSeries::from_counts(&[200, 150, 120, 110, 105, 103, 102]).unwrap();
        let baseline = DetrendStrategy::RationalFit(RationalFitParams::default())
            .compute_baseline(&series)
            .unwrap();
        assert_eq!(baseline.len(), series.len());
        assert!(matches!(baseline.origin(), BaselineOrigin::Rational { .. }));
    }

    #[test]
    fn test_zero_window_rejected_before_work() {
        let series = MeasurementSeries::from_counts(&[1, 2, 3]).unwrap();
        let err = DetrendStrategy::MovingAverage { window: 0 }
            .compute_baseline(&series)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_strategy_toml_roundtrip_shape() {
        let strategy: DetrendStrategy =
            toml::from_str("kind = \"moving-average\"\nwindow = 40\n").unwrap();
        assert_eq!(strategy, DetrendStrategy::MovingAverage { window: 40 });

        let strategy: DetrendStrategy =
            toml::from_str("kind = \"rational-fit\"\nmax_iterations = 500\n").unwrap();
        match strategy {
            DetrendStrategy::RationalFit(params) => {
                assert_eq!(params.max_iterations, 500);
                assert_eq!(params.initial_guess, InitialGuess::default());
            }
            other => panic!("expected rational fit, got {:?}", other),
        }
    }
}
