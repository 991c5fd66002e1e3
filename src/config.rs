//! Run configuration for the analysis pipeline
//!
//! One explicit value per run; nothing is read from process-wide state.
//! Configurations can be written as TOML:
//!
//! ```toml
//! quantization_step = 16
//!
//! [strategy]
//! kind = "rational-fit"
//! max_iterations = 10000
//!
//! [strategy.initial_guess]
//! a = 1000.0
//! b = 1.0
//!
//! [table]
//! lenient = true
//! ```

use crate::detrend::{DetrendStrategy, RationalFitParams};
use crate::error::{AnalysisError, Result};
use crate::quantization::{QuantizationModel, DEFAULT_STEP};
use crate::table::TableOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of one analysis run
///
/// # Example
/// ```
/// use ticknoise::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.quantization_step, 16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Counter quantization step; the noise floor is `step² / 12`
    pub quantization_step: i64,

    /// How the drift baseline is estimated
    pub strategy: DetrendStrategy,

    /// Input table handling
    pub table: TableOptions,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            quantization_step: DEFAULT_STEP,
            strategy: DetrendStrategy::default(),
            table: TableOptions::default(),
        }
    }
}

impl AnalysisConfig {
    /// Rational-fit configuration with default optimizer settings
    pub fn rational_fit() -> Self {
        Self {
            strategy: DetrendStrategy::RationalFit(RationalFitParams::default()),
            ..Self::default()
        }
    }

    /// Moving-average configuration with the given window
    pub fn moving_average(window: usize) -> Self {
        Self {
            strategy: DetrendStrategy::MovingAverage { window },
            ..Self::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| AnalysisError::invalid(format!("config: {}", e)))
    }

    /// Load a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        QuantizationModel::new(self.quantization_step)?;
        self.strategy.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.quantization_step, 16);
        assert_eq!(config.strategy, DetrendStrategy::MovingAverage { window: 75 });
        assert!(!config.table.lenient);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rational_fit_config() {
        let config = AnalysisConfig::rational_fit();
        assert!(matches!(config.strategy, DetrendStrategy::RationalFit(_)));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_step() {
        let mut config = AnalysisConfig::default();
        config.quantization_step = 0;
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_invalid_window() {
        let config = AnalysisConfig::moving_average(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = AnalysisConfig::from_toml_str("quantization_step = 8\n").unwrap();
        assert_eq!(config.quantization_step, 8);
        assert_eq!(config.strategy, DetrendStrategy::default());
    }

    #[test]
    fn test_from_toml_rational() {
        let text = r#"
quantization_step = 16

[strategy]
kind = "rational-fit"
max_iterations = 250

[strategy.initial_guess]
a = 500.0
b = 2.0
c = 168000.0

[table]
lenient = true
"#;
        let config = AnalysisConfig::from_toml_str(text).unwrap();
        match config.strategy {
            DetrendStrategy::RationalFit(params) => {
                assert_eq!(params.max_iterations, 250);
                assert_eq!(params.initial_guess.a, 500.0);
                assert_eq!(params.initial_guess.c, Some(168000.0));
            }
            other => panic!("expected rational fit, got {:?}", other),
        }
        assert!(config.table.lenient);
    }

    #[test]
    fn test_from_toml_unknown_strategy() {
        let err = AnalysisConfig::from_toml_str("[strategy]\nkind = \"spline\"\n").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "[strategy]\nkind = \"moving-average\"\nwindow = 25\n").unwrap();
        let config = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(config.strategy, DetrendStrategy::MovingAverage { window: 25 });
    }
}
