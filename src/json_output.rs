//! JSON output format for variance reports

use crate::detrend::BaselineOrigin;
use crate::pipeline::Analysis;
use crate::report::SeriesStatistics;
use serde::{Deserialize, Serialize};

/// A ratio that may be infinite
///
/// JSON has no infinity literal; non-finite values are written as strings
/// (`"inf"`) so the document stays valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRatio {
    Finite(f64),
    NonFinite(String),
}

impl From<f64> for JsonRatio {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Self::Finite(value)
        } else {
            Self::NonFinite(format!("{}", value))
        }
    }
}

/// Statistics of one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSeriesStatistics {
    pub mean: f64,
    pub measured_variance: f64,
    pub quantization_variance: f64,
    pub real_variance: f64,
    pub real_std: f64,
    /// mean / real_variance
    pub ratio: JsonRatio,
}

impl From<&SeriesStatistics> for JsonSeriesStatistics {
    fn from(stats: &SeriesStatistics) -> Self {
        Self {
            mean: stats.mean,
            measured_variance: stats.measured_variance,
            quantization_variance: stats.quantization_variance,
            real_variance: stats.real_variance,
            real_std: stats.real_std,
            ratio: stats.ratio.into(),
        }
    }
}

/// Fitted rational parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRationalModel {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub iterations: usize,
    pub residual_sum_squares: f64,
}

/// Strategy that produced the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonStrategy {
    /// "rational-fit" or "moving-average"
    pub kind: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<JsonRationalModel>,
}

/// Complete JSON report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub samples: usize,
    pub strategy: JsonStrategy,
    pub original: JsonSeriesStatistics,
    pub detrended: JsonSeriesStatistics,
}

impl JsonReport {
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let report = analysis.report();
        let label = report.strategy_label().to_string();

        let strategy = match analysis.baseline().origin() {
            BaselineOrigin::Rational {
                model,
                iterations,
                residual_sum_squares,
            } => JsonStrategy {
                kind: "rational-fit".to_string(),
                label,
                window: None,
                fit: Some(JsonRationalModel {
                    a: model.a,
                    b: model.b,
                    c: model.c,
                    iterations: *iterations,
                    residual_sum_squares: *residual_sum_squares,
                }),
            },
            BaselineOrigin::MovingAverage { window } => JsonStrategy {
                kind: "moving-average".to_string(),
                label,
                window: Some(*window),
                fit: None,
            },
        };

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            samples: analysis.series().len(),
            strategy,
            original: report.original().into(),
            detrended: report.detrended().into(),
        }
    }

    /// Serialize to pretty JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
