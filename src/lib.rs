//! ticknoise - drift correction and noise estimation for tick-count series
//!
//! A timing experiment counts oscillator ticks per fixed interval. The counts
//! drift slowly (temperature) on top of random noise and a known
//! quantization floor. This crate estimates the drift baseline, removes it
//! while keeping the series mean, and reports the variance left after
//! subtracting quantization noise.
//!
//! ```
//! use ticknoise::config::AnalysisConfig;
//! use ticknoise::pipeline::analyze;
//! use ticknoise::series::MeasurementSeries;
//!
//! let series = MeasurementSeries::from_counts(&[100, 102, 98, 101, 99]).unwrap();
//! let analysis = analyze(&series, &AnalysisConfig::moving_average(3)).unwrap();
//! assert_eq!(analysis.baseline().values()[0], 101.0);
//! ```

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod detrend;
pub mod error;
pub mod histogram;
pub mod json_output;
pub mod pipeline;
pub mod quantization;
pub mod report;
pub mod residual;
pub mod series;
pub mod stats;
pub mod table;
pub mod variance;

pub use error::{AnalysisError, Result};
