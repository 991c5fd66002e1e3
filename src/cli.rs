//! CLI argument parsing for ticknoise

use crate::config::AnalysisConfig;
use crate::detrend::{DetrendStrategy, RationalFitParams, DEFAULT_WINDOW};
use crate::histogram::DEFAULT_BINS;
use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the variance report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

/// Detrending strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    /// Fit a / (x + b) + c by nonlinear least squares
    RationalFit,
    /// Centered moving average
    MovingAverage,
}

#[derive(Parser, Debug)]
#[command(name = "ticknoise")]
#[command(version)]
#[command(
    about = "Drift-corrected, quantization-corrected noise of oscillator tick counts",
    long_about = None
)]
pub struct Cli {
    /// Input table with `iteration` and `n_ticks` columns
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// TOML run configuration (flags override its values)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Counter quantization step (default: 16)
    #[arg(short = 'q', long = "quantization-step", value_name = "STEP")]
    pub quantization_step: Option<i64>,

    /// Detrending strategy (default: moving-average)
    #[arg(short = 's', long = "strategy", value_enum)]
    pub strategy: Option<StrategyKind>,

    /// Moving-average window size (default: 75)
    #[arg(short = 'w', long = "window", value_name = "SIZE")]
    pub window: Option<usize>,

    /// Rational-fit optimizer iteration cap (default: 10000)
    #[arg(long = "max-iterations", value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Rational-fit initial guess for a (default: 1000)
    #[arg(long = "initial-a", value_name = "A", allow_negative_numbers = true)]
    pub initial_a: Option<f64>,

    /// Rational-fit initial guess for b (default: 1)
    #[arg(long = "initial-b", value_name = "B", allow_negative_numbers = true)]
    pub initial_b: Option<f64>,

    /// Rational-fit initial guess for c (default: minimum count)
    #[arg(long = "initial-c", value_name = "C", allow_negative_numbers = true)]
    pub initial_c: Option<f64>,

    /// Skip malformed input rows instead of failing
    #[arg(long = "lenient")]
    pub lenient: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write per-point iteration, count, baseline and detrended values as CSV
    #[arg(long = "export-series", value_name = "PATH")]
    pub export_series: Option<PathBuf>,

    /// Write a histogram of the detrended series with normal overlay as CSV
    #[arg(long = "export-histogram", value_name = "PATH")]
    pub export_histogram: Option<PathBuf>,

    /// Histogram bin count
    #[arg(long = "bins", value_name = "N", default_value_t = DEFAULT_BINS)]
    pub bins: usize,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    fn has_rational_flags(&self) -> bool {
        self.max_iterations.is_some()
            || self.initial_a.is_some()
            || self.initial_b.is_some()
            || self.initial_c.is_some()
    }

    /// Apply flag overrides on top of `base`
    pub fn apply_to(&self, mut config: AnalysisConfig) -> Result<AnalysisConfig> {
        if let Some(step) = self.quantization_step {
            config.quantization_step = step;
        }
        if self.lenient {
            config.table.lenient = true;
        }

        // Switching kind resets that strategy's settings to defaults
        let is_rational = matches!(config.strategy, DetrendStrategy::RationalFit(_));
        match (self.strategy, is_rational) {
            (Some(StrategyKind::RationalFit), false) => {
                config.strategy = DetrendStrategy::RationalFit(RationalFitParams::default());
            }
            (Some(StrategyKind::MovingAverage), true) => {
                config.strategy = DetrendStrategy::MovingAverage {
                    window: DEFAULT_WINDOW,
                };
            }
            _ => {}
        }

        match &mut config.strategy {
            DetrendStrategy::MovingAverage { window } => {
                if self.has_rational_flags() {
                    bail!("--max-iterations and --initial-* only apply to --strategy rational-fit");
                }
                if let Some(w) = self.window {
                    *window = w;
                }
            }
            DetrendStrategy::RationalFit(params) => {
                if self.window.is_some() {
                    bail!("--window only applies to --strategy moving-average");
                }
                if let Some(n) = self.max_iterations {
                    params.max_iterations = n;
                }
                if let Some(a) = self.initial_a {
                    params.initial_guess.a = a;
                }
                if let Some(b) = self.initial_b {
                    params.initial_guess.b = b;
                }
                if let Some(c) = self.initial_c {
                    params.initial_guess.c = Some(c);
                }
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_input() {
        let cli = Cli::parse_from(["ticknoise", "data/exp1.csv"]);
        assert_eq!(cli.input, PathBuf::from("data/exp1.csv"));
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.bins, 30);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["ticknoise"]).is_err());
    }

    #[test]
    fn test_cli_defaults_give_default_config() {
        let cli = Cli::parse_from(["ticknoise", "in.csv"]);
        let config = cli.apply_to(AnalysisConfig::default()).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_cli_moving_average_window() {
        let cli = Cli::parse_from(["ticknoise", "in.csv", "-w", "25", "-q", "8"]);
        let config = cli.apply_to(AnalysisConfig::default()).unwrap();
        assert_eq!(config.strategy, DetrendStrategy::MovingAverage { window: 25 });
        assert_eq!(config.quantization_step, 8);
    }

    #[test]
    fn test_cli_rational_fit_flags() {
        let cli = Cli::parse_from([
            "ticknoise",
            "in.csv",
            "--strategy",
            "rational-fit",
            "--max-iterations",
            "500",
            "--initial-b",
            "-0.5",
            "--initial-c",
            "168000",
        ]);
        let config = cli.apply_to(AnalysisConfig::default()).unwrap();
        match config.strategy {
            DetrendStrategy::RationalFit(params) => {
                assert_eq!(params.max_iterations, 500);
                assert_eq!(params.initial_guess.a, 1000.0);
                assert_eq!(params.initial_guess.b, -0.5);
                assert_eq!(params.initial_guess.c, Some(168000.0));
            }
            other => panic!("expected rational fit, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_window_with_rational_fit_rejected() {
        let cli = Cli::parse_from(["ticknoise", "in.csv", "-s", "rational-fit", "-w", "3"]);
        assert!(cli.apply_to(AnalysisConfig::default()).is_err());
    }

    #[test]
    fn test_cli_rational_flags_with_moving_average_rejected() {
        let cli = Cli::parse_from(["ticknoise", "in.csv", "--max-iterations", "10"]);
        assert!(cli.apply_to(AnalysisConfig::default()).is_err());
    }

    #[test]
    fn test_cli_flags_override_file_config() {
        let base = AnalysisConfig::rational_fit();
        let cli = Cli::parse_from(["ticknoise", "in.csv", "--max-iterations", "42"]);
        let config = cli.apply_to(base).unwrap();
        match config.strategy {
            DetrendStrategy::RationalFit(params) => assert_eq!(params.max_iterations, 42),
            other => panic!("expected rational fit, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_format_and_exports() {
        let cli = Cli::parse_from([
            "ticknoise",
            "in.csv",
            "--format",
            "json",
            "--export-series",
            "series.csv",
            "--export-histogram",
            "hist.csv",
            "--bins",
            "40",
            "--lenient",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.export_series, Some(PathBuf::from("series.csv")));
        assert_eq!(cli.export_histogram, Some(PathBuf::from("hist.csv")));
        assert_eq!(cli.bins, 40);
        assert!(cli.apply_to(AnalysisConfig::default()).unwrap().table.lenient);
    }
}
