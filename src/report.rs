//! Variance report: the terminal artefact of an analysis run

use crate::stats::mean;
use crate::variance::{correct_variance, VarianceCorrection};

/// `mean / real_variance`, or `+inf` when the corrected variance is zero
///
/// An infinite ratio is a valid value: the corrected variance vanished.
pub fn mean_variance_ratio(mean: f64, real_variance: f64) -> f64 {
    if real_variance > 0.0 {
        mean / real_variance
    } else {
        f64::INFINITY
    }
}

/// Statistics of one series (raw or detrended)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStatistics {
    pub mean: f64,
    pub measured_variance: f64,
    pub quantization_variance: f64,
    pub real_variance: f64,
    pub real_std: f64,
    /// `mean / real_variance`
    pub ratio: f64,
}

impl SeriesStatistics {
    pub fn compute(values: &[f64], quantization_variance: f64) -> Self {
        let m = mean(values);
        let VarianceCorrection {
            measured_variance,
            quantization_variance,
            real_variance,
            real_std,
        } = correct_variance(values, quantization_variance);

        Self {
            mean: m,
            measured_variance,
            quantization_variance,
            real_variance,
            real_std,
            ratio: mean_variance_ratio(m, real_variance),
        }
    }

    /// True when the quantization floor swallowed the whole measured spread
    pub fn is_degenerate(&self) -> bool {
        self.real_variance == 0.0
    }
}

/// Report for the raw series and its detrended counterpart
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceReport {
    strategy_label: String,
    original: SeriesStatistics,
    detrended: SeriesStatistics,
}

impl VarianceReport {
    pub fn new(
        strategy_label: impl Into<String>,
        raw: &[f64],
        detrended: &[f64],
        quantization_variance: f64,
    ) -> Self {
        Self {
            strategy_label: strategy_label.into(),
            original: SeriesStatistics::compute(raw, quantization_variance),
            detrended: SeriesStatistics::compute(detrended, quantization_variance),
        }
    }

    /// Label of the strategy that produced the baseline
    pub fn strategy_label(&self) -> &str {
        &self.strategy_label
    }

    pub fn original(&self) -> &SeriesStatistics {
        &self.original
    }

    pub fn detrended(&self) -> &SeriesStatistics {
        &self.detrended
    }

    /// One-line outcome of the detrend, e.g.
    /// `Rational fit: Variance =  12.3456, Std = 3.5136`
    pub fn strategy_summary(&self) -> String {
        format!(
            "{}: Variance = {:8.4}, Std = {:6.4}",
            self.strategy_label, self.detrended.real_variance, self.detrended.real_std
        )
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = format!("{} selected\n", self.strategy_label);
        push_section(&mut report, "Original Data", &self.original);
        push_section(&mut report, "Temperature corrected Data", &self.detrended);
        report
    }
}

fn push_section(report: &mut String, title: &str, stats: &SeriesStatistics) {
    report.push_str(&format!("\n=== {} ===\n", title));
    report.push_str(&format!("Mean: {:.4}\n", stats.mean));
    report.push_str(&format!("Measured Variance: {:.4}\n", stats.measured_variance));
    report.push_str(&format!(
        "Quantization Variance: {:.4}\n",
        stats.quantization_variance
    ));
    report.push_str(&format!("Real Variance: {:.4}\n", stats.real_variance));
    report.push_str(&format!("Real Std: {:.4}\n", stats.real_std));
    report.push_str(&format!("R (mean/variance): {:.6}\n", stats.ratio));
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q16: f64 = 256.0 / 12.0;

    #[test]
    fn test_ratio_infinite_when_zero() {
        assert_eq!(mean_variance_ratio(10.0, 0.0), f64::INFINITY);
    }

    #[test]
    fn test_ratio_finite_otherwise() {
        assert_eq!(mean_variance_ratio(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_constant_series_statistics() {
        let stats = SeriesStatistics::compute(&[10.0; 5], Q16);
        assert_eq!(stats.mean, 10.0);
        assert_eq!(stats.measured_variance, 0.0);
        assert!((stats.quantization_variance - 21.3333).abs() < 1e-4);
        assert_eq!(stats.real_variance, 0.0);
        assert_eq!(stats.real_std, 0.0);
        assert!(stats.ratio.is_infinite() && stats.ratio > 0.0);
        assert!(stats.is_degenerate());
    }

    #[test]
    fn test_noisy_series_statistics() {
        // measured variance = 250 / 6, floor = 2
        let values = [90.0, 110.0, 95.0, 105.0, 100.0, 100.0];
        let stats = SeriesStatistics::compute(&values, 2.0);
        let measured = (100.0 + 100.0 + 25.0 + 25.0) / 6.0;
        assert!((stats.measured_variance - measured).abs() < 1e-12);
        assert!((stats.real_variance - (measured - 2.0)).abs() < 1e-12);
        assert!((stats.ratio - 100.0 / (measured - 2.0)).abs() < 1e-12);
        assert!(!stats.is_degenerate());
    }

    #[test]
    fn test_report_summary_format() {
        let report = VarianceReport::new(
            "Moving Average (window=3)",
            &[10.0, 14.0],
            &[10.0, 14.0],
            0.0,
        );
        assert_eq!(
            report.strategy_summary(),
            "Moving Average (window=3): Variance =   4.0000, Std = 2.0000"
        );
    }

    #[test]
    fn test_report_string_precision() {
        let report = VarianceReport::new("Rational fit", &[10.0; 5], &[10.0; 5], Q16);
        let text = report.to_report_string();
        let expected = "Rational fit selected\n\
                        \n=== Original Data ===\n\
                        Mean: 10.0000\n\
                        Measured Variance: 0.0000\n\
                        Quantization Variance: 21.3333\n\
                        Real Variance: 0.0000\n\
                        Real Std: 0.0000\n\
                        R (mean/variance): inf\n\
                        \n=== Temperature corrected Data ===\n\
                        Mean: 10.0000\n\
                        Measured Variance: 0.0000\n\
                        Quantization Variance: 21.3333\n\
                        Real Variance: 0.0000\n\
                        Real Std: 0.0000\n\
                        R (mean/variance): inf\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_report_string_finite_ratio() {
        let report = VarianceReport::new("Rational fit", &[90.0, 110.0], &[95.0, 105.0], 0.0);
        let text = report.to_report_string();
        assert!(text.contains("Real Variance: 100.0000\n"));
        assert!(text.contains("R (mean/variance): 1.000000\n"));
        assert!(text.contains("R (mean/variance): 4.000000\n"));
    }
}
