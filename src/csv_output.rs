//! CSV output formats
//!
//! - report rows (`--format csv`)
//! - per-point series export for plotting the fit and the detrended data
//! - histogram export with the normal overlay

use crate::histogram::Histogram;
use crate::pipeline::Analysis;
use crate::report::{SeriesStatistics, VarianceReport};

/// CSV report formatter: one row per series
#[derive(Debug)]
pub struct CsvStatsOutput {
    rows: Vec<(&'static str, SeriesStatistics)>,
}

impl CsvStatsOutput {
    pub fn new(report: &VarianceReport) -> Self {
        Self {
            rows: vec![
                ("original", *report.original()),
                ("detrended", *report.detrended()),
            ],
        }
    }

    fn header() -> &'static str {
        "series,mean,measured_variance,quantization_variance,real_variance,real_std,ratio"
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(Self::header());
        output.push('\n');

        for (name, stats) in &self.rows {
            output.push_str(&format!(
                "{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.6}\n",
                name,
                stats.mean,
                stats.measured_variance,
                stats.quantization_variance,
                stats.real_variance,
                stats.real_std,
                stats.ratio
            ));
        }

        output
    }
}

/// Per-point export: raw counts, baseline, detrended series and the ±1σ band
/// of the original data around the baseline
#[derive(Debug)]
pub struct CsvSeriesOutput<'a> {
    analysis: &'a Analysis,
}

impl<'a> CsvSeriesOutput<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Self { analysis }
    }

    pub fn to_csv(&self) -> String {
        let sigma = self.analysis.report().original().real_std;
        let mut output = String::from("iteration,n_ticks,baseline,detrended,band_lower,band_upper\n");

        let rows = self
            .analysis
            .series()
            .records()
            .iter()
            .zip(self.analysis.baseline().values())
            .zip(self.analysis.detrended());

        for ((record, baseline), detrended) in rows {
            output.push_str(&format!(
                "{},{},{:.6},{:.6},{:.6},{:.6}\n",
                record.iteration,
                record.count,
                baseline,
                detrended,
                baseline - sigma,
                baseline + sigma
            ));
        }

        output
    }
}

/// Histogram export
pub fn histogram_to_csv(histogram: &Histogram) -> String {
    let mut output = String::from("bin_lower,bin_upper,count,expected\n");
    for bin in &histogram.bins {
        output.push_str(&format!(
            "{:.6},{:.6},{},{:.6}\n",
            bin.lower, bin.upper, bin.count, bin.expected
        ));
    }
    output
}
