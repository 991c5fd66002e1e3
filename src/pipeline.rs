//! Analysis pipeline
//!
//! raw series → baseline → mean-preserving residual → corrected variance of
//! both series → [`VarianceReport`].
//!
//! Every run is a pure function of the series and the configuration.

use crate::config::AnalysisConfig;
use crate::detrend::Baseline;
use crate::error::Result;
use crate::quantization::QuantizationModel;
use crate::report::VarianceReport;
use crate::residual::build_residual;
use crate::series::MeasurementSeries;
use crate::stats::mean;

/// Everything one run produced, for reporting and plot exports
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    series: MeasurementSeries,
    baseline: Baseline,
    detrended: Vec<f64>,
    report: VarianceReport,
}

impl Analysis {
    pub fn series(&self) -> &MeasurementSeries {
        &self.series
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Mean-preserving detrended series
    pub fn detrended(&self) -> &[f64] {
        &self.detrended
    }

    pub fn report(&self) -> &VarianceReport {
        &self.report
    }
}

/// Run the full pipeline
///
/// # Example
/// ```
/// use ticknoise::config::AnalysisConfig;
/// use ticknoise::pipeline::analyze;
/// use ticknoise::series::MeasurementSeries;
///
/// let series = MeasurementSeries::from_counts(&[10, 10, 10, 10, 10]).unwrap();
/// let analysis = analyze(&series, &AnalysisConfig::moving_average(3)).unwrap();
/// assert!(analysis.report().original().ratio.is_infinite());
/// ```
pub fn analyze(series: &MeasurementSeries, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;
    let quantization = QuantizationModel::new(config.quantization_step)?;

    let counts = series.counts();
    let baseline = config.strategy.compute_baseline(series)?;
    let detrended = build_residual(&counts, baseline.values(), mean(&counts))?;

    let report = VarianceReport::new(
        config.strategy.label(),
        &counts,
        &detrended,
        quantization.variance(),
    );
    tracing::info!("{}", report.strategy_summary());

    Ok(Analysis {
        series: series.clone(),
        baseline,
        detrended,
        report,
    })
}
