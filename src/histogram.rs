//! Histogram of a series with a scaled normal-density overlay
//!
//! Numeric input for the plotting side: equal-width bins over the data range
//! and the normal density `N(mean, real_std)` scaled to counts per bin
//! (`pdf * samples * bin_width`).

use crate::error::{AnalysisError, Result};
use crate::stats::min_max;
use std::f64::consts::PI;

/// Default bin count of the distribution plots
pub const DEFAULT_BINS: usize = 30;

/// One histogram bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// Expected count under the fitted normal
    pub expected: f64,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<Bin>,
    pub bin_width: f64,
    pub samples: usize,
}

/// Normal probability density
pub fn normal_pdf(x: f64, mean: f64, std: f64) -> f64 {
    if std <= 0.0 {
        return 0.0;
    }
    let z = (x - mean) / std;
    (-0.5 * z * z).exp() / (std * (2.0 * PI).sqrt())
}

/// Bin `values` into `bins` equal-width bins and overlay `N(mean, std)`
///
/// The last bin is closed on the right. A constant series is spread over a
/// unit-wide range centred on its value. A zero `std` yields a zero overlay.
pub fn histogram(values: &[f64], bins: usize, mean: f64, std: f64) -> Result<Histogram> {
    if bins == 0 {
        return Err(AnalysisError::invalid("histogram needs at least one bin"));
    }
    let (mut lo, mut hi) =
        min_max(values).ok_or_else(|| AnalysisError::invalid("histogram of an empty series"))?;
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    let mut samples = 0usize;
    for &v in values.iter().filter(|v| !v.is_nan()) {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
        samples += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lower = lo + i as f64 * width;
            let upper = lower + width;
            let center = (lower + upper) / 2.0;
            Bin {
                lower,
                upper,
                count,
                expected: normal_pdf(center, mean, std) * samples as f64 * width,
            }
        })
        .collect();

    Ok(Histogram {
        bins,
        bin_width: width,
        samples,
    })
}
