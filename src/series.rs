//! Measurement series: the ordered `(iteration, count)` records of one run

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// One counter reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Index of the timing interval
    pub iteration: i64,
    /// Oscillator ticks counted during the interval
    pub count: i64,
}

/// An immutable, non-empty sequence of counter readings
///
/// Iterations are expected to increase but duplicates are not rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSeries {
    records: Vec<Record>,
}

impl MeasurementSeries {
    /// Build a series from records, rejecting an empty input
    pub fn new(records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err(AnalysisError::invalid(
                "measurement series must contain at least one record",
            ));
        }
        Ok(Self { records })
    }

    /// Build a series from parallel iteration/count slices
    pub fn from_columns(iterations: &[i64], counts: &[i64]) -> Result<Self> {
        if iterations.len() != counts.len() {
            return Err(AnalysisError::LengthMismatch {
                expected: iterations.len(),
                actual: counts.len(),
            });
        }
        let records = iterations
            .iter()
            .zip(counts)
            .map(|(&iteration, &count)| Record { iteration, count })
            .collect();
        Self::new(records)
    }

    /// Build a series from counts alone, numbering iterations from zero
    pub fn from_counts(counts: &[i64]) -> Result<Self> {
        let iterations: Vec<i64> = (0..counts.len() as i64).collect();
        Self::from_columns(&iterations, counts)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the series holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterations as reals, for evaluating the baseline model
    pub fn iterations(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.iteration as f64).collect()
    }

    /// Counts as reals
    pub fn counts(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.count as f64).collect()
    }

    /// Smallest observed count
    pub fn min_count(&self) -> i64 {
        self.records
            .iter()
            .map(|r| r.count)
            .min()
            .unwrap_or_default()
    }
}
