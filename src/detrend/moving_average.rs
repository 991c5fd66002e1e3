//! Centered moving-average smoother with shrinking edge windows

use crate::error::{AnalysisError, Result};

/// Centered moving average of `window` samples
///
/// Position `i` averages `[i - window/2, i + (window-1)/2]`, clipped to the
/// series bounds. Odd windows are symmetric; even windows carry the extra
/// sample on the leading side. Near the edges the mean is taken over the
/// in-bounds samples only.
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<f64>> {
    if window < 1 {
        return Err(AnalysisError::invalid(format!(
            "moving-average window must be >= 1, got {}",
            window
        )));
    }

    let n = values.len();
    let before = window / 2;
    let after = (window - 1) / 2;

    // prefix[k] = sum of values[..k]; exact for integer counts below 2^53
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0f64);
    let mut running = 0.0f64;
    for &v in values {
        running += v;
        prefix.push(running);
    }

    let smoothed = (0..n)
        .map(|i| {
            let start = i.saturating_sub(before);
            let end = (i + after + 1).min(n);
            (prefix[end] - prefix[start]) / (end - start) as f64
        })
        .collect();

    Ok(smoothed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_one_is_identity() {
        let values = [100.0, 102.0, 98.0, 101.0, 99.0];
        assert_eq!(moving_average(&values, 1).unwrap(), values.to_vec());
    }

    #[test]
    fn test_window_three_edge_shrink() {
        let values = [100.0, 102.0, 98.0, 101.0, 99.0];
        let avg = moving_average(&values, 3).unwrap();
        assert_eq!(avg.len(), 5);
        assert_eq!(avg[0], 101.0); // mean of [100, 102]
        assert!((avg[2] - 100.333_333).abs() < 1e-5); // mean of [102, 98, 101]
        assert_eq!(avg[4], 100.0); // mean of [101, 99]
    }

    #[test]
    fn test_even_window_leads_by_one() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let avg = moving_average(&values, 4).unwrap();
        // i=2 covers [0, 3]
        assert_eq!(avg[2], 2.5);
        // i=0 covers [0, 1]
        assert_eq!(avg[0], 1.5);
        // i=5 covers [3, 5]
        assert_eq!(avg[5], 5.0);
    }

    #[test]
    fn test_window_larger_than_series() {
        let values = [10.0, 20.0, 30.0];
        let avg = moving_average(&values, 9).unwrap();
        // Every position sees the whole series, never zero padding
        assert_eq!(avg, vec![20.0, 20.0, 20.0]);
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(matches!(
            moving_average(&[1.0, 2.0], 0),
            Err(AnalysisError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(moving_average(&[], 5).unwrap().is_empty());
    }
}
