//! Rolling moving-average forecast.

use crate::error::{AnalyticsError, Result};

/// Default trailing window: `min(7, ceil(len / 3))`.
pub fn default_window(history_len: usize) -> usize {
    history_len.div_ceil(3).min(7)
}

/// Each step averages the last `window` values of history plus the
/// forecasts produced so far.
pub(super) fn forecast(history: &[f64], periods: usize, window: usize) -> Result<Vec<f64>> {
    if window == 0 || window > history.len() {
        return Err(AnalyticsError::invalid_input(format!(
            "moving-average window {window} must be between 1 and the history length {}",
            history.len()
        )));
    }

    let mut series = history.to_vec();
    let mut output = Vec::new();

    for _ in 0..periods {
        let tail = &series[series.len() - window..];
        let avg = tail.iter().sum::<f64>() / window as f64;
        output.push(avg);
        series.push(avg);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        assert_eq!(default_window(14), 5);
        assert_eq!(default_window(30), 7);
        assert_eq!(default_window(3), 1);
    }

    #[test]
    fn test_rolls_forward_over_own_output() {
        let history = [1.0, 2.0, 3.0, 4.0];
        let output = forecast(&history, 3, 2).unwrap();
        // (3+4)/2 = 3.5, (4+3.5)/2 = 3.75, (3.5+3.75)/2 = 3.625
        assert_eq!(output, vec![3.5, 3.75, 3.625]);
    }

    #[test]
    fn test_constant_series_stays_constant() {
        let history = [42.0; 14];
        let output = forecast(&history, 5, default_window(14)).unwrap();
        assert!(output.iter().all(|&v| v == 42.0));
    }

    #[test]
    fn test_window_larger_than_history_rejected() {
        let err = forecast(&[1.0, 2.0], 1, 3).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
