//! Holt-Winters exponential smoothing with multiplicative seasonality.

use crate::config::ForecastConfig;
use crate::utils::EPSILON;
use tracing::warn;

/// Level/trend/season smoother.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoltWinters {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub seasonal_periods: usize,
}

/// `numerator / denominator`, or `fallback` when the denominator is ~0.
fn guarded_div(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator.abs() <= EPSILON {
        fallback
    } else {
        numerator / denominator
    }
}

impl HoltWinters {
    pub fn new(alpha: f64, beta: f64, gamma: f64, seasonal_periods: usize) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            seasonal_periods: seasonal_periods.max(1),
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.alpha, config.beta, config.gamma, config.seasonal_periods)
    }

    /// Forecast `periods` steps past the end of `history`.
    ///
    /// Components are initialised from the first observations:
    /// `level = h[0]`, `trend = h[1] - h[0]`, `season[i] = h[i] / level`.
    /// A zero level yields neutral seasonal indices of 1.0.
    pub fn forecast(&self, history: &[f64], periods: usize) -> Vec<f64> {
        let m = self.seasonal_periods;

        let mut level = history.first().copied().unwrap_or(0.0);
        let mut trend = match history {
            [first, second, ..] => second - first,
            _ => 0.0,
        };

        if level.abs() <= EPSILON {
            warn!("Initial level is zero; using neutral seasonal indices");
        }

        // Seasons past the end of history are never observed and stay at 1.0,
        // so only the observed ones are stored.
        let mut seasonals: Vec<f64> = history
            .iter()
            .take(m)
            .map(|&actual| guarded_div(actual, level, 1.0))
            .collect();

        let mut output = Vec::new();
        for step in 0..periods {
            let index = history.len() + step;
            let season = index % m;
            let factor = seasonals.get(season).copied().unwrap_or(1.0);

            output.push((level + trend) * factor);

            // Components only update while `index` still has an observed
            // value; past the end of history they stay fixed.
            if let Some(&actual) = history.get(index)
                && let Some(seasonal) = seasonals.get_mut(season)
            {
                let previous_level = level;
                level = self.alpha * guarded_div(actual, *seasonal, 0.0)
                    + (1.0 - self.alpha) * (level + trend);
                trend = self.beta * (level - previous_level) + (1.0 - self.beta) * trend;
                *seasonal =
                    self.gamma * guarded_div(actual, level, 0.0) + (1.0 - self.gamma) * *seasonal;
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> HoltWinters {
        HoltWinters::new(0.2, 0.1, 0.1, 7)
    }

    #[test]
    fn test_constant_series_forecasts_constant() {
        let history = [50.0; 14];
        let output = model().forecast(&history, 10);
        assert_eq!(output.len(), 10);
        for value in output {
            assert!((value - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_seasonal_indices_follow_first_season() {
        // level = 100, trend = 10, season index for absolute position 14 -> 0
        let history = [
            100.0, 110.0, 90.0, 120.0, 100.0, 110.0, 90.0, 120.0, 100.0, 110.0, 90.0, 120.0,
            100.0, 110.0,
        ];
        let output = model().forecast(&history, 7);
        assert_eq!(output.len(), 7);

        // Step 0: index 14 % 7 = 0 -> season 100/100 = 1.0
        assert!((output[0] - 110.0).abs() < 1e-9);
        // Step 1: index 15 % 7 = 1 -> season 110/100 = 1.1
        assert!((output[1] - 121.0).abs() < 1e-9);
        // Step 2: index 16 % 7 = 2 -> season 90/100 = 0.9
        assert!((output[2] - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_first_value_stays_finite() {
        let mut history = vec![0.0];
        history.extend((1..14).map(|i| i as f64));
        let output = model().forecast(&history, 7);
        assert!(output.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_short_history_is_total() {
        assert_eq!(model().forecast(&[], 3), vec![0.0, 0.0, 0.0]);
        assert_eq!(model().forecast(&[5.0], 2).len(), 2);
    }

    #[test]
    fn test_season_longer_than_history_is_neutral() {
        let wide = HoltWinters::new(0.2, 0.1, 0.1, usize::MAX);
        let output = wide.forecast(&[100.0, 110.0], 3);
        assert_eq!(output, vec![110.0, 110.0, 110.0]);
    }
}
