//! Time-series forecasting.
//!
//! Two deliberately simple models are available:
//! - [`moving_average`]: trailing-window mean rolled forward over its own output
//! - [`holt_winters`]: level/trend/season exponential smoothing with
//!   multiplicative seasonality
//!
//! Both require at least two full seasons of history and always return
//! exactly `periods` values.

mod holt_winters;
mod moving_average;

pub use holt_winters::HoltWinters;
pub use moving_average::default_window;

use crate::config::{ForecastConfig, ForecastMethod};
use crate::error::{AnalyticsError, Result};
use tracing::debug;

/// Projects a numeric history forward.
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast `periods` values past the end of `history`.
    pub fn forecast(&self, history: &[f64], periods: usize) -> Result<Vec<f64>> {
        let required = self.config.min_history();
        if history.len() < required {
            return Err(AnalyticsError::InsufficientData {
                required,
                actual: history.len(),
            });
        }

        if let Some(idx) = history.iter().position(|v| !v.is_finite()) {
            return Err(AnalyticsError::invalid_input(format!(
                "history contains a non-finite value at index {idx}"
            )));
        }

        debug!(
            "Forecasting {} periods from {} observations using {:?}",
            periods,
            history.len(),
            self.config.method
        );

        match self.config.method {
            ForecastMethod::MovingAverage => {
                let window = self
                    .config
                    .window_size
                    .unwrap_or_else(|| default_window(history.len()));
                moving_average::forecast(history, periods, window)
            }
            ForecastMethod::ExponentialSmoothing => {
                Ok(HoltWinters::from_config(&self.config).forecast(history, periods))
            }
        }
    }
}
