//! Moving averages and rolling-window helpers.
//!
//! `rolling` is the shared window reduction: a window yields a value only when
//! all of its cells are known, so NaN never leaks into a neighbouring window.
//! EMA is a recurrence seeded by the SMA of its first clean window.

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE};
use crate::provider::IndicatorProvider;

/// Apply `reduce` to every full window of `period` known values.
///
/// The result at index `i` covers `values[i + 1 - period..=i]`.
pub fn rolling<F>(values: &[f64], period: usize, reduce: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }
    for (start, window) in values.windows(period).enumerate() {
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[start + period - 1] = reduce(window);
    }
    result
}

pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().sum::<f64>() / w.len() as f64)
}

pub fn rolling_sum(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().sum())
}

pub fn rolling_max(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().copied().fold(f64::MIN, f64::max))
}

pub fn rolling_min(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().copied().fold(f64::MAX, f64::min))
}

/// Rolling population standard deviation (divide by N).
pub fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| {
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        let var = w.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / w.len() as f64;
        var.sqrt()
    })
}

/// EMA of an arbitrary series: alpha = 2 / (period + 1), seeded with the SMA
/// of the first window of `period` known values. An unknown input resets the
/// recurrence, which re-seeds on the next clean window.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; values.len()];
    }
    let alpha = 2.0 / (period as f64 + 1.0);

    values
        .iter()
        .enumerate()
        .scan(None::<f64>, |state, (i, &x)| {
            let next = match *state {
                Some(prev) => Some(alpha * x + (1.0 - alpha) * prev).filter(|v| !v.is_nan()),
                None if i + 1 >= period => {
                    let window = &values[i + 1 - period..=i];
                    if window.iter().any(|v| v.is_nan()) {
                        None
                    } else {
                        Some(window.iter().sum::<f64>() / period as f64)
                    }
                }
                None => None,
            };
            *state = next;
            Some(next.unwrap_or(f64::NAN))
        })
        .collect()
}

/// Simple moving average of close, column `sma_{period}`.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl IndicatorProvider for Sma {
    fn id(&self) -> &'static str {
        "moving_averages"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let close = frame.float(CLOSE)?;
        Ok(vec![(
            self.name.clone(),
            Column::Float(rolling_mean(close, self.period)),
        )])
    }
}

/// Exponential moving average of close, column `ema_{period}`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl IndicatorProvider for Ema {
    fn id(&self) -> &'static str {
        "moving_averages"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let close = frame.float(CLOSE)?;
        Ok(vec![(
            self.name.clone(),
            Column::Float(ema_of_series(close, self.period)),
        )])
    }
}
