//! Relative Strength Index (RSI).
//!
//! Uses Wilder averages of gains and losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period.
//! Edge cases: avg_loss == 0 with gains -> 100; no movement at all -> NaN.

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE};
use crate::indicators::wilder::wilder_average;
use crate::provider::IndicatorProvider;

pub fn rsi_series(close: &[f64], period: usize) -> Vec<f64> {
    let n = close.len();
    let mut gains = vec![f64::NAN; n];
    let mut losses = vec![f64::NAN; n];
    for i in 1..n {
        let change = close[i] - close[i - 1];
        if change.is_nan() {
            continue;
        }
        gains[i] = change.max(0.0);
        losses[i] = (-change).max(0.0);
    }

    let avg_gain = wilder_average(&gains, period, period);
    let avg_loss = wilder_average(&losses, period, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| {
            if g.is_nan() || l.is_nan() {
                f64::NAN
            } else if l == 0.0 {
                if g == 0.0 {
                    f64::NAN
                } else {
                    100.0
                }
            } else {
                100.0 - 100.0 / (1.0 + g / l)
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self { period }
    }
}

impl IndicatorProvider for Rsi {
    fn id(&self) -> &'static str {
        "rsi"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        vec!["rsi".into()]
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let close = frame.float(CLOSE)?;
        Ok(vec![(
            "rsi".into(),
            Column::Float(rsi_series(close, self.period)),
        )])
    }
}
