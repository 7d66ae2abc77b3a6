//! MACD — difference of a fast and a slow EMA of close, with a signal EMA.
//!
//! macd = EMA(fast) - EMA(slow); signal = EMA(macd, signal_period);
//! histogram = macd - signal.
//! Lookback: slow_period - 1 + signal_period - 1.

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE};
use crate::indicators::moving_average::ema_of_series;
use crate::provider::IndicatorProvider;

#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        assert!(fast_period >= 1 && signal_period >= 1, "MACD periods must be >= 1");
        assert!(fast_period < slow_period, "MACD fast period must be below slow period");
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }
}

impl IndicatorProvider for Macd {
    fn id(&self) -> &'static str {
        "macd"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        vec!["macd".into(), "macd_signal".into(), "macd_histogram".into()]
    }

    fn lookback(&self) -> usize {
        self.slow_period + self.signal_period - 2
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let close = frame.float(CLOSE)?;
        let fast = ema_of_series(close, self.fast_period);
        let slow = ema_of_series(close, self.slow_period);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_of_series(&macd, self.signal_period);
        let histogram: Vec<f64> = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
        Ok(vec![
            ("macd".into(), Column::Float(macd)),
            ("macd_signal".into(), Column::Float(signal)),
            ("macd_histogram".into(), Column::Float(histogram)),
        ])
    }
}
