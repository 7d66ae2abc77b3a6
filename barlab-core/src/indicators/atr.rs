//! True Range and the plain-average ATR.
//!
//! TR[i] = max(high[i]-low[i], |high[i]-close[i-1]|, |low[i]-close[i-1]|).
//! TR[0] has no previous close and is unknown.
//!
//! The ATR here is a plain moving average of TR over `period` bars. SuperTrend
//! and Keltner Channels consume this form. The ADX engine smooths TR with a
//! Wilder running sum instead (see `adx`); the two are intentionally distinct.
//!
//! Lookback: period (first known value at index `period`).

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE, HIGH, LOW};
use crate::indicators::moving_average::rolling_mean;
use crate::provider::IndicatorProvider;

/// True Range series. Index 0 and any bar touching a NaN input are unknown.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let n = high.len().min(low.len()).min(close.len());
    let mut tr = vec![f64::NAN; n];
    for i in 1..n {
        let (h, l, pc) = (high[i], low[i], close[i - 1]);
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            continue;
        }
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }
    tr
}

/// Plain moving average of True Range.
pub fn plain_atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    rolling_mean(&true_range(high, low, close), period)
}

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self { period }
    }
}

impl IndicatorProvider for Atr {
    fn id(&self) -> &'static str {
        "atr"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        vec!["atr".into()]
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let high = frame.float(HIGH)?;
        let low = frame.float(LOW)?;
        let close = frame.float(CLOSE)?;
        Ok(vec![(
            "atr".into(),
            Column::Float(plain_atr(high, low, close, self.period)),
        )])
    }
}
