//! Keltner Channel — EMA of close +/- multiplier * ATR.
//!
//! The ATR is the plain moving average of True Range, the same form SuperTrend
//! uses.
//!
//! Lookback: max(ema_period - 1, atr_period).

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE, HIGH, LOW};
use crate::indicators::atr::plain_atr;
use crate::indicators::moving_average::ema_of_series;
use crate::provider::IndicatorProvider;

#[derive(Debug, Clone)]
pub struct Keltner {
    ema_period: usize,
    atr_period: usize,
    multiplier: f64,
}

impl Keltner {
    pub fn new(ema_period: usize, atr_period: usize, multiplier: f64) -> Self {
        assert!(ema_period >= 1 && atr_period >= 1, "Keltner periods must be >= 1");
        Self {
            ema_period,
            atr_period,
            multiplier,
        }
    }
}

impl IndicatorProvider for Keltner {
    fn id(&self) -> &'static str {
        "keltner_channels"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        vec![
            "keltner_upper".into(),
            "keltner_middle".into(),
            "keltner_lower".into(),
        ]
    }

    fn lookback(&self) -> usize {
        (self.ema_period - 1).max(self.atr_period)
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let high = frame.float(HIGH)?;
        let low = frame.float(LOW)?;
        let close = frame.float(CLOSE)?;
        let middle = ema_of_series(close, self.ema_period);
        let atr = plain_atr(high, low, close, self.atr_period);
        let upper = middle
            .iter()
            .zip(&atr)
            .map(|(m, a)| m + self.multiplier * a)
            .collect();
        let lower = middle
            .iter()
            .zip(&atr)
            .map(|(m, a)| m - self.multiplier * a)
            .collect();
        Ok(vec![
            ("keltner_upper".into(), Column::Float(upper)),
            ("keltner_middle".into(), Column::Float(middle)),
            ("keltner_lower".into(), Column::Float(lower)),
        ])
    }
}
