//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! Uses population stddev (divide by N).
//! Lookback: window - 1.

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE};
use crate::indicators::moving_average::{rolling_mean, rolling_std};
use crate::provider::IndicatorProvider;

#[derive(Debug, Clone)]
pub struct Bollinger {
    window: usize,
    num_std: f64,
}

impl Bollinger {
    pub fn new(window: usize, num_std: f64) -> Self {
        assert!(window >= 1, "Bollinger window must be >= 1");
        Self { window, num_std }
    }
}

impl IndicatorProvider for Bollinger {
    fn id(&self) -> &'static str {
        "bollinger_bands"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        vec!["bb_upper".into(), "bb_middle".into(), "bb_lower".into()]
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let close = frame.float(CLOSE)?;
        let middle = rolling_mean(close, self.window);
        let std = rolling_std(close, self.window);
        let upper = middle.iter().zip(&std).map(|(m, s)| m + self.num_std * s).collect();
        let lower = middle.iter().zip(&std).map(|(m, s)| m - self.num_std * s).collect();
        Ok(vec![
            ("bb_upper".into(), Column::Float(upper)),
            ("bb_middle".into(), Column::Float(middle)),
            ("bb_lower".into(), Column::Float(lower)),
        ])
    }
}
