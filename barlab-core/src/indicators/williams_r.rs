//! Williams %R.
//!
//! %R = -100 * (highest_high - close) / (highest_high - lowest_low), in [-100, 0].

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE, HIGH, LOW};
use crate::indicators::moving_average::{rolling_max, rolling_min};
use crate::provider::IndicatorProvider;

#[derive(Debug, Clone)]
pub struct WilliamsR {
    period: usize,
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Williams %R period must be >= 1");
        Self { period }
    }
}

impl IndicatorProvider for WilliamsR {
    fn id(&self) -> &'static str {
        "williams_r"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        vec!["williams_r".into()]
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let high = frame.float(HIGH)?;
        let low = frame.float(LOW)?;
        let close = frame.float(CLOSE)?;
        let hh = rolling_max(high, self.period);
        let ll = rolling_min(low, self.period);
        let wr = (0..close.len())
            .map(|i| {
                let range = hh[i] - ll[i];
                if range == 0.0 {
                    f64::NAN
                } else {
                    -100.0 * (hh[i] - close[i]) / range
                }
            })
            .collect();
        Ok(vec![("williams_r".into(), Column::Float(wr))])
    }
}
