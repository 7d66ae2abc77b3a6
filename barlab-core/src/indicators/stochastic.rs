//! Stochastic oscillator.
//!
//! raw %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over k_period;
//! %K = SMA(raw %K, slowing); %D = SMA(%K, d_period).
//! A zero high-low range gives NaN.

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE, HIGH, LOW};
use crate::indicators::moving_average::{rolling_max, rolling_mean, rolling_min};
use crate::provider::IndicatorProvider;

#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    slowing: usize,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize, slowing: usize) -> Self {
        assert!(
            k_period >= 1 && d_period >= 1 && slowing >= 1,
            "stochastic periods must be >= 1"
        );
        Self {
            k_period,
            d_period,
            slowing,
        }
    }
}

impl IndicatorProvider for Stochastic {
    fn id(&self) -> &'static str {
        "stochastic"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        vec!["stoch_k".into(), "stoch_d".into()]
    }

    fn lookback(&self) -> usize {
        self.k_period + self.slowing + self.d_period - 3
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let high = frame.float(HIGH)?;
        let low = frame.float(LOW)?;
        let close = frame.float(CLOSE)?;
        let hh = rolling_max(high, self.k_period);
        let ll = rolling_min(low, self.k_period);
        let raw: Vec<f64> = (0..close.len())
            .map(|i| {
                let range = hh[i] - ll[i];
                if range == 0.0 || range.is_nan() {
                    f64::NAN
                } else {
                    100.0 * (close[i] - ll[i]) / range
                }
            })
            .collect();
        let k = rolling_mean(&raw, self.slowing);
        let d = rolling_mean(&k, self.d_period);
        Ok(vec![
            ("stoch_k".into(), Column::Float(k)),
            ("stoch_d".into(), Column::Float(d)),
        ])
    }
}
