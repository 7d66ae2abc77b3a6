//! Directional-index crossover gated by trend strength.
//!
//! Buy when +DI crosses above -DI while ADX >= threshold; sell on the opposite
//! cross. A row with any unknown input holds.

use crate::error::Result;
use crate::frame::Frame;
use crate::indicators::Adx;
use crate::provider::IndicatorProvider;
use crate::signal::Signal;

use super::Strategy;

#[derive(Debug, Clone)]
pub struct DirectionalCross {
    pub period: usize,
    pub threshold: f64,
}

impl DirectionalCross {
    pub fn new(period: usize, threshold: f64) -> Self {
        assert!(period >= 1, "period must be >= 1");
        assert!(threshold >= 0.0, "threshold must be >= 0");
        Self { period, threshold }
    }
}

impl Default for DirectionalCross {
    fn default() -> Self {
        Self::new(14, 25.0)
    }
}

impl Strategy for DirectionalCross {
    fn name(&self) -> &'static str {
        "directional_cross"
    }

    fn provider(&self) -> Box<dyn IndicatorProvider> {
        Box::new(Adx::new(self.period))
    }

    fn signals(&self, frame: &Frame) -> Result<Vec<Signal>> {
        let adx = frame.float("adx")?;
        let plus = frame.float("plus_di")?;
        let minus = frame.float("minus_di")?;
        Ok((0..adx.len())
            .map(|i| {
                if i == 0 || adx[i].is_nan() || adx[i] < self.threshold {
                    return Signal::Hold;
                }
                let was_above = plus[i - 1] > minus[i - 1];
                let was_below = plus[i - 1] < minus[i - 1];
                if plus[i] > minus[i] && was_below {
                    Signal::Buy
                } else if plus[i] < minus[i] && was_above {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            })
            .collect())
    }
}
