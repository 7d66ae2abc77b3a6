//! SuperTrend flip strategy: buy on a bullish direction flip, sell on a
//! bearish one.

use crate::error::Result;
use crate::frame::Frame;
use crate::indicators::Supertrend;
use crate::provider::IndicatorProvider;
use crate::signal::Signal;

use super::Strategy;

#[derive(Debug, Clone)]
pub struct SupertrendFlip {
    pub atr_period: usize,
    pub multiplier: f64,
}

impl SupertrendFlip {
    pub fn new(atr_period: usize, multiplier: f64) -> Self {
        assert!(atr_period >= 1, "atr_period must be >= 1");
        assert!(multiplier > 0.0, "multiplier must be > 0");
        Self {
            atr_period,
            multiplier,
        }
    }
}

impl Default for SupertrendFlip {
    fn default() -> Self {
        Self::new(10, 3.0)
    }
}

impl Strategy for SupertrendFlip {
    fn name(&self) -> &'static str {
        "supertrend_flip"
    }

    fn provider(&self) -> Box<dyn IndicatorProvider> {
        Box::new(Supertrend::new(self.atr_period, self.multiplier))
    }

    fn signals(&self, frame: &Frame) -> Result<Vec<Signal>> {
        let flips = frame.float("supertrend_signal")?;
        Ok(flips
            .iter()
            .map(|&s| {
                if s == 2.0 {
                    Signal::Buy
                } else if s == -2.0 {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_frame;
    use crate::signal::SIGNAL;

    #[test]
    fn maps_flip_codes() {
        let frame = make_frame(&[1.0, 2.0, 3.0, 4.0, 5.0])
            .with_column("supertrend_signal", vec![f64::NAN, 0.0, 2.0, 0.0, -2.0])
            .unwrap();
        let signals = SupertrendFlip::default().signals(&frame).unwrap();
        assert_eq!(
            signals,
            vec![Signal::Hold, Signal::Hold, Signal::Buy, Signal::Hold, Signal::Sell]
        );
    }

    #[test]
    fn generate_computes_missing_supertrend() {
        let closes: Vec<f64> = (0..40)
            .map(|i| if i < 20 { 100.0 - i as f64 } else { 60.0 + 3.0 * i as f64 })
            .collect();
        let frame = make_frame(&closes);
        let out = SupertrendFlip::new(5, 2.0).generate(&frame).unwrap();
        assert!(out.contains("supertrend"));
        assert!(out.contains(SIGNAL));
        let col = out.column(SIGNAL).unwrap();
        let buys = (0..col.len()).filter(|&r| col.display(r) == "buy").count();
        assert_eq!(buys, 1);
    }

    #[test]
    #[should_panic(expected = "multiplier must be > 0")]
    fn rejects_zero_multiplier() {
        SupertrendFlip::new(10, 0.0);
    }
}
