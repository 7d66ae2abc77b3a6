//! Commodity Channel Index.
//!
//! CCI = (TP - SMA(TP)) / (0.015 * mean_deviation), TP = (high+low+close)/3.
//! Mean deviation is taken around each window's own mean. Zero deviation gives NaN.

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE, HIGH, LOW};
use crate::indicators::moving_average::{rolling, rolling_mean};
use crate::provider::IndicatorProvider;

const LAMBERT: f64 = 0.015;

#[derive(Debug, Clone)]
pub struct Cci {
    period: usize,
}

impl Cci {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "CCI period must be >= 1");
        Self { period }
    }
}

impl IndicatorProvider for Cci {
    fn id(&self) -> &'static str {
        "cci"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        vec!["cci".into()]
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let high = frame.float(HIGH)?;
        let low = frame.float(LOW)?;
        let close = frame.float(CLOSE)?;
        let tp: Vec<f64> = (0..close.len())
            .map(|i| (high[i] + low[i] + close[i]) / 3.0)
            .collect();
        let sma = rolling_mean(&tp, self.period);
        let mean_dev = rolling(&tp, self.period, |w| {
            let m = w.iter().sum::<f64>() / w.len() as f64;
            w.iter().map(|x| (x - m).abs()).sum::<f64>() / w.len() as f64
        });
        let cci = (0..tp.len())
            .map(|i| {
                if mean_dev[i] == 0.0 {
                    f64::NAN
                } else {
                    (tp[i] - sma[i]) / (LAMBERT * mean_dev[i])
                }
            })
            .collect();
        Ok(vec![("cci".into(), Column::Float(cci))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_frame};

    #[test]
    fn cci_known_value() {
        // TP = 1, 2, 3: mean 2, mean deviation 2/3
        let frame = make_ohlc_frame(&[
            (1.0, 1.0, 1.0, 1.0),
            (2.0, 2.0, 2.0, 2.0),
            (3.0, 3.0, 3.0, 3.0),
        ]);
        let cols = Cci::new(3).compute(&frame).unwrap();
        let cci = cols[0].1.as_float().unwrap();
        assert_approx(cci[2], 1.0 / (0.015 * 2.0 / 3.0), 1e-9);
        assert!(cci[1].is_nan());
    }

    #[test]
    fn flat_is_unknown() {
        let frame = make_ohlc_frame(&[(5.0, 5.0, 5.0, 5.0); 4]);
        let cols = Cci::new(3).compute(&frame).unwrap();
        assert!(cols[0].1.as_float().unwrap().iter().all(|v| v.is_nan()));
    }
}
