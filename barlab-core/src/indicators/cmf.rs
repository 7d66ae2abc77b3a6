//! Chaikin Money Flow.
//!
//! CMF = sum(MFM * volume) / sum(volume) over `period` bars.
//! Zero total volume gives NaN.

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE, HIGH, LOW, VOLUME};
use crate::indicators::money_flow_multiplier;
use crate::indicators::moving_average::rolling_sum;
use crate::provider::IndicatorProvider;

#[derive(Debug, Clone)]
pub struct Cmf {
    period: usize,
}

impl Cmf {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "CMF period must be >= 1");
        Self { period }
    }
}

impl IndicatorProvider for Cmf {
    fn id(&self) -> &'static str {
        "cmf"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE, VOLUME]
    }

    fn output_columns(&self) -> Vec<String> {
        vec!["cmf".into()]
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let high = frame.float(HIGH)?;
        let low = frame.float(LOW)?;
        let close = frame.float(CLOSE)?;
        let volume = frame.float(VOLUME)?;
        let flow: Vec<f64> = (0..close.len())
            .map(|i| money_flow_multiplier(high[i], low[i], close[i]) * volume[i])
            .collect();
        let flow_sum = rolling_sum(&flow, self.period);
        let volume_sum = rolling_sum(volume, self.period);
        let cmf = flow_sum
            .iter()
            .zip(&volume_sum)
            .map(|(&f, &v)| if v == 0.0 { f64::NAN } else { f / v })
            .collect();
        Ok(vec![("cmf".into(), Column::Float(cmf))])
    }
}
