//! Accumulation/Distribution line: running sum of MFM * volume.
//!
//! Bars with unknown inputs are NaN and contribute nothing to the running total.

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE, HIGH, LOW, VOLUME};
use crate::indicators::money_flow_multiplier;
use crate::provider::IndicatorProvider;

pub fn accumulation_distribution(high: &[f64], low: &[f64], close: &[f64], volume: &[f64]) -> Vec<f64> {
    let mut running = 0.0;
    (0..close.len())
        .map(|i| {
            let flow = money_flow_multiplier(high[i], low[i], close[i]) * volume[i];
            if flow.is_nan() {
                f64::NAN
            } else {
                running += flow;
                running
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct AdLine;

impl IndicatorProvider for AdLine {
    fn id(&self) -> &'static str {
        "ad_line"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE, VOLUME]
    }

    fn output_columns(&self) -> Vec<String> {
        vec!["ad_line".into()]
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let ad = accumulation_distribution(
            frame.float(HIGH)?,
            frame.float(LOW)?,
            frame.float(CLOSE)?,
            frame.float(VOLUME)?,
        );
        Ok(vec![("ad_line".into(), Column::Float(ad))])
    }
}
