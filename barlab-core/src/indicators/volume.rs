//! Volume flow: on-balance volume, volume SMA, and relative volume.
//!
//! OBV accumulates +volume on up-closes and -volume on down-closes, starting
//! at 0. A bar with unknown close or volume is NaN and contributes nothing.
//! volume_ratio = volume / SMA(volume, 20); zero average gives NaN.

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE, VOLUME};
use crate::indicators::moving_average::rolling_mean;
use crate::provider::IndicatorProvider;

/// Window of the volume moving average.
pub const VOLUME_WINDOW: usize = 20;

pub fn on_balance_volume(close: &[f64], volume: &[f64]) -> Vec<f64> {
    let n = close.len().min(volume.len());
    let mut obv = vec![f64::NAN; n];
    let mut running = 0.0;
    for i in 0..n {
        if i == 0 {
            if !volume[0].is_nan() {
                obv[0] = 0.0;
            }
            continue;
        }
        let change = close[i] - close[i - 1];
        if change.is_nan() || volume[i].is_nan() {
            continue;
        }
        if change > 0.0 {
            running += volume[i];
        } else if change < 0.0 {
            running -= volume[i];
        }
        obv[i] = running;
    }
    obv
}

#[derive(Debug, Clone, Default)]
pub struct VolumeFlow;

impl IndicatorProvider for VolumeFlow {
    fn id(&self) -> &'static str {
        "volume"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[CLOSE, VOLUME]
    }

    fn output_columns(&self) -> Vec<String> {
        vec!["obv".into(), "volume_sma".into(), "volume_ratio".into()]
    }

    fn lookback(&self) -> usize {
        VOLUME_WINDOW - 1
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let close = frame.float(CLOSE)?;
        let volume = frame.float(VOLUME)?;
        let sma = rolling_mean(volume, VOLUME_WINDOW);
        let ratio = volume
            .iter()
            .zip(&sma)
            .map(|(&v, &avg)| if avg == 0.0 { f64::NAN } else { v / avg })
            .collect();
        Ok(vec![
            ("obv".into(), Column::Float(on_balance_volume(close, volume))),
            ("volume_sma".into(), Column::Float(sma)),
            ("volume_ratio".into(), Column::Float(ratio)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndicatorError;
    use crate::indicators::{assert_approx, make_frame, DEFAULT_EPSILON};

    #[test]
    fn obv_accumulates_signed_volume() {
        let obv = on_balance_volume(&[10.0, 11.0, 11.0, 9.0], &[100.0, 200.0, 300.0, 50.0]);
        assert_eq!(obv, vec![0.0, 200.0, 200.0, 150.0]);
    }

    #[test]
    fn volume_ratio_against_average() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let cols = VolumeFlow.compute(&make_frame(&closes)).unwrap();
        let ratio = cols[2].1.as_float().unwrap();
        assert!(ratio[18].is_nan());
        assert_approx(ratio[19], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn requires_volume_column() {
        let frame = make_frame(&[1.0, 2.0]);
        let mut stripped = Frame::new(frame.index().to_vec()).unwrap();
        stripped.insert("close", vec![1.0, 2.0]).unwrap();
        let err = VolumeFlow.compute(&stripped).unwrap_err();
        assert!(matches!(err, IndicatorError::MissingColumn(ref c) if c == "volume"));
    }
}
