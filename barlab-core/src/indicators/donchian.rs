//! Donchian Channel — rolling highest high and lowest low, plus their midpoint.
//!
//! Lookback: period - 1. The current bar is part of its own window.

use crate::error::Result;
use crate::frame::{Column, Frame, HIGH, LOW};
use crate::indicators::moving_average::{rolling_max, rolling_min};
use crate::provider::IndicatorProvider;

#[derive(Debug, Clone)]
pub struct Donchian {
    period: usize,
}

impl Donchian {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Donchian period must be >= 1");
        Self { period }
    }
}

impl IndicatorProvider for Donchian {
    fn id(&self) -> &'static str {
        "donchian_channels"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[HIGH, LOW]
    }

    fn output_columns(&self) -> Vec<String> {
        vec![
            "donchian_upper".into(),
            "donchian_middle".into(),
            "donchian_lower".into(),
        ]
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let upper = rolling_max(frame.float(HIGH)?, self.period);
        let lower = rolling_min(frame.float(LOW)?, self.period);
        let middle = upper.iter().zip(&lower).map(|(u, l)| (u + l) / 2.0).collect();
        Ok(vec![
            ("donchian_upper".into(), Column::Float(upper)),
            ("donchian_middle".into(), Column::Float(middle)),
            ("donchian_lower".into(), Column::Float(lower)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_frame, DEFAULT_EPSILON};

    #[test]
    fn channel_tracks_extremes() {
        let frame = make_ohlc_frame(&[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 15.0, 10.0, 14.0),
            (14.0, 14.5, 8.0, 9.0),
            (9.0, 10.0, 8.5, 9.5),
        ]);
        let cols = Donchian::new(3).compute(&frame).unwrap();
        let upper = cols[0].1.as_float().unwrap();
        let middle = cols[1].1.as_float().unwrap();
        let lower = cols[2].1.as_float().unwrap();
        assert!(upper[1].is_nan());
        assert_approx(upper[2], 15.0, DEFAULT_EPSILON);
        assert_approx(lower[2], 8.0, DEFAULT_EPSILON);
        assert_approx(middle[2], 11.5, DEFAULT_EPSILON);
        assert_approx(upper[3], 15.0, DEFAULT_EPSILON);
    }
}
