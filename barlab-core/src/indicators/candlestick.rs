//! Single- and two-bar candlestick patterns as boolean columns.
//!
//! Body is `close - open`; wicks are measured from the body edges. A bar with
//! any unknown price never matches.

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE, HIGH, LOW, OPEN};
use crate::provider::IndicatorProvider;

const DOJI_BODY_RATIO: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
struct Candle {
    body: f64,
    upper: f64,
    lower: f64,
    range: f64,
}

impl Candle {
    fn new(open: f64, high: f64, low: f64, close: f64) -> Option<Self> {
        if open.is_nan() || high.is_nan() || low.is_nan() || close.is_nan() {
            return None;
        }
        Some(Self {
            body: close - open,
            upper: high - open.max(close),
            lower: open.min(close) - low,
            range: high - low,
        })
    }

    fn is_green(&self) -> bool {
        self.body > 0.0
    }

    fn is_red(&self) -> bool {
        self.body < 0.0
    }

    fn doji(&self) -> bool {
        self.range > 0.0 && self.body.abs() <= DOJI_BODY_RATIO * self.range
    }

    fn hammer(&self) -> bool {
        self.body.abs() < self.lower * 0.5 && self.lower > self.upper * 2.0
    }

    fn shooting_star(&self) -> bool {
        self.body.abs() < self.upper * 0.5 && self.upper > self.lower * 2.0
    }
}

fn engulfing(candles: &[Option<Candle>], bullish: bool) -> Vec<bool> {
    (0..candles.len())
        .map(|i| {
            if i == 0 {
                return false;
            }
            match (candles[i - 1], candles[i]) {
                (Some(prev), Some(cur)) => {
                    let turned = if bullish {
                        cur.is_green() && prev.is_red()
                    } else {
                        cur.is_red() && prev.is_green()
                    };
                    turned && cur.body.abs() > prev.body.abs()
                }
                _ => false,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct CandlestickPatterns;

impl IndicatorProvider for CandlestickPatterns {
    fn id(&self) -> &'static str {
        "candlestick_patterns"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[OPEN, HIGH, LOW, CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        ["doji", "hammer", "shooting_star", "bullish_engulfing", "bearish_engulfing"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let open = frame.float(OPEN)?;
        let high = frame.float(HIGH)?;
        let low = frame.float(LOW)?;
        let close = frame.float(CLOSE)?;
        let candles: Vec<Option<Candle>> = (0..close.len())
            .map(|i| Candle::new(open[i], high[i], low[i], close[i]))
            .collect();
        let flag = |f: fn(&Candle) -> bool| -> Column {
            Column::Bool(candles.iter().map(|c| c.as_ref().is_some_and(f)).collect())
        };
        Ok(vec![
            ("doji".into(), flag(Candle::doji)),
            ("hammer".into(), flag(Candle::hammer)),
            ("shooting_star".into(), flag(Candle::shooting_star)),
            ("bullish_engulfing".into(), Column::Bool(engulfing(&candles, true))),
            ("bearish_engulfing".into(), Column::Bool(engulfing(&candles, false))),
        ])
    }
}
