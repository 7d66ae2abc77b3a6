//! Supertrend — ATR band ratchet with a two-state direction machine.
//!
//! Inherently sequential: each bar's bands and direction are a function of the
//! previous bar's state and the current bar only.
//!
//! Basic bands: hl2 +/- multiplier * ATR, where ATR is the plain moving average
//! of True Range over `atr_period` bars. The first state is seeded at the first
//! bar with a known ATR (index `atr_period`).
//!
//! Ratchet: the final upper band only moves down unless the previous close broke
//! above it; the final lower band only moves up unless the previous close broke
//! below it. Direction flips up when close exceeds the upper band while in a
//! downtrend, and down when close falls under the lower band in an uptrend.
//!
//! Output: the active band (lower in an uptrend, upper in a downtrend), the
//! direction (+1/-1), the flip signal (direction[i] - direction[i-1]: 0, +2, -2),
//! and both final bands.

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE, HIGH, LOW};
use crate::indicators::atr::plain_atr;
use crate::provider::IndicatorProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn sign(self) -> f64 {
        match self {
            Trend::Up => 1.0,
            Trend::Down => -1.0,
        }
    }
}

/// Basic (un-ratcheted) bands for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub lower: f64,
}

impl Bands {
    pub fn new(high: f64, low: f64, atr: f64, multiplier: f64) -> Option<Self> {
        let hl2 = (high + low) / 2.0;
        let bands = Self {
            upper: hl2 + multiplier * atr,
            lower: hl2 - multiplier * atr,
        };
        (!bands.upper.is_nan() && !bands.lower.is_nan()).then_some(bands)
    }
}

/// Carried state: final bands and current direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandState {
    pub upper: f64,
    pub lower: f64,
    pub trend: Trend,
}

impl BandState {
    /// First state: bands are the basic bands; a close at or below the upper
    /// band starts a downtrend.
    pub fn seed(basic: Bands, close: f64) -> Self {
        let trend = if close <= basic.upper {
            Trend::Down
        } else {
            Trend::Up
        };
        Self {
            upper: basic.upper,
            lower: basic.lower,
            trend,
        }
    }

    /// Advance one bar.
    pub fn step(self, basic: Bands, prev_close: f64, close: f64) -> Self {
        let upper = if basic.upper < self.upper || prev_close > self.upper {
            basic.upper
        } else {
            self.upper
        };
        let lower = if basic.lower > self.lower || prev_close < self.lower {
            basic.lower
        } else {
            self.lower
        };
        let trend = match self.trend {
            Trend::Down if close > upper => Trend::Up,
            Trend::Up if close < lower => Trend::Down,
            unchanged => unchanged,
        };
        Self {
            upper,
            lower,
            trend,
        }
    }

    /// The active band.
    pub fn value(&self) -> f64 {
        match self.trend {
            Trend::Up => self.lower,
            Trend::Down => self.upper,
        }
    }
}

/// All Supertrend outputs aligned with the bars.
#[derive(Debug, Clone, Default)]
pub struct SupertrendSeries {
    pub atr: Vec<f64>,
    pub value: Vec<f64>,
    pub direction: Vec<f64>,
    pub signal: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Run the band ratchet over aligned high/low/close slices.
///
/// A bar with unknown inputs clears the state; the next bar with known inputs
/// seeds a fresh one.
pub fn supertrend_series(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    atr_period: usize,
    multiplier: f64,
) -> SupertrendSeries {
    let n = high.len().min(low.len()).min(close.len());
    let atr = plain_atr(&high[..n], &low[..n], &close[..n], atr_period);

    let states: Vec<Option<BandState>> = (0..n)
        .scan(None::<BandState>, |state, i| {
            let next = match Bands::new(high[i], low[i], atr[i], multiplier) {
                Some(_) if close[i].is_nan() => None,
                None => None,
                Some(basic) => Some(match *state {
                    Some(prev) => prev.step(basic, close[i - 1], close[i]),
                    None => BandState::seed(basic, close[i]),
                }),
            };
            *state = next;
            Some(next)
        })
        .collect();

    let pick = |f: fn(&BandState) -> f64| -> Vec<f64> {
        states
            .iter()
            .map(|s| s.as_ref().map_or(f64::NAN, f))
            .collect()
    };
    let value = pick(BandState::value);
    let direction = pick(|s| s.trend.sign());
    let upper = pick(|s| s.upper);
    let lower = pick(|s| s.lower);

    let signal = (0..n)
        .map(|i| if i == 0 { f64::NAN } else { direction[i] - direction[i - 1] })
        .collect();

    SupertrendSeries {
        atr,
        value,
        direction,
        signal,
        upper,
        lower,
    }
}

/// Supertrend provider: columns `supertrend`, `supertrend_direction`,
/// `supertrend_signal`, `supertrend_upper`, `supertrend_lower`.
#[derive(Debug, Clone)]
pub struct Supertrend {
    atr_period: usize,
    multiplier: f64,
}

impl Supertrend {
    pub fn new(atr_period: usize, multiplier: f64) -> Self {
        assert!(atr_period >= 1, "Supertrend ATR period must be >= 1");
        assert!(multiplier > 0.0, "Supertrend multiplier must be > 0");
        Self {
            atr_period,
            multiplier,
        }
    }
}

impl IndicatorProvider for Supertrend {
    fn id(&self) -> &'static str {
        "supertrend"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        [
            "supertrend",
            "supertrend_direction",
            "supertrend_signal",
            "supertrend_upper",
            "supertrend_lower",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn lookback(&self) -> usize {
        self.atr_period
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let high = frame.float(HIGH)?;
        let low = frame.float(LOW)?;
        let close = frame.float(CLOSE)?;
        let s = supertrend_series(high, low, close, self.atr_period, self.multiplier);
        Ok(vec![
            ("supertrend".into(), Column::Float(s.value)),
            ("supertrend_direction".into(), Column::Float(s.direction)),
            ("supertrend_signal".into(), Column::Float(s.signal)),
            ("supertrend_upper".into(), Column::Float(s.upper)),
            ("supertrend_lower".into(), Column::Float(s.lower)),
        ])
    }
}
