//! Indicator implementations.
//!
//! Every indicator implements `IndicatorProvider` and reads its inputs out of a
//! `Frame`. Two of them are genuine recurrences with loop-carried state:
//! - `adx`: Wilder running sums of TR/+DM/-DM, then a Wilder average of DX
//! - `supertrend`: a two-state band ratchet
//!
//! The rest are window reductions or simple cumulative sums.

pub mod ad_line;
pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod candlestick;
pub mod cci;
pub mod cmf;
pub mod donchian;
pub mod keltner;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod stochastic;
pub mod supertrend;
pub mod volume;
pub mod wilder;
pub mod williams_r;

pub use ad_line::AdLine;
pub use adx::{adx_series, Adx, AdxSeries};
pub use atr::{plain_atr, true_range, Atr};
pub use bollinger::Bollinger;
pub use candlestick::CandlestickPatterns;
pub use cci::Cci;
pub use cmf::Cmf;
pub use donchian::Donchian;
pub use keltner::Keltner;
pub use macd::Macd;
pub use moving_average::{Ema, Sma};
pub use rsi::Rsi;
pub use stochastic::Stochastic;
pub use supertrend::{supertrend_series, BandState, Supertrend, SupertrendSeries, Trend};
pub use volume::VolumeFlow;
pub use williams_r::WilliamsR;

/// Money-flow multiplier ((close-low) - (high-close)) / (high-low).
///
/// A bar with zero range carries no flow (0.0); NaN inputs give NaN.
pub(crate) fn money_flow_multiplier(high: f64, low: f64, close: f64) -> f64 {
    if high.is_nan() || low.is_nan() || close.is_nan() {
        return f64::NAN;
    }
    let range = high - low;
    if range == 0.0 {
        0.0
    } else {
        ((close - low) - (high - close)) / range
    }
}

/// Create a synthetic bar series from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> crate::domain::BarSeries {
    let data: Vec<(f64, f64, f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            (open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect();
    make_ohlc_series(&data)
}

/// Daily bars from explicit (open, high, low, close) tuples, volume 1000.
#[cfg(test)]
pub fn make_ohlc_series(data: &[(f64, f64, f64, f64)]) -> crate::domain::BarSeries {
    use crate::domain::{Bar, BarSeries};
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let bars = data
        .iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            timestamp: base + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect();
    BarSeries::new(bars).unwrap()
}

#[cfg(test)]
pub fn make_frame(closes: &[f64]) -> crate::frame::Frame {
    crate::frame::Frame::from_series(&make_series(closes))
}

#[cfg(test)]
pub fn make_ohlc_frame(data: &[(f64, f64, f64, f64)]) -> crate::frame::Frame {
    crate::frame::Frame::from_series(&make_ohlc_series(data))
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_flow_multiplier_edges() {
        assert_approx(money_flow_multiplier(10.0, 0.0, 10.0), 1.0, DEFAULT_EPSILON);
        assert_approx(money_flow_multiplier(10.0, 0.0, 0.0), -1.0, DEFAULT_EPSILON);
        assert_eq!(money_flow_multiplier(5.0, 5.0, 5.0), 0.0);
        assert!(money_flow_multiplier(f64::NAN, 0.0, 1.0).is_nan());
    }
}
