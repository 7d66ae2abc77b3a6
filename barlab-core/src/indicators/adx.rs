//! ADX — Average Directional Index (Wilder), with +DI and -DI.
//!
//! Steps:
//! 1. Directional movement per bar: up = high[i]-high[i-1], down = low[i-1]-low[i];
//!    +DM = up if up > down and up > 0, else 0; -DM symmetric.
//! 2. Wilder running sums of TR, +DM, -DM, seeded at `period-1` with plain sums
//!    of the defined values in the first `period` bars, then
//!    s[i] = s[i-1] - s[i-1]/period + x[i].
//! 3. +DI = 100 * sum(+DM) / sum(TR); -DI symmetric.
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI).
//! 5. ADX seeded at `2*period-1` with the mean of DX over bars `period..=2*period-1`,
//!    then ADX[i] = ((period-1)*ADX[i-1] + DX[i]) / period.
//!
//! Bar 0 has no previous bar, so its TR and DM are unknown (the shared
//! [`true_range`] primitive) and it adds nothing to the first seed.
//!
//! Zero denominators give NaN. A NaN anywhere in a running state makes that
//! state unknown until a fresh window of `period` known inputs re-seeds it.

use crate::error::Result;
use crate::frame::{Column, Frame, CLOSE, HIGH, LOW};
use crate::indicators::atr::true_range;
use crate::indicators::wilder::{wilder_average, wilder_sum};
use crate::provider::IndicatorProvider;

/// Every intermediate series of the ADX computation, aligned with the bars.
#[derive(Debug, Clone, Default)]
pub struct AdxSeries {
    pub true_range: Vec<f64>,
    pub plus_dm: Vec<f64>,
    pub minus_dm: Vec<f64>,
    pub tr_sum: Vec<f64>,
    pub plus_dm_sum: Vec<f64>,
    pub minus_dm_sum: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
    pub dx: Vec<f64>,
    pub adx: Vec<f64>,
}

/// Raw per-bar movement feeding the running sums.
#[derive(Debug, Clone, Copy)]
struct DirectionalMove {
    tr: f64,
    plus_dm: f64,
    minus_dm: f64,
}

fn directional_moves(high: &[f64], low: &[f64], close: &[f64]) -> Vec<DirectionalMove> {
    let tr = true_range(high, low, close);
    (0..tr.len())
        .map(|i| {
            if i == 0 {
                return DirectionalMove {
                    tr: tr[0],
                    plus_dm: f64::NAN,
                    minus_dm: f64::NAN,
                };
            }
            let up = high[i] - high[i - 1];
            let down = low[i - 1] - low[i];
            if up.is_nan() || down.is_nan() {
                return DirectionalMove {
                    tr: tr[i],
                    plus_dm: f64::NAN,
                    minus_dm: f64::NAN,
                };
            }
            DirectionalMove {
                tr: tr[i],
                plus_dm: if up > down && up > 0.0 { up } else { 0.0 },
                minus_dm: if down > up && down > 0.0 { down } else { 0.0 },
            }
        })
        .collect()
}

/// Sum inputs with bar 0 zeroed: it has no movement to contribute.
fn seed_inputs(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    if let Some(first) = out.first_mut() {
        *first = 0.0;
    }
    out
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 || den.is_nan() || num.is_nan() {
        f64::NAN
    } else {
        100.0 * num / den
    }
}

/// Compute the full ADX family over aligned high/low/close slices.
pub fn adx_series(high: &[f64], low: &[f64], close: &[f64], period: usize) -> AdxSeries {
    let n = high.len().min(low.len()).min(close.len());
    if period == 0 || n == 0 {
        let nan = vec![f64::NAN; n];
        return AdxSeries {
            true_range: nan.clone(),
            plus_dm: nan.clone(),
            minus_dm: nan.clone(),
            tr_sum: nan.clone(),
            plus_dm_sum: nan.clone(),
            minus_dm_sum: nan.clone(),
            plus_di: nan.clone(),
            minus_di: nan.clone(),
            dx: nan.clone(),
            adx: nan,
        };
    }

    let moves = directional_moves(&high[..n], &low[..n], &close[..n]);
    let true_range: Vec<f64> = moves.iter().map(|m| m.tr).collect();
    let plus_dm: Vec<f64> = moves.iter().map(|m| m.plus_dm).collect();
    let minus_dm: Vec<f64> = moves.iter().map(|m| m.minus_dm).collect();

    let tr_sum = wilder_sum(&seed_inputs(&true_range), period, period - 1);
    let plus_dm_sum = wilder_sum(&seed_inputs(&plus_dm), period, period - 1);
    let minus_dm_sum = wilder_sum(&seed_inputs(&minus_dm), period, period - 1);

    let plus_di: Vec<f64> = (0..n).map(|i| ratio(plus_dm_sum[i], tr_sum[i])).collect();
    let minus_di: Vec<f64> = (0..n).map(|i| ratio(minus_dm_sum[i], tr_sum[i])).collect();
    let dx: Vec<f64> = (0..n)
        .map(|i| ratio((plus_di[i] - minus_di[i]).abs(), plus_di[i] + minus_di[i]))
        .collect();

    let adx = wilder_average(&dx, period, 2 * period - 1);

    AdxSeries {
        true_range,
        plus_dm,
        minus_dm,
        tr_sum,
        plus_dm_sum,
        minus_dm_sum,
        plus_di,
        minus_di,
        dx,
        adx,
    }
}

/// ADX provider: columns `adx`, `plus_di`, `minus_di`.
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl IndicatorProvider for Adx {
    fn id(&self) -> &'static str {
        "adx"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[HIGH, LOW, CLOSE]
    }

    fn output_columns(&self) -> Vec<String> {
        vec!["adx".into(), "plus_di".into(), "minus_di".into()]
    }

    fn lookback(&self) -> usize {
        2 * self.period - 1
    }

    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
        let high = frame.float(HIGH)?;
        let low = frame.float(LOW)?;
        let close = frame.float(CLOSE)?;
        let s = adx_series(high, low, close, self.period);
        Ok(vec![
            ("adx".into(), Column::Float(s.adx)),
            ("plus_di".into(), Column::Float(s.plus_di)),
            ("minus_di".into(), Column::Float(s.minus_di)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_frame, DEFAULT_EPSILON};

    fn series_of(frame: &Frame, period: usize) -> AdxSeries {
        adx_series(
            frame.float(HIGH).unwrap(),
            frame.float(LOW).unwrap(),
            frame.float(CLOSE).unwrap(),
            period,
        )
    }

    fn sample() -> Frame {
        make_ohlc_frame(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
            (99.0, 103.0, 97.0, 101.0),
            (101.0, 106.0, 100.0, 105.0),
            (105.0, 110.0, 103.0, 108.0),
            (108.0, 112.0, 106.0, 110.0),
            (110.0, 111.0, 104.0, 105.0),
            (105.0, 109.0, 103.0, 107.0),
            (107.0, 113.0, 105.0, 112.0),
        ])
    }

    #[test]
    fn directional_movement_rules() {
        let s = series_of(&sample(), 3);
        // bar 1: up = 3, down = -5 -> +DM 3
        assert_approx(s.plus_dm[1], 3.0, DEFAULT_EPSILON);
        assert_approx(s.minus_dm[1], 0.0, DEFAULT_EPSILON);
        // bar 2: up = -1, down = 2 -> -DM 2
        assert_approx(s.plus_dm[2], 0.0, DEFAULT_EPSILON);
        assert_approx(s.minus_dm[2], 2.0, DEFAULT_EPSILON);
        // bar 0 has no previous bar
        assert!(s.true_range[0].is_nan());
        assert!(s.plus_dm[0].is_nan());
        assert!(s.minus_dm[0].is_nan());
    }

    #[test]
    fn seed_is_plain_sum_of_first_period_bars() {
        let s = series_of(&sample(), 3);
        assert!(s.tr_sum[1].is_nan());
        // TR: unknown, 8, 9
        assert_approx(s.tr_sum[2], 17.0, DEFAULT_EPSILON);
        assert_approx(s.plus_dm_sum[2], 3.0, DEFAULT_EPSILON);
        assert_approx(s.minus_dm_sum[2], 2.0, DEFAULT_EPSILON);
        assert_approx(s.plus_di[2], 100.0 * 3.0 / 17.0, DEFAULT_EPSILON);
    }

    #[test]
    fn seed_matches_shared_true_range() {
        let frame = sample();
        let (high, low, close) = (
            frame.float(HIGH).unwrap(),
            frame.float(LOW).unwrap(),
            frame.float(CLOSE).unwrap(),
        );
        let shared = true_range(high, low, close);
        assert!(shared[0].is_nan());
        for period in 2..=5 {
            let s = adx_series(high, low, close, period);
            let defined: f64 = shared[1..period].iter().sum();
            assert_approx(s.tr_sum[period - 1], defined, 1e-9);
            for i in 1..shared.len() {
                assert_eq!(s.true_range[i], shared[i], "period {period} bar {i}");
            }
        }
    }

    #[test]
    fn sums_follow_wilder_recurrence() {
        let s = series_of(&sample(), 3);
        for i in 3..10 {
            let expected = s.tr_sum[i - 1] - s.tr_sum[i - 1] / 3.0 + s.true_range[i];
            assert_approx(s.tr_sum[i], expected, 1e-9);
        }
    }

    #[test]
    fn adx_seed_and_recurrence() {
        let s = series_of(&sample(), 3);
        assert!(s.adx[4].is_nan());
        let seed = (s.dx[3] + s.dx[4] + s.dx[5]) / 3.0;
        assert_approx(s.adx[5], seed, 1e-9);
        assert_approx(s.adx[6], (2.0 * s.adx[5] + s.dx[6]) / 3.0, 1e-9);
    }

    #[test]
    fn adx_bounds() {
        let s = series_of(&sample(), 3);
        for (i, &v) in s.adx.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "ADX out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn flat_series_has_unknown_dx() {
        let flat = make_ohlc_frame(&[(10.0, 10.0, 10.0, 10.0); 12]);
        let s = series_of(&flat, 3);
        // zero TR and zero movement: every ratio is indeterminate
        assert!(s.plus_di.iter().all(|v| v.is_nan()));
        assert!(s.dx.iter().all(|v| v.is_nan()));
        assert!(s.adx.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn too_few_bars() {
        let frame = make_ohlc_frame(&[(100.0, 105.0, 95.0, 102.0)]);
        let cols = Adx::new(3).compute(&frame).unwrap();
        for (_, col) in &cols {
            assert!(col.as_float().unwrap().iter().all(|v| v.is_nan()));
        }
    }

    #[test]
    fn provider_columns_and_lookback() {
        let adx = Adx::new(14);
        assert_eq!(adx.output_columns(), vec!["adx", "plus_di", "minus_di"]);
        assert_eq!(adx.lookback(), 27);
    }
}
