//! Wilder smoothing.
//!
//! Two forms of the same recurrence, both with smoothing constant 1/period:
//! - running sum:     s[i] = s[i-1] - s[i-1]/period + x[i], seeded by a plain sum
//! - running average: a[i] = ((period-1)*a[i-1] + x[i]) / period, seeded by a mean
//!
//! Both are loop-carried: each value is a function of the previous state and
//! the current input only, so a series is evaluated as a single ordered fold.
//! An unknown input makes the state unknown; the state is re-seeded from the
//! next window of `period` known inputs.

/// One step of the Wilder running sum.
pub fn wilder_sum_step(prev: f64, x: f64, period: usize) -> f64 {
    prev - prev / period as f64 + x
}

/// One step of the Wilder running average.
pub fn wilder_average_step(prev: f64, x: f64, period: usize) -> f64 {
    ((period as f64 - 1.0) * prev + x) / period as f64
}

/// Wilder running sum over `values`.
///
/// The first state is placed at `max(first, period - 1)`, seeded with the
/// plain sum of the trailing `period` values.
pub fn wilder_sum(values: &[f64], period: usize, first: usize) -> Vec<f64> {
    smooth(values, period, first, |w| w.iter().sum(), wilder_sum_step)
}

/// Wilder running average over `values`, seeded with a plain mean.
pub fn wilder_average(values: &[f64], period: usize, first: usize) -> Vec<f64> {
    smooth(
        values,
        period,
        first,
        |w| w.iter().sum::<f64>() / w.len() as f64,
        wilder_average_step,
    )
}

fn smooth(
    values: &[f64],
    period: usize,
    first: usize,
    seed: fn(&[f64]) -> f64,
    step: fn(f64, f64, usize) -> f64,
) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; values.len()];
    }
    let start = first.max(period - 1);

    values
        .iter()
        .enumerate()
        .scan(None::<f64>, |state, (i, &x)| {
            let next = if i < start {
                None
            } else {
                match *state {
                    Some(prev) => Some(step(prev, x, period)).filter(|v| !v.is_nan()),
                    None => {
                        let window = &values[i + 1 - period..=i];
                        if window.iter().any(|v| v.is_nan()) {
                            None
                        } else {
                            Some(seed(window))
                        }
                    }
                }
            };
            *state = next;
            Some(next.unwrap_or(f64::NAN))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn sum_seeds_with_plain_sum() {
        let s = wilder_sum(&[1.0, 2.0, 3.0, 4.0], 3, 0);
        assert!(s[0].is_nan());
        assert!(s[1].is_nan());
        assert_approx(s[2], 6.0, DEFAULT_EPSILON);
        // 6 - 6/3 + 4 = 8
        assert_approx(s[3], 8.0, DEFAULT_EPSILON);
    }

    #[test]
    fn average_seeds_with_mean() {
        let a = wilder_average(&[2.0, 4.0, 6.0, 10.0], 3, 0);
        assert_approx(a[2], 4.0, DEFAULT_EPSILON);
        // (2*4 + 10) / 3 = 6
        assert_approx(a[3], 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn first_delays_the_seed() {
        let a = wilder_average(&[1.0, 1.0, 1.0, 3.0, 5.0], 2, 3);
        assert!(a[2].is_nan());
        // seed at index 3: mean(1, 3) = 2
        assert_approx(a[3], 2.0, DEFAULT_EPSILON);
        assert_approx(a[4], 3.5, DEFAULT_EPSILON);
    }

    #[test]
    fn unknown_input_reseeds_after_clean_window() {
        let v = [1.0, 1.0, f64::NAN, 2.0, 2.0, 4.0];
        let s = wilder_sum(&v, 2, 0);
        assert_approx(s[1], 2.0, DEFAULT_EPSILON);
        assert!(s[2].is_nan());
        assert!(s[3].is_nan(), "window [NaN, 2] cannot seed");
        assert_approx(s[4], 4.0, DEFAULT_EPSILON);
        assert_approx(s[5], 4.0 - 2.0 + 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn short_input_is_all_unknown() {
        assert!(wilder_sum(&[1.0, 2.0], 3, 0).iter().all(|v| v.is_nan()));
        assert!(wilder_sum(&[1.0, 2.0], 0, 0).iter().all(|v| v.is_nan()));
    }
}
