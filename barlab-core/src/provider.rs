//! Indicator provider contract.
//!
//! Every indicator, stateless window reduction or stateful recurrence, is a
//! pure function from a frame to a set of new named columns. Providers never
//! touch existing columns, and they never fail on numeric edge cases: zero
//! denominators and short history come back as NaN cells. The only errors a
//! provider raises are structural (a required input column is absent).

use crate::error::Result;
use crate::frame::{Column, Frame};

pub trait IndicatorProvider: Send + Sync {
    /// Registry identifier this provider belongs to (e.g. "adx").
    fn id(&self) -> &'static str;

    /// Input columns the provider reads.
    fn required_columns(&self) -> &'static [&'static str];

    /// Names of every column this provider owns.
    fn output_columns(&self) -> Vec<String>;

    /// Number of leading rows that are always NaN.
    fn lookback(&self) -> usize;

    /// Compute all owned columns for the whole frame.
    ///
    /// Each returned column has `frame.len()` rows.
    fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>>;

    /// Owned columns not yet present in `frame`.
    fn missing_columns(&self, frame: &Frame) -> Vec<String> {
        self.output_columns()
            .into_iter()
            .filter(|c| !frame.contains(c))
            .collect()
    }

    /// Return a copy of `frame` extended with the owned columns it lacks.
    ///
    /// Columns already present are left untouched. When nothing is missing
    /// the provider is not evaluated at all.
    fn apply(&self, frame: &Frame) -> Result<Frame> {
        let mut out = frame.clone();
        let missing = self.missing_columns(frame);
        if missing.is_empty() {
            return Ok(out);
        }
        for (name, column) in self.compute(frame)? {
            if missing.contains(&name) {
                out.insert(name, column)?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndicatorError;
    use crate::frame::CLOSE;
    use crate::indicators::make_series;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Doubler {
        calls: AtomicUsize,
    }

    impl IndicatorProvider for Doubler {
        fn id(&self) -> &'static str {
            "doubler"
        }

        fn required_columns(&self) -> &'static [&'static str] {
            &[CLOSE]
        }

        fn output_columns(&self) -> Vec<String> {
            vec!["double".into(), "triple".into()]
        }

        fn lookback(&self) -> usize {
            0
        }

        fn compute(&self, frame: &Frame) -> Result<Vec<(String, Column)>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let close = frame.float(CLOSE)?;
            Ok(vec![
                ("double".into(), close.iter().map(|c| c * 2.0).collect::<Vec<_>>().into()),
                ("triple".into(), close.iter().map(|c| c * 3.0).collect::<Vec<_>>().into()),
            ])
        }
    }

    fn doubler() -> Doubler {
        Doubler {
            calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn apply_adds_columns_without_touching_input() {
        let frame = Frame::from_series(&make_series(&[1.0, 2.0]));
        let before = frame.clone();
        let out = doubler().apply(&frame).unwrap();
        assert_eq!(frame, before);
        assert_eq!(out.float("double").unwrap(), &[2.0, 4.0]);
        assert_eq!(out.width(), frame.width() + 2);
    }

    #[test]
    fn apply_keeps_present_columns() {
        let frame = Frame::from_series(&make_series(&[1.0, 2.0]))
            .with_column("double", vec![-1.0, -1.0])
            .unwrap();
        let out = doubler().apply(&frame).unwrap();
        assert_eq!(out.float("double").unwrap(), &[-1.0, -1.0]);
        assert_eq!(out.float("triple").unwrap(), &[3.0, 6.0]);
    }

    #[test]
    fn apply_skips_evaluation_when_complete() {
        let p = doubler();
        let once = p.apply(&Frame::from_series(&make_series(&[1.0]))).unwrap();
        let twice = p.apply(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(p.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn apply_surfaces_missing_input() {
        let frame = Frame::new(Vec::new()).unwrap();
        let err = doubler().apply(&frame).unwrap_err();
        assert!(matches!(err, IndicatorError::MissingColumn(ref c) if c == "close"));
    }
}
