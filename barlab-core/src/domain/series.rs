//! BarSeries — bars in strictly increasing timestamp order.
//!
//! Every recurrence in this crate assumes bar i-1 precedes bar i. The
//! constructor enforces that once so engines never have to.

use crate::domain::Bar;
use crate::error::{IndicatorError, Result};

#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Validate ordering and wrap the bars.
    ///
    /// Duplicate or decreasing timestamps are rejected with
    /// `IndicatorError::UnorderedIndex` pointing at the offending row.
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        if let Some(row) = bars
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(IndicatorError::UnorderedIndex { row: row + 1 });
        }
        Ok(Self { bars })
    }

    /// Wrap bars the caller generated in order.
    pub(crate) fn from_ordered(bars: Vec<Bar>) -> Self {
        debug_assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn bars_at(offsets: &[i64]) -> Vec<Bar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        offsets
            .iter()
            .map(|&d| Bar {
                timestamp: base + Duration::days(d),
                open: 10.0,
                high: 11.0,
                low: 9.0,
                close: 10.0,
                volume: 100.0,
            })
            .collect()
    }

    #[test]
    fn accepts_increasing_timestamps() {
        let series = BarSeries::new(bars_at(&[0, 1, 2, 5])).unwrap();
        assert_eq!(series.len(), 4);
    }

    #[test]
    fn rejects_duplicate_timestamp() {
        let err = BarSeries::new(bars_at(&[0, 1, 1, 2])).unwrap_err();
        assert!(matches!(err, IndicatorError::UnorderedIndex { row: 2 }));
    }

    #[test]
    fn rejects_out_of_order_timestamp() {
        let err = BarSeries::new(bars_at(&[0, 3, 2])).unwrap_err();
        assert!(matches!(err, IndicatorError::UnorderedIndex { row: 2 }));
    }

    #[test]
    fn empty_series_is_valid() {
        assert!(BarSeries::new(Vec::new()).unwrap().is_empty());
    }
}
