//! Frame — the indicator table.
//!
//! A timestamp index plus an ordered list of named columns of the same
//! length. Providers read OHLCV columns out of a frame and hand back new
//! columns; the orchestrator extends a clone, so a caller's frame is never
//! modified behind its back.

mod column;
mod dataframe;

pub use column::{Cell, Column};

use chrono::NaiveDateTime;

use crate::domain::BarSeries;
use crate::error::{IndicatorError, Result};

/// Canonical OHLCV column names.
pub const OPEN: &str = "open";
pub const HIGH: &str = "high";
pub const LOW: &str = "low";
pub const CLOSE: &str = "close";
pub const VOLUME: &str = "volume";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    index: Vec<NaiveDateTime>,
    columns: Vec<(String, Column)>,
}

impl Frame {
    /// Create an empty-column frame over `index`.
    ///
    /// The index must be strictly increasing.
    pub fn new(index: Vec<NaiveDateTime>) -> Result<Self> {
        if let Some(row) = index.windows(2).position(|w| w[1] <= w[0]) {
            return Err(IndicatorError::UnorderedIndex { row: row + 1 });
        }
        Ok(Self {
            index,
            columns: Vec::new(),
        })
    }

    /// Lay a validated bar series out as open/high/low/close/volume columns.
    pub fn from_series(series: &BarSeries) -> Self {
        let bars = series.bars();
        let pick = |f: fn(&crate::domain::Bar) -> f64| -> Column {
            Column::Float(bars.iter().map(f).collect())
        };
        Self {
            index: bars.iter().map(|b| b.timestamp).collect(),
            columns: vec![
                (OPEN.to_string(), pick(|b| b.open)),
                (HIGH.to_string(), pick(|b| b.high)),
                (LOW.to_string(), pick(|b| b.low)),
                (CLOSE.to_string(), pick(|b| b.close)),
                (VOLUME.to_string(), pick(|b| b.volume)),
            ],
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Number of columns (the index is not counted).
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), col))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, col)| col)
    }

    /// Borrow a float column, failing with `MissingColumn` if it is absent.
    pub fn float(&self, name: &str) -> Result<&[f64]> {
        let col = self
            .column(name)
            .ok_or_else(|| IndicatorError::MissingColumn(name.to_string()))?;
        col.as_float().ok_or_else(|| IndicatorError::ColumnType {
            column: name.to_string(),
            expected: "float",
            actual: col.type_name(),
        })
    }

    /// Add a column, replacing any column of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<()> {
        let name = name.into();
        let column = column.into();
        if column.len() != self.len() {
            return Err(IndicatorError::LengthMismatch {
                column: name,
                expected: self.len(),
                actual: column.len(),
            });
        }
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = column,
            None => self.columns.push((name, column)),
        }
        Ok(())
    }

    /// Builder form of `insert`.
    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<Self> {
        self.insert(name, column)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_series;

    #[test]
    fn from_series_lays_out_ohlcv() {
        let frame = Frame::from_series(&make_series(&[10.0, 11.0, 12.0]));
        assert_eq!(frame.len(), 3);
        let names: Vec<&str> = frame.column_names().collect();
        assert_eq!(names, vec!["open", "high", "low", "close", "volume"]);
        assert_eq!(frame.float(CLOSE).unwrap(), &[10.0, 11.0, 12.0]);
    }

    #[test]
    fn float_reports_missing_column() {
        let frame = Frame::from_series(&make_series(&[10.0]));
        let err = frame.float("vwap").unwrap_err();
        assert!(matches!(err, IndicatorError::MissingColumn(ref c) if c == "vwap"));
    }

    #[test]
    fn float_reports_wrong_type() {
        let frame = Frame::from_series(&make_series(&[10.0]))
            .with_column("label", vec!["x".to_string()])
            .unwrap();
        assert!(matches!(
            frame.float("label").unwrap_err(),
            IndicatorError::ColumnType { .. }
        ));
    }

    #[test]
    fn insert_rejects_wrong_length() {
        let mut frame = Frame::from_series(&make_series(&[10.0, 11.0]));
        let err = frame.insert("x", vec![1.0]).unwrap_err();
        assert!(matches!(err, IndicatorError::LengthMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut frame = Frame::from_series(&make_series(&[10.0, 11.0]));
        frame.insert("x", vec![1.0, 2.0]).unwrap();
        frame.insert("x", vec![3.0, 4.0]).unwrap();
        assert_eq!(frame.width(), 6);
        assert_eq!(frame.float("x").unwrap(), &[3.0, 4.0]);
    }

    #[test]
    fn new_rejects_unordered_index() {
        let t = make_series(&[1.0, 2.0]).bars()[1].timestamp;
        let err = Frame::new(vec![t, t]).unwrap_err();
        assert!(matches!(err, IndicatorError::UnorderedIndex { row: 1 }));
    }
}
