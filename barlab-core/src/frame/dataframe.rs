//! Bridge between `Frame` and a polars `DataFrame`.
//!
//! The index travels as a `timestamp` column of type Datetime(ns). Float
//! NaN cells stay NaN; polars nulls read back as NaN.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::{self as pl, DataType, NamedFrom, PolarsError, TimeUnit};

use super::{Column, Frame};
use crate::error::{IndicatorError, Result};

/// Name of the index column on the polars side.
pub const TIMESTAMP: &str = "timestamp";

fn map_err(e: PolarsError) -> IndicatorError {
    IndicatorError::DataFrame(e.to_string())
}

impl Frame {
    /// Convert to a polars `DataFrame`, index first.
    pub fn to_dataframe(&self) -> Result<pl::DataFrame> {
        let nanos = self
            .index
            .iter()
            .map(|t| {
                t.and_utc().timestamp_nanos_opt().ok_or_else(|| {
                    IndicatorError::DataFrame(format!("timestamp {t} out of nanosecond range"))
                })
            })
            .collect::<Result<Vec<i64>>>()?;
        let mut cols = Vec::with_capacity(self.columns.len() + 1);
        cols.push(
            pl::Column::new(TIMESTAMP.into(), nanos)
                .cast(&DataType::Datetime(TimeUnit::Nanoseconds, None))
                .map_err(map_err)?,
        );
        for (name, col) in &self.columns {
            let name: pl::PlSmallStr = name.as_str().into();
            let pcol = match col {
                Column::Float(v) => pl::Column::new(name, v.clone()),
                Column::Bool(v) => pl::Column::new(name, v.clone()),
                Column::Text(v) => pl::Column::new(name, v.clone()),
                Column::Mixed(v) => {
                    let text: Vec<String> = v.iter().map(|c| c.to_string()).collect();
                    pl::Column::new(name, text)
                }
            };
            cols.push(pcol);
        }
        pl::DataFrame::new(cols).map_err(map_err)
    }

    /// Build a frame from a polars `DataFrame` carrying a `timestamp` (or
    /// `date`) column. Numeric columns become float columns.
    pub fn from_dataframe(df: &pl::DataFrame) -> Result<Self> {
        let index_name = [TIMESTAMP, "date"]
            .into_iter()
            .find(|n| df.column(n).is_ok())
            .ok_or_else(|| IndicatorError::MissingColumn(TIMESTAMP.to_string()))?;
        let index = read_index(df.column(index_name).map_err(map_err)?)?;
        let mut frame = Frame::new(index)?;

        for col in df.get_columns() {
            let name = col.name().as_str();
            if name == index_name {
                continue;
            }
            let converted = match col.dtype() {
                DataType::Boolean => Column::Bool(
                    col.bool()
                        .map_err(map_err)?
                        .into_iter()
                        .map(|v| v.unwrap_or(false))
                        .collect(),
                ),
                DataType::String => Column::Text(
                    col.str()
                        .map_err(map_err)?
                        .into_iter()
                        .map(|v| v.unwrap_or_default().to_string())
                        .collect(),
                ),
                DataType::Float64
                | DataType::Float32
                | DataType::Int64
                | DataType::Int32
                | DataType::Int16
                | DataType::Int8
                | DataType::UInt64
                | DataType::UInt32
                | DataType::UInt16
                | DataType::UInt8 => {
                    let cast = col.cast(&DataType::Float64).map_err(map_err)?;
                    let values: Vec<f64> = cast
                        .f64()
                        .map_err(map_err)?
                        .into_iter()
                        .map(|v| v.unwrap_or(f64::NAN))
                        .collect();
                    Column::Float(values)
                }
                other => {
                    return Err(IndicatorError::DataFrame(format!(
                        "column {name}: unsupported dtype {other:?}"
                    )))
                }
            };
            frame.insert(name, converted)?;
        }
        Ok(frame)
    }
}

fn read_index(col: &pl::Column) -> Result<Vec<NaiveDateTime>> {
    let null_row = |i: usize| IndicatorError::DataFrame(format!("null timestamp at row {i}"));
    match col.dtype() {
        DataType::Date => {
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or_else(|| IndicatorError::DataFrame("epoch".into()))?;
            let days = col.cast(&DataType::Int32).map_err(map_err)?;
            days.i32()
                .map_err(map_err)?
                .into_iter()
                .enumerate()
                .map(|(i, d)| {
                    d.map(|d| epoch + chrono::Duration::days(d as i64))
                        .ok_or_else(|| null_row(i))
                })
                .collect()
        }
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let raw = col.cast(&DataType::Int64).map_err(map_err)?;
            raw.i64()
                .map_err(map_err)?
                .into_iter()
                .enumerate()
                .map(|(i, v)| v.and_then(|v| from_epoch(v, unit)).ok_or_else(|| null_row(i)))
                .collect()
        }
        DataType::Int64 => col
            .i64()
            .map_err(map_err)?
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                v.and_then(|v| from_epoch(v, TimeUnit::Milliseconds))
                    .ok_or_else(|| null_row(i))
            })
            .collect(),
        other => Err(IndicatorError::DataFrame(format!(
            "timestamp column has unsupported dtype {other:?}"
        ))),
    }
}

/// Epoch offset in `unit` to a timestamp, at the unit's full precision.
fn from_epoch(v: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let utc = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(v)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(v),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(v),
    };
    utc.map(|d| d.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_series;

    #[test]
    fn dataframe_carries_index_and_columns() {
        let frame = Frame::from_series(&make_series(&[10.0, 11.0, 12.0]))
            .with_column("flag", vec![true, false, true])
            .unwrap();
        let df = frame.to_dataframe().unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 7);
        assert!(df.column(TIMESTAMP).is_ok());
    }

    #[test]
    fn dataframe_conversion_preserves_nan_cells() {
        let frame = Frame::from_series(&make_series(&[10.0, 11.0]))
            .with_column("atr", vec![f64::NAN, 1.5])
            .unwrap();
        let back = Frame::from_dataframe(&frame.to_dataframe().unwrap()).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn sub_millisecond_timestamps_stay_distinct() {
        for (unit, step) in [(TimeUnit::Nanoseconds, 1_000_i64), (TimeUnit::Microseconds, 1)] {
            let ts = pl::Column::new(TIMESTAMP.into(), vec![step, 2 * step, 3 * step])
                .cast(&DataType::Datetime(unit, None))
                .unwrap();
            let close = pl::Column::new("close".into(), vec![1.0, 2.0, 3.0]);
            let df = pl::DataFrame::new(vec![ts, close]).unwrap();

            let frame = Frame::from_dataframe(&df).unwrap();
            let index = frame.index();
            assert_eq!(index[1] - index[0], chrono::Duration::microseconds(1), "{unit:?}");
            assert_eq!(index[2] - index[1], chrono::Duration::microseconds(1), "{unit:?}");
        }
    }

    #[test]
    fn nanosecond_index_round_trips() {
        let base = make_series(&[1.0, 2.0]);
        let frame = Frame::from_series(&base);
        let shifted: Vec<NaiveDateTime> = frame
            .index()
            .iter()
            .enumerate()
            .map(|(i, t)| *t + chrono::Duration::nanoseconds(i as i64 * 7))
            .collect();
        let frame = Frame::new(shifted).unwrap().with_column("close", vec![1.0, 2.0]).unwrap();
        let back = Frame::from_dataframe(&frame.to_dataframe().unwrap()).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn from_dataframe_requires_timestamp() {
        let df = pl::DataFrame::new(vec![pl::Column::new("close".into(), vec![1.0, 2.0])]).unwrap();
        assert!(matches!(
            Frame::from_dataframe(&df).unwrap_err(),
            IndicatorError::MissingColumn(_)
        ));
    }
}
