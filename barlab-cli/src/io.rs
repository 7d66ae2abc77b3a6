//! Reading bars and writing indicator tables.
//!
//! CSV input is one bar per row with a `timestamp` (or `date`) column plus
//! open/high/low/close/volume. Parquet files round-trip through polars.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use barlab_core::{Bar, BarSeries, Frame};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::{ParquetReader, ParquetWriter, SerReader};
use serde::Deserialize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Parquet,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Format::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Ok(Format::Parquet),
            _ => bail!(
                "cannot infer file format of {} (expected .csv or .parquet)",
                path.display()
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvBar {
    #[serde(alias = "date", alias = "datetime")]
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in [TIMESTAMP_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("unrecognized timestamp {s:?}"))?;
    date.and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid midnight for {date}"))
}

/// Read a bar CSV. A missing volume cell is read as unknown.
pub fn read_bars_csv<R: std::io::Read>(reader: R) -> Result<BarSeries> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut bars = Vec::new();
    for (line, record) in rdr.deserialize::<CsvBar>().enumerate() {
        let row = record.with_context(|| format!("bad CSV record at data row {}", line + 1))?;
        bars.push(Bar {
            timestamp: parse_timestamp(&row.timestamp)?,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume.unwrap_or(f64::NAN),
        });
    }
    let insane = bars.iter().filter(|b| !b.is_void() && !b.is_sane()).count();
    if insane > 0 {
        tracing::warn!(bars = insane, "input has bars whose high/low do not bound open/close");
    }
    Ok(BarSeries::new(bars)?)
}

/// Load an input file as a frame.
pub fn read_frame(path: &Path) -> Result<Frame> {
    let frame = match Format::from_path(path)? {
        Format::Csv => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            Frame::from_series(&read_bars_csv(file)?)
        }
        Format::Parquet => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let df = ParquetReader::new(file)
                .finish()
                .with_context(|| format!("read parquet {}", path.display()))?;
            Frame::from_dataframe(&df)?
        }
    };
    tracing::info!(path = %path.display(), rows = frame.len(), "loaded input");
    Ok(frame)
}

/// Write a frame as CSV: a `timestamp` column, then every column in order.
/// Unknown values are empty cells.
pub fn write_frame_csv<W: Write>(frame: &Frame, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["timestamp"];
    header.extend(frame.column_names());
    wtr.write_record(&header)?;

    let columns: Vec<_> = frame.columns().map(|(_, col)| col).collect();
    for (row, ts) in frame.index().iter().enumerate() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(ts.format(TIMESTAMP_FORMAT).to_string());
        record.extend(columns.iter().map(|col| col.display(row)));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_frame(frame: &Frame, path: &Path) -> Result<()> {
    match Format::from_path(path)? {
        Format::Csv => {
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            write_frame_csv(frame, file)?;
        }
        Format::Parquet => {
            let mut df = frame.to_dataframe()?;
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(&mut df)
                .with_context(|| format!("write parquet {}", path.display()))?;
        }
    }
    tracing::info!(path = %path.display(), rows = frame.len(), columns = frame.width(), "wrote output");
    Ok(())
}
