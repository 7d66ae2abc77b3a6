//! Trading signal labels and the `signal` column normalizer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::{Cell, Column, Frame};

/// Name of the column every strategy writes.
pub const SIGNAL: &str = "signal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Signal {
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Buy => "buy",
            Signal::Sell => "sell",
            Signal::Hold => "hold",
        }
    }

    /// Numeric code: 1 buy, -1 sell, 0 hold.
    pub fn from_code(code: f64) -> Option<Self> {
        if code == 1.0 {
            Some(Signal::Buy)
        } else if code == -1.0 {
            Some(Signal::Sell)
        } else if code == 0.0 {
            Some(Signal::Hold)
        } else {
            None
        }
    }

    /// Interpret one cell. Anything unrecognized is `Hold`.
    pub fn from_cell(cell: &Cell) -> Self {
        let parsed = match cell {
            Cell::Int(i) => Self::from_code(*i as f64),
            Cell::Float(v) => Self::from_code(*v),
            Cell::Text(s) => s.parse().ok(),
            Cell::Bool(_) | Cell::Null => None,
        };
        parsed.unwrap_or_default()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Signal::Buy),
            "sell" => Ok(Signal::Sell),
            "hold" => Ok(Signal::Hold),
            other => Err(format!("not a signal label: {other:?}")),
        }
    }
}

impl From<Vec<Signal>> for Column {
    fn from(signals: Vec<Signal>) -> Self {
        Column::Text(signals.into_iter().map(|s| s.as_str().to_string()).collect())
    }
}

/// Return a copy of `frame` whose `signal` column only holds
/// `buy`/`sell`/`hold`.
///
/// A missing column is created as all `hold`. Numeric codes 1/-1/0 map to
/// buy/sell/hold; every other value becomes `hold`. Idempotent.
pub fn normalize_signals(frame: &Frame) -> Result<Frame> {
    let signals: Vec<Signal> = match frame.column(SIGNAL) {
        None => vec![Signal::Hold; frame.len()],
        Some(col) => (0..col.len())
            .map(|row| col.get(row).map_or(Signal::Hold, |c| Signal::from_cell(&c)))
            .collect(),
    };
    tracing::debug!(
        rows = signals.len(),
        created = !frame.contains(SIGNAL),
        "normalized signal column"
    );
    frame.clone().with_column(SIGNAL, signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_frame;

    fn labels(frame: &Frame) -> Vec<String> {
        let col = frame.column(SIGNAL).unwrap();
        (0..col.len()).map(|r| col.display(r)).collect()
    }

    #[test]
    fn mixed_codes_and_labels() {
        let frame = make_frame(&[1.0, 2.0, 3.0, 4.0, 5.0])
            .with_column(
                SIGNAL,
                vec![
                    Cell::Int(1),
                    Cell::Int(-1),
                    Cell::Int(0),
                    Cell::from("BUY"),
                    Cell::from("garbage"),
                ],
            )
            .unwrap();
        let out = normalize_signals(&frame).unwrap();
        assert_eq!(labels(&out), vec!["buy", "sell", "hold", "buy", "hold"]);
    }

    #[test]
    fn absent_column_filled_with_hold() {
        let frame = make_frame(&[1.0, 2.0, 3.0]);
        let out = normalize_signals(&frame).unwrap();
        assert_eq!(labels(&out), vec!["hold"; 3]);
        assert_eq!(out.width(), frame.width() + 1);
    }

    #[test]
    fn float_codes() {
        let frame = make_frame(&[1.0, 2.0, 3.0, 4.0])
            .with_column(SIGNAL, vec![1.0, -1.0, f64::NAN, 2.0])
            .unwrap();
        let out = normalize_signals(&frame).unwrap();
        assert_eq!(labels(&out), vec!["buy", "sell", "hold", "hold"]);
    }

    #[test]
    fn text_is_trimmed_and_lowercased() {
        let frame = make_frame(&[1.0, 2.0, 3.0])
            .with_column(
                SIGNAL,
                vec![" Sell ".to_string(), "HOLD".to_string(), "1".to_string()],
            )
            .unwrap();
        let out = normalize_signals(&frame).unwrap();
        assert_eq!(labels(&out), vec!["sell", "hold", "hold"]);
    }

    #[test]
    fn normalizing_twice_is_a_noop() {
        let frame = make_frame(&[1.0, 2.0, 3.0])
            .with_column(SIGNAL, vec![Cell::Int(1), Cell::Null, Cell::Bool(true)])
            .unwrap();
        let once = normalize_signals(&frame).unwrap();
        let twice = normalize_signals(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(labels(&once), vec!["buy", "hold", "hold"]);
    }

    #[test]
    fn other_columns_untouched() {
        let frame = make_frame(&[1.0, 2.0]);
        let out = normalize_signals(&frame).unwrap();
        assert_eq!(out.float("close").unwrap(), frame.float("close").unwrap());
    }
}
