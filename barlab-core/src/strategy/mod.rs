//! Reference strategies.
//!
//! A strategy reads indicator columns and appends one `signal` column of
//! `buy`/`sell`/`hold`. If the columns it needs are absent it computes them
//! first with its own provider, so any OHLCV frame is a valid input.

mod directional_cross;
mod supertrend_flip;

pub use directional_cross::DirectionalCross;
pub use supertrend_flip::SupertrendFlip;

use crate::error::Result;
use crate::frame::Frame;
use crate::provider::IndicatorProvider;
use crate::signal::{Signal, SIGNAL};

pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Provider that owns the columns this strategy reads.
    fn provider(&self) -> Box<dyn IndicatorProvider>;

    /// One signal per row of a frame that already carries the provider's
    /// columns.
    fn signals(&self, frame: &Frame) -> Result<Vec<Signal>>;

    /// Ensure inputs, then return the frame plus a `signal` column.
    fn generate(&self, frame: &Frame) -> Result<Frame> {
        let prepared = self.provider().apply(frame)?;
        let signals = self.signals(&prepared)?;
        tracing::debug!(
            strategy = self.name(),
            buys = signals.iter().filter(|s| **s == Signal::Buy).count(),
            sells = signals.iter().filter(|s| **s == Signal::Sell).count(),
            "generated signals"
        );
        prepared.with_column(SIGNAL, signals)
    }
}

/// Names accepted by [`by_name`].
pub const STRATEGY_NAMES: &[&str] = &["supertrend_flip", "directional_cross"];

/// Look up a strategy with default parameters.
pub fn by_name(name: &str) -> Option<Box<dyn Strategy>> {
    match name {
        "supertrend_flip" => Some(Box::new(SupertrendFlip::default())),
        "directional_cross" => Some(Box::new(DirectionalCross::default())),
        _ => None,
    }
}
