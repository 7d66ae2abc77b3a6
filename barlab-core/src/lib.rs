//! BarLab Core — indicator engines and the composition orchestrator.
//!
//! This crate turns ordered OHLCV bars into indicator columns:
//! - Domain types (bars, validated bar series)
//! - A column table (`Frame`) with an explicit NaN "unknown" sentinel
//! - Shared primitives (true range, plain ATR, Wilder smoothing)
//! - Stateful engines (ADX family, SuperTrend) written as explicit folds
//! - A catalogue of window indicators behind one provider contract
//! - A registry-driven, column-idempotent orchestrator (`combine_indicators`)
//! - Signal normalization and reference strategies

pub mod combine;
pub mod config;
pub mod domain;
pub mod error;
pub mod frame;
pub mod indicators;
pub mod provider;
pub mod registry;
pub mod signal;
pub mod strategy;
pub mod synthetic;

pub use combine::{combine_indicators, combine_many, plan, CombinePlan};
pub use config::{ConfigError, IndicatorConfig};
pub use domain::{Bar, BarSeries};
pub use error::{IndicatorError, Result};
pub use frame::{Cell, Column, Frame};
pub use provider::IndicatorProvider;
pub use registry::IndicatorRegistry;
pub use signal::{normalize_signals, Signal};
