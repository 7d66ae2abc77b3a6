//! Indicator composition.
//!
//! `combine_indicators` extends a copy of the input frame with every column
//! the configuration asks for. Columns that already exist are never
//! recomputed, so running the same configuration twice is a no-op, and a
//! request for several moving-average periods only computes the absent ones.
//!
//! A call either returns the fully merged frame or an error; nothing is
//! partially applied.

use rayon::prelude::*;
use serde::Serialize;

use crate::config::{ConfigError, IndicatorConfig};
use crate::error::{IndicatorError, Result};
use crate::frame::Frame;
use crate::registry::{IndicatorRegistry, Providers};

/// Compute every configured indicator with the default registry.
pub fn combine_indicators(frame: &Frame, config: &IndicatorConfig) -> Result<Frame> {
    combine_with(&IndicatorRegistry::with_defaults(), frame, config)
}

/// Compute every configured indicator with an explicit registry.
pub fn combine_with(
    registry: &IndicatorRegistry,
    frame: &Frame,
    config: &IndicatorConfig,
) -> Result<Frame> {
    let resolved = resolve(registry, config)?;
    let mut out = frame.clone();
    let mut added = 0usize;

    for (id, providers) in &resolved {
        for provider in providers {
            let missing = provider.missing_columns(&out);
            if missing.is_empty() {
                tracing::debug!(indicator = *id, "all columns present, skipping");
                continue;
            }
            if let Some(col) = provider
                .required_columns()
                .iter()
                .find(|c| !out.contains(c))
            {
                return Err(IndicatorError::MissingColumn(col.to_string()));
            }
            tracing::debug!(indicator = *id, columns = ?missing, "computing");
            for (name, column) in provider.compute(&out)? {
                if missing.contains(&name) {
                    out.insert(name, column)?;
                    added += 1;
                }
            }
        }
    }

    tracing::info!(
        rows = out.len(),
        requested = config.len(),
        added,
        "combined indicators"
    );
    Ok(out)
}

/// Run `combine_indicators` over independent frames in parallel.
///
/// Results come back in input order. The first failure wins.
pub fn combine_many(frames: &[Frame], config: &IndicatorConfig) -> Result<Vec<Frame>> {
    let registry = IndicatorRegistry::with_defaults();
    frames
        .par_iter()
        .map(|frame| combine_with(&registry, frame, config))
        .collect()
}

/// What a combine call would do for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedIndicator {
    pub id: &'static str,
    pub compute: Vec<String>,
    pub present: Vec<String>,
}

/// Dry-run report: which columns would be computed and which are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CombinePlan {
    pub steps: Vec<PlannedIndicator>,
}

impl CombinePlan {
    pub fn columns_to_compute(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .flat_map(|s| s.compute.iter().map(String::as_str))
    }

    pub fn columns_present(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .flat_map(|s| s.present.iter().map(String::as_str))
    }

    /// True when every requested column already exists.
    pub fn is_noop(&self) -> bool {
        self.columns_to_compute().next().is_none()
    }
}

/// Plan a combine call without computing anything.
///
/// Configuration errors surface exactly as `combine_indicators` would raise
/// them.
pub fn plan(frame: &Frame, config: &IndicatorConfig) -> Result<CombinePlan> {
    let registry = IndicatorRegistry::with_defaults();
    let resolved = resolve(&registry, config)?;
    let steps = resolved
        .iter()
        .map(|(id, providers)| {
            let (present, compute): (Vec<String>, Vec<String>) = providers
                .iter()
                .flat_map(|p| p.output_columns())
                .partition(|c| frame.contains(c));
            PlannedIndicator {
                id: *id,
                compute,
                present,
            }
        })
        .collect();
    Ok(CombinePlan { steps })
}

/// Validate the configuration and build providers in registry order.
fn resolve(
    registry: &IndicatorRegistry,
    config: &IndicatorConfig,
) -> std::result::Result<Vec<(&'static str, Providers)>, ConfigError> {
    if let Some(unknown) = config.ids().find(|id| !registry.contains(id)) {
        return Err(ConfigError::UnknownIndicator(unknown.to_string()));
    }
    registry
        .entries()
        .iter()
        .filter_map(|entry| {
            config
                .get(entry.id())
                .map(|params| entry.build(params).map(|p| (entry.id(), p)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Column;
    use crate::indicators::make_frame;
    use serde_json::json;

    fn closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect()
    }

    #[test]
    fn empty_config_returns_input() {
        let frame = make_frame(&closes(10));
        let out = combine_indicators(&frame, &IndicatorConfig::new()).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn columns_follow_registry_order() {
        let frame = make_frame(&closes(40));
        let config = IndicatorConfig::new()
            .with("adx", json!({}))
            .with("rsi", json!({}));
        let out = combine_indicators(&frame, &config).unwrap();
        let names: Vec<&str> = out.column_names().skip(5).collect();
        assert_eq!(names, vec!["rsi", "adx", "plus_di", "minus_di"]);
    }

    #[test]
    fn existing_columns_are_not_recomputed() {
        let frame = make_frame(&closes(30))
            .with_column("sma_5", vec![7.0; 30])
            .unwrap();
        let config = IndicatorConfig::new().with("moving_averages", json!({"sma_periods": [5, 10]}));
        let out = combine_indicators(&frame, &config).unwrap();
        assert_eq!(out.float("sma_5").unwrap(), &[7.0; 30][..]);
        assert!(out.contains("sma_10"));
    }

    #[test]
    fn unknown_identifier_fails_before_computing() {
        let frame = make_frame(&closes(10));
        let config = IndicatorConfig::new()
            .with("rsi", json!({}))
            .with("ichimoku", json!({}));
        let err = combine_indicators(&frame, &config).unwrap_err();
        assert!(matches!(
            err,
            IndicatorError::Config(ConfigError::UnknownIndicator(ref id)) if id == "ichimoku"
        ));
    }

    #[test]
    fn missing_input_column_is_fatal() {
        let frame = make_frame(&closes(10));
        let index = frame.index().to_vec();
        let close_only = Frame::new(index)
            .unwrap()
            .with_column("close", frame.float("close").unwrap().to_vec())
            .unwrap();
        let config = IndicatorConfig::new().with("atr", json!({}));
        let err = combine_indicators(&close_only, &config).unwrap_err();
        assert!(matches!(err, IndicatorError::MissingColumn(ref c) if c == "high"));
    }

    #[test]
    fn plan_splits_present_and_missing() {
        let frame = make_frame(&closes(10))
            .with_column("sma_20", Column::Float(vec![0.0; 10]))
            .unwrap();
        let config = IndicatorConfig::new().with("moving_averages", json!({"periods": [20, 50]}));
        let plan = plan(&frame, &config).unwrap();
        assert_eq!(plan.columns_to_compute().collect::<Vec<_>>(), vec!["sma_50"]);
        assert_eq!(plan.columns_present().collect::<Vec<_>>(), vec!["sma_20"]);
        assert!(!plan.is_noop());
    }

    #[test]
    fn combine_many_keeps_order() {
        let frames = vec![make_frame(&closes(20)), make_frame(&closes(25))];
        let config = IndicatorConfig::new().with("atr", json!({"period": 3}));
        let out = combine_many(&frames, &config).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].len(), 20);
        assert_eq!(out[1].len(), 25);
        assert!(out.iter().all(|f| f.contains("atr")));
    }
}
