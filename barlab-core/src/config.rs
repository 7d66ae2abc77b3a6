//! Indicator configuration.
//!
//! A configuration is an ordered map from indicator identifier to a JSON
//! parameter object. Each identifier's object is parsed into a typed params
//! struct with documented defaults; unknown keys and out-of-range values are
//! rejected instead of being silently replaced.
//!
//! The legacy `moving_averages{periods, types}` shape is rewritten into the
//! canonical `{sma_periods, ema_periods}` shape here, before any provider is
//! built.

use std::fmt;

use serde::de::{self, DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Configuration-level failures, distinct from structural table errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("invalid parameters for {indicator}: {reason}")]
    InvalidParams { indicator: String, reason: String },

    #[error("failed to parse indicator configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    pub fn invalid(indicator: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParams {
            indicator: indicator.to_string(),
            reason: reason.into(),
        }
    }
}

/// Ordered identifier → parameter-object map.
///
/// Entry order has no effect on evaluation; the registry fixes that. It is
/// kept through (de)serialization so a written config reads back as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorConfig {
    entries: Vec<(String, Value)>,
}

impl IndicatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object. A `null` parameter value means "defaults".
    ///
    /// Entries take the object's key order, which `serde_json::Map` sorts;
    /// use [`from_json_str`](Self::from_json_str) to keep document order.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let Value::Object(map) = value else {
            return Err(ConfigError::Parse(format!(
                "expected an object of indicator identifiers, got {}",
                json_kind(&value)
            )));
        };
        Self::from_entries(map)
    }

    fn from_entries(
        entries: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::new();
        for (id, params) in entries {
            let params = match params {
                Value::Null => Value::Object(Map::new()),
                Value::Object(_) => params,
                other => {
                    return Err(ConfigError::invalid(
                        &id,
                        format!("expected a parameter object, got {}", json_kind(&other)),
                    ))
                }
            };
            config.insert(id, params);
        }
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let raw: RawEntries = serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_entries(raw.0)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let raw: RawEntries = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_entries(raw.0)
    }

    /// Builder: add or replace one identifier's parameters.
    pub fn with(mut self, id: impl Into<String>, params: Value) -> Self {
        self.insert(id.into(), params);
        self
    }

    pub fn insert(&mut self, id: String, params: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some(slot) => slot.1 = params,
            None => self.entries.push((id, params)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for IndicatorConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, params) in &self.entries {
            map.serialize_entry(id, params)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for IndicatorConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEntries::deserialize(deserializer)?;
        IndicatorConfig::from_entries(raw.0).map_err(de::Error::custom)
    }
}

/// Top-level identifier → params pairs in document order.
struct RawEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of indicator identifiers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, Value>()? {
                    entries.push(entry);
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ─── Typed parameters ────────────────────────────────────────────────

/// Typed parameter object for one identifier.
pub trait Params: DeserializeOwned + Default {
    /// Range checks that serde cannot express.
    fn validate(&self) -> Result<(), String>;
}

/// Parse and validate `value` as `P`, tagging failures with `indicator`.
pub fn parse_params<P: Params>(indicator: &str, value: &Value) -> Result<P, ConfigError> {
    let params = match value {
        Value::Null => P::default(),
        v => P::deserialize(v).map_err(|e| ConfigError::invalid(indicator, e.to_string()))?,
    };
    params
        .validate()
        .map_err(|reason| ConfigError::invalid(indicator, reason))?;
    Ok(params)
}

fn check_period(name: &str, value: usize) -> Result<(), String> {
    if value == 0 {
        Err(format!("{name} must be >= 1"))
    } else {
        Ok(())
    }
}

fn check_multiplier(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be finite and > 0, got {value}"))
    }
}

/// Declares a params struct whose fields are all periods.
macro_rules! period_params {
    ($(#[$meta:meta])* $name:ident { $($field:ident = $default:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct $name {
            $(pub $field: usize,)+
        }

        impl Default for $name {
            fn default() -> Self {
                Self { $($field: $default,)+ }
            }
        }

        impl Params for $name {
            fn validate(&self) -> Result<(), String> {
                $(check_period(stringify!($field), self.$field)?;)+
                Ok(())
            }
        }
    };
}

period_params!(
    /// `rsi{period}`, default 14.
    RsiParams { period = 14 }
);
period_params!(
    /// `atr{period}`, default 14.
    AtrParams { period = 14 }
);
period_params!(
    /// `adx{period}`, default 14.
    AdxParams { period = 14 }
);
period_params!(CciParams { period = 20 });
period_params!(WilliamsRParams { period = 14 });
period_params!(CmfParams { period = 20 });
period_params!(DonchianParams { period = 20 });
period_params!(
    /// `stochastic{k_period, d_period, slowing}`, defaults 14/3/3.
    StochasticParams { k_period = 14, d_period = 3, slowing = 3 }
);

/// `macd{fast_period, slow_period, signal_period}`, defaults 12/26/9.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MacdParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Params for MacdParams {
    fn validate(&self) -> Result<(), String> {
        check_period("fast_period", self.fast_period)?;
        check_period("slow_period", self.slow_period)?;
        check_period("signal_period", self.signal_period)?;
        if self.fast_period >= self.slow_period {
            return Err(format!(
                "fast_period ({}) must be below slow_period ({})",
                self.fast_period, self.slow_period
            ));
        }
        Ok(())
    }
}

/// `bollinger_bands{window, num_std}`, defaults 20 / 2.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BollingerParams {
    pub window: usize,
    pub num_std: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            window: 20,
            num_std: 2.0,
        }
    }
}

impl Params for BollingerParams {
    fn validate(&self) -> Result<(), String> {
        check_period("window", self.window)?;
        check_multiplier("num_std", self.num_std)
    }
}

/// `supertrend{atr_period, multiplier}`, defaults 10 / 3.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupertrendParams {
    pub atr_period: usize,
    pub multiplier: f64,
}

impl Default for SupertrendParams {
    fn default() -> Self {
        Self {
            atr_period: 10,
            multiplier: 3.0,
        }
    }
}

impl Params for SupertrendParams {
    fn validate(&self) -> Result<(), String> {
        check_period("atr_period", self.atr_period)?;
        check_multiplier("multiplier", self.multiplier)
    }
}

/// `keltner_channels{ema_period, atr_period, multiplier}`, defaults 20 / 10 / 2.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeltnerParams {
    pub ema_period: usize,
    pub atr_period: usize,
    pub multiplier: f64,
}

impl Default for KeltnerParams {
    fn default() -> Self {
        Self {
            ema_period: 20,
            atr_period: 10,
            multiplier: 2.0,
        }
    }
}

impl Params for KeltnerParams {
    fn validate(&self) -> Result<(), String> {
        check_period("ema_period", self.ema_period)?;
        check_period("atr_period", self.atr_period)?;
        check_multiplier("multiplier", self.multiplier)
    }
}

/// Identifiers that take no parameters (`volume`, `ad_line`,
/// `candlestick_patterns`). Any key is an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoParams {}

impl Params for NoParams {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

// ─── Moving averages ─────────────────────────────────────────────────

/// Periods used when `moving_averages` carries no periods at all.
pub const LEGACY_DEFAULT_PERIODS: [usize; 2] = [20, 50];

/// Raw `moving_averages` object, accepting both the canonical and the legacy
/// shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovingAverageParams {
    pub sma_periods: Vec<usize>,
    pub ema_periods: Vec<usize>,
    pub periods: Option<Vec<usize>>,
    pub types: Option<Vec<String>>,
}

/// Canonical moving-average request after legacy normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MovingAverages {
    pub sma_periods: Vec<usize>,
    pub ema_periods: Vec<usize>,
}

impl MovingAverageParams {
    fn is_blank(&self) -> bool {
        self.sma_periods.is_empty()
            && self.ema_periods.is_empty()
            && self.periods.is_none()
            && self.types.is_none()
    }

    /// Fold legacy `periods` × `types` into the canonical lists.
    ///
    /// `types` defaults to `["sma"]`; `periods` defaults to
    /// [`LEGACY_DEFAULT_PERIODS`] when `types` is given alone or the whole
    /// object is empty. Duplicates are dropped, first occurrence wins.
    pub fn normalize(self) -> Result<MovingAverages, String> {
        let blank = self.is_blank();
        let mut out = MovingAverages {
            sma_periods: self.sma_periods,
            ema_periods: self.ema_periods,
        };
        if blank || self.periods.is_some() || self.types.is_some() {
            let periods = self
                .periods
                .unwrap_or_else(|| LEGACY_DEFAULT_PERIODS.to_vec());
            let types = self.types.unwrap_or_else(|| vec!["sma".to_string()]);
            for kind in &types {
                let target = match kind.trim().to_ascii_lowercase().as_str() {
                    "sma" => &mut out.sma_periods,
                    "ema" => &mut out.ema_periods,
                    other => return Err(format!("unknown moving average type {other:?}")),
                };
                target.extend(periods.iter().copied());
            }
        }
        dedup_in_order(&mut out.sma_periods);
        dedup_in_order(&mut out.ema_periods);
        for &p in out.sma_periods.iter().chain(&out.ema_periods) {
            check_period("moving average period", p)?;
        }
        Ok(out)
    }
}

impl Params for MovingAverageParams {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Parse a `moving_averages` object straight into canonical form.
pub fn moving_averages(value: &Value) -> Result<MovingAverages, ConfigError> {
    parse_params::<MovingAverageParams>("moving_averages", value)?
        .normalize()
        .map_err(|reason| ConfigError::invalid("moving_averages", reason))
}

fn dedup_in_order(values: &mut Vec<usize>) {
    let mut seen = Vec::with_capacity(values.len());
    values.retain(|v| {
        if seen.contains(v) {
            false
        } else {
            seen.push(*v);
            true
        }
    });
}
