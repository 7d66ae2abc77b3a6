//! Indicator registry.
//!
//! Maps each configuration identifier to the input columns it reads and a
//! builder that turns its parameter object into providers. The orchestrator
//! only ever talks to indicators through this table, so presence testing and
//! evaluation order are uniform across the catalogue.

use serde_json::Value;

use crate::config::{
    self, AdxParams, AtrParams, BollingerParams, CciParams, CmfParams, ConfigError, DonchianParams,
    KeltnerParams, MacdParams, NoParams, RsiParams, StochasticParams, SupertrendParams,
    WilliamsRParams,
};
use crate::frame::{CLOSE, HIGH, LOW, OPEN, VOLUME};
use crate::indicators::{
    AdLine, Adx, Atr, Bollinger, CandlestickPatterns, Cci, Cmf, Donchian, Ema, Keltner, Macd, Rsi,
    Sma, Stochastic, Supertrend, VolumeFlow, WilliamsR,
};
use crate::provider::IndicatorProvider;

pub type Providers = Vec<Box<dyn IndicatorProvider>>;

/// Builds providers from one identifier's parameter object.
pub type ProviderFactory = Box<dyn Fn(&Value) -> Result<Providers, ConfigError> + Send + Sync>;

pub struct RegistryEntry {
    id: &'static str,
    required: &'static [&'static str],
    factory: ProviderFactory,
}

impl RegistryEntry {
    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn required_columns(&self) -> &'static [&'static str] {
        self.required
    }

    pub fn build(&self, params: &Value) -> Result<Providers, ConfigError> {
        (self.factory)(params)
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("id", &self.id)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Ordered set of indicator factories. Registration order is evaluation order.
#[derive(Debug, Default)]
pub struct IndicatorRegistry {
    entries: Vec<RegistryEntry>,
}

impl IndicatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous entry under `id` in place.
    pub fn register<F>(&mut self, id: &'static str, required: &'static [&'static str], factory: F)
    where
        F: Fn(&Value) -> Result<Providers, ConfigError> + Send + Sync + 'static,
    {
        let entry = RegistryEntry {
            id,
            required,
            factory: Box::new(factory),
        };
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Identifiers in evaluation order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Build the providers for `id`, failing on unknown identifiers.
    pub fn build(&self, id: &str, params: &Value) -> Result<Providers, ConfigError> {
        self.get(id)
            .ok_or_else(|| ConfigError::UnknownIndicator(id.to_string()))?
            .build(params)
    }

    /// Every column `id` would own under `params`.
    pub fn owned_columns(&self, id: &str, params: &Value) -> Result<Vec<String>, ConfigError> {
        Ok(self
            .build(id, params)?
            .iter()
            .flat_map(|p| p.output_columns())
            .collect())
    }

    /// The full catalogue.
    pub fn with_defaults() -> Self {
        const HLC: &[&str] = &[HIGH, LOW, CLOSE];
        const HLCV: &[&str] = &[HIGH, LOW, CLOSE, VOLUME];

        let mut registry = Self::new();

        registry.register("moving_averages", &[CLOSE], |params| {
            let ma = config::moving_averages(params)?;
            let mut out: Providers = Vec::new();
            out.extend(ma.sma_periods.into_iter().map(|p| boxed(Sma::new(p))));
            out.extend(ma.ema_periods.into_iter().map(|p| boxed(Ema::new(p))));
            Ok(out)
        });
        registry.register("rsi", &[CLOSE], |params| {
            let p: RsiParams = config::parse_params("rsi", params)?;
            Ok(vec![boxed(Rsi::new(p.period))])
        });
        registry.register("macd", &[CLOSE], |params| {
            let p: MacdParams = config::parse_params("macd", params)?;
            Ok(vec![boxed(Macd::new(p.fast_period, p.slow_period, p.signal_period))])
        });
        registry.register("stochastic", HLC, |params| {
            let p: StochasticParams = config::parse_params("stochastic", params)?;
            Ok(vec![boxed(Stochastic::new(p.k_period, p.d_period, p.slowing))])
        });
        registry.register("volume", &[CLOSE, VOLUME], |params| {
            config::parse_params::<NoParams>("volume", params)?;
            Ok(vec![boxed(VolumeFlow)])
        });
        registry.register("atr", HLC, |params| {
            let p: AtrParams = config::parse_params("atr", params)?;
            Ok(vec![boxed(Atr::new(p.period))])
        });
        registry.register("bollinger_bands", &[CLOSE], |params| {
            let p: BollingerParams = config::parse_params("bollinger_bands", params)?;
            Ok(vec![boxed(Bollinger::new(p.window, p.num_std))])
        });
        registry.register("adx", HLC, |params| {
            let p: AdxParams = config::parse_params("adx", params)?;
            Ok(vec![boxed(Adx::new(p.period))])
        });
        registry.register("supertrend", HLC, |params| {
            let p: SupertrendParams = config::parse_params("supertrend", params)?;
            Ok(vec![boxed(Supertrend::new(p.atr_period, p.multiplier))])
        });
        registry.register("cci", HLC, |params| {
            let p: CciParams = config::parse_params("cci", params)?;
            Ok(vec![boxed(Cci::new(p.period))])
        });
        registry.register("williams_r", HLC, |params| {
            let p: WilliamsRParams = config::parse_params("williams_r", params)?;
            Ok(vec![boxed(WilliamsR::new(p.period))])
        });
        registry.register("cmf", HLCV, |params| {
            let p: CmfParams = config::parse_params("cmf", params)?;
            Ok(vec![boxed(Cmf::new(p.period))])
        });
        registry.register("donchian_channels", &[HIGH, LOW], |params| {
            let p: DonchianParams = config::parse_params("donchian_channels", params)?;
            Ok(vec![boxed(Donchian::new(p.period))])
        });
        registry.register("keltner_channels", HLC, |params| {
            let p: KeltnerParams = config::parse_params("keltner_channels", params)?;
            Ok(vec![boxed(Keltner::new(p.ema_period, p.atr_period, p.multiplier))])
        });
        registry.register("ad_line", HLCV, |params| {
            config::parse_params::<NoParams>("ad_line", params)?;
            Ok(vec![boxed(AdLine)])
        });
        registry.register("candlestick_patterns", &[OPEN, HIGH, LOW, CLOSE], |params| {
            config::parse_params::<NoParams>("candlestick_patterns", params)?;
            Ok(vec![boxed(CandlestickPatterns)])
        });

        registry
    }
}

fn boxed<P: IndicatorProvider + 'static>(provider: P) -> Box<dyn IndicatorProvider> {
    Box::new(provider)
}
