//! BarLab CLI — compute indicator tables from bar files.
//!
//! Commands:
//! - `compute` — load bars (CSV/Parquet or synthetic), combine the configured
//!   indicators, optionally run a strategy, write CSV/Parquet
//! - `list` — print every indicator identifier with its columns and the
//!   available strategies

mod io;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use barlab_core::registry::IndicatorRegistry;
use barlab_core::strategy::{self, STRATEGY_NAMES};
use barlab_core::synthetic::random_walk;
use barlab_core::{combine_indicators, normalize_signals, plan, Frame, IndicatorConfig};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "barlab", about = "BarLab CLI — technical indicators over OHLCV bars")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute indicator columns for one bar series.
    Compute {
        /// Input bars (.csv or .parquet).
        #[arg(long, conflicts_with = "synthetic")]
        input: Option<PathBuf>,

        /// Generate this many random-walk bars instead of reading a file.
        #[arg(long)]
        synthetic: Option<usize>,

        /// Seed for --synthetic.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Indicator configuration (.toml or .json).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Extra identifiers to compute with default parameters (comma separated).
        #[arg(long, value_delimiter = ',')]
        indicators: Vec<String>,

        /// Strategy that appends a signal column: supertrend_flip, directional_cross.
        #[arg(long)]
        strategy: Option<String>,

        /// Print what would be computed and exit.
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Output file (.csv or .parquet). Defaults to CSV on stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List indicator identifiers, their default columns, and strategies.
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compute {
            input,
            synthetic,
            seed,
            config,
            indicators,
            strategy,
            dry_run,
            output,
        } => run_compute(ComputeArgs {
            input,
            synthetic,
            seed,
            config,
            indicators,
            strategy,
            dry_run,
            output,
        }),
        Commands::List => run_list(),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

struct ComputeArgs {
    input: Option<PathBuf>,
    synthetic: Option<usize>,
    seed: u64,
    config: Option<PathBuf>,
    indicators: Vec<String>,
    strategy: Option<String>,
    dry_run: bool,
    output: Option<PathBuf>,
}

fn run_compute(args: ComputeArgs) -> Result<()> {
    let frame = match (&args.input, args.synthetic) {
        (Some(path), None) => io::read_frame(path)?,
        (None, Some(n)) => Frame::from_series(&random_walk(n, args.seed)),
        (None, None) => bail!("one of --input or --synthetic is required"),
        (Some(_), Some(_)) => bail!("--input and --synthetic are mutually exclusive"),
    };

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => IndicatorConfig::new(),
    };
    for id in &args.indicators {
        if !config.contains(id) {
            config.insert(id.clone(), json!({}));
        }
    }

    let strategy = args
        .strategy
        .as_deref()
        .map(|name| {
            strategy::by_name(name).with_context(|| {
                format!("unknown strategy '{name}'. Valid: {}", STRATEGY_NAMES.join(", "))
            })
        })
        .transpose()?;

    if args.dry_run {
        let plan = plan(&frame, &config)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let mut table = combine_indicators(&frame, &config)?;
    if let Some(strategy) = strategy {
        table = strategy
            .generate(&table)
            .with_context(|| format!("strategy {}", strategy.name()))?;
        table = normalize_signals(&table)?;
    }

    match &args.output {
        Some(path) => io::write_frame(&table, path)?,
        None => io::write_frame_csv(&table, std::io::stdout().lock())?,
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<IndicatorConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => IndicatorConfig::from_json_str(&text)?,
        Some("toml") => IndicatorConfig::from_toml_str(&text)?,
        _ => bail!("config must be .toml or .json: {}", path.display()),
    };
    tracing::info!(path = %path.display(), indicators = config.len(), "loaded config");
    Ok(config)
}

fn run_list() -> Result<()> {
    let registry = IndicatorRegistry::with_defaults();
    println!("Indicators (default parameters):");
    for entry in registry.entries() {
        let columns = registry.owned_columns(entry.id(), &json!({}))?;
        println!(
            "  {:<22} reads [{}] -> {}",
            entry.id(),
            entry.required_columns().join(", "),
            columns.join(", ")
        );
    }
    println!("\nStrategies:");
    for name in STRATEGY_NAMES {
        println!("  {name}");
    }
    Ok(())
}
