use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use plantcard::config::load_raw_config;
use plantcard::config::LoadError;
use plantcard::format_diagnostics;
use plantcard::normalize;
use plantcard::present::Clock;
use plantcard::present::FixedClock;
use plantcard::present::SystemClock;
use plantcard::CardConfig;
use plantcard::HassSnapshot;
use plantcard::PlantCard;
use serde_json::Value;
use tracing::level_filters::LevelFilter;

/// Inspect FYTA plant card configs and the views they produce
#[derive(Parser, Debug)]
#[command(name = "plantcard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize a card config (JSON or TOML) and print the canonical JSON
    Normalize {
        /// Config file
        file: PathBuf,
    },

    /// Render the card view for a config and a state snapshot
    Render {
        /// Config file (JSON or TOML)
        #[arg(long)]
        config: PathBuf,

        /// State snapshot (JSON with `states`, `entities` and `devices`)
        #[arg(long)]
        state: PathBuf,

        /// Date to count fertilization days from, defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Print the config a new card starts with
    Stub,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from(cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Normalize { file } => {
            let (config, diagnostics) = normalize(&load_config(&file)?)
                .with_context(|| format!("Failed to normalize '{}'", file.display()))?;
            eprint!("{}", format_diagnostics(&diagnostics));
            print_json(&config.to_value()?)?;
        }
        Commands::Render {
            config,
            state,
            today,
        } => {
            let raw = load_config(&config)?;
            let hass = HassSnapshot::from_file(&state)?;
            let today = today.unwrap_or_else(|| SystemClock.today());
            tracing::info!("Rendering '{}' for {}", config.display(), today);

            let mut card = PlantCard::with_clock(FixedClock::local(today));
            let diagnostics = card
                .set_config(&raw)
                .with_context(|| format!("Failed to bind '{}'", config.display()))?;
            eprint!("{}", format_diagnostics(&diagnostics));

            let view = card.update(&hass);
            print_json(&serde_json::to_value(&view)?)?;
        }
        Commands::Stub => {
            print_json(&CardConfig::stub().to_value()?)?;
        }
    }

    Ok(())
}

/// Load a raw config file. Parse errors are printed against the source before failing.
fn load_config(path: &Path) -> anyhow::Result<Value> {
    match load_raw_config(path) {
        Ok(raw) => Ok(raw),
        Err(e @ LoadError::Parse(_)) => {
            eprint!("{}", format_diagnostics(&[e.into_diagnostic()]));
            anyhow::bail!("Failed to load '{}'", path.display())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load '{}'", path.display())),
    }
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
