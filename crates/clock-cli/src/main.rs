//! host-clock command-line entry point.
//!
//! Exposes the two clock bindings directly (`now`, `sleep`) and can run a
//! Wasm guest with the `clock` imports linked (`run`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clock_common::config::ClockConfig;
use clock_common::time::Timestamp;
use clock_runtime::wasm_host::Val;
use clock_runtime::{ClockHost, Sleeper, WallClock};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, UNIX_EPOCH};
use tracing::{info, warn};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "host-clock",
    about = "Wall-clock and sleep bindings for managed runtimes",
    version,
    long_about = None
)]
struct Args {
    /// Path to a clock configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current wall-clock time in seconds since the epoch.
    Now {
        /// Emit a JSON object instead of a bare number.
        #[arg(long)]
        json: bool,
    },
    /// Block for the given number of seconds.
    Sleep {
        /// Duration in seconds (fractional allowed).
        #[arg(allow_negative_numbers = true)]
        seconds: f64,
    },
    /// Run a Wasm guest (.wasm or .wat) with the clock imports linked.
    Run {
        /// Path to the module.
        module: PathBuf,
        /// Exported function to call. Must take no parameters.
        #[arg(long, short = 'e', default_value = "main")]
        entry: String,
    },
    /// Print the effective configuration as TOML.
    Config,
}

/// JSON shape of `now --json`.
#[derive(Debug, Serialize)]
struct NowReport {
    seconds: f64,
    secs: i64,
    micros: u32,
    rfc3339: Option<String>,
}

impl NowReport {
    fn from_timestamp(ts: Timestamp) -> Self {
        let rfc3339 = u64::try_from(ts.secs()).ok().map(|secs| {
            let time = UNIX_EPOCH + Duration::new(secs, ts.micros() * 1_000);
            humantime::format_rfc3339_micros(time).to_string()
        });
        Self {
            seconds: ts.as_secs_f64(),
            secs: ts.secs(),
            micros: ts.micros(),
            rfc3339,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    let config = load_config(
        args.config.as_deref(),
        std::env::var(CONFIG_ENV_VAR).ok().as_deref(),
    )?;

    match args.command {
        Command::Now { json } => cmd_now(json),
        Command::Sleep { seconds } => cmd_sleep(config, seconds),
        Command::Run { module, entry } => cmd_run(config, &module, &entry),
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// Initialize logging to stderr so stdout carries only results.
fn init_logging(level: &str) {
    let filter = format!(
        "clock_cli={},clock_runtime={},clock_common={}",
        level, level, level
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Environment variable naming a config file when `--config` is absent.
const CONFIG_ENV_VAR: &str = "HOST_CLOCK_CONFIG";

/// Load configuration from file or use defaults.
///
/// Resolution priority:
/// 1. Command-line `--config` argument (`path`)
/// 2. `HOST_CLOCK_CONFIG` environment variable (`env_path`)
/// 3. Built-in defaults
fn load_config(path: Option<&Path>, env_path: Option<&str>) -> Result<ClockConfig> {
    if let Some(config_path) = path {
        info!(?config_path, "Loading config from command-line argument");
        return ClockConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path));
    }

    if let Some(env_path) = env_path {
        let config_path = PathBuf::from(env_path);
        if config_path.exists() {
            info!(?config_path, "Loading config from HOST_CLOCK_CONFIG");
            return ClockConfig::from_file(&config_path).with_context(|| {
                format!("Failed to load config from HOST_CLOCK_CONFIG={:?}", env_path)
            });
        }
        warn!(
            path = %env_path,
            "HOST_CLOCK_CONFIG set but file does not exist, using defaults"
        );
    }

    Ok(ClockConfig::default())
}

fn cmd_now(json: bool) -> Result<()> {
    let ts = WallClock.now().context("Failed to read wall clock")?;
    if json {
        let report = NowReport::from_timestamp(ts);
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{:.6}", ts.as_secs_f64());
    }
    Ok(())
}

fn cmd_sleep(config: ClockConfig, seconds: f64) -> Result<()> {
    let sleeper = Sleeper::new(config);
    let start = Instant::now();
    sleeper
        .sleep(seconds)
        .with_context(|| format!("Cannot sleep for {seconds}s"))?;
    let elapsed = start.elapsed();
    info!(elapsed = %humantime::format_duration(elapsed), "Sleep complete");
    println!("{:.6}", elapsed.as_secs_f64());
    Ok(())
}

fn cmd_run(config: ClockConfig, module: &Path, entry: &str) -> Result<()> {
    let source = std::fs::read(module)
        .with_context(|| format!("Failed to read module {:?}", module))?;

    let mut host = ClockHost::new(config)?;
    host.load_module(&source)
        .with_context(|| format!("Failed to load module {:?}", module))?;

    let results = host.call_entry(entry)?;
    for value in &results {
        println!("{}", format_val(value));
    }

    let state = host.state();
    info!(
        time_calls = state.time_calls,
        sleep_calls = state.sleep_calls,
        slept = %humantime::format_duration(state.slept),
        "Guest finished"
    );
    Ok(())
}

/// Render a guest return value for stdout.
fn format_val(value: &Val) -> String {
    if let Some(v) = value.f64() {
        format!("{v:.6}")
    } else if let Some(v) = value.f32() {
        format!("{v}")
    } else if let Some(v) = value.i64() {
        format!("{v}")
    } else if let Some(v) = value.i32() {
        format!("{v}")
    } else {
        format!("{value:?}")
    }
}
