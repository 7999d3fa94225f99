use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use padnav_engine::FeatureFlags;
use padnav_input::{ControllerPoller, KeyboardBackend, ReplayBackend};
use padnav_util::{PanelConfig, default_config_path, load_config_from_path};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

mod drive;
mod hardware;
mod panel;

use drive::{DriveOptions, drive, parse_script};
use hardware::{ServiceKind, SimulatedHardware};

/// Controller-driven handheld control panel.
#[derive(Parser, Debug)]
#[command(name = "padnav", version, about)]
struct Args {
    /// Config file; defaults to $PADNAV_CONFIG_PATH or the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Make a simulated hardware service reject every change
    #[arg(long = "fail", value_enum, global = true)]
    fail: Vec<ServiceKind>,

    /// Force a feature flag, e.g. `--feature gpu.vendor.amd=false`
    #[arg(long = "feature", value_parser = parse_feature, global = true)]
    features: Vec<(String, bool)>,

    /// Hold time before a direction starts repeating, in milliseconds
    #[arg(long, global = true)]
    repeat_delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay events (up, down, left, right, a, b) through the controller pipeline
    Script {
        /// Events, separated by spaces or commas
        #[arg(required = true)]
        events: Vec<String>,
    },
    /// Drive the panel from the keyboard: arrows, Enter = A, Esc = B, q quits
    Interactive,
    /// Print the resolved config file path and its effective contents
    Config {
        /// Write the defaults to the config path when no file exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config = load_config_from_path(&config_path)
        .with_context(|| format!("failed to read config at {}", config_path.display()))?;
    if let Some(delay) = args.repeat_delay_ms {
        config.poller.repeat_delay_ms = delay;
    }
    config.features.extend(args.features.iter().cloned());
    debug!(path = %config_path.display(), "configuration resolved");

    match args.command {
        Command::Script { ref events } => run_script(&args, &config, events).await,
        Command::Interactive => run_interactive(&args, &config).await,
        Command::Config { init } => show_config(&config_path, &config, init),
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_feature(raw: &str) -> Result<(String, bool), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=true|false, got '{raw}'"))?;
    let value = value
        .trim()
        .parse::<bool>()
        .map_err(|_| format!("feature '{name}' needs true or false"))?;
    Ok((name.trim().to_owned(), value))
}

/// Hardware-discovered flags with config and command-line overrides on top.
fn resolve_flags(hardware: &SimulatedHardware, config: &PanelConfig) -> FeatureFlags {
    let mut flags = hardware.discovered_flags();
    flags.extend(config.features.iter().map(|(name, value)| (name.clone(), *value)));
    flags
}

async fn run_script(args: &Args, config: &PanelConfig, events: &[String]) -> Result<()> {
    let script = parse_script(events)?;
    let hardware = SimulatedHardware::new(&args.fail);
    let mut root = panel::build_panel(&hardware, resolve_flags(&hardware, config)).context("failed to build panel")?;

    let (poller, inputs) = ControllerPoller::spawn(ReplayBackend::from_events(&script), config.poller.clone());
    let quit = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let quit = quit.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                quit.cancel();
            }
        }
    });
    let options = DriveOptions {
        limit: Some(script.len()),
        exit_on_unhandled_back: false,
        line_ending: "\n",
        redraw: false,
    };

    let handled = drive(&mut root, inputs, quit, &options, &mut std::io::stdout().lock()).await;
    ctrl_c.abort();
    poller.join().await;
    info!(events = script.len(), handled = ?handled.as_ref().ok(), "script finished");
    handled.map(|_| ())
}

/// Restores cooked mode however the interactive loop ends.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw terminal mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

async fn run_interactive(args: &Args, config: &PanelConfig) -> Result<()> {
    let hardware = SimulatedHardware::new(&args.fail);
    let mut root = panel::build_panel(&hardware, resolve_flags(&hardware, config)).context("failed to build panel")?;

    let quit = CancellationToken::new();
    let _raw_mode = RawModeGuard::enable()?;
    let (poller, inputs) = ControllerPoller::spawn(KeyboardBackend::new(quit.clone()), config.poller.clone());
    let options = DriveOptions {
        limit: None,
        exit_on_unhandled_back: true,
        line_ending: "\r\n",
        redraw: true,
    };

    let result = drive(&mut root, inputs, quit, &options, &mut std::io::stdout()).await;
    poller.join().await;
    result.map(|_| ())
}

fn show_config(path: &std::path::Path, config: &PanelConfig, init: bool) -> Result<()> {
    if init && !path.exists() {
        PanelConfig::default()
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote default config");
    }
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", path.display())?;
    writeln!(stdout, "{}", serde_json::to_string_pretty(config)?)?;
    Ok(())
}
