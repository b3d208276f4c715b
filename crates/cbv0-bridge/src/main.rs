//! CBv0 bridge: entry point.
//!
//! Receives CBv0 frames from touch clients over UDP and writes keyboard,
//! mouse, and gamepad reports to the Linux USB gadget HID endpoints.
//!
//! # Usage
//!
//! ```text
//! cbv0-bridge [OPTIONS]
//!
//! Options:
//!   -c, --config <PATH>    TOML configuration file [default: /etc/cbv0/bridge.toml]
//!       --port <PORT>      UDP listen port (overrides the file)
//!       --bind <ADDR>      IP address to bind (overrides the file)
//!       --tick-hz <HZ>     Mouse / gamepad report rate (overrides the file)
//!       --dry-run          Log reports instead of writing /dev/hidgN
//!       --write-config <PATH>
//!                          Write the effective configuration to PATH and exit
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable        | Flag         |
//! |-----------------|--------------|
//! | `CBV0_CONFIG`   | `--config`   |
//! | `CBV0_PORT`     | `--port`     |
//! | `CBV0_BIND`     | `--bind`     |
//! | `CBV0_TICK_HZ`  | `--tick-hz`  |
//! | `CBV0_DRY_RUN`  | `--dry-run`  |
//!
//! CLI values take precedence over the configuration file.  `RUST_LOG`
//! takes precedence over `[logging] level`.
//!
//! # Exit status
//!
//! A hard-reset command ends the process with status 75 so that the service
//! supervisor (systemd `Restart=on-failure`) starts a fresh bridge.

use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cbv0_bridge::application::{Dispatcher, ReportSynthesizer};
use cbv0_bridge::infrastructure::hid_output::build_sink;
use cbv0_bridge::infrastructure::network::{bind, run_receive_loop, StopReason};
use cbv0_bridge::infrastructure::storage::config::{
    load_config, save_config, AppConfig, OutputKind,
};

/// Exit status that asks the supervisor for a restart.
const RESTART_EXIT_CODE: i32 = 75;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Touch-to-USB-HID bridge for CBv0 clients.
#[derive(Debug, Parser)]
#[command(
    name = "cbv0-bridge",
    about = "Turns CBv0 UDP frames into USB HID keyboard, mouse and gamepad reports",
    version
)]
struct Cli {
    /// Path of the TOML configuration file.  A missing file means defaults.
    #[arg(short, long, default_value = "/etc/cbv0/bridge.toml", env = "CBV0_CONFIG")]
    config: PathBuf,

    /// UDP port to listen on.
    #[arg(long, env = "CBV0_PORT")]
    port: Option<u16>,

    /// IP address to bind the UDP socket to.
    #[arg(long, env = "CBV0_BIND")]
    bind: Option<String>,

    /// Mouse / gamepad report rate in Hz.
    #[arg(long, env = "CBV0_TICK_HZ")]
    tick_hz: Option<u32>,

    /// Log reports instead of writing them to the gadget endpoints.
    #[arg(long, env = "CBV0_DRY_RUN")]
    dry_run: bool,

    /// Write the effective configuration (file plus overrides) to PATH and
    /// exit.  Useful for generating a starting `bridge.toml`.
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

impl Cli {
    /// Loads the configuration file and applies the CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn into_app_config(self) -> anyhow::Result<AppConfig> {
        let mut config = load_config(&self.config)
            .with_context(|| format!("failed to load config from {}", self.config.display()))?;

        if let Some(port) = self.port {
            config.network.port = port;
        }
        if let Some(bind) = self.bind {
            config.network.bind_address = bind;
        }
        if let Some(tick_hz) = self.tick_hz {
            config.pacing.tick_hz = tick_hz;
        }
        if self.dry_run {
            config.output.kind = OutputKind::Log;
        }
        Ok(config)
    }
}

/// Saves `config` to `path` for `--write-config`.
fn write_effective_config(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    save_config(path, config)
        .with_context(|| format!("failed to write config to {}", path.display()))?;
    info!("configuration written to {}", path.display());
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// The bridge is a single receive loop, so it runs on Tokio's
/// current-thread runtime.
///
/// # What happens at startup
///
/// 1. CLI arguments are parsed and merged over the configuration file.
/// 2. `tracing_subscriber` is initialised from `RUST_LOG`, falling back to
///    the configured level.
/// 3. The HID sink is opened and the UDP socket bound.
/// 4. A Ctrl+C handler clears the shared `running` flag.
/// 5. [`run_receive_loop`] runs until Ctrl+C or a hard reset.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    let write_config = cli.write_config.take();
    let config = cli.into_app_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    if let Some(path) = write_config {
        return write_effective_config(&path, &config);
    }

    let bind_addr = config.bind_addr().context("invalid [network] settings")?;
    let synth_config = config.synthesizer_config();
    info!(
        "CBv0 bridge starting: udp={bind_addr}, tick={:?}, output={:?}",
        synth_config.tick_interval, config.output.kind
    );

    let sink = build_sink(&config.output).context("failed to open HID output")?;
    let mut dispatcher = Dispatcher::new(ReportSynthesizer::new(synth_config, sink));
    let socket = bind(bind_addr).await?;

    // ── Graceful shutdown flag ────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => tracing::error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    // ── Receive loop ──────────────────────────────────────────────────────────
    match run_receive_loop(&socket, &mut dispatcher, config.stats_interval(), running).await {
        StopReason::Shutdown => {
            info!("CBv0 bridge stopped");
            Ok(())
        }
        StopReason::RestartRequested => {
            info!("CBv0 bridge exiting for restart");
            std::process::exit(RESTART_EXIT_CODE);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
