//! TOML configuration file for the bridge.
//!
//! Every field has a serde default, so a missing file, an empty file, or a
//! file written for an older version all load.  A complete file looks like:
//!
//! ```toml
//! [network]
//! bind_address = "0.0.0.0"
//! port = 9001
//!
//! [pacing]
//! tick_hz = 125
//! stats_interval_secs = 30
//!
//! [timing]
//! press_ms = 40
//! pulse_ms = 150
//! max_wait_ms = 2000
//!
//! [gamepad]
//! deadzone = 3
//! smoothing = 0.78
//! trigger_threshold = 128
//!
//! [output]
//! kind = "gadget"          # or "log" for a dry run
//! keyboard_device = "/dev/hidg0"
//! mouse_device = "/dev/hidg1"
//! gamepad_device = "/dev/hidg2"
//!
//! [logging]
//! level = "info"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::config::SynthesizerConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `bind_address` and `port` do not form a socket address.
    #[error("invalid bind address {0:?}")]
    BadBindAddress(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level bridge configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub gamepad: GamepadConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// UDP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// IP address to bind to.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// UDP port clients send frames to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Output tick and housekeeping intervals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PacingConfig {
    /// Mouse / gamepad report rate.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// How often dispatch counters are logged.  0 disables the log line.
    #[serde(default = "default_stats_interval_secs")]
    pub stats_interval_secs: u64,
}

/// Timed-action durations, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_press_ms")]
    pub press_ms: u64,
    #[serde(default = "default_pulse_ms")]
    pub pulse_ms: u64,
    /// Upper bound on a legacy `WAIT_n`.
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,
}

/// Stick and trigger conditioning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GamepadConfig {
    /// Deadzone on the 8-bit axis scale.
    #[serde(default = "default_deadzone")]
    pub deadzone: u8,
    /// Weight of the new stick sample per filter step.
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
    /// Analog trigger value that presses the digital trigger button.
    #[serde(default = "default_trigger_threshold")]
    pub trigger_threshold: u8,
}

/// Where reports go.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Linux USB gadget `/dev/hidgN` endpoints.
    #[default]
    Gadget,
    /// Log reports only.
    Log,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub kind: OutputKind,
    #[serde(default = "default_keyboard_device")]
    pub keyboard_device: PathBuf,
    #[serde(default = "default_mouse_device")]
    pub mouse_device: PathBuf,
    #[serde(default = "default_gamepad_device")]
    pub gamepad_device: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    9001
}
fn default_tick_hz() -> u32 {
    125
}
fn default_stats_interval_secs() -> u64 {
    30
}
fn default_press_ms() -> u64 {
    40
}
fn default_pulse_ms() -> u64 {
    150
}
fn default_max_wait_ms() -> u64 {
    2000
}
fn default_deadzone() -> u8 {
    3
}
fn default_smoothing() -> f32 {
    0.78
}
fn default_trigger_threshold() -> u8 {
    128
}
fn default_keyboard_device() -> PathBuf {
    PathBuf::from("/dev/hidg0")
}
fn default_mouse_device() -> PathBuf {
    PathBuf::from("/dev/hidg1")
}
fn default_gamepad_device() -> PathBuf {
    PathBuf::from("/dev/hidg2")
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            stats_interval_secs: default_stats_interval_secs(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            press_ms: default_press_ms(),
            pulse_ms: default_pulse_ms(),
            max_wait_ms: default_max_wait_ms(),
        }
    }
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            deadzone: default_deadzone(),
            smoothing: default_smoothing(),
            trigger_threshold: default_trigger_threshold(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            kind: OutputKind::default(),
            keyboard_device: default_keyboard_device(),
            mouse_device: default_mouse_device(),
            gamepad_device: default_gamepad_device(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Derived settings ──────────────────────────────────────────────────────────

impl AppConfig {
    /// The UDP address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BadBindAddress`] if `bind_address` is not an IP
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let text = format!("{}:{}", self.network.bind_address, self.network.port);
        text.parse().map_err(|_| ConfigError::BadBindAddress(text))
    }

    /// Synthesizer settings taken from `[pacing]`, `[timing]` and `[gamepad]`.
    pub fn synthesizer_config(&self) -> SynthesizerConfig {
        SynthesizerConfig {
            tick_interval: SynthesizerConfig::interval_for_hz(self.pacing.tick_hz),
            press_duration: Duration::from_millis(self.timing.press_ms),
            pulse_duration: Duration::from_millis(self.timing.pulse_ms),
            max_wait: Duration::from_millis(self.timing.max_wait_ms),
            deadzone: self.gamepad.deadzone,
            smoothing: self.gamepad.smoothing.clamp(0.0, 1.0),
            trigger_threshold: self.gamepad.trigger_threshold,
        }
    }

    /// `None` when periodic stats logging is disabled.
    pub fn stats_interval(&self) -> Option<Duration> {
        (self.pacing.stats_interval_secs > 0)
            .then(|| Duration::from_secs(self.pacing.stats_interval_secs))
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path` as pretty TOML, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
