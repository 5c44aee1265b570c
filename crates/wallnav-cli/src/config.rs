//! Controller configuration – reads `wallnav.toml`.
//!
//! ```toml
//! [run]
//! tick_ms = 64
//! reverse_hold_ticks = 5
//! log_every_tick = false
//! trace = "traces/arena.json"
//!
//! [thresholds]
//! obstacle_threshold = 80.0
//! max_speed = 6.28
//!
//! [watchdog]
//! enabled = true
//! max_stuck = 50
//!
//! [report]
//! enabled = true
//! dir = "results"
//! format = "text"
//! ```
//!
//! Every key is optional and falls back to the built-in default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wallnav_kernel::{StuckWatchdog, Thresholds};
use wallnav_runtime::report::{FileReportSink, ReportFormat};
use wallnav_runtime::run_loop::{DEFAULT_REVERSE_HOLD_TICKS, RunLoopConfig};
use wallnav_types::NavError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "wallnav.toml";

/// Run loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Control tick in milliseconds.
    pub tick_ms: u64,
    pub reverse_hold_ticks: u32,
    pub log_every_tick: bool,
    /// Sensor trace to replay when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_ms: 64,
            reverse_hold_ticks: DEFAULT_REVERSE_HOLD_TICKS,
            log_every_tick: false,
            trace: None,
        }
    }
}

/// Where and how the final report is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("."),
            format: ReportFormat::Text,
        }
    }
}

/// Full controller configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub run: RunConfig,
    pub thresholds: Thresholds,
    pub watchdog: StuckWatchdog,
    pub report: ReportConfig,
}

impl Config {
    /// Check the values the controller cannot run with.
    pub fn validate(&self) -> Result<(), NavError> {
        if self.run.tick_ms == 0 {
            return Err(NavError::Config("run.tick_ms must be greater than 0".to_string()));
        }
        self.thresholds.validate()
    }

    pub fn run_loop_config(&self) -> RunLoopConfig {
        RunLoopConfig {
            tick: Duration::from_millis(self.run.tick_ms),
            reverse_hold_ticks: self.run.reverse_hold_ticks,
            watchdog: self.watchdog,
            log_every_tick: self.run.log_every_tick,
        }
    }

    pub fn report_sink(&self) -> FileReportSink {
        FileReportSink::new(self.report.dir.clone(), self.report.format)
    }
}

/// Load the configuration.
///
/// With an explicit `path` the file must exist.  Otherwise
/// [`DEFAULT_CONFIG_FILE`] is used when present and built-in defaults when
/// not.  `WALLNAV_*` overrides are applied in every case.
pub fn load(path: Option<&Path>) -> Result<Config, NavError> {
    let mut cfg = match path {
        Some(p) => load_from(p)?
            .ok_or_else(|| NavError::Config(format!("config file {} not found", p.display())))?,
        None => load_from(Path::new(DEFAULT_CONFIG_FILE))?.unwrap_or_default(),
    };
    apply_env_overrides(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}

/// Load the config from a specific path.  Returns `None` if the file does
/// not exist.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, NavError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        NavError::Config(format!("failed to read config at {}: {e}", path.display()))
    })?;
    let cfg: Config = toml::from_str(&raw)
        .map_err(|e| NavError::Config(format!("failed to parse config: {e}")))?;
    Ok(Some(cfg))
}

/// Apply `WALLNAV_*` environment variable overrides to `cfg`.
///
/// Unparseable values are ignored.
///
/// | Variable | Config field |
/// |---|---|
/// | `WALLNAV_TICK_MS` | `run.tick_ms` |
/// | `WALLNAV_MAX_SPEED` | `thresholds.max_speed` |
/// | `WALLNAV_MAX_STUCK` | `watchdog.max_stuck` |
/// | `WALLNAV_STUCK_WATCHDOG` | `watchdog.enabled` (`true`/`false`, `1`/`0`, `on`/`off`) |
/// | `WALLNAV_REPORT_DIR` | `report.dir` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("WALLNAV_TICK_MS")
        && let Ok(ms) = v.parse::<u64>()
    {
        cfg.run.tick_ms = ms;
    }
    if let Ok(v) = std::env::var("WALLNAV_MAX_SPEED")
        && let Ok(speed) = v.parse::<f64>()
    {
        cfg.thresholds.max_speed = speed;
    }
    if let Ok(v) = std::env::var("WALLNAV_MAX_STUCK")
        && let Ok(max) = v.parse::<u32>()
    {
        cfg.watchdog.max_stuck = max;
    }
    if let Ok(v) = std::env::var("WALLNAV_STUCK_WATCHDOG")
        && let Some(enabled) = parse_switch(&v)
    {
        cfg.watchdog.enabled = enabled;
    }
    if let Ok(v) = std::env::var("WALLNAV_REPORT_DIR") {
        cfg.report.dir = PathBuf::from(v);
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
