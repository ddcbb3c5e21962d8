use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::channel::DEFAULT_CAPACITY;

pub const MIN_CHANNEL_CAPACITY: usize = 1;
pub const MAX_CHANNEL_CAPACITY: usize = 1024;
pub const MIN_POLL_INTERVAL_MS: u64 = 100;
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
/// Tracing filter used when neither the config file nor `RUST_LOG` set one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Root configuration structure. Every section is optional; an empty or
/// missing file gives the reference behaviour.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Event channel settings.
#[derive(Debug, Deserialize)]
pub struct ChannelConfig {
    /// Undelivered events held before producers block. Clamped to [1, 1024].
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY }
    }
}

impl ChannelConfig {
    pub fn effective_capacity(&self) -> usize {
        self.capacity.clamp(MIN_CHANNEL_CAPACITY, MAX_CHANNEL_CAPACITY)
    }
}

/// Process poller settings.
#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    /// Delay between process table polls in milliseconds. Clamped to [100, 60000].
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Report processes already running at startup as `started`.
    #[serde(default)]
    pub report_existing: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            report_existing: false,
        }
    }
}

impl SourceConfig {
    pub fn effective_poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS)
    }
}

/// Diagnostic logging settings.
#[derive(Debug, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"procmon=debug"`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { filter: DEFAULT_LOG_FILTER.to_string() }
    }
}

/// Loads the config file at `path`, returning `Config::default()` if the file does not exist.
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}
