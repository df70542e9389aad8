use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::system_monitor::ThresholdConfig;

#[cfg(target_os = "linux")]
const DEFAULT_LOG_PATHS: &[&str] = &[
    "/var/log/syslog",
    "/var/log/auth.log",
    "/var/log/kern.log",
    "/var/log/dmesg",
    "/var/log/messages",
];

#[cfg(target_os = "macos")]
const DEFAULT_LOG_PATHS: &[&str] = &[
    "/var/log/system.log",
    "/var/log/wifi.log",
    "/var/log/install.log",
];

#[cfg(target_os = "windows")]
const DEFAULT_LOG_PATHS: &[&str] = &[
    "C:\\Windows\\Logs\\CBS\\CBS.log",
    "C:\\Windows\\Logs\\DISM\\DISM.log",
];

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const DEFAULT_LOG_PATHS: &[&str] = &[];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: ThresholdConfig,
    /// Watch mode refresh interval in seconds
    pub refresh_secs: u64,
    /// Log files to tail; empty means the platform defaults
    pub log_paths: Vec<String>,
    pub log_lines: usize,
    pub log_poll_secs: u64,
    pub top_processes: usize,
    /// Minimum spacing between temperature history records
    pub temperature_sample_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            refresh_secs: 1,
            log_paths: Vec::new(),
            log_lines: 20,
            log_poll_secs: 5,
            top_processes: 10,
            temperature_sample_secs: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Missing, empty or unparsable files give the defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if !config_path.exists() {
            Config::default()
        } else {
            let data = fs::read(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

            if data.iter().all(u8::is_ascii_whitespace) {
                Config::default()
            } else {
                serde_json::from_slice(&data).unwrap_or_else(|e| {
                    log::warn!("Ignoring unreadable config {:?}: {}", config_path, e);
                    Config::default()
                })
            }
        };

        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, data)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("sysglance").join("config.json"))
    }

    /// Clamp intervals and fix misordered thresholds
    pub fn normalize(&mut self) {
        self.thresholds = self.thresholds.validated();
        self.refresh_secs = self.refresh_secs.max(1);
        self.log_poll_secs = self.log_poll_secs.max(1);
    }

    pub fn default_log_paths() -> Vec<PathBuf> {
        DEFAULT_LOG_PATHS.iter().map(PathBuf::from).collect()
    }

    /// Configured log paths, or the platform defaults when none are set
    pub fn log_candidates(&self) -> Vec<PathBuf> {
        if self.log_paths.is_empty() {
            Self::default_log_paths()
        } else {
            self.log_paths.iter().map(PathBuf::from).collect()
        }
    }

    /// Candidates that currently exist as files
    pub fn effective_log_paths(&self) -> Vec<PathBuf> {
        existing_files(&self.log_candidates())
    }
}

/// Paths in `candidates` that are regular files right now
pub fn existing_files(candidates: &[PathBuf]) -> Vec<PathBuf> {
    candidates.iter().filter(|p| p.is_file()).cloned().collect()
}
