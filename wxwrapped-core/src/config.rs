//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/wxwrapped/config.toml`. Every
//! setting has a default, so the file is optional.
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/wxwrapped/` (~/.config/wxwrapped/)
//! - State/Logs: `$XDG_STATE_HOME/wxwrapped/` (~/.local/state/wxwrapped/)
//!
//! Input and output files (`[paths]`) default to names relative to the
//! working directory, so running the tool next to `decrypted.db` just works.

use crate::classify::DEFAULT_COVERAGE_THRESHOLD;
use crate::error::{Error, Result};
use crate::report::ReportOptions;
use crate::timeline::{ReferenceZone, CHINA_STANDARD_TIME_HOURS};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Report configuration
    #[serde(default)]
    pub report: ReportConfig,

    /// Input and output file locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What to report on and how
#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    /// Calendar year to summarize
    #[serde(default = "default_year")]
    pub year: i32,

    /// Hours east of UTC used to cut months and read clock times
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// Share of individual message volume to categorize (0, 1]
    #[serde(default = "default_coverage_threshold")]
    pub coverage_threshold: f64,

    /// Rows in the top contacts table
    #[serde(default = "default_top_contacts")]
    pub top_contacts: usize,

    /// Rows in the group chat tables
    #[serde(default = "default_top_group_chats")]
    pub top_group_chats: usize,

    /// Rows in the top categories table
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            year: default_year(),
            utc_offset_hours: default_utc_offset_hours(),
            coverage_threshold: default_coverage_threshold(),
            top_contacts: default_top_contacts(),
            top_group_chats: default_top_group_chats(),
            top_categories: default_top_categories(),
        }
    }
}

impl ReportConfig {
    /// The reference timezone for this report.
    pub fn zone(&self) -> Result<ReferenceZone> {
        ReferenceZone::from_hours(self.utc_offset_hours)
    }

    /// Options for [`crate::report::build_report`].
    pub fn report_options(&self) -> Result<ReportOptions> {
        Ok(ReportOptions {
            year: self.year,
            zone: self.zone()?,
            top_contacts: self.top_contacts,
            top_group_chats: self.top_group_chats,
            top_categories: self.top_categories,
        })
    }
}

fn default_year() -> i32 {
    2015
}

fn default_utc_offset_hours() -> i32 {
    CHINA_STANDARD_TIME_HOURS
}

fn default_coverage_threshold() -> f64 {
    DEFAULT_COVERAGE_THRESHOLD
}

fn default_top_contacts() -> usize {
    10
}

fn default_top_group_chats() -> usize {
    8
}

fn default_top_categories() -> usize {
    10
}

/// Input and output files
#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    /// Decrypted chat database
    #[serde(default = "default_database_path")]
    pub database: PathBuf,

    /// Category assignments (read at start, rewritten after each answer)
    #[serde(default = "default_userdata_path")]
    pub userdata: PathBuf,

    /// Optional group chat display name overrides
    #[serde(default = "default_aliases_path")]
    pub aliases: PathBuf,

    /// Generated HTML report
    #[serde(default = "default_output_path")]
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            userdata: default_userdata_path(),
            aliases: default_aliases_path(),
            output: default_output_path(),
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("decrypted.db")
}

fn default_userdata_path() -> PathBuf {
    PathBuf::from("userdata.json")
}

fn default_aliases_path() -> PathBuf {
    PathBuf::from("group_chat_aliases.json")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("chart.html")
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that would otherwise fail deep inside a run
    pub fn validate(&self) -> Result<()> {
        let report = &self.report;
        if !(-23..=23).contains(&report.utc_offset_hours) {
            return Err(Error::Config(
                "report.utc_offset_hours must be between -23 and 23".to_string(),
            ));
        }
        if !(report.coverage_threshold > 0.0 && report.coverage_threshold <= 1.0) {
            return Err(Error::Config(
                "report.coverage_threshold must be in (0, 1]".to_string(),
            ));
        }
        if !(1..=9999).contains(&report.year) {
            return Err(Error::Config("report.year is out of range".to_string()));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/wxwrapped/config.toml` (~/.config/wxwrapped/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("wxwrapped").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/wxwrapped/` (~/.local/state/wxwrapped/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("wxwrapped")
    }
}
