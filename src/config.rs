//! Configuration system
//!
//! Provides configuration management with:
//! - Config file loading (optional, `basic` feature)
//! - Environment overrides for diagnostics only
//! - Runtime defaults
//! - Validation
//!
//! Parsing behavior is never read from the environment; only where and how the tool
//! logs can be changed that way.

use crate::error::CondenserError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Processing configuration
    pub processing: ProcessingConfig,

    /// Paths configuration
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub buffer_size_kb: usize,
    pub progress_interval_mb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub log_directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "ERROR".to_string(),
            format: "pretty".to_string(),
            output: "console".to_string(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            buffer_size_kb: 32,
            progress_interval_mb: 64,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("Input.txt"),
            output: PathBuf::from("Output.txt"),
            log_directory: PathBuf::from("logs"),
        }
    }
}

const LOG_FORMATS: [&str; 2] = ["pretty", "json"];
const LOG_OUTPUTS: [&str; 3] = ["console", "file", "both"];

impl ProcessingConfig {
    pub fn buffer_size_bytes(&self) -> usize {
        self.buffer_size_kb * 1024
    }

    pub fn progress_interval_bytes(&self) -> u64 {
        self.progress_interval_mb * 1024 * 1024
    }
}

impl Config {
    /// Load configuration from an explicit file, or the first default location found,
    /// then apply environment overrides and validate
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => Self::discover()?,
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn discover() -> Result<Self> {
        let config_paths = [
            PathBuf::from("runtime-condenser.toml"),
            PathBuf::from(".runtime-condenser.toml"),
            dirs::config_dir()
                .map(|d| d.join("runtime-condenser").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                info!(config_file = %path.display(), "Loading configuration from file");
                return Self::load_from_file(path);
            }
        }

        Ok(Config::default())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "basic")]
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    #[cfg(not(feature = "basic"))]
    pub fn load_from_file(path: &Path) -> Result<Self> {
        warn!(
            config_file = %path.display(),
            "Config file support is disabled, using defaults"
        );
        Ok(Config::default())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }
        if let Ok(val) = env::var("RUNTIME_CONDENSER_LOG_DIR") {
            self.paths.log_directory = PathBuf::from(val);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.processing.buffer_size_kb < 1 || self.processing.buffer_size_kb > 1024 {
            return Err(CondenserError::Config(format!(
                "Buffer size must be between 1KB and 1024KB, got {}KB",
                self.processing.buffer_size_kb
            ))
            .into());
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(CondenserError::Config(format!(
                "Unknown log format '{}', expected one of {:?}",
                self.logging.format, LOG_FORMATS
            ))
            .into());
        }

        if !LOG_OUTPUTS.contains(&self.logging.output.as_str()) {
            return Err(CondenserError::Config(format!(
                "Unknown log output '{}', expected one of {:?}",
                self.logging.output, LOG_OUTPUTS
            ))
            .into());
        }

        if self.processing.progress_interval_mb == 0 {
            warn!("Progress logging is disabled");
        }

        if self.logging.output != "console" && !self.paths.log_directory.exists() {
            std::fs::create_dir_all(&self.paths.log_directory)
                .context("Failed to create log directory")?;
        }

        Ok(())
    }

    /// Save current configuration to file
    #[cfg(feature = "basic")]
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!(path = %path.display(), "Configuration saved to file");

        Ok(())
    }
}
