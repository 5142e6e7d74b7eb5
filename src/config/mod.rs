// Configuration management for Cadence Workflows
//
// This module loads application settings from a TOML file in the platform
// configuration directory, with environment-variable overrides taking
// precedence. Settings cover where workflow definitions live, default run
// toggles applied by the CLI, and optional log-file output.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs as async_fs;

/// Environment variable names recognized by the configuration loader
pub struct EnvVars;

impl EnvVars {
    /// Override the configuration directory
    pub const CONFIG_DIR: &'static str = "CADENCE_CONFIG_DIR";
    /// Override the workflows directory
    pub const WORKFLOWS_DIR: &'static str = "CADENCE_WORKFLOWS_DIR";
    /// Override the log file path
    pub const LOG_FILE: &'static str = "CADENCE_LOG_FILE";
}

/// Configuration file name inside the config directory
const CONFIG_FILE: &str = "config.toml";

fn default_alert_duration() -> u32 {
    3
}

fn default_enabled() -> bool {
    true
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory scanned for workflow YAML definitions
    pub workflows_dir: Option<PathBuf>,
    /// Default rest/alert duration for workflows built ad hoc by the CLI
    #[serde(default = "default_alert_duration")]
    pub default_alert_duration_seconds: u32,
    /// Default announcement toggle for ad hoc workflows
    #[serde(default = "default_enabled")]
    pub announce_enabled: bool,
    /// Default haptics toggle for ad hoc workflows
    #[serde(default = "default_enabled")]
    pub haptic_enabled: bool,
    /// Optional log file; when set, tracing output is also appended there
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workflows_dir: None,
            default_alert_duration_seconds: default_alert_duration(),
            announce_enabled: default_enabled(),
            haptic_enabled: default_enabled(),
            log_file: None,
        }
    }
}

/// Loads and persists application configuration
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Current settings
    config: AppConfig,
    /// Directory holding the configuration file
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a configuration manager, loading any existing settings
    pub async fn new() -> Result<Self> {
        let config_dir = Self::determine_config_dir()?;
        Self::with_config_dir(config_dir).await
    }

    /// Create a configuration manager rooted at a specific directory
    pub async fn with_config_dir(config_dir: PathBuf) -> Result<Self> {
        tracing::debug!("Using configuration directory: {:?}", config_dir);

        if !config_dir.exists() {
            async_fs::create_dir_all(&config_dir)
                .await
                .context("Failed to create configuration directory")?;
            tracing::info!("Created configuration directory: {:?}", config_dir);
        }

        let mut manager = Self {
            config: AppConfig::default(),
            config_dir,
        };

        manager.load_configuration().await?;

        Ok(manager)
    }

    /// Determine the configuration directory to use
    fn determine_config_dir() -> Result<PathBuf> {
        if let Ok(config_dir) = env::var(EnvVars::CONFIG_DIR) {
            return Ok(PathBuf::from(config_dir));
        }

        let base = dirs::config_dir().context("Could not determine platform config directory")?;
        Ok(base.join("cadence"))
    }

    /// Load configuration from the file, then apply environment overrides
    async fn load_configuration(&mut self) -> Result<()> {
        let config_file = self.config_dir.join(CONFIG_FILE);

        if config_file.exists() {
            tracing::debug!("Loading configuration from: {:?}", config_file);

            let content = async_fs::read_to_string(&config_file)
                .await
                .context("Failed to read configuration file")?;

            self.config = toml::from_str(&content).context("Failed to parse configuration file")?;
        } else {
            tracing::debug!("Configuration file not found, using defaults");
        }

        self.apply_environment();

        Ok(())
    }

    /// Environment variables take precedence over file values
    fn apply_environment(&mut self) {
        if let Ok(workflows_dir) = env::var(EnvVars::WORKFLOWS_DIR) {
            self.config.workflows_dir = Some(PathBuf::from(workflows_dir));
            tracing::debug!("Loaded workflows directory from environment");
        }

        if let Ok(log_file) = env::var(EnvVars::LOG_FILE) {
            self.config.log_file = Some(PathBuf::from(log_file));
        }
    }

    /// Persist the current settings
    pub async fn save(&self) -> Result<()> {
        let config_file = self.config_dir.join(CONFIG_FILE);
        let content =
            toml::to_string_pretty(&self.config).context("Failed to serialize configuration")?;

        async_fs::write(&config_file, content)
            .await
            .context("Failed to write configuration file")?;

        tracing::info!("Configuration saved to {:?}", config_file);
        Ok(())
    }

    /// Current settings
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Mutable access to the settings, for CLI-driven updates
    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// Directory the workflows catalog should scan, falling back to
    /// `./workflows` when unset
    pub fn workflows_dir(&self) -> PathBuf {
        self.config
            .workflows_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("./workflows"))
    }
}
