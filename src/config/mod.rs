//! # Configuration Management
//!
//! TOML-backed configuration for the command core and the console binary.
//! Sections:
//!
//! - [`ServerConfig`] - instance name and optional world seed file
//! - [`SecurityConfig`] - disclosure and self-target policy, warning
//!   threshold and its mute length
//! - [`LoggingConfig`] - log level and optional log file
//!
//! All values are validated on load; [`Config::create_default`] writes a
//! commented starter file.
//!
//! ```toml
//! [server]
//! name = "gmshell"
//! world_seed = "world.json"
//!
//! [security]
//! conceal_denied = true
//! self_action_allowed = true
//! warn_threshold = 3
//! warn_mute_minutes = 30
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Instance name shown in the console banner.
    pub name: String,
    /// Optional JSON world seed loaded at startup (see `gmshell init`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_seed: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Render permission rejections with the unknown-command text.
    #[serde(default = "default_true")]
    pub conceal_denied: bool,
    /// Whether acting on your own account bypasses the level comparison.
    #[serde(default = "default_true")]
    pub self_action_allowed: bool,
    /// Warnings before the proc fires and the target is auto-muted.
    #[serde(default = "default_warn_threshold")]
    pub warn_threshold: u32,
    /// Mute length applied by the warning proc, in minutes.
    #[serde(default = "default_warn_mute_minutes")]
    pub warn_mute_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of: error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; with a TTY attached, output goes to both.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_warn_threshold() -> u32 {
    3
}

fn default_warn_mute_minutes() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SecurityConfig {
    fn default() -> Self {
        SecurityConfig {
            conceal_denied: true,
            self_action_allowed: true,
            warn_threshold: default_warn_threshold(),
            warn_mute_minutes: default_warn_mute_minutes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                name: "gmshell".to_string(),
                world_seed: None,
            },
            security: SecurityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Load and validate a configuration file.
    pub async fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config file {path}"))?;
        let config: Config =
            toml::from_str(&raw).with_context(|| format!("parsing config file {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Write a starter configuration file with defaults.
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let rendered = toml::to_string_pretty(&config).context("serializing default config")?;
        fs::write(path, rendered)
            .await
            .with_context(|| format!("writing config file {path}"))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.name.trim().is_empty() {
            return Err(anyhow!("server.name must not be empty"));
        }
        if self.security.warn_threshold == 0 {
            return Err(anyhow!("security.warn_threshold must be at least 1"));
        }
        if self.security.warn_mute_minutes == 0 {
            return Err(anyhow!("security.warn_mute_minutes must be at least 1"));
        }
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow!(
                "logging.level must be one of {}",
                VALID_LOG_LEVELS.join(", ")
            ));
        }
        Ok(())
    }
}
