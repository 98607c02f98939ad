//! TOML configuration file I/O and environment overlay
//!
//! The configuration file is optional. Connection parameters from the
//! environment (`FORTIGATE_IP`, `FORTIGATE_SSH_PORT`, `FORTIGATE_SSH_USERNAME`,
//! `FORTIGATE_SSH_PASSWORD`) always win over the file.

use crate::config::{ApplianceConfig, DecoderSettings, PacerTiming, DEFAULT_SSH_PORT};
use crate::error::{ConfigError, FortiError};
use crate::types::SshPassword;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_HOST: &str = "FORTIGATE_IP";
pub const ENV_PORT: &str = "FORTIGATE_SSH_PORT";
pub const ENV_USERNAME: &str = "FORTIGATE_SSH_USERNAME";
pub const ENV_PASSWORD: &str = "FORTIGATE_SSH_PASSWORD";
pub const ENV_DUMP_PATH: &str = "FORTICTL_DUMP_PATH";
pub const ENV_CONFIG_DIR: &str = "FORTICTL_CONFIG_DIR";

/// `[appliance]` table of the configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplianceSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,

    /// Only ever taken from the environment
    #[serde(skip)]
    pub password: Option<SshPassword>,
}

/// Complete TOML configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FortictlConfig {
    pub appliance: ApplianceSection,
    pub timing: PacerTiming,
    pub decoder: DecoderSettings,

    /// Side file receiving raw session-list output
    pub dump_path: Option<PathBuf>,
}

/// Fully resolved and validated settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub appliance: ApplianceConfig,
    pub timing: PacerTiming,
    pub decoder: DecoderSettings,
    pub dump_path: Option<PathBuf>,
}

impl FortictlConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, FortiError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            FortiError::Config(ConfigError::IoError {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })
        })?;

        let config: FortictlConfig = toml::from_str(&contents)?;
        debug!("Loaded configuration file {}", path.display());
        Ok(config)
    }

    /// Overlay connection parameters from an environment lookup
    ///
    /// Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(host) = lookup(ENV_HOST) {
            self.appliance.host = Some(host.trim().to_string());
        }

        if let Some(port) = lookup(ENV_PORT) {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::ValidationError {
                    message: format!("{} is not a valid port: {}", ENV_PORT, port),
                })?;
            self.appliance.port = Some(port);
        }

        if let Some(username) = lookup(ENV_USERNAME) {
            self.appliance.username = Some(username.trim().to_string());
        }

        if let Some(password) = lookup(ENV_PASSWORD) {
            self.appliance.password = Some(password.into());
        }

        if let Some(dump_path) = lookup(ENV_DUMP_PATH) {
            self.dump_path = Some(PathBuf::from(dump_path));
        }

        Ok(())
    }

    /// Turn the merged configuration into validated settings
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        let appliance = self.appliance;

        let host = appliance.host.ok_or_else(|| ConfigError::MissingField {
            field: ENV_HOST.to_string(),
        })?;
        let username = appliance.username.ok_or_else(|| ConfigError::MissingField {
            field: ENV_USERNAME.to_string(),
        })?;
        let password = appliance.password.ok_or_else(|| ConfigError::MissingField {
            field: ENV_PASSWORD.to_string(),
        })?;

        let appliance = ApplianceConfig::new(
            host,
            appliance.port.unwrap_or(DEFAULT_SSH_PORT),
            username,
            password,
        );
        appliance.validate()?;
        self.timing.validate()?;

        if self.decoder.encodings.is_empty() {
            debug!("Empty decoder chain configured, Latin-1 fallback only");
        }

        info!(
            "Resolved appliance {}:{} as {}",
            appliance.host, appliance.port, appliance.username
        );

        Ok(Settings {
            appliance,
            timing: self.timing,
            decoder: self.decoder,
            dump_path: self.dump_path,
        })
    }
}

/// Get the default configuration directory
///
/// Returns ~/.config/fortictl, or FORTICTL_CONFIG_DIR if set
pub fn get_config_dir() -> Result<PathBuf, FortiError> {
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        return Ok(PathBuf::from(config_dir));
    }

    let home = std::env::var("HOME").map_err(|_| {
        FortiError::Config(ConfigError::IoError {
            message: "HOME environment variable not set".to_string(),
        })
    })?;

    Ok(PathBuf::from(home).join(".config").join("fortictl"))
}

/// Get the default configuration file path
pub fn get_config_path() -> Result<PathBuf, FortiError> {
    let config_dir = get_config_dir()?;
    Ok(config_dir.join(CONFIG_FILE_NAME))
}

/// Load settings from the default file (if any) and the process environment
pub fn load_config() -> Result<Settings, FortiError> {
    let config_path = get_config_path()?;
    load_config_with(&config_path, |key| std::env::var(key).ok())
}

/// Load settings from a specific file (if it exists) and an environment lookup
pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<Settings, FortiError>
where
    P: AsRef<Path>,
    F: Fn(&str) -> Option<String>,
{
    let path = path.as_ref();
    let mut config = if path.exists() {
        FortictlConfig::from_file(path)?
    } else {
        debug!("No configuration file at {}, using environment only", path.display());
        FortictlConfig::default()
    };

    config.apply_env(lookup)?;
    Ok(config.resolve()?)
}
