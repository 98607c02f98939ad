//! Configuration module
//!
//! Connection parameters, pacing parameters and decoder settings. The
//! transport takes an explicit [`ApplianceConfig`] rather than reading
//! process-wide state.

use crate::error::ConfigError;
use crate::shell::decoder::TextEncoding;
use crate::types::SshPassword;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod toml_config;

/// Default SSH port of the appliance
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Connection parameters for one FortiGate appliance
#[derive(Debug, Clone)]
pub struct ApplianceConfig {
    /// Appliance hostname or IP address
    pub host: String,

    /// SSH port (default: 22)
    pub port: u16,

    /// Administrator username
    pub username: String,

    /// Administrator password, used for password authentication only
    pub password: SshPassword,
}

impl ApplianceConfig {
    /// Create a new appliance configuration
    pub fn new(host: String, port: u16, username: String, password: SshPassword) -> Self {
        Self {
            host,
            port,
            username,
            password,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::MissingField {
                field: "host".to_string(),
            });
        }

        if !self
            .host
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | ':' | '_'))
        {
            return Err(ConfigError::ValidationError {
                message: format!("Host contains invalid characters: {}", self.host),
            });
        }

        if self.port == 0 {
            return Err(ConfigError::ValidationError {
                message: "Port cannot be zero".to_string(),
            });
        }

        if self.username.is_empty() {
            return Err(ConfigError::MissingField {
                field: "username".to_string(),
            });
        }

        if self.password.expose().is_empty() {
            return Err(ConfigError::MissingField {
                field: "password".to_string(),
            });
        }

        Ok(())
    }
}

/// Pacing parameters for the interactive shell
///
/// The appliance CLI emits no completion marker, so every command is followed
/// by a fixed delay and a poll-until-idle drain. All values are tunable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacerTiming {
    /// Pause after the shell is opened, before the first command
    pub stabilize_ms: u64,

    /// Unconditional delay after submitting a command
    pub initial_delay_ms: u64,

    /// Initial delay for the (slower) SSL-VPN session listing
    pub list_delay_ms: u64,

    /// Interval between "is data ready" checks
    pub poll_interval_ms: u64,

    /// Pause between consecutive reads while draining
    pub read_pause_ms: u64,

    /// Upper bound on the wait for the first byte of output
    pub timeout_ms: u64,

    /// Maximum number of bytes taken per read
    pub chunk_size: usize,

    /// Upper bound on TCP connect plus SSH handshake
    pub connect_timeout_secs: u64,
}

impl PacerTiming {
    pub fn stabilize_delay(&self) -> Duration {
        Duration::from_millis(self.stabilize_ms)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn list_delay(&self) -> Duration {
        Duration::from_millis(self.list_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn read_pause(&self) -> Duration {
        Duration::from_millis(self.read_pause_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Validate the timing parameters
    ///
    /// A zero poll interval would spin, and a zero chunk size or timeout would
    /// never read anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zero_field = [
            ("poll_interval_ms", self.poll_interval_ms == 0),
            ("timeout_ms", self.timeout_ms == 0),
            ("chunk_size", self.chunk_size == 0),
            ("connect_timeout_secs", self.connect_timeout_secs == 0),
        ]
        .into_iter()
        .find(|(_, is_zero)| *is_zero);

        match zero_field {
            Some((field, _)) => Err(ConfigError::ValidationError {
                message: format!("timing.{} cannot be zero", field),
            }),
            None => Ok(()),
        }
    }
}

impl Default for PacerTiming {
    fn default() -> Self {
        Self {
            stabilize_ms: 1000,
            initial_delay_ms: 1000,
            list_delay_ms: 2000,
            poll_interval_ms: 100,
            read_pause_ms: 100,
            timeout_ms: 10_000,
            chunk_size: 1024,
            connect_timeout_secs: 30,
        }
    }
}

/// Ordered encoding chain used to decode scraped output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderSettings {
    pub encodings: Vec<TextEncoding>,
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self {
            encodings: TextEncoding::DEFAULT_CHAIN.to_vec(),
        }
    }
}
