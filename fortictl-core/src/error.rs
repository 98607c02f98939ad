//! Error types for fortictl
//!
//! Transport and parsing failures are carried as these types up to the
//! orchestrator boundary, where they are folded into a failure report.

use thiserror::Error;

/// Main error type for fortictl
#[derive(Error, Debug)]
pub enum FortiError {
    /// Errors related to configuration loading/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised while establishing the SSH session
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Errors raised while talking to the appliance CLI
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// Errors establishing or holding the SSH session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Failed to connect to {host}:{port}: {reason}")]
    ConnectFailed {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("Authentication failed for user '{username}'")]
    AuthenticationFailed { username: String },

    #[error("Connection timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Interactive shell setup failed: {reason}")]
    ShellFailed { reason: String },
}

/// Errors in the command/response exchange
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Failed to send '{command}': {reason}")]
    WriteFailed { command: String, reason: String },

    #[error("Invalid {name}: {value:?}")]
    InvalidArgument { name: String, value: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FortiError>;
