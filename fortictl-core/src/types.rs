//! Type definitions and wrappers for secure data handling

use secrecy::{ExposeSecret, Secret};

/// Wrapper for the SSH administrator password
///
/// Keeps the password out of logs and `Debug` output.
#[derive(Clone, Debug)]
pub struct SshPassword(Secret<String>);

impl SshPassword {
    /// Create a new password wrapper
    pub fn new(password: String) -> Self {
        Self(Secret::new(password))
    }

    /// Expose the password value (use with caution!)
    ///
    /// Only the transport should call this, when authenticating.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for SshPassword {
    fn from(password: String) -> Self {
        Self::new(password)
    }
}
