//! Interactive shell module
//!
//! Transport, command pacing and output decoding for the appliance CLI.

pub mod decoder;
pub mod pacer;
pub mod transport;

use crate::error::Result;
use async_trait::async_trait;

// Public re-exports
pub use decoder::{Decoder, TextEncoding};
pub use pacer::{CommandPacer, OutputCollector, Pace, QuiescenceCollector};
pub use transport::{SshConnector, SshShell};

/// Byte-level view of an open interactive shell
///
/// The shell has no message framing: writes are raw bytes and reads return
/// whatever the remote side has produced so far.
#[async_trait]
pub trait ShellChannel: Send {
    /// Write raw bytes to the shell
    async fn write(&mut self, data: &[u8]) -> Result<()>;

    /// True when at least one byte can be read without waiting
    fn data_ready(&mut self) -> bool;

    /// Take up to `max` buffered bytes without waiting
    fn recv(&mut self, max: usize) -> Vec<u8>;

    /// Close the shell and its connection
    ///
    /// Must be idempotent and must not fail; errors are only logged.
    async fn close(&mut self);
}

/// Opens authenticated shells on the appliance
#[async_trait]
pub trait Connector: Send + Sync {
    type Shell: ShellChannel;

    async fn open(&self) -> Result<Self::Shell>;
}
