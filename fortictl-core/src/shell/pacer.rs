//! Command pacing over an unframed interactive shell
//!
//! The FortiGate CLI never signals that a command has finished. The pacer
//! writes the command line, waits a fixed delay, polls until output shows up
//! (bounded by a timeout) and then drains until a read pause finds nothing
//! more to read.
//!
//! This is a heuristic: a remote side that stalls longer than one read pause
//! mid-output will be cut short. The strategy sits behind [`OutputCollector`]
//! so a prompt-matching collector can replace it without touching callers.

use crate::config::PacerTiming;
use crate::error::Result;
use crate::shell::{Decoder, ShellChannel};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// Per-command wait parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pace {
    /// Unconditional wait after the command is written
    pub initial_delay: Duration,

    /// Bound on the wait for the first byte; does not bound the drain
    pub timeout: Duration,
}

impl Pace {
    pub fn from_timing(timing: &PacerTiming) -> Self {
        Self {
            initial_delay: timing.initial_delay(),
            timeout: timing.timeout(),
        }
    }

    pub fn with_initial_delay(self, initial_delay: Duration) -> Self {
        Self {
            initial_delay,
            ..self
        }
    }
}

/// Decides when the output of one command is complete
#[async_trait]
pub trait OutputCollector: Send + Sync {
    /// Gather the raw output that follows a command already written to `shell`
    async fn collect(&self, shell: &mut dyn ShellChannel, pace: Pace) -> Vec<u8>;
}

/// Fixed delay, poll until ready, then drain until quiet
#[derive(Debug, Clone)]
pub struct QuiescenceCollector {
    poll_interval: Duration,
    read_pause: Duration,
    chunk_size: usize,
}

impl QuiescenceCollector {
    pub fn new(timing: &PacerTiming) -> Self {
        Self {
            poll_interval: timing.poll_interval(),
            read_pause: timing.read_pause(),
            chunk_size: timing.chunk_size,
        }
    }
}

#[async_trait]
impl OutputCollector for QuiescenceCollector {
    async fn collect(&self, shell: &mut dyn ShellChannel, pace: Pace) -> Vec<u8> {
        sleep(pace.initial_delay).await;

        let deadline = Instant::now() + pace.timeout;
        while !shell.data_ready() {
            if Instant::now() >= deadline {
                debug!("No output within {:?}", pace.timeout);
                return Vec::new();
            }
            sleep(self.poll_interval).await;
        }

        let mut buffer = Vec::new();
        while shell.data_ready() {
            let chunk = shell.recv(self.chunk_size);
            debug!("Read {} bytes", chunk.len());
            buffer.extend_from_slice(&chunk);
            sleep(self.read_pause).await;
        }

        buffer
    }
}

/// Sends command lines and returns their decoded output
pub struct CommandPacer<O = QuiescenceCollector> {
    collector: O,
    decoder: Decoder,
    pace: Pace,
}

impl CommandPacer<QuiescenceCollector> {
    /// Create a pacer using the quiescence heuristic
    pub fn new(timing: &PacerTiming, decoder: Decoder) -> Self {
        Self::with_collector(
            QuiescenceCollector::new(timing),
            decoder,
            Pace::from_timing(timing),
        )
    }
}

impl<O: OutputCollector> CommandPacer<O> {
    pub fn with_collector(collector: O, decoder: Decoder, pace: Pace) -> Self {
        Self {
            collector,
            decoder,
            pace,
        }
    }

    /// Default pace applied by [`CommandPacer::send`]
    pub fn pace(&self) -> Pace {
        self.pace
    }

    /// Send one command with the default pace
    pub async fn send(&self, shell: &mut dyn ShellChannel, command: &str) -> Result<String> {
        self.send_paced(shell, command, self.pace).await
    }

    /// Send one command line and collect its decoded output
    pub async fn send_paced(
        &self,
        shell: &mut dyn ShellChannel,
        command: &str,
        pace: Pace,
    ) -> Result<String> {
        debug!("Sending command: {}", command);

        let mut line = Vec::with_capacity(command.len() + 1);
        line.extend_from_slice(command.as_bytes());
        line.push(b'\n');
        shell.write(&line).await?;

        let raw = self.collector.collect(shell, pace).await;
        if raw.is_empty() {
            warn!("Command '{}' produced no output", command);
        }

        Ok(self.decoder.decode(&raw))
    }
}
