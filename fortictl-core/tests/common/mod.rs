//! Scripted in-memory shell shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use fortictl_core::appliance::FortiGate;
use fortictl_core::config::PacerTiming;
use fortictl_core::error::{ConnectionError, ProtocolError, Result};
use fortictl_core::shell::{Connector, Decoder, ShellChannel};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const PROMPT: &str = "FGT-LAB # ";

/// Maps a command line (without newline) to the bytes the appliance answers
pub type Responder = Arc<dyn Fn(&str) -> Option<Vec<u8>> + Send + Sync>;

/// Everything the fake appliance saw, shared across shells
#[derive(Clone, Default)]
pub struct Transcript {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    opens: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl Transcript {
    /// Raw writes, exactly as sent
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }

    /// Command lines with the trailing newline removed
    pub fn commands(&self) -> Vec<String> {
        self.writes()
            .iter()
            .map(|w| String::from_utf8_lossy(w).trim_end_matches('\n').to_string())
            .collect()
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

pub struct ScriptedShell {
    responder: Responder,
    transcript: Transcript,
    pending: VecDeque<u8>,
    writes: usize,
    fail_write: Option<usize>,
    closed: bool,
}

#[async_trait]
impl ShellChannel for ScriptedShell {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let line = String::from_utf8_lossy(data);
        let command = line.trim_end_matches('\n');

        self.writes += 1;
        if self.fail_write == Some(self.writes) {
            return Err(ProtocolError::WriteFailed {
                command: command.to_string(),
                reason: "channel closed by peer".to_string(),
            }
            .into());
        }

        self.transcript.writes.lock().unwrap().push(data.to_vec());
        if let Some(output) = (self.responder)(command) {
            self.pending.extend(output);
        }
        Ok(())
    }

    fn data_ready(&mut self) -> bool {
        !self.pending.is_empty()
    }

    fn recv(&mut self, max: usize) -> Vec<u8> {
        let take = max.min(self.pending.len());
        self.pending.drain(..take).collect()
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.transcript.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

pub struct ScriptedConnector {
    responder: Responder,
    transcript: Transcript,
    refuse: bool,
    fail_write: Option<usize>,
}

impl ScriptedConnector {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Option<Vec<u8>> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            transcript: Transcript::default(),
            refuse: false,
            fail_write: None,
        }
    }

    /// Shells from this connector fail their `n`th write (1-based)
    pub fn failing_write(mut self, n: usize) -> Self {
        self.fail_write = Some(n);
        self
    }

    /// A connector whose appliance rejects the login
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::new(|_| None)
        }
    }

    pub fn transcript(&self) -> Transcript {
        self.transcript.clone()
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    type Shell = ScriptedShell;

    async fn open(&self) -> Result<ScriptedShell> {
        self.transcript.opens.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(ConnectionError::AuthenticationFailed {
                username: "admin".to_string(),
            }
            .into());
        }

        Ok(ScriptedShell {
            responder: self.responder.clone(),
            transcript: self.transcript.clone(),
            pending: VecDeque::new(),
            writes: 0,
            fail_write: self.fail_write,
            closed: false,
        })
    }
}

/// Echo of the command, the given body, then a prompt
pub fn reply(command: &str, body: &str) -> Option<Vec<u8>> {
    Some(format!("{}\r\n{}{}", command, body, PROMPT).into_bytes())
}

/// An appliance with one group dump and one session table
pub fn appliance(group_dump: &'static str, session_table: &'static str) -> ScriptedConnector {
    ScriptedConnector::new(move |command| match command {
        "show" => reply(command, group_dump),
        "execute vpn sslvpn list" => reply(command, session_table),
        c => reply(c, ""),
    })
}

pub fn fortigate(connector: ScriptedConnector) -> FortiGate<ScriptedConnector> {
    FortiGate::new(connector, &PacerTiming::default(), Decoder::default())
}

pub const GROUP_ABC: &str = "config user group\r\n    edit \"vpn-users\"\r\n        set member \"a\" \"b\" \"c\"\r\n    next\r\nend\r\n";

pub const GROUP_A: &str = "config user group\r\n    edit \"vpn-users\"\r\n        set member \"a\"\r\n    next\r\nend\r\n";

pub const GROUP_EMPTY: &str = "config user group\r\n    edit \"vpn-users\"\r\n    next\r\nend\r\n";

pub const SESSION_TABLE: &str = "SSL-VPN Login Users:\r\n Index   User   Group   Auth Type   Method   Timeout   Login   From\r\n 0   alice   corpgroup   local   1(1)   289   28792   10.0.0.5\r\n 1   bob   corpgroup   ldap   1(1)   120   28600   10.0.0.9\r\n 2   Alice   contractors   local   1(1)   300   28800   10.0.0.7\r\n\r\n";

pub const EMPTY_SESSION_TABLE: &str = "SSL-VPN Login Users:\r\n Index   User   Group   Auth Type   Method   Timeout   Login   From\r\n\r\n";
