//! SSH transport to the appliance
//!
//! Opens a russh client session with password authentication only, accepts
//! any host key, and requests a PTY-backed interactive shell. Incoming channel
//! messages are pulled without blocking so the pacer can ask "is data ready".

use crate::config::{ApplianceConfig, PacerTiming};
use crate::error::{ConnectionError, ProtocolError, Result};
use crate::shell::{Connector, ShellChannel};
use async_trait::async_trait;
use futures::FutureExt;
use russh::client::{self, Handle, Msg};
use russh::{Channel, ChannelMsg, Disconnect};
use russh_keys::key;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Terminal type and geometry requested for the shell
const PTY_TERM: &str = "vt100";
const PTY_COLUMNS: u32 = 200;
const PTY_ROWS: u32 = 24;

/// Client handler that trusts every host key
///
/// Appliances are addressed by IP and rotate keys on firmware upgrades; no
/// known-hosts store is kept.
struct AcceptAnyHostKey;

#[async_trait]
impl client::Handler for AcceptAnyHostKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        debug!(
            "Accepting host key {}",
            server_public_key.fingerprint()
        );
        Ok(true)
    }
}

/// Opens [`SshShell`]s for one appliance
#[derive(Debug, Clone)]
pub struct SshConnector {
    config: ApplianceConfig,
    connect_timeout: Duration,
    stabilize_delay: Duration,
}

impl SshConnector {
    pub fn new(config: ApplianceConfig, timing: &PacerTiming) -> Self {
        Self {
            config,
            connect_timeout: timing.connect_timeout(),
            stabilize_delay: timing.stabilize_delay(),
        }
    }

    async fn connect(&self) -> std::result::Result<Handle<AcceptAnyHostKey>, ConnectionError> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(Duration::from_secs(300)),
            ..Default::default()
        });

        let address = (self.config.host.as_str(), self.config.port);
        let connecting = client::connect(ssh_config, address, AcceptAnyHostKey);

        tokio::time::timeout(self.connect_timeout, connecting)
            .await
            .map_err(|_| ConnectionError::Timeout {
                seconds: self.connect_timeout.as_secs(),
            })?
            .map_err(|e| ConnectionError::ConnectFailed {
                host: self.config.host.clone(),
                port: self.config.port,
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl Connector for SshConnector {
    type Shell = SshShell;

    #[tracing::instrument(skip(self), fields(host = %self.config.host, port = self.config.port))]
    async fn open(&self) -> Result<SshShell> {
        info!("Connecting as {}", self.config.username);
        let mut handle = self.connect().await?;

        let authenticated = handle
            .authenticate_password(self.config.username.as_str(), self.config.password.expose())
            .await
            .map_err(|e| ConnectionError::ConnectFailed {
                host: self.config.host.clone(),
                port: self.config.port,
                reason: e.to_string(),
            })?;

        if !authenticated {
            return Err(ConnectionError::AuthenticationFailed {
                username: self.config.username.clone(),
            }
            .into());
        }

        let shell_failed = |e: russh::Error| ConnectionError::ShellFailed {
            reason: e.to_string(),
        };

        let channel = handle.channel_open_session().await.map_err(shell_failed)?;
        channel
            .request_pty(false, PTY_TERM, PTY_COLUMNS, PTY_ROWS, 0, 0, &[])
            .await
            .map_err(shell_failed)?;
        channel.request_shell(false).await.map_err(shell_failed)?;

        // The banner and first prompt arrive asynchronously
        tokio::time::sleep(self.stabilize_delay).await;
        info!("Interactive shell ready");

        Ok(SshShell {
            handle,
            channel,
            pending: VecDeque::new(),
            eof: false,
            closed: false,
        })
    }
}

/// An authenticated SSH connection with one interactive shell channel
pub struct SshShell {
    handle: Handle<AcceptAnyHostKey>,
    channel: Channel<Msg>,
    pending: VecDeque<u8>,
    eof: bool,
    closed: bool,
}

impl SshShell {
    /// Move every message already queued on the channel into `pending`
    fn pump(&mut self) {
        while !self.eof {
            match self.channel.wait().now_or_never() {
                Some(Some(ChannelMsg::Data { ref data })) => {
                    self.pending.extend(data.iter().copied());
                }
                Some(Some(ChannelMsg::ExtendedData { ref data, .. })) => {
                    self.pending.extend(data.iter().copied());
                }
                Some(Some(ChannelMsg::Eof | ChannelMsg::Close)) | Some(None) => {
                    debug!("Remote side closed the shell");
                    self.eof = true;
                }
                Some(Some(_)) => {}
                None => break,
            }
        }
    }
}

#[async_trait]
impl ShellChannel for SshShell {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.channel.data(data).await.map_err(|e| {
            ProtocolError::WriteFailed {
                command: String::from_utf8_lossy(data).trim_end().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn data_ready(&mut self) -> bool {
        self.pump();
        !self.pending.is_empty()
    }

    fn recv(&mut self, max: usize) -> Vec<u8> {
        self.pump();
        let take = max.min(self.pending.len());
        self.pending.drain(..take).collect()
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.channel.close().await {
            debug!("Channel close: {}", e);
        }
        if let Err(e) = self
            .handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
        {
            warn!("SSH disconnect failed: {}", e);
        }
        info!("SSH session closed");
    }
}
