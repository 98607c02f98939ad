//! FortiGate operations module
//!
//! Every operation opens its own shell, runs one orchestrator and closes the
//! shell again, whatever the orchestrator returned. Nothing is shared or
//! cached between operations.

pub mod group;
pub mod output_parser;
pub mod report;
pub mod sslvpn;

use crate::config::PacerTiming;
use crate::error::{ProtocolError, Result};
use crate::shell::{
    CommandPacer, Connector, Decoder, OutputCollector, Pace, QuiescenceCollector, ShellChannel,
};
use std::future::Future;
use std::path::PathBuf;
use tracing::{info, warn};

// Public re-exports
pub use group::{GroupMembers, RevokeOutcome};
pub use output_parser::{OutputParser, VpnSession};
pub use report::Report;
pub use sslvpn::{SessionListing, TerminatedSession};

/// Client for one FortiGate appliance
pub struct FortiGate<C: Connector, O: OutputCollector = QuiescenceCollector> {
    connector: C,
    pacer: CommandPacer<O>,
    parser: OutputParser,
    list_pace: Pace,
    dump_path: Option<PathBuf>,
}

impl<C: Connector> FortiGate<C> {
    /// Create a client using the quiescence heuristic
    pub fn new(connector: C, timing: &PacerTiming, decoder: Decoder) -> Self {
        let pacer = CommandPacer::new(timing, decoder);
        let list_pace = pacer.pace().with_initial_delay(timing.list_delay());
        Self::with_pacer(connector, pacer, list_pace)
    }
}

impl<C: Connector, O: OutputCollector> FortiGate<C, O> {
    /// Create a client with a custom pacer
    pub fn with_pacer(connector: C, pacer: CommandPacer<O>, list_pace: Pace) -> Self {
        Self {
            connector,
            pacer,
            parser: OutputParser::new(),
            list_pace,
            dump_path: None,
        }
    }

    /// Write the raw output of every session listing to `path`
    pub fn with_dump_path(mut self, path: Option<PathBuf>) -> Self {
        self.dump_path = path;
        self
    }

    /// Members of `group`; an unknown group has no members
    pub async fn fetch_group_members(&self, group: &str) -> Result<GroupMembers> {
        quote_cli_token("group", group)?;

        self.with_shell(|mut shell| async move {
            let result = group::fetch_members(&self.pacer, &self.parser, &mut shell, group).await;
            (shell, result)
        })
        .await
    }

    /// Remove `user` from `group`
    pub async fn revoke_member(&self, group: &str, user: &str) -> Result<RevokeOutcome> {
        quote_cli_token("group", group)?;
        quote_cli_token("user", user)?;

        self.with_shell(|mut shell| async move {
            let result =
                group::revoke_member(&self.pacer, &self.parser, &mut shell, group, user).await;
            (shell, result)
        })
        .await
    }

    /// Active SSL-VPN sessions
    pub async fn list_vpn_sessions(&self) -> Result<Vec<VpnSession>> {
        Ok(self.capture_vpn_sessions().await?.sessions)
    }

    /// Active SSL-VPN sessions along with the raw listing output
    pub async fn capture_vpn_sessions(&self) -> Result<SessionListing> {
        self.with_shell(|mut shell| async move {
            let result = self.list_on(&mut shell).await;
            (shell, result)
        })
        .await
    }

    /// Delete every SSL-VPN tunnel owned by `username`
    ///
    /// An empty result means the user had no active session.
    pub async fn terminate_vpn_sessions_by_user(
        &self,
        username: &str,
    ) -> Result<Vec<TerminatedSession>> {
        self.with_shell(|mut shell| async move {
            let result = match self.list_on(&mut shell).await {
                Ok(listing) => {
                    sslvpn::terminate_user_sessions(
                        &self.pacer,
                        &self.parser,
                        &mut shell,
                        &listing.sessions,
                        username,
                    )
                    .await
                }
                Err(e) => Err(e),
            };
            (shell, result)
        })
        .await
    }

    /// Delete the SSL-VPN tunnel at `index`; `true` if acknowledged
    pub async fn terminate_vpn_session_by_index(&self, index: &str) -> Result<bool> {
        sslvpn::validate_index(index)?;

        self.with_shell(|mut shell| async move {
            let result = sslvpn::delete_tunnel(&self.pacer, &self.parser, &mut shell, index).await;
            (shell, result)
        })
        .await
    }

    /// Open a shell, hand it to `operation` and close it once it comes back
    ///
    /// The operation returns the shell alongside its result, so the close
    /// runs on the error path too.
    async fn with_shell<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(C::Shell) -> Fut,
        Fut: Future<Output = (C::Shell, Result<T>)>,
    {
        let shell = self.connector.open().await?;
        let (mut shell, result) = operation(shell).await;
        shell.close().await;
        result
    }

    async fn list_on(&self, shell: &mut dyn ShellChannel) -> Result<SessionListing> {
        let listing =
            sslvpn::list_sessions(&self.pacer, &self.parser, shell, self.list_pace).await?;

        if let Some(path) = &self.dump_path {
            match tokio::fs::write(path, &listing.output).await {
                Ok(()) => info!("Saved session listing to {}", path.display()),
                Err(e) => warn!("Failed to write {}: {}", path.display(), e),
            }
        }

        Ok(listing)
    }
}

/// Double-quote a name for the CLI, refusing text that would break out of it
pub(crate) fn quote_cli_token(name: &str, value: &str) -> Result<String> {
    if value.is_empty() || value.contains(|c| matches!(c, '"' | '\\' | '\r' | '\n')) {
        return Err(ProtocolError::InvalidArgument {
            name: name.to_string(),
            value: value.to_string(),
        }
        .into());
    }
    Ok(format!("\"{}\"", value))
}
