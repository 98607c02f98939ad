//! SSL-VPN session operations

use crate::appliance::output_parser::{OutputParser, VpnSession};
use crate::error::{ProtocolError, Result};
use crate::shell::{CommandPacer, OutputCollector, Pace, ShellChannel};
use serde::Serialize;
use tracing::{info, warn};

pub const LIST_COMMAND: &str = "execute vpn sslvpn list";
const DELETE_TUNNEL_COMMAND: &str = "execute vpn sslvpn del-tunnel";

/// A session a `del-tunnel` was issued for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminatedSession {
    pub index: String,
    pub username: String,
    /// Whether the appliance acknowledged the deletion
    pub confirmed: bool,
}

/// Raw listing output together with the rows parsed from it
#[derive(Debug, Clone)]
pub struct SessionListing {
    pub output: String,
    pub sessions: Vec<VpnSession>,
}

/// Run the session listing and parse it
pub async fn list_sessions<O: OutputCollector>(
    pacer: &CommandPacer<O>,
    parser: &OutputParser,
    shell: &mut dyn ShellChannel,
    pace: Pace,
) -> Result<SessionListing> {
    let output = pacer.send_paced(shell, LIST_COMMAND, pace).await?;
    let sessions = parser.parse_sessions(&output);
    info!("Found {} active SSL-VPN session(s)", sessions.len());

    Ok(SessionListing { output, sessions })
}

/// Delete every tunnel owned by `username`, one at a time
///
/// Returns the sessions a deletion was issued for; empty when the user has
/// no active session.
pub async fn terminate_user_sessions<O: OutputCollector>(
    pacer: &CommandPacer<O>,
    parser: &OutputParser,
    shell: &mut dyn ShellChannel,
    sessions: &[VpnSession],
    username: &str,
) -> Result<Vec<TerminatedSession>> {
    let mut terminated = Vec::new();

    for session in sessions.iter().filter(|s| s.belongs_to(username)) {
        info!(
            "Terminating session {} for user {}",
            session.index, session.username
        );
        let confirmed = delete_tunnel(pacer, parser, shell, &session.index).await?;
        if !confirmed {
            warn!(
                "Deletion of session {} was not acknowledged by the appliance",
                session.index
            );
        }

        terminated.push(TerminatedSession {
            index: session.index.clone(),
            username: session.username.clone(),
            confirmed,
        });
    }

    Ok(terminated)
}

/// Issue `del-tunnel <index>` and report whether it was acknowledged
pub async fn delete_tunnel<O: OutputCollector>(
    pacer: &CommandPacer<O>,
    parser: &OutputParser,
    shell: &mut dyn ShellChannel,
    index: &str,
) -> Result<bool> {
    validate_index(index)?;
    let output = pacer
        .send(shell, &format!("{} {}", DELETE_TUNNEL_COMMAND, index))
        .await?;
    Ok(parser.tunnel_deleted(&output))
}

/// Tunnel indexes are plain decimal numbers
pub fn validate_index(index: &str) -> Result<()> {
    if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
        return Err(ProtocolError::InvalidArgument {
            name: "session index".to_string(),
            value: index.to_string(),
        }
        .into());
    }
    Ok(())
}
