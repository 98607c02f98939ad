//! Structured results printed by the command-line surface
//!
//! Every operation ends in exactly one of these values. Errors never escape:
//! they become the failure variant of the report for that operation.

use crate::appliance::group::{GroupMembers, RevokeOutcome};
use crate::appliance::output_parser::VpnSession;
use crate::appliance::sslvpn::{SessionListing, TerminatedSession, LIST_COMMAND};
use crate::error::{FortiError, Result};
use serde::Serialize;
use tracing::error;

/// A JSON result that can also describe a failure
pub trait Report: Serialize + Sized {
    /// Failure report for an error that stopped the operation
    fn from_error(error: &FortiError) -> Self;
}

fn failure_message(error: &FortiError) -> String {
    error!("Operation failed: {}", error);
    format!("Error: {}", error)
}

/// `{group, members}` or `{error}`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MembersReport {
    Members(GroupMembers),
    Error { error: String },
}

impl MembersReport {
    pub fn from_result(result: Result<GroupMembers>) -> Self {
        match result {
            Ok(members) => MembersReport::Members(members),
            Err(e) => Self::from_error(&e),
        }
    }
}

impl Report for MembersReport {
    fn from_error(error: &FortiError) -> Self {
        MembersReport::Error {
            error: failure_message(error),
        }
    }
}

/// `{success, message, terminatedSessions?}`
#[derive(Debug, Serialize)]
pub struct ActionReport {
    pub success: bool,
    pub message: String,
    #[serde(rename = "terminatedSessions", skip_serializing_if = "Option::is_none")]
    pub terminated_sessions: Option<Vec<TerminatedSession>>,
}

impl ActionReport {
    fn new(success: bool, message: String) -> Self {
        Self {
            success,
            message,
            terminated_sessions: None,
        }
    }

    pub fn revoke(group: &str, user: &str, result: Result<RevokeOutcome>) -> Self {
        match result {
            Ok(RevokeOutcome::Removed { .. }) => Self::new(
                true,
                format!("User '{}' has been removed from the group '{}'.", user, group),
            ),
            Ok(RevokeOutcome::NoMembers) => {
                Self::new(false, "No members found in the group.".to_string())
            }
            Ok(RevokeOutcome::NotInGroup) => {
                Self::new(false, format!("The user '{}' is not in the group.", user))
            }
            Err(e) => Self::from_error(&e),
        }
    }

    pub fn terminate_user(username: &str, result: Result<Vec<TerminatedSession>>) -> Self {
        match result {
            Ok(terminated) if terminated.is_empty() => Self::new(
                false,
                format!("No active VPN sessions found for user '{}'", username),
            ),
            Ok(terminated) => Self {
                success: true,
                message: format!(
                    "Terminated {} VPN sessions for user '{}'",
                    terminated.len(),
                    username
                ),
                terminated_sessions: Some(terminated),
            },
            Err(e) => Self::from_error(&e),
        }
    }

    pub fn terminate_index(index: &str, result: Result<bool>) -> Self {
        match result {
            Ok(true) => Self::new(true, format!("VPN session {} terminated", index)),
            Ok(false) => Self::new(
                false,
                format!("Failed to terminate VPN session {}", index),
            ),
            Err(e) => Self::from_error(&e),
        }
    }
}

impl Report for ActionReport {
    fn from_error(error: &FortiError) -> Self {
        Self::new(false, failure_message(error))
    }
}

/// `{success, sessions}` or `{success: false, message}`
#[derive(Debug, Serialize)]
pub struct SessionListReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<VpnSession>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SessionListReport {
    pub fn from_result(result: Result<Vec<VpnSession>>) -> Self {
        match result {
            Ok(sessions) => Self {
                success: true,
                sessions: Some(sessions),
                message: None,
            },
            Err(e) => Self::from_error(&e),
        }
    }
}

impl Report for SessionListReport {
    fn from_error(error: &FortiError) -> Self {
        Self {
            success: false,
            sessions: None,
            message: Some(failure_message(error)),
        }
    }
}

/// Raw listing output echoed next to the parsed rows
#[derive(Debug, Serialize)]
pub struct DebugReport {
    pub success: bool,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<VpnSession>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DebugReport {
    pub fn from_result(result: Result<SessionListing>) -> Self {
        match result {
            Ok(listing) => Self {
                success: true,
                command: LIST_COMMAND.to_string(),
                output: Some(listing.output),
                sessions: Some(listing.sessions),
                message: None,
            },
            Err(e) => Self::from_error(&e),
        }
    }
}

impl Report for DebugReport {
    fn from_error(error: &FortiError) -> Self {
        Self {
            success: false,
            command: LIST_COMMAND.to_string(),
            output: None,
            sessions: None,
            message: Some(failure_message(error)),
        }
    }
}
