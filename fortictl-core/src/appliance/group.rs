//! User-group membership operations
//!
//! Reads a group's member list from `config user group` and rewrites it to
//! drop one user.
//!
//! The rewrite is `unset member` followed by `set member <remaining>`; the
//! appliance offers no transaction around the pair, so a session lost between
//! the two commands leaves the group empty.

use crate::appliance::output_parser::OutputParser;
use crate::appliance::quote_cli_token;
use crate::error::Result;
use crate::shell::{CommandPacer, OutputCollector, ShellChannel};
use serde::Serialize;
use tracing::{debug, info};

const CONFIG_SCOPE: &str = "config user group";

/// Members of one user group, in appliance order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupMembers {
    pub group: String,
    pub members: Vec<String>,
}

/// Result of a revoke attempt that reached the appliance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevokeOutcome {
    /// The user was removed; `remaining` is the member list written back
    Removed { remaining: Vec<String> },
    /// The group has no `set member` line at all
    NoMembers,
    /// The group has members, but not this user
    NotInGroup,
}

/// Show a group and return its members, leaving the `config` scope
pub async fn fetch_members<O: OutputCollector>(
    pacer: &CommandPacer<O>,
    parser: &OutputParser,
    shell: &mut dyn ShellChannel,
    group: &str,
) -> Result<GroupMembers> {
    let mut output = show_group(pacer, shell, group).await?;
    output.push_str(&pacer.send(shell, "end").await?);

    let members = parser.parse_members(&output);
    info!("Group '{}' has {} member(s)", group, members.len());

    Ok(GroupMembers {
        group: group.to_string(),
        members,
    })
}

/// Remove `user` from `group` by rewriting the member list
pub async fn revoke_member<O: OutputCollector>(
    pacer: &CommandPacer<O>,
    parser: &OutputParser,
    shell: &mut dyn ShellChannel,
    group: &str,
    user: &str,
) -> Result<RevokeOutcome> {
    let quoted_user = quote_cli_token("user", user)?;

    // Stay inside `config user group` so the edit below is valid
    let output = show_group(pacer, shell, group).await?;
    let members = parser.parse_members(&output);

    if members.is_empty() {
        return Ok(RevokeOutcome::NoMembers);
    }
    if !members.iter().any(|m| m == user) {
        debug!("'{}' not found among {:?}", user, members);
        return Ok(RevokeOutcome::NotInGroup);
    }

    let remaining: Vec<String> = members.into_iter().filter(|m| m != user).collect();
    let quoted_group = quote_cli_token("group", group)?;

    pacer.send(shell, &format!("edit {}", quoted_group)).await?;
    pacer.send(shell, "unset member").await?;
    if !remaining.is_empty() {
        pacer.send(shell, &set_member_command(&remaining)).await?;
    }
    pacer.send(shell, "next").await?;
    pacer.send(shell, "end").await?;

    info!(
        "Removed {} from group '{}', {} member(s) remain",
        quoted_user,
        group,
        remaining.len()
    );
    Ok(RevokeOutcome::Removed { remaining })
}

/// `config user group` / `edit "<group>"` / `show`, outputs concatenated
async fn show_group<O: OutputCollector>(
    pacer: &CommandPacer<O>,
    shell: &mut dyn ShellChannel,
    group: &str,
) -> Result<String> {
    let edit = format!("edit {}", quote_cli_token("group", group)?);

    let mut output = String::new();
    for command in [CONFIG_SCOPE, edit.as_str(), "show"] {
        output.push_str(&pacer.send(shell, command).await?);
    }
    Ok(output)
}

fn set_member_command(members: &[String]) -> String {
    let quoted: Vec<String> = members.iter().map(|m| format!("\"{}\"", m)).collect();
    format!("set member {}", quoted.join(" "))
}
