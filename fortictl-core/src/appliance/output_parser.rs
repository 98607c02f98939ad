//! Parsers for scraped FortiGate CLI output
//!
//! Two grammars, chosen by the caller: the `set member` line of a
//! `config user group` dump, and the table printed by
//! `execute vpn sslvpn list`. Unrecognised text yields no records rather
//! than an error.

use regex::Regex;
use serde::Serialize;

/// Header line of the session table
const SESSION_HEADER_MARKER: &str = "Index";
/// Title banner above the session table
const SESSION_BANNER_MARKER: &str = "SSL-VPN Login Users";

/// One row of `execute vpn sslvpn list`
///
/// Columns are taken by position; trailing columns missing from the row are
/// left out rather than filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpnSession {
    /// Appliance-assigned index; not stable across listings
    pub index: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_ip: Option<String>,
}

impl VpnSession {
    /// Build a session from whitespace-separated columns
    ///
    /// Returns `None` unless there are at least two columns and the first one
    /// is a decimal index.
    pub fn from_columns(columns: &[&str]) -> Option<Self> {
        let (index, username) = match columns {
            [index, username, ..] if is_index(index) => (*index, *username),
            _ => return None,
        };

        let column = |position: usize| columns.get(position).map(|c| c.to_string());

        Some(Self {
            index: index.to_string(),
            username: username.to_string(),
            group: column(2),
            auth_type: column(3),
            timeout: column(5),
            from_ip: column(7),
        })
    }

    /// Whether this session belongs to `target`
    ///
    /// Matches case-insensitively, and also when `target` carries a domain
    /// suffix the appliance dropped (`alice@corp.com` owns session `alice`).
    pub fn belongs_to(&self, target: &str) -> bool {
        let session_user = self.username.to_lowercase();
        let target = target.to_lowercase();

        session_user == target || target.starts_with(&format!("{}@", session_user))
    }
}

fn is_index(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Parser for FortiGate CLI output
pub struct OutputParser {
    /// Pattern for the `set member "a" "b"` line of a group dump
    member_line_pattern: Regex,
    /// Pattern for one double-quoted token
    quoted_pattern: Regex,
    /// Pattern for `tunnel deleted` / `ok` acknowledgements
    tunnel_deleted_pattern: Regex,
}

impl OutputParser {
    /// Create a new OutputParser with compiled regex patterns
    pub fn new() -> Self {
        Self {
            member_line_pattern: Regex::new(r"(?m)set member(.*)$")
                .expect("Failed to compile member_line pattern"),
            quoted_pattern: Regex::new(r#""([^"]+)""#).expect("Failed to compile quoted pattern"),
            tunnel_deleted_pattern: Regex::new(r"(?i)tunnel deleted|ok")
                .expect("Failed to compile tunnel_deleted pattern"),
        }
    }

    /// Extract group members from a `show` dump
    ///
    /// Order and duplicates are kept. No `set member` line means no members.
    pub fn parse_members(&self, output: &str) -> Vec<String> {
        let Some(captures) = self.member_line_pattern.captures(output) else {
            return Vec::new();
        };

        let members = captures.get(1).map_or("", |m| m.as_str()).trim();
        self.quoted_pattern
            .captures_iter(members)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Extract sessions from `execute vpn sslvpn list` output
    pub fn parse_sessions(&self, output: &str) -> Vec<VpnSession> {
        output
            .lines()
            .filter(|line| {
                !line.contains(SESSION_HEADER_MARKER)
                    && !line.contains(SESSION_BANNER_MARKER)
                    && !line.trim().is_empty()
            })
            .filter_map(|line| {
                let columns: Vec<&str> = line.split_whitespace().collect();
                VpnSession::from_columns(&columns)
            })
            .collect()
    }

    /// Whether `del-tunnel` output acknowledges the deletion
    ///
    /// The CLI prints no structured status; any `tunnel deleted` or `ok`
    /// (case-insensitive) counts as success.
    pub fn tunnel_deleted(&self, output: &str) -> bool {
        self.tunnel_deleted_pattern.is_match(output)
    }
}

impl Default for OutputParser {
    fn default() -> Self {
        Self::new()
    }
}
