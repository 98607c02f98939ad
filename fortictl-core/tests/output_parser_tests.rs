// Unit tests for OutputParser

use fortictl_core::appliance::{OutputParser, VpnSession};

#[test]
fn test_parse_members_in_order() {
    let parser = OutputParser::new();
    let output = "    edit \"vpn-users\"\r\n        set member \"a\" \"b\" \"c\"\r\n    next\r\n";

    assert_eq!(parser.parse_members(output), vec!["a", "b", "c"]);
}

#[test]
fn test_parse_members_keeps_duplicates() {
    let parser = OutputParser::new();
    let output = "set member \"jdoe\" \"asmith\" \"jdoe\"";

    assert_eq!(parser.parse_members(output), vec!["jdoe", "asmith", "jdoe"]);
}

#[test]
fn test_parse_members_without_marker() {
    let parser = OutputParser::new();
    let output = "config user group\r\n    edit \"empty\"\r\n    next\r\nend\r\n";

    assert!(parser.parse_members(output).is_empty());
    assert!(parser.parse_members("").is_empty());
}

#[test]
fn test_parse_members_only_reads_member_line() {
    let parser = OutputParser::new();
    let output = "set member \"a\"\r\n    set comment \"not a member\"\r\n";

    assert_eq!(parser.parse_members(output), vec!["a"]);
}

#[test]
fn test_parse_members_with_spaces_and_domains() {
    let parser = OutputParser::new();
    let output = "set member \"Jane Doe\" \"jdoe@corp.example.com\"";

    assert_eq!(
        parser.parse_members(output),
        vec!["Jane Doe", "jdoe@corp.example.com"]
    );
}

#[test]
fn test_parse_full_session_row() {
    let parser = OutputParser::new();
    let output = "1   alice   corpgroup   local   1(1)   289   28792   10.0.0.5";
    let sessions = parser.parse_sessions(output);

    assert_eq!(
        sessions,
        vec![VpnSession {
            index: "1".to_string(),
            username: "alice".to_string(),
            group: Some("corpgroup".to_string()),
            auth_type: Some("local".to_string()),
            timeout: Some("289".to_string()),
            from_ip: Some("10.0.0.5".to_string()),
        }]
    );
}

#[test]
fn test_parse_sessions_skips_header_banner_and_blank_lines() {
    let parser = OutputParser::new();
    let output = "SSL-VPN Login Users:\n Index   User   Group\n\n   \n0   alice   corpgroup\n";
    let sessions = parser.parse_sessions(output);

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].index, "0");
    assert_eq!(sessions[0].username, "alice");
}

#[test]
fn test_parse_sessions_requires_numeric_index() {
    let parser = OutputParser::new();
    let output = "FGT-LAB # execute vpn sslvpn list\nx1   mallory   grp\n7\n";

    assert!(parser.parse_sessions(output).is_empty());
}

#[test]
fn test_short_row_omits_missing_fields() {
    let parser = OutputParser::new();
    let sessions = parser.parse_sessions("4   carol");

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].group, None);
    assert_eq!(sessions[0].auth_type, None);
    assert_eq!(sessions[0].timeout, None);
    assert_eq!(sessions[0].from_ip, None);
}

#[test]
fn test_short_row_serializes_without_nulls() {
    let session = VpnSession::from_columns(&["4", "carol", "staff"]).unwrap();
    let json = serde_json::to_value(&session).unwrap();

    assert_eq!(
        json,
        serde_json::json!({"index": "4", "username": "carol", "group": "staff"})
    );
}

#[test]
fn test_username_match_rules() {
    let session = VpnSession::from_columns(&["0", "alice"]).unwrap();

    assert!(session.belongs_to("alice"));
    assert!(session.belongs_to("ALICE"));
    assert!(session.belongs_to("alice@corp.com"));
    assert!(!session.belongs_to("bob"));
    assert!(!session.belongs_to("alic"));
    assert!(!session.belongs_to("alice2@corp.com"));
}

#[test]
fn test_domain_suffixed_session_user() {
    let session = VpnSession::from_columns(&["0", "Alice@Corp.com"]).unwrap();

    assert!(session.belongs_to("alice@corp.com"));
    assert!(!session.belongs_to("alice"));
}

#[test]
fn test_tunnel_deleted_acknowledgement() {
    let parser = OutputParser::new();

    assert!(parser.tunnel_deleted("Tunnel deleted\r\n"));
    assert!(parser.tunnel_deleted("OK"));
    assert!(!parser.tunnel_deleted("Command fail. Return code -61\r\n"));
    assert!(!parser.tunnel_deleted(""));
}
