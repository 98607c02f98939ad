//! SSL-VPN session commands

use fortictl_core::appliance::report::{ActionReport, DebugReport, SessionListReport};
use fortictl_core::appliance::sslvpn::validate_index;
use std::path::PathBuf;
use tracing::info;

/// clap value parser for session indexes
pub fn parse_index(value: &str) -> Result<String, String> {
    validate_index(value)
        .map(|()| value.to_string())
        .map_err(|_| format!("'{}' is not a session index (expected digits)", value))
}

/// Run the list command
pub async fn run_list(dump: Option<PathBuf>) -> i32 {
    super::run(dump, |fortigate| async move {
        SessionListReport::from_result(fortigate.list_vpn_sessions().await)
    })
    .await
}

/// Run the terminate command
pub async fn run_terminate(dump: Option<PathBuf>, username: String) -> i32 {
    super::run(dump, |fortigate| async move {
        info!("Terminating SSL-VPN sessions of '{}'", username);
        let result = fortigate.terminate_vpn_sessions_by_user(&username).await;
        ActionReport::terminate_user(&username, result)
    })
    .await
}

/// Run the terminate-index command
pub async fn run_terminate_index(dump: Option<PathBuf>, index: String) -> i32 {
    super::run(dump, |fortigate| async move {
        info!("Terminating SSL-VPN session {}", index);
        let result = fortigate.terminate_vpn_session_by_index(&index).await;
        ActionReport::terminate_index(&index, result)
    })
    .await
}

/// Run the debug command
pub async fn run_debug(dump: Option<PathBuf>) -> i32 {
    super::run(dump, |fortigate| async move {
        DebugReport::from_result(fortigate.capture_vpn_sessions().await)
    })
    .await
}
