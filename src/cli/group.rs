//! User-group commands

use fortictl_core::appliance::report::{ActionReport, MembersReport};
use std::path::PathBuf;
use tracing::info;

/// Run the members command
pub async fn run_members(dump: Option<PathBuf>, group: String) -> i32 {
    super::run(dump, |fortigate| async move {
        info!("Fetching members of group '{}'", group);
        MembersReport::from_result(fortigate.fetch_group_members(&group).await)
    })
    .await
}

/// Run the revoke command
pub async fn run_revoke(dump: Option<PathBuf>, group: String, user: String) -> i32 {
    super::run(dump, |fortigate| async move {
        info!("Revoking '{}' from group '{}'", user, group);
        let result = fortigate.revoke_member(&group, &user).await;
        ActionReport::revoke(&group, &user, result)
    })
    .await
}
