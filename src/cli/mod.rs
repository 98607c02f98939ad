//! CLI command implementations
//!
//! Every command prints exactly one JSON report on stdout. Operational
//! failures are reported in the payload with exit status 0; only a
//! configuration that cannot be loaded exits non-zero.

pub mod group;
pub mod vpn;

use fortictl_core::appliance::{FortiGate, Report};
use fortictl_core::config::toml_config::load_config;
use fortictl_core::error::FortiError;
use fortictl_core::shell::{Decoder, SshConnector};
use std::future::Future;
use std::path::PathBuf;
use tracing::error;

pub const EXIT_OK: i32 = 0;
pub const EXIT_CONFIG: i32 = 2;

/// Build an appliance client from the configuration file and environment
fn client(dump: Option<PathBuf>) -> Result<FortiGate<SshConnector>, FortiError> {
    let settings = load_config()?;
    let connector = SshConnector::new(settings.appliance, &settings.timing);
    let decoder = Decoder::new(settings.decoder.encodings);

    Ok(FortiGate::new(connector, &settings.timing, decoder)
        .with_dump_path(dump.or(settings.dump_path)))
}

/// Print a report as one line of JSON
fn emit<R: Report>(report: &R) {
    match serde_json::to_string(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to serialize result: {}", e);
            println!(r#"{{"success":false,"message":"Failed to serialize result"}}"#);
        }
    }
}

/// Run one operation and print its report, returning the exit status
async fn run<R, F, Fut>(dump: Option<PathBuf>, operation: F) -> i32
where
    R: Report,
    F: FnOnce(FortiGate<SshConnector>) -> Fut,
    Fut: Future<Output = R>,
{
    match client(dump) {
        Ok(fortigate) => {
            emit(&operation(fortigate).await);
            EXIT_OK
        }
        Err(e) => {
            emit(&R::from_error(&e));
            EXIT_CONFIG
        }
    }
}
