//! Core library for the fortictl FortiGate automation tool
//!
//! This crate drives the FortiGate command-line interface over an interactive
//! SSH shell: it paces commands, scrapes and decodes the unframed output, and
//! parses it into typed group-membership and SSL-VPN session records.

pub mod error;
pub mod types;

pub mod appliance;
pub mod config;
pub mod shell;

/// Initialize logging infrastructure
///
/// Uses the systemd journal when running as a unit. Otherwise, or when the
/// journal socket cannot be reached, logs go to stderr, keeping stdout free
/// for the single JSON result.
pub fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::filter::LevelFilter;

    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    #[cfg(target_os = "linux")]
    {
        if std::env::var("JOURNAL_STREAM").is_ok() {
            use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

            match tracing_journald::layer() {
                Ok(journal_layer) => {
                    tracing_subscriber::registry()
                        .with(journal_layer)
                        .with(level)
                        .try_init()?;
                    return Ok(());
                }
                Err(e) => {
                    init_stderr_logging(level)?;
                    tracing::warn!("journald unavailable ({}), logging to stderr", e);
                    return Ok(());
                }
            }
        }
    }

    init_stderr_logging(level)
}

fn init_stderr_logging(
    level: tracing_subscriber::filter::LevelFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(level)
        .try_init()?;

    Ok(())
}
