//! fortictl - FortiGate group and SSL-VPN automation over SSH
//!
//! Each invocation opens one SSH shell on the appliance, runs one operation
//! and prints exactly one JSON result on stdout. Logs go to stderr.

use clap::{Parser, Subcommand};
use fortictl_core::init_logging;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "fortictl", version)]
#[command(about = "Manage FortiGate user-group membership and SSL-VPN sessions over SSH")]
struct Cli {
    /// Log every step at debug level (stderr)
    #[arg(long, global = true)]
    verbose: bool,

    /// Write the raw session-list output to this file
    #[arg(long, global = true, value_name = "PATH")]
    dump: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the members of a user group
    Members {
        /// User group name
        group: String,
    },
    /// Remove a user from a user group
    Revoke {
        /// User group name
        group: String,
        /// Member to remove
        user: String,
    },
    /// List active SSL-VPN sessions
    List,
    /// Terminate every SSL-VPN session of a user
    Terminate {
        /// Login name; a domain suffix (user@domain) also matches
        username: String,
    },
    /// Terminate one SSL-VPN session by its index
    TerminateIndex {
        /// Session index as shown by `list`
        #[arg(value_parser = cli::vpn::parse_index)]
        index: String,
    },
    /// Show the raw session-list output next to the parsed sessions
    Debug,
}

#[tokio::main]
async fn main() {
    // Usage errors exit here with status 2
    let cli = Cli::parse();

    for env_file in [".env.local", ".env"] {
        if dotenvy::from_filename(env_file).is_ok() {
            break;
        }
    }

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(cli::EXIT_CONFIG);
    }

    let dump = cli.dump;
    let exit_code = match cli.command {
        Commands::Members { group } => cli::group::run_members(dump, group).await,
        Commands::Revoke { group, user } => cli::group::run_revoke(dump, group, user).await,
        Commands::List => cli::vpn::run_list(dump).await,
        Commands::Terminate { username } => cli::vpn::run_terminate(dump, username).await,
        Commands::TerminateIndex { index } => cli::vpn::run_terminate_index(dump, index).await,
        Commands::Debug => cli::vpn::run_debug(dump).await,
    };

    std::process::exit(exit_code);
}
