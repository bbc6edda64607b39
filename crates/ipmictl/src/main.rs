//! ipmictl
//!
//! Power, boot, console and inventory control of cluster nodes through
//! their management controllers

use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ipmictl_core::{Config, HostMacs, IpmiTool, dispatch};
use ipmictl_exec::{CommandRunner, LocalRunner};

mod cli;

use cli::{Cli, normalize_args};

/// `RUST_LOG` wins; otherwise warnings, or more with `-v`
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_macs(host: &HostMacs) {
    println!("{}:", host.bmc);
    println!("  eth0's MAC address is {}", host.macs.first);
    println!("  eth1's MAC address is {}", host.macs.second);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_tracing(cli.verbose);
    debug!(args = ?std::env::args_os().collect::<Vec<_>>(), "starting");

    let config = Config::load_default(cli.config.as_deref())?;
    let runner = Arc::new(LocalRunner::new());
    debug!(runner = runner.runner_type(), config = ?config, "configured");
    let tool = IpmiTool::new(runner, &config);

    let (action, hostlist) = cli.command.action();
    dispatch(&tool, action, hostlist, print_macs).await?;

    Ok(())
}
