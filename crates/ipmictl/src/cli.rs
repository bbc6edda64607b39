//! Command-line argument definitions (clap)

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use ipmictl_core::Action;

const ALTERNATIVE_USAGE: &str = "\
Alternative word order:
  ipmictl <HOST> connect
  ipmictl <HOSTLIST> <deconnect|on|off|reboot|status|setpwd|getmac|pxe|disk|ping|blink|immdhcp|bios>

HOSTLIST accepts node sets such as node[01-12,20],admin1";

#[derive(Parser, Debug)]
#[command(name = "ipmictl", version)]
#[command(about = "Manage and query cluster nodes through their management controllers")]
#[command(after_help = ALTERNATIVE_USAGE)]
pub struct Cli {
    /// Configuration file (defaults to $IPMICTL_CONFIG, ./ipmictl.toml, /etc/ipmictl/ipmictl.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Attach to the serial console of one host
    #[command(name = "connect")]
    Connect { host: String },

    /// Close serial-over-LAN sessions
    #[command(name = "deconnect")]
    Deconnect { hostlist: String },

    /// Power on
    #[command(name = "on")]
    On { hostlist: String },

    /// Power off
    #[command(name = "off")]
    Off { hostlist: String },

    /// Hard reset
    #[command(name = "reboot")]
    Reboot { hostlist: String },

    /// Show power status
    #[command(name = "status")]
    Status { hostlist: String },

    /// Set controller credentials (disabled)
    #[command(name = "setpwd")]
    SetPwd { hostlist: String },

    /// Print the MAC addresses of the first two interfaces
    #[command(name = "getmac")]
    GetMac { hostlist: String },

    /// Boot from network next time
    #[command(name = "pxe")]
    Pxe { hostlist: String },

    /// Boot from disk next time
    #[command(name = "disk")]
    Disk { hostlist: String },

    /// Check reachability with fping
    #[command(name = "ping")]
    Ping { hostlist: String },

    /// Light the chassis identify LED
    #[command(name = "blink")]
    Blink { hostlist: String },

    /// Switch the controller network to DHCP
    #[command(name = "immdhcp")]
    ImmDhcp { hostlist: String },

    /// Enter BIOS setup on next boot
    #[command(name = "bios")]
    Bios { hostlist: String },
}

impl Commands {
    /// Verb and host argument
    pub fn action(&self) -> (Action, &str) {
        match self {
            Commands::Connect { host } => (Action::Connect, host.as_str()),
            Commands::Deconnect { hostlist } => (Action::Deconnect, hostlist.as_str()),
            Commands::On { hostlist } => (Action::On, hostlist.as_str()),
            Commands::Off { hostlist } => (Action::Off, hostlist.as_str()),
            Commands::Reboot { hostlist } => (Action::Reboot, hostlist.as_str()),
            Commands::Status { hostlist } => (Action::Status, hostlist.as_str()),
            Commands::SetPwd { hostlist } => (Action::SetPwd, hostlist.as_str()),
            Commands::GetMac { hostlist } => (Action::GetMac, hostlist.as_str()),
            Commands::Pxe { hostlist } => (Action::Pxe, hostlist.as_str()),
            Commands::Disk { hostlist } => (Action::Disk, hostlist.as_str()),
            Commands::Ping { hostlist } => (Action::Ping, hostlist.as_str()),
            Commands::Blink { hostlist } => (Action::Blink, hostlist.as_str()),
            Commands::ImmDhcp { hostlist } => (Action::ImmDhcp, hostlist.as_str()),
            Commands::Bios { hostlist } => (Action::Bios, hostlist.as_str()),
        }
    }
}

fn is_verb(arg: &OsString) -> bool {
    arg.to_str().is_some_and(|s| s.parse::<Action>().is_ok())
}

/// `-c`, `--config`, or a short-flag bundle ending in `c` such as `-vc`
fn takes_config_value(arg: &str) -> bool {
    if arg == "--config" {
        return true;
    }
    arg.strip_prefix('-')
        .and_then(|flags| flags.strip_suffix('c'))
        .is_some_and(|bundle| bundle.chars().all(|f| matches!(f, 'v' | 'h' | 'V')))
}

/// Rewrite `<hostlist> <verb>` into `<verb> <hostlist>`
///
/// Only the first two positional arguments are considered, and only when
/// the first is not a verb and the second is.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().collect();

    let mut positional = Vec::with_capacity(2);
    let mut idx = 1;
    while idx < args.len() && positional.len() < 2 {
        let arg = args[idx].to_string_lossy();
        if arg == "--" {
            positional.extend((idx + 1..args.len()).take(2 - positional.len()));
            break;
        }
        if takes_config_value(&arg) {
            idx += 2;
            continue;
        }
        if !arg.starts_with('-') {
            positional.push(idx);
        }
        idx += 1;
    }

    if let [first, second] = positional[..]
        && !is_verb(&args[first])
        && is_verb(&args[second])
    {
        args.swap(first, second);
    }

    args
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_args(os(args))).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verb_first() {
        let cli = parse(&["ipmictl", "on", "node[1-4]"]);
        assert_eq!(cli.command.action(), (Action::On, "node[1-4]"));
    }

    #[test]
    fn test_hostlist_first() {
        let cli = parse(&["ipmictl", "node[1-4]", "reboot"]);
        assert_eq!(cli.command.action(), (Action::Reboot, "node[1-4]"));
    }

    #[test]
    fn test_connect_either_order() {
        assert_eq!(
            parse(&["ipmictl", "connect", "node3"]).command,
            Commands::Connect {
                host: "node3".to_string()
            }
        );
        assert_eq!(
            parse(&["ipmictl", "node3", "connect"]).command,
            Commands::Connect {
                host: "node3".to_string()
            }
        );
    }

    #[test]
    fn test_global_flags_around_swap() {
        let cli = parse(&["ipmictl", "-vv", "-c", "/tmp/on", "node1", "getmac"]);

        assert_eq!(cli.command.action(), (Action::GetMac, "node1"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/on")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_bundled_config_flag() {
        let cli = parse(&["ipmictl", "-vc", "/etc/x.toml", "node1", "on"]);

        assert_eq!(cli.command.action(), (Action::On, "node1"));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/x.toml")));
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_takes_config_value() {
        for arg in ["-c", "--config", "-vc", "-vvc"] {
            assert!(takes_config_value(arg), "{arg}");
        }
        for arg in ["-v", "-c/etc/x.toml", "--config=/etc/x.toml", "--c", "node1", "-"] {
            assert!(!takes_config_value(arg), "{arg}");
        }
    }

    #[test]
    fn test_normalize_leaves_verb_first_alone() {
        let args = os(&["ipmictl", "status", "node1"]);
        assert_eq!(normalize_args(args.clone()), args);
    }

    #[test]
    fn test_unknown_verb_rejected() {
        let unknown = normalize_args(os(&["ipmictl", "node1", "explode"]));
        assert!(Cli::try_parse_from(unknown).is_err());

        let missing_host = normalize_args(os(&["ipmictl", "on"]));
        assert!(Cli::try_parse_from(missing_host).is_err());
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(os(&["ipmictl", "--help"])).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
