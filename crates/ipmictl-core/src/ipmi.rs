//! ipmitool front end: per-host fan-out, console attach, FRU and ping
//!
//! Two iteration policies live here and are kept apart on purpose:
//! [`IpmiTool::ipmi_do`] is best effort (a host whose ipmitool exits
//! non-zero is logged and skipped), [`IpmiTool::getmac`] stops the whole
//! command at the first unreachable controller. Both abort immediately if
//! a binary cannot be executed.

use std::sync::Arc;

use ipmictl_exec::{CommandResult, CommandRunner, CommandSpec, IoMode};
use tracing::{debug, error, info, instrument, warn};

use crate::bmc::management_hostname;
use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::{IpmiError, Result};
use crate::fru::{FruParseError, MacPair, parse_fru_macs};
use crate::hostlist::NodeSet;

/// ipmitool binary
pub const IPMITOOL: &str = "ipmitool";
/// Environment variable ipmitool reads the password from with `-E`
pub const PASSWORD_ENV: &str = "IPMI_PASSWORD";
/// Environment variable conman reads its escape character from
pub const CONMAN_ESCAPE_ENV: &str = "CONMAN_ESCAPE";
/// Escape character for both conman and SOL sessions
pub const ESCAPE_CHAR: &str = "!";

/// How each per-host ipmitool call is attached to the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    /// Output passed through, prefixed with the controller name
    Batch,
    /// Terminal handed over to ipmitool until it exits
    Interactive,
}

/// Exit status of one per-host call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOutcome {
    /// Node name from the host set
    pub node: String,
    /// Management controller that was contacted
    pub bmc: String,
    /// ipmitool exit status (-1 if it could not be waited on)
    pub status: i32,
}

impl HostOutcome {
    /// Check if the call succeeded
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// MAC addresses read from one controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMacs {
    /// Node name from the host set
    pub node: String,
    /// Management controller that was queried
    pub bmc: String,
    /// First and second interface addresses
    pub macs: MacPair,
}

/// Which console path `connect` took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleRoute {
    /// Attached through the running conman daemon
    Conman,
    /// conman is stopped; direct serial-over-LAN session
    Sol,
}

/// Runs ipmitool (and conman/fping) against the hosts of a host set
pub struct IpmiTool {
    /// Process runner
    runner: Arc<dyn CommandRunner>,
    /// Loaded configuration
    config: Config,
}

impl IpmiTool {
    /// Create a new front end from loaded configuration
    pub fn new(runner: Arc<dyn CommandRunner>, config: &Config) -> Self {
        Self {
            runner,
            config: config.clone(),
        }
    }

    /// Management controller hostname for `node`
    pub fn bmc_hostname(&self, node: &str) -> String {
        management_hostname(node, &self.config.ipmi.prefix)
    }

    /// Credentials are read fresh for every command
    fn credentials(&self) -> Result<Credentials> {
        Credentials::load(&self.config.common.master_passwd_file)
    }

    /// `ipmitool -I <if> -H <bmc> -U <user> -E` with the password in the child env
    fn base_command(&self, bmc: &str, creds: &Credentials) -> CommandSpec {
        CommandSpec::new(IPMITOOL)
            .args([
                "-I",
                self.config.ipmi.interface.as_str(),
                "-H",
                bmc,
                "-U",
                creds.user.as_str(),
                "-E",
            ])
            .env(PASSWORD_ENV, &creds.password)
    }

    /// Full per-host invocation for a sub-command
    pub fn ipmitool_command(&self, bmc: &str, creds: &Credentials, args: &[&str]) -> CommandSpec {
        self.base_command(bmc, creds)
            .arg(format!("-e{ESCAPE_CHAR}"))
            .args(args.iter().copied())
    }

    /// FRU inventory query used by `getmac`
    pub fn fru_command(&self, bmc: &str, creds: &Credentials) -> CommandSpec {
        self.base_command(bmc, creds).args(["fru", "print", "0"])
    }

    /// Run an ipmitool sub-command once per host, best effort
    ///
    /// # Errors
    /// Fails before contacting any host on credential or hostlist errors,
    /// and stops as soon as ipmitool itself cannot be executed
    #[instrument(skip(self), level = "debug")]
    pub async fn ipmi_do(
        &self,
        hostlist: &str,
        session: Session,
        args: &[&str],
    ) -> Result<Vec<HostOutcome>> {
        let creds = self.credentials()?;
        let nodes = NodeSet::parse(hostlist)?;

        let mut outcomes = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let bmc = self.bmc_hostname(node);
            let spec = self.ipmitool_command(&bmc, &creds, args);
            debug!(command = %spec, "ipmi_do");

            let mode = match session {
                Session::Batch => IoMode::labelled(&bmc),
                Session::Interactive => IoMode::Interactive,
            };

            let status = match self.runner.run(&spec, mode).await {
                Ok(result) => result.status,
                Err(e) if e.is_missing_binary() => return Err(IpmiError::from_exec(e, &spec)),
                Err(e) => {
                    error!(host = %bmc, error = %e, "ipmitool failed");
                    -1
                }
            };

            if status != 0 {
                warn!(host = %bmc, status, "ipmitool exited non-zero, continuing");
            }

            outcomes.push(HostOutcome {
                node: node.clone(),
                bmc,
                status,
            });
        }

        Ok(outcomes)
    }

    /// Read both onboard MAC addresses from every host, failing fast
    ///
    /// # Errors
    /// Aborts on the first host whose FRU output is too short or garbled
    pub async fn getmac(&self, hostlist: &str) -> Result<Vec<HostMacs>> {
        self.getmac_with(hostlist, |_| {}).await
    }

    /// Like [`IpmiTool::getmac`], calling `report` as soon as each host is read
    ///
    /// Hosts read before a failing one have already been reported when the
    /// error is returned.
    ///
    /// # Errors
    /// Aborts on the first host whose FRU output is too short or garbled
    #[instrument(skip(self, report), level = "debug")]
    pub async fn getmac_with<F>(&self, hostlist: &str, mut report: F) -> Result<Vec<HostMacs>>
    where
        F: FnMut(&HostMacs) + Send,
    {
        let creds = self.credentials()?;
        let nodes = NodeSet::parse(hostlist)?;

        let mut found = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let bmc = self.bmc_hostname(node);
            let spec = self.fru_command(&bmc, &creds);
            debug!(command = %spec, "getmac");

            let result = self
                .runner
                .run(&spec, IoMode::Captured)
                .await
                .map_err(|e| IpmiError::from_exec(e, &spec))?;

            let macs = parse_fru_macs(&result.lines()).map_err(|e| match e {
                FruParseError::TooShort => IpmiError::Unreachable(bmc.clone()),
                FruParseError::Malformed(reason) => IpmiError::MalformedFru {
                    host: bmc.clone(),
                    reason,
                },
            })?;

            debug!(host = %bmc, first = %macs.first, second = %macs.second, "read MAC addresses");

            let host = HostMacs {
                node: node.clone(),
                bmc,
                macs,
            };
            report(&host);
            found.push(host);
        }

        Ok(found)
    }

    /// Attach to the console of exactly one host
    ///
    /// Probes `service conman status`: 0 attaches through conman, 1 or 3
    /// falls back to `sol activate`, anything else is fatal.
    ///
    /// # Errors
    /// Returns an error for host sets not expanding to exactly one host,
    /// a missing probe binary, or an unrecognised probe status
    #[instrument(skip(self), level = "debug")]
    pub async fn connect(&self, host: &str) -> Result<ConsoleRoute> {
        let nodes = NodeSet::parse(host)?;
        if nodes.len() != 1 {
            return Err(IpmiError::SingleHostRequired(nodes.len()));
        }
        let node = &nodes.as_slice()[0];

        let probe = CommandSpec::new("service").args(["conman", "status"]);
        let status = self
            .runner
            .run(&probe, IoMode::Silent)
            .await
            .map_err(|e| IpmiError::from_exec(e, &probe))?
            .status;
        debug!(command = %probe, status, "conman probe");

        match status {
            0 => {
                let conmand = self.config.require("ipmi", "conmand")?;

                let attach = CommandSpec::new("conman")
                    .args(["-d", conmand.as_str(), node.as_str()])
                    .env(CONMAN_ESCAPE_ENV, ESCAPE_CHAR);
                debug!(command = %attach, "attaching through conman");

                let result = self
                    .runner
                    .run(&attach, IoMode::Interactive)
                    .await
                    .map_err(|e| IpmiError::from_exec(e, &attach))?;
                if !result.success() {
                    warn!(host = %node, status = result.status, "conman exited non-zero");
                }
                Ok(ConsoleRoute::Conman)
            }
            1 | 3 => {
                info!(host = %node, "conman is not running, opening SOL session");
                self.ipmi_do(node, Session::Interactive, &["sol", "activate"])
                    .await?;
                Ok(ConsoleRoute::Sol)
            }
            other => Err(IpmiError::ConsoleProbeFailed {
                command: probe.to_string(),
                status: other,
            }),
        }
    }

    /// One `fping` call covering the whole host set
    ///
    /// # Errors
    /// Returns an error for invalid host sets or when fping cannot be executed
    #[instrument(skip(self), level = "debug")]
    pub async fn ping(&self, hostlist: &str) -> Result<CommandResult> {
        let nodes = NodeSet::parse(hostlist)?;

        let spec = CommandSpec::new("fping")
            .args(["-r1", "-u", "-s"])
            .args(nodes.iter());
        debug!(command = %spec, "ping");

        self.runner
            .run(&spec, IoMode::passthrough())
            .await
            .map_err(|e| IpmiError::from_exec(e, &spec))
    }
}
