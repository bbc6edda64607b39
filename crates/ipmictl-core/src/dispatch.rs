//! Verb dispatch

use tracing::debug;

use crate::action::Action;
use crate::error::{IpmiError, Result};
use crate::ipmi::{ConsoleRoute, HostMacs, HostOutcome, IpmiTool, Session};

/// What a dispatched verb produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Per-host ipmitool exit statuses
    Hosts(Vec<HostOutcome>),
    /// MAC addresses read by `getmac`
    Macs(Vec<HostMacs>),
    /// Console session ended
    Console(ConsoleRoute),
    /// fping exit status
    Ping(i32),
}

/// Run the handler for `action` against `hostlist`
///
/// `on_mac` is called for each host as soon as `getmac` has read it.
///
/// # Errors
/// `setpwd` always fails before doing anything; other verbs fail on the
/// fatal conditions of their handler
pub async fn dispatch<F>(
    tool: &IpmiTool,
    action: Action,
    hostlist: &str,
    on_mac: F,
) -> Result<Outcome>
where
    F: FnMut(&HostMacs) + Send,
{
    debug!(%action, hostlist, "dispatching");

    match action {
        Action::SetPwd => Err(IpmiError::NotImplemented("Not tested!")),
        Action::Connect => tool.connect(hostlist).await.map(Outcome::Console),
        Action::GetMac => tool.getmac_with(hostlist, on_mac).await.map(Outcome::Macs),
        Action::Ping => tool
            .ping(hostlist)
            .await
            .map(|result| Outcome::Ping(result.status)),
        _ => {
            let args = action
                .ipmi_args()
                .ok_or_else(|| IpmiError::NotImplemented("verb has no ipmitool mapping"))?;
            tool.ipmi_do(hostlist, Session::Batch, args)
                .await
                .map(Outcome::Hosts)
        }
    }
}
