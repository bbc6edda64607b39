//! Verbs accepted on the command line and what each one runs

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One ipmictl verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Attach to the serial console (conman or SOL)
    Connect,
    /// Tear down an active SOL session
    Deconnect,
    On,
    Off,
    Reboot,
    Status,
    /// Change controller credentials (disabled)
    SetPwd,
    /// Read onboard MAC addresses from FRU data
    GetMac,
    /// Next boot from network
    Pxe,
    /// Next boot from disk
    Disk,
    /// Reachability check through fping
    Ping,
    /// Turn on the chassis identify light
    Blink,
    /// Switch the controller's LAN channel to DHCP
    ImmDhcp,
    /// Next boot into BIOS setup
    Bios,
}

impl Action {
    /// Every verb, in usage order
    pub const ALL: [Action; 14] = [
        Action::Connect,
        Action::Deconnect,
        Action::On,
        Action::Off,
        Action::Reboot,
        Action::Status,
        Action::SetPwd,
        Action::GetMac,
        Action::Pxe,
        Action::Disk,
        Action::Ping,
        Action::Blink,
        Action::ImmDhcp,
        Action::Bios,
    ];

    /// Command-line spelling
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Connect => "connect",
            Action::Deconnect => "deconnect",
            Action::On => "on",
            Action::Off => "off",
            Action::Reboot => "reboot",
            Action::Status => "status",
            Action::SetPwd => "setpwd",
            Action::GetMac => "getmac",
            Action::Pxe => "pxe",
            Action::Disk => "disk",
            Action::Ping => "ping",
            Action::Blink => "blink",
            Action::ImmDhcp => "immdhcp",
            Action::Bios => "bios",
        }
    }

    /// ipmitool sub-command for verbs that map to one plain per-host call
    ///
    /// `None` for verbs with their own handler.
    #[must_use]
    pub fn ipmi_args(self) -> Option<&'static [&'static str]> {
        let args: &'static [&'static str] = match self {
            Action::Deconnect => &["sol", "deactivate"],
            Action::On => &["power", "on"],
            Action::Off => &["power", "off"],
            Action::Reboot => &["chassis", "power", "reset"],
            Action::Status => &["power", "status"],
            Action::Pxe => &["chassis", "bootdev", "pxe"],
            Action::Disk => &["chassis", "bootdev", "disk"],
            Action::Blink => &["chassis", "identify", "1"],
            Action::ImmDhcp => &["lan", "set", "1", "ipsrc", "dhcp"],
            Action::Bios => &["chassis", "bootparam", "set", "bootflag", "force_bios"],
            Action::Connect | Action::SetPwd | Action::GetMac | Action::Ping => return None,
        };
        Some(args)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown verb
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown verb: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("ON".parse::<Action>().is_err());
        assert!("node1".parse::<Action>().is_err());
    }

    #[test]
    fn test_unknown_action_message() {
        let err = "explode".parse::<Action>().unwrap_err();

        assert_eq!(err, UnknownAction("explode".to_string()));
        assert_eq!(err.to_string(), "unknown verb: explode");
    }

    #[test]
    fn test_ipmi_args() {
        assert_eq!(Action::Reboot.ipmi_args(), Some(&["chassis", "power", "reset"][..]));
        assert_eq!(Action::Deconnect.ipmi_args(), Some(&["sol", "deactivate"][..]));
        assert_eq!(
            Action::Bios.ipmi_args(),
            Some(&["chassis", "bootparam", "set", "bootflag", "force_bios"][..])
        );
        assert!(Action::GetMac.ipmi_args().is_none());
        assert!(Action::SetPwd.ipmi_args().is_none());
    }
}
