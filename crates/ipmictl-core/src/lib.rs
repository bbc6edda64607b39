//! ipmictl-core: Out-of-band cluster management through ipmitool
//!
//! Host-set expansion, controller naming, credentials, FRU parsing and the
//! per-verb handlers that drive `ipmitool`, `conman` and `fping`.

pub mod action;
pub mod bmc;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod fru;
pub mod hostlist;
pub mod ipmi;

pub use action::Action;
pub use bmc::management_hostname;
pub use config::Config;
pub use credentials::Credentials;
pub use dispatch::{Outcome, dispatch};
pub use error::IpmiError;
pub use fru::{MacAddress, MacPair};
pub use hostlist::NodeSet;
pub use ipmi::{ConsoleRoute, HostMacs, HostOutcome, IpmiTool, Session};
