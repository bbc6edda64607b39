//! ipmictl-exec: External process execution
//!
//! Provides the runner trait and a local implementation for invoking
//! `ipmitool`, `conman`, `fping` and friends

pub mod error;
pub mod local;
pub mod result;
pub mod traits;

pub use error::ExecError;
pub use local::LocalRunner;
pub use result::{CommandResult, CommandSpec, IoMode};
pub use traits::CommandRunner;
