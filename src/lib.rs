#![deny(clippy::all)]

#[macro_use]
extern crate fomat_macros;

#[macro_use]
extern crate log;

/// Accounts configured in the daemon
pub mod account;

/// Calls handled by the daemon
pub mod call;

/// Features specific to the DBus client of the daemon
pub mod client;

/// Errors raised while controlling the daemon
pub mod error;

/// Miscellaneous functions used throughout the library.
pub mod misc;

use std::time::Duration;

pub use self::error::{CtrlError, ErrorKind, Help};

pub static DBUS_NAME: &str = "cx.ring.Ring";

pub static CONFIGURATION_PATH: &str = "/cx/ring/Ring/ConfigurationManager";
pub static CONFIGURATION_IFACE: &str = "cx.ring.Ring.ConfigurationManager";

pub static CALL_MANAGER_PATH: &str = "/cx/ring/Ring/CallManager";
pub static CALL_MANAGER_IFACE: &str = "cx.ring.Ring.CallManager";

/// Environment variable naming the account to use when none is given on the command line.
pub const ACCOUNT_ENV: &str = "JAMICTRL_ACCOUNT";

pub const TIMEOUT: Duration = Duration::from_secs(5);
