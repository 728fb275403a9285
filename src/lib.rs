pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod firewall;
pub mod handlers;
pub mod libvirt;
pub mod logging;
pub mod planner;
pub mod security;

pub use error::{Error, Result};
pub use handlers::{Dispatcher, HookExit};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Identifier of every log record the hook writes
pub const SYSLOG_IDENT: &str = "libvirt-nethook-helper";
