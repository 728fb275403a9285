pub mod address_table;

use bon::Builder;
use std::path::{Path, PathBuf};

pub use address_table::{AddressTable, RoutedAddress, addresses_for_network};

pub const DEFAULT_ROUTING_FILE: &str = "/etc/sysconfig/routed-ips";
pub const DEFAULT_ENV_FILE: &str = "/etc/sysconfig/libvirt-nethook-helper";
pub const DEFAULT_IP_COMMAND: &str = "/sbin/ip";
pub const DEFAULT_IPTABLES_COMMAND: &str = "/sbin/iptables";
pub const DEFAULT_IP6TABLES_COMMAND: &str = "/sbin/ip6tables";
pub const FORWARD_CHAIN: &str = "FORWARD";

/// Locations of the external tools the hook drives
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ToolPaths {
    #[builder(into, default = PathBuf::from(DEFAULT_IP_COMMAND))]
    pub ip: PathBuf,
    #[builder(into, default = PathBuf::from(DEFAULT_IPTABLES_COMMAND))]
    pub iptables: PathBuf,
    #[builder(into, default = PathBuf::from(DEFAULT_IP6TABLES_COMMAND))]
    pub ip6tables: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Resolved runtime settings for one hook invocation
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct Settings {
    #[builder(into, default = PathBuf::from(DEFAULT_ROUTING_FILE))]
    pub routing_file: PathBuf,
    #[builder(default)]
    pub tools: ToolPaths,
}

impl Default for Settings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Load sysconfig-style `KEY=value` overrides into the process environment.
///
/// Variables that are already set win over the file.
pub fn load_env_file(path: &Path) {
    if let Err(e) = dotenvy::from_path(path) {
        // The environment file is optional
        if !e.not_found() {
            eprintln!("Error loading {}: {}", path.display(), e);
        }
    }
}
