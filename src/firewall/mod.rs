pub mod error;
mod parse;

use crate::command::{CommandRunner, PlannedCommand};
use crate::config::ToolPaths;
use bon::Builder;
use std::fmt;
use tracing::{debug, warn};

pub use error::{FirewallError, ParseError};
pub use parse::parse_firewall_output;

/// IP version of a routed address, chosen by the presence of `:`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub fn of(address: &str) -> Self {
        if address.contains(':') {
            AddressFamily::V6
        } else {
            AddressFamily::V4
        }
    }

    /// `ip` family switch
    pub fn ip_flag(self) -> &'static str {
        match self {
            AddressFamily::V4 => "-4",
            AddressFamily::V6 => "-6",
        }
    }

    /// How the firewall listing prints "any address"
    pub fn any_cidr(self) -> &'static str {
        match self {
            AddressFamily::V4 => "0.0.0.0/0",
            AddressFamily::V6 => "::/0",
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTarget {
    Accept,
    Reject,
    Other(String),
}

impl From<&str> for RuleTarget {
    fn from(target: &str) -> Self {
        match target {
            "ACCEPT" => RuleTarget::Accept,
            "REJECT" => RuleTarget::Reject,
            other => RuleTarget::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTarget::Accept => write!(f, "ACCEPT"),
            RuleTarget::Reject => write!(f, "REJECT"),
            RuleTarget::Other(target) => write!(f, "{}", target),
        }
    }
}

/// One row of `iptables -L <chain> -vn`
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct FirewallRule {
    #[builder(into, default = "0".to_string())]
    pub pkts: String,
    #[builder(into, default = "0".to_string())]
    pub bytes: String,
    pub target: RuleTarget,
    #[builder(into, default = "all".to_string())]
    pub prot: String,
    #[builder(into, default = "--".to_string())]
    pub opt: String,
    #[builder(into, default = "*".to_string())]
    pub in_interface: String,
    #[builder(into, default = "*".to_string())]
    pub out_interface: String,
    #[builder(into, default = "0.0.0.0/0".to_string())]
    pub source: String,
    #[builder(into, default = "0.0.0.0/0".to_string())]
    pub destination: String,
    /// Free-form trailing column, e.g. `reject-with icmp-port-unreachable`
    #[builder(into, default)]
    pub options: String,
}

/// Rules of one chain per address family, captured once per invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirewallSnapshot {
    v4: Vec<FirewallRule>,
    v6: Vec<FirewallRule>,
}

impl FirewallSnapshot {
    pub fn new(v4: Vec<FirewallRule>, v6: Vec<FirewallRule>) -> Self {
        Self { v4, v6 }
    }

    pub fn rules_for(&self, family: AddressFamily) -> &[FirewallRule] {
        match family {
            AddressFamily::V4 => &self.v4,
            AddressFamily::V6 => &self.v6,
        }
    }
}

/// Queries the live firewall through `iptables`/`ip6tables`
pub struct Inspector<'a, R: CommandRunner> {
    tools: &'a ToolPaths,
    runner: &'a R,
}

impl<'a, R: CommandRunner> Inspector<'a, R> {
    pub fn new(tools: &'a ToolPaths, runner: &'a R) -> Self {
        Self { tools, runner }
    }

    pub fn listing_command(&self, chain: &str, family: AddressFamily) -> PlannedCommand {
        let program = match family {
            AddressFamily::V4 => &self.tools.iptables,
            AddressFamily::V6 => &self.tools.ip6tables,
        };
        PlannedCommand::new(program, ["-L", chain, "-vn"])
    }

    /// Current rules of `chain`, in the order the firewall evaluates them
    pub fn current_rules(
        &self,
        chain: &str,
        family: AddressFamily,
    ) -> error::Result<Vec<FirewallRule>> {
        let command = self.listing_command(chain, family);
        let output = self
            .runner
            .run(&command)
            .map_err(|e| FirewallError::execution(command.to_string(), e))?;

        if !output.success {
            // Parse whatever was printed; an empty listing means no rules
            warn!(
                "'{}' exited with {:?}: {}",
                command,
                output.exit_code,
                output.stderr_text()
            );
        }

        let rules = parse_firewall_output(&output.stdout)?;
        debug!("{} chain {}: {} rules", family, chain, rules.len());
        Ok(rules)
    }

    /// Query each family in `families` once; the others stay empty
    pub fn snapshot(
        &self,
        chain: &str,
        families: &[AddressFamily],
    ) -> error::Result<FirewallSnapshot> {
        let mut snapshot = FirewallSnapshot::default();
        if families.contains(&AddressFamily::V4) {
            snapshot.v4 = self.current_rules(chain, AddressFamily::V4)?;
        }
        if families.contains(&AddressFamily::V6) {
            snapshot.v6 = self.current_rules(chain, AddressFamily::V6)?;
        }
        Ok(snapshot)
    }
}
