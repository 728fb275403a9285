//! Decides which `ip route` and `iptables` invocations an event needs.
//!
//! Everything here is pure: the firewall state comes in through
//! [`RuleLookup`] and nothing is executed.


use crate::command::PlannedCommand;
use crate::config::{FORWARD_CHAIN, ToolPaths};
use crate::firewall::{AddressFamily, FirewallRule, FirewallSnapshot, RuleTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    Add,
    Delete,
}

impl RouteAction {
    fn verb(self) -> &'static str {
        match self {
            RouteAction::Add => "add",
            RouteAction::Delete => "del",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardAction {
    Insert,
    Delete,
}

impl ForwardAction {
    fn flag(self) -> &'static str {
        match self {
            ForwardAction::Insert => "--insert",
            ForwardAction::Delete => "--delete",
        }
    }
}

/// Source of the current FORWARD rules for an address family
pub trait RuleLookup {
    fn rules(&self, family: AddressFamily) -> &[FirewallRule];
}

impl RuleLookup for FirewallSnapshot {
    fn rules(&self, family: AddressFamily) -> &[FirewallRule] {
        self.rules_for(family)
    }
}

pub struct Planner<'a> {
    tools: &'a ToolPaths,
}

impl<'a> Planner<'a> {
    pub fn new(tools: &'a ToolPaths) -> Self {
        Self { tools }
    }

    /// One `ip route` command per address, in address order
    pub fn plan_routes(
        &self,
        device: &str,
        addresses: &[String],
        action: RouteAction,
    ) -> Vec<PlannedCommand> {
        addresses
            .iter()
            .map(|address| {
                PlannedCommand::new(
                    &self.tools.ip,
                    [
                        AddressFamily::of(address).ip_flag(),
                        "route",
                        action.verb(),
                        address.as_str(),
                        "dev",
                        device,
                    ],
                )
            })
            .collect()
    }

    /// Inbound and outbound ACCEPT rules for every address whose current
    /// state differs from what `action` asks for
    pub fn plan_forwarding(
        &self,
        device: &str,
        addresses: &[String],
        action: ForwardAction,
        lookup: &impl RuleLookup,
    ) -> Vec<PlannedCommand> {
        let mut commands = Vec::new();
        for address in addresses {
            let family = AddressFamily::of(address);
            let configured = is_configured(address, device, lookup.rules(family));
            let needed = match action {
                ForwardAction::Insert => !configured,
                ForwardAction::Delete => configured,
            };
            if needed {
                commands.extend(self.forwarding_commands(device, address, action));
            }
        }
        commands
    }

    fn forwarding_commands(
        &self,
        device: &str,
        address: &str,
        action: ForwardAction,
    ) -> [PlannedCommand; 2] {
        let iptables = match AddressFamily::of(address) {
            AddressFamily::V4 => &self.tools.iptables,
            AddressFamily::V6 => &self.tools.ip6tables,
        };
        [
            PlannedCommand::new(
                iptables,
                [
                    action.flag(),
                    FORWARD_CHAIN,
                    "--in-interface",
                    device,
                    "--source",
                    address,
                    "-j",
                    "ACCEPT",
                ],
            ),
            PlannedCommand::new(
                iptables,
                [
                    action.flag(),
                    FORWARD_CHAIN,
                    "--out-interface",
                    device,
                    "--destination",
                    address,
                    "-j",
                    "ACCEPT",
                ],
            ),
        ]
    }
}

/// Whether forwarding for `address` through `device` is already accepted.
///
/// Rules are scanned in firewall order; a reject-all rule for the device
/// ends the scan before any later ACCEPT is considered.
pub fn is_configured(address: &str, device: &str, rules: &[FirewallRule]) -> bool {
    let any = AddressFamily::of(address).any_cidr();
    for rule in rules {
        if is_reject_all(rule, device, any) {
            return false;
        }
        if rule.target == RuleTarget::Accept {
            let inbound = rule.in_interface == device && rule.source == address;
            let outbound = rule.out_interface == device && rule.destination == address;
            if inbound || outbound {
                return true;
            }
        }
    }
    false
}

fn is_reject_all(rule: &FirewallRule, device: &str, any: &str) -> bool {
    rule.target == RuleTarget::Reject
        && ((rule.in_interface == device && rule.source == any)
            || (rule.out_interface == device && rule.destination == any))
}
