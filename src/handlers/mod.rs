//! Drives one hook invocation: profile check, payload, planning, execution.


use crate::command::CommandRunner;
use crate::config::{AddressTable, FORWARD_CHAIN, Settings};
use crate::executor::{ExecutionReport, Executor};
use crate::firewall::{AddressFamily, Inspector};
use crate::libvirt::{
    EventAction, EventCheck, HookKind, HookProfile, NetworkEvent, NetworkMetadata, Payload,
};
use crate::logging::LogContext;
use crate::planner::{ForwardAction, Planner, RouteAction};
use crate::{Error, Result, security};
use std::io::{Read, Write};
use tracing::{debug, error, info, info_span, warn};

/// Process exit status of the hook, as libvirt sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookExit {
    /// Event handled, or nothing to do for it
    Handled,
    /// Malformed invocation
    Usage,
    /// Action handled by this hook, but not in the given state
    UnhandledCombination,
    InternalFailure,
}

impl HookExit {
    pub fn code(self) -> u8 {
        match self {
            HookExit::Handled => 0,
            HookExit::Usage => 1,
            HookExit::UnhandledCombination => 2,
            HookExit::InternalFailure => 100,
        }
    }
}

/// Host change an allowed event asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Routes(RouteAction),
    Forwarding(ForwardAction),
}

impl Reaction {
    pub fn for_event(kind: HookKind, action: &EventAction) -> Option<Self> {
        match (kind, action) {
            (_, EventAction::Started) => Some(Reaction::Routes(RouteAction::Add)),
            (HookKind::Forwarding, EventAction::Plugged) => {
                Some(Reaction::Forwarding(ForwardAction::Insert))
            }
            (HookKind::Forwarding, EventAction::Stopped | EventAction::Unplugged) => {
                Some(Reaction::Forwarding(ForwardAction::Delete))
            }
            (HookKind::RoutesOnly, EventAction::Stopped) => {
                Some(Reaction::Routes(RouteAction::Delete))
            }
            _ => None,
        }
    }

    fn subject(self) -> &'static str {
        match self {
            Reaction::Routes(_) => "IP routing",
            Reaction::Forwarding(_) => "IP forwarding",
        }
    }
}

pub struct Dispatcher<'a, R: CommandRunner> {
    settings: &'a Settings,
    runner: &'a R,
    log: &'a LogContext,
}

impl<'a, R: CommandRunner> Dispatcher<'a, R> {
    pub fn new(settings: &'a Settings, runner: &'a R, log: &'a LogContext) -> Self {
        Self {
            settings,
            runner,
            log,
        }
    }

    /// Handle one event.
    ///
    /// Failing host commands are logged but still yield [`HookExit::Handled`];
    /// `Err` is reserved for internal failures.
    pub fn dispatch(
        &self,
        event: &NetworkEvent,
        stdin: &mut dyn Read,
        stderr: &mut dyn Write,
    ) -> Result<HookExit> {
        let Some(profile) = HookProfile::for_identity(&event.identity) else {
            return Ok(HookExit::Handled);
        };

        let check = profile.check(&event.action, &event.state);
        if check == EventCheck::Ignored {
            return Ok(HookExit::Handled);
        }

        debug!(
            "{} \"{}\": action=\"{}\", state=\"{}\"",
            event.identity, event.resource_name, event.action, event.state
        );

        if check == EventCheck::Unhandled {
            let message = format!("unhandled combination: {} {}", event.action, event.state);
            writeln!(stderr, "{}", message)?;
            error!(hook = self.log.ident(), "{}", message);
            return Ok(HookExit::UnhandledCombination);
        }

        let Some(reaction) = Reaction::for_event(profile.kind, &event.action) else {
            return Ok(HookExit::Handled);
        };

        let xml = read_payload(&event.payload, stdin)?;
        let metadata = NetworkMetadata::from_xml(&xml)?;

        let span = info_span!(
            "network_hook",
            network = %event.resource_name,
            action = %event.action
        );
        let _enter = span.enter();

        self.handle_network_hook(event, &metadata, reaction)?;
        Ok(HookExit::Handled)
    }

    fn handle_network_hook(
        &self,
        event: &NetworkEvent,
        metadata: &NetworkMetadata,
        reaction: Reaction,
    ) -> Result<ExecutionReport> {
        let net_name = event.resource_name.as_str();
        let action = event.action.as_str();

        let table = AddressTable::load(&self.settings.routing_file)?;
        let addresses = table.addresses_for(net_name);
        if addresses.is_empty() {
            debug!("no configuration for \"{}\" (action=\"{}\")", net_name, action);
            return Ok(ExecutionReport::default());
        }
        debug!(
            "network \"{}\": routed IPs={}",
            net_name,
            addresses.join(", ")
        );

        let device = metadata.device_name.as_str();
        let planner = Planner::new(&self.settings.tools);
        let commands = match reaction {
            Reaction::Routes(route_action) => planner.plan_routes(device, &addresses, route_action),
            Reaction::Forwarding(forward_action) => {
                let families = families_of(&addresses);
                let snapshot = Inspector::new(&self.settings.tools, self.runner)
                    .snapshot(FORWARD_CHAIN, &families)?;
                planner.plan_forwarding(device, &addresses, forward_action, &snapshot)
            }
        };

        if commands.is_empty() {
            debug!("no configuration for \"{}\" (action=\"{}\")", net_name, action);
            return Ok(ExecutionReport::default());
        }

        let log_prefix = self.log.event_prefix(net_name, action);
        security::preflight(&log_prefix);

        let report = Executor::new(self.runner, self.log).execute(commands, &log_prefix);
        info!(
            "{} for \"{}\" (action=\"{}\") configured.",
            reaction.subject(),
            net_name,
            action
        );
        if report.failed() > 0 {
            warn!(
                "{}{} of {} commands failed",
                log_prefix,
                report.failed(),
                report.outcomes.len()
            );
        }

        Ok(report)
    }
}

fn read_payload(payload: &Payload, stdin: &mut dyn Read) -> Result<String> {
    match payload {
        Payload::Inline(xml) => Ok(xml.clone()),
        Payload::Stdin => {
            let mut xml = String::new();
            stdin
                .read_to_string(&mut xml)
                .map_err(|e| Error::file_operation("<stdin>", "read hook payload", e))?;
            Ok(xml)
        }
    }
}

/// Families present in `addresses`, each once, in first-seen order
fn families_of(addresses: &[String]) -> Vec<AddressFamily> {
    let mut families = Vec::new();
    for family in addresses.iter().map(|a| AddressFamily::of(a)) {
        if !families.contains(&family) {
            families.push(family);
        }
    }
    families
}
