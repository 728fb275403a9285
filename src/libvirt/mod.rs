//! libvirt hook event model.
//!
//! libvirt runs `/etc/libvirt/hooks/<identity> <name> <action> <state> <xml|->`
//! for every lifecycle event. The identity is the file name of the hook, and
//! each identity only reacts to a fixed set of (action, state) pairs.

pub mod error;
pub mod metadata;
#[cfg(test)]
mod tests;

use std::fmt;
use std::path::Path;

pub use error::LibvirtError;
pub use metadata::NetworkMetadata;

/// Action argument of a network hook call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventAction {
    Start,
    Started,
    Stopped,
    Plugged,
    Unplugged,
    Updated,
    PortCreated,
    PortDeleted,
    Other(String),
}

impl From<&str> for EventAction {
    fn from(action: &str) -> Self {
        match action {
            "start" => EventAction::Start,
            "started" => EventAction::Started,
            "stopped" => EventAction::Stopped,
            "plugged" => EventAction::Plugged,
            "unplugged" => EventAction::Unplugged,
            "updated" => EventAction::Updated,
            "port-created" => EventAction::PortCreated,
            "port-deleted" => EventAction::PortDeleted,
            other => EventAction::Other(other.to_string()),
        }
    }
}

impl EventAction {
    pub fn as_str(&self) -> &str {
        match self {
            EventAction::Start => "start",
            EventAction::Started => "started",
            EventAction::Stopped => "stopped",
            EventAction::Plugged => "plugged",
            EventAction::Unplugged => "unplugged",
            EventAction::Updated => "updated",
            EventAction::PortCreated => "port-created",
            EventAction::PortDeleted => "port-deleted",
            EventAction::Other(action) => action,
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State argument of a network hook call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventState {
    Begin,
    End,
    Other(String),
}

impl From<&str> for EventState {
    fn from(state: &str) -> Self {
        match state {
            "begin" => EventState::Begin,
            "end" => EventState::End,
            other => EventState::Other(other.to_string()),
        }
    }
}

impl EventState {
    pub fn as_str(&self) -> &str {
        match self {
            EventState::Begin => "begin",
            EventState::End => "end",
            EventState::Other(state) => state,
        }
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the XML document of an event comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// `-`: libvirt writes the document to stdin
    Stdin,
    Inline(String),
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        match value {
            "-" => Payload::Stdin,
            xml => Payload::Inline(xml.to_string()),
        }
    }
}

/// One parsed hook invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkEvent {
    pub identity: String,
    pub resource_name: String,
    pub action: EventAction,
    pub state: EventState,
    pub payload: Payload,
}

impl NetworkEvent {
    pub fn new(
        identity: impl Into<String>,
        resource_name: impl Into<String>,
        action: &str,
        state: &str,
        payload: &str,
    ) -> Self {
        Self {
            identity: identity.into(),
            resource_name: resource_name.into(),
            action: EventAction::from(action),
            state: EventState::from(state),
            payload: Payload::from(payload),
        }
    }
}

/// What a profile does for its allowed events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// Routes on network start, FORWARD rules on guest plug/unplug and stop
    Forwarding,
    /// Routes only, added on start and removed on stop
    RoutesOnly,
}

/// Allow-list of (action, state) pairs for one hook identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookProfile {
    pub identity: &'static str,
    pub kind: HookKind,
    allowed: &'static [(&'static str, &'static str)],
}

/// How a profile treats an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCheck {
    /// Action not handled by this identity at all
    Ignored,
    /// Action handled, but not in this state
    Unhandled,
    Allowed,
}

impl HookProfile {
    pub const NETWORK: HookProfile = HookProfile {
        identity: "network",
        kind: HookKind::Forwarding,
        allowed: &[("started", "begin"), ("plugged", "begin"), ("stopped", "end")],
    };

    pub const NETWORK_ROUTES: HookProfile = HookProfile {
        identity: "network-routes",
        kind: HookKind::RoutesOnly,
        allowed: &[("started", "begin"), ("stopped", "end")],
    };

    const ALL: [HookProfile; 2] = [HookProfile::NETWORK, HookProfile::NETWORK_ROUTES];

    pub fn for_identity(identity: &str) -> Option<HookProfile> {
        Self::ALL.into_iter().find(|p| p.identity == identity)
    }

    pub fn check(&self, action: &EventAction, state: &EventState) -> EventCheck {
        let action = action.as_str();
        let state = state.as_str();
        if !self.allowed.iter().any(|(a, _)| *a == action) {
            EventCheck::Ignored
        } else if self.allowed.iter().any(|&(a, s)| a == action && s == state) {
            EventCheck::Allowed
        } else {
            EventCheck::Unhandled
        }
    }
}

/// Hook identity from the invoking path, e.g. `/etc/libvirt/hooks/network`
pub fn identity_from_path(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
