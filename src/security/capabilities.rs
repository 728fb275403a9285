use caps::{CapSet, Capability};
use tracing::{debug, warn};

use super::{Result, SecurityError};

/// Check for CAP_NET_ADMIN, which `ip route` and `iptables` need
pub fn check_required_capabilities() -> Result<()> {
    debug!("Checking for required capabilities");

    if let Err(e) = check_capability(Capability::CAP_NET_ADMIN) {
        warn!("Current process capabilities:\n{}", list_current_capabilities());
        return Err(e);
    }

    debug!("All required capabilities are present");
    Ok(())
}

/// Commands inherit the effective set, so that is the one that matters
fn check_capability(cap: Capability) -> Result<()> {
    let cap_name = format!("{:?}", cap);

    let has_effective = caps::has_cap(None, CapSet::Effective, cap).map_err(|e| {
        SecurityError::CapabilityCheck {
            capability: cap_name.clone(),
            message: format!("Failed to check effective capabilities: {}", e),
        }
    })?;

    if !has_effective {
        return Err(SecurityError::MissingCapability {
            capability: cap_name,
            capability_set: "Effective".to_string(),
            remediation: "libvirtd runs network hooks as root; when running the hook by hand \
                          use sudo or grant cap_net_admin"
                .to_string(),
        });
    }

    debug!("Capability {} is present in the effective set", cap_name);
    Ok(())
}

/// Human-readable list of the permitted and effective sets
pub fn list_current_capabilities() -> String {
    let mut output = String::new();

    for (name, set) in [
        ("Permitted", CapSet::Permitted),
        ("Effective", CapSet::Effective),
    ] {
        match caps::read(None, set) {
            Ok(caps) if caps.is_empty() => {
                output.push_str(&format!("{} capabilities: (none)\n", name));
            }
            Ok(caps) => {
                let mut cap_names: Vec<String> = caps.iter().map(|c| format!("{:?}", c)).collect();
                cap_names.sort();
                output.push_str(&format!("{} capabilities: {}\n", name, cap_names.join(", ")));
            }
            Err(e) => {
                output.push_str(&format!("{} capabilities: (error reading: {})\n", name, e));
            }
        }
    }

    output
}
