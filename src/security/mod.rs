#[cfg(target_os = "linux")]
pub mod capabilities;

pub mod error;

pub use error::{Result, SecurityError};
use tracing::warn;

/// Check that the process may change routes and firewall rules.
pub fn check_capabilities() -> Result<()> {
    #[cfg(target_os = "linux")]
    {
        capabilities::check_required_capabilities()?;
    }

    #[cfg(not(target_os = "linux"))]
    {
        tracing::debug!("Capability checking is only available on Linux");
    }

    Ok(())
}

/// Capability preflight before mutating commands run.
///
/// A missing capability is only reported: each command will then fail on its
/// own and be logged by the executor.
pub fn preflight(log_prefix: &str) {
    if let Err(e) = check_capabilities() {
        warn!("{}{}", log_prefix, e);
    }
}
