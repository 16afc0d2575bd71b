//! Platform capability descriptor, resolved once at startup and threaded
//! through explicitly rather than queried ad hoc.

use std::collections::HashSet;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::EaselError;

fn unknown() -> String {
    "unknown".to_string()
}

/// Capability report from the native side. Absent keys default to `false`
/// (or `"unknown"` for strings) so older peers parse cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Capabilities {
    pub blur: bool,
    pub transform: bool,
    pub global_hotkeys: bool,
    pub glass_effect: bool,
    pub multi_monitor: bool,
    pub content_sizing: bool,
    pub text_selection: bool,
    pub platform: String,
    pub os_version: String,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            blur: false,
            transform: false,
            global_hotkeys: false,
            glass_effect: false,
            multi_monitor: false,
            content_sizing: false,
            text_selection: false,
            platform: unknown(),
            os_version: unknown(),
        }
    }
}

/// What to do when a required capability is absent. Chosen per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedPolicy {
    /// Fail the operation with an error.
    Error,
    /// Log a warning the first time each capability is missed, then no-op.
    #[default]
    WarnOnce,
    /// Silently no-op.
    Ignore,
}

/// Applies the deployment's [`UnsupportedPolicy`] when a capability is
/// absent. Degraded paths fall back rather than crash (e.g. solid fill
/// instead of blur).
pub struct CapabilityGate {
    capabilities: Capabilities,
    policy: UnsupportedPolicy,
    warned: Mutex<HashSet<&'static str>>,
}

impl CapabilityGate {
    pub fn new(capabilities: Capabilities, policy: UnsupportedPolicy) -> Self {
        Self {
            capabilities,
            policy,
            warned: Mutex::new(HashSet::new()),
        }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Check a capability by name. Returns `Ok(true)` when present,
    /// `Ok(false)` when absent and the policy degrades, or
    /// `Err(EaselError::Unsupported)` under [`UnsupportedPolicy::Error`].
    pub fn check(&self, name: &'static str, available: bool) -> Result<bool, EaselError> {
        if available {
            return Ok(true);
        }
        match self.policy {
            UnsupportedPolicy::Error => Err(EaselError::Unsupported(name.to_string())),
            UnsupportedPolicy::WarnOnce => {
                let mut warned = self.warned.lock().unwrap_or_else(|e| e.into_inner());
                if warned.insert(name) {
                    warn!(capability = name, "capability unavailable, degrading");
                }
                Ok(false)
            }
            UnsupportedPolicy::Ignore => Ok(false),
        }
    }

    pub fn blur(&self) -> Result<bool, EaselError> {
        self.check("blur", self.capabilities.blur)
    }

    pub fn glass_effect(&self) -> Result<bool, EaselError> {
        self.check("glassEffect", self.capabilities.glass_effect)
    }

    pub fn content_sizing(&self) -> Result<bool, EaselError> {
        self.check("contentSizing", self.capabilities.content_sizing)
    }
}
