//! Explicit plugin registries.

use rh_agent::ReactorRegistry;
use rh_principal::PolicyRegistry;

/// The policy and reactor registries a run resolves names against.
///
/// Built once at startup and passed by reference; add custom entries with
/// `plugins.policies.register(..)` / `plugins.reactors.register(..)`.
pub struct Plugins {
    pub policies: PolicyRegistry,
    pub reactors: ReactorRegistry,
}

impl Plugins {
    /// Registries holding every built-in policy and reactor.
    pub fn builtin() -> Self {
        Self {
            policies: PolicyRegistry::with_builtins(),
            reactors: ReactorRegistry::with_builtins(),
        }
    }
}

impl Default for Plugins {
    fn default() -> Self {
        Self::builtin()
    }
}
