//! Bilevel coupling hook.
//!
//! Only the decomposition interface exists: after extraction, a hook may
//! replace the period's commitment before it is sent to the agent.

use tracing::debug;

use rh_core::Commitment;
use rh_principal::WindowSolution;

pub trait BilevelHook: Send + Sync {
    fn name(&self) -> &str;

    /// Return the commitment to publish for `commitment.period`.
    fn refine(&self, solution: &WindowSolution, commitment: Commitment) -> Commitment;
}

/// Placeholder decomposition step: logs and returns the commitment as is.
pub struct DecompositionStub;

impl BilevelHook for DecompositionStub {
    fn name(&self) -> &str {
        "decomposition_stub"
    }

    fn refine(&self, solution: &WindowSolution, commitment: Commitment) -> Commitment {
        debug!(
            period = commitment.period.0,
            window = %solution.window(),
            entries = commitment.len(),
            "bilevel decomposition stub; commitment unchanged"
        );
        commitment
    }
}
