//! First-period commitment extraction.

use tracing::debug;

use rh_core::{AGGREGATE_STRATUM, Commitment, CommitmentKey, DEFAULT_PRODUCT, Period};

use crate::WindowSolution;

/// Volumes at or below this are treated as zero.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Turns the `t` slice of a solved window into a [`Commitment`].
///
/// Every stratum whose volume at `t` exceeds `epsilon` gets an entry
/// `(stratum_id, product) → volume`.  When none does but the aggregate volume
/// at `t` still exceeds `epsilon`, the commitment is the single entry
/// `("ALL", product) → aggregate`.  Otherwise it is empty.
///
/// Areas are recorded for every stratum with a positive allocation at `t`,
/// independent of the volume threshold, so the simulator consumes exactly
/// what the window allocated.
#[derive(Clone, Debug)]
pub struct CommitmentExtractor {
    epsilon: f64,
    product: String,
}

impl Default for CommitmentExtractor {
    fn default() -> Self {
        Self { epsilon: DEFAULT_EPSILON, product: DEFAULT_PRODUCT.to_string() }
    }
}

impl CommitmentExtractor {
    pub fn new(epsilon: f64, product: impl Into<String>) -> Self {
        Self { epsilon, product: product.into() }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn extract(&self, solution: &WindowSolution, t: Period) -> Commitment {
        let mut commitment = Commitment::empty(t);

        for s in solution.strata() {
            let area = solution.area(s, t);
            if area > 0.0 {
                commitment.areas.insert(s, area);
            }
            let volume = solution.volume(s, t);
            if volume > self.epsilon {
                commitment
                    .volumes
                    .insert(CommitmentKey::new(solution.stratum_id(s), self.product.as_str()), volume);
            }
        }

        if commitment.volumes.is_empty() {
            let aggregate = solution.aggregate_volume(t);
            if aggregate > self.epsilon {
                debug!(period = t.0, aggregate, "no stratum above epsilon; committing aggregate");
                commitment
                    .volumes
                    .insert(CommitmentKey::new(AGGREGATE_STRATUM, self.product.as_str()), aggregate);
            }
        }
        commitment
    }
}
