//! The principal's binding first-period decision.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Period, StratumIdx};

/// Stratum id used for the synthetic aggregate entry emitted when no single
/// stratum carries a non-negligible volume but the period total does.
pub const AGGREGATE_STRATUM: &str = "ALL";

/// Product label attached to every commitment in single-product runs.
pub const DEFAULT_PRODUCT: &str = "sawlog";

/// `(stratum_id, product_label)` key of a commitment entry.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CommitmentKey {
    pub stratum: String,
    pub product: String,
}

impl CommitmentKey {
    pub fn new(stratum: impl Into<String>, product: impl Into<String>) -> Self {
        Self { stratum: stratum.into(), product: product.into() }
    }

    /// True for the synthetic `"ALL"` fallback key.
    pub fn is_aggregate(&self) -> bool {
        self.stratum == AGGREGATE_STRATUM
    }
}

impl fmt::Display for CommitmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.stratum, self.product)
    }
}

/// A flattened, serializable commitment entry (for records and output rows).
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CommitmentEntry {
    pub stratum: String,
    pub product: String,
    pub volume:  f64,
}

/// Volumes committed for exactly one period.
///
/// `volumes` is the published mapping; `areas` is the per-stratum area the
/// simulator consumes from remaining capacity.  Both are immutable once the
/// extractor hands the commitment over.
#[derive(Clone, PartialEq, Debug)]
pub struct Commitment {
    pub period:  Period,
    pub volumes: BTreeMap<CommitmentKey, f64>,
    pub areas:   BTreeMap<StratumIdx, f64>,
}

impl Commitment {
    /// A commitment with nothing in it.
    pub fn empty(period: Period) -> Self {
        Self { period, volumes: BTreeMap::new(), areas: BTreeMap::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    /// Sum of all committed volumes.
    pub fn total_volume(&self) -> f64 {
        self.volumes.values().sum()
    }

    /// Sum of all committed areas.
    pub fn total_area(&self) -> f64 {
        self.areas.values().sum()
    }

    pub fn get(&self, stratum: &str, product: &str) -> Option<f64> {
        self.volumes.get(&CommitmentKey::new(stratum, product)).copied()
    }

    /// Entries in key order.
    pub fn entries(&self) -> Vec<CommitmentEntry> {
        self.volumes
            .iter()
            .map(|(k, &volume)| CommitmentEntry {
                stratum: k.stratum.clone(),
                product: k.product.clone(),
                volume,
            })
            .collect()
    }
}
