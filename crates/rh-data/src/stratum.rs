//! Input records: strata and per-period demand bounds.

use serde::{Deserialize, Serialize};

use rh_core::Period;

/// An allocatable unit with bounded area and a time-varying yield.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stratum {
    pub id:      String,
    /// Capacity in area units (e.g. ha).
    pub area:    f64,
    #[serde(default = "default_species")]
    pub species: String,
    /// Age in years at period 0.
    #[serde(default)]
    pub age:     u32,
}

impl Stratum {
    pub fn new(id: impl Into<String>, area: f64) -> Self {
        Self { id: id.into(), area, species: default_species(), age: 0 }
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = species.into();
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }
}

pub(crate) fn default_species() -> String {
    "PINE".to_string()
}

/// Volume bounds for one period and species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodDemand {
    pub period:  u32,
    #[serde(default = "default_species")]
    pub species: String,
    #[serde(default)]
    pub min_vol: f64,
    #[serde(default = "default_max_vol")]
    pub max_vol: f64,
}

impl PeriodDemand {
    pub fn new(period: Period, min_vol: f64, max_vol: f64) -> Self {
        Self { period: period.0, species: default_species(), min_vol, max_vol }
    }
}

pub(crate) fn default_max_vol() -> f64 {
    1e12
}

/// Aggregate `[min, max]` volume bound for one period, summed across species.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DemandBounds {
    pub min: f64,
    pub max: f64,
}
