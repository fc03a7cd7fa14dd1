//! Age-bin yield expansion.
//!
//! Yield tables are usually published per age class rather than per planning
//! period.  Expansion turns a stratum's `(age_bin, yield)` curve into absolute
//! period yields:
//!
//! ```text
//! age_at(p) = age + p * period_length_days / 365
//! bin(p)    = floor(age_at(p) / bin_width_years)
//! ```
//!
//! The yield for `p` is the curve value at the largest defined bin `<= bin(p)`.
//! Ages past the last defined bin clip to the last bin; ages before the first
//! defined bin have no yield.

use serde::{Deserialize, Serialize};

use rh_core::{HorizonConfig, Period};

use crate::{DataError, DataResult, ProblemDataBuilder, Stratum};

const DAYS_PER_YEAR: f64 = 365.0;

/// One stratum's yield-by-age-bin curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YieldCurve {
    pub stratum_id: String,
    /// `(age_bin, yield_per_area)`, sorted by bin after [`YieldCurve::new`].
    pub bins: Vec<(u32, f64)>,
}

impl YieldCurve {
    pub fn new(stratum_id: impl Into<String>, mut bins: Vec<(u32, f64)>) -> Self {
        bins.sort_by_key(|&(bin, _)| bin);
        Self { stratum_id: stratum_id.into(), bins }
    }

    /// Yield at age bin `bin`, with clip-to-last-bin semantics.
    pub fn value_at(&self, bin: u32) -> f64 {
        match self.bins.partition_point(|&(b, _)| b <= bin) {
            0 => 0.0,
            i => self.bins[i - 1].1,
        }
    }
}

/// Unit conversion inputs for [`expand_curves`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExpansionParams {
    pub period_length_days: u32,
    pub bin_width_years:    f64,
    pub first_period:       Period,
    /// Inclusive.
    pub last_period:        Period,
}

impl ExpansionParams {
    /// Expand over the simulated range `[start_period, end_period)` with
    /// ten-year age classes.
    pub fn from_horizon(horizon: &HorizonConfig) -> Self {
        Self {
            period_length_days: horizon.period_length,
            bin_width_years:    10.0,
            first_period:       horizon.start(),
            last_period:        Period(horizon.end_period.saturating_sub(1)),
        }
    }

    pub fn with_bin_width(mut self, years: f64) -> Self {
        self.bin_width_years = years;
        self
    }

    fn validate(&self) -> DataResult<()> {
        if !(self.bin_width_years.is_finite() && self.bin_width_years > 0.0) {
            return Err(DataError::invalid("bin_width_years", "must be positive"));
        }
        if self.last_period < self.first_period {
            return Err(DataError::invalid("expansion range", "last_period precedes first_period"));
        }
        Ok(())
    }

    /// Age class of a stratum of initial age `age` in period `p`.
    pub fn bin_at(&self, age: u32, p: Period) -> u32 {
        let age_at = age as f64 + p.0 as f64 * self.period_length_days as f64 / DAYS_PER_YEAR;
        (age_at / self.bin_width_years).floor() as u32
    }
}

/// Write absolute-period yields for every curve into `builder`.
///
/// Every curve must name a stratum in `strata`; the builder would reject the
/// yields anyway, but failing here names the curve table.
pub fn expand_curves(
    strata:  &[Stratum],
    curves:  &[YieldCurve],
    params:  &ExpansionParams,
    builder: &mut ProblemDataBuilder,
) -> DataResult<()> {
    params.validate()?;
    for curve in curves {
        let Some(stratum) = strata.iter().find(|s| s.id == curve.stratum_id) else {
            return Err(DataError::UnknownStratum {
                id:    curve.stratum_id.clone(),
                table: "yield_curves",
            });
        };
        for p in params.first_period.0..=params.last_period.0 {
            let period = Period(p);
            let value = curve.value_at(params.bin_at(stratum.age, period));
            builder.set_yield(stratum.id.clone(), period, value);
        }
    }
    Ok(())
}
