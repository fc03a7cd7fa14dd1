//! Typed policy parameters.

use rh_core::Params;

use crate::{PrincipalError, PrincipalResult};

/// The `principal_policy.params` keys the window model understands.
///
/// Keys not listed here stay available in `extra` for custom policies.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyParams {
    /// Minimum aggregate volume in the first window period.
    pub min_flow:          Option<f64>,
    /// Whether demand bounds from the dataset become window rows.
    pub enforce_demand:    bool,
    /// Per-period objective decay; breaks ties toward earlier periods.
    pub time_preference:   f64,
    /// Weight of absolute deviation from the mean flow (`even_flow`).
    pub deviation_penalty: f64,
    /// Per-period discount rate (`revenue`).
    pub discount_rate:     f64,
    pub extra:             Params,
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            min_flow:          None,
            enforce_demand:    true,
            time_preference:   1e-4,
            deviation_penalty: 2.0,
            discount_rate:     0.0,
            extra:             Params::new(),
        }
    }
}

impl PolicyParams {
    pub fn from_params(params: &Params) -> PrincipalResult<Self> {
        let mut out = PolicyParams::default();
        for (key, &value) in params {
            match key.as_str() {
                "min_flow" => {
                    if value < 0.0 {
                        return Err(PrincipalError::param(key, "must be non-negative"));
                    }
                    out.min_flow = Some(value);
                }
                "enforce_demand" => out.enforce_demand = value != 0.0,
                "time_preference" => {
                    if !(0.0..1.0).contains(&value) {
                        return Err(PrincipalError::param(key, "must be in [0, 1)"));
                    }
                    out.time_preference = value;
                }
                "deviation_penalty" => {
                    if value < 0.0 {
                        return Err(PrincipalError::param(key, "must be non-negative"));
                    }
                    out.deviation_penalty = value;
                }
                "discount_rate" => {
                    if value <= -1.0 {
                        return Err(PrincipalError::param(key, "must be greater than -1"));
                    }
                    out.discount_rate = value;
                }
                _ => {
                    out.extra.insert(key.clone(), value);
                }
            }
        }
        Ok(out)
    }

    /// Tie-break weight for window offset `k`.
    #[inline]
    pub fn preference_weight(&self, k: usize) -> f64 {
        (1.0 - self.time_preference).powi(k as i32)
    }

    /// Discount factor for window offset `k`.
    #[inline]
    pub fn discount_factor(&self, k: usize) -> f64 {
        (1.0 + self.discount_rate).powi(-(k as i32))
    }
}
