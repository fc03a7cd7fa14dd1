//! Deterministic RNG wrapper for stochastic reactors and scenario generators.
//!
//! # Determinism strategy
//!
//! The core never draws random numbers itself.  Reactors that want noise get
//! a `SimRng` seeded by:
//!
//!   seed = run_seed XOR (period * MIXING_CONSTANT)
//!
//! so the draw for period `t` depends only on the run seed and `t`, not on how
//! many draws earlier periods made.  Re-running a configuration reproduces
//! every period exactly.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Period;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// RNG for one period of a run.
    pub fn for_period(run_seed: u64, period: Period) -> Self {
        let seed = run_seed ^ (period.0 as u64).wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
