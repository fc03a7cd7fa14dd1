//! Planning-period time model.
//!
//! # Design
//!
//! Time is an absolute integer `Period` counter.  Period length (days) only
//! matters when yield tables are expanded from age bins; the rolling-horizon
//! loop itself works purely in period indices, so all window arithmetic is
//! exact.
//!
//! A [`Window`] is the closed range `[t, t + H - 1]` re-solved at every
//! simulation step, clipped so it never reaches `end_period` (exclusive).

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Period ────────────────────────────────────────────────────────────────────

/// An absolute planning period.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(pub u32);

impl Period {
    pub const ZERO: Period = Period(0);

    /// Return the period `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u32) -> Period {
        Period(self.0 + n)
    }

    /// Periods elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Period) -> u32 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u32> for Period {
    type Output = Period;
    #[inline]
    fn add(self, rhs: u32) -> Period {
        Period(self.0 + rhs)
    }
}

impl std::ops::Sub for Period {
    type Output = u32;
    #[inline]
    fn sub(self, rhs: Period) -> u32 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

// ── Window ────────────────────────────────────────────────────────────────────

/// The closed period range optimized in one simulation step.
///
/// Built fresh every step and discarded after commitment extraction.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Window {
    start: Period,
    /// Inclusive.
    end: Period,
}

impl Window {
    /// Build `[t, t + horizon - 1]`, clipped to end before `end_period`.
    ///
    /// Returns `None` when `horizon == 0` or `t >= end_period`, i.e. when
    /// there is no period left to plan.
    pub fn clipped(t: Period, horizon: u32, end_period: Period) -> Option<Window> {
        if horizon == 0 || t >= end_period {
            return None;
        }
        let unclipped_end = t.0.saturating_add(horizon - 1);
        let end = unclipped_end.min(end_period.0 - 1);
        Some(Window { start: t, end: Period(end) })
    }

    /// First (committed) period of the window.
    #[inline]
    pub fn start(&self) -> Period {
        self.start
    }

    /// Last period of the window (inclusive).
    #[inline]
    pub fn end(&self) -> Period {
        self.end
    }

    /// Number of periods in the window (always ≥ 1).
    #[inline]
    pub fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize + 1
    }

    /// A window is never empty; provided for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn contains(&self, p: Period) -> bool {
        p >= self.start && p <= self.end
    }

    /// Zero-based position of `p` inside the window.
    #[inline]
    pub fn offset_of(&self, p: Period) -> Option<usize> {
        self.contains(p).then(|| p.since(self.start) as usize)
    }

    /// Periods in ascending order.
    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        (self.start.0..=self.end.0).map(Period)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start.0, self.end.0)
    }
}
