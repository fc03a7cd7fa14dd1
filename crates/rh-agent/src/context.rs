//! Read-only data passed to every reactor call.

use rh_core::Period;
use rh_data::ProblemData;

/// What a reactor may look at besides the request itself.
///
/// Built by the simulator once per period, after the commitment is extracted
/// and before any state is mutated.
pub struct ReactorContext<'a> {
    pub period: Period,
    pub data:   &'a ProblemData,
    /// Remaining area per stratum before this period's commitment is applied.
    pub remaining_area: &'a [f64],
}

impl<'a> ReactorContext<'a> {
    #[inline]
    pub fn new(period: Period, data: &'a ProblemData, remaining_area: &'a [f64]) -> Self {
        Self { period, data, remaining_area }
    }

    /// Price of the species of stratum `stratum_id`.
    ///
    /// Blocks that do not name a known stratum (the aggregate entry) are
    /// priced at the lowest price in the table.
    pub fn price_for(&self, stratum_id: &str) -> f64 {
        match self.data.stratum_index(stratum_id) {
            Some(s) => self.data.price(&self.data.stratum(s).species).unwrap_or(0.0),
            None => self
                .data
                .prices()
                .values()
                .copied()
                .reduce(f64::min)
                .unwrap_or(0.0),
        }
    }
}
