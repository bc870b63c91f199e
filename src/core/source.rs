use crate::core::filters::CandidateFilter;
use crate::models::RideOffer;

/// Anything that can hand the matcher the rides satisfying a filter
///
/// Implementations return owned snapshots; the matcher never reads live
/// state after this call returns.
pub trait RideSource {
    fn candidates(&self, filter: &CandidateFilter) -> Vec<RideOffer>;
}

/// Linear scan over an in-memory collection
impl RideSource for [RideOffer] {
    fn candidates(&self, filter: &CandidateFilter) -> Vec<RideOffer> {
        self.iter().filter(|ride| filter.matches(ride)).cloned().collect()
    }
}

impl RideSource for Vec<RideOffer> {
    fn candidates(&self, filter: &CandidateFilter) -> Vec<RideOffer> {
        self.as_slice().candidates(filter)
    }
}
