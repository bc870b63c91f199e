//! Glide Search - ride matching service for Glide carpooling
//!
//! Given a rider's pickup, drop and desired departure time, this library
//! selects published rides that are geographically and temporally compatible
//! and ranks them by a composite relevance score.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    distance::{calculate_bounding_box, distance_km, haversine_distance},
    filter_candidates, CandidateFilter, MatchError, Matcher, RideSource, SearchOutcome,
};
pub use models::{GeoPoint, MatchResult, RideOffer, SearchRequest};
pub use services::RideIndex;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let bbox = calculate_bounding_box(12.9716, 77.5946, 10.0);
        assert!(bbox.min_lat < 12.9716);

        let a = GeoPoint::new(12.90, 77.60);
        assert_eq!(distance_km(&a, &a), 0.0);
    }
}
