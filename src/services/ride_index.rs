use dashmap::DashMap;
use thiserror::Error;

use crate::core::{distance::is_within_bounding_box, filters::CandidateFilter, source::RideSource};
use crate::models::RideOffer;

/// Errors that can occur with ride index operations
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Ride not found: {0}")]
    NotFound(String),
}

/// In-memory ride index
///
/// Rides are keyed by ride id. Reads hand out cloned snapshots, so a search
/// never observes a seat count changing under it.
#[derive(Debug, Default)]
pub struct RideIndex {
    rides: DashMap<String, RideOffer>,
}

impl RideIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a ride, returning true if one was replaced
    pub fn upsert(&self, ride: RideOffer) -> bool {
        let ride_id = ride.ride_id.clone();
        let replaced = self.rides.insert(ride_id.clone(), ride).is_some();

        tracing::debug!(
            "{} ride {}",
            if replaced { "Replaced" } else { "Indexed" },
            ride_id
        );
        replaced
    }

    /// Remove a ride from the index
    pub fn remove(&self, ride_id: &str) -> Result<RideOffer, IndexError> {
        self.rides
            .remove(ride_id)
            .map(|(_, ride)| ride)
            .ok_or_else(|| IndexError::NotFound(ride_id.to_string()))
    }

    pub fn get(&self, ride_id: &str) -> Option<RideOffer> {
        self.rides.get(ride_id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }
}

impl RideSource for RideIndex {
    /// Bounding-box pre-scan on start points, then the exact filter
    fn candidates(&self, filter: &CandidateFilter) -> Vec<RideOffer> {
        let bounds = filter.pickup_bounds();

        self.rides
            .iter()
            .filter(|entry| {
                let start = &entry.value().start_point;
                is_within_bounding_box(start.lat, start.lng, bounds)
            })
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filters::filter_candidates;
    use crate::models::{GeoPoint, SearchRequest};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn desired() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 8, 0, 0).unwrap()
    }

    fn create_ride(id: &str, start: GeoPoint, seats: u32) -> RideOffer {
        RideOffer {
            ride_id: id.to_string(),
            driver_id: "driver-1".to_string(),
            driver_name: "Asha".to_string(),
            seats_available: seats,
            fare: 90.0,
            polyline: None,
            start_point: start,
            end_point: GeoPoint::new(12.949, 77.649),
            route: vec![
                start,
                GeoPoint::new(12.93, 77.60),
                GeoPoint::new(12.92, 77.64),
                GeoPoint::new(12.949, 77.649),
            ],
            departure_time: desired() + Duration::minutes(10),
        }
    }

    #[test]
    fn test_upsert_replaces() {
        let index = RideIndex::new();
        assert!(!index.upsert(create_ride("r1", GeoPoint::new(12.901, 77.601), 2)));
        assert!(index.upsert(create_ride("r1", GeoPoint::new(12.901, 77.601), 1)));

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("r1").unwrap().seats_available, 1);
    }

    #[test]
    fn test_remove_unknown_ride() {
        let index = RideIndex::new();
        assert!(matches!(index.remove("missing"), Err(IndexError::NotFound(id)) if id == "missing"));
    }

    #[test]
    fn test_remove_returns_ride() {
        let index = RideIndex::new();
        index.upsert(create_ride("r1", GeoPoint::new(12.901, 77.601), 2));

        let removed = index.remove("r1").unwrap();
        assert_eq!(removed.ride_id, "r1");
        assert!(index.is_empty());
    }

    #[test]
    fn test_candidates_apply_filter() {
        let index = RideIndex::new();
        index.upsert(create_ride("near", GeoPoint::new(12.901, 77.601), 2));
        index.upsert(create_ride("full", GeoPoint::new(12.901, 77.601), 0));
        index.upsert(create_ride("far", GeoPoint::new(13.2, 77.601), 2));

        let request = SearchRequest::with_defaults(
            GeoPoint::new(12.90, 77.60),
            GeoPoint::new(12.95, 77.65),
            desired(),
        )
        .unwrap();

        let candidates = index.candidates(&filter_candidates(&request));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].ride_id, "near");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let index = RideIndex::new();
        index.upsert(create_ride("r1", GeoPoint::new(12.901, 77.601), 2));

        let request = SearchRequest::with_defaults(
            GeoPoint::new(12.90, 77.60),
            GeoPoint::new(12.95, 77.65),
            desired(),
        )
        .unwrap();
        let snapshot = index.candidates(&filter_candidates(&request));

        index.upsert(create_ride("r1", GeoPoint::new(12.901, 77.601), 0));
        assert_eq!(snapshot[0].seats_available, 2);
    }
}
