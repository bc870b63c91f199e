use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::MatchError;

/// Default search radius applied to both pickup and drop proximity
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Default half-width of the departure time window
pub const DEFAULT_TIME_WINDOW_MINUTES: i64 = 60;

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    #[serde(alias = "lon")]
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check that both components are finite and within range.
    ///
    /// `field` names the point in the error (e.g. `pickup` yields `pickup.lat`).
    pub fn validate(&self, field: &str) -> Result<(), MatchError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(MatchError::invalid(
                format!("{}.lat", field),
                format!("latitude must be within [-90, 90], got {}", self.lat),
            ));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(MatchError::invalid(
                format!("{}.lng", field),
                format!("longitude must be within [-180, 180], got {}", self.lng),
            ));
        }
        Ok(())
    }

    /// Planar coordinate with x = longitude, y = latitude
    #[inline]
    pub fn to_coord(self) -> geo::Coord<f64> {
        geo::coord! { x: self.lng, y: self.lat }
    }
}

/// A published ride, as handed to the matcher by the ride store
///
/// Matching treats this as an immutable snapshot: seat counts may change in
/// the store, but a search scores the copy it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideOffer {
    #[serde(rename = "rideId")]
    pub ride_id: String,
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(rename = "driverName")]
    pub driver_name: String,
    #[serde(rename = "seatsAvailable")]
    pub seats_available: u32,
    pub fare: f64,
    #[serde(default)]
    pub polyline: Option<String>,
    #[serde(rename = "startPoint")]
    pub start_point: GeoPoint,
    #[serde(rename = "endPoint")]
    pub end_point: GeoPoint,
    /// Driver's intended path, in travel order
    pub route: Vec<GeoPoint>,
    #[serde(rename = "departureTime", alias = "dateTime")]
    pub departure_time: DateTime<Utc>,
}

impl RideOffer {
    #[inline]
    pub fn has_seats(&self) -> bool {
        self.seats_available > 0
    }
}

/// A rider's search, validated and with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub pickup: GeoPoint,
    pub drop: GeoPoint,
    pub desired_time: DateTime<Utc>,
    pub radius_km: f64,
    pub time_window_minutes: i64,
}

impl SearchRequest {
    /// Build a request, substituting defaults for absent or non-positive
    /// radius and window values.
    ///
    /// Fails fast on out-of-range coordinates or a non-finite radius.
    pub fn new(
        pickup: GeoPoint,
        drop: GeoPoint,
        desired_time: DateTime<Utc>,
        radius_km: Option<f64>,
        time_window_minutes: Option<i64>,
    ) -> Result<Self, MatchError> {
        pickup.validate("pickup")?;
        drop.validate("drop")?;

        let radius_km = match radius_km {
            Some(r) if r.is_infinite() => {
                return Err(MatchError::invalid(
                    "radiusKm",
                    "radius must be a finite number of kilometres",
                ));
            }
            Some(r) if r > 0.0 => r,
            _ => DEFAULT_RADIUS_KM,
        };

        let time_window_minutes = match time_window_minutes {
            Some(w) if w > 0 => w,
            _ => DEFAULT_TIME_WINDOW_MINUTES,
        };

        Ok(Self {
            pickup,
            drop,
            desired_time,
            radius_km,
            time_window_minutes,
        })
    }

    /// Request with the default radius and time window
    pub fn with_defaults(
        pickup: GeoPoint,
        drop: GeoPoint,
        desired_time: DateTime<Utc>,
    ) -> Result<Self, MatchError> {
        Self::new(pickup, drop, desired_time, None, None)
    }
}

/// Ranked search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "rideId")]
    pub ride_id: String,
    #[serde(rename = "driverName")]
    pub driver_name: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "availableSeats")]
    pub available_seats: u32,
    pub fare: f64,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
}

/// Per-component relevance scores for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub time: f64,
    pub distance: f64,
    pub seats: f64,
    pub total: f64,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_defaults_substituted() {
        let req = SearchRequest::new(
            GeoPoint::new(12.9, 77.6),
            GeoPoint::new(12.95, 77.65),
            t0(),
            Some(-1.0),
            Some(0),
        )
        .unwrap();

        assert_eq!(req.radius_km, DEFAULT_RADIUS_KM);
        assert_eq!(req.time_window_minutes, DEFAULT_TIME_WINDOW_MINUTES);
    }

    #[test]
    fn test_nan_radius_defaults() {
        let req = SearchRequest::new(
            GeoPoint::new(12.9, 77.6),
            GeoPoint::new(12.95, 77.65),
            t0(),
            Some(f64::NAN),
            None,
        )
        .unwrap();

        assert_eq!(req.radius_km, DEFAULT_RADIUS_KM);
    }

    #[test]
    fn test_infinite_radius_rejected() {
        let err = SearchRequest::new(
            GeoPoint::new(12.9, 77.6),
            GeoPoint::new(12.95, 77.65),
            t0(),
            Some(f64::INFINITY),
            None,
        )
        .unwrap_err();

        assert_eq!(err.field(), Some("radiusKm"));
    }

    #[test]
    fn test_out_of_range_pickup_names_field() {
        let err = SearchRequest::with_defaults(
            GeoPoint::new(91.0, 77.6),
            GeoPoint::new(12.95, 77.65),
            t0(),
        )
        .unwrap_err();

        assert_eq!(err.field(), Some("pickup.lat"));
    }

    #[test]
    fn test_out_of_range_drop_longitude_names_field() {
        let err = SearchRequest::with_defaults(
            GeoPoint::new(12.9, 77.6),
            GeoPoint::new(12.95, 181.0),
            t0(),
        )
        .unwrap_err();

        assert_eq!(err.field(), Some("drop.lng"));
    }

    #[test]
    fn test_ride_offer_accepts_date_time_alias() {
        let json = serde_json::json!({
            "rideId": "r1",
            "driverId": "d1",
            "driverName": "Asha",
            "seatsAvailable": 3,
            "fare": 120.0,
            "startPoint": { "lat": 12.9, "lon": 77.6 },
            "endPoint": { "lat": 12.95, "lng": 77.65 },
            "route": [{ "lat": 12.9, "lng": 77.6 }, { "lat": 12.95, "lng": 77.65 }],
            "dateTime": "2025-03-14T08:30:00Z"
        });

        let ride: RideOffer = serde_json::from_value(json).unwrap();
        assert_eq!(ride.departure_time, t0());
        assert_eq!(ride.start_point.lng, 77.6);
        assert!(ride.polyline.is_none());
    }
}
