use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::MatchError;
use crate::models::domain::{GeoPoint, RideOffer, SearchRequest};

/// Coordinate as sent by clients
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct GeoPointDto {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(alias = "lon")]
    pub lng: f64,
}

impl From<GeoPointDto> for GeoPoint {
    fn from(dto: GeoPointDto) -> Self {
        GeoPoint::new(dto.lat, dto.lng)
    }
}

/// Request to search for rides
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRidesRequest {
    #[validate(nested)]
    #[serde(default)]
    pub pickup: Option<GeoPointDto>,
    #[validate(nested)]
    #[serde(default)]
    pub drop: Option<GeoPointDto>,
    #[serde(rename = "dateTime", alias = "desiredTime", default)]
    pub date_time: Option<DateTime<Utc>>,
    #[serde(rename = "radiusKm", default)]
    pub radius_km: Option<f64>,
    #[serde(rename = "timeWindowMinutes", default)]
    pub time_window_minutes: Option<i64>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl TryFrom<&SearchRidesRequest> for SearchRequest {
    type Error = MatchError;

    fn try_from(req: &SearchRidesRequest) -> Result<Self, Self::Error> {
        let pickup = req
            .pickup
            .ok_or_else(|| MatchError::invalid("pickup", "pickup is required"))?;
        let drop = req
            .drop
            .ok_or_else(|| MatchError::invalid("drop", "drop is required"))?;
        let desired_time = req
            .date_time
            .ok_or_else(|| MatchError::invalid("dateTime", "dateTime is required"))?;

        SearchRequest::new(
            pickup.into(),
            drop.into(),
            desired_time,
            req.radius_km,
            req.time_window_minutes,
        )
    }
}

/// GeoJSON LineString describing a driver's route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lng, lat]` positions, GeoJSON order
    pub coordinates: Vec<[f64; 2]>,
}

impl RouteGeometry {
    pub fn line_string(points: &[GeoPoint]) -> Self {
        Self {
            kind: "LineString".to_string(),
            coordinates: points.iter().map(|p| [p.lng, p.lat]).collect(),
        }
    }

    fn into_points(self) -> Result<Vec<GeoPoint>, MatchError> {
        if self.kind != "LineString" {
            return Err(MatchError::invalid(
                "route.type",
                format!("expected LineString, got {}", self.kind),
            ));
        }
        if self.coordinates.len() < 2 {
            return Err(MatchError::invalid(
                "route.coordinates",
                "a LineString needs at least two positions",
            ));
        }

        self.coordinates
            .into_iter()
            .enumerate()
            .map(|(i, [lng, lat])| {
                let point = GeoPoint::new(lat, lng);
                point.validate(&format!("route.coordinates[{}]", i))?;
                Ok(point)
            })
            .collect()
    }
}

/// Request to publish or replace a ride in the index
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IndexRideRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "rideId")]
    pub ride_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "driverName")]
    pub driver_name: String,
    #[serde(rename = "seatsAvailable")]
    pub seats_available: u32,
    #[validate(range(min = 0.0))]
    pub fare: f64,
    #[serde(default)]
    pub polyline: Option<String>,
    #[validate(nested)]
    #[serde(rename = "startPoint")]
    pub start_point: GeoPointDto,
    #[validate(nested)]
    #[serde(rename = "endPoint")]
    pub end_point: GeoPointDto,
    pub route: RouteGeometry,
    #[serde(rename = "dateTime", alias = "departureTime")]
    pub date_time: DateTime<Utc>,
}

impl TryFrom<IndexRideRequest> for RideOffer {
    type Error = MatchError;

    fn try_from(req: IndexRideRequest) -> Result<Self, Self::Error> {
        if !req.fare.is_finite() || req.fare < 0.0 {
            return Err(MatchError::invalid("fare", "fare must be a non-negative amount"));
        }

        let start_point = GeoPoint::from(req.start_point);
        let end_point = GeoPoint::from(req.end_point);
        start_point.validate("startPoint")?;
        end_point.validate("endPoint")?;

        let route = req.route.into_points()?;

        Ok(RideOffer {
            ride_id: req.ride_id,
            driver_id: req.driver_id,
            driver_name: req.driver_name,
            seats_available: req.seats_available,
            fare: req.fare,
            polyline: req.polyline,
            start_point,
            end_point,
            route,
            departure_time: req.date_time,
        })
    }
}
