// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, GeoPoint, MatchResult, RideOffer, ScoreBreakdown, SearchRequest,
    DEFAULT_RADIUS_KM, DEFAULT_TIME_WINDOW_MINUTES,
};
pub use requests::{GeoPointDto, IndexRideRequest, RouteGeometry, SearchRidesRequest};
pub use responses::{ErrorResponse, HealthResponse, IndexRideResponse, SearchRidesResponse};
