use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{MatchError, Matcher};
use crate::models::{
    ErrorResponse, HealthResponse, IndexRideRequest, IndexRideResponse, RideOffer, SearchRequest,
    SearchRidesRequest, SearchRidesResponse,
};
use crate::services::{IndexError, RideIndex};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<RideIndex>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

/// Configure all ride-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/index/ride", web::post().to(index_ride))
        .route("/index/ride/{id}", web::delete().to(delete_ride))
        .route("/search/rides", web::post().to(search_rides));
}

fn error_body(error: &str, message: impl Into<String>, status_code: u16) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    }
}

fn invalid_input(err: &MatchError) -> HttpResponse {
    HttpResponse::BadRequest().json(error_body("Invalid input", err.to_string(), 400))
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        indexed_rides: state.index.len(),
    })
}

/// Publish or replace a ride
///
/// POST /api/v1/index/ride
///
/// Request body:
/// ```json
/// {
///   "rideId": "string",
///   "driverId": "string",
///   "driverName": "string",
///   "seatsAvailable": 3,
///   "fare": 120.0,
///   "polyline": "optional",
///   "startPoint": { "lat": 12.9, "lng": 77.6 },
///   "endPoint": { "lat": 12.95, "lng": 77.65 },
///   "route": { "type": "LineString", "coordinates": [[77.6, 12.9], [77.65, 12.95]] },
///   "dateTime": "2025-03-14T08:00:00Z"
/// }
/// ```
async fn index_ride(
    state: web::Data<AppState>,
    req: web::Json<IndexRideRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for index_ride request: {}", errors);
        return HttpResponse::BadRequest().json(error_body(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let ride = match RideOffer::try_from(req.into_inner()) {
        Ok(ride) => ride,
        Err(e) => {
            tracing::info!("Rejected ride: {}", e);
            return invalid_input(&e);
        }
    };

    let ride_id = ride.ride_id.clone();
    state.index.upsert(ride);

    tracing::info!("Indexed ride {} ({} rides total)", ride_id, state.index.len());

    HttpResponse::Ok().json(IndexRideResponse {
        ride_id,
        status: "indexed".to_string(),
    })
}

/// Remove a ride
///
/// DELETE /api/v1/index/ride/{id}
async fn delete_ride(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let ride_id = path.into_inner();

    match state.index.remove(&ride_id) {
        Ok(_) => {
            tracing::info!("Deleted ride {}", ride_id);
            HttpResponse::Ok().json(IndexRideResponse {
                ride_id,
                status: "deleted".to_string(),
            })
        }
        Err(e @ IndexError::NotFound(_)) => {
            HttpResponse::NotFound().json(error_body("Ride not found", e.to_string(), 404))
        }
    }
}

/// Search for rides
///
/// POST /api/v1/search/rides
///
/// Request body:
/// ```json
/// {
///   "pickup": { "lat": 12.9, "lng": 77.6 },
///   "drop": { "lat": 12.95, "lng": 77.65 },
///   "dateTime": "2025-03-14T08:00:00Z",
///   "radiusKm": 5.0,
///   "timeWindowMinutes": 60,
///   "limit": 20
/// }
/// ```
async fn search_rides(
    state: web::Data<AppState>,
    req: web::Json<SearchRidesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search_rides request: {}", errors);
        return HttpResponse::BadRequest().json(error_body(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let request = match SearchRequest::try_from(&*req) {
        Ok(request) => request,
        Err(e) => {
            tracing::info!("Rejected search: {}", e);
            return invalid_input(&e);
        }
    };

    let limit = state.matching.result_limit(req.limit);
    let search_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(
        "Search {}: pickup ({}, {}), drop ({}, {}), at {}, limit {}",
        search_id,
        request.pickup.lat,
        request.pickup.lng,
        request.drop.lat,
        request.drop.lng,
        request.desired_time,
        limit
    );

    // Cancel ranking once the search deadline passes
    let cancel = CancellationToken::new();
    let deadline = Duration::from_millis(state.matching.search_timeout_ms);
    let expires_at = Instant::now() + deadline;
    let timer = {
        let cancel = cancel.clone();
        actix_web::rt::spawn(async move {
            tokio::time::sleep_until(expires_at).await;
            cancel.cancel();
        })
    };

    let index = Arc::clone(&state.index);
    let matcher = state.matcher;
    let result = web::block(move || {
        // queued on the blocking pool past the deadline
        if Instant::now() >= expires_at {
            cancel.cancel();
        }
        matcher.search(&request, &*index, &cancel)
    })
    .await;
    timer.abort();

    match result {
        Ok(Ok(mut outcome)) => {
            outcome.matches.truncate(limit);

            tracing::info!(
                "Search {}: returning {} matches (from {} candidates)",
                search_id,
                outcome.matches.len(),
                outcome.total_candidates
            );

            HttpResponse::Ok().json(SearchRidesResponse {
                search_id,
                matches: outcome.matches,
                total_results: outcome.total_candidates,
            })
        }
        Ok(Err(MatchError::Cancelled)) => {
            tracing::warn!("Search {} exceeded {:?} deadline", search_id, deadline);
            HttpResponse::GatewayTimeout().json(error_body(
                "Search timed out",
                MatchError::Cancelled.to_string(),
                504,
            ))
        }
        Ok(Err(e)) => invalid_input(&e),
        Err(e) => {
            tracing::error!("Search {} failed: {}", search_id, e);
            HttpResponse::InternalServerError().json(error_body(
                "Search failed",
                e.to_string(),
                500,
            ))
        }
    }
}
