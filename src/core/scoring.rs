use crate::core::distance::distance_km;
use crate::models::{RideOffer, ScoreBreakdown, SearchRequest};

/// Weight of departure time proximity
pub const TIME_WEIGHT: f64 = 0.5;
/// Weight of combined start/end distance
pub const DISTANCE_WEIGHT: f64 = 0.4;
/// Weight of seat availability
pub const SEATS_WEIGHT: f64 = 0.1;

/// Time difference at which the time score reaches zero
const TIME_HORIZON_MINUTES: f64 = 120.0;
/// Combined start + end distance at which the distance score reaches zero
const DISTANCE_HORIZON_KM: f64 = 20.0;

/// Calculate a match score (0-1) for a candidate ride
///
/// Scoring formula:
/// score = clamp(
///     time_score * 0.5 +        # Closer departure = higher
///     distance_score * 0.4 +    # Closer start and end = higher
///     seats_score * 0.1         # Any seat left
/// , 0, 1)
pub fn calculate_match_score(request: &SearchRequest, ride: &RideOffer) -> f64 {
    score_breakdown(request, ride).total
}

/// Component scores and the weighted total for a candidate ride
pub fn score_breakdown(request: &SearchRequest, ride: &RideOffer) -> ScoreBreakdown {
    let minutes_apart = (ride.departure_time - request.desired_time).num_minutes().abs();
    let time = calculate_time_score(minutes_apart);

    let start_km = distance_km(&request.pickup, &ride.start_point);
    let end_km = distance_km(&request.drop, &ride.end_point);
    let distance = calculate_distance_score(start_km + end_km);

    let seats = if ride.has_seats() { 1.0 } else { 0.0 };

    let total = (time * TIME_WEIGHT + distance * DISTANCE_WEIGHT + seats * SEATS_WEIGHT)
        .clamp(0.0, 1.0);

    ScoreBreakdown {
        time,
        distance,
        seats,
        total,
    }
}

/// Calculate time score (0-1)
/// Linear decay over two hours, whole minutes
#[inline]
pub fn calculate_time_score(minutes_apart: i64) -> f64 {
    (1.0 - minutes_apart.unsigned_abs() as f64 / TIME_HORIZON_MINUTES).max(0.0)
}

/// Calculate distance score (0-1)
/// Linear decay over 20 km of combined start and end offset
#[inline]
pub fn calculate_distance_score(combined_km: f64) -> f64 {
    (1.0 - combined_km / DISTANCE_HORIZON_KM).max(0.0)
}
