use chrono::{DateTime, Duration, Utc};
use geo::{coord, Intersects, Line, LineString};
use serde::Serialize;

use crate::core::distance::{calculate_bounding_box, distance_km};
use crate::models::{BoundingBox, GeoPoint, RideOffer, SearchRequest};

/// Identifies one of the hard constraints a candidate must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    DepartureWindow,
    SeatsAvailable,
    NearPickup,
    NearDrop,
    RouteIntersects,
}

/// A single inclusion predicate, in a form that can be evaluated locally or
/// translated into a backend query by an adapter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "predicate", rename_all = "snake_case")]
pub enum Predicate {
    /// Departure lies in `[from, to]`, both ends inclusive
    DepartureWindow {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    /// At least one seat left
    SeatsAvailable,
    /// Ride starts within `radius_km` of `center`
    NearPickup { center: GeoPoint, radius_km: f64 },
    /// Ride ends within `radius_km` of `center`
    NearDrop { center: GeoPoint, radius_km: f64 },
    /// The straight segment `from -> to` crosses the ride's route
    RouteIntersects { from: GeoPoint, to: GeoPoint },
}

impl Predicate {
    pub fn kind(&self) -> PredicateKind {
        match self {
            Predicate::DepartureWindow { .. } => PredicateKind::DepartureWindow,
            Predicate::SeatsAvailable => PredicateKind::SeatsAvailable,
            Predicate::NearPickup { .. } => PredicateKind::NearPickup,
            Predicate::NearDrop { .. } => PredicateKind::NearDrop,
            Predicate::RouteIntersects { .. } => PredicateKind::RouteIntersects,
        }
    }

    #[inline]
    pub fn matches(&self, ride: &RideOffer) -> bool {
        match self {
            Predicate::DepartureWindow { from, to } => departs_within(ride, *from, *to),
            Predicate::SeatsAvailable => has_available_seats(ride),
            Predicate::NearPickup { center, radius_km } => starts_near(ride, center, *radius_km),
            Predicate::NearDrop { center, radius_km } => ends_near(ride, center, *radius_km),
            Predicate::RouteIntersects { from, to } => segment_intersects_route(from, to, &ride.route),
        }
    }
}

#[inline]
pub fn departs_within(ride: &RideOffer, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
    ride.departure_time >= from && ride.departure_time <= to
}

#[inline]
pub fn has_available_seats(ride: &RideOffer) -> bool {
    ride.has_seats()
}

#[inline]
pub fn starts_near(ride: &RideOffer, pickup: &GeoPoint, radius_km: f64) -> bool {
    distance_km(pickup, &ride.start_point) <= radius_km
}

#[inline]
pub fn ends_near(ride: &RideOffer, drop: &GeoPoint, radius_km: f64) -> bool {
    distance_km(drop, &ride.end_point) <= radius_km
}

/// Planar intersection test between the rider's direct segment and a route,
/// with longitude as x and latitude as y
///
/// An empty route never intersects. A single-point route intersects only if
/// the point lies on the segment. A segment spanning more than 180° of
/// longitude is split where its short path crosses the antimeridian.
pub fn segment_intersects_route(from: &GeoPoint, to: &GeoPoint, route: &[GeoPoint]) -> bool {
    let pieces = rider_segments(from, to);

    match route {
        [] => false,
        [only] => {
            let point = only.to_coord();
            pieces.iter().any(|piece| piece.intersects(&point))
        }
        _ => {
            let path: LineString<f64> = route.iter().map(|p| p.to_coord()).collect();
            pieces.iter().any(|piece| piece.intersects(&path))
        }
    }
}

/// The rider's segment as one line, or two lines meeting at ±180° longitude
fn rider_segments(from: &GeoPoint, to: &GeoPoint) -> Vec<Line<f64>> {
    let span = to.lng - from.lng;
    if span.abs() <= 180.0 {
        return vec![Line::new(from.to_coord(), to.to_coord())];
    }

    // heading west across -180 when span > 0, east across +180 otherwise
    let (near_edge, far_edge, unwrapped) = if span > 0.0 {
        (-180.0, 180.0, to.lng - 360.0)
    } else {
        (180.0, -180.0, to.lng + 360.0)
    };
    let t = (near_edge - from.lng) / (unwrapped - from.lng);
    let crossing_lat = from.lat + t * (to.lat - from.lat);

    vec![
        Line::new(from.to_coord(), coord! { x: near_edge, y: crossing_lat }),
        Line::new(coord! { x: far_edge, y: crossing_lat }, to.to_coord()),
    ]
}

/// Departure window bounds, saturating at the representable time range
pub fn departure_window(desired: DateTime<Utc>, minutes: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    match Duration::try_minutes(minutes) {
        Some(delta) => (
            desired
                .checked_sub_signed(delta)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            desired
                .checked_add_signed(delta)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        ),
        None => (DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC),
    }
}

/// Conjunction of the hard constraints derived from one search request
///
/// A ride is a candidate only if every predicate holds; there is no partial
/// match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateFilter {
    predicates: Vec<Predicate>,
    #[serde(skip)]
    pickup_bounds: BoundingBox,
}

impl CandidateFilter {
    pub fn from_request(request: &SearchRequest) -> Self {
        let (from, to) = departure_window(request.desired_time, request.time_window_minutes);

        let predicates = vec![
            Predicate::DepartureWindow { from, to },
            Predicate::SeatsAvailable,
            Predicate::NearPickup {
                center: request.pickup,
                radius_km: request.radius_km,
            },
            Predicate::NearDrop {
                center: request.drop,
                radius_km: request.radius_km,
            },
            Predicate::RouteIntersects {
                from: request.pickup,
                to: request.drop,
            },
        ];

        let pickup_bounds =
            calculate_bounding_box(request.pickup.lat, request.pickup.lng, request.radius_km);

        Self {
            predicates,
            pickup_bounds,
        }
    }

    /// The predicates making up this filter, for adapters that translate
    /// them into a backend query
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Box enclosing every start point that can satisfy the pickup predicate
    pub fn pickup_bounds(&self) -> &BoundingBox {
        &self.pickup_bounds
    }

    #[inline]
    pub fn matches(&self, ride: &RideOffer) -> bool {
        self.predicates.iter().all(|p| p.matches(ride))
    }

    /// First predicate the ride fails, if any
    pub fn first_failure(&self, ride: &RideOffer) -> Option<PredicateKind> {
        self.predicates
            .iter()
            .find(|p| !p.matches(ride))
            .map(Predicate::kind)
    }
}

/// Build the candidate filter for a search request
pub fn filter_candidates(request: &SearchRequest) -> CandidateFilter {
    CandidateFilter::from_request(request)
}
