// Core algorithm exports
pub mod distance;
pub mod error;
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod source;

pub use distance::{calculate_bounding_box, distance_km, haversine_distance, is_within_bounding_box};
pub use error::MatchError;
pub use filters::{filter_candidates, CandidateFilter, Predicate, PredicateKind};
pub use matcher::{Matcher, SearchOutcome};
pub use scoring::{calculate_match_score, score_breakdown};
pub use source::RideSource;
