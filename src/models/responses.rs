use serde::{Deserialize, Serialize};

use crate::models::domain::MatchResult;

/// Response for the ride search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRidesResponse {
    #[serde(rename = "searchId")]
    pub search_id: String,
    pub matches: Vec<MatchResult>,
    /// Candidates found before the limit was applied
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "indexedRides")]
    pub indexed_rides: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Index or delete acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRideResponse {
    #[serde(rename = "rideId")]
    pub ride_id: String,
    pub status: String,
}
