use tokio_util::sync::CancellationToken;

use crate::core::{
    error::MatchError,
    filters::{filter_candidates, CandidateFilter},
    scoring::calculate_match_score,
    source::RideSource,
};
use crate::models::{MatchResult, RideOffer, SearchRequest};

/// Result of a complete search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Matching orchestrator
///
/// # Pipeline Stages
/// 1. Candidate filtering (time window, seats, pickup, drop, route)
/// 2. Scoring
/// 3. Ranking by score, then ride id
///
/// Holds no state; one instance can serve any number of concurrent searches.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Keep only the rides passing every hard constraint, in input order
    pub fn filter_candidates<I>(&self, request: &SearchRequest, rides: I) -> Vec<RideOffer>
    where
        I: IntoIterator<Item = RideOffer>,
    {
        let filter = filter_candidates(request);

        rides
            .into_iter()
            .filter(|ride| match filter.first_failure(ride) {
                None => true,
                Some(failed) => {
                    tracing::trace!("Ride {} rejected by {:?}", ride.ride_id, failed);
                    false
                }
            })
            .collect()
    }

    /// Score every candidate and order by descending score
    ///
    /// Equal scores are ordered by ride id so the output does not depend on
    /// candidate order. No candidate is dropped.
    pub fn rank_matches(&self, request: &SearchRequest, candidates: &[RideOffer]) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = candidates
            .iter()
            .map(|ride| score_candidate(request, ride))
            .collect();

        sort_results(&mut results);
        results
    }

    /// Like [`Matcher::rank_matches`], but gives up as soon as `cancel` fires
    ///
    /// A cancelled ranking yields [`MatchError::Cancelled`] and no partial list.
    pub fn rank_matches_cancellable(
        &self,
        request: &SearchRequest,
        candidates: &[RideOffer],
        cancel: &CancellationToken,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let mut results = Vec::with_capacity(candidates.len());

        for ride in candidates {
            if cancel.is_cancelled() {
                tracing::debug!(
                    "Ranking cancelled after {} of {} candidates",
                    results.len(),
                    candidates.len()
                );
                return Err(MatchError::Cancelled);
            }
            results.push(score_candidate(request, ride));
        }

        sort_results(&mut results);
        Ok(results)
    }

    /// Fetch candidates from `source` and rank them
    pub fn search<S>(
        &self,
        request: &SearchRequest,
        source: &S,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, MatchError>
    where
        S: RideSource + ?Sized,
    {
        if cancel.is_cancelled() {
            return Err(MatchError::Cancelled);
        }

        let filter: CandidateFilter = filter_candidates(request);
        let candidates = source.candidates(&filter);
        let total_candidates = candidates.len();

        tracing::debug!(
            "Found {} candidates (radius {} km, window {} min)",
            total_candidates,
            request.radius_km,
            request.time_window_minutes
        );

        let matches = self.rank_matches_cancellable(request, &candidates, cancel)?;

        Ok(SearchOutcome {
            matches,
            total_candidates,
        })
    }
}

fn score_candidate(request: &SearchRequest, ride: &RideOffer) -> MatchResult {
    MatchResult {
        ride_id: ride.ride_id.clone(),
        driver_name: ride.driver_name.clone(),
        start_time: ride.departure_time,
        available_seats: ride.seats_available,
        fare: ride.fare,
        match_score: calculate_match_score(request, ride),
    }
}

fn sort_results(results: &mut [MatchResult]) {
    results.sort_by(|a, b| {
        b.match_score
            .total_cmp(&a.match_score)
            .then_with(|| a.ride_id.cmp(&b.ride_id))
    });
}
