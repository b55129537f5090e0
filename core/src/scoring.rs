use crate::dataset::Listing;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Guards the scaled score against a zero score range.
pub const SCALE_EPSILON: f64 = 1e-9;

/// Inclusive numeric bounds. `min > max` is not rejected; it simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterRange {
    pub min_price: f64,
    pub max_price: f64,
    pub min_rating: f64,
    pub max_rating: f64,
    pub min_size: f64,
    pub max_size: f64,
}

impl FilterRange {
    pub fn contains(&self, listing: &Listing) -> bool {
        (self.min_price..=self.max_price).contains(&listing.price)
            && (self.min_rating..=self.max_rating).contains(&listing.rating)
            && (self.min_size..=self.max_size).contains(&listing.size)
    }
}

/// A listing together with the scores computed for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredListing<'a> {
    pub listing: &'a Listing,
    pub cbf_score: f64,
    pub cbf_score_scaled: f64,
    pub similarity_percent: f64,
}

/// Rescales raw scores onto [1, 5] using the min and max of the whole sequence.
pub fn scale_scores(scores: &[f64]) -> Vec<f64> {
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    scores
        .iter()
        .map(|s| (s - min) / (max - min + SCALE_EPSILON) * 4.0 + 1.0)
        .collect()
}

pub fn similarity_percent(score: f64) -> f64 {
    score * 100.0
}

/// Attaches raw, scaled and percent scores to every listing.
/// `scores[i]` must belong to `listings[i]`.
pub fn score_listings<'a>(listings: &'a [Listing], scores: &[f64]) -> Result<Vec<ScoredListing<'a>>, CoreError> {
    if listings.len() != scores.len() {
        return Err(CoreError::RowCountMismatch { rows: scores.len(), listings: listings.len() });
    }
    let scaled = scale_scores(scores);
    Ok(listings
        .iter()
        .zip(scores.iter().zip(scaled))
        .map(|(listing, (&raw, scaled))| ScoredListing {
            listing,
            cbf_score: raw,
            cbf_score_scaled: scaled,
            similarity_percent: similarity_percent(raw),
        })
        .collect())
}

pub fn apply_filters<'a>(scored: Vec<ScoredListing<'a>>, filters: &FilterRange) -> Vec<ScoredListing<'a>> {
    scored.into_iter().filter(|s| filters.contains(s.listing)).collect()
}

/// Highest raw score first; equal scores keep dataset order.
pub fn rank(mut scored: Vec<ScoredListing<'_>>, top_n: usize) -> Vec<ScoredListing<'_>> {
    scored.sort_by(|a, b| b.cbf_score.total_cmp(&a.cbf_score));
    scored.truncate(top_n);
    scored
}
