use crate::dataset::{load_listings, Listing, ListingId};
use crate::error::CoreError;
use crate::index::{ListingMatrix, TfidfModel};
use crate::persist::{load_artifacts, ModelPaths};
use crate::query::{build_query, PreferenceForm};
use crate::scoring::{apply_filters, rank, score_listings, FilterRange, ScoredListing};
use crate::similarity::cosine_all;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub user_form: PreferenceForm,
    pub filters: FilterRange,
    /// Absent or `null` means [`DEFAULT_TOP_N`]
    #[serde(default)]
    pub top_n: Option<usize>,
}

impl RecommendationRequest {
    pub fn top_n(&self) -> usize {
        self.top_n.unwrap_or(DEFAULT_TOP_N)
    }
}

/// One ranked listing as returned to callers. Keys follow the dataset's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: ListingId,
    #[serde(rename = "apart_name")]
    pub name: String,
    pub images: Vec<String>,
    pub detail_url: String,
    #[serde(rename = "descriptions")]
    pub description: String,
    #[serde(rename = "apart_location")]
    pub location: String,
    #[serde(rename = "apart_address_og")]
    pub address: String,
    #[serde(rename = "apart_price")]
    pub price: f64,
    #[serde(rename = "apart_rating")]
    pub rating: f64,
    pub cbf_score: f64,
    pub cbf_score_scaled: f64,
    pub similarity_percent: f64,
}

impl From<ScoredListing<'_>> for Recommendation {
    fn from(s: ScoredListing<'_>) -> Self {
        let l = s.listing;
        Self {
            id: l.id.clone(),
            name: l.name.clone(),
            images: l.images.clone(),
            detail_url: l.detail_url.clone(),
            description: l.description.clone(),
            location: l.location.clone(),
            address: l.address.clone(),
            price: l.price,
            rating: l.rating,
            cbf_score: s.cbf_score,
            cbf_score_scaled: s.cbf_score_scaled,
            similarity_percent: s.similarity_percent,
        }
    }
}

/// Normalize over every listing, then filter, then rank.
pub fn recommend_from_scores(
    listings: &[Listing],
    scores: &[f64],
    filters: &FilterRange,
    top_n: usize,
) -> Result<Vec<Recommendation>, CoreError> {
    let scored = score_listings(listings, scores)?;
    let filtered = apply_filters(scored, filters);
    Ok(rank(filtered, top_n).into_iter().map(Recommendation::from).collect())
}

/// Read-only state shared by all requests: the dataset and the model fitted on it.
#[derive(Debug)]
pub struct Recommender {
    listings: Vec<Listing>,
    model: TfidfModel,
    matrix: ListingMatrix,
}

impl Recommender {
    /// Checks the model, the matrix and their alignment with the dataset, so requests cannot hit a bad index.
    pub fn new(listings: Vec<Listing>, model: TfidfModel, matrix: ListingMatrix) -> Result<Self, CoreError> {
        model.validate()?;
        matrix.validate()?;
        if matrix.dim != model.dim() {
            return Err(CoreError::DimensionMismatch { query: model.dim(), matrix: matrix.dim });
        }
        if matrix.len() != listings.len() {
            return Err(CoreError::RowCountMismatch { rows: matrix.len(), listings: listings.len() });
        }
        Ok(Self { listings, model, matrix })
    }

    /// Load the dataset CSV and the model artifacts from `model_dir`.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(dataset: P, model_dir: Q) -> Result<Self> {
        let listings = load_listings(dataset)?;
        let (model, matrix, meta) = load_artifacts(&ModelPaths::new(model_dir))?;
        tracing::info!(num_listings = listings.len(), num_terms = model.dim(), created_at = %meta.created_at, "loaded tf-idf model");
        Ok(Self::new(listings, model, matrix)?)
    }

    /// Raw cosine score of `query` against every listing, in dataset order.
    pub fn scores(&self, query: &str) -> Result<Vec<f64>, CoreError> {
        let q_vec = self.model.transform(query);
        cosine_all(&q_vec, &self.matrix)
    }

    pub fn recommend(&self, req: &RecommendationRequest) -> Result<Vec<Recommendation>, CoreError> {
        let start = std::time::Instant::now();
        let query = build_query(&req.user_form);
        let scores = self.scores(&query)?;
        let results = recommend_from_scores(&self.listings, &scores, &req.filters, req.top_n())?;
        tracing::debug!(%query, returned = results.len(), took_s = start.elapsed().as_secs_f64(), "recommendation computed");
        Ok(results)
    }
}
