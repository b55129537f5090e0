pub mod dataset;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod recommend;
pub mod scoring;
pub mod similarity;
pub mod tokenizer;

pub use dataset::{Listing, ListingId};
pub use error::CoreError;
pub use index::{FitOptions, ListingMatrix, SparseVector, TfidfModel};
pub use tokenizer::TokenizerOptions;
pub use query::{build_query, Facilities, PreferenceForm};
pub use recommend::{Recommendation, RecommendationRequest, Recommender};
pub use scoring::{FilterRange, ScoredListing};

pub type TermId = u32;
