mod errors;
mod recommendation_service;

pub use errors::{RecommendationError, Result};
pub use recommendation_service::{Recommendation, recommend};
