// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BoundingBox, RankedRestaurant, RecommendationQuery, Restaurant};
pub use requests::{InvalidParam, QueryDefaults, RecommendationParams};
pub use responses::{ErrorResponse, HealthResponse, RecommendationEntry, RecommendationResponse};
