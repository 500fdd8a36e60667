//! Savor Rec - restaurant recommendation service for the Savor receipt app
//!
//! This library provides the recommendation engine behind the Savor backend:
//! geospatial candidate filtering, cuisine-preference ranking, and the two
//! cache layers (per-user top cuisines and full responses) in front of it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Ranker, distance::{haversine_distance, calculate_bounding_box}};
pub use crate::models::{Restaurant, RankedRestaurant, RecommendationQuery, RecommendationParams, RecommendationResponse, QueryDefaults};
pub use crate::services::{RecommendationService, RestaurantSource, CacheStore, MemoryCache};
