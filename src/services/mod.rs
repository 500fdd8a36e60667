// Service exports
pub mod cache;
pub mod postgres;
pub mod recommender;

pub use cache::{CacheError, CacheKey, CacheStore, MemoryCache, RedisCache};
pub use postgres::{PostgresClient, RestaurantSource, StoreError};
pub use recommender::{RecommendError, RecommendationService};
