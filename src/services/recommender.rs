use std::sync::Arc;
use thiserror::Error;

use crate::core::{calculate_bounding_box, rank_cuisines, Ranker};
use crate::models::{RecommendationQuery, RecommendationResponse};

use super::cache::{CacheError, CacheKey, CacheStore};
use super::postgres::{RestaurantSource, StoreError};

/// Errors surfaced by the recommendation pipeline
///
/// All variants are server-side failures; invalid query parameters are
/// rejected before the pipeline runs.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Recommendation pipeline: preference aggregation, spatial candidate
/// retrieval, ranking, and response caching
///
/// Both caches are injected capabilities. The preference cache memoizes a
/// user's top cuisines (long TTL); the response cache memoizes the full
/// serialized response per raw query tuple (short TTL). Neither is
/// proactively invalidated; staleness inside the TTL window is accepted.
pub struct RecommendationService {
    source: Arc<dyn RestaurantSource>,
    preference_cache: Arc<dyn CacheStore>,
    response_cache: Arc<dyn CacheStore>,
    ranker: Ranker,
    top_cuisines_limit: usize,
}

impl RecommendationService {
    pub fn new(
        source: Arc<dyn RestaurantSource>,
        preference_cache: Arc<dyn CacheStore>,
        response_cache: Arc<dyn CacheStore>,
        ranker: Ranker,
        top_cuisines_limit: usize,
    ) -> Self {
        Self {
            source,
            preference_cache,
            response_cache,
            ranker,
            top_cuisines_limit,
        }
    }

    /// A user's top cuisines, most frequent first
    ///
    /// Cache hit returns the stored list without recomputation. A user with
    /// no enriched receipts yields an empty list, which is cached like any
    /// other result.
    pub async fn top_cuisines(&self, user_id: &str) -> Result<Vec<String>, RecommendError> {
        let cache_key = CacheKey::cuisines(user_id);

        if let Some(json) = self.preference_cache.get(&cache_key).await? {
            return Ok(serde_json::from_str(&json)?);
        }

        let history = self.source.cuisine_history(user_id).await?;
        let cuisines = rank_cuisines(history, self.top_cuisines_limit);

        self.preference_cache
            .set(&cache_key, serde_json::to_string(&cuisines)?)
            .await?;

        Ok(cuisines)
    }

    /// Run the ranking pipeline, bypassing the response cache
    pub async fn recommend(
        &self,
        query: &RecommendationQuery,
    ) -> Result<RecommendationResponse, RecommendError> {
        let cuisines = self.top_cuisines(&query.user_id).await?;

        let bbox = calculate_bounding_box(query.latitude, query.longitude, query.max_distance_km);
        let candidates = self
            .source
            .restaurants_within(&bbox, query.price_level)
            .await?;

        let ranked = self.ranker.rank(
            query.latitude,
            query.longitude,
            query.max_distance_km,
            query.price_level,
            &cuisines,
            candidates,
            query.limit,
        );

        tracing::debug!(
            "Ranked {} of {} candidates for user {}",
            ranked.entries.len(),
            ranked.total_candidates,
            query.user_id
        );

        Ok(RecommendationResponse::assemble(
            query,
            cuisines,
            &ranked.entries,
        ))
    }

    /// Serve a recommendation response through the response cache
    ///
    /// Returns the serialized JSON body. On a hit the stored payload comes
    /// back verbatim and the ranking pipeline is never invoked, even if the
    /// underlying catalog has changed since the entry was written.
    pub async fn get_or_compute(
        &self,
        query: &RecommendationQuery,
    ) -> Result<String, RecommendError> {
        let cache_key = CacheKey::recommendations(
            &query.user_id,
            &query.lat_raw,
            &query.lng_raw,
            &query.max_distance_raw,
            query.price_level_raw.as_deref(),
            query.limit,
        );

        if let Some(body) = self.response_cache.get(&cache_key).await? {
            tracing::debug!("Response cache hit for {}", cache_key);
            return Ok(body);
        }

        let response = self.recommend(query).await?;
        let body = serde_json::to_string(&response)?;

        self.response_cache.set(&cache_key, body.clone()).await?;

        Ok(body)
    }
}
