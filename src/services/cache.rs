use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),
}

/// Cache capability injected into the recommendation service
///
/// Entries expire after the backend's configured TTL; a cache-fill race
/// between concurrent requests resolves last-writer-wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a stored value, or None when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value under the backend's TTL
    async fn set(&self, key: &str, value: String) -> Result<(), CacheError>;
}

/// Two-tier Redis-backed cache
///
/// L1 (in-memory) sits in front of L2 (Redis, shared across instances).
/// Each instance carries one fixed TTL; the service wires separate instances
/// for the preference cache and the response cache.
pub struct RedisCache {
    // ConnectionManager needs interior mutability for command dispatch
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    l1_cache: moka::future::Cache<String, String>,
    ttl_secs: u64,
}

impl RedisCache {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            l1_cache,
            ttl_secs,
        })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        // Try L1 cache first
        if let Some(value) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(Some(value));
        }

        // Try L2 cache (Redis)
        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        if let Some(value) = value {
            tracing::trace!("L2 cache hit: {}", key);

            // Populate L1 cache
            self.l1_cache.insert(key.to_string(), value.clone()).await;

            return Ok(Some(value));
        }

        tracing::trace!("Cache miss: {}", key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        // Set in L1 cache (uses configured TTL)
        self.l1_cache.insert(key.to_string(), value.clone()).await;

        // Set in L2 cache with explicit TTL
        let mut conn = self.redis.lock().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(value)
            .query_async::<()>(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }
}

/// Single-process in-memory cache
///
/// Backs tests and cache-less deployments; same TTL semantics as the Redis
/// tier, without the shared L2.
pub struct MemoryCache {
    entries: moka::future::Cache<String, String>,
}

impl MemoryCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        Self {
            entries: moka::future::CacheBuilder::new(capacity)
                .time_to_live(Duration::from_secs(ttl_secs))
                .build(),
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value).await;
        Ok(())
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a user's top cuisines
    pub fn cuisines(user_id: &str) -> String {
        format!("cuisines:{}", user_id)
    }

    /// Build a cache key for a full recommendation response
    ///
    /// Keys use the raw query text as the client sent it: numerically equal
    /// but textually different parameters ("5" vs "5.0") address distinct
    /// entries.
    pub fn recommendations(
        user_id: &str,
        lat_raw: &str,
        lng_raw: &str,
        max_distance_raw: &str,
        price_level_raw: Option<&str>,
        limit: usize,
    ) -> String {
        format!(
            "rec:{}:{}:{}:{}:{}:{}",
            user_id,
            lat_raw,
            lng_raw,
            max_distance_raw,
            price_level_raw.unwrap_or("none"),
            limit
        )
    }
}
