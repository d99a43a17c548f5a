use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Two-tier cache for recommendation lists
///
/// L1 is an in-process moka cache; L2 is an optional Redis instance shared
/// across processes. Entries expire after the configured TTL in both tiers.
pub struct RecommendationCache {
    l1_cache: moka::future::Cache<String, Arc<str>>,
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    ttl_secs: u64,
}

impl RecommendationCache {
    /// In-process cache only
    pub fn new(l1_size: u64, ttl_secs: u64) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .support_invalidation_closures()
            .build();

        Self {
            l1_cache,
            redis: None,
            ttl_secs,
        }
    }

    /// Add a Redis tier behind the in-process cache
    pub async fn with_redis(mut self, redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;
        self.redis = Some(Arc::new(tokio::sync::Mutex::new(manager)));
        Ok(self)
    }

    /// Look a value up, L1 first, then L2
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned,
    {
        if let Some(json) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(Some(serde_json::from_str(&json)?));
        }

        let Some(redis) = &self.redis else {
            tracing::trace!("Cache miss: {}", key);
            return Ok(None);
        };

        let mut conn = redis.lock().await;
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut *conn).await?;
        drop(conn);

        match value {
            Some(json) => {
                tracing::trace!("L2 cache hit: {}", key);
                let parsed = serde_json::from_str(&json)?;
                self.l1_cache.insert(key.to_string(), Arc::from(json)).await;
                Ok(Some(parsed))
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Ok(None)
            }
        }
    }

    /// Store a value in both tiers
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let _: () = redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(&json)
                .query_async(&mut *conn)
                .await?;
        }

        self.l1_cache.insert(key.to_string(), Arc::from(json)).await;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Drop every cached recommendation list for a participant
    pub async fn invalidate_participant(&self, participant_id: &str) -> Result<(), CacheError> {
        let prefix = CacheKey::participant_prefix(participant_id);
        let l1_prefix = prefix.clone();
        if let Err(e) = self
            .l1_cache
            .invalidate_entries_if(move |key, _| key.starts_with(&l1_prefix))
        {
            tracing::warn!("L1 invalidation rejected: {}", e);
        }

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let keys: Vec<String> = redis::cmd("KEYS")
                .arg(format!("{}*", prefix))
                .query_async(&mut *conn)
                .await?;

            if !keys.is_empty() {
                let _: () = redis::cmd("DEL")
                    .arg(keys)
                    .query_async(&mut *conn)
                    .await?;
            }
        }

        tracing::debug!("Invalidated cached recommendations for {}", participant_id);
        Ok(())
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for a participant's top-`limit` recommendations
    pub fn recommendations(participant_id: &str, limit: usize) -> String {
        format!("{}{}", Self::participant_prefix(participant_id), limit)
    }

    fn participant_prefix(participant_id: &str) -> String {
        format!("recs:{}:", participant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::recommendations("p123", 5), "recs:p123:5");
    }

    #[tokio::test]
    async fn test_l1_set_get() {
        let cache = RecommendationCache::new(100, 60);
        let key = CacheKey::recommendations("p1", 5);

        assert_eq!(cache.get::<Vec<String>>(&key).await.unwrap(), None);

        cache.set(&key, &vec!["m1".to_string(), "m2".to_string()]).await.unwrap();
        let cached: Option<Vec<String>> = cache.get(&key).await.unwrap();
        assert_eq!(cached, Some(vec!["m1".to_string(), "m2".to_string()]));
    }

    #[tokio::test]
    async fn test_invalidate_participant() {
        let cache = RecommendationCache::new(100, 60);
        cache.set(&CacheKey::recommendations("p1", 5), &1u8).await.unwrap();
        cache.set(&CacheKey::recommendations("p1", 10), &2u8).await.unwrap();
        cache.set(&CacheKey::recommendations("p2", 5), &3u8).await.unwrap();

        cache.invalidate_participant("p1").await.unwrap();

        assert_eq!(cache.get::<u8>(&CacheKey::recommendations("p1", 5)).await.unwrap(), None);
        assert_eq!(cache.get::<u8>(&CacheKey::recommendations("p1", 10)).await.unwrap(), None);
        assert_eq!(cache.get::<u8>(&CacheKey::recommendations("p2", 5)).await.unwrap(), Some(3));
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_redis_tier() {
        let cache = RecommendationCache::new(100, 60)
            .with_redis("redis://127.0.0.1:6379")
            .await
            .expect("Failed to connect to Redis");

        let key = CacheKey::recommendations("redis_test", 5);
        cache.set(&key, &"value").await.unwrap();
        let result: Option<String> = cache.get(&key).await.unwrap();
        assert_eq!(result.as_deref(), Some("value"));

        cache.invalidate_participant("redis_test").await.unwrap();
        assert_eq!(cache.get::<String>(&key).await.unwrap(), None);
    }
}
