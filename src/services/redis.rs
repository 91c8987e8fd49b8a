//! Redis integration service implementation
//!
//! This service handles the Redis connection and JSON key/value helpers used
//! to keep per-user dashboard context between bot interactions.

use async_trait::async_trait;
use redis::{Client, AsyncCommands};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use crate::config::settings::RedisConfig;
use crate::utils::errors::Result;

/// Minimal JSON key/value store with expiry
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn set_json(&self, key: &str, value: serde_json::Value, ttl_seconds: u64) -> Result<()>;

    async fn get_json(&self, key: &str) -> Result<Option<serde_json::Value>>;

    async fn delete(&self, key: &str) -> Result<bool>;
}

/// Redis service for caching and state management
#[derive(Clone, Debug)]
pub struct RedisService {
    client: Client,
    config: RedisConfig,
}

impl RedisService {
    /// Create a new RedisService instance
    pub fn new(config: RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        Ok(Self { client, config })
    }

    /// Get Redis connection
    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.config.prefix, key)
    }

    /// Set a value in Redis with TTL
    pub async fn set<T>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) -> Result<()>
    where
        T: Serialize,
    {
        let mut conn = self.get_connection().await?;
        let serialized = serde_json::to_string(value)?;

        let full_key = self.full_key(key);
        let ttl = ttl_seconds.unwrap_or(self.config.ttl_seconds);

        let _: () = conn.set_ex(&full_key, serialized, ttl).await?;

        debug!(key = %full_key, ttl = ttl, "Value set in Redis");
        Ok(())
    }

    /// Get a value from Redis
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let mut conn = self.get_connection().await?;
        let full_key = self.full_key(key);

        let result: Option<String> = conn.get(&full_key).await?;

        match result {
            Some(data) => {
                let deserialized = serde_json::from_str::<T>(&data)?;
                debug!(key = %full_key, "Value retrieved from Redis");
                Ok(Some(deserialized))
            }
            None => {
                debug!(key = %full_key, "Key not found in Redis");
                Ok(None)
            }
        }
    }

    /// Delete a key from Redis
    pub async fn remove(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let full_key = self.full_key(key);

        let deleted: i32 = conn.del(&full_key).await?;

        debug!(key = %full_key, deleted = deleted > 0, "Key deletion attempted");
        Ok(deleted > 0)
    }

    /// Health check for Redis connection
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

#[async_trait]
impl KeyValueStore for RedisService {
    async fn set_json(&self, key: &str, value: serde_json::Value, ttl_seconds: u64) -> Result<()> {
        self.set(key, &value, Some(ttl_seconds)).await
    }

    async fn get_json(&self, key: &str) -> Result<Option<serde_json::Value>> {
        self.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.remove(key).await
    }
}
