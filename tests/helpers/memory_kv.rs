//! In-memory key-value store standing in for Redis

use std::collections::HashMap;
use std::sync::Mutex;
use async_trait::async_trait;

use ChurchHub::services::KeyValueStore;
use ChurchHub::Result;

#[derive(Default)]
pub struct MemoryKv {
    values: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn set_json(&self, key: &str, value: serde_json::Value, _ttl_seconds: u64) -> Result<()> {
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn get_json(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.values.lock().unwrap().remove(key).is_some())
    }
}
