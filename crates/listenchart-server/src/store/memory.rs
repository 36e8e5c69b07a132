use async_trait::async_trait;
use dashmap::DashMap;

use listenchart_core::error::Result;

use super::ListenerStore;

/// In-process store, used by tests and local runs without Redis.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

#[async_trait]
impl ListenerStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|e| e.value().clone()))
    }
}
