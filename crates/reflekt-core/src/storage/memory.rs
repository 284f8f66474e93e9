//! In-memory key-value backend.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::PersistenceError;

use super::KeyValueStore;

/// HashMap-backed store. Contents are lost when dropped; intended for
/// tests and short-lived embeddings.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, namespace: &str) -> Result<Option<Value>, PersistenceError> {
        Ok(self.items.lock().await.get(namespace).cloned())
    }

    async fn set_item(&self, namespace: &str, value: Value) -> Result<(), PersistenceError> {
        self.items.lock().await.insert(namespace.to_string(), value);
        Ok(())
    }
}
