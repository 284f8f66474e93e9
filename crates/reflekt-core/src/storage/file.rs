//! File-per-namespace JSON backend.
//!
//! Each namespace is stored as `<dir>/<namespace>.json`. Writes go through
//! a temporary file and a rename so a crash mid-write cannot leave a
//! half-written document behind.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PersistenceError;

use super::{data_dir, KeyValueStore};

/// JSON-file-backed store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at an explicit directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a store rooted at the default data directory (see
    /// [`data_dir`]).
    pub fn open_default() -> Result<Self, PersistenceError> {
        Ok(Self::new(data_dir()?))
    }

    fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.json"))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get_item(&self, namespace: &str) -> Result<Option<Value>, PersistenceError> {
        let path = self.path_for(namespace);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };
        let value = serde_json::from_str(&raw).map_err(|source| PersistenceError::Corrupt {
            namespace: namespace.to_string(),
            source,
        })?;
        Ok(Some(value))
    }

    async fn set_item(&self, namespace: &str, value: Value) -> Result<(), PersistenceError> {
        let path = self.path_for(namespace);
        let tmp = self.dir.join(format!("{namespace}.json.tmp"));
        let raw = serde_json::to_string_pretty(&value).map_err(|source| {
            PersistenceError::Corrupt {
                namespace: namespace.to_string(),
                source,
            }
        })?;
        tokio::fs::write(&tmp, raw)
            .await
            .map_err(|source| PersistenceError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| PersistenceError::Io { path, source })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_absent_namespace_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.get_item("recommenderStats").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let value = json!({"gemini": {"uses": 2, "total_rating": 7, "avg_rating": 3.5}});
        store.set_item("recommenderStats", value.clone()).await.unwrap();
        assert_eq!(
            store.get_item("recommenderStats").await.unwrap(),
            Some(value)
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pendingFeedback.json"), "{not json").unwrap();
        let store = JsonFileStore::new(dir.path());
        let err = store.get_item("pendingFeedback").await.unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt { .. }));
    }
}
