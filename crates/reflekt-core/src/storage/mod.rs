//! Key-value persistence collaborator and built-in backends.
//!
//! The engine owns two persisted namespaces and nothing else:
//! [`STATS_NAMESPACE`] for per-tool statistics and [`PENDING_NAMESPACE`]
//! for outstanding feedback records. Each namespace holds a single JSON
//! document; the stores layered on top serialize their read-modify-write
//! sequences because the collaborator offers no transactional guarantee
//! across separate `get_item`/`set_item` calls.
//!
//! Two backends ship in-crate: [`MemoryStore`] for tests and ephemeral
//! embedding, and [`JsonFileStore`] for a file-per-namespace layout under
//! a data directory.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PersistenceError;

/// Namespace holding the per-tool statistics map.
pub const STATS_NAMESPACE: &str = "recommenderStats";

/// Namespace holding the pending feedback map.
pub const PENDING_NAMESPACE: &str = "pendingFeedback";

/// External key-value persistence primitive.
///
/// One JSON value per namespace; `get_item` returns `None` for a namespace
/// that has never been written.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, namespace: &str) -> Result<Option<Value>, PersistenceError>;

    async fn set_item(&self, namespace: &str, value: Value) -> Result<(), PersistenceError>;
}

/// Returns `~/.config/reflekt[-dev]/` based on REFLEKT_ENV.
///
/// Set REFLEKT_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, PersistenceError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("REFLEKT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("reflekt-dev")
    } else {
        base_dir.join("reflekt")
    };

    std::fs::create_dir_all(&dir).map_err(|source| PersistenceError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
