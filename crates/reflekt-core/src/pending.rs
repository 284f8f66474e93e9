//! Pending feedback records and their state machine.
//!
//! One record per content fingerprint, stored as a single JSON map under
//! the `pendingFeedback` namespace.
//!
//! ## State Transitions
//!
//! ```text
//! create -> Awaiting -> NeedsAction -> (resolved | discarded)
//!                    \-> discarded
//! ```
//!
//! - `create` overwrites any existing record with the same fingerprint.
//! - The wake-up timer moves `Awaiting` to `NeedsAction`.
//! - Resolution and discard delete the record; `Resolved` is therefore
//!   never persisted. It is the state of the record handed back to the
//!   caller on resolution.
//! - Every transition on a missing fingerprint is an idempotent no-op.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::error::PersistenceError;
use crate::intent::IntentCategory;
use crate::storage::{KeyValueStore, PENDING_NAMESPACE};

/// Length of the stored fingerprint in hex characters (128 bits).
pub const FINGERPRINT_HEX_LEN: usize = 32;

/// Content fingerprint for a piece of user text.
///
/// SHA-256 over the trimmed text, hex-encoded and truncated to
/// [`FINGERPRINT_HEX_LEN`] characters. Stable across the delay window and
/// wide enough that collisions between distinct texts are not a practical
/// concern.
pub fn fingerprint(text: &str) -> String {
    let digest = Sha256::digest(text.trim().as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_HEX_LEN);
    hex
}

/// Lifecycle state of a pending feedback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackState {
    /// Created; the wake-up timer has not fired yet.
    Awaiting,
    /// The timer fired; the presentation layer should solicit a rating.
    NeedsAction,
    /// Rating folded into statistics. Terminal; carried by the record
    /// returned from resolution, never persisted in the store.
    Resolved,
}

/// One outstanding "ask the user how tool X worked for text Y" request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingFeedbackItem {
    pub fingerprint: String,
    /// Tool the user was routed to.
    pub tool_id: String,
    /// Intent detected at recommendation time. Informational; kept for
    /// analytics.
    pub intent: IntentCategory,
    pub created_at: DateTime<Utc>,
    pub state: FeedbackState,
}

/// Persistent pending-feedback store over the key-value collaborator.
pub struct PendingFeedbackStore {
    store: Arc<dyn KeyValueStore>,
    /// Serializes read-modify-write sequences on the persisted map.
    write_lock: Mutex<()>,
}

impl PendingFeedbackStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    async fn load_map(
        &self,
    ) -> Result<HashMap<String, PendingFeedbackItem>, PersistenceError> {
        match self.store.get_item(PENDING_NAMESPACE).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|source| PersistenceError::Corrupt {
                    namespace: PENDING_NAMESPACE.to_string(),
                    source,
                })
            }
            None => Ok(HashMap::new()),
        }
    }

    async fn save_map(
        &self,
        map: &HashMap<String, PendingFeedbackItem>,
    ) -> Result<(), PersistenceError> {
        let value = serde_json::to_value(map).map_err(|source| PersistenceError::Corrupt {
            namespace: PENDING_NAMESPACE.to_string(),
            source,
        })?;
        self.store.set_item(PENDING_NAMESPACE, value).await
    }

    /// Create a record in `Awaiting`, replacing any record with the same
    /// fingerprint.
    pub async fn create(
        &self,
        fingerprint: &str,
        tool_id: &str,
        intent: IntentCategory,
    ) -> Result<PendingFeedbackItem, PersistenceError> {
        let item = PendingFeedbackItem {
            fingerprint: fingerprint.to_string(),
            tool_id: tool_id.to_string(),
            intent,
            created_at: Utc::now(),
            state: FeedbackState::Awaiting,
        };

        let _guard = self.write_lock.lock().await;
        let mut map = self.load_map().await?;
        map.insert(fingerprint.to_string(), item.clone());
        self.save_map(&map).await?;
        Ok(item)
    }

    pub async fn get(
        &self,
        fingerprint: &str,
    ) -> Result<Option<PendingFeedbackItem>, PersistenceError> {
        Ok(self.load_map().await?.get(fingerprint).cloned())
    }

    /// Transition a record to `NeedsAction`.
    ///
    /// Returns the updated record, or `None` when no record exists (the
    /// timer fired after resolution or skip -- expected, not an error).
    pub async fn mark_needs_action(
        &self,
        fingerprint: &str,
    ) -> Result<Option<PendingFeedbackItem>, PersistenceError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load_map().await?;
        let Some(item) = map.get_mut(fingerprint) else {
            return Ok(None);
        };
        item.state = FeedbackState::NeedsAction;
        let updated = item.clone();
        self.save_map(&map).await?;
        Ok(Some(updated))
    }

    /// Delete a record only if it is still the incarnation the caller
    /// read, identified by `created_at`.
    ///
    /// A same-fingerprint `create` that lands between the caller's read
    /// and this call produces a fresh record with a newer `created_at`;
    /// that record is left alone and `None` is returned. This is the
    /// compare-and-delete used by feedback resolution so a stale resolve
    /// cannot swallow a newer feedback request.
    pub async fn remove_if(
        &self,
        fingerprint: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Option<PendingFeedbackItem>, PersistenceError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load_map().await?;
        match map.get(fingerprint) {
            Some(item) if item.created_at == created_at => {
                let removed = map.remove(fingerprint);
                self.save_map(&map).await?;
                Ok(removed)
            }
            _ => Ok(None),
        }
    }

    /// Delete a record, returning it if it existed.
    pub async fn remove(
        &self,
        fingerprint: &str,
    ) -> Result<Option<PendingFeedbackItem>, PersistenceError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load_map().await?;
        let removed = map.remove(fingerprint);
        if removed.is_some() {
            self.save_map(&map).await?;
        }
        Ok(removed)
    }

    /// The oldest record in `NeedsAction`, if any.
    ///
    /// "Oldest first" keeps prompts in the order the work happened when
    /// several records become actionable at once.
    pub async fn find_actionable(
        &self,
    ) -> Result<Option<PendingFeedbackItem>, PersistenceError> {
        let map = self.load_map().await?;
        Ok(map
            .values()
            .filter(|item| item.state == FeedbackState::NeedsAction)
            .min_by_key(|item| item.created_at)
            .cloned())
    }

    /// Delete records created before `cutoff`, regardless of state.
    ///
    /// Returns the number of records removed. Sweeps records orphaned by a
    /// lost timer or a dropped notification.
    pub async fn prune_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, PersistenceError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load_map().await?;
        let before = map.len();
        map.retain(|_, item| item.created_at >= cutoff);
        let removed = before - map.len();
        if removed > 0 {
            self.save_map(&map).await?;
        }
        Ok(removed)
    }
}
