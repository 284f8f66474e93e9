//! Persistent per-tool usage and rating statistics.
//!
//! One [`ToolStats`] record per tool id, stored as a single JSON map under
//! the `recommenderStats` namespace. Records are created lazily
//! (zero-valued) the first time a tool is referenced and never deleted.
//!
//! All mutation goes through [`StatsStore::record_rating`], which holds the
//! store's write lock across the whole read-modify-write sequence. The
//! external key-value primitive has no transactions, so this lock is the
//! linearization point for concurrent ratings.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::{PersistenceError, RecommenderError, Result};
use crate::storage::{KeyValueStore, STATS_NAMESPACE};

/// Usage and rating statistics for one tool.
///
/// `avg_rating` is always recomputed from `total_rating / uses` on update,
/// never drifted independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolStats {
    /// Count of resolved feedback events.
    pub uses: u64,
    /// Sum of all ratings ever recorded (each in 1..=5).
    pub total_rating: u64,
    /// `total_rating / uses`, or 0.0 while `uses == 0`.
    pub avg_rating: f64,
}

impl ToolStats {
    /// Fold one rating into the record.
    pub fn record(&mut self, rating: u8) {
        self.uses += 1;
        self.total_rating += u64::from(rating);
        self.avg_rating = self.total_rating as f64 / self.uses as f64;
    }
}

/// Validate a user rating. Ratings are integers 1..=5.
pub fn validate_rating(rating: u8) -> Result<()> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(RecommenderError::InvalidRating { rating })
    }
}

/// Persistent statistics store over the key-value collaborator.
pub struct StatsStore {
    store: Arc<dyn KeyValueStore>,
    /// Serializes read-modify-write sequences on the persisted map.
    write_lock: Mutex<()>,
}

impl StatsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    async fn load_map(&self) -> Result<HashMap<String, ToolStats>, PersistenceError> {
        match self.store.get_item(STATS_NAMESPACE).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|source| PersistenceError::Corrupt {
                    namespace: STATS_NAMESPACE.to_string(),
                    source,
                })
            }
            None => Ok(HashMap::new()),
        }
    }

    async fn save_map(&self, map: &HashMap<String, ToolStats>) -> Result<(), PersistenceError> {
        let value = serde_json::to_value(map).map_err(|source| PersistenceError::Corrupt {
            namespace: STATS_NAMESPACE.to_string(),
            source,
        })?;
        self.store.set_item(STATS_NAMESPACE, value).await
    }

    /// Statistics for one tool. Total: absent records and persistence
    /// failures both degrade to zero-valued stats.
    pub async fn get(&self, tool_id: &str) -> ToolStats {
        match self.load_map().await {
            Ok(map) => map.get(tool_id).cloned().unwrap_or_default(),
            Err(e) => {
                warn!(tool_id, error = %e, "stats read failed, using zero stats");
                ToolStats::default()
            }
        }
    }

    /// The whole per-tool map, for scoring and the statistics view.
    pub async fn snapshot(&self) -> Result<HashMap<String, ToolStats>, PersistenceError> {
        self.load_map().await
    }

    /// Atomically fold one rating into a tool's statistics.
    ///
    /// Returns the updated record. Fails before any write if the rating is
    /// outside 1..=5; fails with a persistence error if the round-trip to
    /// the collaborator does.
    pub async fn record_rating(&self, tool_id: &str, rating: u8) -> Result<ToolStats> {
        validate_rating(rating)?;

        let _guard = self.write_lock.lock().await;
        let mut map = self.load_map().await?;
        let stats = map.entry(tool_id.to_string()).or_default();
        stats.record(rating);
        let updated = stats.clone();
        self.save_map(&map).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;

    fn store() -> StatsStore {
        StatsStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_get_absent_is_zero() {
        let stats = store().get("gemini").await;
        assert_eq!(stats, ToolStats::default());
    }

    #[tokio::test]
    async fn test_record_rating_sequence() {
        let stats = store();
        let after_first = stats.record_rating("gemini", 4).await.unwrap();
        assert_eq!(after_first.uses, 1);
        assert_eq!(after_first.total_rating, 4);
        assert_eq!(after_first.avg_rating, 4.0);

        let after_second = stats.record_rating("gemini", 2).await.unwrap();
        assert_eq!(after_second.uses, 2);
        assert_eq!(after_second.total_rating, 6);
        assert_eq!(after_second.avg_rating, 3.0);
    }

    #[tokio::test]
    async fn test_rating_out_of_range_rejected() {
        let stats = store();
        assert!(matches!(
            stats.record_rating("gemini", 0).await,
            Err(RecommenderError::InvalidRating { rating: 0 })
        ));
        assert!(matches!(
            stats.record_rating("gemini", 6).await,
            Err(RecommenderError::InvalidRating { rating: 6 })
        ));
        // Rejected before any write.
        assert_eq!(stats.get("gemini").await, ToolStats::default());
    }

    #[tokio::test]
    async fn test_tools_tracked_independently() {
        let stats = store();
        stats.record_rating("gemini", 5).await.unwrap();
        stats.record_rating("claude", 1).await.unwrap();
        assert_eq!(stats.get("gemini").await.avg_rating, 5.0);
        assert_eq!(stats.get("claude").await.avg_rating, 1.0);
    }

    #[tokio::test]
    async fn test_concurrent_ratings_are_not_lost() {
        let stats = Arc::new(store());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let stats = Arc::clone(&stats);
            handles.push(tokio::spawn(async move {
                stats.record_rating("gemini", 3).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        let after = stats.get("gemini").await;
        assert_eq!(after.uses, 8);
        assert_eq!(after.total_rating, 24);
    }

    proptest! {
        // Aggregation is order-independent: any permutation of the same
        // ratings yields the same final record.
        #[test]
        fn prop_record_order_independent(mut ratings in prop::collection::vec(1u8..=5, 1..20)) {
            let mut forward = ToolStats::default();
            for &r in &ratings {
                forward.record(r);
            }

            ratings.reverse();
            let mut backward = ToolStats::default();
            for &r in &ratings {
                backward.record(r);
            }

            prop_assert_eq!(forward.uses, backward.uses);
            prop_assert_eq!(forward.total_rating, backward.total_rating);
            prop_assert!((forward.avg_rating - backward.avg_rating).abs() < 1e-12);

            let expected = ratings.iter().map(|&r| u64::from(r)).sum::<u64>() as f64
                / ratings.len() as f64;
            prop_assert!((forward.avg_rating - expected).abs() < 1e-12);
        }
    }
}
