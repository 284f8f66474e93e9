//! Recommendation and deferred-feedback orchestration.
//!
//! [`RecommenderEngine`] is the surface the presentation layer talks to:
//!
//! - [`rank`](RecommenderEngine::rank): text in, at most two tools out.
//!   Never fails; a persistence failure degrades to zero statistics.
//! - [`on_tool_used`](RecommenderEngine::on_tool_used): records that a
//!   recommendation was acted on and requests a delayed wake-up event.
//! - [`on_wake_up`](RecommenderEngine::on_wake_up): invoked by the
//!   embedder when the external timer fires. Runs concurrently with any
//!   in-flight call; a missing record is an expected no-op.
//! - [`submit_feedback`](RecommenderEngine::submit_feedback) /
//!   [`skip_feedback`](RecommenderEngine::skip_feedback): resolve or
//!   discard a pending record.
//! - [`find_actionable`](RecommenderEngine::find_actionable): what the
//!   presentation layer queries at startup to decide whether to open the
//!   feedback view.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::catalog::ToolCatalog;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::intent::{classify, IntentCategory};
use crate::notify::{wake_up_id, Notifier, NotifyAction, WakeUpScheduler};
use crate::pending::{fingerprint, FeedbackState, PendingFeedbackItem, PendingFeedbackStore};
use crate::scoring::{rank_tools, Recommendation};
use crate::stats::{validate_rating, StatsStore};
use crate::storage::KeyValueStore;

/// Title used for feedback prompts.
pub const FEEDBACK_TITLE: &str = "Reflekt Feedback";

/// Result of handling a wake-up event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeUpOutcome {
    /// The record moved to `NeedsAction` and the user was prompted.
    Prompted,
    /// No record for the fingerprint; it was already resolved or skipped.
    AlreadyGone,
}

/// The core engine: scorer, stores, and feedback scheduling glued together.
pub struct RecommenderEngine {
    catalog: ToolCatalog,
    config: EngineConfig,
    stats: StatsStore,
    pending: PendingFeedbackStore,
    scheduler: Arc<dyn WakeUpScheduler>,
    notifier: Arc<dyn Notifier>,
}

impl RecommenderEngine {
    pub fn new(
        catalog: ToolCatalog,
        config: EngineConfig,
        store: Arc<dyn KeyValueStore>,
        scheduler: Arc<dyn WakeUpScheduler>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            catalog,
            config,
            stats: StatsStore::new(Arc::clone(&store)),
            pending: PendingFeedbackStore::new(store),
            scheduler,
            notifier,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Per-tool statistics store, exposed for the statistics view.
    pub fn stats(&self) -> &StatsStore {
        &self.stats
    }

    /// Classify text and return the top tools for it.
    ///
    /// Always produces a result: if the statistics snapshot cannot be
    /// read, every tool is scored as zero-use.
    pub async fn rank(&self, text: &str) -> Vec<Recommendation> {
        let intent = classify(text);
        let stats_map = match self.stats.snapshot().await {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "stats snapshot failed, ranking with zero stats");
                Default::default()
            }
        };
        rank_tools(&self.catalog, &stats_map, intent, &self.config.scoring_params())
    }

    /// Record that the user opened `tool_id` for `text`.
    ///
    /// Creates (or overwrites) the pending record for the text's
    /// fingerprint and requests a wake-up event after the configured
    /// delay. Returns the fingerprint for correlation.
    pub async fn on_tool_used(&self, tool_id: &str, text: &str) -> Result<String> {
        if !self.catalog.contains(tool_id) {
            return Err(crate::error::RecommenderError::UnknownTool {
                tool_id: tool_id.to_string(),
            });
        }

        let intent = classify(text);
        let fp = fingerprint(text);
        self.pending.create(&fp, tool_id, intent).await?;
        self.scheduler
            .schedule_once(&wake_up_id(&fp), self.config.feedback_delay_minutes)
            .await;
        Ok(fp)
    }

    /// Handle a fired wake-up event for `fp`.
    ///
    /// Missing record: no-op (the user already rated or skipped before the
    /// timer fired). Present record: transition to `NeedsAction` and ask
    /// the notifier to prompt the user, naming the tool.
    pub async fn on_wake_up(&self, fp: &str) -> Result<WakeUpOutcome> {
        let Some(item) = self.pending.mark_needs_action(fp).await? else {
            debug!(fingerprint = fp, "wake-up for missing record, ignoring");
            return Ok(WakeUpOutcome::AlreadyGone);
        };

        let tool_name = self
            .catalog
            .get(&item.tool_id)
            .map(|t| t.name.as_str())
            .unwrap_or(item.tool_id.as_str());
        let message = format!("How did {tool_name} work out? Click to give feedback.");
        let actions = [
            NotifyAction::new("Give Feedback"),
            NotifyAction::new("Skip"),
        ];
        self.notifier
            .notify(&wake_up_id(fp), FEEDBACK_TITLE, &message, &actions)
            .await?;
        Ok(WakeUpOutcome::Prompted)
    }

    /// Resolve a pending record with a rating.
    ///
    /// The rating is folded into the tool's statistics first and the
    /// record deleted after, so a failure between the two leaves the
    /// record in place and the user may be asked again rather than have
    /// the rating vanish. The deletion is a compare-and-delete on the
    /// incarnation that was read: a concurrent same-fingerprint
    /// `on_tool_used` that lands mid-resolve keeps its fresh `Awaiting`
    /// record.
    ///
    /// Returns the resolved record (state [`FeedbackState::Resolved`]),
    /// or `None` (no-op) when no record exists.
    pub async fn submit_feedback(
        &self,
        fp: &str,
        rating: u8,
    ) -> Result<Option<PendingFeedbackItem>> {
        validate_rating(rating)?;

        let Some(mut item) = self.pending.get(fp).await? else {
            debug!(fingerprint = fp, "feedback for missing record, ignoring");
            return Ok(None);
        };

        self.stats.record_rating(&item.tool_id, rating).await?;
        self.pending.remove_if(fp, item.created_at).await?;
        item.state = FeedbackState::Resolved;
        Ok(Some(item))
    }

    /// Discard a pending record without touching statistics.
    ///
    /// No-op when no record exists.
    pub async fn skip_feedback(&self, fp: &str) -> Result<()> {
        if self.pending.remove(fp).await?.is_none() {
            debug!(fingerprint = fp, "skip for missing record, ignoring");
        }
        Ok(())
    }

    /// The record the presentation layer should prompt for, if any.
    ///
    /// At most one record is surfaced at a time; among several
    /// `NeedsAction` records the oldest wins.
    pub async fn find_actionable(&self) -> Result<Option<PendingFeedbackItem>> {
        Ok(self.pending.find_actionable().await?)
    }

    /// Sweep pending records older than the configured horizon.
    ///
    /// Returns the number of records removed.
    pub async fn collect_garbage(&self) -> Result<usize> {
        let cutoff = Utc::now() - Duration::days(i64::from(self.config.gc_horizon_days));
        Ok(self.pending.prune_older_than(cutoff).await?)
    }

    /// Classify text without ranking. Convenience for embedders that want
    /// to display the detected intent.
    pub fn classify(&self, text: &str) -> IntentCategory {
        classify(text)
    }
}
