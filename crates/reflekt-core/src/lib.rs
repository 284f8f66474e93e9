//! # Reflekt Core Library
//!
//! This library provides the core business logic for Reflekt's tool
//! recommendation and deferred feedback engine. Given a piece of user
//! text it recommends which external AI tool to open next, and it
//! improves those recommendations over time from deferred user ratings.
//! The embedding application (popup, background worker) is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Intent Classifier**: pure keyword classification of user text
//! - **Bandit Scorer**: UCB1 with forced exploration, blended with static
//!   capability priors per intent
//! - **Stats Store / Pending Feedback Store**: serialized read-modify-write
//!   stores over an external key-value persistence primitive
//! - **Recommender Engine**: orchestration, including the deferred
//!   feedback state machine (`Awaiting -> NeedsAction -> resolved`)
//!   driven by an external one-shot timer
//!
//! ## Key Components
//!
//! - [`RecommenderEngine`]: the surface the presentation layer talks to
//! - [`ToolCatalog`]: static tool definitions and capability priors
//! - [`KeyValueStore`]: persistence collaborator trait, with
//!   [`MemoryStore`] and [`JsonFileStore`] backends in-crate
//! - [`WakeUpScheduler`] / [`Notifier`]: external timer and prompt surfaces

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod intent;
pub mod notify;
pub mod pending;
pub mod scoring;
pub mod stats;
pub mod storage;

pub use catalog::{Tool, ToolCatalog, DEFAULT_PRIOR};
pub use config::EngineConfig;
pub use engine::{RecommenderEngine, WakeUpOutcome, FEEDBACK_TITLE};
pub use error::{PersistenceError, RecommenderError, Result};
pub use intent::{classify, IntentCategory};
pub use notify::{parse_wake_up_id, wake_up_id, Notifier, NotifyAction, WakeUpScheduler};
pub use pending::{fingerprint, FeedbackState, PendingFeedbackItem, PendingFeedbackStore};
pub use scoring::{Recommendation, ScoringParams, MAX_RECOMMENDATIONS};
pub use stats::{StatsStore, ToolStats};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, PENDING_NAMESPACE, STATS_NAMESPACE};
