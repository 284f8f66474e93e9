//! TOML-based engine configuration.
//!
//! Covers the tunable knobs of the engine:
//! - Feedback delay window (minutes until the wake-up event)
//! - Scorer blend weights and exploration constant
//! - Garbage-collection horizon for orphaned pending records
//!
//! Every field carries a serde default, so a partial (or empty) TOML
//! document yields a fully usable config.

use serde::{Deserialize, Serialize};

use crate::error::{RecommenderError, Result};
use crate::scoring::ScoringParams;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minutes between tool use and the feedback wake-up event.
    #[serde(default = "default_feedback_delay_minutes")]
    pub feedback_delay_minutes: u32,

    /// Weight of the UCB term in the blended score.
    #[serde(default = "default_ucb_weight")]
    pub ucb_weight: f64,

    /// Weight of the capability prior in the blended score.
    #[serde(default = "default_prior_weight")]
    pub prior_weight: f64,

    /// Exploration constant `c` in the UCB term.
    #[serde(default = "default_exploration_constant")]
    pub exploration_constant: f64,

    /// Pending records older than this many days are swept by
    /// garbage collection.
    #[serde(default = "default_gc_horizon_days")]
    pub gc_horizon_days: u32,
}

fn default_feedback_delay_minutes() -> u32 {
    15
}

fn default_ucb_weight() -> f64 {
    crate::scoring::UCB_WEIGHT
}

fn default_prior_weight() -> f64 {
    crate::scoring::PRIOR_WEIGHT
}

fn default_exploration_constant() -> f64 {
    crate::scoring::EXPLORATION_CONSTANT
}

fn default_gc_horizon_days() -> u32 {
    7
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            feedback_delay_minutes: default_feedback_delay_minutes(),
            ucb_weight: default_ucb_weight(),
            prior_weight: default_prior_weight(),
            exploration_constant: default_exploration_constant(),
            gc_horizon_days: default_gc_horizon_days(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document, applying defaults for missing fields.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| RecommenderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RecommenderError::Config(e.to_string()))
    }

    /// Validate value ranges.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("ucb_weight", self.ucb_weight),
            ("prior_weight", self.prior_weight),
        ];
        for (name, weight) in weights {
            if !(0.0..=1.0).contains(&weight) {
                return Err(RecommenderError::Config(format!(
                    "{name} must be in [0.0, 1.0], got {weight}"
                )));
            }
        }
        if self.exploration_constant < 0.0 {
            return Err(RecommenderError::Config(format!(
                "exploration_constant must be non-negative, got {}",
                self.exploration_constant
            )));
        }
        if self.feedback_delay_minutes == 0 {
            return Err(RecommenderError::Config(
                "feedback_delay_minutes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Scoring parameters derived from this config.
    pub fn scoring_params(&self) -> ScoringParams {
        ScoringParams {
            exploration_constant: self.exploration_constant,
            ucb_weight: self.ucb_weight,
            prior_weight: self.prior_weight,
        }
    }
}
