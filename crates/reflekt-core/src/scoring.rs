//! UCB1-style bandit scorer blended with capability priors.
//!
//! Each tool is scored from two ingredients:
//!
//! - a UCB1 term built from learned statistics (`avg_rating` normalized to
//!   [0, 1] plus an exploration bonus), and
//! - the tool's static capability prior for the detected intent.
//!
//! A tool that has never been rated gets [`EXPLORATION_SENTINEL`] as its
//! UCB term, so every newly-seen tool is tried at least once before the
//! learned term can dominate. Ties between zero-use tools are broken only
//! by the prior term.
//!
//! Scoring is pure and deterministic; ranking uses a stable descending
//! sort so exact ties preserve catalog order.

use serde::{Deserialize, Serialize};

use crate::catalog::{Tool, ToolCatalog};
use crate::intent::IntentCategory;
use crate::stats::ToolStats;

use std::collections::HashMap;

/// UCB term assigned to tools with `uses == 0`.
///
/// Must stay strictly above anything the normal formula can produce. The
/// normal term is bounded by `1.0 + c * sqrt(2 * ln(total_impressions))`,
/// which stays below 100 until `total_impressions` exceeds `e^2450` --
/// unreachable for any real usage count.
pub const EXPLORATION_SENTINEL: f64 = 100.0;

/// Exploration constant `c` (approximately sqrt(2)).
pub const EXPLORATION_CONSTANT: f64 = 1.414;

/// Weight of the UCB term in the final blend.
pub const UCB_WEIGHT: f64 = 0.7;

/// Weight of the capability prior in the final blend.
pub const PRIOR_WEIGHT: f64 = 0.3;

/// Maximum number of tools returned by a ranking.
pub const MAX_RECOMMENDATIONS: usize = 2;

/// Tunable scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringParams {
    pub exploration_constant: f64,
    pub ucb_weight: f64,
    pub prior_weight: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            exploration_constant: EXPLORATION_CONSTANT,
            ucb_weight: UCB_WEIGHT,
            prior_weight: PRIOR_WEIGHT,
        }
    }
}

/// One ranked tool with its blended score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub tool: Tool,
    pub score: f64,
    pub intent: IntentCategory,
}

/// UCB1 term for one tool.
///
/// `total_impressions` is the sum of `uses` across all tools, floored at 1
/// by the caller to keep the logarithm defined.
pub fn ucb_term(stats: &ToolStats, total_impressions: u64, c: f64) -> f64 {
    if stats.uses == 0 {
        return EXPLORATION_SENTINEL;
    }
    let average_reward = stats.avg_rating / 5.0;
    let exploration = (2.0 * (total_impressions as f64).ln() / stats.uses as f64).sqrt();
    average_reward + c * exploration
}

/// Blended score for one tool under one intent.
pub fn score(
    tool: &Tool,
    stats: &ToolStats,
    intent: IntentCategory,
    total_impressions: u64,
    params: &ScoringParams,
) -> f64 {
    let ucb = ucb_term(stats, total_impressions, params.exploration_constant);
    params.ucb_weight * ucb + params.prior_weight * tool.prior_for(intent)
}

/// Rank a catalog against a statistics snapshot.
///
/// Tools absent from the snapshot are treated as zero-use. Returns at most
/// [`MAX_RECOMMENDATIONS`] tools, sorted descending by score; the sort is
/// stable, so exact ties keep catalog order.
pub fn rank_tools(
    catalog: &ToolCatalog,
    stats_map: &HashMap<String, ToolStats>,
    intent: IntentCategory,
    params: &ScoringParams,
) -> Vec<Recommendation> {
    let zero = ToolStats::default();
    let total_impressions = catalog
        .tools()
        .iter()
        .map(|t| stats_map.get(&t.id).map_or(0, |s| s.uses))
        .sum::<u64>()
        .max(1);

    let mut scored: Vec<Recommendation> = catalog
        .tools()
        .iter()
        .map(|tool| {
            let stats = stats_map.get(&tool.id).unwrap_or(&zero);
            Recommendation {
                tool: tool.clone(),
                score: score(tool, stats, intent, total_impressions, params),
                intent,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(MAX_RECOMMENDATIONS);
    scored
}
