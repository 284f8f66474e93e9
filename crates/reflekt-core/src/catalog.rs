//! Static tool catalog with per-intent capability priors.
//!
//! Tools are defined at build/config time and immutable at runtime. Each
//! tool carries display metadata for the presentation layer (name, icon,
//! subtitle, launch URL) and a capability prior per intent category that the
//! scorer blends with learned statistics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::intent::IntentCategory;

/// Prior used when a tool has no entry for an intent category.
pub const DEFAULT_PRIOR: f64 = 0.5;

/// An external AI tool the engine can route users to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Emoji icon for the presentation layer.
    pub icon: String,
    /// Short tagline shown under the name.
    pub subtitle: String,
    /// Launch URL.
    pub url: String,
    /// Capability score per intent category, each in [0, 1].
    pub capability_prior: HashMap<IntentCategory, f64>,
}

impl Tool {
    /// Prior score for an intent, falling back to [`DEFAULT_PRIOR`].
    pub fn prior_for(&self, intent: IntentCategory) -> f64 {
        self.capability_prior
            .get(&intent)
            .copied()
            .unwrap_or(DEFAULT_PRIOR)
    }
}

/// Immutable set of available tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCatalog {
    tools: Vec<Tool>,
}

impl ToolCatalog {
    /// Create a catalog from an explicit tool list.
    pub fn new(tools: Vec<Tool>) -> Self {
        Self { tools }
    }

    /// The built-in default catalog.
    pub fn builtin() -> Self {
        use IntentCategory::*;
        Self::new(vec![
            Tool {
                id: "gemini".to_string(),
                name: "Gemini".to_string(),
                icon: "\u{2728}".to_string(),
                subtitle: "Great for reasoning".to_string(),
                url: "https://gemini.google.com/app".to_string(),
                capability_prior: HashMap::from([
                    (Coding, 0.5),
                    (Creative, 0.8),
                    (Explanation, 0.8),
                    (Research, 0.6),
                ]),
            },
            Tool {
                id: "chatgpt".to_string(),
                name: "ChatGPT".to_string(),
                icon: "\u{1F916}".to_string(),
                subtitle: "Versatile assistant".to_string(),
                url: "https://chatgpt.com".to_string(),
                capability_prior: HashMap::from([
                    (Coding, 0.8),
                    (Creative, 0.7),
                    (Explanation, 0.7),
                    (Research, 0.4),
                ]),
            },
            Tool {
                id: "perplexity".to_string(),
                name: "Perplexity".to_string(),
                icon: "\u{1F50D}".to_string(),
                subtitle: "Real-time research".to_string(),
                url: "https://www.perplexity.ai".to_string(),
                capability_prior: HashMap::from([
                    (Coding, 0.4),
                    (Creative, 0.3),
                    (Explanation, 0.6),
                    (Research, 0.9),
                ]),
            },
            Tool {
                id: "claude".to_string(),
                name: "Claude".to_string(),
                icon: "\u{1F9E0}".to_string(),
                subtitle: "Nuanced writing".to_string(),
                url: "https://claude.ai".to_string(),
                capability_prior: HashMap::from([
                    (Coding, 0.9),
                    (Creative, 0.8),
                    (Explanation, 0.6),
                    (Research, 0.4),
                ]),
            },
        ])
    }

    pub fn get(&self, tool_id: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id == tool_id)
    }

    pub fn contains(&self, tool_id: &str) -> bool {
        self.get(tool_id).is_some()
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
