//! Intent classification for user text.
//!
//! Classification is a total function: any input maps to exactly one of a
//! fixed closed set of categories. Matching is case-insensitive substring
//! matching against per-category keyword sets, evaluated in a fixed priority
//! order (`Coding > Creative > Research > Explanation`). The first category
//! with a matching keyword wins; no match falls back to `Explanation`.
//!
//! Both the keyword sets and the priority order are load-bearing for
//! reproducible ranking -- changing either changes which prior the scorer
//! blends in.

use serde::{Deserialize, Serialize};

/// Closed set of intent categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentCategory {
    Coding,
    Creative,
    Research,
    Explanation,
}

impl IntentCategory {
    /// All categories, in classification priority order.
    pub const ALL: [IntentCategory; 4] = [
        IntentCategory::Coding,
        IntentCategory::Creative,
        IntentCategory::Research,
        IntentCategory::Explanation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::Coding => "coding",
            IntentCategory::Creative => "creative",
            IntentCategory::Research => "research",
            IntentCategory::Explanation => "explanation",
        }
    }
}

impl std::fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const CODING_KEYWORDS: &[&str] = &["code", "function", "bug", "script", "react"];
const CREATIVE_KEYWORDS: &[&str] = &["poem", "story", "write", "creative", "caption"];
const RESEARCH_KEYWORDS: &[&str] = &["search", "find", "latest", "news", "source"];

/// Classify user text into an intent category.
///
/// Never fails; unmatched text is `Explanation`.
pub fn classify(text: &str) -> IntentCategory {
    let t = text.to_lowercase();
    let has_match = |keywords: &[&str]| keywords.iter().any(|k| t.contains(k));

    if has_match(CODING_KEYWORDS) {
        IntentCategory::Coding
    } else if has_match(CREATIVE_KEYWORDS) {
        IntentCategory::Creative
    } else if has_match(RESEARCH_KEYWORDS) {
        IntentCategory::Research
    } else {
        IntentCategory::Explanation
    }
}
