//! Compatibility scoring: pluggable, trait-based evaluator of two profiles.
//!
//! Default: `WeightedProfileScorer` (pure-Rust, fast, deterministic, no I/O).
//! The orchestrator holds an `Arc<dyn CompatibilityScorer>` so the scoring pass
//! can be swapped or instrumented without touching orchestration code.

use serde::{Deserialize, Serialize};

use crate::matching::similarity::text_similarity;
use crate::models::profile::{populated, Profile};

/// Label used when no individual dimension clears its threshold.
pub const DEFAULT_FACTOR: &str = "Potential for connection";

/// A text dimension contributes a factor label above this similarity.
const TEXT_FACTOR_THRESHOLD: f64 = 0.3;
/// Age proximity contributes a factor label above this score.
const AGE_FACTOR_THRESHOLD: f64 = 0.7;
/// Age gap at which proximity reaches zero.
const AGE_SPAN_YEARS: f64 = 20.0;
const AGE_WEIGHT: f64 = 0.10;

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// Score in [0, 1] plus the human-readable reasons behind it (never empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub score: f64,
    pub factors: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores one pair of profiles. Must stay free of I/O: it runs for every candidate.
pub trait CompatibilityScorer: Send + Sync {
    fn score(&self, a: &Profile, b: &Profile) -> CompatibilityResult;
}

/// Weighted average of word-overlap and age-proximity dimensions.
///
/// Algorithm:
/// 1. A dimension counts only if both profiles populate it; missing data is
///    skipped rather than scored as zero.
/// 2. score = Σ(weight × dimension score) / Σ(weights that counted), clamped to [0, 1]
/// 3. Factor labels follow `TEXT_DIMENSIONS` order, age last.
pub struct WeightedProfileScorer;

impl CompatibilityScorer for WeightedProfileScorer {
    fn score(&self, a: &Profile, b: &Profile) -> CompatibilityResult {
        evaluate(a, b)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dimension table
// ────────────────────────────────────────────────────────────────────────────

struct TextDimension {
    weight: f64,
    factor: &'static str,
    field: fn(&Profile) -> &Option<String>,
}

const TEXT_DIMENSIONS: [TextDimension; 6] = [
    TextDimension {
        weight: 0.25,
        factor: "Shared values",
        field: |p| &p.keystone_values,
    },
    TextDimension {
        weight: 0.20,
        factor: "Common interests",
        field: |p| &p.interests,
    },
    TextDimension {
        weight: 0.10,
        factor: "Similar reading preferences",
        field: |p| &p.favorite_books,
    },
    TextDimension {
        weight: 0.15,
        factor: "Similar background",
        field: |p| &p.cultural_upbringing,
    },
    TextDimension {
        weight: 0.15,
        factor: "Professional alignment",
        field: |p| &p.career,
    },
    TextDimension {
        weight: 0.25,
        factor: "Aligned relationship goals",
        field: |p| &p.relationship_goals,
    },
];

// ────────────────────────────────────────────────────────────────────────────
// Core evaluation
// ────────────────────────────────────────────────────────────────────────────

/// Scores how compatible `a` and `b` are. Symmetric in its arguments.
pub fn evaluate(a: &Profile, b: &Profile) -> CompatibilityResult {
    let mut total_score = 0.0_f64;
    let mut weight_sum = 0.0_f64;
    let mut factors = Vec::new();

    for dimension in &TEXT_DIMENSIONS {
        let (Some(text_a), Some(text_b)) = (
            populated((dimension.field)(a)),
            populated((dimension.field)(b)),
        ) else {
            continue;
        };

        let similarity = text_similarity(Some(text_a), Some(text_b));
        total_score += similarity * dimension.weight;
        weight_sum += dimension.weight;

        if similarity > TEXT_FACTOR_THRESHOLD {
            factors.push(dimension.factor.to_string());
        }
    }

    if let (Some(age_a), Some(age_b)) = (a.age, b.age) {
        let proximity = age_proximity(age_a, age_b);
        total_score += proximity * AGE_WEIGHT;
        weight_sum += AGE_WEIGHT;

        if proximity > AGE_FACTOR_THRESHOLD {
            factors.push("Similar age range".to_string());
        }
    }

    let score = if weight_sum > 0.0 {
        (total_score / weight_sum).clamp(0.0, 1.0)
    } else {
        0.0
    };

    if factors.is_empty() {
        factors.push(DEFAULT_FACTOR.to_string());
    }

    CompatibilityResult { score, factors }
}

/// 1.0 for equal ages, falling linearly to 0.0 at a 20-year gap.
fn age_proximity(a: i32, b: i32) -> f64 {
    let gap = (a as f64 - b as f64).abs();
    (1.0 - gap / AGE_SPAN_YEARS).max(0.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
