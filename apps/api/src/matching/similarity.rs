//! Word-overlap similarity between two free-text answers.

use std::collections::HashSet;

/// Tokens this short ("a", "to", "of") carry no signal and are dropped.
const MIN_TOKEN_CHARS: usize = 3;

/// Jaccard coefficient over the lowercase word sets of `a` and `b`.
///
/// Returns 0.0 when either side is absent or empty, or when neither side has a
/// token of at least three characters. Symmetric and order-insensitive.
pub fn text_similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => (a, b),
        _ => return 0.0,
    };

    let words_a = tokenize(a);
    let words_b = tokenize(b);

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = words_a.intersection(&words_b).count();

    intersection as f64 / union as f64
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() >= MIN_TOKEN_CHARS)
        .collect()
}
