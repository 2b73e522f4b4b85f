//! AI enrichment: personalised activity and conversation starters for a matched pair.
//!
//! Two tiers: the text-generation service when it answers well and in time,
//! the rule-based content in `fallback` otherwise. Failures are logged here and
//! never returned to callers.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::llm_client::prompts::ENRICHMENT_TEMPERATURE;
use crate::llm_client::{GenerationRequest, LlmError, TextGenerator};
use crate::matching::fallback::{
    fallback_activity, fallback_conversation_starters, MAX_CONVERSATION_STARTERS,
};
use crate::matching::prompts::{
    build_activity_prompt, build_starters_prompt, ACTIVITY_MAX_TOKENS, STARTERS_MAX_TOKENS,
};
use crate::models::profile::Profile;

/// A generated list is only trusted with at least this many usable questions.
const MIN_GENERATED_STARTERS: usize = 3;
/// Parsed list items shorter than this are numbering debris, not questions.
const MIN_STARTER_CHARS: usize = 10;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Service(#[from] LlmError),

    #[error("generated activity was empty")]
    EmptyActivity,

    #[error("only {found} usable conversation starters parsed (need at least 3)")]
    TooFewStarters { found: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// Deadline racing
// ────────────────────────────────────────────────────────────────────────────

/// Result of racing a future against a deadline.
#[derive(Debug, Clone, PartialEq)]
pub enum DeadlineOutcome<T> {
    Completed(T),
    TimedOut,
}

/// Drives `future` until it finishes or `deadline` passes. On timeout the
/// future is dropped, so a late answer is discarded rather than awaited.
pub async fn race_deadline<F: Future>(deadline: Instant, future: F) -> DeadlineOutcome<F::Output> {
    match tokio::time::timeout_at(deadline, future).await {
        Ok(value) => DeadlineOutcome::Completed(value),
        Err(_) => DeadlineOutcome::TimedOut,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Content generator
// ────────────────────────────────────────────────────────────────────────────

/// Enrichment content for one pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub recommended_activity: String,
    pub conversation_starters: Vec<String>,
}

#[derive(Clone)]
pub struct ContentGenerator {
    llm: Arc<dyn TextGenerator>,
}

impl ContentGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// One activity suggestion for the pair. Falls back to the rule-based suggestion on failure.
    pub async fn generate_activity(&self, a: &Profile, b: &Profile) -> String {
        match self.try_generate_activity(a, b).await {
            Ok(activity) => {
                debug!("AI activity generated for {} / {}", a.id, b.id);
                activity
            }
            Err(e) => {
                warn!("AI activity failed for {} / {}, using fallback: {e}", a.id, b.id);
                fallback_activity(a, b)
            }
        }
    }

    /// Three to five questions for the pair. Falls back to the rule-based list on failure.
    pub async fn generate_conversation_starters(&self, a: &Profile, b: &Profile) -> Vec<String> {
        match self.try_generate_conversation_starters(a, b).await {
            Ok(starters) => {
                debug!(
                    "AI conversation starters generated for {} / {} ({} items)",
                    a.id,
                    b.id,
                    starters.len()
                );
                starters
            }
            Err(e) => {
                warn!(
                    "AI conversation starters failed for {} / {}, using fallback: {e}",
                    a.id, b.id
                );
                fallback_conversation_starters(a, b)
            }
        }
    }

    /// Full enrichment for a pair, bounded by `deadline`.
    ///
    /// The fallback content is built before either call starts, so it is ready
    /// the instant the deadline fires. Both calls run concurrently and each one
    /// independently falls back if it has not finished in time.
    pub async fn enrich(&self, a: &Profile, b: &Profile, deadline: Instant) -> Enrichment {
        let backup_activity = fallback_activity(a, b);
        let backup_starters = fallback_conversation_starters(a, b);

        let (activity, starters) = tokio::join!(
            race_deadline(deadline, self.generate_activity(a, b)),
            race_deadline(deadline, self.generate_conversation_starters(a, b)),
        );

        let recommended_activity = match activity {
            DeadlineOutcome::Completed(activity) => activity,
            DeadlineOutcome::TimedOut => {
                warn!("AI activity timed out for {} / {}, using fallback", a.id, b.id);
                backup_activity
            }
        };

        let conversation_starters = match starters {
            DeadlineOutcome::Completed(starters) => starters,
            DeadlineOutcome::TimedOut => {
                warn!(
                    "AI conversation starters timed out for {} / {}, using fallback",
                    a.id, b.id
                );
                backup_starters
            }
        };

        Enrichment {
            recommended_activity,
            conversation_starters,
        }
    }

    async fn try_generate_activity(
        &self,
        a: &Profile,
        b: &Profile,
    ) -> Result<String, GenerationError> {
        let request = GenerationRequest {
            prompt: build_activity_prompt(a, b),
            max_output_tokens: ACTIVITY_MAX_TOKENS,
            temperature: ENRICHMENT_TEMPERATURE,
        };

        let text = self.llm.generate(&request).await?;
        let activity = text.trim();
        if activity.is_empty() {
            return Err(GenerationError::EmptyActivity);
        }
        Ok(activity.to_string())
    }

    async fn try_generate_conversation_starters(
        &self,
        a: &Profile,
        b: &Profile,
    ) -> Result<Vec<String>, GenerationError> {
        let request = GenerationRequest {
            prompt: build_starters_prompt(a, b),
            max_output_tokens: STARTERS_MAX_TOKENS,
            temperature: ENRICHMENT_TEMPERATURE,
        };

        let text = self.llm.generate(&request).await?;
        let mut starters = parse_numbered_list(&text);
        if starters.len() < MIN_GENERATED_STARTERS {
            return Err(GenerationError::TooFewStarters {
                found: starters.len(),
            });
        }
        starters.truncate(MAX_CONVERSATION_STARTERS);
        Ok(starters)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response parsing
// ────────────────────────────────────────────────────────────────────────────

/// Extracts the items of a "1. ... / 2. ..." list. Lines without a leading
/// `<digits>.` are ignored, as are items under ten characters.
pub fn parse_numbered_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(strip_numbering)
        .filter(|item| item.chars().count() >= MIN_STARTER_CHARS)
        .map(str::to_string)
        .collect()
}

fn strip_numbering(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return None;
    }
    rest.strip_prefix('.').map(str::trim_start)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
