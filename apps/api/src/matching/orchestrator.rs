//! Match Orchestrator. Finds, enriches and stores the best matches for a user.
//!
//! Flow: load requester → reuse stored matches if enough exist → otherwise
//!       score every active candidate → keep the top `limit` → enrich only
//!       those (AI racing a deadline, rule-based fallback) → upsert → return.
//!
//! Scoring is pure and cheap, enrichment is slow and unbounded, so enrichment
//! never runs on the full candidate pool.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::compatibility::{CompatibilityResult, CompatibilityScorer, DEFAULT_FACTOR};
use crate::matching::enrichment::ContentGenerator;
use crate::matching::fallback::{
    default_conversation_starters, DEFAULT_ACTIVITY, MAX_CONVERSATION_STARTERS,
};
use crate::matching::store::{MatchStore, ProfileStore};
use crate::models::matches::MatchRecord;
use crate::models::profile::Profile;

/// How a request treats matches stored by an earlier run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Return stored matches when at least `limit` exist. Stored matches are
    /// not checked against profile edits made since they were computed.
    ReuseStored,
    /// Always rescore and re-enrich.
    Recompute,
}

pub struct MatchOrchestrator {
    profiles: Arc<dyn ProfileStore>,
    matches: Arc<dyn MatchStore>,
    scorer: Arc<dyn CompatibilityScorer>,
    content: ContentGenerator,
    enrichment_timeout: Duration,
}

impl MatchOrchestrator {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        matches: Arc<dyn MatchStore>,
        scorer: Arc<dyn CompatibilityScorer>,
        content: ContentGenerator,
        enrichment_timeout: Duration,
    ) -> Self {
        Self {
            profiles,
            matches,
            scorer,
            content,
            enrichment_timeout,
        }
    }

    /// Top `limit` matches for `user_id`, best first. Reuses stored matches when possible.
    pub async fn find_matches(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<MatchRecord>, AppError> {
        self.find_matches_with(user_id, limit, CachePolicy::ReuseStored)
            .await
    }

    /// Runs the matching pipeline.
    ///
    /// Steps:
    /// 1. Load the requester (NotFound if absent)
    /// 2. Fast path: ≥ `limit` stored matches → return them as-is
    /// 3. Load the active candidate pool (empty → empty result)
    /// 4. Score every candidate
    /// 5. Stable sort by score, keep `limit`
    /// 6. Enrich the winners concurrently, each bounded by the enrichment timeout
    /// 7. Upsert each winner independently; failures are logged, not returned
    pub async fn find_matches_with(
        &self,
        user_id: Uuid,
        limit: usize,
        policy: CachePolicy,
    ) -> Result<Vec<MatchRecord>, AppError> {
        // Step 1: Requester
        let requester = self
            .profiles
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

        // Step 2: Fast path
        if policy == CachePolicy::ReuseStored {
            let stored = self.matches.list_by_requester(user_id).await?;
            if stored.len() >= limit {
                info!(
                    "Returning {} stored matches for user {user_id} ({} on file)",
                    limit,
                    stored.len()
                );
                return Ok(stored
                    .into_iter()
                    .take(limit)
                    .map(with_placeholder_content)
                    .collect());
            }
        }

        // Step 3: Candidate pool
        let candidates = self.profiles.list_active(user_id).await?;
        if candidates.is_empty() {
            info!("No active candidates for user {user_id}");
            return Ok(Vec::new());
        }

        // Steps 4–5: Score everyone, keep the winners
        let winners = self.select_top(&requester, candidates, limit);
        info!(
            "Selected {} matches for user {user_id}; top score {:.3}",
            winners.len(),
            winners.first().map(|(_, r)| r.score).unwrap_or(0.0)
        );

        // Step 6: Enrich winners concurrently against one shared deadline
        let deadline = Instant::now() + self.enrichment_timeout;
        let records: Vec<MatchRecord> = join_all(winners.into_iter().map(
            |(candidate, compatibility)| {
                let requester = &requester;
                async move {
                    let enrichment = self.content.enrich(requester, &candidate, deadline).await;
                    MatchRecord {
                        requester_id: requester.id,
                        candidate_id: candidate.id,
                        compatibility,
                        recommended_activity: enrichment.recommended_activity,
                        conversation_starters: enrichment.conversation_starters,
                        updated_at: Utc::now(),
                    }
                }
            },
        ))
        .await;

        // Step 7: Persist each pair on its own
        self.persist(&records).await;

        Ok(records)
    }

    /// Scores every candidate against the requester and keeps the best `limit`.
    /// Equal scores keep the candidate pool's order.
    fn select_top(
        &self,
        requester: &Profile,
        candidates: Vec<Profile>,
        limit: usize,
    ) -> Vec<(Profile, CompatibilityResult)> {
        let mut scored: Vec<(Profile, CompatibilityResult)> = candidates
            .into_iter()
            .map(|candidate| {
                let result = self.scorer.score(requester, &candidate);
                (candidate, result)
            })
            .collect();

        scored.sort_by(|(_, a), (_, b)| b.score.total_cmp(&a.score));
        scored.truncate(limit);
        scored
    }

    async fn persist(&self, records: &[MatchRecord]) {
        let outcomes = join_all(records.iter().map(|record| self.matches.upsert(record))).await;

        for (record, outcome) in records.iter().zip(outcomes) {
            if let Err(e) = outcome {
                warn!(
                    "Failed to store match {} → {}: {e}",
                    record.requester_id, record.candidate_id
                );
            }
        }
    }
}

/// Stored rows may predate content generation or have been edited externally;
/// restore the record invariants before handing them out.
fn with_placeholder_content(mut record: MatchRecord) -> MatchRecord {
    if record.recommended_activity.trim().is_empty() {
        record.recommended_activity = DEFAULT_ACTIVITY.to_string();
    }
    record.conversation_starters.retain(|q| !q.trim().is_empty());
    if record.conversation_starters.is_empty() {
        record.conversation_starters = default_conversation_starters();
    }
    record.conversation_starters.truncate(MAX_CONVERSATION_STARTERS);
    if record.compatibility.factors.is_empty() {
        record.compatibility.factors = vec![DEFAULT_FACTOR.to_string()];
    }
    record.compatibility.score = record.compatibility.score.clamp(0.0, 1.0);
    record
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
