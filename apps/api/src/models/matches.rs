use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::compatibility::CompatibilityResult;

/// Row shape of the `matches` table. `user1_id` is the requester, `user2_id` the candidate.
#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub compatibility_score: f64,
    pub match_factors: Json<Vec<String>>,
    pub recommended_activity: String,
    pub conversation_starters: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// A scored and enriched pairing, keyed by (requester, candidate).
///
/// Invariants: `recommended_activity` is non-empty and `conversation_starters`
/// holds between 1 and 5 items once the record leaves the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub requester_id: Uuid,
    pub candidate_id: Uuid,
    pub compatibility: CompatibilityResult,
    pub recommended_activity: String,
    pub conversation_starters: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<MatchRow> for MatchRecord {
    fn from(row: MatchRow) -> Self {
        MatchRecord {
            requester_id: row.user1_id,
            candidate_id: row.user2_id,
            compatibility: CompatibilityResult {
                score: row.compatibility_score,
                factors: row.match_factors.0,
            },
            recommended_activity: row.recommended_activity,
            conversation_starters: row.conversation_starters,
            updated_at: row.updated_at,
        }
    }
}
