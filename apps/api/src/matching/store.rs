//! Storage seams for the matching engine.
//!
//! Profiles are read-only here. Matches are upserted by (requester, candidate)
//! and never deleted by the engine. Postgres implementations back both traits
//! in production; tests substitute in-memory stores.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::matches::{MatchRecord, MatchRow};
use crate::models::profile::{Profile, PROFILE_COLUMNS};

const MATCH_COLUMNS: &str = "user1_id, user2_id, compatibility_score, match_factors, \
    recommended_activity, conversation_starters, updated_at";

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Profile>, sqlx::Error>;

    /// Every active profile except `exclude_id`.
    async fn list_active(&self, exclude_id: Uuid) -> Result<Vec<Profile>, sqlx::Error>;
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Inserts the record, or overwrites the existing one for the same pair.
    async fn upsert(&self, record: &MatchRecord) -> Result<(), sqlx::Error>;

    /// Stored matches for a requester, highest score first.
    async fn list_by_requester(&self, requester_id: Uuid) -> Result<Vec<MatchRecord>, sqlx::Error>;

    /// The stored match between two users, whichever of them requested it.
    async fn get_pair(&self, user_a: Uuid, user_b: Uuid)
        -> Result<Option<MatchRecord>, sqlx::Error>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres implementations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_active(&self, exclude_id: Uuid) -> Result<Vec<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE id <> $1 AND is_active = TRUE ORDER BY id"
        ))
        .bind(exclude_id)
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Clone)]
pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn upsert(&self, record: &MatchRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO matches
                (user1_id, user2_id, compatibility_score, match_factors,
                 recommended_activity, conversation_starters, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user1_id, user2_id) DO UPDATE SET
                compatibility_score   = EXCLUDED.compatibility_score,
                match_factors         = EXCLUDED.match_factors,
                recommended_activity  = EXCLUDED.recommended_activity,
                conversation_starters = EXCLUDED.conversation_starters,
                updated_at            = EXCLUDED.updated_at
            "#,
        )
        .bind(record.requester_id)
        .bind(record.candidate_id)
        .bind(record.compatibility.score)
        .bind(Json(&record.compatibility.factors))
        .bind(&record.recommended_activity)
        .bind(&record.conversation_starters)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_by_requester(&self, requester_id: Uuid) -> Result<Vec<MatchRecord>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MatchRow>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE user1_id = $1 \
             ORDER BY compatibility_score DESC"
        ))
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MatchRecord::from).collect())
    }

    async fn get_pair(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<MatchRecord>, sqlx::Error> {
        // Prefer the row user_a requested; fall back to the reverse direction.
        let row = sqlx::query_as::<_, MatchRow>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches \
             WHERE (user1_id = $1 AND user2_id = $2) OR (user1_id = $2 AND user2_id = $1) \
             ORDER BY (user1_id = $1) DESC \
             LIMIT 1"
        ))
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MatchRecord::from))
    }
}
