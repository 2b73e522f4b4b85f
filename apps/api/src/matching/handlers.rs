//! Axum route handlers for the Matches API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::matching::orchestrator::CachePolicy;
use crate::models::matches::MatchRecord;
use crate::models::profile::Profile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchesQuery {
    pub user_id: Uuid,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub user_id: Uuid,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// One match as shown to the requester: the other person plus why and how to connect.
#[derive(Debug, Serialize)]
pub struct MatchView {
    /// `None` if the candidate's profile disappeared after the match was stored.
    pub user: Option<Profile>,
    pub compatibility_score: f64,
    pub match_factors: Vec<String>,
    pub recommended_activity: String,
    pub conversation_starters: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<MatchView>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/matches
///
/// Top matches for a user, reusing stored matches when enough exist.
pub async fn handle_get_matches(
    State(state): State<AppState>,
    Query(params): Query<MatchesQuery>,
) -> Result<Json<MatchesResponse>, AppError> {
    let limit = resolve_limit(params.limit, &state.config)?;
    let records = state
        .orchestrator
        .find_matches(params.user_id, limit)
        .await?;

    Ok(Json(MatchesResponse {
        matches: to_views(&state, records).await?,
    }))
}

/// POST /api/v1/matches/refresh
///
/// Recomputes matches from the current candidate pool, ignoring stored ones.
pub async fn handle_refresh_matches(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<MatchesResponse>, AppError> {
    let limit = resolve_limit(request.limit, &state.config)?;
    let records = state
        .orchestrator
        .find_matches_with(request.user_id, limit, CachePolicy::Recompute)
        .await?;

    Ok(Json(MatchesResponse {
        matches: to_views(&state, records).await?,
    }))
}

/// GET /api/v1/matches/:other_user_id
///
/// The stored match between the requester and another user, in either direction.
pub async fn handle_get_match_detail(
    State(state): State<AppState>,
    Path(other_user_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<MatchView>, AppError> {
    let record = state
        .matches
        .get_pair(params.user_id, other_user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No match between {} and {other_user_id}",
                params.user_id
            ))
        })?;

    let user = state.profiles.get_by_id(other_user_id).await?;
    Ok(Json(view(record, user)))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn resolve_limit(requested: Option<usize>, config: &Config) -> Result<usize, AppError> {
    let limit = requested.unwrap_or(config.default_match_limit);
    if limit == 0 || limit > config.max_match_limit {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {}",
            config.max_match_limit
        )));
    }
    Ok(limit)
}

/// Attaches each candidate's current profile, preserving score order.
async fn to_views(state: &AppState, records: Vec<MatchRecord>) -> Result<Vec<MatchView>, AppError> {
    let profiles = try_join_all(
        records
            .iter()
            .map(|r| state.profiles.get_by_id(r.candidate_id)),
    )
    .await?;

    Ok(records
        .into_iter()
        .zip(profiles)
        .map(|(record, user)| view(record, user))
        .collect())
}

fn view(record: MatchRecord, user: Option<Profile>) -> MatchView {
    MatchView {
        user,
        compatibility_score: record.compatibility.score,
        match_factors: record.compatibility.factors,
        recommended_activity: record.recommended_activity,
        conversation_starters: record.conversation_starters,
    }
}
