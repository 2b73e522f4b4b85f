//! In-memory fakes for the engine's seams: stores, scorer and text generator.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::llm_client::{GenerationRequest, LlmError, TextGenerator};
use crate::matching::compatibility::{CompatibilityResult, CompatibilityScorer};
use crate::matching::prompts::STARTERS_MAX_TOKENS;
use crate::matching::store::{MatchStore, ProfileStore};
use crate::models::matches::MatchRecord;
use crate::models::profile::Profile;

/// An active profile with a fresh id and no answers filled in.
pub fn make_profile(name: &str) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        name: name.to_string(),
        is_active: true,
        ..Profile::default()
    }
}

pub fn stored_record(requester_id: Uuid, candidate_id: Uuid, score: f64) -> MatchRecord {
    MatchRecord {
        requester_id,
        candidate_id,
        compatibility: CompatibilityResult {
            score,
            factors: vec!["Common interests".to_string()],
        },
        recommended_activity: "Visit a museum together".to_string(),
        conversation_starters: vec!["What exhibit would you never skip?".to_string()],
        updated_at: Utc::now(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stores
// ────────────────────────────────────────────────────────────────────────────

pub struct InMemoryProfileStore {
    profiles: Vec<Profile>,
}

impl InMemoryProfileStore {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
        Ok(self.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn list_active(&self, exclude_id: Uuid) -> Result<Vec<Profile>, sqlx::Error> {
        Ok(self
            .profiles
            .iter()
            .filter(|p| p.is_active && p.id != exclude_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryMatchStore {
    records: Mutex<HashMap<(Uuid, Uuid), MatchRecord>>,
}

impl InMemoryMatchStore {
    pub fn insert(&self, record: MatchRecord) {
        self.records
            .lock()
            .unwrap()
            .insert((record.requester_id, record.candidate_id), record);
    }

    pub fn records_for(&self, requester_id: Uuid) -> Vec<MatchRecord> {
        self.records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.requester_id == requester_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn upsert(&self, record: &MatchRecord) -> Result<(), sqlx::Error> {
        self.insert(record.clone());
        Ok(())
    }

    async fn list_by_requester(&self, requester_id: Uuid) -> Result<Vec<MatchRecord>, sqlx::Error> {
        let mut records = self.records_for(requester_id);
        records.sort_by(|a, b| b.compatibility.score.total_cmp(&a.compatibility.score));
        Ok(records)
    }

    async fn get_pair(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<MatchRecord>, sqlx::Error> {
        let records = self.records.lock().unwrap();
        Ok(records
            .get(&(user_a, user_b))
            .or_else(|| records.get(&(user_b, user_a)))
            .cloned())
    }
}

/// An in-memory store whose writes fail, either for every pair or only for
/// one chosen candidate.
#[derive(Default)]
pub struct FailingMatchStore {
    inner: InMemoryMatchStore,
    only_candidate: Option<Uuid>,
    upserts: AtomicUsize,
}

impl FailingMatchStore {
    pub fn failing_all() -> Self {
        Self::default()
    }

    pub fn failing_for(candidate_id: Uuid) -> Self {
        Self {
            only_candidate: Some(candidate_id),
            ..Self::default()
        }
    }

    pub fn upsert_attempts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn records_for(&self, requester_id: Uuid) -> Vec<MatchRecord> {
        self.inner.records_for(requester_id)
    }
}

#[async_trait]
impl MatchStore for FailingMatchStore {
    async fn upsert(&self, record: &MatchRecord) -> Result<(), sqlx::Error> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        match self.only_candidate {
            Some(id) if id != record.candidate_id => self.inner.upsert(record).await,
            _ => Err(sqlx::Error::PoolTimedOut),
        }
    }

    async fn list_by_requester(&self, requester_id: Uuid) -> Result<Vec<MatchRecord>, sqlx::Error> {
        self.inner.list_by_requester(requester_id).await
    }

    async fn get_pair(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<MatchRecord>, sqlx::Error> {
        self.inner.get_pair(user_a, user_b).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scorer
// ────────────────────────────────────────────────────────────────────────────

/// Wraps a scorer and counts how often it is consulted.
pub struct CountingScorer<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S> CountingScorer<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<S: CompatibilityScorer> CompatibilityScorer for CountingScorer<S> {
    fn score(&self, a: &Profile, b: &Profile) -> CompatibilityResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.score(a, b)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Text generator
// ────────────────────────────────────────────────────────────────────────────

enum Script {
    Reply(String),
    /// First reply for activity requests, second for conversation-starter requests.
    ByPrompt(String, String),
    Fail,
    Hang,
    /// Answers activity requests; conversation-starter requests never finish.
    HangOnStarters(String),
}

/// A `TextGenerator` with canned behaviour that records every request it sees.
pub struct ScriptedGenerator {
    script: Script,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    fn with(script: Script) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with(Script::Reply(text.to_string()))
    }

    pub fn by_prompt(activity: &str, starters: &str) -> Self {
        Self::with(Script::ByPrompt(activity.to_string(), starters.to_string()))
    }

    pub fn failing() -> Self {
        Self::with(Script::Fail)
    }

    pub fn hanging() -> Self {
        Self::with(Script::Hang)
    }

    pub fn hanging_on_starters(activity: &str) -> Self {
        Self::with(Script::HangOnStarters(activity.to_string()))
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());

        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::ByPrompt(activity, starters) => {
                if request.max_output_tokens == STARTERS_MAX_TOKENS {
                    Ok(starters.clone())
                } else {
                    Ok(activity.clone())
                }
            }
            Script::Fail => Err(LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            }),
            Script::Hang => std::future::pending().await,
            Script::HangOnStarters(activity) => {
                if request.max_output_tokens == STARTERS_MAX_TOKENS {
                    std::future::pending().await
                } else {
                    Ok(activity.clone())
                }
            }
        }
    }
}
