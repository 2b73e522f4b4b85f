use std::sync::Arc;

use crate::config::Config;
use crate::matching::orchestrator::MatchOrchestrator;
use crate::matching::store::{MatchStore, ProfileStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Read-only view of user profiles, used to attach the other person to each match.
    pub profiles: Arc<dyn ProfileStore>,
    pub matches: Arc<dyn MatchStore>,
    /// Owns scoring, enrichment and persistence of matches.
    pub orchestrator: Arc<MatchOrchestrator>,
}
