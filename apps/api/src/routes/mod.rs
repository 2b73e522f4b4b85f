pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matches API
        .route("/api/v1/matches", get(handlers::handle_get_matches))
        .route(
            "/api/v1/matches/refresh",
            post(handlers::handle_refresh_matches),
        )
        .route(
            "/api/v1/matches/:other_user_id",
            get(handlers::handle_get_match_detail),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::matching::compatibility::WeightedProfileScorer;
    use crate::matching::enrichment::ContentGenerator;
    use crate::matching::orchestrator::MatchOrchestrator;
    use crate::models::profile::Profile;
    use crate::test_utils::{
        make_profile, stored_record, InMemoryMatchStore, InMemoryProfileStore, ScriptedGenerator,
    };

    fn app(profiles: Vec<Profile>, matches: Arc<InMemoryMatchStore>) -> Router {
        let profiles = Arc::new(InMemoryProfileStore::new(profiles));
        let orchestrator = MatchOrchestrator::new(
            profiles.clone(),
            matches.clone(),
            Arc::new(WeightedProfileScorer),
            ContentGenerator::new(Arc::new(ScriptedGenerator::failing())),
            Duration::from_secs(5),
        );
        build_router(AppState {
            config: Config::for_tests(),
            profiles,
            matches,
            orchestrator: Arc::new(orchestrator),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn two_people() -> (Profile, Profile) {
        let mut a = make_profile("Ana");
        a.interests = Some("tango chess".to_string());
        let mut b = make_profile("Ben");
        b.interests = Some("tango chess".to_string());
        (a, b)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(
            app(vec![], Arc::new(InMemoryMatchStore::default())),
            get("/health"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_get_matches_unknown_user_is_404() {
        let uri = format!("/api/v1/matches?user_id={}", Uuid::new_v4());
        let (status, body) = send(app(vec![], Arc::new(InMemoryMatchStore::default())), get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_matches_rejects_zero_limit() {
        let (a, _) = two_people();
        let uri = format!("/api/v1/matches?user_id={}&limit=0", a.id);
        let (status, body) = send(app(vec![a], Arc::new(InMemoryMatchStore::default())), get(&uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_matches_attaches_candidate_profile() {
        let (a, b) = two_people();
        let uri = format!("/api/v1/matches?user_id={}", a.id);
        let (status, body) = send(
            app(vec![a, b.clone()], Arc::new(InMemoryMatchStore::default())),
            get(&uri),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["user"]["name"], "Ben");
        assert_eq!(matches[0]["compatibility_score"], 1.0);
        assert_eq!(matches[0]["match_factors"][0], "Common interests");
        assert!(!matches[0]["recommended_activity"]
            .as_str()
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_refresh_recomputes() {
        let (a, b) = two_people();
        let store = Arc::new(InMemoryMatchStore::default());
        store.insert(stored_record(a.id, b.id, 0.1));

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/matches/refresh")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({ "user_id": a.id, "limit": 1 }).to_string(),
            ))
            .unwrap();
        let (status, body) = send(app(vec![a, b], store), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matches"][0]["compatibility_score"], 1.0);
    }

    #[tokio::test]
    async fn test_match_detail_found_in_either_direction() {
        let (a, b) = two_people();
        let store = Arc::new(InMemoryMatchStore::default());
        store.insert(stored_record(b.id, a.id, 0.64));

        let uri = format!("/api/v1/matches/{}?user_id={}", b.id, a.id);
        let (status, body) = send(app(vec![a, b], store), get(&uri)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "Ben");
        assert_eq!(body["compatibility_score"], 0.64);
    }

    #[tokio::test]
    async fn test_match_detail_missing_is_404() {
        let (a, b) = two_people();
        let uri = format!("/api/v1/matches/{}?user_id={}", b.id, a.id);
        let (status, _) = send(app(vec![a, b], Arc::new(InMemoryMatchStore::default())), get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
