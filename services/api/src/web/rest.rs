//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification. All business validation lives
//! here; the store only ever sees requests that passed it, with the one
//! exception of delete, where the store's row check is the validation.

use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use typing_core::domain::{is_allowed_duration, Achievement, NewResult, NewText};
use typing_core::ports::PortError;
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        get_text_handler,
        list_texts_handler,
        add_text_handler,
        delete_text_handler,
        submit_result_handler,
        leaderboard_handler,
    ),
    components(
        schemas(
            HealthResponse,
            PracticeTextResponse,
            TextRow,
            TextPayload,
            TextCreatedResponse,
            TextDeletedResponse,
            ResultPayload,
            ResultCreatedResponse,
            LeaderboardEntry,
        )
    ),
    tags(
        (name = "Typing Test API", description = "Practice texts, submitted results, and the leaderboard.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    ok: bool,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TextQuery {
    /// Requested test length in seconds (60, 90, or 120).
    duration: i32,
}

/// One randomly chosen practice paragraph.
#[derive(Serialize, ToSchema)]
pub struct PracticeTextResponse {
    id: i32,
    content: String,
    duration: i32,
}

/// A stored paragraph as seen by the admin listing, including inactive ones.
#[derive(Serialize, ToSchema)]
pub struct TextRow {
    id: i32,
    duration: i32,
    content: String,
    active: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct TextPayload {
    duration: i32,
    content: String,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Serialize, ToSchema)]
pub struct TextCreatedResponse {
    id: i32,
}

#[derive(Serialize, ToSchema)]
pub struct TextDeletedResponse {
    ok: bool,
    deleted_id: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct ResultPayload {
    /// Absent or null means an anonymous submission.
    #[serde(default)]
    user_id: Option<String>,
    duration: i32,
    wpm: i32,
    accuracy: i32,
    correct_chars: i32,
    raw_keystrokes: i32,
    text_id: i32,
}

#[derive(Serialize, ToSchema)]
pub struct ResultCreatedResponse {
    ok: bool,
    id: i32,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    duration: i32,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    10
}

/// One leaderboard row. The achievement tier is derived from WPM when the
/// row is read, never stored.
#[derive(Serialize, ToSchema)]
pub struct LeaderboardEntry {
    user_id: String,
    wpm: i32,
    accuracy: i32,
    achievement: String,
    created_at: DateTime<Utc>,
}

//=========================================================================================
// Rejection Helpers
//=========================================================================================

type Rejection = (StatusCode, String);

/// Converts a store failure that is not a business rejection into a 500.
fn store_failure(err: PortError) -> Rejection {
    error!("Store operation failed: {:?}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn invalid_duration() -> Rejection {
    (
        StatusCode::BAD_REQUEST,
        "Invalid duration. Use 60, 90, or 120.".to_string(),
    )
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Fetch one practice text for the requested duration.
///
/// The text is chosen uniformly at random from the active candidates, with
/// no memory across requests.
#[utoipa::path(
    get,
    path = "/api/texts",
    params(TextQuery),
    responses(
        (status = 200, description = "A randomly chosen practice text", body = PracticeTextResponse),
        (status = 400, description = "Duration outside the supported set"),
        (status = 404, description = "No active texts for this duration")
    )
)]
pub async fn get_text_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TextQuery>,
) -> Result<Json<PracticeTextResponse>, Rejection> {
    if !is_allowed_duration(query.duration) {
        return Err(invalid_duration());
    }

    let pool = state
        .store
        .active_texts_for_duration(query.duration)
        .await
        .map_err(store_failure)?;

    let chosen = pool
        .choose(&mut rand::rng())
        .ok_or_else(|| (StatusCode::NOT_FOUND, "No texts for this duration".to_string()))?;

    Ok(Json(PracticeTextResponse {
        id: chosen.id,
        content: chosen.content.clone(),
        duration: chosen.duration,
    }))
}

/// List every stored text, active and inactive.
#[utoipa::path(
    get,
    path = "/api/texts/all",
    responses(
        (status = 200, description = "All stored texts", body = [TextRow])
    )
)]
pub async fn list_texts_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TextRow>>, Rejection> {
    let texts = state.store.list_texts().await.map_err(store_failure)?;

    Ok(Json(
        texts
            .into_iter()
            .map(|t| TextRow {
                id: t.id,
                duration: t.duration,
                content: t.content,
                active: t.active,
            })
            .collect(),
    ))
}

/// Add a practice paragraph.
#[utoipa::path(
    post,
    path = "/api/texts",
    request_body = TextPayload,
    responses(
        (status = 200, description = "Text stored", body = TextCreatedResponse),
        (status = 400, description = "Duration outside the supported set")
    )
)]
pub async fn add_text_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TextPayload>,
) -> Result<Json<TextCreatedResponse>, Rejection> {
    if !is_allowed_duration(payload.duration) {
        return Err(invalid_duration());
    }

    let text = state
        .store
        .create_text(NewText {
            duration: payload.duration,
            content: payload.content,
            active: payload.active,
        })
        .await
        .map_err(store_failure)?;

    Ok(Json(TextCreatedResponse { id: text.id }))
}

/// Delete a stored text by id.
#[utoipa::path(
    delete,
    path = "/api/texts/{text_id}",
    params(
        ("text_id" = i32, Path, description = "ID of the text to delete")
    ),
    responses(
        (status = 200, description = "Text deleted", body = TextDeletedResponse),
        (status = 404, description = "No text with this id")
    )
)]
pub async fn delete_text_handler(
    State(state): State<Arc<AppState>>,
    Path(text_id): Path<i32>,
) -> Result<Json<TextDeletedResponse>, Rejection> {
    state.store.delete_text(text_id).await.map_err(|e| match e {
        PortError::NotFound(_) => (StatusCode::NOT_FOUND, "Text not found".to_string()),
        other => store_failure(other),
    })?;

    Ok(Json(TextDeletedResponse {
        ok: true,
        deleted_id: text_id,
    }))
}

/// Submit one completed typing-test result.
#[utoipa::path(
    post,
    path = "/api/results",
    request_body = ResultPayload,
    responses(
        (status = 200, description = "Result stored", body = ResultCreatedResponse),
        (status = 400, description = "Duration, accuracy, or WPM outside the accepted range"),
        (status = 404, description = "Referenced text does not exist")
    )
)]
pub async fn submit_result_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResultPayload>,
) -> Result<Json<ResultCreatedResponse>, Rejection> {
    if !is_allowed_duration(payload.duration) {
        return Err((StatusCode::BAD_REQUEST, "Invalid duration".to_string()));
    }
    if !(0..=100).contains(&payload.accuracy) {
        return Err((StatusCode::BAD_REQUEST, "Invalid accuracy".to_string()));
    }
    if !(0..=300).contains(&payload.wpm) {
        return Err((StatusCode::BAD_REQUEST, "Unrealistic WPM".to_string()));
    }

    // The submission must reference a paragraph that actually exists.
    state
        .store
        .get_text(payload.text_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => (StatusCode::NOT_FOUND, "Text not found".to_string()),
            other => store_failure(other),
        })?;

    let result = state
        .store
        .create_result(NewResult {
            user_id: payload.user_id,
            duration: payload.duration,
            wpm: payload.wpm,
            accuracy: payload.accuracy,
            correct_chars: payload.correct_chars,
            raw_keystrokes: payload.raw_keystrokes,
            text_id: payload.text_id,
        })
        .await
        .map_err(store_failure)?;

    Ok(Json(ResultCreatedResponse {
        ok: true,
        id: result.id,
    }))
}

/// Fetch the leaderboard for a duration, fastest first.
#[utoipa::path(
    get,
    path = "/api/leaderboard",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Top results for the duration, descending by WPM", body = [LeaderboardEntry])
    )
)]
pub async fn leaderboard_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, Rejection> {
    let rows = state
        .store
        .top_results(query.duration, query.limit)
        .await
        .map_err(store_failure)?;

    Ok(Json(
        rows.into_iter()
            .map(|r| LeaderboardEntry {
                user_id: r.user_id.unwrap_or_else(|| "anon".to_string()),
                wpm: r.wpm,
                accuracy: r.accuracy,
                achievement: Achievement::from_wpm(r.wpm).as_str().to_string(),
                created_at: r.created_at,
            })
            .collect(),
    ))
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::testing::InMemoryStore;
    use typing_core::ports::TextStore;

    fn state_with(store: InMemoryStore) -> State<Arc<AppState>> {
        let config = Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            database_url: "postgres://unused".to_string(),
            log_level: tracing::Level::INFO,
        };
        State(Arc::new(AppState {
            store: Arc::new(store),
            config: Arc::new(config),
        }))
    }

    async fn add_text(state: &State<Arc<AppState>>, duration: i32, content: &str, active: bool) -> i32 {
        state
            .0
            .store
            .create_text(NewText {
                duration,
                content: content.to_string(),
                active,
            })
            .await
            .unwrap()
            .id
    }

    fn result_payload(duration: i32, wpm: i32, text_id: i32) -> ResultPayload {
        ResultPayload {
            user_id: None,
            duration,
            wpm,
            accuracy: 90,
            correct_chars: 100,
            raw_keystrokes: 110,
            text_id,
        }
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = health_handler().await;
        assert!(response.0.ok);
    }

    #[tokio::test]
    async fn fetch_rejects_unsupported_durations() {
        let state = state_with(InMemoryStore::default());

        for duration in [0, 30, 45, 61, 300, -60] {
            let err = get_text_handler(state.clone(), Query(TextQuery { duration }))
                .await
                .err()
                .unwrap();
            assert_eq!(err.0, StatusCode::BAD_REQUEST);
            assert_eq!(err.1, "Invalid duration. Use 60, 90, or 120.");
        }
    }

    #[tokio::test]
    async fn fetch_returns_404_when_no_active_text_matches() {
        let state = state_with(InMemoryStore::default());
        // Only an inactive 60s text and an active 90s text exist.
        add_text(&state, 60, "retired paragraph", false).await;
        add_text(&state, 90, "other duration", true).await;

        let err = get_text_handler(state.clone(), Query(TextQuery { duration: 60 }))
            .await
            .err()
            .unwrap();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
        assert_eq!(err.1, "No texts for this duration");
    }

    #[tokio::test]
    async fn fetch_picks_from_the_active_candidates_only() {
        let state = state_with(InMemoryStore::default());
        let first = add_text(&state, 60, "first", true).await;
        let second = add_text(&state, 60, "second", true).await;
        add_text(&state, 60, "inactive", false).await;
        add_text(&state, 90, "wrong duration", true).await;

        for _ in 0..20 {
            let response = get_text_handler(state.clone(), Query(TextQuery { duration: 60 }))
                .await
                .unwrap();
            assert!(response.0.id == first || response.0.id == second);
            assert_eq!(response.0.duration, 60);
        }
    }

    #[tokio::test]
    async fn add_rejects_unsupported_durations() {
        let state = state_with(InMemoryStore::default());

        let err = add_text_handler(
            state.clone(),
            Json(TextPayload {
                duration: 42,
                content: "never stored".to_string(),
                active: true,
            }),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert!(state.0.store.list_texts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn added_texts_show_up_in_the_listing() {
        let state = state_with(InMemoryStore::default());

        let created = add_text_handler(
            state.clone(),
            Json(TextPayload {
                duration: 120,
                content: "a fresh paragraph".to_string(),
                active: false,
            }),
        )
        .await
        .unwrap();

        let listing = list_texts_handler(state.clone()).await.unwrap();
        assert_eq!(listing.0.len(), 1);
        assert_eq!(listing.0[0].id, created.0.id);
        assert_eq!(listing.0[0].duration, 120);
        assert!(!listing.0[0].active);
    }

    #[tokio::test]
    async fn delete_rejects_unknown_ids() {
        let state = state_with(InMemoryStore::default());

        let err = delete_text_handler(state.clone(), Path(99))
            .await
            .err()
            .unwrap();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
        assert_eq!(err.1, "Text not found");
    }

    #[tokio::test]
    async fn deleted_texts_disappear_from_the_listing() {
        let state = state_with(InMemoryStore::default());
        let doomed = add_text(&state, 60, "doomed", true).await;
        let kept = add_text(&state, 90, "kept", true).await;

        let response = delete_text_handler(state.clone(), Path(doomed))
            .await
            .unwrap();
        assert!(response.0.ok);
        assert_eq!(response.0.deleted_id, doomed);

        let listing = list_texts_handler(state.clone()).await.unwrap();
        assert_eq!(listing.0.len(), 1);
        assert_eq!(listing.0[0].id, kept);
    }

    #[tokio::test]
    async fn submit_rejects_out_of_range_fields() {
        let state = state_with(InMemoryStore::default());
        let text_id = add_text(&state, 60, "target", true).await;

        let err = submit_result_handler(state.clone(), Json(result_payload(30, 80, text_id)))
            .await
            .err()
            .unwrap();
        assert_eq!(err, (StatusCode::BAD_REQUEST, "Invalid duration".to_string()));

        let mut payload = result_payload(60, 80, text_id);
        payload.accuracy = 101;
        let err = submit_result_handler(state.clone(), Json(payload))
            .await
            .err()
            .unwrap();
        assert_eq!(err, (StatusCode::BAD_REQUEST, "Invalid accuracy".to_string()));

        let mut payload = result_payload(60, 80, text_id);
        payload.accuracy = -1;
        let err = submit_result_handler(state.clone(), Json(payload))
            .await
            .err()
            .unwrap();
        assert_eq!(err, (StatusCode::BAD_REQUEST, "Invalid accuracy".to_string()));

        let err = submit_result_handler(state.clone(), Json(result_payload(60, 301, text_id)))
            .await
            .err()
            .unwrap();
        assert_eq!(err, (StatusCode::BAD_REQUEST, "Unrealistic WPM".to_string()));

        let err = submit_result_handler(state.clone(), Json(result_payload(60, -1, text_id)))
            .await
            .err()
            .unwrap();
        assert_eq!(err, (StatusCode::BAD_REQUEST, "Unrealistic WPM".to_string()));
    }

    #[tokio::test]
    async fn submit_rejects_unknown_text_ids() {
        let state = state_with(InMemoryStore::default());

        let err = submit_result_handler(state.clone(), Json(result_payload(60, 80, 7)))
            .await
            .err()
            .unwrap();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
        assert_eq!(err.1, "Text not found");
    }

    #[tokio::test]
    async fn submit_stores_a_valid_result() {
        let state = state_with(InMemoryStore::default());
        let text_id = add_text(&state, 60, "target", true).await;

        let mut payload = result_payload(60, 82, text_id);
        payload.user_id = Some("mavis".to_string());
        let response = submit_result_handler(state.clone(), Json(payload))
            .await
            .unwrap();
        assert!(response.0.ok);
        assert_eq!(response.0.id, 1);

        let stored = state.0.store.top_results(60, 10).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].wpm, 82);
        assert_eq!(stored[0].user_id.as_deref(), Some("mavis"));
    }

    #[tokio::test]
    async fn leaderboard_is_sorted_by_wpm_and_truncated() {
        let state = state_with(InMemoryStore::default());
        let text_id = add_text(&state, 60, "target", true).await;

        for wpm in [30, 80, 50] {
            submit_result_handler(state.clone(), Json(result_payload(60, wpm, text_id)))
                .await
                .unwrap();
        }
        // A different duration must never leak into the listing.
        let other = add_text(&state, 90, "other", true).await;
        submit_result_handler(state.clone(), Json(result_payload(90, 200, other)))
            .await
            .unwrap();

        let board = leaderboard_handler(
            state.clone(),
            Query(LeaderboardQuery {
                duration: 60,
                limit: 2,
            }),
        )
        .await
        .unwrap();

        let speeds: Vec<i32> = board.0.iter().map(|e| e.wpm).collect();
        assert_eq!(speeds, vec![80, 50]);
        let tiers: Vec<&str> = board.0.iter().map(|e| e.achievement.as_str()).collect();
        assert_eq!(tiers, vec!["Advanced", "Pro"]);
        assert!(board.0.iter().all(|e| e.user_id == "anon"));
    }

    #[tokio::test]
    async fn leaderboard_is_empty_for_durations_without_results() {
        let state = state_with(InMemoryStore::default());

        let board = leaderboard_handler(
            state.clone(),
            Query(LeaderboardQuery {
                duration: 120,
                limit: 10,
            }),
        )
        .await
        .unwrap();
        assert!(board.0.is_empty());
    }
}
