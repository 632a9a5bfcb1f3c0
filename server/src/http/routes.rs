//! HTTP routes: leaderboard read, score submission, miniapp webhook,
//! health.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{extract::State, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use inflynced_engine::{
    clean, round_time, ScoreEntry, DISPLAY_LIMIT, MAX_TIME_SECS, STORE_LIMIT, USERNAME_MAX_LEN,
};

use crate::store::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/submit-score", post(submit_score))
        .route("/api/webhook", post(webhook))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "handler failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn now_unix_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// `GET /api/leaderboard`: cleaned top 10, ascending by time. Cleaning is
/// applied on the way out only; the stored snapshot is left untouched.
async fn get_leaderboard(State(state): State<AppState>) -> Json<Vec<ScoreEntry>> {
    let mut scores = clean(state.store.load());
    scores.truncate(DISPLAY_LIMIT);
    tracing::debug!(count = scores.len(), "serving leaderboard");
    Json(scores)
}

#[derive(Debug, Deserialize)]
pub struct SubmitScoreRequest {
    pub username: Option<String>,
    pub fid: Option<String>,
    pub time: Option<f64>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreResponse {
    pub success: bool,
    pub message: String,
    /// 1-based rank of the submitter in the cleaned standings; 0 if the
    /// entry itself was filtered as demo data.
    pub position: usize,
    pub total_scores: usize,
    /// Top 10 after the submission, for immediate display.
    pub leaderboard: Vec<ScoreEntry>,
}

/// `POST /api/submit-score`: validate, append, re-clean (best time per fid
/// wins, so a slower resubmission never displaces a faster one), cap at 50.
async fn submit_score(
    State(state): State<AppState>,
    payload: Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> Result<Json<SubmitScoreResponse>, ApiError> {
    let Json(req) =
        payload.map_err(|err| ApiError::Validation(format!("Invalid request body: {err}")))?;

    let username = req.username.as_deref().map(str::trim).unwrap_or("");
    let fid = req.fid.as_deref().map(str::trim).unwrap_or("");
    if username.is_empty() || fid.is_empty() {
        return Err(ApiError::Validation("Missing required fields".into()));
    }
    let time = req
        .time
        .ok_or_else(|| ApiError::Validation("Missing required fields".into()))?;
    if !time.is_finite() || !(0.0..=MAX_TIME_SECS).contains(&time) {
        return Err(ApiError::Validation("Invalid time".into()));
    }

    let entry = ScoreEntry {
        username: username.chars().take(USERNAME_MAX_LEN).collect(),
        fid: fid.to_string(),
        time: round_time(time),
        timestamp: now_unix_ms(),
        avatar: req.avatar,
    };
    tracing::info!(username = %entry.username, fid = %entry.fid, time = entry.time, "score submitted");

    let mut scores = state.store.load();
    scores.push(entry.clone());
    let mut cleaned = clean(scores);
    cleaned.truncate(STORE_LIMIT);

    let position = cleaned
        .iter()
        .position(|e| e.fid == entry.fid)
        .map(|i| i + 1)
        .unwrap_or(0);
    let total_scores = cleaned.len();
    let leaderboard = cleaned.iter().take(DISPLAY_LIMIT).cloned().collect();
    state.store.replace(cleaned);

    Ok(Json(SubmitScoreResponse {
        success: true,
        message: "Score submitted successfully".into(),
        position,
        total_scores,
        leaderboard,
    }))
}

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

/// `POST /api/webhook`: miniapp host event notifications. Unknown types
/// are logged and still acknowledged; the host treats anything but a 200
/// as a delivery failure.
async fn webhook(payload: Result<Json<WebhookEvent>, JsonRejection>) -> Json<WebhookAck> {
    match payload {
        Ok(Json(event)) => match event.kind.as_str() {
            "miniapp.launched" => tracing::info!(data = %event.data, "miniapp launched"),
            "miniapp.cast_shared" => tracing::info!(data = %event.data, "cast shared"),
            "miniapp.interaction" => tracing::info!(data = %event.data, "user interaction"),
            other => tracing::warn!(kind = %other, "unknown webhook type"),
        },
        Err(err) => tracing::warn!(error = %err, "malformed webhook payload"),
    }
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(WebhookAck {
        success: true,
        message: "Webhook processed successfully".into(),
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        router(AppState {
            store: Arc::new(MemoryStore::default()),
        })
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn submit_then_fetch_round_trips() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/submit-score",
                json!({ "username": "abc", "fid": "123", "time": 12.34 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["position"], json!(1));
        assert_eq!(body["totalScores"], json!(1));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/leaderboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["time"], json!(12.3));
    }

    #[tokio::test]
    async fn resubmission_keeps_the_better_time() {
        let app = test_app();
        for time in [12.34, 9.87] {
            let response = app
                .clone()
                .oneshot(json_request(
                    Method::POST,
                    "/api/submit-score",
                    json!({ "username": "abc", "fid": "123", "time": time }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        // a slower third run must not displace the 9.9
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/submit-score",
                json!({ "username": "abc", "fid": "123", "time": 30.0 }),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["totalScores"], json!(1));
        assert_eq!(body["leaderboard"][0]["time"], json!(9.9));
        assert_eq!(body["leaderboard"][0]["fid"], json!("123"));
    }

    #[tokio::test]
    async fn faster_entry_ranks_ahead() {
        let app = test_app();
        for (fid, time) in [("slow", 25.0), ("123", 9.87)] {
            app.clone()
                .oneshot(json_request(
                    Method::POST,
                    "/api/submit-score",
                    json!({ "username": "abc", "fid": fid, "time": time }),
                ))
                .await
                .unwrap();
        }
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/leaderboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body[0]["fid"], json!("123"));
        assert_eq!(body[0]["time"], json!(9.9));
        assert_eq!(body[1]["fid"], json!("slow"));
    }

    #[tokio::test]
    async fn rejects_out_of_range_time() {
        let app = test_app();
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/submit-score",
                json!({ "username": "abc", "fid": "123", "time": 4000 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], json!("Invalid time"));
    }

    #[tokio::test]
    async fn rejects_missing_fields() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/submit-score",
                json!({ "username": "abc", "time": 10.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // non-numeric time is a body-level rejection, still a 400
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/submit-score",
                json!({ "username": "abc", "fid": "123", "time": "fast" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn truncates_long_usernames() {
        let app = test_app();
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/submit-score",
                json!({
                    "username": "a-very-long-username-indeed",
                    "fid": "9",
                    "time": 10.0
                }),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["leaderboard"][0]["username"], json!("a-very-long-username"));
    }

    #[tokio::test]
    async fn demo_entries_never_reach_the_leaderboard() {
        let app = test_app();
        for (username, fid) in [("puzzlemaster", "1"), ("abc", "demo-2"), ("real", "3")] {
            app.clone()
                .oneshot(json_request(
                    Method::POST,
                    "/api/submit-score",
                    json!({ "username": username, "fid": fid, "time": 10.0 }),
                ))
                .await
                .unwrap();
        }
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/leaderboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["username"], json!("real"));
    }

    #[tokio::test]
    async fn wrong_methods_are_405() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/leaderboard", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/submit-score")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn webhook_acks_unknown_types() {
        let app = test_app();
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/webhook",
                json!({ "type": "miniapp.selfdestruct", "data": { "user": 7 } }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert!(body["timestamp"].as_str().unwrap().contains('T'));
    }
}
