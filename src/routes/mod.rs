//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/round", post(http::http_post_round).get(http::http_get_round))
        .route("/api/v1/guess", post(http::http_post_guess))
        .route("/api/v1/hints", get(http::http_get_hints))
        .route("/api/v1/result", get(http::http_get_result))
        .route("/api/v1/options", get(http::http_get_options))
        .route("/api/v1/hint_registry", get(http::http_get_hint_registry))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::from_parts(None, Some(9)));
        (build_router(state.clone()), state)
    }

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (app, _) = app();
        let (status, body) = call(&app, Request::get("/api/v1/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn round_guess_and_result_flow() {
        let (app, state) = app();
        let (status, round) = call(&app, post_json("/api/v1/round", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let sid = round["sessionId"].as_str().unwrap().to_string();
        assert_eq!(round["score"], 50);
        assert_eq!(round["phase"], "awaiting_guess");
        assert!(round.get("answer").is_none());

        let target = state.get_session(&sid).await.unwrap().target_id().to_string();
        let answer = state.catalog.lookup(&target).unwrap().name.clone();

        let (status, out) =
            call(&app, post_json("/api/v1/guess", json!({ "sessionId": sid, "candidate": answer }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["outcome"]["result"], "correct");
        assert_eq!(out["session"]["gameWon"], true);
        assert_eq!(out["session"]["answer"]["name"], answer);

        let uri = format!("/api/v1/result?sessionId={sid}");
        let (status, res) = call(&app, Request::get(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(res["summary"], "You cracked the case in 1 guesses and banked 50/50 points.");
        assert_eq!(res["distribution"]["playerBucket"], 50);
    }

    #[tokio::test]
    async fn blank_guess_is_bad_request() {
        let (app, _) = app();
        let (_, round) = call(&app, post_json("/api/v1/round", json!({}))).await;
        let sid = round["sessionId"].as_str().unwrap().to_string();
        let (status, body) =
            call(&app, post_json("/api/v1/guess", json!({ "sessionId": sid, "candidate": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "select a metro first");

        let uri = format!("/api/v1/round?sessionId={sid}");
        let (_, view) = call(&app, Request::get(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(view["guessesMade"], 0);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (app, _) = app();
        let (status, _) =
            call(&app, Request::get("/api/v1/hints?sessionId=missing").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn options_list_is_served() {
        let (app, _) = app();
        let (status, body) = call(&app, Request::get("/api/v1/options").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["options"].as_array().unwrap().len() >= 150);
        let (_, reg) = call(&app, Request::get("/api/v1/hint_registry").body(Body::empty()).unwrap()).await;
        assert_eq!(reg["hints"][1]["penaltyDisplayOnly"], 200);
    }
}
