//! Router assembly: HTTP endpoints, WebSocket upgrade, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - JSON API under `/api/v1/...`, every body wrapped as `{success, data, error}`
/// - CORS (allow any origin/method/headers); adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/analyze", post(http::http_post_analyze))
        .route("/api/v1/rhyme_pattern", post(http::http_post_rhyme_pattern))
        .route("/api/v1/forms", get(http::http_get_forms))
        .route("/api/v1/fillword_framework", post(http::http_post_framework))
        .route("/api/v1/char_tone", post(http::http_post_char_tone))
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::logic::fixtures;

    async fn call(method: &str, uri: &str, body: Option<serde_json::Value>) -> serde_json::Value {
        let app = build_router(Arc::new(fixtures::state()));
        let req = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => req.body(Body::empty()),
        }
        .expect("request");
        let res = app.oneshot(req).await.expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health() {
        let v = call("GET", "/api/v1/health", None).await;
        assert_eq!(v["ok"], true);
    }

    #[tokio::test]
    async fn analyze_envelope() {
        let v = call("POST", "/api/v1/analyze", Some(serde_json::json!({ "text": "春落，花月" }))).await;
        assert_eq!(v["success"], true);
        assert!(v["error"].is_null());
        assert_eq!(v["data"]["score"], 50.0);
        assert_eq!(v["data"]["issues"].as_array().map(Vec::len), Some(2));
        assert_eq!(v["data"]["issues"][0]["actual"], "oblique");
        assert_eq!(v["data"]["issues"][0]["expected"], "level");
    }

    #[tokio::test]
    async fn analyze_unmatched_and_empty() {
        let v = call("POST", "/api/v1/analyze", Some(serde_json::json!({ "text": "春花，落月，春" }))).await;
        assert_eq!(v["success"], false);
        assert_eq!(v["data"]["length"], 5);
        assert_eq!(v["data"]["split_length"], serde_json::json!([2, 2, 1]));

        let v = call("POST", "/api/v1/analyze", Some(serde_json::json!({ "text": "   " }))).await;
        assert_eq!(v["success"], false);
        assert!(v["data"].is_null());
    }

    #[tokio::test]
    async fn rhyme_pattern_and_framework() {
        let v = call(
            "POST",
            "/api/v1/rhyme_pattern",
            Some(serde_json::json!({ "text": "春花落月", "formName": "春词", "author": "无名氏", "patternId": 1 })),
        )
        .await;
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["words"], serde_json::json!(["花", "落"]));

        let v = call(
            "POST",
            "/api/v1/fillword_framework",
            Some(serde_json::json!({ "formName": "春词", "author": "无名氏" })),
        )
        .await;
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["framework"]["stanzas"][0]["name"], "first stanza");
        assert_eq!(v["data"]["framework"]["total_chars"], 4);
    }

    async fn call_raw(uri: &str, content_type: Option<&str>, body: &str) -> serde_json::Value {
        let app = build_router(Arc::new(fixtures::state()));
        let mut req = Request::builder().method("POST").uri(uri);
        if let Some(ct) = content_type {
            req = req.header(header::CONTENT_TYPE, ct);
        }
        let req = req.body(Body::from(body.to_string())).expect("request");
        let res = app.oneshot(req).await.expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn bad_bodies_are_enveloped() {
        let v = call(
            "POST",
            "/api/v1/rhyme_pattern",
            Some(serde_json::json!({ "text": "春花，落月", "formName": "春词", "author": "无名氏", "patternId": -1 })),
        )
        .await;
        assert_eq!(v["success"], false);
        assert!(v["data"].is_null());
        assert!(v["error"].as_str().is_some_and(|e| e.contains("patternId")));

        let v = call_raw("/api/v1/analyze", Some("application/json"), "{\"text\": ").await;
        assert_eq!(v["success"], false);
        assert!(v["error"].is_string());

        let v = call_raw("/api/v1/char_tone", None, "{\"char\": \"春\"}").await;
        assert_eq!(v["success"], false);
        assert!(v["error"].is_string());
    }

    #[tokio::test]
    async fn forms_and_char_tone() {
        let v = call("GET", "/api/v1/forms", None).await;
        assert_eq!(v["data"]["default_index"], 2);

        let v = call("POST", "/api/v1/char_tone", Some(serde_json::json!({ "char": "春" }))).await;
        assert_eq!(v["data"]["tone"], "level");
        assert_eq!(v["data"]["original_tone"], "平");
    }
}
