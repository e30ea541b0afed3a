// ABOUTME: Route definitions for the hookbox HTTP server.
// ABOUTME: Assembles the record, inference, health, and index routes into one Axum Router.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;
use crate::web;

/// Build the complete Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        .route("/", get(web::index))
        .route("/health", get(health))
        .route(
            "/webhook",
            get(api::records::list_records)
                .post(api::records::append_record)
                .delete(api::records::delete_records),
        )
        .route("/ai/run", post(api::inference::run_inference))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::test_support::{body_json, test_state};
    use axum::body::Body;
    use hookbox_proxy::testing::StubBackend;
    use hookbox_store::RecordStore;
    use http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_returns_ok() {
        let (state, _dir) = test_state();
        let app = create_router(state);
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);

        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn unsupported_method_is_rejected() {
        let (state, _dir) = test_state();
        let app = create_router(state);
        let resp = app
            .oneshot(Request::put("/webhook").body(Body::from("x")).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = RecordStore::open(dir.path().join("webhook_data.json")).unwrap();
        let state = Arc::new(AppState::new(
            store,
            Arc::new(StubBackend::new(Vec::new())),
            16,
        ));

        let app = create_router(Arc::clone(&state));
        let resp = app
            .oneshot(
                Request::post("/webhook")
                    .body(Body::from("this body is longer than sixteen bytes"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(state.store.load().unwrap().is_none(), "nothing should be stored");
    }
}
