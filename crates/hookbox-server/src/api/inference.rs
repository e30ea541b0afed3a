// ABOUTME: Handler for POST /ai/run, forwarding a prompt to the configured inference backend.
// ABOUTME: Returns the upstream body base64-encoded, or a JSON error with a 400/500 status.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hookbox_proxy::{InferenceRequest, encode_body};
use serde_json::json;

use crate::app_state::SharedState;

/// POST /ai/run - Proxy one inference request.
pub async fn run_inference(
    State(state): State<SharedState>,
    payload: Result<Json<InferenceRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!("rejected inference payload: {}", rejection);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    if let Err(e) = req.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response();
    }

    match state.inference.run(&req).await {
        Ok(body) => {
            tracing::debug!(
                "inference via {} returned {} bytes",
                state.inference.backend_name(),
                body.len()
            );
            Json(json!({ "image": encode_body(&body) })).into_response()
        }
        Err(e) if e.is_client_error() => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
        }
        Err(e) => {
            tracing::error!("inference request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app_state::AppState;
    use crate::routes::create_router;
    use crate::test_support::body_json;
    use axum::body::Body;
    use axum::http::StatusCode;
    use hookbox_proxy::InferenceBackend;
    use hookbox_proxy::testing::{FailingBackend, StubBackend};
    use hookbox_store::RecordStore;
    use http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state_with(backend: Arc<dyn InferenceBackend>) -> (Arc<AppState>, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = RecordStore::open(dir.path().join("webhook_data.json")).unwrap();
        (Arc::new(AppState::new(store, backend, 1024 * 1024)), dir)
    }

    fn run_request(body: serde_json::Value) -> Request<Body> {
        Request::post("/ai/run")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn full_body() -> serde_json::Value {
        serde_json::json!({
            "account_id": "acct",
            "model": "@cf/stabilityai/stable-diffusion-xl-base-1.0",
            "api_token": "token",
            "prompt": "a barn at dusk"
        })
    }

    #[tokio::test]
    async fn success_returns_base64_body() {
        let stub = Arc::new(StubBackend::new(b"hello".to_vec()));
        let (state, _dir) = state_with(stub.clone());

        let resp = create_router(state)
            .oneshot(run_request(full_body()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["image"], "aGVsbG8=");

        let seen = stub.last_request().expect("backend should be called");
        assert_eq!(seen.prompt, "a barn at dusk");
        assert_eq!(seen.model, "@cf/stabilityai/stable-diffusion-xl-base-1.0");
    }

    #[tokio::test]
    async fn missing_field_is_400() {
        let stub = Arc::new(StubBackend::new(b"unused".to_vec()));
        let (state, _dir) = state_with(stub.clone());

        let mut body = full_body();
        body.as_object_mut().unwrap().remove("api_token");

        let resp = create_router(state).oneshot(run_request(body)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Missing required field: api_token");
        assert!(stub.last_request().is_none(), "backend must not be called");
    }

    #[tokio::test]
    async fn malformed_json_is_400_with_json_error() {
        let stub = Arc::new(StubBackend::new(b"unused".to_vec()));
        let (state, _dir) = state_with(stub.clone());

        let resp = create_router(state)
            .oneshot(
                Request::post("/ai/run")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].is_string(), "got {}", json);
        assert!(stub.last_request().is_none(), "backend must not be called");
    }

    #[tokio::test]
    async fn mistyped_field_or_missing_content_type_is_400() {
        let (state, _dir) = state_with(Arc::new(StubBackend::new(b"unused".to_vec())));

        let mut body = full_body();
        body["prompt"] = serde_json::json!(42);
        let resp = create_router(Arc::clone(&state))
            .oneshot(run_request(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"].is_string());

        let resp = create_router(state)
            .oneshot(
                Request::post("/ai/run")
                    .body(Body::from(serde_json::to_vec(&full_body()).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn upstream_failure_is_500_with_upstream_text() {
        let (state, _dir) = state_with(Arc::new(FailingBackend::new(503, "model overloaded")));

        let resp = create_router(state)
            .oneshot(run_request(full_body()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        let error = json["error"].as_str().unwrap();
        assert!(error.contains("model overloaded"), "got {}", error);
    }
}
