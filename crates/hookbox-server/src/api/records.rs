// ABOUTME: Handlers for the /webhook resource: append, list, and delete records.
// ABOUTME: Runs blocking store calls off the async runtime and maps outcomes to plain-text responses.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hookbox_core::{DeleteOutcome, Record};
use hookbox_store::{RecordStore, StoreError};

use crate::app_state::SharedState;

pub const SAVED: &str = "Data saved successfully";
pub const NO_DATA: &str = "No data available";
pub const STORAGE_FAILURE: &str = "Failed to access stored data";

/// Run a store operation on the blocking pool and translate store errors
/// into the fixed plain-text responses.
async fn with_store<T, F>(state: &SharedState, op: F) -> Result<T, Response>
where
    F: FnOnce(&RecordStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    match tokio::task::spawn_blocking(move || op(store.as_ref())).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(StoreError::NoData)) => Err((StatusCode::NOT_FOUND, NO_DATA).into_response()),
        Ok(Err(e)) => {
            tracing::error!("record store failure: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, STORAGE_FAILURE).into_response())
        }
        Err(e) => {
            tracing::error!("record store task failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, STORAGE_FAILURE).into_response())
        }
    }
}

/// POST /webhook - Append the raw request body as one record.
pub async fn append_record(State(state): State<SharedState>, body: Bytes) -> Response {
    let record = Record::from_bytes(body.to_vec());
    if record.is_binary() {
        tracing::warn!("payload is not valid UTF-8, storing raw bytes");
    }

    match with_store(&state, move |store| store.append(record)).await {
        Ok(count) => {
            tracing::debug!("appended record, collection now has {} records", count);
            (StatusCode::OK, SAVED).into_response()
        }
        Err(resp) => resp,
    }
}

/// GET /webhook - Return every record joined by newlines.
pub async fn list_records(State(state): State<SharedState>) -> Response {
    match with_store(&state, |store| store.list()).await {
        Ok(rendered) => (StatusCode::OK, rendered).into_response(),
        Err(resp) => resp,
    }
}

/// DELETE /webhook - Remove every record equal to the body, or clear all
/// records when the body is blank.
pub async fn delete_records(State(state): State<SharedState>, body: Bytes) -> Response {
    let target = String::from_utf8_lossy(&body).into_owned();

    match with_store(&state, move |store| store.delete(&target)).await {
        Ok(DeleteOutcome::NotFound) => {
            (StatusCode::NOT_FOUND, DeleteOutcome::NotFound.to_string()).into_response()
        }
        Ok(outcome) => (StatusCode::OK, outcome.to_string()).into_response(),
        Err(resp) => resp,
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::create_router;
    use crate::test_support::{body_text, test_state};
    use axum::body::Body;
    use axum::http::StatusCode;
    use http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn send(
        state: &crate::app_state::SharedState,
        method: &str,
        body: impl Into<Body>,
    ) -> (StatusCode, String) {
        let app = create_router(Arc::clone(state));
        let resp = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/webhook")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        (status, body_text(resp).await)
    }

    #[tokio::test]
    async fn list_without_data_is_404() {
        let (state, _dir) = test_state();

        let (status, body) = send(&state, "GET", Body::empty()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "No data available");
    }

    #[tokio::test]
    async fn delete_without_data_is_404() {
        let (state, _dir) = test_state();

        let (status, body) = send(&state, "DELETE", "anything").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "No data available");
    }

    #[tokio::test]
    async fn append_then_list_in_order() {
        let (state, _dir) = test_state();

        for value in ["v1", "v2", "v3"] {
            let (status, body) = send(&state, "POST", value).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "Data saved successfully");
        }

        let (status, body) = send(&state, "GET", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "v1\nv2\nv3");
    }

    #[tokio::test]
    async fn list_response_is_plain_text() {
        let (state, _dir) = test_state();
        send(&state, "POST", "x").await;

        let app = create_router(Arc::clone(&state));
        let resp = app
            .oneshot(Request::get("/webhook").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("text/plain"), "got {}", content_type);
    }

    #[tokio::test]
    async fn delete_exact_match_then_not_found() {
        let (state, _dir) = test_state();
        for value in ["a", "b", "a", "c"] {
            send(&state, "POST", value).await;
        }

        let (status, body) = send(&state, "DELETE", "a").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Deleted occurrences of 'a'");

        let (_, listed) = send(&state, "GET", Body::empty()).await;
        assert_eq!(listed, "b\nc");

        let (status, body) = send(&state, "DELETE", "a").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Text not found");
    }

    #[tokio::test]
    async fn blank_delete_clears_everything() {
        let (state, _dir) = test_state();
        send(&state, "POST", "keep?").await;
        send(&state, "POST", "no").await;

        let (status, body) = send(&state, "DELETE", "   ").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "All data cleared");

        // Empty collection, not "no data"
        let (status, body) = send(&state, "GET", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "");
    }

    #[tokio::test]
    async fn invalid_utf8_body_is_accepted() {
        let (state, _dir) = test_state();

        let (status, _) = send(&state, "POST", vec![0x68u8, 0x69, 0xff]).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&state, "GET", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "hi\u{FFFD}");
    }

    #[tokio::test]
    async fn invalid_utf8_delete_target_matches_lossily() {
        let (state, _dir) = test_state();
        send(&state, "POST", vec![0x68u8, 0x69, 0xff]).await;

        let (status, body) = send(&state, "DELETE", vec![0x68u8, 0x69, 0xff]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Deleted occurrences of 'hi\u{FFFD}'");

        let (status, body) = send(&state, "GET", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "");
    }

    #[tokio::test]
    async fn concurrent_posts_are_all_kept() {
        let (state, _dir) = test_state();

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let state = Arc::clone(&state);
                tokio::spawn(async move { send(&state, "POST", format!("item-{}", i)).await })
            })
            .collect();
        for task in tasks {
            let (status, _) = task.await.unwrap();
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = send(&state, "GET", Body::empty()).await;
        let mut lines: Vec<&str> = body.split('\n').collect();
        lines.sort();
        lines.dedup();
        assert_eq!(lines.len(), 32);
    }

    #[tokio::test]
    async fn corrupt_file_is_500_with_short_message() {
        let (state, _dir) = test_state();
        std::fs::write(state.store.path(), "garbage").unwrap();

        let (status, body) = send(&state, "GET", Body::empty()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Failed to access stored data");
    }
}
