//! HTTP API
//!
//! - `GET /api/messages`: full thread, oldest first
//! - `POST /api/messages`: create a message from `{"content": "..."}`
//! - `GET /api/online-count`: number of sessions seen within the online window
//!
//! Every endpoint treats the `x-session-id` header as a presence touch.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde_json::Value;

use super::error::ApiError;
use crate::common::{Message, NewMessage, OnlineCount};
use crate::storage::ChatStorage;

/// Header carrying the self-asserted session id used for presence.
pub const SESSION_HEADER: &str = "x-session-id";

/// Default max request body size (64KB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct ApiState {
    storage: Arc<dyn ChatStorage>,
}

impl ApiState {
    pub fn new(storage: Arc<dyn ChatStorage>) -> Self {
        Self { storage }
    }
}

pub fn create_router(storage: Arc<dyn ChatStorage>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/messages", get(list_messages).post(create_message))
        .route("/api/online-count", get(online_count))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(ApiState::new(storage))
}

/// Extract a usable session id from the request headers, if any.
pub fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

fn touch_session(state: &ApiState, headers: &HeaderMap) {
    let Some(id) = session_id(headers) else {
        return;
    };
    // Presence is best effort; a failed touch never fails the request.
    if let Err(err) = state.storage.add_online_user(id) {
        log::warn!("Failed to mark session online: {err}");
    }
}

async fn list_messages(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Message>>, ApiError> {
    touch_session(&state, &headers);
    let messages = state
        .storage
        .get_all_messages()
        .map_err(ApiError::FetchMessages)?;
    Ok(Json(messages))
}

async fn online_count(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<OnlineCount>, ApiError> {
    touch_session(&state, &headers);
    let count = state
        .storage
        .online_user_count()
        .map_err(ApiError::OnlineCount)?;
    Ok(Json(OnlineCount { count }))
}

async fn create_message(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    touch_session(&state, &headers);
    let Json(body) = body.map_err(|rejection| ApiError::UnreadableBody(rejection.body_text()))?;
    let new_message = NewMessage::from_value(&body)?;
    let message = state
        .storage
        .create_message(&new_message)
        .map_err(ApiError::CreateMessage)?;
    log::debug!("Created message {}", message.id);
    Ok((StatusCode::CREATED, Json(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorBody;
    use crate::storage::{MemStorage, StorageError};
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn test_router() -> (Router, Arc<MemStorage>) {
        let storage = Arc::new(MemStorage::default());
        let router = create_router(storage.clone(), DEFAULT_MAX_BODY_BYTES);
        (router, storage)
    }

    fn get_request(uri: &str, session: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(session) = session {
            builder = builder.header(SESSION_HEADER, session);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_message(body: &str, session: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header("content-type", "application/json");
        if let Some(session) = session {
            builder = builder.header(SESSION_HEADER, session);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    /// Storage whose every call fails, to exercise the 500 paths.
    struct BrokenStorage;

    impl ChatStorage for BrokenStorage {
        fn get_all_messages(&self) -> Result<Vec<Message>, StorageError> {
            Err(StorageError::Unavailable("messages"))
        }
        fn create_message(&self, _: &NewMessage) -> Result<Message, StorageError> {
            Err(StorageError::Unavailable("messages"))
        }
        fn add_online_user(&self, _: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("presence"))
        }
        fn remove_online_user(&self, _: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("presence"))
        }
        fn online_user_count(&self) -> Result<usize, StorageError> {
            Err(StorageError::Unavailable("presence"))
        }
        fn sweep_expired(&self) -> Result<usize, StorageError> {
            Err(StorageError::Unavailable("presence"))
        }
    }

    #[tokio::test]
    async fn test_list_messages_empty() {
        let (router, _) = test_router();
        let response = router
            .oneshot(get_request("/api/messages", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let messages: Vec<Message> = read_json(response).await;
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_create_message_then_list() {
        let (router, _) = test_router();

        let response = router
            .clone()
            .oneshot(post_message(r#"{"content":"hello"}"#, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Message = read_json(response).await;
        assert_eq!(created.content, "hello");
        assert!(!created.id.is_empty());

        let response = router
            .oneshot(get_request("/api/messages", None))
            .await
            .unwrap();
        let messages: Vec<Message> = read_json(response).await;
        assert_eq!(messages, vec![created]);
    }

    #[tokio::test]
    async fn test_create_message_missing_content() {
        let (router, storage) = test_router();
        let response = router.oneshot(post_message("{}", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = read_json(response).await;
        assert_eq!(body.error, "Invalid message data");
        assert!(storage.messages().is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_create_message_rejects_bad_shapes() {
        let (router, storage) = test_router();
        for body in [
            r#"{"content":""}"#,
            r#"{"content":"   "}"#,
            r#"{"content":7}"#,
            r#"{"text":"hello"}"#,
            r#"["hello"]"#,
            "hello",
            "",
        ] {
            let response = router.clone().oneshot(post_message(body, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body:?}");
            let error: ErrorBody = read_json(response).await;
            assert_eq!(error.error, "Invalid message data");
        }
        assert!(storage.messages().is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_create_message_requires_json_content_type() {
        let (router, storage) = test_router();

        for content_type in [None, Some("text/plain"), Some("application/x-www-form-urlencoded")] {
            let mut builder = Request::builder().method("POST").uri("/api/messages");
            if let Some(content_type) = content_type {
                builder = builder.header("content-type", content_type);
            }
            let request = builder
                .body(Body::from(r#"{"content":"hi"}"#))
                .unwrap();

            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "content-type: {content_type:?}"
            );
            let error: ErrorBody = read_json(response).await;
            assert_eq!(error.error, "Invalid message data");
        }
        assert!(storage.messages().is_empty().unwrap());

        let request = Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header("content-type", "application/json; charset=utf-8")
            .body(Body::from(r#"{"content":"hi"}"#))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_create_message_body_too_large() {
        let storage = Arc::new(MemStorage::default());
        let router = create_router(storage.clone(), 32);
        let oversized = format!(r#"{{"content":"{}"}}"#, "x".repeat(64));

        let response = router.oneshot(post_message(&oversized, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(storage.messages().is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_online_count_with_two_sessions() {
        let (router, _) = test_router();
        for session in ["A", "B", "A"] {
            let response = router
                .clone()
                .oneshot(get_request("/api/messages", Some(session)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = router
            .oneshot(get_request("/api/online-count", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let count: OnlineCount = read_json(response).await;
        assert_eq!(count.count, 2);
    }

    #[tokio::test]
    async fn test_every_endpoint_touches_presence() {
        let (router, storage) = test_router();

        router
            .clone()
            .oneshot(get_request("/api/online-count", Some("counter")))
            .await
            .unwrap();
        router
            .clone()
            .oneshot(post_message(r#"{"content":"hi"}"#, Some("poster")))
            .await
            .unwrap();
        // A rejected post still counts as activity.
        router
            .clone()
            .oneshot(post_message("{}", Some("bad-poster")))
            .await
            .unwrap();

        assert_eq!(storage.presence().online_user_count().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_blank_session_header_is_ignored() {
        let (router, storage) = test_router();
        router
            .oneshot(get_request("/api/messages", Some("   ")))
            .await
            .unwrap();
        assert_eq!(storage.presence().online_user_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_storage_failures_return_generic_errors() {
        let router = create_router(Arc::new(BrokenStorage), DEFAULT_MAX_BODY_BYTES);

        let cases = [
            (get_request("/api/messages", Some("s")), "Failed to fetch messages"),
            (
                get_request("/api/online-count", Some("s")),
                "Failed to get online count",
            ),
            (
                post_message(r#"{"content":"hello"}"#, Some("s")),
                "Failed to create message",
            ),
        ];

        for (request, expected) in cases {
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: ErrorBody = read_json(response).await;
            assert_eq!(body.error, expected);
        }
    }

    #[tokio::test]
    async fn test_validation_wins_over_broken_storage() {
        let router = create_router(Arc::new(BrokenStorage), DEFAULT_MAX_BODY_BYTES);
        let response = router.oneshot(post_message("{}", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_session_id_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id(&headers), None);

        headers.insert(SESSION_HEADER, " abc ".parse().unwrap());
        assert_eq!(session_id(&headers), Some("abc"));

        headers.insert(SESSION_HEADER, "".parse().unwrap());
        assert_eq!(session_id(&headers), None);
    }
}
