//! REST client for the homework status endpoint.

use crate::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Production endpoint of the homework status API.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Trait for status API clients.
#[async_trait]
pub trait StatusApi: Send + Sync {
    /// Fetch statuses changed since `from_date` (Unix seconds) and return the
    /// decoded JSON body.
    async fn fetch_statuses(&self, from_date: i64) -> ApiResult<Value>;

    /// Endpoint used in log and error messages.
    fn endpoint(&self) -> &str;
}

/// Configuration for the reqwest-backed client.
#[derive(Debug, Clone)]
pub struct PracticumClientConfig {
    /// Endpoint URL.
    pub endpoint: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for PracticumClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Status API client authenticated with a static OAuth token.
pub struct PracticumClient {
    http: Client,
    url: Url,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    /// Create a client for the given endpoint.
    pub fn new(config: PracticumClientConfig, token: impl Into<String>) -> ApiResult<Self> {
        let url = Url::parse(&config.endpoint)?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            url,
            endpoint: config.endpoint,
            token: token.into(),
        })
    }

    /// The reason leaves out the request URL, which carries the cursor, and
    /// keeps the cause chain instead.
    fn request_failed(&self, err: reqwest::Error) -> ApiError {
        ApiError::Request {
            endpoint: self.endpoint.clone(),
            reason: error_chain(&err.without_url()),
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StatusApi for PracticumClient {
    async fn fetch_statuses(&self, from_date: i64) -> ApiResult<Value> {
        debug!(endpoint = %self.endpoint, from_date, "Requesting homework statuses");

        let response = self
            .http
            .get(self.url.clone())
            .query(&[("from_date", from_date)])
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .send()
            .await
            .map_err(|e| self.request_failed(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::UnexpectedStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                debug!("Status API body is not JSON: {}", e);
                ApiError::InvalidJson
            } else {
                self.request_failed(e)
            }
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Mock status API for testing.
///
/// Serves scripted responses in order; once the script runs out every call
/// returns an empty `homeworks` list.
#[derive(Debug, Default)]
pub struct MockStatusApi {
    responses: Mutex<VecDeque<ApiResult<Value>>>,
    requests: Mutex<Vec<i64>>,
}

impl MockStatusApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unanswered call.
    pub fn push_response(&self, response: ApiResult<Value>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    /// Builder form of [`push_response`](Self::push_response).
    pub fn with_response(self, response: ApiResult<Value>) -> Self {
        self.push_response(response);
        self
    }

    /// Cursors passed to `fetch_statuses`, oldest first.
    pub fn requests(&self) -> Vec<i64> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl StatusApi for MockStatusApi {
    async fn fetch_statuses(&self, from_date: i64) -> ApiResult<Value> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(from_date);

        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(serde_json::json!({ "homeworks": [] })))
    }

    fn endpoint(&self) -> &str {
        "mock://homework_statuses"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Query, State};
    use axum::http::HeaderMap;
    use axum::routing::get;
    use axum::Router;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Seen {
        from_date: Arc<Mutex<Option<String>>>,
        authorization: Arc<Mutex<Option<String>>>,
    }

    /// Serve `body` with `status` on a random local port and return the endpoint.
    async fn spawn_stub(status: u16, body: &'static str) -> (String, Seen) {
        let seen = Seen::default();
        let app = Router::new()
            .route(
                "/api/user_api/homework_statuses/",
                get(
                    move |State(seen): State<Seen>,
                          headers: HeaderMap,
                          Query(params): Query<HashMap<String, String>>| async move {
                        *seen.from_date.lock().unwrap() = params.get("from_date").cloned();
                        *seen.authorization.lock().unwrap() = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        (
                            axum::http::StatusCode::from_u16(status).unwrap(),
                            body,
                        )
                    },
                ),
            )
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (
            format!("http://{}/api/user_api/homework_statuses/", addr),
            seen,
        )
    }

    fn client(endpoint: &str) -> PracticumClient {
        let config = PracticumClientConfig {
            endpoint: endpoint.to_string(),
            timeout: Duration::from_secs(5),
        };
        PracticumClient::new(config, "secret-token").unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = PracticumClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = PracticumClientConfig {
            endpoint: "homework statuses".to_string(),
            ..Default::default()
        };
        let err = PracticumClient::new(config, "token").unwrap_err();
        assert!(matches!(err, ApiError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = client(DEFAULT_ENDPOINT);
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-token"));
    }

    #[tokio::test]
    async fn test_fetch_sends_cursor_and_token() {
        let (endpoint, seen) =
            spawn_stub(200, r#"{"homeworks":[{"homework_name":"hw1","status":"approved"}]}"#)
                .await;
        let client = client(&endpoint);

        let body = client.fetch_statuses(1_700_000_000).await.unwrap();
        assert_eq!(body["homeworks"][0]["homework_name"], "hw1");
        assert_eq!(
            seen.from_date.lock().unwrap().as_deref(),
            Some("1700000000")
        );
        assert_eq!(
            seen.authorization.lock().unwrap().as_deref(),
            Some("OAuth secret-token")
        );
    }

    #[tokio::test]
    async fn test_non_200_status() {
        let (endpoint, _) = spawn_stub(503, "Service Unavailable").await;
        let client = client(&endpoint);

        let err = client.fetch_statuses(1).await.unwrap_err();
        match &err {
            ApiError::UnexpectedStatus { endpoint: e, status } => {
                assert_eq!(e, &endpoint);
                assert_eq!(*status, 503);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains(&endpoint));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_other_2xx_is_rejected() {
        let (endpoint, _) = spawn_stub(204, "").await;
        let err = client(&endpoint).fetch_statuses(1).await.unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedStatus { status: 204, .. }));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let (endpoint, _) = spawn_stub(200, "<html>maintenance</html>").await;
        let err = client(&endpoint).fetch_statuses(1).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidJson));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = format!("http://{}/api/user_api/homework_statuses/", addr);
        let err = client(&endpoint).fetch_statuses(1).await.unwrap_err();
        match err {
            ApiError::Request { endpoint: e, .. } => assert_eq!(e, endpoint),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_request_error_text_ignores_cursor() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(&format!("http://{}/api/user_api/homework_statuses/", addr));
        let first = client.fetch_statuses(1_000).await.unwrap_err().to_string();
        let second = client.fetch_statuses(2_000).await.unwrap_err().to_string();

        assert_eq!(first, second);
        assert!(!first.contains("from_date"));
        assert!(first.contains("error sending request: "), "{}", first);
    }

    #[tokio::test]
    async fn test_mock_serves_script_then_empty() {
        let mock = MockStatusApi::new()
            .with_response(Err(ApiError::InvalidJson))
            .with_response(Ok(serde_json::json!({"homeworks": [1]})));

        assert!(mock.fetch_statuses(10).await.is_err());
        assert_eq!(mock.fetch_statuses(20).await.unwrap()["homeworks"][0], 1);
        assert_eq!(
            mock.fetch_statuses(30).await.unwrap(),
            serde_json::json!({"homeworks": []})
        );
        assert_eq!(mock.requests(), vec![10, 20, 30]);
    }
}
