use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use rbac_console_core::{AppError, AppResult};

mod audit;
mod auth;
mod permissions;
mod roles;
mod users;

type QueryList = [(&'static str, String)];

/// Admin API client that forwards every operation to the REST backend.
///
/// Single-item routes answer with the `{ success, data, message }` envelope;
/// listings answer with a page object. The bearer token issued at login is
/// attached to every later request until logout.
#[derive(Clone)]
pub struct HttpAdminApi {
    http_client: reqwest::Client,
    base_url: Url,
    access_token: Arc<RwLock<Option<String>>>,
}

impl HttpAdminApi {
    /// Creates a client rooted at `base_url`, e.g. `http://localhost:3001/api`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
            access_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Replaces the bearer token sent with requests.
    pub async fn set_access_token(&self, access_token: Option<String>) {
        *self.access_token.write().await = access_token;
    }

    /// Returns the bearer token sent with requests.
    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    fn endpoint(&self, segments: &[&str], query: &QueryList) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!(
                    "admin api base url '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(name, value)| (*name, value.as_str())));
        }

        Ok(url)
    }

    async fn dispatch(
        &self,
        method: Method,
        segments: &[&str],
        query: &QueryList,
        body: Option<Value>,
    ) -> AppResult<reqwest::Response> {
        let url = self.endpoint(segments, query)?;
        debug!(method = %method, url = %url, "admin api request");

        let mut builder = self.http_client.request(method, url);
        if let Some(token) = self.access_token.read().await.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder
            .send()
            .await
            .map_err(|error| AppError::Internal(format!("admin api transport error: {error}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());
        Err(status_error(status, &body))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &QueryList,
        body: Option<Value>,
    ) -> AppResult<T> {
        self.dispatch(method, segments, query, body)
            .await?
            .json::<T>()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to decode admin api response: {error}"))
            })
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], query: &QueryList) -> AppResult<T> {
        self.fetch(Method::GET, segments, query, None).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Value,
    ) -> AppResult<T> {
        self.fetch(method, segments, &[], Some(body)).await
    }

    /// Sends a request whose response payload is ignored.
    async fn command(&self, method: Method, segments: &[&str], body: Option<Value>) -> AppResult<()> {
        self.dispatch(method, segments, &[], body).await.map(|_| ())
    }
}

fn json_body<B: Serialize>(input: &B) -> AppResult<Value> {
    serde_json::to_value(input)
        .map_err(|error| AppError::Internal(format!("failed to encode admin api request: {error}")))
}

/// Prefers the `message` field of a JSON error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_owned())
}

fn status_error(status: StatusCode, body: &str) -> AppError {
    let message = error_message(body);
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::Internal(format!("admin api returned {status}: {message}")),
    }
}
