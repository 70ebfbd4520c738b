//! Console API client with automatic in-flight request tracking.
//!
//! T020: Create ApiClient for console API calls
//! T021: Wire the request registry into dispatch
//! T022: Map service envelope failures to ApiError

use crate::http::key::request_key;
use crate::http::registry::{CancelHandle, RequestRegistry};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Default request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON client for the console API.
///
/// Every dispatch registers its abort handle under the request's canonical
/// key, superseding any duplicate already in flight, and settles the entry
/// when the request completes through any path.
pub struct ApiClient {
    /// HTTP client
    http: reqwest::Client,
    /// Base URL for the API
    base_url: String,
    /// Shared in-flight request registry
    registry: Arc<RequestRegistry>,
    /// Session bearer token
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Create a client with its own registry.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_registry(base_url, Arc::new(RequestRegistry::new()))
    }

    /// Create a client sharing an existing registry.
    pub fn with_registry(base_url: impl Into<String>, registry: Arc<RequestRegistry>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            registry,
            token: RwLock::new(None),
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The shared request registry.
    pub fn registry(&self) -> Arc<RequestRegistry> {
        Arc::clone(&self.registry)
    }

    /// Install the session bearer token.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap() = Some(token.into());
    }

    /// Drop the session bearer token.
    pub fn clear_token(&self) {
        *self.token.write().unwrap() = None;
    }

    /// GET a resource, with `params` sent as the query string.
    pub async fn get<R>(&self, path: &str, params: Option<Value>) -> Result<R, ApiError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        self.dispatch(Method::GET, path, params).await
    }

    /// POST a JSON body.
    pub async fn post<R>(&self, path: &str, body: Value) -> Result<R, ApiError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        self.dispatch(Method::POST, path, Some(body)).await
    }

    /// PUT a JSON body.
    pub async fn put<R>(&self, path: &str, body: Value) -> Result<R, ApiError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        self.dispatch(Method::PUT, path, Some(body)).await
    }

    /// DELETE a resource, with `params` sent as the query string.
    pub async fn delete<R>(&self, path: &str, params: Option<Value>) -> Result<R, ApiError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        self.dispatch(Method::DELETE, path, params).await
    }

    /// Cancel the in-flight request matching (method, path, params), if any.
    pub fn cancel(&self, method: Method, path: &str, params: Option<&Value>) {
        let url = format!("{}{}", self.base_url, path);
        self.registry.cancel(method.as_str(), &url, params);
    }

    /// Cancel every request dispatched through this client's registry.
    pub fn cancel_all(&self) {
        self.registry.cancel_all();
    }

    /// Dispatch a request through the registry.
    async fn dispatch<R>(
        &self,
        method: Method,
        path: &str,
        params: Option<Value>,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        let url = format!("{}{}", self.base_url, path);
        let key = request_key(method.as_str(), &url, params.as_ref());

        let mut builder = self.http.request(method.clone(), &url);
        if let Some(token) = self.token.read().unwrap().as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(params) = &params {
            builder = if method == Method::GET || method == Method::DELETE {
                builder.query(params)
            } else {
                builder.json(params)
            };
        }

        let task = tokio::spawn(execute::<R>(builder));
        let entry = self
            .registry
            .add(key.clone(), CancelHandle::from_abort_handle(task.abort_handle()));

        match task.await {
            Ok(outcome) => {
                self.registry.settle(&key, entry);
                outcome
            }
            // Cancellation paths already removed the entry.
            Err(join_error) if join_error.is_cancelled() => Err(ApiError::Cancelled),
            Err(join_error) => {
                self.registry.settle(&key, entry);
                Err(ApiError::Transport(join_error.to_string()))
            }
        }
    }
}

/// Send the request and decode the service envelope.
async fn execute<R: DeserializeOwned>(builder: reqwest::RequestBuilder) -> Result<R, ApiError> {
    let response = builder
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            code: status.as_u16(),
            message: status.canonical_reason().unwrap_or("unknown").to_string(),
        });
    }

    let envelope: ApiEnvelope<R> = response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    if envelope.success {
        envelope
            .data
            .ok_or_else(|| ApiError::Envelope("API returned success but no data".to_string()))
    } else {
        let error = envelope.error.unwrap_or_default();
        Err(ApiError::Envelope(error.message))
    }
}

/// Service response envelope.
#[derive(Debug, serde::Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<EnvelopeError>,
}

/// Service error details.
#[derive(Debug, Default, serde::Deserialize)]
struct EnvelopeError {
    #[serde(default)]
    #[allow(dead_code)]
    code: String,
    #[serde(default)]
    message: String,
}

/// API client errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Service error: {0}")]
    Envelope(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Request cancelled")]
    Cancelled,
}
