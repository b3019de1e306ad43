//! The single choke point for backend calls.
//!
//! [`RequestDispatcher`] owns three cross-cutting concerns so individual
//! endpoints do not have to:
//!
//! - injecting `Authorization: Bearer <token>` from the current session
//!   (never on the login endpoint),
//! - clearing the session whenever any endpoint answers 401,
//! - turning every failure into an [`ErrorOutcome`] with a readable message,
//!   logged before it is returned.
//!
//! Classification order for a response:
//!
//! 1. `401` → session invalidated, fails with `"Unauthorized"`.
//! 2. other non-2xx → fails with the body's `error` field, or `"HTTP <status>"`.
//! 3. 2xx → body decoded as JSON.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::error::{ConfigError, ErrorOutcome, Result};
use crate::session::SessionAccess;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Endpoint that must never carry a bearer credential.
pub const LOGIN_ENDPOINT: &str = "/auth/login";

/// Per-call settings.
///
/// Caller headers replace the defaults (`Content-Type: application/json`).
/// `Authorization` is always decided by the dispatcher; a caller-supplied
/// value is discarded.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method, `GET` unless set.
    pub method: Method,
    /// Pre-serialized body.
    pub body: Option<String>,
    /// Extra headers.
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    /// A `GET` with no body.
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    /// A `POST` with no body yet.
    #[must_use]
    pub fn post() -> Self {
        Self::default().with_method(Method::POST)
    }

    /// Set the method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set a pre-serialized body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `payload` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn with_json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self> {
        let body = serde_json::to_string(payload)
            .map_err(|e| ErrorOutcome::invalid_request(format!("failed to encode body: {e}")))?;
        Ok(self.with_body(body))
    }

    /// Add or replace a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Issues backend calls on behalf of every resource facade.
pub struct RequestDispatcher<T = ReqwestTransport> {
    transport: T,
    session: Arc<dyn SessionAccess>,
    api_base: String,
}

impl<T> std::fmt::Debug for RequestDispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl RequestDispatcher<ReqwestTransport> {
    /// Creates a dispatcher over `reqwest` using `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(
        config: &ClientConfig,
        session: Arc<dyn SessionAccess>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout)
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self::new(transport, session, config.api_base()))
    }
}

impl<T: Transport> RequestDispatcher<T> {
    /// Creates a dispatcher sending through `transport` to endpoints under
    /// `api_base`.
    pub fn new(transport: T, session: Arc<dyn SessionAccess>, api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            transport,
            session,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Origin plus API prefix every endpoint is appended to.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Calls `endpoint` and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorOutcome`] for 401 (after clearing the session), any
    /// other non-success status, transport failure, or an undecodable body.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Value> {
        self.request_json(endpoint, options).await
    }

    /// Like [`request`](Self::request), decoding the body into `R`.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn request_json<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<R> {
        let result = self.dispatch(endpoint, options).await;
        if let Err(err) = &result {
            error!(endpoint, kind = %err.kind(), error = %err, "API request failed");
        }
        result
    }

    async fn dispatch<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<R> {
        let request = self.build_request(endpoint, options);
        debug!(method = %request.method, url = %request.url, "dispatching request");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ErrorOutcome::transport(e.to_string()))?;

        self.classify(response)
    }

    /// Resolves the URL and final header set for a call.
    #[must_use]
    pub fn build_request(&self, endpoint: &str, options: RequestOptions) -> HttpRequest {
        let RequestOptions {
            method,
            body,
            headers: extra,
        } = options;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(extra);
        headers.remove(AUTHORIZATION);

        let session = self.session.current();
        if !is_login_endpoint(endpoint) {
            if let Some(token) = session.bearer_token() {
                match bearer(token) {
                    Some(value) => {
                        headers.insert(AUTHORIZATION, value);
                    }
                    None => warn!("session token is not a valid header value, sending without it"),
                }
            }
        }

        HttpRequest {
            method,
            url: self.url_for(endpoint),
            headers,
            body,
        }
    }

    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.api_base)
        } else {
            format!("{}/{endpoint}", self.api_base)
        }
    }

    fn classify<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R> {
        let HttpResponse { status, body } = response;

        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate();
            return Err(ErrorOutcome::unauthorized());
        }

        if !status.is_success() {
            return Err(ErrorOutcome::request_failed(
                status.as_u16(),
                error_message(status, &body),
            ));
        }

        serde_json::from_slice(&body)
            .map_err(|e| ErrorOutcome::malformed(format!("invalid response body: {e}")))
    }
}

/// Returns true if `endpoint` (ignoring query and trailing slash) is the login
/// endpoint.
#[must_use]
pub fn is_login_endpoint(endpoint: &str) -> bool {
    let path = endpoint.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/') == LOGIN_ENDPOINT
}

fn bearer(token: &str) -> Option<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).ok()?;
    value.set_sensitive(true);
    Some(value)
}

/// Message for a failed response: the body's `error` field when it is set,
/// `HTTP <status>` otherwise.
///
/// `null`, `false` and `""` count as unset. Non-string values are rendered
/// as JSON text.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    let from_body = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|mut value| value.get_mut("error").map(Value::take))
        .and_then(|error| match error {
            Value::Null | Value::Bool(false) => None,
            Value::String(message) if message.is_empty() => None,
            Value::String(message) => Some(message),
            other => Some(other.to_string()),
        });

    from_body.unwrap_or_else(|| {
        debug!(status = status.as_u16(), "error body missing or malformed");
        format!("HTTP {}", status.as_u16())
    })
}
