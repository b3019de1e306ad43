//! Login.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::dispatcher::{LOGIN_ENDPOINT, RequestDispatcher, RequestOptions};
use crate::error::Result;
use crate::session::Session;
use crate::transport::Transport;

/// Credentials posted to the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login answer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer credential.
    pub token: String,
    /// Lifetime of `token` in seconds.
    #[serde(default)]
    pub expires_in: i64,
    /// Canonical account name.
    pub username: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("username", &self.username)
            .finish()
    }
}

impl LoginResponse {
    /// Session for this login, expiring `expires_in` seconds after `now`.
    ///
    /// A non-positive lifetime leaves the expiry unknown.
    #[must_use]
    pub fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = (self.expires_in > 0)
            .then(|| now.checked_add_signed(Duration::seconds(self.expires_in)))
            .flatten();
        Session::authenticated(self.token, self.username, expires_at)
    }
}

impl Session {
    /// Builds the session a successful login establishes.
    #[must_use]
    pub fn from_login(response: LoginResponse, now: DateTime<Utc>) -> Self {
        response.into_session(now)
    }
}

/// Authentication endpoints.
#[derive(Debug)]
pub struct Auth<'a, T> {
    dispatcher: &'a RequestDispatcher<T>,
}

impl<'a, T: Transport> Auth<'a, T> {
    /// Creates the facade.
    #[must_use]
    pub const fn new(dispatcher: &'a RequestDispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// Exchanges credentials for a token.
    ///
    /// The session is not modified; storing the result is the caller's call.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the credentials or is
    /// unreachable.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let options = RequestOptions::post().with_json(&body)?;
        self.dispatcher.request_json(LOGIN_ENDPOINT, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::dispatcher;
    use chrono::TimeZone;
    use reqwest::Method;
    use reqwest::header::AUTHORIZATION;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 12, 9, 0, 0)
            .single()
            .expect("valid instant")
    }

    #[tokio::test]
    async fn login_posts_credentials_without_bearer() {
        let (d, _store) = dispatcher(
            200,
            r#"{"token":"jwt","expires_in":86400,"username":"admin"}"#,
        );

        let response = Auth::new(&d).login("admin", "s3cret").await.expect("login");

        assert_eq!(response.token, "jwt");
        assert_eq!(response.expires_in, 86400);

        let sent = d.transport().last();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.url, "http://centro.test/api/v1/auth/login");
        assert!(sent.headers.get(AUTHORIZATION).is_none());
        let body: serde_json::Value =
            serde_json::from_str(sent.body.as_deref().expect("body")).expect("json");
        assert_eq!(body["username"], "admin");
        assert_eq!(body["password"], "s3cret");
    }

    #[tokio::test]
    async fn login_does_not_write_session() {
        let (d, store) = dispatcher(
            200,
            r#"{"token":"fresh","expires_in":60,"username":"admin"}"#,
        );

        Auth::new(&d).login("admin", "pw").await.expect("login");
        assert_eq!(store.read().token.as_deref(), Some("tok"));
    }

    #[test]
    fn session_from_login_sets_expiry() {
        let response = LoginResponse {
            token: "jwt".into(),
            expires_in: 3600,
            username: "admin".into(),
        };

        let session = Session::from_login(response, now());

        assert_eq!(session.token.as_deref(), Some("jwt"));
        assert_eq!(session.username.as_deref(), Some("admin"));
        assert_eq!(session.expires_at, Some(now() + Duration::hours(1)));
    }

    #[test]
    fn zero_lifetime_leaves_expiry_unknown() {
        let response = LoginResponse {
            token: "jwt".into(),
            expires_in: 0,
            username: "admin".into(),
        };
        assert!(response.into_session(now()).expires_at.is_none());
    }

    #[test]
    fn debug_redacts_secrets() {
        let request = LoginRequest {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{request:?}").contains("hunter2"));
    }
}
