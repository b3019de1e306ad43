//! One-stop client wiring the session store, dispatcher and facades.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::api::{Auth, Instances, Jobs, Nodes, Stats};
use crate::config::ClientConfig;
use crate::dispatcher::RequestDispatcher;
use crate::error::{ConfigError, Result};
use crate::session::{Session, SessionAccess, SessionStore};
use crate::storage::SessionStorage;
use crate::transport::{ReqwestTransport, Transport};

/// Client for the Centro REST API.
#[derive(Debug)]
pub struct PanelClient<T = ReqwestTransport> {
    session: Arc<SessionStore>,
    dispatcher: RequestDispatcher<T>,
}

impl PanelClient<ReqwestTransport> {
    /// Creates a client from `config`, restoring the session persisted at its
    /// session path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, no session location
    /// is known, or the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let storage = config.session_storage()?;
        let session = Arc::new(SessionStore::initialize(storage));
        let access: Arc<dyn SessionAccess> = session.clone();
        let dispatcher = RequestDispatcher::from_config(config, access)?;
        Ok(Self {
            session,
            dispatcher,
        })
    }
}

impl<T: Transport> PanelClient<T> {
    /// Creates a client over an arbitrary transport and session storage.
    pub fn with_transport(
        transport: T,
        storage: impl SessionStorage + 'static,
        api_base: impl Into<String>,
    ) -> Self {
        let session = Arc::new(SessionStore::initialize(storage));
        let access: Arc<dyn SessionAccess> = session.clone();
        Self {
            dispatcher: RequestDispatcher::new(transport, access, api_base),
            session,
        }
    }

    /// The session store.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// The dispatcher, for endpoints without a facade.
    #[must_use]
    pub const fn dispatcher(&self) -> &RequestDispatcher<T> {
        &self.dispatcher
    }

    /// Authentication endpoints.
    #[must_use]
    pub const fn auth(&self) -> Auth<'_, T> {
        Auth::new(&self.dispatcher)
    }

    /// Job endpoints.
    #[must_use]
    pub const fn jobs(&self) -> Jobs<'_, T> {
        Jobs::new(&self.dispatcher)
    }

    /// Instance endpoints.
    #[must_use]
    pub const fn instances(&self) -> Instances<'_, T> {
        Instances::new(&self.dispatcher)
    }

    /// Node endpoints.
    #[must_use]
    pub const fn nodes(&self) -> Nodes<'_, T> {
        Nodes::new(&self.dispatcher)
    }

    /// Statistics endpoint.
    #[must_use]
    pub const fn stats(&self) -> Stats<'_, T> {
        Stats::new(&self.dispatcher)
    }

    /// Logs in and stores the resulting session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the credentials or is
    /// unreachable; the stored session is left untouched in that case.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let response = self.auth().login(username, password).await?;
        let session = Session::from_login(response, Utc::now());
        info!(username = session.username.as_deref().unwrap_or(""), "logged in");
        self.session.write(session.clone());
        Ok(session)
    }

    /// Clears the stored session.
    pub fn logout(&self) {
        self.session.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, TransportError};
    use crate::storage::MemoryStorage;
    use crate::transport::{HttpRequest, HttpResponse};
    use parking_lot::Mutex;
    use reqwest::StatusCode;
    use reqwest::header::AUTHORIZATION;
    use std::collections::VecDeque;

    /// Replays scripted responses in order.
    #[derive(Default)]
    struct Script {
        replies: Mutex<VecDeque<(u16, &'static str)>>,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl Script {
        fn new(replies: &[(u16, &'static str)]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().copied().collect()),
                sent: Mutex::default(),
            }
        }
    }

    impl Transport for Script {
        async fn send(
            &self,
            request: HttpRequest,
        ) -> std::result::Result<HttpResponse, TransportError> {
            self.sent.lock().push(request);
            let (status, body) = self
                .replies
                .lock()
                .pop_front()
                .ok_or_else(|| TransportError::new("script exhausted"))?;
            let status =
                StatusCode::from_u16(status).map_err(|e| TransportError::new(e.to_string()))?;
            Ok(HttpResponse::new(status, body))
        }
    }

    #[tokio::test]
    async fn login_stores_session_and_later_calls_carry_it() {
        let storage = Arc::new(MemoryStorage::new());
        let client = PanelClient::with_transport(
            Script::new(&[
                (200, r#"{"token":"jwt-1","expires_in":86400,"username":"admin"}"#),
                (200, r#"{"total_jobs":0}"#),
            ]),
            Arc::clone(&storage),
            "http://centro.test/api/v1",
        );

        let session = client.login("admin", "pw").await.expect("login");
        assert_eq!(session.token.as_deref(), Some("jwt-1"));
        assert!(session.expires_at.is_some());
        assert!(storage.record().is_some());

        client.stats().get().await.expect("stats");

        let sent = client.dispatcher().transport().sent.lock();
        assert!(sent[0].headers.get(AUTHORIZATION).is_none());
        assert_eq!(sent[1].headers[AUTHORIZATION], "Bearer jwt-1");
    }

    #[tokio::test]
    async fn rejected_login_resets_session() {
        let client = PanelClient::with_transport(
            Script::new(&[(401, r#"{"error":"Invalid credentials"}"#)]),
            MemoryStorage::with_record(r#"{"token":"old","username":"admin"}"#),
            "http://centro.test/api/v1",
        );

        let err = client.login("admin", "wrong").await.expect_err("rejected");

        // A 401 from any endpoint, login included, resets the session.
        assert_eq!(err.kind(), ErrorKind::AuthenticationExpired);
        assert!(!client.session().read().is_authenticated());
    }

    #[tokio::test]
    async fn rejected_login_without_session_stays_logged_out() {
        let client = PanelClient::with_transport(
            Script::new(&[(400, r#"{"error":"Invalid request body"}"#)]),
            MemoryStorage::new(),
            "http://centro.test/api/v1",
        );

        let err = client.login("", "").await.expect_err("rejected");

        assert_eq!(err.message(), "Invalid request body");
        assert!(!client.session().read().is_authenticated());
    }

    #[test]
    fn logout_clears_persisted_record() {
        let storage = Arc::new(MemoryStorage::with_record(r#"{"token":"abc"}"#));
        let client =
            PanelClient::with_transport(Script::default(), Arc::clone(&storage), "http://x/api/v1");
        assert!(client.session().read().is_authenticated());

        client.logout();

        assert!(storage.record().is_none());
    }

    #[test]
    fn from_config_restores_file_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("auth.json");
        std::fs::write(&path, r#"{"token":"abc","username":"ops","expiresAt":null}"#)
            .expect("seed");

        let config = ClientConfig::new("http://127.0.0.1:8080").with_session_path(&path);
        let client = PanelClient::from_config(&config).expect("client");

        assert_eq!(client.session().read().username.as_deref(), Some("ops"));
        assert_eq!(client.dispatcher().api_base(), "http://127.0.0.1:8080/api/v1");
    }

    #[test]
    fn from_config_rejects_bad_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ClientConfig::new("not a url").with_session_path(dir.path().join("a.json"));
        assert!(matches!(
            PanelClient::from_config(&config),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
