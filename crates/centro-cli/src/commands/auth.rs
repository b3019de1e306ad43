//! Session commands: login, logout and whoami.

use std::io::Write;

use centro_client::{PanelClient, Transport};
use centro_time::format_absolute;
use chrono::Utc;
use tracing::debug;

use crate::error::CliError;
use crate::output::{Message, OutputFormat, SessionInfo};

/// Session command executor.
pub struct AuthCommand<'a, T> {
    client: &'a PanelClient<T>,
}

impl<'a, T: Transport> AuthCommand<'a, T> {
    /// Create a new auth command.
    #[must_use]
    pub const fn new(client: &'a PanelClient<T>) -> Self {
        Self { client }
    }

    /// Log in and persist the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the backend is
    /// unreachable.
    pub async fn login<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        username: &str,
        password: &str,
    ) -> Result<(), CliError> {
        if username.trim().is_empty() {
            return Err(CliError::InvalidArgument("username cannot be empty".into()));
        }

        let session = self.client.login(username, password).await?;

        if format.is_json() {
            format.write(writer, &SessionInfo::new(&session, Utc::now()))?;
        } else {
            let name = session.username.as_deref().unwrap_or(username);
            let expires = session.expires_at.map(|at| at.to_rfc3339());
            let msg = Message::success(format!(
                "Logged in as {name} (expires {})",
                format_absolute(expires.as_deref())
            ));
            format.write(writer, &msg)?;
        }
        Ok(())
    }

    /// Forget the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the output fails.
    pub fn logout<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let was_logged_in = self.client.session().read().is_authenticated();
        self.client.logout();
        debug!(was_logged_in, "session cleared");

        let msg = if was_logged_in {
            Message::success("Logged out")
        } else {
            Message::info("Not logged in")
        };
        format.write(writer, &msg)
    }

    /// Show the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the output fails.
    pub fn whoami<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let info = SessionInfo::new(&self.client.session().read(), Utc::now());
        format.write(writer, &info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use crate::commands::testing::client;
    use centro_client::{MemoryStorage, Session};
    use std::sync::Arc;

    #[tokio::test]
    async fn login_stores_session() {
        let storage = Arc::new(MemoryStorage::new());
        let client = client(
            &[(200, r#"{"token":"jwt","expires_in":86400,"username":"admin"}"#)],
            Arc::clone(&storage),
        );
        let mut out = Vec::new();

        AuthCommand::new(&client)
            .login(&mut out, &OutputFormat::default(), "admin", "pw")
            .await
            .expect("login");

        let out = String::from_utf8(out).expect("utf-8");
        assert!(out.starts_with("✓ Logged in as admin (expires "));
        assert!(storage.record().expect("persisted").contains("jwt"));
    }

    #[tokio::test]
    async fn login_rejected_surfaces_backend_message() {
        let client = client(
            &[(401, r#"{"error":"Invalid credentials"}"#)],
            Arc::new(MemoryStorage::new()),
        );
        let mut out = Vec::new();

        let err = AuthCommand::new(&client)
            .login(&mut out, &OutputFormat::default(), "admin", "bad")
            .await
            .expect_err("rejected");

        assert!(err.is_unauthorized());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn login_requires_username() {
        let client = client(&[], Arc::new(MemoryStorage::new()));
        let mut out = Vec::new();

        let err = AuthCommand::new(&client)
            .login(&mut out, &OutputFormat::default(), " ", "pw")
            .await
            .expect_err("empty username");

        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert!(client.dispatcher().transport().sent().is_empty());
    }

    #[test]
    fn logout_clears_storage() {
        let storage = Arc::new(MemoryStorage::with_record(r#"{"token":"t","username":"admin"}"#));
        let client = client(&[], Arc::clone(&storage));
        let mut out = Vec::new();

        AuthCommand::new(&client)
            .logout(&mut out, &OutputFormat::default())
            .expect("logout");

        assert_eq!(String::from_utf8(out).expect("utf-8"), "✓ Logged out\n");
        assert!(storage.record().is_none());
    }

    #[test]
    fn logout_when_logged_out() {
        let client = client(&[], Arc::new(MemoryStorage::new()));
        let mut out = Vec::new();

        AuthCommand::new(&client)
            .logout(&mut out, &OutputFormat::default())
            .expect("logout");

        assert_eq!(String::from_utf8(out).expect("utf-8"), "Not logged in\n");
    }

    #[test]
    fn whoami_json() {
        let client = client(&[], Arc::new(MemoryStorage::new()));
        client
            .session()
            .write(Session::authenticated("t", "ops", None));
        let mut out = Vec::new();

        AuthCommand::new(&client)
            .whoami(&mut out, &OutputFormat::new(Format::Json))
            .expect("whoami");

        let parsed: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(parsed["username"], "ops");
        assert_eq!(parsed["authenticated"], true);
        assert_eq!(parsed["expired"], false);
    }
}
