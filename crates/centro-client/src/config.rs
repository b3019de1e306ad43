//! Client configuration.
//!
//! Settings come from defaults, the environment (`CENTRO_URL`,
//! `CENTRO_TIMEOUT_SECS`, `CENTRO_SESSION_FILE`) and builder overrides, in
//! that order.

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;
use crate::storage::FileStorage;

/// Default backend origin.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Path prefix every API endpoint lives under.
pub const DEFAULT_BASE_PATH: &str = "/api/v1";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the backend origin.
pub const ENV_URL: &str = "CENTRO_URL";

/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "CENTRO_TIMEOUT_SECS";

/// Environment variable holding the session file location.
pub const ENV_SESSION_FILE: &str = "CENTRO_SESSION_FILE";

/// Configuration for [`PanelClient`](crate::PanelClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin, e.g. `https://centro.example.com`.
    pub base_url: String,
    /// API prefix appended to `base_url`.
    pub base_path: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Where the session record is persisted.
    pub session_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            session_path: FileStorage::default_path(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration pointing at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Builds a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an invalid value.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            config.timeout = parse_timeout_secs(&raw)?;
        }
        if let Some(path) = lookup(ENV_SESSION_FILE).filter(|v| !v.trim().is_empty()) {
            config.session_path = Some(PathBuf::from(path));
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the API prefix.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the session file location.
    #[must_use]
    pub fn with_session_path(mut self, path: impl AsRef<Path>) -> Self {
        self.session_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL, base path or timeout is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason: reason.to_string(),
        };

        if self.base_url.trim().is_empty() {
            return Err(invalid("must not be empty"));
        }

        let url = Url::parse(&self.base_url).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not carry a query or fragment"));
        }

        if !self.base_path.starts_with('/') {
            return Err(ConfigError::InvalidBasePath(self.base_path.clone()));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Origin plus prefix, without a trailing slash: `http://host:8080/api/v1`.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.base_path.trim_end_matches('/')
        )
    }

    /// File storage at the configured session location.
    ///
    /// # Errors
    ///
    /// Returns an error if no location is configured or it is a directory.
    pub fn session_storage(&self) -> Result<FileStorage, ConfigError> {
        let path = self.session_path.as_ref().ok_or(ConfigError::NoSessionPath)?;
        if path.is_dir() {
            return Err(ConfigError::SessionPath {
                path: path.clone(),
                reason: "is a directory".to_string(),
            });
        }
        Ok(FileStorage::new(path))
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| {
            ConfigError::InvalidTimeout(format!("'{raw}' is not a whole number of seconds"))
        })?;
    if secs == 0 {
        return Err(ConfigError::InvalidTimeout(
            "timeout must be greater than 0".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}
