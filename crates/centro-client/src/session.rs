//! The authenticated session and its process-wide store.
//!
//! [`SessionStore`] owns the one canonical [`Session`]. Every write is
//! persisted to [`SessionStorage`] before observers are told about it, and a
//! new observer is handed the current session as soon as it subscribes.
//!
//! ```rust
//! use centro_client::session::{Session, SessionStore};
//! use centro_client::storage::MemoryStorage;
//!
//! let store = SessionStore::initialize(MemoryStorage::new());
//! assert!(!store.read().is_authenticated());
//!
//! store.write(Session::authenticated("tok", "admin", None));
//! assert_eq!(store.read().token.as_deref(), Some("tok"));
//!
//! store.logout();
//! assert_eq!(store.read(), Session::default());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::storage::SessionStorage;

/// The client's record of the current authenticated identity.
///
/// A non-empty `token` is what "logged in" means; the empty session is the
/// logged-out state. An empty token read from storage is treated as absent.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer credential presented to the backend.
    #[serde(default, deserialize_with = "non_empty")]
    pub token: Option<String>,
    /// Name the user logged in with.
    #[serde(default)]
    pub username: Option<String>,
    /// When the backend said the token expires. Informational only.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a logged-in session.
    #[must_use]
    pub fn authenticated(
        token: impl Into<String>,
        username: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            token: Some(token.into()),
            username: Some(username.into()),
            expires_at,
        }
    }

    /// Returns true if a non-empty token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }

    /// The token to present to the backend, if there is a usable one.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }

    /// Returns true if `expires_at` is known and not after `now`.
    ///
    /// Requests never consult this; the backend decides validity.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let token = Option::<String>::deserialize(deserializer)?;
    Ok(token.filter(|token| !token.is_empty()))
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("username", &self.username)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Read access to the current session plus the ability to clear it.
///
/// The dispatcher depends on this rather than on [`SessionStore`] directly.
pub trait SessionAccess: Send + Sync {
    /// Snapshot of the current session.
    fn current(&self) -> Session;

    /// Clears the session after the backend rejected its credential.
    fn invalidate(&self);
}

type Observer = Arc<dyn Fn(&Session) + Send + Sync>;
type ObserverMap = Mutex<BTreeMap<u64, Observer>>;

/// Process-wide holder of the current [`Session`].
pub struct SessionStore {
    current: RwLock<Session>,
    storage: Box<dyn SessionStorage>,
    observers: Arc<ObserverMap>,
    next_observer_id: AtomicU64,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &*self.current.read())
            .field("observers", &self.observers.lock().len())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates the store, rehydrating any session persisted in `storage`.
    ///
    /// A missing, unreadable or unparsable record starts from the empty session.
    pub fn initialize(storage: impl SessionStorage + 'static) -> Self {
        let current = match storage.load() {
            Ok(Some(record)) => match serde_json::from_str::<Session>(&record) {
                Ok(session) => {
                    debug!(
                        username = session.username.as_deref().unwrap_or(""),
                        authenticated = session.is_authenticated(),
                        "session restored"
                    );
                    session
                }
                Err(e) => {
                    warn!(error = %e, "discarding unparsable session record");
                    Session::default()
                }
            },
            Ok(None) => Session::default(),
            Err(e) => {
                warn!(error = %e, "failed to read session record");
                Session::default()
            }
        };

        Self {
            current: RwLock::new(current),
            storage: Box::new(storage),
            observers: Arc::new(Mutex::new(BTreeMap::new())),
            next_observer_id: AtomicU64::new(0),
        }
    }

    /// Returns a snapshot of the current session.
    #[must_use]
    pub fn read(&self) -> Session {
        self.current.read().clone()
    }

    /// Replaces the session, persists it, then notifies every observer.
    ///
    /// A session with a token is saved; one without removes the stored record.
    /// Persistence failures are logged and do not stop the update.
    pub fn write(&self, session: Session) {
        *self.current.write() = session.clone();
        self.persist(&session);
        self.notify(&session);
    }

    /// Replaces the session with the empty one.
    pub fn logout(&self) {
        debug!("logging out");
        self.write(Session::default());
    }

    /// Registers an observer, calling it immediately with the current session.
    ///
    /// The observer stays attached until the returned [`Subscription`] is
    /// dropped or detached.
    #[must_use = "dropping the subscription detaches the observer"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        let id = self.next_observer_id.fetch_add(1, Ordering::Relaxed);
        let observer: Observer = Arc::new(observer);
        self.observers.lock().insert(id, Arc::clone(&observer));

        observer(&self.read());

        Subscription {
            id,
            observers: Arc::downgrade(&self.observers),
        }
    }

    /// Number of attached observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    fn persist(&self, session: &Session) {
        let result = if session.is_authenticated() {
            serde_json::to_string(session)
                .map_err(StorageError::from)
                .and_then(|record| self.storage.save(&record))
        } else {
            self.storage.remove()
        };

        if let Err(e) = result {
            warn!(error = %e, "failed to persist session");
        }
    }

    fn notify(&self, session: &Session) {
        // Observers run without the lock held so they may subscribe or read.
        let observers: Vec<Observer> = self.observers.lock().values().cloned().collect();
        for observer in observers {
            observer(session);
        }
    }
}

impl SessionAccess for SessionStore {
    fn current(&self) -> Session {
        self.read()
    }

    fn invalidate(&self) {
        self.logout();
    }
}

/// Handle keeping an observer attached to a [`SessionStore`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    observers: Weak<ObserverMap>,
}

impl Subscription {
    /// Detaches the observer now.
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.lock().remove(&self.id);
        }
    }
}
