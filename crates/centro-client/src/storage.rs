//! Durable storage for the session record.
//!
//! The session is kept as a single JSON record under the key `auth`. The
//! [`FileStorage`] backend writes it to `<config dir>/centro/auth.json`;
//! [`MemoryStorage`] keeps it in process for tests and embedders.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::StorageError;

/// Key under which the session record is stored.
pub const SESSION_RECORD_KEY: &str = "auth";

/// Backing store for the JSON-encoded session record.
pub trait SessionStorage: Send + Sync {
    /// Reads the stored record, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replaces the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save(&self, record: &str) -> Result<(), StorageError>;

    /// Deletes the stored record. Deleting a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be removed.
    fn remove(&self) -> Result<(), StorageError>;
}

/// File-backed session storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates storage backed by the given file.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Default location: `<config dir>/centro/auth.json`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("centro").join(format!("{SESSION_RECORD_KEY}.json")))
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, record: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Atomic replace.
        let temp = self.temp_path();
        fs::write(&temp, record)?;
        restrict_permissions(&temp)?;
        fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), "session record saved");
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session record removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Owner read/write only.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// In-process session storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    record: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with a record.
    #[must_use]
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(record.into())),
        }
    }

    /// Returns a copy of the stored record.
    #[must_use]
    pub fn record(&self) -> Option<String> {
        self.record.lock().clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.record())
    }

    fn save(&self, record: &str) -> Result<(), StorageError> {
        *self.record.lock() = Some(record.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        self.record.lock().take();
        Ok(())
    }
}

impl<S: SessionStorage + ?Sized> SessionStorage for std::sync::Arc<S> {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, record: &str) -> Result<(), StorageError> {
        (**self).save(record)
    }

    fn remove(&self) -> Result<(), StorageError> {
        (**self).remove()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_missing_file_loads_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().join("auth.json"));
        assert!(storage.load().expect("load").is_none());
    }

    #[test]
    fn file_storage_roundtrip_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().join("nested").join("auth.json"));

        storage.save(r#"{"token":"abc"}"#).expect("save");
        assert_eq!(
            storage.load().expect("load").as_deref(),
            Some(r#"{"token":"abc"}"#)
        );
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn file_storage_remove_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().join("auth.json"));

        storage.save("{}").expect("save");
        storage.remove().expect("first remove");
        storage.remove().expect("second remove");
        assert!(storage.load().expect("load").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn file_storage_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().join("auth.json"));
        storage.save("{}").expect("save");

        let mode = fs::metadata(storage.path()).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn default_path_ends_with_record_key() {
        if let Some(path) = FileStorage::default_path() {
            assert!(path.ends_with("centro/auth.json"));
        }
    }

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.load().expect("load").is_none());

        storage.save("x").expect("save");
        assert_eq!(storage.record().as_deref(), Some("x"));

        storage.remove().expect("remove");
        assert!(storage.record().is_none());
    }
}
