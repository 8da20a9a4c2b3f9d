//! Persistence for the session record.
//!
//! One serialized [`Session`] lives under a fixed path; absence on disk is
//! `None`, never a half-defined record. Writes go to a `.tmp` file first
//! and are renamed into place so a concurrent load never observes a
//! partial write.

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

use minerva_common::{PlatformError, Session};

/// Key/value persistence for the current session.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, PlatformError>;
    fn save(&self, session: Option<&Session>) -> Result<(), PlatformError>;
}

/// File-backed store holding the session as a single JSON record.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the platform default location (`data_dir()/session.json`).
    pub fn at_default_path() -> Self {
        Self::new(crate::paths::session_file())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, PlatformError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = std::fs::read_to_string(&self.path).map_err(|e| {
            PlatformError::StoreError(format!("failed to read {}: {e}", self.path.display()))
        })?;

        let session: Session = serde_json::from_str(&data).map_err(|e| {
            PlatformError::StoreError(format!("failed to parse {}: {e}", self.path.display()))
        })?;

        Ok(Some(session))
    }

    fn save(&self, session: Option<&Session>) -> Result<(), PlatformError> {
        let Some(session) = session else {
            match std::fs::remove_file(&self.path) {
                Ok(()) => debug!("removed persisted session"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(PlatformError::StoreError(format!(
                        "failed to remove {}: {e}",
                        self.path.display()
                    )));
                }
            }
            return Ok(());
        };

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| PlatformError::StoreError(format!("failed to serialize session: {e}")))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlatformError::StoreError(format!(
                    "failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        // Atomic replace: write to .tmp, then rename
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|e| {
            PlatformError::StoreError(format!("failed to write {}: {e}", tmp_path.display()))
        })?;

        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            // Rename failed — try direct write as fallback (Windows compat)
            warn!("atomic rename failed ({e}), falling back to direct write");
            std::fs::write(&self.path, &json).map_err(|e2| {
                PlatformError::StoreError(format!(
                    "failed to write {}: {e2}",
                    self.path.display()
                ))
            })?;
        }

        debug!("persisted session for {}", session.username);
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, PlatformError> {
        Ok(self.session.lock().unwrap().clone())
    }

    fn save(&self, session: Option<&Session>) -> Result<(), PlatformError> {
        *self.session.lock().unwrap() = session.cloned();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minerva_common::SESSION_TTL_SECS;

    fn session() -> Session {
        Session::new("alice", "YWxpY2U6c2VjcmV0", 1_000_000, SESSION_TTL_SECS, true)
    }

    #[test]
    fn load_on_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        store.save(Some(&session())).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, session());
    }

    #[test]
    fn save_none_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::new(path.clone());

        store.save(Some(&session())).unwrap();
        assert!(path.exists());

        store.save(None).unwrap();
        assert!(!path.exists());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_none_on_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.save(None).unwrap();
    }

    #[test]
    fn save_replaces_whole_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        store.save(Some(&session())).unwrap();
        let replacement = Session::new("bob", "Ym9iOmh1bnRlcjI=", 2_000_000, 60, false);
        store.save(Some(&replacement)).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, replacement);
    }

    #[test]
    fn no_tmp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.save(Some(&session())).unwrap();
        assert!(!dir.path().join("session.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileSessionStore::new(path);
        assert!(store.load().is_err());
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(Some(&session())).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), session());

        store.save(None).unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
