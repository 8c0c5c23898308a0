//! Session persistence between CLI invocations.
//!
//! Stores the current session as plain JSON at
//! `~/.config/escriba/session.json`. The file should carry restrictive
//! permissions; no encryption is applied.

use std::fs;
use std::path::PathBuf;

use escriba_core::error::{EscribaError, Result};

use crate::session::Session;

/// Storage for the cached session (session.json).
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    /// Creates storage at the default path (~/.config/escriba/session.json).
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| EscribaError::config("Could not determine home directory"))?;
        Ok(Self {
            path: home.join(".config").join("escriba").join("session.json"),
        })
    }

    /// Creates storage at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the cached session. `Ok(None)` when no session is cached.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(Some(session))
    }

    /// Writes the session, creating the config directory if needed.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Removes the cached session, if present.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserInfo;

    fn sample_session() -> Session {
        Session {
            access_token: "jwt".to_string(),
            expires_at: None,
            user: UserInfo {
                id: "u1".to_string(),
                email: "oficial@cartorio.br".to_string(),
            },
        }
    }

    #[test]
    fn round_trips_session() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::with_path(dir.path().join("nested").join("session.json"));

        assert!(storage.load().unwrap().is_none());
        storage.save(&sample_session()).unwrap();
        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded, sample_session());
    }

    #[test]
    fn clear_removes_cached_session() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::with_path(dir.path().join("session.json"));
        storage.save(&sample_session()).unwrap();
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
        // Clearing twice is fine.
        storage.clear().unwrap();
    }

    #[test]
    fn corrupt_cache_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        let storage = SessionStorage::with_path(path);
        assert!(matches!(
            storage.load().unwrap_err(),
            EscribaError::Serialization { .. }
        ));
    }
}
