use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use super::AuthSession;
use crate::error::{AdminError, AdminResult};

pub const SESSION_FILE: &str = "session.json";

/// Where the single sign-in record lives between runs
pub trait SessionStore: Send + Sync {
    /// `None` when nothing is stored or the stored record is unreadable
    fn load(&self) -> AdminResult<Option<AuthSession>>;
    fn save(&self, session: &AuthSession) -> AdminResult<()>;
    fn clear(&self) -> AdminResult<()>;
}

/// JSON file store, one record per config directory
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> AdminResult<Option<AuthSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    fn save(&self, session: &AuthSession) -> AdminResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)
            .map_err(|e| AdminError::Storage(e.to_string()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> AdminResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<AuthSession>>,
}

impl MemorySessionStore {
    pub fn with(session: AuthSession) -> Self {
        Self { slot: Mutex::new(Some(session)) }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> AdminResult<Option<AuthSession>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, session: &AuthSession) -> AdminResult<()> {
        *self.lock()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> AdminResult<()> {
        *self.lock()? = None;
        Ok(())
    }
}

impl MemorySessionStore {
    fn lock(&self) -> AdminResult<std::sync::MutexGuard<'_, Option<AuthSession>>> {
        self.slot
            .lock()
            .map_err(|_| AdminError::Storage("session lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySessionStore::default();
        assert!(store.load().unwrap().is_none());
        store.save(&AuthSession::new("abc", json!({}))).unwrap();
        assert_eq!(store.load().unwrap().unwrap().token, "abc");
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn clearing_missing_file_is_ok() {
        let store = FileSessionStore::new("/nonexistent/dir/for/kab/session.json");
        assert!(store.clear().is_ok());
        assert!(store.load().unwrap().is_none());
    }
}
