//! Persisted login session (bearer token + signed-in user).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use ei_core::AuthResponse;
use serde::{Deserialize, Serialize};

use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionState {
    token: Option<String>,
    user: Option<AuthResponse>,
}

/// Shared, cloneable handle. Clones see the same session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Option<PathBuf>,
    state: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    /// Session that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Arc::default(),
        }
    }

    /// Open the session file at `path`; a missing file is an empty session.
    pub fn open(path: &Path) -> ClientResult<Self> {
        let state = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| ClientError::Session {
                path: path.to_path_buf(),
                source: e,
            })?;
            serde_json::from_str(&content)?
        } else {
            SessionState::default()
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            state: Arc::new(RwLock::new(state)),
        })
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<AuthResponse> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// Remember a successful auth response.
    pub fn store(&self, auth: &AuthResponse) -> ClientResult<()> {
        {
            let mut state = self.write();
            state.token = Some(auth.token.clone());
            state.user = Some(auth.clone());
        }
        self.persist()
    }

    pub fn clear(&self) -> ClientResult<()> {
        *self.write() = SessionState::default();
        match &self.path {
            Some(path) if path.exists() => fs::remove_file(path).map_err(|e| ClientError::Session {
                path: path.clone(),
                source: e,
            }),
            _ => Ok(()),
        }
    }

    fn persist(&self) -> ClientResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |e| ClientError::Session {
            path: path.clone(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let json = serde_json::to_string_pretty(&*self.read())?;
        fs::write(path, json).map_err(io_err)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ei_core::Role;

    fn auth() -> AuthResponse {
        AuthResponse {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::Analyst,
            created_at: String::new(),
            updated_at: String::new(),
            token: "tok-1".into(),
        }
    }

    #[test]
    fn store_persists_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let session = SessionStore::open(&path).unwrap();
        assert!(!session.is_authenticated());
        session.store(&auth()).unwrap();

        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("tok-1"));
        assert_eq!(reopened.user().unwrap().name, "Ada");
    }

    #[test]
    fn clear_removes_file_and_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = SessionStore::open(&path).unwrap();
        session.store(&auth()).unwrap();

        session.clear().unwrap();
        assert!(!path.exists());
        assert!(session.user().is_none());
    }

    #[test]
    fn clones_share_state() {
        let session = SessionStore::in_memory();
        let other = session.clone();
        session.store(&auth()).unwrap();
        assert!(other.is_authenticated());
    }
}
