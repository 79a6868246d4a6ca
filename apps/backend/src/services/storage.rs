//! File-backed store for in-progress practice sessions.
//!
//! Each session is one JSON file named `<id>.json` in the session directory.

use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use quiz_core::Session;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt session file {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Session not found: {0}")]
    NotFound(String),
}

/// Session state as persisted on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub session: Session,
}

impl StoredSession {
    pub fn new(session: Session) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: session.started_at,
            session,
        }
    }
}

/// Session files under one directory.
pub struct SessionStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl SessionStore {
    /// Open the store, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Serialize a read-modify-write cycle against other requests.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Write a session, replacing any previous state.
    ///
    /// The file is written beside its final name and renamed into place.
    pub async fn save(&self, stored: &StoredSession) -> Result<(), StorageError> {
        let content = serde_json::to_vec_pretty(stored)?;
        let path = self.path_for(stored.id);
        let tmp = path.with_extension("json.tmp");

        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!("Saved session {}", stored.id);
        Ok(())
    }

    /// Load a session by ID.
    pub async fn load(&self, id: Uuid) -> Result<StoredSession, StorageError> {
        let path = self.path_for(id);
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&content).map_err(|source| StorageError::Corrupt {
            path: path.display().to_string(),
            source,
        })
    }

    /// Delete a session. Deleting a missing session is not an error.
    pub async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => {
                tracing::debug!("Deleted session {}", id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
