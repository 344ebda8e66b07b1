use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use rbac_console_application::{SessionSnapshot, SessionSnapshotStore};
use rbac_console_core::{AppError, AppResult};

/// Session snapshot persisted as a JSON file.
///
/// A missing file reads as an empty snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileSessionSnapshotStore {
    path: PathBuf,
}

impl JsonFileSessionSnapshotStore {
    /// Creates a store backed by `path`. Parent directories are created on
    /// first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionSnapshotStore for JsonFileSessionSnapshotStore {
    async fn load(&self) -> AppResult<SessionSnapshot> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Ok(SessionSnapshot::default());
            }
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read session snapshot '{}': {error}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str(&contents).map_err(|error| {
            AppError::Internal(format!(
                "failed to parse session snapshot '{}': {error}",
                self.path.display()
            ))
        })
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> AppResult<()> {
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to create session directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        let contents = serde_json::to_vec_pretty(snapshot).map_err(|error| {
            AppError::Internal(format!("failed to encode session snapshot: {error}"))
        })?;
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to write session snapshot '{}': {error}",
                    self.path.display()
                ))
            })
    }
}

/// Session snapshot kept in process memory.
#[derive(Debug, Default)]
pub struct InMemorySessionSnapshotStore {
    snapshot: RwLock<SessionSnapshot>,
}

impl InMemorySessionSnapshotStore {
    /// Creates a store holding an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionSnapshotStore for InMemorySessionSnapshotStore {
    async fn load(&self) -> AppResult<SessionSnapshot> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> AppResult<()> {
        *self.snapshot.write().await = snapshot.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rbac_console_application::{SessionSnapshot, SessionSnapshotStore};

    use super::{InMemorySessionSnapshotStore, JsonFileSessionSnapshotStore};
    use crate::fixture_store::FixtureStore;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("rbac-console-{}-{name}", std::process::id()))
            .join("session.json")
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty_snapshot() {
        let store = JsonFileSessionSnapshotStore::new(scratch_path("missing"));
        assert_eq!(
            store.load().await.unwrap_or_else(|_| unreachable!()),
            SessionSnapshot::default()
        );
    }

    #[tokio::test]
    async fn saved_profile_round_trips_through_the_file() {
        let path = scratch_path("round-trip");
        let store = JsonFileSessionSnapshotStore::new(path.clone());
        let user = FixtureStore::seeded().users().await.into_iter().next();
        let snapshot = SessionSnapshot { user };

        assert!(store.save(&snapshot).await.is_ok());
        let reloaded = JsonFileSessionSnapshotStore::new(path.clone()).load().await;
        assert!(reloaded.is_ok_and(|reloaded| reloaded == snapshot));

        if let Some(directory) = path.parent() {
            let _ = tokio::fs::remove_dir_all(directory).await;
        }
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let path = scratch_path("corrupt");
        if let Some(directory) = path.parent() {
            let _ = tokio::fs::create_dir_all(directory).await;
        }
        let _ = tokio::fs::write(&path, b"{ not json").await;

        let store = JsonFileSessionSnapshotStore::new(path.clone());
        assert!(store.load().await.is_err());

        if let Some(directory) = path.parent() {
            let _ = tokio::fs::remove_dir_all(directory).await;
        }
    }

    #[tokio::test]
    async fn in_memory_store_keeps_last_snapshot() {
        let store = InMemorySessionSnapshotStore::new();
        let user = FixtureStore::seeded().users().await.into_iter().nth(1);
        let snapshot = SessionSnapshot { user };

        assert!(store.save(&snapshot).await.is_ok());
        assert!(store.load().await.is_ok_and(|loaded| loaded == snapshot));
    }
}
