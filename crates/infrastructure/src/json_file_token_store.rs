use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use rbac_console_application::{CookieOptions, SameSite, TokenStore};
use rbac_console_core::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedToken {
    value: String,
    expires_at: DateTime<Utc>,
    secure: bool,
    same_site: SameSite,
}

type TokenFile = BTreeMap<String, PersistedToken>;

/// [`TokenStore`] persisted as a JSON file so a session outlives the process.
///
/// Each token keeps its absolute expiry; expired entries read as absent and
/// are dropped on the next write.
#[derive(Debug)]
pub struct JsonFileTokenStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileTokenStore {
    /// Creates a store backed by `path`. Parent directories are created on
    /// first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> AppResult<TokenFile> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(TokenFile::new()),
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read token file '{}': {error}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str(&contents).map_err(|error| {
            AppError::Internal(format!(
                "failed to parse token file '{}': {error}",
                self.path.display()
            ))
        })
    }

    async fn write_file(&self, mut tokens: TokenFile) -> AppResult<()> {
        let now = Utc::now();
        tokens.retain(|_, token| token.expires_at > now);

        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to create token directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        let contents = serde_json::to_vec_pretty(&tokens)
            .map_err(|error| AppError::Internal(format!("failed to encode tokens: {error}")))?;
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to write token file '{}': {error}",
                    self.path.display()
                ))
            })
    }
}

#[async_trait]
impl TokenStore for JsonFileTokenStore {
    async fn set(&self, name: &str, value: &str, options: CookieOptions) -> AppResult<()> {
        let _guard = self.guard.lock().await;
        let mut tokens = self.read_file().await?;
        tokens.insert(
            name.to_owned(),
            PersistedToken {
                value: value.to_owned(),
                expires_at: Utc::now() + TimeDelta::days(i64::from(options.expires_in_days)),
                secure: options.secure,
                same_site: options.same_site,
            },
        );
        self.write_file(tokens).await
    }

    async fn get(&self, name: &str) -> AppResult<Option<String>> {
        let _guard = self.guard.lock().await;
        let tokens = self.read_file().await?;
        Ok(tokens
            .get(name)
            .filter(|token| token.expires_at > Utc::now())
            .map(|token| token.value.clone()))
    }

    async fn remove(&self, name: &str) -> AppResult<()> {
        let _guard = self.guard.lock().await;
        let mut tokens = self.read_file().await?;
        if tokens.remove(name).is_none() {
            return Ok(());
        }
        self.write_file(tokens).await
    }
}
