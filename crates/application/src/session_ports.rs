use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rbac_console_core::AppResult;
use rbac_console_domain::User;

/// Key under which the access token is stored.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Key under which the refresh token is stored.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Same-site policy attached to a stored token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Sent only with same-site requests.
    Strict,
    /// Sent with top-level cross-site navigations.
    Lax,
    /// Always sent.
    None,
}

/// Options attached to a stored token, mirroring browser cookie attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieOptions {
    /// Lifetime in days.
    pub expires_in_days: u32,
    /// Restrict to secure transports.
    pub secure: bool,
    /// Same-site policy.
    pub same_site: SameSite,
}

impl CookieOptions {
    /// Options used for both session tokens: seven days, strict same-site,
    /// not restricted to secure transports.
    #[must_use]
    pub fn session_tokens() -> Self {
        Self {
            expires_in_days: 7,
            secure: false,
            same_site: SameSite::Strict,
        }
    }
}

/// Cookie-like string store holding the session tokens.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Stores `value` under `name`.
    async fn set(&self, name: &str, value: &str, options: CookieOptions) -> AppResult<()>;

    /// Returns the unexpired value under `name`.
    async fn get(&self, name: &str) -> AppResult<Option<String>>;

    /// Removes `name`.
    async fn remove(&self, name: &str) -> AppResult<()>;
}

/// Persisted part of the session. Tokens live in the [`TokenStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Last known user profile.
    pub user: Option<User>,
}

/// Storage for the session snapshot across restarts.
#[async_trait]
pub trait SessionSnapshotStore: Send + Sync {
    /// Loads the snapshot, or an empty one when nothing was saved.
    async fn load(&self) -> AppResult<SessionSnapshot>;

    /// Replaces the saved snapshot.
    async fn save(&self, snapshot: &SessionSnapshot) -> AppResult<()>;
}

/// User-facing notification sink.
pub trait Notifier: Send + Sync {
    /// Reports a successful outcome.
    fn success(&self, message: &str);

    /// Reports a failure.
    fn error(&self, message: &str);
}
