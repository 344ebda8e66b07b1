use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use rbac_console_application::{CookieOptions, TokenStore};
use rbac_console_core::AppResult;

#[derive(Debug, Clone)]
struct StoredToken {
    value: String,
    options: CookieOptions,
    expires_at: DateTime<Utc>,
}

/// Process-local [`TokenStore`] with cookie-style expiry.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<String, StoredToken>>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the options `name` was stored with, if present.
    pub async fn options(&self, name: &str) -> Option<CookieOptions> {
        self.tokens
            .read()
            .await
            .get(name)
            .map(|token| token.options)
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn set(&self, name: &str, value: &str, options: CookieOptions) -> AppResult<()> {
        let expires_at = Utc::now() + TimeDelta::days(i64::from(options.expires_in_days));
        self.tokens.write().await.insert(
            name.to_owned(),
            StoredToken {
                value: value.to_owned(),
                options,
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, name: &str) -> AppResult<Option<String>> {
        let mut tokens = self.tokens.write().await;
        let Some(token) = tokens.get(name) else {
            return Ok(None);
        };

        if token.expires_at <= Utc::now() {
            tokens.remove(name);
            return Ok(None);
        }
        Ok(Some(token.value.clone()))
    }

    async fn remove(&self, name: &str) -> AppResult<()> {
        self.tokens.write().await.remove(name);
        Ok(())
    }
}
