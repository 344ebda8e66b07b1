use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use rbac_console_core::{AppError, AppResult};
use rbac_console_domain::User;

use crate::admin_ports::{
    AuthApi, AuthSession, AuthTokens, LoginCredentials, LogoutInput, RefreshTokenInput,
};
use crate::session_ports::{
    ACCESS_TOKEN_KEY, CookieOptions, Notifier, REFRESH_TOKEN_KEY, SessionSnapshot,
    SessionSnapshotStore, TokenStore,
};

#[cfg(test)]
mod tests;

/// Observable session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Current user profile.
    pub user: Option<User>,
    /// Current access token.
    pub access_token: Option<String>,
    /// Current refresh token.
    pub refresh_token: Option<String>,
    /// Whether both tokens are held.
    pub is_authenticated: bool,
    /// Whether a login is in flight.
    pub is_loading: bool,
}

/// Session lifecycle on top of the selected [`AuthApi`].
#[derive(Clone)]
pub struct SessionService {
    auth_api: Arc<dyn AuthApi>,
    token_store: Arc<dyn TokenStore>,
    snapshot_store: Arc<dyn SessionSnapshotStore>,
    notifier: Arc<dyn Notifier>,
    state: Arc<RwLock<SessionState>>,
}

impl SessionService {
    /// Creates a signed-out session service.
    #[must_use]
    pub fn new(
        auth_api: Arc<dyn AuthApi>,
        token_store: Arc<dyn TokenStore>,
        snapshot_store: Arc<dyn SessionSnapshotStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth_api,
            token_store,
            snapshot_store,
            notifier,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Returns a copy of the current state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Logs in through the auth API and stores the issued tokens.
    ///
    /// Failures are reported through the notifier and returned. A session that
    /// cannot be stored completely is rolled back to signed out.
    pub async fn login(&self, credentials: LoginCredentials) -> AppResult<()> {
        self.state.write().await.is_loading = true;

        match self.try_login(credentials).await {
            Ok(user) => {
                info!(user_id = %user.id, "session established");
                self.notifier.success("Logged in successfully");
                Ok(())
            }
            Err(error) => {
                self.state.write().await.is_loading = false;
                warn!(error = %error, "login failed");
                self.notifier.error(error.message());
                Err(error)
            }
        }
    }

    async fn try_login(&self, credentials: LoginCredentials) -> AppResult<User> {
        let response = self.auth_api.login(credentials).await?;
        if !response.success {
            return Err(AppError::Unauthorized(response.message));
        }

        let session = response.into_data();
        if let Err(error) = self.commit_session(&session).await {
            self.discard_session().await;
            return Err(error);
        }

        Ok(session.user)
    }

    async fn commit_session(&self, session: &AuthSession) -> AppResult<()> {
        self.persist_user(Some(session.user.clone())).await?;
        self.store_tokens(&session.tokens()).await?;

        let mut state = self.state.write().await;
        state.user = Some(session.user.clone());
        state.access_token = Some(session.access_token.clone());
        state.refresh_token = Some(session.refresh_token.clone());
        state.is_authenticated = true;
        state.is_loading = false;
        Ok(())
    }

    async fn discard_session(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(error) = self.token_store.remove(key).await {
                warn!(error = %error, key, "failed to remove session token");
            }
        }

        *self.state.write().await = SessionState::default();
        if let Err(error) = self.persist_user(None).await {
            warn!(error = %error, "failed to clear session snapshot");
        }
    }

    /// Ends the session.
    ///
    /// The remote logout is best effort. Local tokens and state are cleared
    /// whatever it returns.
    pub async fn logout(&self) {
        let refresh_token = self.state.read().await.refresh_token.clone();
        if let Some(refresh_token) = refresh_token
            && let Err(error) = self.auth_api.logout(LogoutInput { refresh_token }).await
        {
            warn!(error = %error, "remote logout failed");
        }

        self.discard_session().await;

        info!("session cleared");
        self.notifier.success("Logged out successfully");
    }

    /// Replaces the current user profile.
    pub async fn set_user(&self, user: User) -> AppResult<()> {
        self.state.write().await.user = Some(user.clone());
        self.persist_user(Some(user)).await
    }

    /// Stores a new token pair and marks the session authenticated.
    pub async fn set_tokens(&self, tokens: AuthTokens) -> AppResult<()> {
        self.store_tokens(&tokens).await?;

        let mut state = self.state.write().await;
        state.access_token = Some(tokens.access_token);
        state.refresh_token = Some(tokens.refresh_token);
        state.is_authenticated = true;
        Ok(())
    }

    /// Renews the access token. Any failure ends the session and yields
    /// `false`.
    pub async fn refresh_access_token(&self) -> bool {
        match self.try_refresh().await {
            Ok(()) => true,
            Err(error) => {
                warn!(error = %error, "token refresh failed");
                self.logout().await;
                false
            }
        }
    }

    async fn try_refresh(&self) -> AppResult<()> {
        let refresh_token = self
            .state
            .read()
            .await
            .refresh_token
            .clone()
            .ok_or_else(|| AppError::RefreshFailed("no refresh token available".to_owned()))?;

        let response = self
            .auth_api
            .refresh_token(RefreshTokenInput { refresh_token })
            .await
            .map_err(|error| AppError::RefreshFailed(error.message().to_owned()))?;

        let access_token = response.data.access_token;
        if !response.success || access_token.is_empty() {
            return Err(AppError::RefreshFailed(
                "backend did not issue an access token".to_owned(),
            ));
        }

        self.token_store
            .set(
                ACCESS_TOKEN_KEY,
                access_token.as_str(),
                CookieOptions::session_tokens(),
            )
            .await?;

        let mut state = self.state.write().await;
        state.access_token = Some(access_token);
        state.is_authenticated = true;
        Ok(())
    }

    /// Rehydrates the session from stored tokens and the persisted profile.
    ///
    /// Both tokens must be present; otherwise the session is cleared.
    pub async fn check_auth(&self) -> AppResult<()> {
        let access_token = self.token_store.get(ACCESS_TOKEN_KEY).await?;
        let refresh_token = self.token_store.get(REFRESH_TOKEN_KEY).await?;

        match (access_token, refresh_token) {
            (Some(access_token), Some(refresh_token)) => {
                let snapshot = self.snapshot_store.load().await?;
                let mut state = self.state.write().await;
                state.user = snapshot.user;
                state.access_token = Some(access_token);
                state.refresh_token = Some(refresh_token);
                state.is_authenticated = true;
                info!(
                    has_profile = state.user.is_some(),
                    "session restored from stored tokens"
                );
                Ok(())
            }
            _ => {
                {
                    let mut state = self.state.write().await;
                    state.user = None;
                    state.access_token = None;
                    state.refresh_token = None;
                    state.is_authenticated = false;
                }
                self.persist_user(None).await
            }
        }
    }

    async fn store_tokens(&self, tokens: &AuthTokens) -> AppResult<()> {
        let options = CookieOptions::session_tokens();
        self.token_store
            .set(ACCESS_TOKEN_KEY, tokens.access_token.as_str(), options)
            .await?;
        self.token_store
            .set(REFRESH_TOKEN_KEY, tokens.refresh_token.as_str(), options)
            .await
    }

    async fn persist_user(&self, user: Option<User>) -> AppResult<()> {
        self.snapshot_store.save(&SessionSnapshot { user }).await
    }
}
