use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rbac_console_core::AppResult;
use rbac_console_domain::User;

use crate::envelope::ApiResponse;

/// Email and password pair submitted at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// Account email.
    pub email: String,
    /// Plain password.
    pub password: String,
}

/// Access and refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    /// Bearer token for API calls.
    pub access_token: String,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
}

/// Successful login payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Authenticated user.
    pub user: User,
    /// Bearer token for API calls.
    pub access_token: String,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
}

impl AuthSession {
    /// Returns the token pair carried by the session.
    #[must_use]
    pub fn tokens(&self) -> AuthTokens {
        AuthTokens {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Logout payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutInput {
    /// Refresh token to revoke.
    pub refresh_token: String,
}

/// Token refresh payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenInput {
    /// Refresh token to exchange.
    pub refresh_token: String,
}

/// Token refresh result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedToken {
    /// Newly issued access token.
    pub access_token: String,
}

/// Password change payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    /// Current password.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

/// Password reset payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordInput {
    /// Reset token received by email.
    pub token: String,
    /// Replacement password.
    pub password: String,
}

/// Authentication API shared by mock and real backends.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a user and token pair.
    async fn login(&self, credentials: LoginCredentials) -> AppResult<ApiResponse<AuthSession>>;

    /// Revokes one refresh token.
    async fn logout(&self, input: LogoutInput) -> AppResult<ApiResponse<()>>;

    /// Revokes every session of the current user.
    async fn logout_all(&self) -> AppResult<ApiResponse<()>>;

    /// Exchanges a refresh token for a new access token.
    async fn refresh_token(
        &self,
        input: RefreshTokenInput,
    ) -> AppResult<ApiResponse<RefreshedToken>>;

    /// Returns the current user's profile.
    async fn get_profile(&self) -> AppResult<ApiResponse<User>>;

    /// Changes the current user's password.
    async fn change_password(&self, input: ChangePasswordInput) -> AppResult<ApiResponse<()>>;

    /// Starts the password reset flow for `email`.
    async fn forgot_password(&self, email: &str) -> AppResult<ApiResponse<()>>;

    /// Completes the password reset flow.
    async fn reset_password(&self, input: ResetPasswordInput) -> AppResult<ApiResponse<()>>;
}
