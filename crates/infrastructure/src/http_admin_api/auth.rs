use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use rbac_console_application::{
    ApiResponse, AuthApi, AuthSession, ChangePasswordInput, LoginCredentials, LogoutInput,
    RefreshTokenInput, RefreshedToken, ResetPasswordInput,
};
use rbac_console_core::{AppError, AppResult};
use rbac_console_domain::User;

use super::{HttpAdminApi, json_body};

#[async_trait]
impl AuthApi for HttpAdminApi {
    async fn login(&self, credentials: LoginCredentials) -> AppResult<ApiResponse<AuthSession>> {
        let response: ApiResponse<AuthSession> = self
            .send(Method::POST, &["auth", "login"], json_body(&credentials)?)
            .await
            .map_err(|error| match error {
                AppError::Unauthorized(message) => AppError::InvalidCredentials(message),
                other => other,
            })?;

        self.set_access_token(Some(response.data.access_token.clone()))
            .await;
        Ok(response)
    }

    async fn logout(&self, input: LogoutInput) -> AppResult<ApiResponse<()>> {
        let result = self
            .command(Method::POST, &["auth", "logout"], Some(json_body(&input)?))
            .await;
        self.set_access_token(None).await;
        result.map(ApiResponse::ok)
    }

    async fn logout_all(&self) -> AppResult<ApiResponse<()>> {
        let result = self
            .command(Method::POST, &["auth", "logout-all"], None)
            .await;
        self.set_access_token(None).await;
        result.map(ApiResponse::ok)
    }

    async fn refresh_token(
        &self,
        input: RefreshTokenInput,
    ) -> AppResult<ApiResponse<RefreshedToken>> {
        let response: ApiResponse<RefreshedToken> = self
            .send(Method::POST, &["auth", "refresh"], json_body(&input)?)
            .await
            .map_err(|error| AppError::RefreshFailed(error.message().to_owned()))?;

        if response.success {
            self.set_access_token(Some(response.data.access_token.clone()))
                .await;
        }
        Ok(response)
    }

    async fn get_profile(&self) -> AppResult<ApiResponse<User>> {
        self.get(&["auth", "profile"], &[]).await
    }

    async fn change_password(&self, input: ChangePasswordInput) -> AppResult<ApiResponse<()>> {
        self.command(
            Method::POST,
            &["auth", "change-password"],
            Some(json_body(&input)?),
        )
        .await
        .map(ApiResponse::ok)
    }

    async fn forgot_password(&self, email: &str) -> AppResult<ApiResponse<()>> {
        self.command(
            Method::POST,
            &["auth", "forgot-password"],
            Some(json!({ "email": email })),
        )
        .await
        .map(ApiResponse::ok)
    }

    async fn reset_password(&self, input: ResetPasswordInput) -> AppResult<ApiResponse<()>> {
        self.command(
            Method::POST,
            &["auth", "reset-password"],
            Some(json_body(&input)?),
        )
        .await
        .map(ApiResponse::ok)
    }
}
