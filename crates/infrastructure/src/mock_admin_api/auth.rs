use async_trait::async_trait;
use chrono::Utc;
use rbac_console_application::{
    ApiResponse, AuthApi, AuthSession, ChangePasswordInput, LoginCredentials, LogoutInput,
    RefreshTokenInput, RefreshedToken, ResetPasswordInput,
};
use rbac_console_core::{AppError, AppResult};
use rbac_console_domain::User;

use super::MockAdminApi;
use crate::fixture_store::{DEMO_EMAIL, DEMO_PASSWORD};
use crate::simulated_latency::SimulatedLatency;

const LOGIN_MS: u64 = 800;
const SESSION_MS: u64 = 300;
const PASSWORD_MS: u64 = SimulatedLatency::DEFAULT_DELAY_MS;

impl MockAdminApi {
    async fn demo_user(&self) -> AppResult<User> {
        self.store
            .read()
            .await
            .users
            .first()
            .cloned()
            .ok_or_else(|| AppError::NotFound("demo user".to_owned()))
    }
}

#[async_trait]
impl AuthApi for MockAdminApi {
    async fn login(&self, credentials: LoginCredentials) -> AppResult<ApiResponse<AuthSession>> {
        self.settle("auth.login", LOGIN_MS).await;

        if credentials.email != DEMO_EMAIL || credentials.password != DEMO_PASSWORD {
            return Err(AppError::InvalidCredentials(format!(
                "use {DEMO_EMAIL} / {DEMO_PASSWORD}"
            )));
        }

        let user = self.demo_user().await?;
        let issued_at = Utc::now().timestamp_millis();
        Ok(ApiResponse::ok(AuthSession {
            user,
            access_token: format!("demo_access_token_{issued_at}"),
            refresh_token: format!("demo_refresh_token_{issued_at}"),
        }))
    }

    async fn logout(&self, _input: LogoutInput) -> AppResult<ApiResponse<()>> {
        self.settle("auth.logout", SESSION_MS).await;
        Ok(ApiResponse::ok(()))
    }

    async fn logout_all(&self) -> AppResult<ApiResponse<()>> {
        self.settle("auth.logout_all", SESSION_MS).await;
        Ok(ApiResponse::ok(()))
    }

    async fn refresh_token(
        &self,
        _input: RefreshTokenInput,
    ) -> AppResult<ApiResponse<RefreshedToken>> {
        self.settle("auth.refresh_token", SESSION_MS).await;
        Ok(ApiResponse::ok(RefreshedToken {
            access_token: format!(
                "demo_access_token_refreshed_{}",
                Utc::now().timestamp_millis()
            ),
        }))
    }

    async fn get_profile(&self) -> AppResult<ApiResponse<User>> {
        self.settle("auth.get_profile", SESSION_MS).await;
        self.demo_user().await.map(ApiResponse::ok)
    }

    async fn change_password(&self, _input: ChangePasswordInput) -> AppResult<ApiResponse<()>> {
        self.settle("auth.change_password", PASSWORD_MS).await;
        Ok(ApiResponse::ok(()))
    }

    async fn forgot_password(&self, _email: &str) -> AppResult<ApiResponse<()>> {
        self.settle("auth.forgot_password", PASSWORD_MS).await;
        Ok(ApiResponse::ok(()))
    }

    async fn reset_password(&self, _input: ResetPasswordInput) -> AppResult<ApiResponse<()>> {
        self.settle("auth.reset_password", PASSWORD_MS).await;
        Ok(ApiResponse::ok(()))
    }
}
