use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Mutex;

use rbac_console_core::{AppError, AppResult};
use rbac_console_domain::User;

use crate::admin_ports::{
    AuthApi, AuthSession, AuthTokens, ChangePasswordInput, LoginCredentials, LogoutInput,
    RefreshTokenInput, RefreshedToken, ResetPasswordInput,
};
use crate::envelope::ApiResponse;
use crate::session_ports::{
    ACCESS_TOKEN_KEY, CookieOptions, Notifier, REFRESH_TOKEN_KEY, SameSite, SessionSnapshot,
    SessionSnapshotStore, TokenStore,
};

use super::SessionService;

fn demo_user() -> User {
    let stamp = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(|| unreachable!());
    User {
        id: "1".to_owned(),
        first_name: "Farah".to_owned(),
        last_name: "Admin".to_owned(),
        email: "admin@demo.com".to_owned(),
        role: None,
        is_active: true,
        last_login: None,
        created_at: stamp,
        updated_at: stamp,
    }
}

#[derive(Default)]
struct FakeAuthApi {
    fail_logout: bool,
    fail_refresh: bool,
    logout_calls: Mutex<Vec<String>>,
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, credentials: LoginCredentials) -> AppResult<ApiResponse<AuthSession>> {
        if credentials.password != "demo123" {
            return Err(AppError::InvalidCredentials("wrong password".to_owned()));
        }

        Ok(ApiResponse::ok(AuthSession {
            user: demo_user(),
            access_token: "access-1".to_owned(),
            refresh_token: "refresh-1".to_owned(),
        }))
    }

    async fn logout(&self, input: LogoutInput) -> AppResult<ApiResponse<()>> {
        self.logout_calls.lock().await.push(input.refresh_token);
        if self.fail_logout {
            return Err(AppError::Internal("backend unavailable".to_owned()));
        }
        Ok(ApiResponse::ok(()))
    }

    async fn logout_all(&self) -> AppResult<ApiResponse<()>> {
        Ok(ApiResponse::ok(()))
    }

    async fn refresh_token(
        &self,
        _input: RefreshTokenInput,
    ) -> AppResult<ApiResponse<RefreshedToken>> {
        if self.fail_refresh {
            return Err(AppError::Unauthorized("refresh token expired".to_owned()));
        }
        Ok(ApiResponse::ok(RefreshedToken {
            access_token: "access-2".to_owned(),
        }))
    }

    async fn get_profile(&self) -> AppResult<ApiResponse<User>> {
        Ok(ApiResponse::ok(demo_user()))
    }

    async fn change_password(&self, _input: ChangePasswordInput) -> AppResult<ApiResponse<()>> {
        Ok(ApiResponse::ok(()))
    }

    async fn forgot_password(&self, _email: &str) -> AppResult<ApiResponse<()>> {
        Ok(ApiResponse::ok(()))
    }

    async fn reset_password(&self, _input: ResetPasswordInput) -> AppResult<ApiResponse<()>> {
        Ok(ApiResponse::ok(()))
    }
}

#[derive(Default)]
struct FakeTokenStore {
    values: Mutex<HashMap<String, (String, CookieOptions)>>,
}

impl FakeTokenStore {
    async fn options(&self, name: &str) -> Option<CookieOptions> {
        self.values
            .lock()
            .await
            .get(name)
            .map(|(_, options)| *options)
    }
}

#[async_trait]
impl TokenStore for FakeTokenStore {
    async fn set(&self, name: &str, value: &str, options: CookieOptions) -> AppResult<()> {
        self.values
            .lock()
            .await
            .insert(name.to_owned(), (value.to_owned(), options));
        Ok(())
    }

    async fn get(&self, name: &str) -> AppResult<Option<String>> {
        Ok(self
            .values
            .lock()
            .await
            .get(name)
            .map(|(value, _)| value.clone()))
    }

    async fn remove(&self, name: &str) -> AppResult<()> {
        self.values.lock().await.remove(name);
        Ok(())
    }
}

#[derive(Default)]
struct FakeSnapshotStore {
    fail_save: bool,
    snapshot: Mutex<SessionSnapshot>,
}

#[async_trait]
impl SessionSnapshotStore for FakeSnapshotStore {
    async fn load(&self) -> AppResult<SessionSnapshot> {
        Ok(self.snapshot.lock().await.clone())
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> AppResult<()> {
        if self.fail_save {
            return Err(AppError::Internal("disk full".to_owned()));
        }
        *self.snapshot.lock().await = snapshot.clone();
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: StdMutex<Vec<(bool, String)>>,
}

impl RecordingNotifier {
    fn errors(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| {
                messages
                    .iter()
                    .filter(|(success, _)| !success)
                    .map(|(_, message)| message.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((true, message.to_owned()));
        }
    }

    fn error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((false, message.to_owned()));
        }
    }
}

struct Harness {
    service: SessionService,
    auth_api: Arc<FakeAuthApi>,
    tokens: Arc<FakeTokenStore>,
    snapshots: Arc<FakeSnapshotStore>,
    notifier: Arc<RecordingNotifier>,
}

fn harness(auth_api: FakeAuthApi) -> Harness {
    let auth_api = Arc::new(auth_api);
    let tokens = Arc::new(FakeTokenStore::default());
    let snapshots = Arc::new(FakeSnapshotStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = SessionService::new(
        auth_api.clone(),
        tokens.clone(),
        snapshots.clone(),
        notifier.clone(),
    );

    Harness {
        service,
        auth_api,
        tokens,
        snapshots,
        notifier,
    }
}

fn demo_credentials(password: &str) -> LoginCredentials {
    LoginCredentials {
        email: "admin@demo.com".to_owned(),
        password: password.to_owned(),
    }
}

#[tokio::test]
async fn login_stores_tokens_and_persists_profile() {
    let harness = harness(FakeAuthApi::default());

    let result = harness.service.login(demo_credentials("demo123")).await;
    assert!(result.is_ok());

    let state = harness.service.state().await;
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.access_token.as_deref(), Some("access-1"));
    assert_eq!(state.user.map(|user| user.id), Some("1".to_owned()));

    let stored = harness.tokens.get(REFRESH_TOKEN_KEY).await;
    assert_eq!(stored.unwrap_or_default(), Some("refresh-1".to_owned()));

    let options = harness.tokens.options(ACCESS_TOKEN_KEY).await;
    assert_eq!(
        options,
        Some(CookieOptions {
            expires_in_days: 7,
            secure: false,
            same_site: SameSite::Strict,
        })
    );

    let snapshot = harness.snapshots.load().await.unwrap_or_default();
    assert_eq!(snapshot.user.map(|user| user.email), Some("admin@demo.com".to_owned()));
}

#[tokio::test]
async fn failed_login_notifies_and_returns_error() {
    let harness = harness(FakeAuthApi::default());

    let result = harness.service.login(demo_credentials("nope")).await;
    assert!(matches!(result, Err(AppError::InvalidCredentials(_))));

    let state = harness.service.state().await;
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(harness.notifier.errors(), vec!["wrong password".to_owned()]);
}

#[tokio::test]
async fn login_is_rolled_back_when_profile_cannot_be_saved() {
    let tokens = Arc::new(FakeTokenStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = SessionService::new(
        Arc::new(FakeAuthApi::default()),
        tokens.clone(),
        Arc::new(FakeSnapshotStore {
            fail_save: true,
            ..FakeSnapshotStore::default()
        }),
        notifier.clone(),
    );

    let result = service.login(demo_credentials("demo123")).await;
    assert!(matches!(result, Err(AppError::Internal(_))));

    assert_eq!(service.state().await, super::SessionState::default());
    assert!(tokens.get(ACCESS_TOKEN_KEY).await.is_ok_and(|token| token.is_none()));
    assert!(tokens.get(REFRESH_TOKEN_KEY).await.is_ok_and(|token| token.is_none()));
    assert_eq!(notifier.errors(), vec!["disk full".to_owned()]);
}

#[tokio::test]
async fn logout_clears_state_even_when_remote_call_fails() {
    let harness = harness(FakeAuthApi {
        fail_logout: true,
        ..FakeAuthApi::default()
    });
    assert!(harness.service.login(demo_credentials("demo123")).await.is_ok());

    harness.service.logout().await;

    assert_eq!(
        harness.auth_api.logout_calls.lock().await.clone(),
        vec!["refresh-1".to_owned()]
    );
    assert_eq!(harness.service.state().await, super::SessionState::default());
    assert_eq!(harness.tokens.get(ACCESS_TOKEN_KEY).await.unwrap_or_default(), None);
    assert_eq!(
        harness.snapshots.load().await.unwrap_or_default(),
        SessionSnapshot::default()
    );
}

#[tokio::test]
async fn logout_without_refresh_token_skips_remote_call() {
    let harness = harness(FakeAuthApi::default());

    harness.service.logout().await;

    assert!(harness.auth_api.logout_calls.lock().await.is_empty());
}

#[tokio::test]
async fn refresh_replaces_access_token() {
    let harness = harness(FakeAuthApi::default());
    assert!(harness.service.login(demo_credentials("demo123")).await.is_ok());

    assert!(harness.service.refresh_access_token().await);

    let state = harness.service.state().await;
    assert_eq!(state.access_token.as_deref(), Some("access-2"));
    assert_eq!(state.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(
        harness.tokens.get(ACCESS_TOKEN_KEY).await.unwrap_or_default(),
        Some("access-2".to_owned())
    );
}

#[tokio::test]
async fn refresh_failure_forces_logout() {
    let harness = harness(FakeAuthApi {
        fail_refresh: true,
        ..FakeAuthApi::default()
    });
    assert!(harness.service.login(demo_credentials("demo123")).await.is_ok());

    assert!(!harness.service.refresh_access_token().await);

    let state = harness.service.state().await;
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    assert_eq!(harness.tokens.get(REFRESH_TOKEN_KEY).await.unwrap_or_default(), None);
}

#[tokio::test]
async fn refresh_without_token_fails_closed() {
    let harness = harness(FakeAuthApi::default());

    assert!(!harness.service.refresh_access_token().await);
    assert!(!harness.service.state().await.is_authenticated);
}

#[tokio::test]
async fn check_auth_restores_profile_from_snapshot() {
    let harness = harness(FakeAuthApi::default());
    let options = CookieOptions::session_tokens();
    assert!(harness.tokens.set(ACCESS_TOKEN_KEY, "a", options).await.is_ok());
    assert!(harness.tokens.set(REFRESH_TOKEN_KEY, "r", options).await.is_ok());
    assert!(
        harness
            .snapshots
            .save(&SessionSnapshot {
                user: Some(demo_user()),
            })
            .await
            .is_ok()
    );

    assert!(harness.service.check_auth().await.is_ok());

    let state = harness.service.state().await;
    assert!(state.is_authenticated);
    assert_eq!(state.access_token.as_deref(), Some("a"));
    assert_eq!(state.user.map(|user| user.id), Some("1".to_owned()));
}

#[tokio::test]
async fn check_auth_with_one_token_clears_session() {
    let harness = harness(FakeAuthApi::default());
    let options = CookieOptions::session_tokens();
    assert!(harness.tokens.set(ACCESS_TOKEN_KEY, "a", options).await.is_ok());
    assert!(
        harness
            .snapshots
            .save(&SessionSnapshot {
                user: Some(demo_user()),
            })
            .await
            .is_ok()
    );

    assert!(harness.service.check_auth().await.is_ok());

    let state = harness.service.state().await;
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    assert!(state.access_token.is_none());
}

#[tokio::test]
async fn set_tokens_marks_session_authenticated() {
    let harness = harness(FakeAuthApi::default());

    let result = harness
        .service
        .set_tokens(AuthTokens {
            access_token: "a".to_owned(),
            refresh_token: "r".to_owned(),
        })
        .await;
    assert!(result.is_ok());
    assert!(harness.service.state().await.is_authenticated);

    assert!(harness.service.set_user(demo_user()).await.is_ok());
    let snapshot = harness.snapshots.load().await.unwrap_or_default();
    assert_eq!(snapshot.user.map(|user| user.id), Some("1".to_owned()));
}
