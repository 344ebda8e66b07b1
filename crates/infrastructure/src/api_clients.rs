use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;
use url::Url;

use rbac_console_application::{AuditApi, AuthApi, PermissionsApi, RolesApi, UsersApi};
use rbac_console_core::{AppError, AppResult};

use crate::fixture_store::FixtureStore;
use crate::http_admin_api::HttpAdminApi;
use crate::mock_admin_api::MockAdminApi;
use crate::simulated_latency::SimulatedLatency;

/// Backend the admin APIs talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiMode {
    /// In-process fixtures with simulated latency.
    #[default]
    Mock,
    /// REST backend over HTTP.
    Real,
}

impl ApiMode {
    /// Returns the configuration spelling of the mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Real => "real",
        }
    }
}

impl fmt::Display for ApiMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ApiMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" | "demo" => Ok(Self::Mock),
            "real" | "http" => Ok(Self::Real),
            other => Err(AppError::Validation(format!(
                "unknown api mode '{other}', expected 'mock' or 'real'"
            ))),
        }
    }
}

/// Settings consumed by [`ApiClients::from_config`].
#[derive(Debug, Clone)]
pub struct ApiClientsConfig {
    /// Selected backend.
    pub mode: ApiMode,
    /// REST base URL, used in real mode.
    pub base_url: Url,
    /// Latency scale, used in mock mode.
    pub latency: SimulatedLatency,
}

/// The five admin API handles, all backed by the same implementation.
#[derive(Clone)]
pub struct ApiClients {
    /// Selected backend.
    pub mode: ApiMode,
    /// Authentication API.
    pub auth: Arc<dyn AuthApi>,
    /// User administration API.
    pub users: Arc<dyn UsersApi>,
    /// Role administration API.
    pub roles: Arc<dyn RolesApi>,
    /// Permission administration API.
    pub permissions: Arc<dyn PermissionsApi>,
    /// Audit log API.
    pub audit: Arc<dyn AuditApi>,
    /// Transport client; `None` in mock mode.
    pub http_client: Option<reqwest::Client>,
}

impl ApiClients {
    /// Builds mock handles over a shared fixture store.
    #[must_use]
    pub fn mock(store: Arc<FixtureStore>, latency: SimulatedLatency) -> Self {
        let api = Arc::new(MockAdminApi::new(store, latency));
        Self {
            mode: ApiMode::Mock,
            auth: api.clone(),
            users: api.clone(),
            roles: api.clone(),
            permissions: api.clone(),
            audit: api,
            http_client: None,
        }
    }

    /// Builds HTTP handles rooted at `base_url`.
    #[must_use]
    pub fn real(http_client: reqwest::Client, base_url: Url) -> Self {
        let api = Arc::new(HttpAdminApi::new(http_client.clone(), base_url));
        Self {
            mode: ApiMode::Real,
            auth: api.clone(),
            users: api.clone(),
            roles: api.clone(),
            permissions: api.clone(),
            audit: api,
            http_client: Some(http_client),
        }
    }

    /// Builds the handles for the configured mode. Mock mode starts from the
    /// demo fixtures.
    pub fn from_config(config: &ApiClientsConfig) -> AppResult<Self> {
        info!(mode = %config.mode, "selecting admin api backend");

        match config.mode {
            ApiMode::Mock => Ok(Self::mock(
                Arc::new(FixtureStore::seeded()),
                config.latency,
            )),
            ApiMode::Real => {
                let http_client = reqwest::Client::builder().build().map_err(|error| {
                    AppError::Internal(format!("failed to build http client: {error}"))
                })?;
                Ok(Self::real(http_client, config.base_url.clone()))
            }
        }
    }

    /// Returns whether the handles are backed by fixtures.
    #[must_use]
    pub fn is_demo_mode(&self) -> bool {
        self.mode == ApiMode::Mock
    }
}
