use std::sync::Arc;

use rbac_console_core::AppError;
use tracing::debug;

use crate::fixture_store::FixtureStore;
use crate::simulated_latency::SimulatedLatency;

mod audit;
mod auth;
mod permissions;
mod roles;
mod users;


pub use audit::compute_audit_stats;

const LIST_MS: u64 = 400;
const GET_MS: u64 = 300;
const CREATE_MS: u64 = 600;
const UPDATE_MS: u64 = 500;
const DELETE_MS: u64 = 400;
const STATUS_MS: u64 = 300;
const REASSIGN_MS: u64 = 400;

/// In-process implementation of every admin API, backed by a
/// [`FixtureStore`].
///
/// Each call waits out its simulated latency first, then reads or mutates the
/// store under one lock acquisition.
#[derive(Debug, Clone)]
pub struct MockAdminApi {
    store: Arc<FixtureStore>,
    latency: SimulatedLatency,
}

impl MockAdminApi {
    /// Creates a mock API over a shared store.
    #[must_use]
    pub fn new(store: Arc<FixtureStore>, latency: SimulatedLatency) -> Self {
        Self { store, latency }
    }

    /// Returns the backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<FixtureStore> {
        &self.store
    }

    async fn settle(&self, operation: &'static str, latency_ms: u64) {
        debug!(operation, latency_ms, "mock api call");
        self.latency.delay(latency_ms).await;
    }
}

fn not_found(kind: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{kind} '{id}'"))
}
