//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod api_clients;
mod fixture_store;
mod http_admin_api;
mod in_memory_token_store;
mod json_file_token_store;
mod mock_admin_api;
mod session_snapshot_store;
mod simulated_latency;
mod tracing_notifier;

pub use api_clients::{ApiClients, ApiClientsConfig, ApiMode};
pub use fixture_store::{DEMO_EMAIL, DEMO_PASSWORD, FixtureSeed, FixtureStore};
pub use http_admin_api::HttpAdminApi;
pub use in_memory_token_store::InMemoryTokenStore;
pub use json_file_token_store::JsonFileTokenStore;
pub use mock_admin_api::{MockAdminApi, compute_audit_stats};
pub use session_snapshot_store::{InMemorySessionSnapshotStore, JsonFileSessionSnapshotStore};
pub use simulated_latency::SimulatedLatency;
pub use tracing_notifier::TracingNotifier;
