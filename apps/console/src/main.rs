//! RBAC console composition root.

#![forbid(unsafe_code)]

mod commands;
mod console_config;

use std::sync::Arc;

use rbac_console_application::{SessionService, SessionSnapshotStore, TokenStore};
use rbac_console_core::AppError;
use rbac_console_infrastructure::{
    ApiClients, InMemorySessionSnapshotStore, InMemoryTokenStore, JsonFileSessionSnapshotStore,
    JsonFileTokenStore, TracingNotifier,
};
use tracing::info;

use crate::console_config::{ConsoleCommand, ConsoleConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let clients = ApiClients::from_config(&config.api_clients_config())?;

    info!(
        mode = %clients.mode,
        demo = clients.is_demo_mode(),
        api_base_url = %config.api_base_url,
        session_dir = ?config.session_dir,
        "rbac-console started"
    );

    let (token_store, snapshot_store): (Arc<dyn TokenStore>, Arc<dyn SessionSnapshotStore>) =
        match &config.session_dir {
            Some(directory) => (
                Arc::new(JsonFileTokenStore::new(directory.join("tokens.json"))),
                Arc::new(JsonFileSessionSnapshotStore::new(
                    directory.join("session.json"),
                )),
            ),
            None => (
                Arc::new(InMemoryTokenStore::new()),
                Arc::new(InMemorySessionSnapshotStore::new()),
            ),
        };

    let session = SessionService::new(
        clients.auth.clone(),
        token_store,
        snapshot_store,
        Arc::new(TracingNotifier::new()),
    );

    match config.command {
        ConsoleCommand::Walkthrough => commands::walkthrough(&clients, &session).await,
        ConsoleCommand::Stats { days } => commands::stats(&clients, days).await,
        ConsoleCommand::ExportAudit => commands::export_audit(&clients).await,
        ConsoleCommand::Users { search } => commands::users(&clients, &search).await,
        ConsoleCommand::Login => commands::login(&session).await,
        ConsoleCommand::Logout => commands::logout(&session).await,
    }
}
