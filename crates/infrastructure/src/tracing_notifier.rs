//! Notifier for headless runs. Logs notifications to tracing output.

use rbac_console_application::Notifier;
use tracing::{info, warn};

/// Notifier that writes user-facing messages to the log.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a new tracing notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(notification = "success", "{message}");
    }

    fn error(&self, message: &str) {
        warn!(notification = "error", "{message}");
    }
}
