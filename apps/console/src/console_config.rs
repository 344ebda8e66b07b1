use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use rbac_console_core::{AppError, AppResult};
use rbac_console_infrastructure::{ApiClientsConfig, ApiMode, SimulatedLatency};
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";
const DEFAULT_SESSION_DIR: &str = ".rbac-console";

/// RBAC console driving the admin API in demo or real mode.
#[derive(Debug, Parser)]
#[command(name = "rbac-console")]
#[command(about = "Scripted client for the RBAC administration API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<ConsoleCommand>,
}

/// Scripted action selected on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Subcommand)]
pub enum ConsoleCommand {
    /// Tour every API namespace, resuming a stored session when present.
    #[default]
    Walkthrough,
    /// Print audit statistics for the trailing window.
    Stats {
        /// Window length in days.
        #[arg(default_value_t = 7)]
        days: u32,
    },
    /// Print the audit log as CSV.
    ExportAudit,
    /// List users matching a free-text search.
    Users {
        /// Search terms, joined with spaces.
        search: Vec<String>,
    },
    /// Sign in with the demo credentials and keep the session.
    Login,
    /// End the stored session.
    Logout,
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub command: ConsoleCommand,
    pub mode: ApiMode,
    pub api_base_url: Url,
    pub latency_scale: f64,
    pub session_dir: Option<PathBuf>,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        let command = Cli::parse().command.unwrap_or_default();
        Self::from_lookup(command, |name| env::var(name).ok())
    }

    fn from_lookup(
        command: ConsoleCommand,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let mode = lookup("RBAC_CONSOLE_MODE")
            .filter(|value| !value.trim().is_empty())
            .map(|value| ApiMode::from_str(value.as_str()))
            .transpose()?
            .unwrap_or_default();

        let raw_base_url = lookup("RBAC_CONSOLE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let api_base_url = Url::parse(raw_base_url.trim()).map_err(|error| {
            AppError::Validation(format!(
                "invalid RBAC_CONSOLE_API_BASE_URL '{raw_base_url}': {error}"
            ))
        })?;

        let latency_scale = match lookup("RBAC_CONSOLE_LATENCY_SCALE") {
            Some(value) => value.trim().parse::<f64>().map_err(|error| {
                AppError::Validation(format!(
                    "invalid RBAC_CONSOLE_LATENCY_SCALE value '{value}': {error}"
                ))
            })?,
            None => 1.0,
        };
        if !latency_scale.is_finite() || latency_scale < 0.0 {
            return Err(AppError::Validation(format!(
                "RBAC_CONSOLE_LATENCY_SCALE must be a non-negative number, got '{latency_scale}'"
            )));
        }

        // An empty value keeps the session in memory only.
        let session_dir = match lookup("RBAC_CONSOLE_SESSION_DIR") {
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(PathBuf::from(value.trim())),
            None => Some(PathBuf::from(DEFAULT_SESSION_DIR)),
        };

        Ok(Self {
            command,
            mode,
            api_base_url,
            latency_scale,
            session_dir,
        })
    }

    pub fn api_clients_config(&self) -> ApiClientsConfig {
        ApiClientsConfig {
            mode: self.mode,
            base_url: self.api_base_url.clone(),
            latency: SimulatedLatency::new(self.latency_scale),
        }
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
