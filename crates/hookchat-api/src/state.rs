//! Application state: the resolved client configuration and the concrete
//! session type the CLI commands drive.
//!
//! Configuration layers, lowest to highest: built-in defaults,
//! `config.toml` in the config directory, then command-line flags and their
//! environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use hookchat_core::chat::session::ConversationSession;
use hookchat_infra::config::{load_client_config, resolve_config_dir};
use hookchat_infra::relay::{HttpRelayTransport, RelayEndpoints};
use hookchat_types::config::ClientConfig;

use crate::cli::Cli;

/// Conversation session pinned to the HTTP relay transport.
pub type HttpSession = ConversationSession<HttpRelayTransport>;

pub struct AppState {
    pub config: ClientConfig,
    pub config_dir: PathBuf,
}

impl AppState {
    /// Load `config.toml` and apply the CLI overrides on top.
    pub async fn init(cli: &Cli) -> anyhow::Result<Self> {
        let config_dir = cli.config_dir.clone().unwrap_or_else(resolve_config_dir);
        let mut config = load_client_config(&config_dir).await;
        apply_overrides(&mut config, cli.submit_url.as_deref(), cli.status_url.as_deref());

        tracing::debug!(config_dir = %config_dir.display(), "configuration resolved");
        Ok(Self { config, config_dir })
    }

    /// Validated relay endpoints for the current configuration.
    pub fn endpoints(&self) -> anyhow::Result<RelayEndpoints> {
        RelayEndpoints::from_config(&self.config).with_context(|| {
            format!(
                "relay is not configured; pass --submit-url or set submit_url in {}",
                self.config_dir.join("config.toml").display()
            )
        })
    }

    /// Open a fresh conversation against the configured relay.
    pub fn new_session(&self) -> anyhow::Result<HttpSession> {
        let transport = HttpRelayTransport::new(
            self.endpoints()?,
            Duration::from_secs(self.config.request_timeout_secs),
        )?;
        Ok(ConversationSession::from_config(transport, &self.config))
    }
}

/// Flag values replace file values; blank flags are ignored.
fn apply_overrides(config: &mut ClientConfig, submit_url: Option<&str>, status_url: Option<&str>) {
    if let Some(url) = submit_url.filter(|url| !url.trim().is_empty()) {
        config.submit_url = Some(url.trim().to_string());
    }
    if let Some(url) = status_url.filter(|url| !url.trim().is_empty()) {
        config.status_url = Some(url.trim().to_string());
    }
}
