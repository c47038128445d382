//! Client configuration types for hookchat.
//!
//! `ClientConfig` mirrors `config.toml`. Every field has a default so a
//! partial (or empty) file is valid.

use serde::{Deserialize, Serialize};

/// Default greeting seeded into a new conversation.
pub const DEFAULT_GREETING: &str = "Hi! How can I help you today?";

/// Connection and polling settings for the relay endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// URL messages are POSTed to.
    #[serde(default)]
    pub submit_url: Option<String>,

    /// Base URL polled as `<status_url>/<correlation id>`.
    /// Defaults to `<submit_url>/status`.
    #[serde(default)]
    pub status_url: Option<String>,

    /// Delay between two status queries.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Number of non-terminal polls tolerated before giving up.
    #[serde(default = "default_max_poll_retries")]
    pub max_poll_retries: u32,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Assistant greeting shown first. An empty string disables it.
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_max_poll_retries() -> u32 {
    30
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            submit_url: None,
            status_url: None,
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_retries: default_max_poll_retries(),
            request_timeout_secs: default_request_timeout_secs(),
            greeting: default_greeting(),
        }
    }
}

impl ClientConfig {
    /// The status base URL, derived from the submit URL when not set.
    pub fn resolved_status_url(&self) -> Option<String> {
        match (&self.status_url, &self.submit_url) {
            (Some(status), _) => Some(status.clone()),
            (None, Some(submit)) => Some(format!("{}/status", submit.trim_end_matches('/'))),
            (None, None) => None,
        }
    }

    /// The greeting to seed, if enabled.
    pub fn greeting(&self) -> Option<&str> {
        let greeting = self.greeting.trim();
        if greeting.is_empty() { None } else { Some(&self.greeting) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.poll_interval_ms, 1_000);
        assert_eq!(config.max_poll_retries, 30);
        assert!(config.submit_url.is_none());
        assert_eq!(config.greeting(), Some(DEFAULT_GREETING));
    }

    #[test]
    fn test_client_config_deserialize_empty() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_client_config_deserialize_with_values() {
        let toml_str = r#"
submit_url = "https://hook.example.com/abc"
poll_interval_ms = 250
max_poll_retries = 5
greeting = ""
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.submit_url.as_deref(), Some("https://hook.example.com/abc"));
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.max_poll_retries, 5);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.greeting().is_none());
    }

    #[test]
    fn test_status_url_derived_from_submit_url() {
        let config = ClientConfig {
            submit_url: Some("https://hook.example.com/abc/".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_status_url().as_deref(),
            Some("https://hook.example.com/abc/status")
        );
    }

    #[test]
    fn test_explicit_status_url_wins() {
        let config = ClientConfig {
            submit_url: Some("https://hook.example.com/abc".to_string()),
            status_url: Some("https://status.example.com/poll".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_status_url().as_deref(),
            Some("https://status.example.com/poll")
        );
        assert!(ClientConfig::default().resolved_status_url().is_none());
    }
}
