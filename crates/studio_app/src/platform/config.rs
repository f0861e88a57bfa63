use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use studio_core::{ConfigState, Tab};
use studio_engine::{ApiSettings, DebounceWindow, RecoverySettings, DEFAULT_ORIGIN};
use thiserror::Error;

pub(crate) const CONFIG_FILENAME: &str = "studio_client.ron";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub(crate) enum LogDestination {
    /// Write to ./studio_client.log in the current directory.
    File,
    #[default]
    Terminal,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct LogConfig {
    pub destination: LogDestination,
    /// `log` level filter name, e.g. "info" or "debug".
    pub level: String,
    /// Namespaces whose lines are dropped, e.g. ["store", "listener"].
    pub muted_namespaces: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            destination: LogDestination::Terminal,
            level: "info".to_string(),
            muted_namespaces: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ClientConfig {
    pub origin: String,
    /// Remote backend; leave unset when talking to the local server.
    pub base_url: Option<String>,
    pub queue_id: String,
    pub disabled_tabs: Vec<Tab>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub reconnect_debounce_min_ms: u64,
    pub reconnect_debounce_max_ms: u64,
    pub log: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        let debounce = DebounceWindow::default();
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            base_url: None,
            queue_id: api.queue_id,
            disabled_tabs: Vec::new(),
            connect_timeout_secs: api.connect_timeout.as_secs(),
            request_timeout_secs: api.request_timeout.as_secs(),
            reconnect_debounce_min_ms: millis(debounce.min),
            reconnect_debounce_max_ms: millis(debounce.max),
            log: LogConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            origin: self.origin.clone(),
            base_url: self.base_url.clone(),
            queue_id: self.queue_id.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn recovery_settings(&self) -> RecoverySettings {
        RecoverySettings {
            debounce: DebounceWindow {
                min: Duration::from_millis(self.reconnect_debounce_min_ms),
                max: Duration::from_millis(self.reconnect_debounce_max_ms),
            },
            ..RecoverySettings::from_api(&self.api_settings())
        }
    }

    pub fn config_state(&self) -> ConfigState {
        ConfigState {
            disabled_tabs: self.disabled_tabs.clone(),
        }
    }
}

/// Reads the config file in `dir`. A missing file is `Ok(None)`.
pub(crate) fn read_config(dir: &Path) -> Result<Option<ClientConfig>, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(ron::from_str(&content)?))
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"(
                base_url: Some("https://studio.example.com"),
                disabled_tabs: [nodes, unifiedCanvas],
                log: (level: "debug", muted_namespaces: ["store"]),
            )"#,
        )
        .unwrap();

        let config = read_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.origin, DEFAULT_ORIGIN);
        assert_eq!(config.queue_id, "default");
        assert_eq!(config.disabled_tabs, vec![Tab::Nodes, Tab::UnifiedCanvas]);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.destination, LogDestination::Terminal);

        let recovery = config.recovery_settings();
        assert!(recovery.is_remote());
        assert_eq!(recovery.debounce, DebounceWindow::default());
        assert!(config.config_state().is_tab_disabled(Tab::Nodes));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "(base_url: 42").unwrap();

        assert!(matches!(
            read_config(dir.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn defaults_survive_a_round_trip() {
        let text = ron::ser::to_string_pretty(
            &ClientConfig::default(),
            ron::ser::PrettyConfig::new(),
        )
        .unwrap();
        let parsed: ClientConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, ClientConfig::default());
    }
}
