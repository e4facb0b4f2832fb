//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for one invocation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct HookConfig {
    /// Admin API endpoint of the proxy.
    pub admin: AdminConfig,

    /// Logical HTTP server whose route list is managed (e.g. "srv0").
    pub server: String,

    /// Minutes between create attempts; `None` or 0 disables retrying.
    pub retry_minutes: Option<u64>,

    /// Restrict created routes to private source ranges.
    pub private: bool,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            admin: AdminConfig::default(),
            server: "srv0".to_string(),
            retry_minutes: None,
            private: false,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl HookConfig {
    /// Layer command-line values over the file (or default) values.
    ///
    /// Boolean switches can only turn a setting on.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(host) = &overrides.admin_host {
            self.admin.host = host.clone();
        }
        if let Some(port) = overrides.admin_port {
            self.admin.port = port;
        }
        if let Some(server) = &overrides.server {
            self.server = server.clone();
        }
        if overrides.retry_minutes.is_some() {
            self.retry_minutes = overrides.retry_minutes;
        }
        if overrides.private {
            self.private = true;
        }
        if let Some(level) = &overrides.log_level {
            self.observability.log_level = level.clone();
        }
        if overrides.log_json {
            self.observability.json = true;
        }
    }

    /// Retry interval, if retrying is enabled.
    pub fn retry_interval(&self) -> Option<Duration> {
        self.retry_minutes
            .filter(|minutes| *minutes > 0)
            .map(|minutes| Duration::from_secs(minutes.saturating_mul(60)))
    }
}

/// Values given on the command line; unset fields leave the config alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub admin_host: Option<String>,
    pub admin_port: Option<u16>,
    pub server: Option<String>,
    pub retry_minutes: Option<u64>,
    pub private: bool,
    pub log_level: Option<String>,
    pub log_json: bool,
}

/// Admin API endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdminConfig {
    /// Host name of the proxy container.
    pub host: String,

    /// Admin API port.
    pub port: u16,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            host: "caddy".to_string(),
            port: 2019,
            timeout_secs: 10,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
