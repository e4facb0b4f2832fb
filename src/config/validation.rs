//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port and timeout > 0, known log level)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: HookConfig → Result<(), Vec<ConfigViolation>>

use thiserror::Error;

use crate::config::schema::HookConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("admin.host must not be empty")]
    EmptyAdminHost,

    #[error("admin.port must be greater than 0")]
    ZeroAdminPort,

    #[error("admin.timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("server must not be empty")]
    EmptyServer,

    #[error("server '{0}' must not contain '/'")]
    InvalidServer(String),

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Check a configuration, collecting every violation.
pub fn validate_config(config: &HookConfig) -> Result<(), Vec<ConfigViolation>> {
    let mut violations = Vec::new();

    if config.admin.host.trim().is_empty() {
        violations.push(ConfigViolation::EmptyAdminHost);
    }
    if config.admin.port == 0 {
        violations.push(ConfigViolation::ZeroAdminPort);
    }
    if config.admin.timeout_secs == 0 {
        violations.push(ConfigViolation::ZeroTimeout);
    }

    if config.server.trim().is_empty() {
        violations.push(ConfigViolation::EmptyServer);
    } else if config.server.contains('/') {
        violations.push(ConfigViolation::InvalidServer(config.server.clone()));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        violations.push(ConfigViolation::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
