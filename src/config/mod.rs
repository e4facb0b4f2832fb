//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → CLI flag overrides (schema.rs, ConfigOverrides)
//!     → validation.rs (semantic checks)
//!     → HookConfig (immutable, passed by reference to the reconciler)
//! ```
//!
//! # Design Decisions
//! - Config is built once per invocation and never mutated afterwards
//! - All fields have defaults so the file is optional
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_with_overrides, ConfigError};
pub use schema::{AdminConfig, ConfigOverrides, HookConfig, ObservabilityConfig};
