//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing macros with structured fields (route, server, path, status)
//!     → logging.rs subscriber (stderr, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - JSON output for log collectors, pretty output for operators

pub mod logging;
