//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT (Ctrl-C) → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → broadcast → retry loop exits after the current attempt
//! ```
//!
//! # Design Decisions
//! - An attempt in flight always completes; cancellation is between attempts
//! - Without a retry loop nothing subscribes and the process just exits

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
