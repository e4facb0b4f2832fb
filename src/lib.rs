//! Reconciles Caddy routes with container lifecycle events.
//!
//! A hook (or an operator) supplies `PUBLIC:INTERNAL:PORT`; the crate
//! checks the proxy's admin API, creates the route if it is missing, and
//! deletes it by `@id` or by position when the container goes away.

pub mod config;
pub mod control_plane;
pub mod hook;
pub mod lifecycle;
pub mod observability;
pub mod reconcile;
pub mod route;

pub use config::HookConfig;
pub use control_plane::AdminClient;
pub use lifecycle::Shutdown;
pub use reconcile::Reconciler;
