//! Route description subsystem.
//!
//! # Data Flow
//! ```text
//! "PUBLIC:INTERNAL:PORT" + flags (private, redirect, hostname fallback)
//!     → spec.rs (split, validate, build RouteRequest)
//!     → document.rs (expand into a Caddy route object)
//!     → handed to the reconciler's create path
//! ```
//!
//! # Design Decisions
//! - A request is validated once and immutable afterwards
//! - The public host (or redirect origin) is the route's identity and
//!   becomes the document's `@id`
//! - Rendering is pure: no network or filesystem access

pub mod document;
pub mod spec;

pub use document::render;
pub use spec::{
    identity_of, needs_internal_host, RedirectSpec, RouteBuilder, RouteRequest, RouteSpec,
    ValidationError,
};
