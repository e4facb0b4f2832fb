//! Caddy admin API client subsystem.
//!
//! # Data Flow
//! ```text
//! Reconciler
//!     → ControlPlane trait (get_by_id, routes_under, put, delete)
//!     → client.rs (HTTP request, body normalization, outcome classification)
//!     → types.rs (typed decode of the server's route list)
//! ```
//!
//! # Design Decisions
//! - Unreachable (DNS or connect failure) is an outcome value, not an error
//! - Every other transport or protocol failure is a fatal `ClientError`
//! - "Unknown object ID" is detected by substring match on normalized JSON

pub mod client;
pub mod types;

use std::future::Future;

use serde_json::Value;

pub use client::{AdminClient, ClientError};
pub use types::{RemoteRoute, RemoteRouteSet};

/// Marker Caddy puts in the error body when an `@id` does not exist.
///
/// Matched against pretty-printed JSON, so `{"error":"unknown object ID ..."}`
/// and `{"error": "unknown object ID ..."}` both normalize to this form.
pub const UNKNOWN_OBJECT_ID: &str = "\"error\": \"unknown object ID";

/// Result of looking up an object by `@id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The object exists; normalized response body.
    Found(String),
    NotFound,
    Unreachable,
}

/// Result of listing a server's routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Routes(RemoteRouteSet),
    Unreachable,
}

/// Result of a PUT or DELETE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    /// The path referenced an `@id` the server does not know.
    UnknownId,
    Unreachable,
}

/// Operations the reconciler needs from the proxy's admin API.
pub trait ControlPlane {
    fn get_by_id(&self, id: &str) -> impl Future<Output = Result<Lookup, ClientError>> + Send;

    fn routes_under(&self, server: &str)
        -> impl Future<Output = Result<Listing, ClientError>> + Send;

    fn put(&self, path: &str, document: &Value)
        -> impl Future<Output = Result<Mutation, ClientError>> + Send;

    fn delete(&self, path: &str) -> impl Future<Output = Result<Mutation, ClientError>> + Send;
}

/// `/id/{id}`
pub fn id_path(id: &str) -> String {
    format!("/id/{}", id)
}

/// `/config/apps/http/servers/{server}/`
pub fn server_path(server: &str) -> String {
    format!("/config/apps/http/servers/{}/", server)
}

/// Insert position for PUT (trailing slash included).
pub fn route_insert_path(server: &str, index: usize) -> String {
    format!("/config/apps/http/servers/{}/routes/{}/", server, index)
}

/// Existing route position for DELETE.
pub fn route_path(server: &str, index: usize) -> String {
    format!("/config/apps/http/servers/{}/routes/{}", server, index)
}
