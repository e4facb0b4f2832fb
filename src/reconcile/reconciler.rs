//! Create and delete reconciliation against the admin API.

use thiserror::Error;

use crate::control_plane::{
    id_path, route_insert_path, route_path, ClientError, ControlPlane, Listing, Lookup, Mutation,
};
use crate::route::{render, RouteRequest};

/// Errors that end a reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Delete target absent even after the positional scan.
    #[error("no route matching host '{0}' on the proxy")]
    NoMatchingRoute(String),

    /// The insert position does not exist on the server.
    #[error("cannot insert route at {path}: server '{server}' has no route list")]
    InsertTargetMissing { server: String, path: String },

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Result of a create attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
    Unreachable,
}

/// Result of a delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Removed via its `@id`.
    DeletedById,
    /// Removed via the positional fallback at this index.
    DeletedAt(usize),
    Unreachable,
}

/// Converges one route on one proxy server.
#[derive(Debug, Clone)]
pub struct Reconciler<C> {
    client: C,
    server: String,
}

impl<C: ControlPlane> Reconciler<C> {
    pub fn new(client: C, server: impl Into<String>) -> Self {
        Self {
            client,
            server: server.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Create the route unless a route with the same identity exists.
    pub async fn create(&self, request: &RouteRequest) -> Result<CreateOutcome, ReconcileError> {
        let identity = request.identity();

        match self.client.get_by_id(identity).await? {
            Lookup::Unreachable => {
                tracing::warn!(route = identity, "Proxy unreachable, route not created");
                Ok(CreateOutcome::Unreachable)
            }
            Lookup::Found(_) => {
                tracing::info!(route = identity, "Route already exists");
                Ok(CreateOutcome::AlreadyExists)
            }
            Lookup::NotFound => {
                let document = render(request);
                let path = route_insert_path(&self.server, 0);

                match self.client.put(&path, &document).await? {
                    Mutation::Applied => {
                        tracing::info!(route = identity, server = %self.server, "Route created");
                        Ok(CreateOutcome::Created)
                    }
                    Mutation::Unreachable => {
                        tracing::warn!(route = identity, "Proxy unreachable, route not created");
                        Ok(CreateOutcome::Unreachable)
                    }
                    Mutation::UnknownId => Err(ReconcileError::InsertTargetMissing {
                        server: self.server.clone(),
                        path,
                    }),
                }
            }
        }
    }

    /// Delete the route by `@id`, falling back to a host search for
    /// routes created without one.
    pub async fn delete(&self, identity: &str) -> Result<DeleteOutcome, ReconcileError> {
        match self.client.delete(&id_path(identity)).await? {
            Mutation::Applied => {
                tracing::info!(route = identity, "Route deleted by id");
                Ok(DeleteOutcome::DeletedById)
            }
            Mutation::Unreachable => {
                tracing::warn!(route = identity, "Proxy unreachable, route not deleted");
                Ok(DeleteOutcome::Unreachable)
            }
            Mutation::UnknownId => {
                tracing::debug!(route = identity, "No route with this id, searching by host");
                self.delete_by_position(identity).await
            }
        }
    }

    async fn delete_by_position(&self, identity: &str) -> Result<DeleteOutcome, ReconcileError> {
        let routes = match self.client.routes_under(&self.server).await? {
            Listing::Routes(routes) => routes,
            Listing::Unreachable => {
                tracing::warn!(route = identity, "Proxy unreachable, route not deleted");
                return Ok(DeleteOutcome::Unreachable);
            }
        };

        let Some(index) = routes.position_of(identity) else {
            return Err(ReconcileError::NoMatchingRoute(identity.to_string()));
        };

        match self.client.delete(&route_path(&self.server, index)).await? {
            Mutation::Applied => {
                tracing::info!(route = identity, index, "Route deleted by position");
                Ok(DeleteOutcome::DeletedAt(index))
            }
            Mutation::Unreachable => {
                tracing::warn!(route = identity, "Proxy unreachable, route not deleted");
                Ok(DeleteOutcome::Unreachable)
            }
            Mutation::UnknownId => Err(ReconcileError::NoMatchingRoute(identity.to_string())),
        }
    }
}
