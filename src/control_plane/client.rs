//! HTTP client for the Caddy admin API.
//!
//! # Responsibilities
//! - Issue GET/PUT/DELETE with JSON bodies against the admin endpoint
//! - Normalize response bodies to pretty-printed JSON
//! - Classify name resolution and connect failures as `Unreachable`

use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::AdminConfig;
use crate::control_plane::types::{RemoteRouteSet, ServerRoutes};
use crate::control_plane::{
    id_path, server_path, ControlPlane, Listing, Lookup, Mutation, UNKNOWN_OBJECT_ID,
};

/// Fatal failures talking to the admin API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured admin host/port does not form a valid URL.
    #[error("invalid admin endpoint: {0}")]
    Url(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Any transport failure other than an unreachable host.
    #[error("{method} {path} failed: {source}")]
    Transport {
        method: Method,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not JSON or did not have the expected shape.
    #[error("{method} {path} returned a malformed body: {source}")]
    Malformed {
        method: Method,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The server answered with an error status we cannot act on.
    #[error("{method} {path} rejected with status {status}: {body}")]
    Rejected {
        method: Method,
        path: String,
        status: StatusCode,
        body: String,
    },
}

/// A response that reached us, with its body normalized.
#[derive(Debug)]
struct Reply {
    status: StatusCode,
    body: String,
}

impl Reply {
    fn is_unknown_id(&self) -> bool {
        self.body.contains(UNKNOWN_OBJECT_ID)
    }
}

/// Admin API client.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AdminClient {
    /// Create a client for `http://{host}:{port}`.
    pub fn new(config: &AdminConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&format!("http://{}:{}/", config.host, config.port))?;
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .no_proxy()
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send one request. `Ok(None)` means the admin endpoint was unreachable.
    async fn send(
        &self,
        method: Method,
        path: &str,
        document: Option<&Value>,
    ) -> Result<Option<Reply>, ClientError> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(document) = document {
            request = request.json(document);
        }

        tracing::debug!(%method, path, "Sending admin API request");

        let transport = |source| ClientError::Transport {
            method: method.clone(),
            path: path.to_string(),
            source,
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if is_unreachable(&e) => {
                tracing::debug!(%method, path, error = %e, "Admin API unreachable");
                return Ok(None);
            }
            Err(e) => return Err(transport(e)),
        };

        let status = response.status();
        let raw = response.text().await.map_err(transport)?;
        let body = normalize(&raw).map_err(|source| ClientError::Malformed {
            method: method.clone(),
            path: path.to_string(),
            source,
        })?;

        tracing::debug!(%method, path, status = status.as_u16(), "Admin API responded");
        Ok(Some(Reply { status, body }))
    }

    fn rejected(method: Method, path: &str, reply: Reply) -> ClientError {
        ClientError::Rejected {
            method,
            path: path.to_string(),
            status: reply.status,
            body: reply.body,
        }
    }

    /// PUT or DELETE. Only a DELETE addresses an existing `@id`, so only a
    /// DELETE can answer `UnknownId`; any other failure keeps the server's
    /// status and body.
    async fn mutate(
        &self,
        method: Method,
        path: &str,
        document: Option<&Value>,
    ) -> Result<Mutation, ClientError> {
        let Some(reply) = self.send(method.clone(), path, document).await? else {
            return Ok(Mutation::Unreachable);
        };

        if reply.status.is_success() {
            Ok(Mutation::Applied)
        } else if method == Method::DELETE && reply.is_unknown_id() {
            Ok(Mutation::UnknownId)
        } else {
            Err(Self::rejected(method, path, reply))
        }
    }
}

impl ControlPlane for AdminClient {
    async fn get_by_id(&self, id: &str) -> Result<Lookup, ClientError> {
        let path = id_path(id);
        let Some(reply) = self.send(Method::GET, &path, None).await? else {
            return Ok(Lookup::Unreachable);
        };

        if reply.is_unknown_id() {
            Ok(Lookup::NotFound)
        } else if reply.status.is_success() {
            Ok(Lookup::Found(reply.body))
        } else {
            Err(Self::rejected(Method::GET, &path, reply))
        }
    }

    async fn routes_under(&self, server: &str) -> Result<Listing, ClientError> {
        let path = server_path(server);
        let Some(reply) = self.send(Method::GET, &path, None).await? else {
            return Ok(Listing::Unreachable);
        };

        if !reply.status.is_success() {
            return Err(Self::rejected(Method::GET, &path, reply));
        }

        // A missing server reads back as `null`.
        let decoded: Option<ServerRoutes> = if reply.body.is_empty() {
            None
        } else {
            serde_json::from_str(&reply.body).map_err(|source| ClientError::Malformed {
                method: Method::GET,
                path: path.clone(),
                source,
            })?
        };

        Ok(Listing::Routes(
            decoded.map(RemoteRouteSet::from).unwrap_or_default(),
        ))
    }

    async fn put(&self, path: &str, document: &Value) -> Result<Mutation, ClientError> {
        self.mutate(Method::PUT, path, Some(document)).await
    }

    async fn delete(&self, path: &str) -> Result<Mutation, ClientError> {
        self.mutate(Method::DELETE, path, None).await
    }
}

/// Name resolution and connect failures, plus timeouts before any response
/// arrived: the admin endpoint is not (yet) there.
fn is_unreachable(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout()
}

/// Re-serialize a JSON body in pretty form; empty bodies stay empty.
fn normalize(raw: &str) -> Result<String, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(String::new());
    }
    let value: Value = serde_json::from_str(raw)?;
    serde_json::to_string_pretty(&value)
}
