//! Typed view of the routes configured on a Caddy server.
//!
//! Only the fields the reconciler needs are decoded; everything else in a
//! route object is ignored.

use serde::Deserialize;

/// `GET /config/apps/http/servers/{server}/` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerRoutes {
    #[serde(default)]
    pub routes: Option<Vec<RemoteRoute>>,
}

/// One entry of a server's route list.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RemoteRoute {
    /// `@id` tag, absent on routes created without one.
    #[serde(rename = "@id", default)]
    pub id: Option<String>,

    #[serde(rename = "match", default)]
    matchers: Option<Vec<HostMatch>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
struct HostMatch {
    #[serde(default)]
    host: Option<Vec<String>>,
}

impl RemoteRoute {
    /// Route matching the given hosts; used by tests and fakes.
    pub fn new(id: Option<&str>, hosts: &[&str]) -> Self {
        Self {
            id: id.map(str::to_string),
            matchers: Some(vec![HostMatch {
                host: Some(hosts.iter().map(|h| h.to_string()).collect()),
            }]),
        }
    }

    /// All hosts across the route's matcher sets.
    pub fn match_hosts(&self) -> impl Iterator<Item = &str> {
        self.matchers
            .iter()
            .flatten()
            .filter_map(|m| m.host.as_ref())
            .flatten()
            .map(String::as_str)
    }

    pub fn matches_host(&self, host: &str) -> bool {
        self.match_hosts().any(|h| h == host)
    }
}

/// A server's routes in the order the server returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRouteSet {
    routes: Vec<RemoteRoute>,
}

impl RemoteRouteSet {
    pub fn new(routes: Vec<RemoteRoute>) -> Self {
        Self { routes }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Index of the first route matching `host`.
    ///
    /// The final entry is never a candidate: it is the catch-all the server
    /// keeps at the end of the list.
    pub fn position_of(&self, host: &str) -> Option<usize> {
        let (_, candidates) = self.routes.split_last()?;
        candidates.iter().position(|route| route.matches_host(host))
    }
}

impl From<ServerRoutes> for RemoteRouteSet {
    fn from(server: ServerRoutes) -> Self {
        Self::new(server.routes.unwrap_or_default())
    }
}
