//! Caddy route document rendering.
//!
//! # Templates
//! - Plain: subroute with one `reverse_proxy` handler
//! - Private: same, preceded by a guard route that aborts requests from
//!   outside the private/loopback ranges
//! - Redirect: subroute with one `static_response` 302 handler
//!
//! Placeholders such as `{http.request.remote.host}` are resolved by Caddy
//! at serve time, not here.

use serde_json::{json, Value};

use crate::route::spec::{RedirectSpec, RouteRequest, RouteSpec};

/// Source ranges allowed through the private-mode guard.
pub const PRIVATE_RANGES: [&str; 6] = [
    "192.168.0.0/16",
    "172.16.0.0/12",
    "10.0.0.0/8",
    "127.0.0.1/8",
    "fd00::/8",
    "::1",
];

/// HSTS value set on every proxied response.
pub const HSTS_VALUE: &str = "max-age=31536000;";

/// Expand a route request into a Caddy route object.
pub fn render(request: &RouteRequest) -> Value {
    match request {
        RouteRequest::Proxy(spec) => render_proxy(spec),
        RouteRequest::Redirect(spec) => render_redirect(spec),
    }
}

fn render_proxy(spec: &RouteSpec) -> Value {
    let mut routes = Vec::with_capacity(2);
    if spec.is_private() {
        routes.push(private_guard());
    }
    routes.push(json!({
        "handle": [reverse_proxy_handler(&spec.dial_address())]
    }));

    wrap(spec.public_host(), routes)
}

fn render_redirect(spec: &RedirectSpec) -> Value {
    let location = format!("{}{{http.request.uri}}", spec.redirect_target());
    let routes = vec![json!({
        "handle": [{
            "handler": "static_response",
            "status_code": 302,
            "headers": {
                "Location": [location]
            }
        }]
    })];

    wrap(spec.origin_host(), routes)
}

fn wrap(identity: &str, routes: Vec<Value>) -> Value {
    json!({
        "@id": identity,
        "match": [{
            "host": [identity]
        }],
        "handle": [{
            "handler": "subroute",
            "routes": routes
        }],
        "terminal": true
    })
}

fn reverse_proxy_handler(dial: &str) -> Value {
    json!({
        "handler": "reverse_proxy",
        "headers": {
            "request": {
                "set": {
                    "X-Forwarded-Proto": ["{http.request.scheme}"],
                    "X-Real-Ip": ["{http.request.remote.host}"],
                    "X-Forwarded-For": ["{http.request.remote.host}"],
                    "Forwarded": [
                        "for={http.request.remote.host};host={http.request.host};proto={http.request.scheme}"
                    ]
                }
            },
            "response": {
                "set": {
                    "Strict-Transport-Security": [HSTS_VALUE]
                }
            }
        },
        "upstreams": [{
            "dial": dial
        }]
    })
}

fn private_guard() -> Value {
    json!({
        "match": [{
            "not": [{
                "remote_ip": {
                    "ranges": PRIVATE_RANGES
                }
            }]
        }],
        "handle": [{
            "handler": "static_response",
            "abort": true
        }]
    })
}
