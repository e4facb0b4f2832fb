//! Route descriptor parsing and validation.

use thiserror::Error;

/// Expected format of a proxied route annotation.
pub const ROUTE_FORMAT: &str = "PUBLIC_NAME:INTERN_NAME:INTERN_PORT";

/// Expected format of a redirect origin; a full route annotation is
/// accepted and only PUBLIC_NAME is used.
pub const REDIRECT_FORMAT: &str = "PUBLIC_NAME or PUBLIC_NAME:INTERN_NAME:INTERN_PORT";

/// Errors raised while building a route from operator input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Wrong number of `:`-separated fields.
    #[error("expected {expected} separated by ':' but got {found} field(s) in '{input}'")]
    FieldCount {
        expected: &'static str,
        found: usize,
        input: String,
    },

    /// A required field was empty.
    #[error("field '{0}' must not be empty (format: PUBLIC_NAME:INTERN_NAME:INTERN_PORT, INTERN_NAME defaults to the container hostname)")]
    EmptyField(&'static str),

    /// The port field is not a valid TCP port.
    #[error("invalid port '{0}': expected a number between 1 and 65535")]
    InvalidPort(String),

    /// A redirect was requested without a target.
    #[error("redirect target must not be empty")]
    EmptyRedirectTarget,
}

/// A reverse-proxied route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    public_host: String,
    internal_host: String,
    internal_port: String,
    private: bool,
}

impl RouteSpec {
    /// External host name; unique identity of the route.
    pub fn public_host(&self) -> &str {
        &self.public_host
    }

    pub fn internal_host(&self) -> &str {
        &self.internal_host
    }

    pub fn internal_port(&self) -> &str {
        &self.internal_port
    }

    /// Whether access is restricted to private source ranges.
    pub fn is_private(&self) -> bool {
        self.private
    }

    /// Upstream dial address (`host:port`).
    pub fn dial_address(&self) -> String {
        format!("{}:{}", self.internal_host, self.internal_port)
    }
}

/// A static redirect from one host to a target URL prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectSpec {
    origin_host: String,
    redirect_target: String,
}

impl RedirectSpec {
    pub fn origin_host(&self) -> &str {
        &self.origin_host
    }

    pub fn redirect_target(&self) -> &str {
        &self.redirect_target
    }
}

/// A validated route the reconciler can act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRequest {
    Proxy(RouteSpec),
    Redirect(RedirectSpec),
}

impl RouteRequest {
    /// Identity used as `@id` on the proxy and as the host to search for.
    pub fn identity(&self) -> &str {
        match self {
            RouteRequest::Proxy(spec) => spec.public_host(),
            RouteRequest::Redirect(spec) => spec.origin_host(),
        }
    }
}

/// Builds a [`RouteRequest`] from a raw annotation plus out-of-band flags.
///
/// `private` and the redirect target never come from the annotation text
/// itself; they are carried alongside it.
#[derive(Debug, Clone, Default)]
pub struct RouteBuilder {
    input: String,
    private: bool,
    redirect_target: Option<String>,
    internal_host_fallback: Option<String>,
}

impl RouteBuilder {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Restrict the route to private source ranges.
    pub fn private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    /// Turn the route into a redirect to `target`.
    pub fn redirect(mut self, target: Option<String>) -> Self {
        self.redirect_target = target;
        self
    }

    /// Host used when INTERN_NAME is left empty (usually the container hostname).
    pub fn internal_host_fallback(mut self, host: Option<String>) -> Self {
        self.internal_host_fallback = host;
        self
    }

    /// Validate the input.
    ///
    /// Returns `Ok(None)` for empty input: a container without a route
    /// annotation is a normal state, not an error.
    pub fn build(self) -> Result<Option<RouteRequest>, ValidationError> {
        let input = self.input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        if let Some(target) = self.redirect_target {
            return build_redirect(input, target).map(Some);
        }

        let fields: Vec<&str> = input.split(':').collect();
        let [public, internal, port] = fields.as_slice() else {
            return Err(ValidationError::FieldCount {
                expected: ROUTE_FORMAT,
                found: fields.len(),
                input: input.to_string(),
            });
        };

        if public.is_empty() {
            return Err(ValidationError::EmptyField("PUBLIC_NAME"));
        }

        let internal_host = match (internal.is_empty(), self.internal_host_fallback) {
            (false, _) => internal.to_string(),
            (true, Some(fallback)) if !fallback.is_empty() => fallback,
            (true, _) => return Err(ValidationError::EmptyField("INTERN_NAME")),
        };

        if port.is_empty() {
            return Err(ValidationError::EmptyField("INTERN_PORT"));
        }
        match port.parse::<u16>() {
            Ok(p) if p > 0 => {}
            _ => return Err(ValidationError::InvalidPort(port.to_string())),
        }

        Ok(Some(RouteRequest::Proxy(RouteSpec {
            public_host: public.to_string(),
            internal_host,
            internal_port: port.to_string(),
            private: self.private,
        })))
    }
}

fn build_redirect(input: &str, target: String) -> Result<RouteRequest, ValidationError> {
    let origin = public_name(input)?;
    let target = target.trim();
    if target.is_empty() {
        return Err(ValidationError::EmptyRedirectTarget);
    }

    Ok(RouteRequest::Redirect(RedirectSpec {
        origin_host: origin.to_string(),
        redirect_target: target.to_string(),
    }))
}

/// PUBLIC_NAME of a bare host or a full 3-field annotation.
fn public_name(input: &str) -> Result<&str, ValidationError> {
    let fields: Vec<&str> = input.split(':').collect();
    let public = match fields.as_slice() {
        [host] => *host,
        [public, _, _] => *public,
        _ => {
            return Err(ValidationError::FieldCount {
                expected: REDIRECT_FORMAT,
                found: fields.len(),
                input: input.to_string(),
            })
        }
    };
    if public.is_empty() {
        return Err(ValidationError::EmptyField("PUBLIC_NAME"));
    }
    Ok(public)
}

/// Whether a proxied route annotation leaves INTERN_NAME empty and so
/// needs the container hostname.
pub fn needs_internal_host(input: &str) -> bool {
    let fields: Vec<&str> = input.trim().split(':').collect();
    matches!(fields.as_slice(), [_, internal, _] if internal.is_empty())
}

/// Identity named by a delete request.
///
/// Accepts a bare host (a redirect origin) or a full route annotation, in
/// which case only PUBLIC_NAME is used. Empty input yields `Ok(None)`.
pub fn identity_of(input: &str) -> Result<Option<String>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    public_name(input).map(|public| Some(public.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy(request: Option<RouteRequest>) -> RouteSpec {
        match request {
            Some(RouteRequest::Proxy(spec)) => spec,
            other => panic!("expected proxy route, got {:?}", other),
        }
    }

    #[test]
    fn test_three_fields_in_order() {
        let spec = proxy(RouteBuilder::new("shop.example.com:backend:8080").build().unwrap());
        assert_eq!(spec.public_host(), "shop.example.com");
        assert_eq!(spec.internal_host(), "backend");
        assert_eq!(spec.internal_port(), "8080");
        assert!(!spec.is_private());
        assert_eq!(spec.dial_address(), "backend:8080");
    }

    #[test]
    fn test_empty_input_is_noop() {
        assert_eq!(RouteBuilder::new("").build(), Ok(None));
        assert_eq!(RouteBuilder::new("   ").build(), Ok(None));
    }

    #[test]
    fn test_wrong_field_counts_rejected() {
        for input in ["shop.example.com", "shop.example.com:backend", "a:b:c:d", "a:b:c:d:e"] {
            let err = RouteBuilder::new(input).build().unwrap_err();
            assert!(
                matches!(err, ValidationError::FieldCount { expected: ROUTE_FORMAT, .. }),
                "{} gave {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_missing_port_message_names_format() {
        let err = RouteBuilder::new("shop.example.com:backend").build().unwrap_err();
        assert!(err.to_string().contains(ROUTE_FORMAT));
    }

    #[test]
    fn test_private_flag_is_out_of_band() {
        let spec = proxy(RouteBuilder::new("a.example.com:web:80").private(true).build().unwrap());
        assert!(spec.is_private());
    }

    #[test]
    fn test_empty_internal_uses_fallback() {
        let spec = proxy(
            RouteBuilder::new("a.example.com::3000")
                .internal_host_fallback(Some("container-1".into()))
                .build()
                .unwrap(),
        );
        assert_eq!(spec.internal_host(), "container-1");

        let err = RouteBuilder::new("a.example.com::3000").build().unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("INTERN_NAME"));
    }

    #[test]
    fn test_empty_public_and_port_rejected() {
        assert_eq!(
            RouteBuilder::new(":web:80").build().unwrap_err(),
            ValidationError::EmptyField("PUBLIC_NAME")
        );
        assert_eq!(
            RouteBuilder::new("a.example.com:web:").build().unwrap_err(),
            ValidationError::EmptyField("INTERN_PORT")
        );
    }

    #[test]
    fn test_invalid_port_rejected() {
        for port in ["http", "0", "70000", "-1"] {
            let err = RouteBuilder::new(format!("a.example.com:web:{}", port))
                .build()
                .unwrap_err();
            assert_eq!(err, ValidationError::InvalidPort(port.to_string()));
        }
    }

    #[test]
    fn test_redirect_builds_from_origin() {
        let request = RouteBuilder::new("old.example.com")
            .redirect(Some("https://new.example.com".into()))
            .build()
            .unwrap()
            .unwrap();
        assert_eq!(request.identity(), "old.example.com");
        match request {
            RouteRequest::Redirect(spec) => {
                assert_eq!(spec.redirect_target(), "https://new.example.com");
            }
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    #[test]
    fn test_redirect_takes_public_name_from_annotation() {
        let request = RouteBuilder::new("old.example.com:web:80")
            .redirect(Some("https://new.example.com".into()))
            .build()
            .unwrap()
            .unwrap();
        assert!(matches!(request, RouteRequest::Redirect(_)));
        assert_eq!(request.identity(), "old.example.com");

        // INTERN_NAME may be empty; no hostname is needed for a redirect.
        let request = RouteBuilder::new("old.example.com::80")
            .redirect(Some("https://new.example.com".into()))
            .build()
            .unwrap()
            .unwrap();
        assert_eq!(request.identity(), "old.example.com");
    }

    #[test]
    fn test_redirect_rejects_bad_origin_and_empty_target() {
        let err = RouteBuilder::new("old.example.com:web")
            .redirect(Some("https://new.example.com".into()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::FieldCount { expected: REDIRECT_FORMAT, found: 2, .. }));

        let err = RouteBuilder::new("old.example.com")
            .redirect(Some(" ".into()))
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyRedirectTarget);
    }

    #[test]
    fn test_identity_of() {
        assert_eq!(identity_of(""), Ok(None));
        assert_eq!(identity_of("old.example.com"), Ok(Some("old.example.com".into())));
        assert_eq!(identity_of("shop.example.com::8080"), Ok(Some("shop.example.com".into())));
        assert!(matches!(identity_of("a:b"), Err(ValidationError::FieldCount { found: 2, .. })));
        assert_eq!(identity_of(":web:80"), Err(ValidationError::EmptyField("PUBLIC_NAME")));
    }

    #[test]
    fn test_needs_internal_host() {
        assert!(needs_internal_host("a.example.com::3000"));
        assert!(!needs_internal_host("a.example.com:web:3000"));
        assert!(!needs_internal_host("a.example.com"));
        assert!(!needs_internal_host("a.example.com:"));
        assert!(!needs_internal_host("a.example.com::3000:x"));
    }
}
