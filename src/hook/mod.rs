//! Container lifecycle hook input.
//!
//! The container runtime writes its state as one JSON line on stdin:
//! `{"annotations": {"reverse-proxy": "PUBLIC:INTERNAL:PORT"}, "bundle": "/path"}`.
//! The bundle's `config.json` supplies the container hostname used when
//! INTERNAL is left empty.

use std::collections::HashMap;
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::route::needs_internal_host;

/// Annotation key carrying the route.
pub const ROUTE_ANNOTATION: &str = "reverse-proxy";

#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to read hook state: {0}")]
    Read(#[from] std::io::Error),

    #[error("hook state on stdin is empty")]
    Empty,

    #[error("malformed hook state: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read bundle config {path}: {source}")]
    Bundle {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed bundle config {path}: {source}")]
    BundleParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Route text taken from the hook, plus the container hostname when the
/// route leaves INTERN_NAME empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInput {
    pub text: String,
    pub hostname: Option<String>,
}

/// Container state passed to the hook.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct HookState {
    #[serde(default)]
    pub annotations: Option<HashMap<String, String>>,

    #[serde(default)]
    pub bundle: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct BundleConfig {
    #[serde(default)]
    hostname: Option<String>,
}

impl HookState {
    /// Read the state from the first line of `reader`.
    pub fn from_reader(mut reader: impl BufRead) -> Result<Self, HookError> {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        if line.trim().is_empty() {
            return Err(HookError::Empty);
        }
        Ok(serde_json::from_str(&line)?)
    }

    /// The route annotation, if the container has a non-blank one.
    pub fn route_annotation(&self) -> Option<&str> {
        self.annotations
            .as_ref()
            .and_then(|a| a.get(ROUTE_ANNOTATION))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Route input for this container.
    ///
    /// The bundle is only read when `resolve_hostname` is set and the
    /// annotation leaves INTERN_NAME empty.
    pub fn route_input(&self, resolve_hostname: bool) -> Result<Option<RouteInput>, HookError> {
        let Some(text) = self.route_annotation() else {
            return Ok(None);
        };

        let hostname = if resolve_hostname && needs_internal_host(text) {
            self.container_hostname()?
        } else {
            None
        };

        Ok(Some(RouteInput {
            text: text.to_string(),
            hostname,
        }))
    }

    /// Hostname from `<bundle>/config.json`, if a bundle is given.
    pub fn container_hostname(&self) -> Result<Option<String>, HookError> {
        match &self.bundle {
            Some(bundle) => read_hostname(bundle),
            None => Ok(None),
        }
    }
}

fn read_hostname(bundle: &Path) -> Result<Option<String>, HookError> {
    let path = bundle.join("config.json");
    let content = fs::read_to_string(&path).map_err(|source| HookError::Bundle {
        path: path.clone(),
        source,
    })?;
    let config: BundleConfig =
        serde_json::from_str(&content).map_err(|source| HookError::BundleParse { path, source })?;

    Ok(config.hostname.filter(|h| !h.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(annotation: &str, bundle: &Path) -> HookState {
        HookState {
            annotations: Some(HashMap::from([(
                ROUTE_ANNOTATION.to_string(),
                annotation.to_string(),
            )])),
            bundle: Some(bundle.to_path_buf()),
        }
    }

    #[test]
    fn test_reads_annotation_from_first_line() {
        let input = b"{\"annotations\": {\"reverse-proxy\": \"a.example.com:web:80\", \"other\": \"x\"}}\nignored\n";
        let state = HookState::from_reader(&input[..]).unwrap();
        assert_eq!(state.route_annotation(), Some("a.example.com:web:80"));
        assert_eq!(state.container_hostname().unwrap(), None);
    }

    #[test]
    fn test_missing_annotation_is_none() {
        let state = HookState::from_reader(&b"{\"bundle\": null}"[..]).unwrap();
        assert_eq!(state.route_annotation(), None);

        let state = HookState::from_reader(&b"{\"annotations\": {}}"[..]).unwrap();
        assert_eq!(state.route_annotation(), None);
    }

    #[test]
    fn test_blank_annotation_is_none() {
        let state = HookState::from_reader(&b"{\"annotations\": {\"reverse-proxy\": \" \"}}"[..]).unwrap();
        assert_eq!(state.route_annotation(), None);
        assert_eq!(state.route_input(true).unwrap(), None);
    }

    #[test]
    fn test_empty_internal_name_uses_bundle_hostname() {
        let bundle = tempfile::tempdir().unwrap();
        fs::write(bundle.path().join("config.json"), r#"{"hostname": "web-1"}"#).unwrap();

        let state = state_with("a.example.com::3000", bundle.path());
        let input = state.route_input(true).unwrap().unwrap();
        assert_eq!(input.text, "a.example.com::3000");
        assert_eq!(input.hostname, Some("web-1".to_string()));

        // Redirects and deletes never need the hostname.
        assert_eq!(state.route_input(false).unwrap().unwrap().hostname, None);
    }

    #[test]
    fn test_named_internal_host_skips_bundle() {
        // The bundle does not exist; reading it would fail.
        let state = state_with("a.example.com:web:3000", Path::new("/nonexistent/bundle"));
        let input = state.route_input(true).unwrap().unwrap();
        assert_eq!(input.hostname, None);
    }

    #[test]
    fn test_empty_or_malformed_input() {
        assert!(matches!(HookState::from_reader(&b""[..]), Err(HookError::Empty)));
        assert!(matches!(HookState::from_reader(&b"{not json"[..]), Err(HookError::Parse(_))));
    }

    #[test]
    fn test_hostname_from_bundle() {
        let bundle = tempfile::tempdir().unwrap();
        fs::write(
            bundle.path().join("config.json"),
            r#"{"ociVersion": "1.0.2", "hostname": "web-1"}"#,
        )
        .unwrap();

        let state = HookState {
            annotations: None,
            bundle: Some(bundle.path().to_path_buf()),
        };
        assert_eq!(state.container_hostname().unwrap(), Some("web-1".to_string()));
    }

    #[test]
    fn test_missing_bundle_config_is_error() {
        let bundle = tempfile::tempdir().unwrap();
        let state = HookState {
            annotations: None,
            bundle: Some(bundle.path().to_path_buf()),
        };
        assert!(matches!(state.container_hostname(), Err(HookError::Bundle { .. })));
    }
}
