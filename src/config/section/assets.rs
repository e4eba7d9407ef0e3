//! `[assets]` section configuration.
//!
//! Describes where static assets live and how the static endpoint is mounted.
//!
//! # Example
//!
//! ```toml
//! [assets]
//! dir = "static"          # asset root, relative to cachebust.toml
//! endpoint = "static"     # endpoint name recognized by the URL rewriter
//! url_path = "/static"    # URL prefix the endpoint is served under
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Static asset location and endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Asset root directory.
    pub dir: PathBuf,

    /// Reserved endpoint name for static assets.
    pub endpoint: String,

    /// URL prefix for the static endpoint.
    pub url_path: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("static"),
            endpoint: "static".into(),
            url_path: "/static".into(),
        }
    }
}

impl AssetsConfig {
    pub const DIR: FieldPath = FieldPath::new("assets.dir");
    pub const ENDPOINT: FieldPath = FieldPath::new("assets.endpoint");
    pub const URL_PATH: FieldPath = FieldPath::new("assets.url_path");

    /// Resolve `dir` against the project root, expanding `~`.
    pub fn normalize(&mut self, root: &Path) {
        let raw = self.dir.to_string_lossy();
        let expanded = PathBuf::from(shellexpand::tilde(&raw).into_owned());
        let full_path = if expanded.is_relative() {
            root.join(expanded)
        } else {
            expanded
        };
        self.dir = crate::utils::path::normalize_path(&full_path);
    }

    /// URL prefix without the trailing slash (`/` becomes empty).
    pub fn url_prefix(&self) -> &str {
        self.url_path.trim_end_matches('/')
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.endpoint.trim().is_empty() {
            diag.error(Self::ENDPOINT, "endpoint name must not be empty");
        }

        if !self.url_path.starts_with('/') {
            diag.error_with_hint(
                Self::URL_PATH,
                format!("'{}' must start with '/'", self.url_path),
                format!("use \"/{}\"", self.url_path),
            );
        }

        if self.dir.as_os_str().is_empty() {
            diag.error(Self::DIR, "asset directory must not be empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_assets_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.assets.dir, PathBuf::from("static"));
        assert_eq!(config.assets.endpoint, "static");
        assert_eq!(config.assets.url_path, "/static");
    }

    #[test]
    fn test_assets_config_override() {
        let config = test_parse_config(
            "[assets]\ndir = \"public/assets\"\nendpoint = \"assets\"\nurl_path = \"/a/\"",
        );
        assert_eq!(config.assets.dir, PathBuf::from("public/assets"));
        assert_eq!(config.assets.endpoint, "assets");
        assert_eq!(config.assets.url_prefix(), "/a");
    }

    #[test]
    fn test_assets_validate_rejects_bad_url_path() {
        let config = test_parse_config("[assets]\nurl_path = \"static\"\nendpoint = \" \"");
        let mut diag = ConfigDiagnostics::new();
        config.assets.validate(&mut diag);

        assert_eq!(diag.len(), 2);
        assert!(diag.errors().iter().any(|e| e.field == AssetsConfig::URL_PATH));
        assert!(diag.errors().iter().any(|e| e.field == AssetsConfig::ENDPOINT));
    }

    #[test]
    fn test_assets_normalize_joins_root() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("static")).unwrap();

        let mut assets = AssetsConfig::default();
        assets.normalize(dir.path());

        assert!(assets.dir.is_absolute());
        assert!(assets.dir.ends_with("static"));
        assert!(assets.dir.is_dir());
    }
}
