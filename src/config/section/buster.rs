//! `[buster]` section configuration.
//!
//! Controls which assets get fingerprinted and how the fingerprint is
//! embedded in their URLs.
//!
//! # Example
//!
//! ```toml
//! [buster]
//! extensions = [".css", ".js"]   # empty = every file
//! hash_size = 10                 # hex characters kept from the digest
//! placement = "query"            # "query" -> app.css?q=<hash>, "path" -> <hash>/app.css
//! on_read_error = "abort"        # "abort" the build or "skip" the file
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::index::{ExtensionFilter, IndexOptions};

/// Hex length of an MD5 digest.
pub const MAX_HASH_SIZE: usize = 32;

/// Default number of hex characters kept from the digest.
pub const DEFAULT_HASH_SIZE: usize = 10;

/// Where the fingerprint goes in the busted filename.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// `app.css?q=<fingerprint>`
    #[default]
    Query,
    /// `<fingerprint>/app.css`
    Path,
}

/// What to do when a file cannot be read during the index build.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
    /// Fail the whole build.
    #[default]
    Abort,
    /// Leave the file out of the index and log a warning.
    Skip,
}

/// Fingerprinting settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusterConfig {
    /// Eligible extensions including the leading dot. Empty means all files.
    pub extensions: Vec<String>,

    /// Number of hex characters retained from the digest.
    pub hash_size: usize,

    /// Fingerprint placement strategy.
    pub placement: Placement,

    /// Per-file read failure policy.
    pub on_read_error: ReadErrorPolicy,
}

impl Default for BusterConfig {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            hash_size: DEFAULT_HASH_SIZE,
            placement: Placement::default(),
            on_read_error: ReadErrorPolicy::default(),
        }
    }
}

impl BusterConfig {
    pub const EXTENSIONS: FieldPath = FieldPath::new("buster.extensions");
    pub const HASH_SIZE: FieldPath = FieldPath::new("buster.hash_size");

    /// Options for [`crate::index::FingerprintIndex::build`].
    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            filter: ExtensionFilter::new(self.extensions.iter().cloned()),
            hash_size: self.hash_size,
            placement: self.placement,
            on_read_error: self.on_read_error,
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(1..=MAX_HASH_SIZE).contains(&self.hash_size) {
            diag.error(
                Self::HASH_SIZE,
                format!(
                    "{} is out of range, expected 1..={MAX_HASH_SIZE}",
                    self.hash_size
                ),
            );
        }

        for ext in &self.extensions {
            if !ext.starts_with('.') {
                diag.error_with_hint(
                    Self::EXTENSIONS,
                    format!("'{ext}' must start with '.'"),
                    format!("write it as \".{ext}\""),
                );
            } else if ext.len() == 1 {
                diag.error(Self::EXTENSIONS, "'.' is not an extension");
            } else if ext.contains('/') {
                diag.error(Self::EXTENSIONS, format!("'{ext}' must not contain '/'"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_buster_config_defaults() {
        let config = test_parse_config("");
        assert!(config.buster.extensions.is_empty());
        assert_eq!(config.buster.hash_size, 10);
        assert_eq!(config.buster.placement, Placement::Query);
        assert_eq!(config.buster.on_read_error, ReadErrorPolicy::Abort);
    }

    #[test]
    fn test_buster_config_parse() {
        let config = test_parse_config(
            "[buster]\nextensions = [\".css\", \".js\"]\nhash_size = 8\nplacement = \"path\"\non_read_error = \"skip\"",
        );
        assert_eq!(config.buster.extensions, vec![".css", ".js"]);
        assert_eq!(config.buster.hash_size, 8);
        assert_eq!(config.buster.placement, Placement::Path);
        assert_eq!(config.buster.on_read_error, ReadErrorPolicy::Skip);
    }

    #[test]
    fn test_buster_config_rejects_unknown_placement() {
        let result: Result<crate::config::AppConfig, _> =
            toml::from_str("[buster]\nplacement = \"fragment\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_buster_config_rejects_wrong_type() {
        let result: Result<crate::config::AppConfig, _> =
            toml::from_str("[buster]\nextensions = \".css\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_buster_validate_hash_size() {
        for (size, ok) in [(0, false), (1, true), (32, true), (33, false)] {
            let config = BusterConfig {
                hash_size: size,
                ..Default::default()
            };
            let mut diag = ConfigDiagnostics::new();
            config.validate(&mut diag);
            assert_eq!(diag.is_empty(), ok, "hash_size = {size}");
        }
    }

    #[test]
    fn test_buster_validate_extensions() {
        let config = BusterConfig {
            extensions: vec![".css".into(), "js".into(), ".".into(), "./x".into()],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);

        assert_eq!(diag.len(), 3);
        assert!(diag.errors().iter().all(|e| e.field == BusterConfig::EXTENSIONS));
        assert!(diag.errors()[0].hint.is_some());
    }

    #[test]
    fn test_index_options_carry_settings() {
        let config = BusterConfig {
            extensions: vec![".css".into()],
            hash_size: 8,
            placement: Placement::Path,
            on_read_error: ReadErrorPolicy::Skip,
        };
        let options = config.index_options();
        assert_eq!(options.hash_size, 8);
        assert_eq!(options.placement, Placement::Path);
        assert_eq!(options.on_read_error, ReadErrorPolicy::Skip);
        assert!(!options.filter.is_empty());
    }
}
