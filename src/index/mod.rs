//! Content-fingerprint index of static assets.
//!
//! The index is built once at startup by walking the asset root and holds
//! two exact inverses:
//!
//! ```text
//! bust:   css/app.css            → css/app.css?q=3f2a9c01de
//! unbust: css/app.css?q=3f2a9c01de → css/app.css
//! ```
//!
//! It is immutable after [`FingerprintIndex::build`] returns and is shared
//! by reference (usually `Arc`) with the URL rewriter and asset resolver.

mod build;
mod error;
mod filter;
mod fingerprint;

pub use error::IndexError;
pub use filter::ExtensionFilter;
pub use fingerprint::{busted_name, fingerprint};

pub use crate::config::{Placement, ReadErrorPolicy};

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Settings for a single index build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    pub filter: ExtensionFilter,
    pub hash_size: usize,
    pub placement: Placement,
    pub on_read_error: ReadErrorPolicy,
}

impl Default for IndexOptions {
    fn default() -> Self {
        crate::config::BusterConfig::default().index_options()
    }
}

/// Bidirectional logical ↔ fingerprinted path mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintIndex {
    bust: FxHashMap<String, String>,
    unbust: FxHashMap<String, String>,
}

/// Sorted, serializable view of both maps.
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub bust: BTreeMap<&'a str, &'a str>,
    pub unbust: BTreeMap<&'a str, &'a str>,
}

impl FingerprintIndex {
    /// Assemble both maps from `(logical, busted)` pairs.
    fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut index = Self::default();
        for (logical, busted) in entries {
            index.unbust.insert(busted.clone(), logical.clone());
            index.bust.insert(logical, busted);
        }
        index
    }

    /// Fingerprinted path for `logical`, or `logical` itself when unknown.
    pub fn bust<'a>(&'a self, logical: &'a str) -> &'a str {
        self.bust.get(logical).map_or(logical, String::as_str)
    }

    /// Logical path for `busted`, or `busted` itself when unknown.
    pub fn unbust<'a>(&'a self, busted: &'a str) -> &'a str {
        self.lookup_unbust(busted).unwrap_or(busted)
    }

    /// Logical path for `busted`, if it was produced by this index.
    pub fn lookup_unbust(&self, busted: &str) -> Option<&str> {
        self.unbust.get(busted).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bust.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bust.is_empty()
    }

    /// Logical paths in sorted order.
    pub fn logical_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.bust.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub fn manifest(&self) -> Manifest<'_> {
        Manifest {
            bust: self
                .bust
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            unbust: self
                .unbust
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        }
    }
}
