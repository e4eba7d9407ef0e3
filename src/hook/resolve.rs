//! Inbound fingerprint resolution.

use std::borrow::Cow;
use std::sync::Arc;

use super::{Served, StaticHandler};
use crate::debug;
use crate::index::FingerprintIndex;

/// Static view wrapper that maps fingerprinted filenames back to logical
/// paths before delegating to the original view.
///
/// Misses (unversioned requests, stale fingerprints) are passed through
/// unchanged so the original view applies its own semantics.
pub struct AssetResolver {
    original: Box<dyn StaticHandler>,
    index: Arc<FingerprintIndex>,
}

impl AssetResolver {
    pub fn new(original: Box<dyn StaticHandler>, index: Arc<FingerprintIndex>) -> Self {
        Self { original, index }
    }
}

impl StaticHandler for AssetResolver {
    fn serve(&self, filename: &str) -> Served {
        let key = fingerprint_key(filename);
        let logical = self.index.unbust(&key);
        if logical == key {
            return self.original.serve(filename);
        }

        debug!("serve"; "resolved {} -> {}", filename, logical);
        self.original.serve(logical).fingerprinted()
    }
}

/// The part of a requested filename that can appear as an unbust key.
///
/// Query arguments other than the `q=` fingerprint are dropped, so
/// `app.css?q=abc&v=1` looks up `app.css?q=abc` and `1f/app.js?v=1`
/// looks up `1f/app.js`.
fn fingerprint_key(filename: &str) -> Cow<'_, str> {
    let Some((path, query)) = filename.split_once('?') else {
        return Cow::Borrowed(filename);
    };

    match query.split('&').find(|pair| pair.starts_with("q=")) {
        Some(pair) if pair.len() == query.len() => Cow::Borrowed(filename),
        Some(pair) => Cow::Owned(format!("{path}?{pair}")),
        None => Cow::Borrowed(path),
    }
}
