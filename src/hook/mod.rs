//! Cache-busting hooks for the host app.
//!
//! Two seams are involved:
//!
//! - [`UrlDefaults`]: called for every generated URL, may rewrite its values.
//!   [`UrlRewriter`] swaps `filename` for its fingerprinted form.
//! - [`StaticHandler`]: the view serving the static endpoint.
//!   [`AssetResolver`] wraps the original view and maps fingerprinted
//!   filenames back before delegating.
//!
//! Both hold the same `Arc<FingerprintIndex>` and never write to it.

mod resolve;
mod rewrite;

pub use resolve::AssetResolver;
pub use rewrite::UrlRewriter;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::app::App;
use crate::index::FingerprintIndex;

/// Named values used to build a URL (`filename`, extra query args).
pub type UrlValues = BTreeMap<String, String>;

/// Hook invoked whenever the app generates a URL for any endpoint.
pub trait UrlDefaults: Send + Sync {
    fn url_defaults(&self, endpoint: &str, values: &mut UrlValues);
}

/// View function of the static endpoint.
pub trait StaticHandler: Send + Sync {
    fn serve(&self, filename: &str) -> Served;
}

/// Outcome of a static view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Served {
    /// Serve this file. `fingerprinted` is set when the requested URL
    /// carried a fingerprint that matched the index.
    File { path: PathBuf, fingerprinted: bool },
    NotFound,
}

impl Served {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            fingerprinted: false,
        }
    }

    /// Mark a file response as addressed by its fingerprint.
    pub fn fingerprinted(self) -> Self {
        match self {
            Self::File { path, .. } => Self::File {
                path,
                fingerprinted: true,
            },
            Self::NotFound => Self::NotFound,
        }
    }
}

/// Install URL rewriting and fingerprint resolution on `app`.
///
/// The rewriter is appended to the app's URL-defaults hooks and the
/// current static view is wrapped by an [`AssetResolver`] that owns it.
pub fn register_cache_buster(app: &mut App, index: Arc<FingerprintIndex>) {
    let endpoint = app.static_endpoint().to_owned();
    app.add_url_defaults(UrlRewriter::new(Arc::clone(&index), endpoint));
    app.wrap_static_view(|original| Box::new(AssetResolver::new(original, index)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_served_fingerprinted() {
        let served = Served::file("/srv/app.css").fingerprinted();
        assert_eq!(
            served,
            Served::File {
                path: PathBuf::from("/srv/app.css"),
                fingerprinted: true
            }
        );
        assert_eq!(Served::NotFound.fingerprinted(), Served::NotFound);
    }
}
