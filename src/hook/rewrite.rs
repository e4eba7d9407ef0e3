//! Outbound URL rewriting.

use std::sync::Arc;

use super::{UrlDefaults, UrlValues};
use crate::index::FingerprintIndex;

/// Replaces `filename` with its fingerprinted form for the static endpoint.
pub struct UrlRewriter {
    index: Arc<FingerprintIndex>,
    endpoint: String,
}

impl UrlRewriter {
    pub fn new(index: Arc<FingerprintIndex>, endpoint: impl Into<String>) -> Self {
        Self {
            index,
            endpoint: endpoint.into(),
        }
    }

    /// Fingerprinted filename, or `filename` unchanged when not indexed.
    pub fn bust_filename<'a>(&'a self, filename: &'a str) -> &'a str {
        self.index.bust(filename)
    }
}

impl UrlDefaults for UrlRewriter {
    fn url_defaults(&self, endpoint: &str, values: &mut UrlValues) {
        if endpoint != self.endpoint {
            return;
        }
        if let Some(filename) = values.get_mut("filename") {
            let busted = self.bust_filename(filename);
            if busted != filename.as_str() {
                *filename = busted.to_owned();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexOptions, Placement};
    use std::fs;
    use tempfile::TempDir;

    fn rewriter(placement: Placement) -> (TempDir, UrlRewriter) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.css"), "body{}").unwrap();
        let options = IndexOptions {
            placement,
            ..Default::default()
        };
        let index = FingerprintIndex::build(dir.path(), &options).unwrap();
        (dir, UrlRewriter::new(Arc::new(index), "static"))
    }

    fn values(filename: &str) -> UrlValues {
        UrlValues::from([("filename".to_string(), filename.to_string())])
    }

    #[test]
    fn test_rewrites_static_filename() {
        let (_dir, rewriter) = rewriter(Placement::Query);
        let mut v = values("app.css");
        rewriter.url_defaults("static", &mut v);

        let busted = &v["filename"];
        assert!(busted.starts_with("app.css?q="));
        assert_eq!(busted.len(), "app.css?q=".len() + 10);
    }

    #[test]
    fn test_unknown_filename_passes_through() {
        let (_dir, rewriter) = rewriter(Placement::Path);
        let mut v = values("missing.css");
        rewriter.url_defaults("static", &mut v);
        assert_eq!(v["filename"], "missing.css");
        assert_eq!(rewriter.bust_filename("missing.css"), "missing.css");
    }

    #[test]
    fn test_other_endpoints_untouched() {
        let (_dir, rewriter) = rewriter(Placement::Query);
        let mut v = values("app.css");
        rewriter.url_defaults("index", &mut v);
        assert_eq!(v["filename"], "app.css");

        // No filename: nothing to do
        let mut empty = UrlValues::new();
        rewriter.url_defaults("static", &mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_concurrent_lookups() {
        let (_dir, rewriter) = rewriter(Placement::Query);
        let expected = rewriter.bust_filename("app.css").to_owned();

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..100 {
                        let mut v = values("app.css");
                        rewriter.url_defaults("static", &mut v);
                        assert_eq!(v["filename"], expected);
                    }
                });
            }
        });
    }
}
