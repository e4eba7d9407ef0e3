//! Default static view: serve files from a directory.

use std::path::PathBuf;

use crate::hook::{Served, StaticHandler};

/// Serves files under `root`, rejecting anything that escapes it.
pub struct FileHandler {
    root: PathBuf,
}

impl FileHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a filename to a file under the root.
    ///
    /// Any query suffix is dropped, so `app.css?q=stale` serves `app.css`.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        let clean = filename
            .split('?')
            .next()
            .unwrap_or(filename)
            .trim_matches('/');

        if clean.is_empty() || clean.split('/').any(|segment| segment == "..") {
            return None;
        }

        // Canonicalize both sides so symlinks cannot leave the root
        let canonical = self.root.join(clean).canonicalize().ok()?;
        let root_canonical = self.root.canonicalize().ok()?;
        if !canonical.starts_with(&root_canonical) {
            return None;
        }

        canonical.is_file().then_some(canonical)
    }
}

impl StaticHandler for FileHandler {
    fn serve(&self, filename: &str) -> Served {
        self.resolve(filename).map_or(Served::NotFound, Served::file)
    }
}
