//! Extension-based eligibility filter.

use rustc_hash::FxHashSet;
use std::path::Path;

/// Set of eligible extensions, each written with its leading dot.
///
/// An empty filter admits every file. Matching is case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: FxHashSet<String>,
}

impl ExtensionFilter {
    pub fn new(extensions: impl IntoIterator<Item = String>) -> Self {
        Self {
            extensions: extensions.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Whether `path` is eligible for fingerprinting.
    pub fn allows(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        suffix(path).is_some_and(|ext| self.extensions.contains(ext))
    }
}

/// Final `.ext` of the file name, dot included.
///
/// A leading dot (`.htaccess`) or trailing dot (`file.`) is not an extension.
fn suffix(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    let dot = name.rfind('.')?;
    (dot > 0 && dot + 1 < name.len()).then(|| &name[dot..])
}
