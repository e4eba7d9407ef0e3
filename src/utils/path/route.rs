//! Relative path to URL-style path conversion.

use std::path::{Component, Path};

/// Join the normal components of a relative path with `/`.
///
/// The result is independent of the host separator. Returns `None` when a
/// component is not valid UTF-8 or the path contains anything other than
/// plain names (root, prefix, `.` or `..`).
///
/// # Examples
/// ```ignore
/// assert_eq!(to_slash_path(Path::new("img/logo.png")), Some("img/logo.png".into()));
/// assert_eq!(to_slash_path(Path::new("../x")), None);
/// ```
pub fn to_slash_path(rel: &Path) -> Option<String> {
    let mut out = String::new();
    for component in rel.components() {
        let Component::Normal(name) = component else {
            return None;
        };
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(name.to_str()?);
    }
    (!out.is_empty()).then_some(out)
}
