//! Request target decoding.

use percent_encoding::percent_decode_str;

/// Percent-decode a raw request target, keeping its query.
///
/// Returns `None` when the decoded bytes are not UTF-8. A fingerprint in
/// the query (`?q=...`) must survive, so unlike a plain file server no
/// part of the target is dropped here.
pub fn decode_target(url: &str) -> Option<String> {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };

    let mut decoded = percent_decode_str(path).decode_utf8().ok()?.into_owned();
    if !decoded.starts_with('/') {
        decoded.insert(0, '/');
    }
    if let Some(query) = query {
        decoded.push('?');
        decoded.push_str(&percent_decode_str(query).decode_utf8().ok()?);
    }
    Some(decoded)
}

/// Request for the asset listing page.
pub fn is_index(target: &str) -> bool {
    target.split('?').next().is_some_and(|path| path == "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_target_keeps_query() {
        assert_eq!(
            decode_target("/static/app.css?q=0123456789").as_deref(),
            Some("/static/app.css?q=0123456789")
        );
        assert_eq!(
            decode_target("/static/img/my%20logo.png").as_deref(),
            Some("/static/img/my logo.png")
        );
        assert_eq!(decode_target("static/a.css").as_deref(), Some("/static/a.css"));
    }

    #[test]
    fn test_decode_target_rejects_invalid_utf8() {
        assert_eq!(decode_target("/static/%ff.css"), None);
    }

    #[test]
    fn test_is_index() {
        assert!(is_index("/"));
        assert!(is_index("/?x=1"));
        assert!(!is_index("/static/"));
    }
}
