//! HTTP response handlers.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::app::App;
use crate::index::FingerprintIndex;
use crate::utils::html::escape;
use crate::utils::mime::types::{HTML, PLAIN};

/// Cache policy of a served asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Addressed by a current fingerprint: safe to cache forever.
    Immutable { max_age: u64 },
    /// Must be revalidated on every use.
    Revalidate,
}

impl CachePolicy {
    pub fn header_value(self) -> String {
        match self {
            Self::Immutable { max_age } => format!("public, max-age={max_age}, immutable"),
            Self::Revalidate => "no-cache".to_string(),
        }
    }
}

/// Respond with a static file.
pub fn respond_file(request: Request, path: &Path, cache: CachePolicy) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);
    let headers = vec![
        make_header("Content-Type", content_type)?,
        make_header("Cache-Control", &cache.header_value())?,
    ];

    if is_head_request(&request) {
        return send_head(request, 200, headers);
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, 200, headers, body)
}

/// HTML page linking every indexed asset through the app's URL generation.
pub fn respond_index(request: Request, app: &App, index: &FingerprintIndex) -> Result<()> {
    let body = render_index(app, index)?;
    let headers = vec![
        make_header("Content-Type", HTML)?,
        make_header("Cache-Control", "no-cache")?,
    ];

    if is_head_request(&request) {
        return send_head(request, 200, headers);
    }
    send_body(request, 200, headers, body.into_bytes())
}

pub fn respond_not_found(request: Request) -> Result<()> {
    respond_plain(request, 404, "404 Not Found")
}

pub fn respond_bad_request(request: Request) -> Result<()> {
    respond_plain(request, 400, "400 Bad Request")
}

pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::from_string("405 Method Not Allowed")
        .with_status_code(StatusCode(405))
        .with_header(make_header("Content-Type", PLAIN)?)
        .with_header(make_header("Allow", "GET, HEAD")?);
    request.respond(response)?;
    Ok(())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    respond_plain(request, 503, "503 Service Unavailable")
}

pub fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

pub fn is_get_or_head(request: &Request) -> bool {
    matches!(request.method(), Method::Get | Method::Head)
}

fn render_index(app: &App, index: &FingerprintIndex) -> Result<String> {
    let mut body = String::from(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Assets</title></head>\n<body>\n",
    );
    let _ = writeln!(body, "<h1>{} assets</h1>\n<ul>", index.len());

    for logical in index.logical_paths() {
        let url = app.static_url(logical)?;
        let url = escape(&url);
        let _ = writeln!(
            body,
            "<li><a href=\"{url}\">{}</a> <code>{url}</code></li>",
            escape(logical)
        );
    }

    body.push_str("</ul>\n</body></html>\n");
    Ok(body)
}

fn respond_plain(request: Request, status: u16, message: &str) -> Result<()> {
    let headers = vec![make_header("Content-Type", PLAIN)?];
    if is_head_request(&request) {
        return send_head(request, status, headers);
    }
    send_body(request, status, headers, message.as_bytes().to_vec())
}

fn send_head(request: Request, status: u16, headers: Vec<Header>) -> Result<()> {
    let mut response = Response::empty(StatusCode(status));
    for header in headers {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

fn send_body(request: Request, status: u16, headers: Vec<Header>, body: Vec<u8>) -> Result<()> {
    let mut response = Response::from_data(body).with_status_code(StatusCode(status));
    for header in headers {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header {key}: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FileHandler;
    use crate::hook::register_cache_buster;
    use crate::index::IndexOptions;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_cache_policy_header() {
        assert_eq!(
            CachePolicy::Immutable { max_age: 60 }.header_value(),
            "public, max-age=60, immutable"
        );
        assert_eq!(CachePolicy::Revalidate.header_value(), "no-cache");
    }

    #[test]
    fn test_render_index_links_busted_urls() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.css"), "body{}").unwrap();
        fs::write(dir.path().join("a&b.js"), "x").unwrap();

        let index =
            Arc::new(FingerprintIndex::build(dir.path(), &IndexOptions::default()).unwrap());
        let mut app = App::new("static", "/static", FileHandler::new(dir.path()));
        register_cache_buster(&mut app, Arc::clone(&index));

        let html = render_index(&app, &index).unwrap();
        assert!(html.contains("<h1>2 assets</h1>"));
        assert!(html.contains(&format!("href=\"/static/{}\"", index.bust("app.css"))));
        assert!(html.contains(">a&amp;b.js</a>"));
    }

    #[test]
    fn test_make_header_rejects_invalid() {
        assert!(make_header("Cache-Control", "no-cache").is_ok());
        assert!(make_header("Cache-Control", "caf\u{e9}").is_err());
    }
}
