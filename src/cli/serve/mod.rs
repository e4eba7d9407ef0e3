//! Development server for fingerprinted assets.
//!
//! ```text
//! request ──► decode_target ──► "/"            ──► asset listing
//!                           └─► App::dispatch  ──► AssetResolver ──► FileHandler
//! ```

mod lifecycle;
mod path;
mod response;

pub use lifecycle::{is_shutdown, setup_shutdown_handler};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Request, Server};

use crate::app::App;
use crate::config::AppConfig;
use crate::hook::Served;
use crate::index::FingerprintIndex;
use crate::{debug, log};

use super::common::{build_app, build_index};
use response::CachePolicy;

/// Everything a request handler needs, shared by all pool threads.
struct ServeState {
    app: App,
    index: Arc<FingerprintIndex>,
    max_age: u64,
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
}

/// Index the assets and bind to the configured address.
///
/// Indexing runs before binding so no request is answered from a
/// partially built index.
pub fn serve(config: &AppConfig) -> Result<()> {
    let index = build_index(config)?;
    let state = ServeState {
        app: build_app(config, Arc::clone(&index)),
        index,
        max_age: config.serve.max_age,
    };

    let bound = bind_server(config)?;
    log!("serve"; "http://{}{}/", bound.addr, state.app.static_url_path());
    bound.run(state, config.serve.threads)
}

fn bind_server(config: &AppConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server(Arc::clone(&server));
    Ok(BoundServer { server, addr })
}

impl BoundServer {
    /// Start the request loop (blocking).
    fn run(self, state: ServeState, threads: usize) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("serve-{i}"))
            .build()
            .context("failed to create request thread pool")?;

        let state = Arc::new(state);
        for request in self.server.incoming_requests() {
            let state = Arc::clone(&state);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &state) {
                    log!("serve"; "request error: {e:#}");
                }
            });
        }
        Ok(())
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, state: &ServeState) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }
    if !response::is_get_or_head(&request) {
        return response::respond_method_not_allowed(request);
    }

    let Some(target) = path::decode_target(request.url()) else {
        return response::respond_bad_request(request);
    };

    if path::is_index(&target) {
        return response::respond_index(request, &state.app, &state.index);
    }

    match state.app.dispatch(&target) {
        Some(Served::File {
            path,
            fingerprinted,
        }) => {
            debug!("serve"; "{} -> {}", target, path.display());
            let cache = if fingerprinted {
                CachePolicy::Immutable {
                    max_age: state.max_age,
                }
            } else {
                CachePolicy::Revalidate
            };
            response::respond_file(request, &path, cache)
        }
        Some(Served::NotFound) | None => {
            debug!("serve"; "{} not found", target);
            response::respond_not_found(request)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> ServeState {
        fs::create_dir_all(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static/app.css"), "body{}").unwrap();

        let mut config = test_parse_config("[serve]\nmax_age = 600");
        config.assets.dir = dir.path().join("static");
        let index = build_index(&config).unwrap();
        ServeState {
            app: build_app(&config, Arc::clone(&index)),
            index,
            max_age: config.serve.max_age,
        }
    }

    /// Send one raw request through `handle_request` and return the raw response.
    fn exchange(state: &ServeState, method: &str, url: &str) -> String {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let raw = format!("{method} {url} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");

        let client = thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).unwrap();
            stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
            stream.write_all(raw.as_bytes()).unwrap();
            let mut response = Vec::new();
            let _ = stream.read_to_end(&mut response);
            String::from_utf8_lossy(&response).into_owned()
        });

        let request = server.recv().unwrap();
        handle_request(request, state).unwrap();
        client.join().unwrap()
    }

    #[test]
    fn test_fingerprinted_url_is_immutable() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let url = state.app.static_url("app.css").unwrap();
        assert!(url.contains("?q="));

        let response = exchange(&state, "GET", &url);
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.contains("Cache-Control: public, max-age=600, immutable"));
        assert!(response.ends_with("\r\n\r\nbody{}"));
    }

    #[test]
    fn test_unversioned_and_stale_urls_revalidate() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);

        for url in ["/static/app.css", "/static/app.css?q=0000000000"] {
            let response = exchange(&state, "GET", url);
            assert!(response.starts_with("HTTP/1.1 200"), "{response}");
            assert!(response.contains("Cache-Control: no-cache"));
            assert!(response.ends_with("body{}"));
        }
    }

    #[test]
    fn test_head_and_missing_file() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);

        let url = state.app.static_url("app.css").unwrap();
        let response = exchange(&state, "HEAD", &url);
        assert!(response.contains("immutable"));
        assert!(!response.contains("body{}"));

        let response = exchange(&state, "GET", "/static/missing.css");
        assert!(response.starts_with("HTTP/1.1 404"), "{response}");
    }
}
