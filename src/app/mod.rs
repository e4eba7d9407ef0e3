//! Minimal host application: one static endpoint, URL generation and
//! request dispatch.
//!
//! The app owns a list of [`UrlDefaults`] hooks run by [`App::url_for`] and
//! a single static view. Extensions never patch the view in place; they
//! wrap it through [`App::wrap_static_view`].

mod file;

pub use file::FileHandler;

use std::mem;

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;

use crate::config::AppConfig;
use crate::hook::{Served, StaticHandler, UrlDefaults, UrlValues};

/// Characters escaped in the path part of a generated URL. `/` is kept.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("unknown endpoint `{0}`")]
    UnknownEndpoint(String),

    #[error("endpoint `{endpoint}` requires a `{name}` value")]
    MissingValue { endpoint: String, name: &'static str },
}

pub struct App {
    static_endpoint: String,
    /// URL prefix of the static endpoint, without trailing slash.
    static_url_path: String,
    url_defaults: Vec<Box<dyn UrlDefaults>>,
    static_view: Box<dyn StaticHandler>,
}

impl App {
    pub fn new(
        static_endpoint: impl Into<String>,
        static_url_path: &str,
        static_view: impl StaticHandler + 'static,
    ) -> Self {
        Self {
            static_endpoint: static_endpoint.into(),
            static_url_path: static_url_path.trim_end_matches('/').to_owned(),
            url_defaults: Vec::new(),
            static_view: Box::new(static_view),
        }
    }

    /// App serving `config.asset_dir()` through a [`FileHandler`].
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.assets.endpoint.as_str(),
            config.assets.url_prefix(),
            FileHandler::new(config.asset_dir()),
        )
    }

    pub fn static_endpoint(&self) -> &str {
        &self.static_endpoint
    }

    pub fn static_url_path(&self) -> &str {
        &self.static_url_path
    }

    /// Append a hook run for every URL built by [`App::url_for`].
    pub fn add_url_defaults(&mut self, hook: impl UrlDefaults + 'static) {
        self.url_defaults.push(Box::new(hook));
    }

    /// Replace the static view with `wrap(current)`.
    pub fn wrap_static_view(
        &mut self,
        wrap: impl FnOnce(Box<dyn StaticHandler>) -> Box<dyn StaticHandler>,
    ) {
        let current = mem::replace(&mut self.static_view, Box::new(Unset));
        self.static_view = wrap(current);
    }

    /// Build the URL for `endpoint`.
    ///
    /// Hooks run first and may rewrite `values`. The `filename` value forms
    /// the path; a `?` inside it starts a query kept verbatim. Remaining
    /// values are appended as encoded query arguments.
    pub fn url_for(&self, endpoint: &str, mut values: UrlValues) -> Result<String, UrlError> {
        for hook in &self.url_defaults {
            hook.url_defaults(endpoint, &mut values);
        }

        if endpoint != self.static_endpoint {
            return Err(UrlError::UnknownEndpoint(endpoint.to_owned()));
        }

        let filename = values
            .remove("filename")
            .ok_or_else(|| UrlError::MissingValue {
                endpoint: endpoint.to_owned(),
                name: "filename",
            })?;

        let filename = filename.trim_start_matches('/');
        let (path, query) = match filename.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (filename, None),
        };

        let mut url = format!(
            "{}/{}",
            self.static_url_path,
            utf8_percent_encode(path, PATH_ESCAPE)
        );

        let mut separator = '?';
        if let Some(query) = query {
            url.push(separator);
            url.push_str(query);
            separator = '&';
        }
        for (key, value) in &values {
            url.push(separator);
            url.push_str(&utf8_percent_encode(key, NON_ALPHANUMERIC).to_string());
            url.push('=');
            url.push_str(&utf8_percent_encode(value, NON_ALPHANUMERIC).to_string());
            separator = '&';
        }

        Ok(url)
    }

    /// Shorthand for the static endpoint with only a `filename`.
    pub fn static_url(&self, filename: &str) -> Result<String, UrlError> {
        let values = UrlValues::from([("filename".to_owned(), filename.to_owned())]);
        self.url_for(&self.static_endpoint, values)
    }

    /// Route a decoded request target to the static view.
    ///
    /// `target` is the path plus optional query, e.g.
    /// `/static/app.css?q=0123456789`. Returns `None` when it is outside
    /// the static URL prefix.
    pub fn dispatch(&self, target: &str) -> Option<Served> {
        let filename = target
            .strip_prefix(self.static_url_path.as_str())?
            .strip_prefix('/')?;
        Some(self.static_view.serve(filename))
    }
}

/// Placeholder view held only while [`App::wrap_static_view`] runs.
struct Unset;

impl StaticHandler for Unset {
    fn serve(&self, _filename: &str) -> Served {
        Served::NotFound
    }
}
