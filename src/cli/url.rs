//! `url` command: print generated asset URLs.

use std::io::{self, Write};

use anyhow::Result;

use crate::app::App;
use crate::config::AppConfig;

use super::common::{build_app, build_index};

pub fn print_urls(config: &AppConfig, filenames: &[String]) -> Result<()> {
    let app = build_app(config, build_index(config)?);
    let mut stdout = io::stdout().lock();
    for url in generate_urls(&app, filenames)? {
        writeln!(stdout, "{url}")?;
    }
    Ok(())
}

fn generate_urls(app: &App, filenames: &[String]) -> Result<Vec<String>> {
    filenames
        .iter()
        .map(|filename| app.static_url(filename).map_err(Into::into))
        .collect()
}
