//! `map` command: dump the fingerprint index as JSON.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::index::FingerprintIndex;
use crate::log;

use super::common::build_index;

pub fn write_map(config: &AppConfig, pretty: bool, output: Option<&Path>) -> Result<()> {
    let index = build_index(config)?;
    let json = render_map(&index, pretty)?;

    match output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log!("map"; "wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

/// JSON object with `bust` and `unbust` maps, keys sorted.
fn render_map(index: &FingerprintIndex, pretty: bool) -> Result<String> {
    let manifest = index.manifest();
    let json = if pretty {
        serde_json::to_string_pretty(&manifest)?
    } else {
        serde_json::to_string(&manifest)?
    };
    Ok(json)
}
