//! Common setup shared across CLI commands.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::app::App;
use crate::config::AppConfig;
use crate::hook::register_cache_buster;
use crate::index::FingerprintIndex;
use crate::log;

/// Build the fingerprint index for the configured asset root.
///
/// Any failure here aborts startup; nothing is served from a partial index.
pub fn build_index(config: &AppConfig) -> Result<Arc<FingerprintIndex>> {
    let root = config.asset_dir();
    let index = FingerprintIndex::build(root, &config.buster.index_options())
        .with_context(|| format!("Failed to index assets in {}", root.display()))?;

    if index.is_empty() {
        log!("warning"; "no eligible assets found in {}", root.display());
    } else {
        log!("index"; "{} assets fingerprinted in {}", index.len(), root.display());
    }
    Ok(Arc::new(index))
}

/// Compose the host app with cache busting installed.
pub fn build_app(config: &AppConfig, index: Arc<FingerprintIndex>) -> App {
    let mut app = App::from_config(config);
    register_cache_buster(&mut app, index);
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir, content: &str) -> AppConfig {
        let mut config = test_parse_config(content);
        config.assets.dir = dir.path().join("static");
        config
    }

    #[test]
    fn test_build_app_busts_urls() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static/app.css"), "body{}").unwrap();

        let config = config_for(&dir, "[buster]\nhash_size = 4");
        let index = build_index(&config).unwrap();
        let app = build_app(&config, Arc::clone(&index));

        let url = app.static_url("app.css").unwrap();
        assert_eq!(url, format!("/static/{}", index.bust("app.css")));
        assert_eq!(url.len(), "/static/app.css?q=".len() + 4);
    }

    #[test]
    fn test_build_index_missing_root_has_context() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir, "");
        let err = build_index(&config).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to index assets"));
    }
}
