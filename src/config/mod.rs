//! Application configuration management for `cachebust.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── assets     # [assets]
//! │   ├── buster     # [buster]
//! │   └── serve      # [serve]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # AppConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section    | Purpose                                          |
//! |------------|--------------------------------------------------|
//! | `[assets]` | Asset root, static endpoint name and URL prefix  |
//! | `[buster]` | Extensions, hash size, placement, read policy    |
//! | `[serve]`  | Development server (interface, port, threads)    |

pub mod section;
pub mod types;
mod util;

use util::find_config_from;

pub use section::{AssetsConfig, BusterConfig, Placement, ReadErrorPolicy, ServeConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BustArgs, Cli, Commands},
    debug, log,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "cachebust.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing cachebust.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Asset root and static endpoint
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Fingerprinting settings
    #[serde(default)]
    pub buster: BusterConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl AppConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Without `--config`, searches upward from cwd for `cachebust.toml` and
    /// falls back to defaults when none exists. An explicit `--config` that
    /// does not exist is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_in(cli, &cwd)
    }

    fn load_in(cli: &Cli, cwd: &Path) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli, cwd);

        let mut config = if exists {
            Self::from_path(&config_path)?
        } else if cli.config.is_some() {
            bail!(ConfigError::Io(
                config_path,
                io::Error::new(io::ErrorKind::NotFound, "config file not found"),
            ));
        } else {
            debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG_FILE);
            Self::default()
        };

        config.config_path = config_path;
        config.finalize(cli, cwd);
        config.validate()?;

        Ok(config)
    }

    /// Resolve config file path, returning whether it exists.
    fn resolve_config_path(cli: &Cli, cwd: &Path) -> (PathBuf, bool) {
        match &cli.config {
            Some(path) => {
                let path = cwd.join(path);
                let exists = path.is_file();
                (path, exists)
            }
            None => match find_config_from(cwd, Path::new(DEFAULT_CONFIG_FILE)) {
                Some(path) => (path, true),
                None => (cwd.join(DEFAULT_CONFIG_FILE), false),
            },
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli, cwd: &Path) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf());

        self.root = crate::utils::path::normalize_path(&root);
        self.apply_command_options(cli);
        self.assets.normalize(&self.root);
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Asset root after normalization.
    pub fn asset_dir(&self) -> &Path {
        &self.assets.dir
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        Self::update_option(&mut self.assets.dir, cli.dir.as_ref());

        match &cli.command {
            Commands::Serve {
                bust_args,
                interface,
                port,
            } => {
                self.apply_bust_args(bust_args);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Map { bust_args, .. } | Commands::Url { bust_args, .. } => {
                self.apply_bust_args(bust_args);
            }
        }
    }

    /// Apply fingerprinting arguments from CLI.
    fn apply_bust_args(&mut self, args: &BustArgs) {
        Self::update_option(&mut self.buster.extensions, args.extensions.as_ref());
        Self::update_option(&mut self.buster.hash_size, args.hash_size.as_ref());
        Self::update_option(&mut self.buster.placement, args.placement.as_ref());
        Self::update_option(&mut self.buster.on_read_error, args.on_read_error.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.assets.validate(&mut diag);
        self.buster.validate(&mut diag);
        self.serve.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AppConfig {
    let (parsed, ignored) = AppConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
