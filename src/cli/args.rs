//! Command-line interface definitions.

use crate::config::{Placement, ReadErrorPolicy};
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Content-fingerprinted static asset URLs
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: search upward for cachebust.toml)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Asset root directory (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve assets with fingerprinted URLs
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        bust_args: BustArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the bust and unbust maps as JSON
    #[command(visible_alias = "m")]
    Map {
        #[command(flatten)]
        bust_args: BustArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Write to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print the generated URL for each asset filename
    #[command(visible_alias = "u")]
    Url {
        #[command(flatten)]
        bust_args: BustArgs,

        /// Logical asset paths (e.g. css/app.css)
        #[arg(value_name = "FILENAME", required = true)]
        filenames: Vec<String>,
    },
}

/// Shared fingerprinting arguments
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BustArgs {
    /// Eligible extensions, comma separated (e.g. .css,.js). Empty means all files
    #[arg(short, long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Number of hex characters kept from the digest (1-32)
    #[arg(short = 'H', long)]
    pub hash_size: Option<usize>,

    /// Where the fingerprint goes in the URL
    #[arg(long, value_enum)]
    pub placement: Option<Placement>,

    /// What to do when an asset cannot be read while indexing
    #[arg(long, value_enum)]
    pub on_read_error: Option<ReadErrorPolicy>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cachebust").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = parse(&[
            "serve", "-e", ".css,.js", "-H", "8", "-p", "8080", "-i", "0.0.0.0",
        ]);
        let Commands::Serve {
            bust_args,
            interface,
            port,
        } = cli.command
        else {
            panic!("expected serve");
        };
        assert_eq!(bust_args.extensions, Some(vec![".css".into(), ".js".into()]));
        assert_eq!(bust_args.hash_size, Some(8));
        assert_eq!(port, Some(8080));
        assert_eq!(interface, Some("0.0.0.0".parse().unwrap()));
    }

    #[test]
    fn test_parse_aliases_and_globals() {
        let cli = parse(&["m", "--pretty", "-C", "site.toml", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("site.toml")));
        assert!(matches!(cli.command, Commands::Map { pretty: true, .. }));

        let cli = parse(&["u", "app.css", "js/app.js", "--placement", "path"]);
        let Commands::Url {
            bust_args,
            filenames,
        } = cli.command
        else {
            panic!("expected url");
        };
        assert_eq!(filenames, vec!["app.css", "js/app.js"]);
        assert_eq!(bust_args.placement, Some(Placement::Path));
    }

    #[test]
    fn test_url_requires_filename() {
        assert!(Cli::try_parse_from(["cachebust", "url"]).is_err());
    }

    #[test]
    fn test_read_error_policy_flag() {
        let cli = parse(&["map", "--on-read-error", "skip"]);
        let Commands::Map { bust_args, .. } = cli.command else {
            panic!("expected map");
        };
        assert_eq!(bust_args.on_read_error, Some(ReadErrorPolicy::Skip));
    }
}
