//! Photocat CLI - catalog and tag photographs by content fingerprint.
//!
//! Walks a photo library, shows each photo's file and EXIF details, and
//! records operator categories, ratings and deletion flags in a SQLite
//! catalog keyed by SHA-256 of the file bytes.
//!
//! # Usage
//!
//! ```bash
//! # Tag the configured library
//! photocat tag
//!
//! # Tag a specific folder
//! photocat tag ~/Pictures/2023
//!
//! # Show what would be cataloged
//! photocat list ~/Pictures/2023
//!
//! # Dump the catalog
//! photocat export --format jsonl --output catalog.jsonl
//!
//! # View configuration
//! photocat config show
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use photocat_core::Config;

mod cli;
mod logging;

/// Photocat - catalog and tag photographs by content fingerprint.
#[derive(Parser, Debug)]
#[command(name = "photocat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the platform default
    #[arg(long, global = true, env = "PHOTOCAT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Step through photos and tag them from the keyboard
    Tag(cli::tag::TagArgs),

    /// List the photos a session would visit, in order
    List(cli::list::ListArgs),

    /// Export catalog records as JSON or JSON Lines
    Export(cli::export::ExportArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => match Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `photocat config path`."
                );
                Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Photocat v{}", photocat_core::VERSION);

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    match cli.command {
        Commands::Tag(args) => cli::tag::execute(args, config),
        Commands::List(args) => cli::list::execute(args, &config),
        Commands::Export(args) => cli::export::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args, &config, &config_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tag_with_root_and_mode() {
        let cli = Cli::try_parse_from(["photocat", "-v", "tag", "/photos", "--mode", "single"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Tag(args) => {
                assert_eq!(args.root, Some(PathBuf::from("/photos")));
                assert!(args.mode.is_some());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_export_format() {
        let cli = Cli::try_parse_from(["photocat", "export", "--format", "jsonl"]).unwrap();
        assert!(matches!(cli.command, Commands::Export(_)));

        assert!(Cli::try_parse_from(["photocat", "export", "--format", "csv"]).is_err());
    }
}
