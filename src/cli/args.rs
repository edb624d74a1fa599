//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CONFIG_FILE;

/// Bundle static content and serve it under versioned URLs
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path
    #[arg(short = 'C', long, global = true, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve versioned bundle URLs over HTTP
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the markup (or content) of a bundle
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// List registered bundles with their version tokens
    #[command(visible_alias = "l")]
    List,
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Bundle name
    pub bundle: String,

    /// Emit link tags to versioned URLs instead of inline content
    #[arg(short, long)]
    pub linked: bool,

    /// One tag per asset instead of one for the whole bundle
    #[arg(short, long)]
    pub split: bool,

    /// Print processed content without any tag
    #[arg(short, long, conflicts_with_all = ["linked", "split"])]
    pub raw: bool,

    /// Skip all processors (only with --raw)
    #[arg(long, requires = "raw")]
    pub unprocessed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from(["compressor", "render", "site", "--linked", "-s"]).unwrap();
        let Commands::Render { args } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.bundle, "site");
        assert!(args.linked);
        assert!(args.split);
        assert!(!args.raw);
        assert_eq!(cli.config, PathBuf::from(CONFIG_FILE));
    }

    #[test]
    fn test_raw_conflicts_with_linked() {
        assert!(Cli::try_parse_from(["compressor", "render", "site", "--raw", "--linked"]).is_err());
        assert!(Cli::try_parse_from(["compressor", "render", "site", "--unprocessed"]).is_err());
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["compressor", "-C", "x.toml", "serve", "-p", "8080"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080), interface: None }));
    }
}
