//! Compressor - bundle static content and serve it under versioned URLs.

use anyhow::Result;
use clap::{ColorChoice, Parser};

use compressor::cli::{self, Cli, Commands};
use compressor::config::Config;
use compressor::{Compressor, log, logger, serve};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli.config)?;
    let compressor = Compressor::from_config(&config)?;

    match &cli.command {
        Commands::Serve { interface, port } => {
            serve::setup_shutdown_handler()?;
            cli::serve(compressor, &config.serve, *interface, *port)
        }
        Commands::Render { args } => {
            println!("{}", cli::render(&compressor, args)?);
            Ok(())
        }
        Commands::List => {
            let listing = cli::list(&compressor)?;
            if listing.is_empty() {
                log!("bundle"; "no bundles declared in {}", cli.config.display());
            } else {
                print!("{listing}");
            }
            Ok(())
        }
    }
}
