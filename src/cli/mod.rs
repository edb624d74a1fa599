//! Subcommand implementations.

mod args;

pub use args::{Cli, Commands, RenderArgs};

use std::fmt::Write;
use std::net::IpAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::bundle::RenderMode;
use crate::compressor::Compressor;
use crate::config::ServeConfig;
use crate::serve;

/// Bind and run the HTTP server until Ctrl+C.
pub fn serve(
    compressor: Compressor,
    config: &ServeConfig,
    interface: Option<IpAddr>,
    port: Option<u16>,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(interface) = interface {
        config.interface = interface;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let bound = serve::bind_server(&config)?;
    bound.run(Arc::new(compressor))
}

/// Markup or content of one bundle, as requested by `args`.
pub fn render(compressor: &Compressor, args: &RenderArgs) -> Result<String> {
    let mut scope = compressor.scope();

    if args.raw {
        let bundle = compressor.bundles().get(&args.bundle)?;
        let content = bundle
            .get_content(&mut scope, !args.unprocessed)
            .with_context(|| format!("failed to process bundle `{}`", args.bundle))?;
        return Ok(content);
    }

    let mut mode = if args.linked {
        RenderMode::LINKED
    } else {
        RenderMode::INLINE
    };
    if args.split {
        mode = mode.split();
    }

    compressor
        .render(&mut scope, &args.bundle, mode)
        .with_context(|| format!("failed to render bundle `{}`", args.bundle))
}

/// One line per bundle: name, kind, asset count, version token, URL.
pub fn list(compressor: &Compressor) -> Result<String> {
    let mut out = String::new();
    for name in compressor.bundles().names() {
        let bundle = compressor.bundles().get(&name)?;
        let token = bundle
            .hash(compressor.storage())
            .with_context(|| format!("failed to hash bundle `{name}`"))?
            .token();
        writeln!(
            out,
            "{} {:?} assets={} v={} {}",
            name.bold(),
            bundle.kind(),
            bundle.assets().len(),
            token,
            bundle.url(compressor.prefix(), &token).dimmed()
        )?;
    }
    Ok(out)
}
