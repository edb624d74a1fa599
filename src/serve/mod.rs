//! HTTP surface for versioned bundle and asset URLs.
//!
//! [`handler`] holds the transport-independent fetch logic; this module only
//! binds a tiny_http server and feeds requests to it from a thread pool.

pub mod handler;
mod lifecycle;
mod response;
pub mod route;

pub use lifecycle::{is_shutdown, setup_shutdown_handler};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Method, Request, Server};

use crate::compressor::Compressor;
use crate::config::ServeConfig;
use crate::{debug, log};
use handler::Reply;

/// Bound server ready to accept requests.
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    threads: usize,
}

/// Bind the HTTP server without starting the request loop.
pub fn bind_server(config: &ServeConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.interface, config.port)?;
    let server = Arc::new(server);
    lifecycle::register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        addr,
        threads: config.threads.max(1),
    })
}

impl BoundServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the request loop until the server is unblocked (blocking).
    pub fn run(self, compressor: Arc<Compressor>) -> Result<()> {
        // Processors may be slow; one request must not stall the others.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .context("failed to create request thread pool")?;

        for request in self.server.incoming_requests() {
            let compressor = Arc::clone(&compressor);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &compressor) {
                    log!("serve"; "request error: {e}");
                }
            });
        }
        Ok(())
    }
}

/// Handle a single HTTP request.
fn handle_request(request: Request, compressor: &Compressor) -> Result<()> {
    if is_shutdown() {
        return response::send(request, Reply::unavailable(), false);
    }

    let head = match request.method() {
        Method::Get => false,
        Method::Head => true,
        other => {
            debug!("serve"; "405 {} {}", other, request.url());
            return response::send(request, Reply::method_not_allowed(), false);
        }
    };

    let reply = handler::handle(compressor, request.url());
    debug!("serve"; "{} {}", reply.status, request.url());
    response::send(request, reply, head)
}
