//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 5278                 # First port tried, up to 10 successive ports
//! prefix = "/_compressor"     # URL prefix of versioned routes
//! threads = 4                 # Request worker threads
//! ```

use std::net::{IpAddr, Ipv4Addr};

use serde::Deserialize;

use crate::serve::route::DEFAULT_PREFIX;

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// URL prefix linked URLs are built under and routes are mounted at.
    pub prefix: String,

    pub threads: usize,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5278,
            prefix: DEFAULT_PREFIX.to_string(),
            threads: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use crate::config::test_parse_config;

    #[test]
    fn test_serve_config() {
        let config = test_parse_config(
            "[serve]\ninterface = \"0.0.0.0\"\nport = 8080\nprefix = \"/static\"\nthreads = 2",
        );

        assert_eq!(config.serve.interface, IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.serve.prefix, "/static");
        assert_eq!(config.serve.threads, 2);
    }

    #[test]
    fn test_serve_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.serve.interface, IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(config.serve.port, 5278);
        assert_eq!(config.serve.prefix, "/_compressor");
        assert_eq!(config.serve.threads, 4);
    }
}
