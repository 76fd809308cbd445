//! Configuration loading and shared application state.
//!
//! Settings come from an optional `config` file in the working directory,
//! layered over built-in defaults. The `PORT` environment variable is the one
//! documented runtime knob and overrides everything else.

use serde::Deserialize;
use std::net::SocketAddr;

use crate::content::SiteContent;
use crate::error::ServeError;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub content: ContentConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Where the two documents are loaded from.
#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    /// Build output directory holding `index.html`.
    pub dist_dir: String,
    /// Static assets directory holding `404.html`.
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    pub access_log_format: String,
}

impl Config {
    /// Load configuration from the default `config` file (any supported
    /// extension), falling back to built-in defaults when it is absent.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the given file path (without extension).
    ///
    /// `PORT`, when set and non-empty, overrides `server.port` from both the
    /// file and the defaults. An empty value counts as unset; a value that
    /// does not deserialize into a port number is an error.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let port_override = std::env::var("PORT").ok().filter(|port| !port.is_empty());

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("content.dist_dir", "dist")?
            .set_default("content.static_dir", "static")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_override_option("server.port", port_override)?
            .build()?;

        settings.try_deserialize()
    }

    /// Resolve the listen address from the configured host and port.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServeError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ServeError::ListenAddr { addr, source })
    }
}

/// Shared state handed to every request handler.
///
/// Built once at startup, after both documents loaded successfully, and never
/// mutated afterwards. Handlers receive it behind an `Arc`.
pub struct AppState {
    pub config: Config,
    pub content: SiteContent,
}

impl AppState {
    pub fn new(config: Config, content: SiteContent) -> Self {
        Self { config, content }
    }
}
