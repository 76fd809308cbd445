//! Startup error types.
//!
//! Every variant here is fatal: `main` prints the diagnostic and exits
//! nonzero. Once the server is accepting connections there is no request-level
//! error path at all, so nothing in this module is used after startup.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

/// All errors that can keep the server from starting.
#[derive(Error, Debug)]
pub enum ServeError {
    /// A site document could not be read from disk.
    #[error("failed to load {path}: {source}")]
    ContentLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded or deserialized (this includes a
    /// non-numeric `PORT` value).
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// The configured host/port pair does not form a socket address.
    #[error("invalid listen address '{addr}': {source}")]
    ListenAddr {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    /// The listener could not bind, typically because the port is taken.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The Tokio runtime could not be built.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
