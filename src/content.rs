//! Site content loading.
//!
//! The two documents this server can ever produce are read from disk exactly
//! once, before the listener exists. They are kept as refcounted byte buffers
//! and never mutated afterwards, so request handling needs no locking and
//! repeated responses are byte-identical.

use hyper::body::Bytes;
use std::path::Path;

use crate::config::ContentConfig;
use crate::error::ServeError;

/// File name of the index document inside the build output directory.
const INDEX_FILE: &str = "index.html";

/// File name of the not-found document inside the static assets directory.
const NOT_FOUND_FILE: &str = "404.html";

/// The two pre-loaded response bodies.
#[derive(Debug, Clone)]
pub struct SiteContent {
    /// Served with status 200 for the root path.
    pub index: Bytes,
    /// Served with status 404 for every other path.
    pub not_found: Bytes,
}

impl SiteContent {
    /// Read both documents from their configured directories.
    ///
    /// Called once at startup, before the runtime is built. An unreadable
    /// document comes back as an error naming the path; the bootstrap turns
    /// that into a fatal diagnostic instead of serving without content.
    pub fn load(config: &ContentConfig) -> Result<Self, ServeError> {
        let index = read_document(&Path::new(&config.dist_dir).join(INDEX_FILE))?;
        let not_found = read_document(&Path::new(&config.static_dir).join(NOT_FOUND_FILE))?;

        Ok(Self { index, not_found })
    }
}

/// Read one whole document into an immutable buffer.
///
/// An empty file is a valid document; only a failed read is an error. The
/// bytes are served as-is, so no UTF-8 validation happens here.
fn read_document(path: &Path) -> Result<Bytes, ServeError> {
    std::fs::read(path)
        .map(Bytes::from)
        .map_err(|source| ServeError::ContentLoad {
            path: path.to_path_buf(),
            source,
        })
}
