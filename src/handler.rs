//! Request handling.
//!
//! Exactly one route exists: the root path gets the index document, every
//! other path gets the not-found document. The method is deliberately not
//! inspected, so GET, HEAD, POST and the rest all receive the same answer,
//! and neither dispatch outcome can fail once the documents are in memory.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};
use crate::response;

// async without awaits: service_fn expects a future
#[allow(clippy::unused_async)]
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    // The query string plays no part in dispatch; `path()` excludes it, and
    // anything that is not exactly "/" (including "//") is unmatched.
    let (response, body_bytes) = if req.uri().path() == "/" {
        (
            response::build_index_response(&state.content),
            state.content.index.len(),
        )
    } else {
        (
            response::build_not_found_response(&state.content),
            state.content.not_found.len(),
        )
    };

    if state.config.logging.access_log {
        let entry = AccessLogEntry::from_request(&req, peer_addr, response.status(), body_bytes);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}
