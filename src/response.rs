//! Response construction for the two fixed bodies.
//!
//! Bodies are handed over as raw refcounted bytes; nothing here goes through
//! a formatting primitive. No Content-Type and no caching headers are set
//! either: the documents are served exactly as they were read, and clients
//! get whatever the transport's defaults are.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::content::SiteContent;

/// Build the success response for the root path.
///
/// `Response::new` leaves the status at its default of 200 OK; it is never
/// set explicitly.
pub fn build_index_response(content: &SiteContent) -> Response<Full<Bytes>> {
    Response::new(Full::new(content.index.clone()))
}

/// Build the not-found response for every non-root path.
pub fn build_not_found_response(content: &SiteContent) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Full::new(content.not_found.clone()))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(content.not_found.clone()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
