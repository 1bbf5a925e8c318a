//! HTTP response shapes.
//!
//! The service has exactly one success shape and three error shapes; every
//! request ends in one of these.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// 201 Created carrying the bundle bytes.
pub fn created(bundle: Vec<u8>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::CREATED)
        .header("content-type", "application/gzip")
        .body(Full::new(Bytes::from(bundle)))
        .unwrap()
}

/// 411 Length Required when the request declared no usable body length.
pub fn length_required() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::LENGTH_REQUIRED)
        .header("content-type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(
            b"The request content appears to be empty.\n",
        )))
        .unwrap()
}

/// 500 carrying the build's captured stderr, verbatim.
pub fn build_failed(stderr: Vec<u8>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header("content-type", "text/plain")
        .body(Full::new(Bytes::from(stderr)))
        .unwrap()
}

/// 500 for infrastructure failures inside the pipeline.
pub fn internal_error() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header("content-type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(b"internal server error\n")))
        .unwrap()
}

/// Empty 404 for every method outside the upload contract; the service
/// exposes no retrievable resources.
pub fn not_found() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Full::new(Bytes::new()))
        .unwrap()
}
