//! Transparent gzip compression for writer-style HTTP handlers.
//!
//! A [`Handler`] writes its response into a [`ResponseSink`]: it sets headers,
//! optionally commits a status, and writes body bytes. Wrapping a handler with
//! [`wrap`] (or [`GzipLayer`]) compresses that body on the fly whenever the
//! client accepts gzip, without the handler noticing.
//!
//! # Example
//!
//! ```ignore
//! use gzip_handler::{GzipLayer, HandlerService, ResponseSink, handler_fn};
//! use std::io::Write;
//! use tower::ServiceBuilder;
//!
//! let handler = ServiceBuilder::new()
//!     .layer(GzipLayer::new())
//!     .service(handler_fn(|_req: &http::Request<()>, sink: &mut dyn ResponseSink| {
//!         sink.write_all(b"<html><body>hello</body></html>")
//!     }));
//! let service = HandlerService::new(handler);
//! ```
//!
//! # Response Modifications
//!
//! Always:
//! - `Vary` header includes `Accept-Encoding`
//!
//! When the request's `Accept-Encoding` allows gzip:
//! - `Content-Encoding` header is set to `gzip`
//! - `Content-Length` header is removed (compressed size is unknown)
//! - `Content-Type` is sniffed from the first uncompressed write if the
//!   handler did not set one
//!
//! The gzip stream is closed when the wrapped handler returns, whether it
//! succeeds, fails, or panics.

#![deny(missing_docs)]

mod adapter;
mod codec;
mod gzip;
mod handler;
mod layer;
mod response;
mod service;
mod sink;
pub mod sniff;
mod writer;

pub use adapter::GzipResponseSink;
pub use codec::{AcceptEncodingMatch, GZIP};
pub use compression_core::Level;
pub use gzip::{GzipHandler, wrap};
pub use handler::{Handler, HandlerFn, handler_fn};
pub use layer::GzipLayer;
pub use response::BufferedResponse;
pub use service::HandlerService;
pub use sink::ResponseSink;
pub use writer::GzipWriter;
