use crate::adapter::GzipResponseSink;
use crate::codec::{AcceptEncodingMatch, GZIP};
use crate::handler::Handler;
use crate::sink::ResponseSink;
use compression_core::Level;
use http::{HeaderMap, HeaderValue, Request, header};
use std::io;

/// Wraps `inner` so that its responses are gzip-compressed for clients that
/// accept it.
pub fn wrap<H>(inner: H) -> GzipHandler<H> {
    GzipHandler::new(inner)
}

/// A handler that transparently gzip-compresses the response of its inner
/// handler.
///
/// Every response gets `Vary: Accept-Encoding`. When the request accepts gzip,
/// `Content-Encoding: gzip` is set and the inner handler writes into a
/// [`GzipResponseSink`]; the gzip stream is closed when the inner handler
/// returns, including when it fails or panics.
#[derive(Debug, Clone)]
pub struct GzipHandler<H> {
    inner: H,
    level: Level,
    accept_encoding_match: AcceptEncodingMatch,
}

impl<H> GzipHandler<H> {
    /// Creates a new gzip handler wrapping the given inner handler.
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            level: Level::Default,
            accept_encoding_match: AcceptEncodingMatch::default(),
        }
    }

    /// Sets the compression level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets how the `Accept-Encoding` header is matched.
    pub fn accept_encoding_match(mut self, accept_encoding_match: AcceptEncodingMatch) -> Self {
        self.accept_encoding_match = accept_encoding_match;
        self
    }

    /// Returns a reference to the inner handler.
    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Returns a mutable reference to the inner handler.
    pub fn inner_mut(&mut self) -> &mut H {
        &mut self.inner
    }

    /// Consumes this handler, returning the inner handler.
    pub fn into_inner(self) -> H {
        self.inner
    }

    fn accepts_gzip<B>(&self, req: &Request<B>) -> bool {
        req.headers()
            .get(header::ACCEPT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| self.accept_encoding_match.accepts_gzip(v))
    }
}

impl<B, H> Handler<B> for GzipHandler<H>
where
    H: Handler<B>,
{
    fn handle(&self, req: &Request<B>, sink: &mut dyn ResponseSink) -> io::Result<()> {
        add_vary_accept_encoding(sink.headers_mut());

        if !self.accepts_gzip(req) {
            tracing::trace!("gzip not accepted, passing response through");
            return self.inner.handle(req, sink);
        }

        tracing::trace!(level = ?self.level, "compressing response with gzip");
        sink.headers_mut()
            .insert(header::CONTENT_ENCODING, HeaderValue::from_static(GZIP));

        let mut gzip_sink = GzipResponseSink::new(sink, self.level);
        let result = self.inner.handle(req, &mut gzip_sink);
        let finished = gzip_sink.finish();
        result.and(finished)
    }
}

/// Adds Accept-Encoding to the Vary header if not already present.
fn add_vary_accept_encoding(headers: &mut HeaderMap) {
    // Check all Vary headers to see if Accept-Encoding is already present
    for vary in headers.get_all(header::VARY) {
        if let Ok(vary_str) = vary.to_str() {
            let covered = vary_str.split(',').any(|v| {
                let v = v.trim();
                v == "*" || v.eq_ignore_ascii_case("accept-encoding")
            });
            if covered {
                return;
            }
        }
    }

    headers.append(header::VARY, HeaderValue::from_static("Accept-Encoding"));
}
