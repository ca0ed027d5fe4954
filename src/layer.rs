use crate::codec::AcceptEncodingMatch;
use crate::gzip::GzipHandler;
use compression_core::Level;
use tower::Layer;

/// A Tower layer that gzip-compresses the responses of handlers.
///
/// This layer wraps [`Handler`](crate::Handler)s in a [`GzipHandler`].
#[derive(Debug, Clone)]
pub struct GzipLayer {
    level: Level,
    accept_encoding_match: AcceptEncodingMatch,
}

impl GzipLayer {
    /// Creates a new gzip layer with default settings.
    ///
    /// The default compression level is [`Level::Default`] and the
    /// `Accept-Encoding` header is parsed as a token list.
    pub fn new() -> Self {
        Self {
            level: Level::Default,
            accept_encoding_match: AcceptEncodingMatch::Tokens,
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
}

impl Default for GzipLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Layer<H> for GzipLayer {
    type Service = GzipHandler<H>;

    fn layer(&self, inner: H) -> Self::Service {
        GzipHandler::new(inner)
            .level(self.level)
            .accept_encoding_match(self.accept_encoding_match)
    }
}
