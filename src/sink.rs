use http::{HeaderMap, StatusCode};
use std::io;

/// The capability set a handler writes its response through.
///
/// Body bytes go through the [`io::Write`] supertrait. The first body write
/// commits a `200 OK` status if [`write_header`](ResponseSink::write_header)
/// has not been called yet. Header changes made after the commit are not sent.
pub trait ResponseSink: io::Write {
    /// Returns the response headers.
    fn headers(&self) -> &HeaderMap;

    /// Returns the response headers for mutation.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Commits the status line and the current headers.
    fn write_header(&mut self, status: StatusCode);
}

impl<S: ResponseSink + ?Sized> ResponseSink for &mut S {
    fn headers(&self) -> &HeaderMap {
        (**self).headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        (**self).write_header(status)
    }
}
