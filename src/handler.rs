use crate::sink::ResponseSink;
use http::Request;
use std::fmt;
use std::io;
use std::sync::Arc;

/// A unit of request handling logic that writes its response into a sink.
///
/// Implementations must not assume anything about the concrete sink type: a
/// handler may be given the server's own sink or a wrapper around it.
pub trait Handler<B> {
    /// Handles `req`, writing the response into `sink`.
    fn handle(&self, req: &Request<B>, sink: &mut dyn ResponseSink) -> io::Result<()>;
}

impl<B, H: Handler<B> + ?Sized> Handler<B> for &H {
    fn handle(&self, req: &Request<B>, sink: &mut dyn ResponseSink) -> io::Result<()> {
        (**self).handle(req, sink)
    }
}

impl<B, H: Handler<B> + ?Sized> Handler<B> for Arc<H> {
    fn handle(&self, req: &Request<B>, sink: &mut dyn ResponseSink) -> io::Result<()> {
        (**self).handle(req, sink)
    }
}

/// Returns a [`Handler`] that calls `f`.
///
/// ```ignore
/// use gzip_handler::{ResponseSink, handler_fn};
/// use std::io::Write;
///
/// let hello = handler_fn(|_req: &http::Request<()>, sink: &mut dyn ResponseSink| {
///     sink.write_all(b"hello")
/// });
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn { f }
}

/// A [`Handler`] implemented by a closure. Created by [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn")
            .field("f", &format_args!("{}", std::any::type_name::<F>()))
            .finish()
    }
}

impl<B, F> Handler<B> for HandlerFn<F>
where
    F: Fn(&Request<B>, &mut dyn ResponseSink) -> io::Result<()>,
{
    fn handle(&self, req: &Request<B>, sink: &mut dyn ResponseSink) -> io::Result<()> {
        (self.f)(req, sink)
    }
}
