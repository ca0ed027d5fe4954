use crate::handler::Handler;
use crate::response::BufferedResponse;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use std::future::{Ready, ready};
use std::io;
use std::task::{Context, Poll};
use tower::Service;

/// A Tower service that runs a [`Handler`] against an in-memory response.
///
/// The whole response is produced while `call` runs, so the returned future
/// is always ready.
#[derive(Debug, Clone)]
pub struct HandlerService<H> {
    handler: H,
}

impl<H> HandlerService<H> {
    /// Creates a new service running the given handler.
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    /// Returns a reference to the handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Consumes this service, returning the handler.
    pub fn into_inner(self) -> H {
        self.handler
    }
}

impl<H, ReqBody> Service<Request<ReqBody>> for HandlerService<H>
where
    H: Handler<ReqBody>,
{
    type Response = Response<Full<Bytes>>;
    type Error = io::Error;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let mut sink = BufferedResponse::new();
        let result = self.handler.handle(&req, &mut sink);
        ready(result.map(|()| sink.into_response()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::GzipLayer;
    use crate::sink::ResponseSink;
    use flate2::read::GzDecoder;
    use http::{StatusCode, header};
    use http_body::Body;
    use std::io::{Read, Write};
    use std::pin::Pin;
    use tower::{Layer, ServiceBuilder};

    fn not_found(_req: &Request<()>, sink: &mut dyn ResponseSink) -> io::Result<()> {
        sink.write_header(StatusCode::NOT_FOUND);
        sink.write_all(b"no such page, sorry")
    }

    fn collect_body(mut body: Full<Bytes>) -> Vec<u8> {
        let waker = std::task::Waker::noop();
        let mut cx = Context::from_waker(waker);
        let mut out = Vec::new();
        while let Poll::Ready(Some(frame)) = Pin::new(&mut body).poll_frame(&mut cx) {
            if let Ok(data) = frame.unwrap().into_data() {
                out.extend_from_slice(&data);
            }
        }
        out
    }

    fn call<H: Handler<()>>(
        service: &mut HandlerService<H>,
        accept_encoding: &'static str,
    ) -> Response<Full<Bytes>> {
        let req = Request::builder()
            .header(header::ACCEPT_ENCODING, accept_encoding)
            .body(())
            .unwrap();
        service.call(req).into_inner().unwrap()
    }

    #[test]
    fn test_service_without_layer() {
        let mut service = HandlerService::new(crate::handler_fn(not_found));
        let response = call(&mut service, "gzip");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
        assert_eq!(collect_body(response.into_body()), b"no such page, sorry");
    }

    #[test]
    fn test_service_with_layer() {
        let handler = ServiceBuilder::new()
            .layer(GzipLayer::new())
            .service(crate::handler_fn(not_found));
        let mut service = HandlerService::new(handler);
        let response = call(&mut service, "gzip");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_ENCODING).unwrap(),
            "gzip"
        );
        assert_eq!(
            response.headers().get(header::VARY).unwrap(),
            "Accept-Encoding"
        );

        let compressed = collect_body(response.into_body());
        let mut body = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut body)
            .unwrap();
        assert_eq!(body, b"no such page, sorry");
    }

    #[test]
    fn test_layer_passthrough_for_identity() {
        let handler = GzipLayer::new().layer(crate::handler_fn(not_found));
        let mut service = HandlerService::new(handler);
        let response = call(&mut service, "identity");

        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
        assert_eq!(collect_body(response.into_body()), b"no such page, sorry");
    }

    #[test]
    fn test_handler_error_is_service_error() {
        let failing = crate::handler_fn(
            |_req: &Request<()>, _sink: &mut dyn ResponseSink| -> io::Result<()> {
                Err(io::Error::from(io::ErrorKind::ConnectionReset))
            },
        );
        let mut service = HandlerService::new(failing);
        let req = Request::new(());

        let err = service.call(req).into_inner().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }
}
