use crate::sink::ResponseSink;
use crate::sniff;
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderValue, Response, StatusCode, header};
use http_body_util::Full;
use std::io;

/// An in-memory response sink.
///
/// Behaves like the response writer of an HTTP server: the first body write
/// commits `200 OK` and, when neither `Content-Type` nor `Content-Encoding` is
/// set, sniffs the content type from that write. Headers are snapshotted at
/// commit time; later changes are not part of the response.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    headers: HeaderMap,
    committed: Option<Committed>,
    body: BytesMut,
}

#[derive(Debug)]
struct Committed {
    status: StatusCode,
    headers: HeaderMap,
}

impl BufferedResponse {
    /// Creates an empty, uncommitted response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the committed status, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.committed.as_ref().map(|c| c.status)
    }

    /// Returns whether the status line and headers have been committed.
    pub fn is_committed(&self) -> bool {
        self.committed.is_some()
    }

    /// Returns the body bytes written so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the sink, committing `200 OK` if nothing was committed yet.
    pub fn into_response(mut self) -> Response<Full<Bytes>> {
        let Committed { status, headers } = match self.committed.take() {
            Some(committed) => committed,
            None => Committed {
                status: StatusCode::OK,
                headers: self.headers,
            },
        };

        let mut response = Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

impl ResponseSink for BufferedResponse {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        if let Some(committed) = &self.committed {
            tracing::warn!(
                status = %status,
                committed = %committed.status,
                "superfluous write_header call"
            );
            return;
        }

        self.committed = Some(Committed {
            status,
            headers: self.headers.clone(),
        });
    }
}

impl io::Write for BufferedResponse {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.committed.is_none() {
            if !buf.is_empty()
                && !self.headers.contains_key(header::CONTENT_TYPE)
                && !self.headers.contains_key(header::CONTENT_ENCODING)
            {
                self.headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(sniff::detect_content_type(buf)),
                );
            }
            self.write_header(StatusCode::OK);
        }

        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
