use crate::sink::ResponseSink;
use crate::sniff;
use crate::writer::GzipWriter;
use compression_core::Level;
use http::{HeaderMap, HeaderValue, StatusCode, header};
use std::fmt;
use std::io::{self, Write};

/// A response sink that gzip-compresses the body on its way to the real sink.
///
/// Handlers use it exactly like the sink it wraps. The content type is sniffed
/// from the first uncompressed write when the handler never set one, and
/// `Content-Length` is dropped when the status is committed because it
/// describes the uncompressed body.
pub struct GzipResponseSink<S: ResponseSink> {
    writer: GzipWriter<S>,
    wrote_header: bool,
}

impl<S: ResponseSink> GzipResponseSink<S> {
    /// Wraps `sink`, compressing at the given level.
    ///
    /// Does not touch `Content-Encoding`; the caller is expected to have set it.
    pub fn new(sink: S, level: Level) -> Self {
        Self {
            writer: GzipWriter::new(sink, level),
            wrote_header: false,
        }
    }

    /// Returns a reference to the real sink.
    pub fn get_ref(&self) -> &S {
        self.writer.get_ref()
    }

    /// Returns whether the status has been committed through this sink.
    pub fn wrote_header(&self) -> bool {
        self.wrote_header
    }

    /// Writes the gzip trailer into the real sink.
    ///
    /// If nothing committed the status yet, `Content-Length` is removed first so
    /// the real sink's default commit cannot advertise the uncompressed length.
    pub fn finish(&mut self) -> io::Result<()> {
        if !self.wrote_header && !self.writer.is_finished() {
            self.headers_mut().remove(header::CONTENT_LENGTH);
        }
        self.writer.try_finish()
    }
}

impl<S: ResponseSink> ResponseSink for GzipResponseSink<S> {
    fn headers(&self) -> &HeaderMap {
        self.writer.get_ref().headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.writer.get_mut().headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.wrote_header {
            return;
        }

        // Compressed size is unknown
        self.headers_mut().remove(header::CONTENT_LENGTH);
        self.writer.get_mut().write_header(status);
        self.wrote_header = true;
    }
}

impl<S: ResponseSink> Write for GzipResponseSink<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.wrote_header {
            // Sniff before the bytes reach the encoder
            if !self.headers().contains_key(header::CONTENT_TYPE) {
                let content_type = sniff::detect_content_type(buf);
                self.headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
            }
            self.write_header(StatusCode::OK);
        }

        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        // Nothing to send yet; flushing the encoder now would commit the real
        // sink before the first write could sniff and drop Content-Length
        if !self.wrote_header {
            self.headers_mut().remove(header::CONTENT_LENGTH);
            return Ok(());
        }
        self.writer.flush()
    }
}

impl<S: ResponseSink> Drop for GzipResponseSink<S> {
    fn drop(&mut self) {
        // Reached without finish() when the handler unwinds
        let _ = self.finish();
    }
}

impl<S: ResponseSink + fmt::Debug> fmt::Debug for GzipResponseSink<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GzipResponseSink")
            .field("writer", &self.writer)
            .field("wrote_header", &self.wrote_header)
            .finish()
    }
}
