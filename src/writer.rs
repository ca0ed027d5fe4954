use crate::codec;
use compression_codecs::EncodeV2;
use compression_core::Level;
use compression_core::util::{PartialBuffer, WriteBuffer};
use std::fmt;
use std::io::{self, Write};

const OUTPUT_BUFFER_SIZE: usize = 8 * 1024; // 8KB output buffer

/// A streaming gzip compressor writing into an underlying writer.
///
/// Bytes are compressed as they are written and forwarded in order. The gzip
/// trailer is written by [`try_finish`](GzipWriter::try_finish), or when the
/// writer is dropped, whichever comes first.
pub struct GzipWriter<W: Write> {
    inner: W,
    encoder: Box<dyn EncodeV2 + Send>,
    output_buffer: Vec<u8>,
    state: WriterState,
}

/// State machine for the compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    /// Accepting input.
    Encoding,
    /// Trailer written, no more input is accepted.
    Finished,
}

impl<W: Write> GzipWriter<W> {
    /// Creates a new compressor at the given level writing into `inner`.
    pub fn new(inner: W, level: Level) -> Self {
        Self::with_buffer_size(inner, level, OUTPUT_BUFFER_SIZE)
    }

    fn with_buffer_size(inner: W, level: Level, buffer_size: usize) -> Self {
        Self {
            inner,
            encoder: codec::encoder(level),
            output_buffer: vec![0u8; buffer_size],
            state: WriterState::Encoding,
        }
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Returns a mutable reference to the underlying writer.
    ///
    /// Writing to it directly corrupts the compressed stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Returns whether the gzip trailer has been written.
    pub fn is_finished(&self) -> bool {
        self.state == WriterState::Finished
    }

    /// Writes all remaining compressed data and the gzip trailer.
    ///
    /// Only the first call does any work: after a failure the stream is
    /// considered finished as well, and later calls return `Ok(())`.
    pub fn try_finish(&mut self) -> io::Result<()> {
        if self.state == WriterState::Finished {
            return Ok(());
        }

        let result = self.finish_encoder();
        self.state = WriterState::Finished;
        result
    }

    fn finish_encoder(&mut self) -> io::Result<()> {
        loop {
            let mut output = WriteBuffer::new_initialized(self.output_buffer.as_mut_slice());
            let done = self.encoder.finish(&mut output).map_err(io::Error::other)?;
            let written = output.written_len();

            if written > 0 {
                self.inner.write_all(&self.output_buffer[..written])?;
            }
            if done {
                return Ok(());
            }
            if written == 0 {
                return Err(no_progress());
            }
        }
    }
}

impl<W: Write> Write for GzipWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.state == WriterState::Finished {
            return Err(io::Error::other("write after gzip stream was finished"));
        }

        let mut input = PartialBuffer::new(buf);

        // Keep encoding until all input is consumed
        loop {
            let consumed = input.written_len();
            let mut output = WriteBuffer::new_initialized(self.output_buffer.as_mut_slice());
            self.encoder
                .encode(&mut input, &mut output)
                .map_err(io::Error::other)?;
            let written = output.written_len();

            if written > 0 {
                self.inner.write_all(&self.output_buffer[..written])?;
            }

            if input.written_len() >= buf.len() {
                break;
            }

            if written == 0 && input.written_len() == consumed {
                // Report what was accepted so far, fail only if nothing was
                if consumed == 0 {
                    return Err(no_progress());
                }
                break;
            }
        }

        Ok(input.written_len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.state == WriterState::Encoding {
            loop {
                let mut output = WriteBuffer::new_initialized(self.output_buffer.as_mut_slice());
                let done = self.encoder.flush(&mut output).map_err(io::Error::other)?;
                let written = output.written_len();

                if written > 0 {
                    self.inner.write_all(&self.output_buffer[..written])?;
                }
                if done {
                    break;
                }
                if written == 0 {
                    return Err(no_progress());
                }
            }
        }

        self.inner.flush()
    }
}

fn no_progress() -> io::Error {
    io::Error::other("gzip encoder made no progress")
}

impl<W: Write> Drop for GzipWriter<W> {
    fn drop(&mut self) {
        // There is nobody to report a failure to at this point
        let _ = self.try_finish();
    }
}

impl<W: Write + fmt::Debug> fmt::Debug for GzipWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GzipWriter")
            .field("inner", &self.inner)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
