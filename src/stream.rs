//! Async driver writing commands to a server stream and framing its replies

use log::{debug, trace};

use crate::buffer::ReceiveBuffer;
use crate::codec::ClientCodec;
use crate::commands::ClientCommand;
use crate::decoder::{ResponseCollector, ResponseDecoder, ResponseHandler};
use crate::error::{DecodeResult, Error};
use crate::response::ResponseGroup;
use crate::runtime::{Read, ReadExt, Write, WriteExt};

/// Default size of a single read from the transport
pub const DEFAULT_READ_CHUNK_SIZE: usize = 4096;
/// Default bound on the bytes buffered without a complete reply
pub const DEFAULT_MAX_BUFFERED: usize = 1024 * 1024;

/// Contains stream configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-impls",
    derive(serde_derive::Serialize, serde_derive::Deserialize)
)]
pub struct StreamConfig {
    /// Bytes requested from the transport per read
    read_chunk_size: usize,
    /// Unconsumed bytes allowed in the receive buffer, `None` for no limit
    max_buffered: Option<usize>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the `SmtpStream` configuration
impl StreamConfig {
    /// Creates a new configuration.
    ///
    /// Defaults are:
    ///
    /// * 4096 bytes per read
    /// * at most 1 MiB buffered without a complete reply
    pub fn new() -> Self {
        StreamConfig {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            max_buffered: Some(DEFAULT_MAX_BUFFERED),
        }
    }

    /// Set the number of bytes requested per read, at least one
    pub fn read_chunk_size(self, size: usize) -> StreamConfig {
        Self {
            read_chunk_size: size.max(1),
            ..self
        }
    }

    /// Set the bound on unconsumed bytes, `None` to disable it
    pub fn max_buffered(self, limit: Option<usize>) -> StreamConfig {
        Self {
            max_buffered: limit,
            ..self
        }
    }
}

/// Read side of the stream: the receive buffer and its end-of-stream state
#[derive(Debug)]
struct ReadState {
    config: StreamConfig,
    buffer: ReceiveBuffer,
    chunk: Vec<u8>,
    eof: bool,
}

impl ReadState {
    /// Reads once from `inner` and delivers every complete group.
    ///
    /// Returns `false` once end-of-stream was reached and the handler was
    /// disconnected.
    async fn fill<R, H>(&mut self, inner: &mut R, handler: &mut H) -> DecodeResult<bool>
    where
        R: Read + Unpin,
        H: ResponseHandler + ?Sized,
    {
        if self.eof {
            return Ok(false);
        }

        let read = inner.read(&mut self.chunk).await?;
        if read == 0 {
            self.eof = true;
            debug!("end of stream");
            ResponseDecoder::new(&mut self.buffer, handler).decode_last()?;
            return Ok(false);
        }

        self.buffer.extend_from_slice(&self.chunk[..read]);
        trace!("read {} bytes, {} buffered", read, self.buffer.len());
        ResponseDecoder::new(&mut self.buffer, handler).decode_all()?;

        if let Some(limit) = self.config.max_buffered {
            if self.buffer.len() > limit {
                return Err(Error::BufferLimitExceeded(limit));
            }
        }
        Ok(true)
    }
}

/// SMTP stream.
///
/// Writes encoded commands to the wrapped stream and frames the replies read
/// from it.
#[derive(Debug)]
pub struct SmtpStream<S: Read + Write + Unpin> {
    /// Inner stream.
    inner: S,
    codec: ClientCodec,
    state: ReadState,
    /// Groups decoded for `read_response`
    responses: ResponseCollector,
}

impl<S: Read + Write + Unpin> SmtpStream<S> {
    /// Creates new SMTP stream.
    pub fn new(stream: S) -> Self {
        Self::with_config(stream, StreamConfig::default())
    }

    /// Creates new SMTP stream with the given configuration.
    pub fn with_config(stream: S, config: StreamConfig) -> Self {
        Self {
            inner: stream,
            codec: ClientCodec::new(),
            state: ReadState {
                config,
                buffer: ReceiveBuffer::with_capacity(config.read_chunk_size),
                chunk: vec![0; config.read_chunk_size],
                eof: false,
            },
            responses: ResponseCollector::new(),
        }
    }

    /// Returns inner stream.
    ///
    /// Should only be used when there are no unread responses,
    /// because buffered bytes are lost.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Bytes received and not yet part of a complete reply
    pub fn buffered(&self) -> &[u8] {
        self.state.buffer.unconsumed()
    }

    /// Tells if the server closed the connection
    pub fn is_closed(&self) -> bool {
        self.state.eof
    }

    /// Send the given SMTP command to the server and reads its reply.
    pub async fn command(&mut self, command: &ClientCommand) -> DecodeResult<ResponseGroup> {
        self.send_command(command).await?;
        self.read_response().await
    }

    /// Sends the given SMTP command to the server without waiting for response.
    pub async fn send_command(&mut self, command: &ClientCommand) -> DecodeResult<()> {
        let mut bytes = Vec::new();
        self.codec.encode(command, &mut bytes);
        self.write(&bytes).await
    }

    /// Writes the given data to the server.
    async fn write(&mut self, bytes: &[u8]) -> DecodeResult<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.inner.write_all(bytes).await?;
        self.inner.flush().await?;

        debug!(">> {}", escape_crlf(String::from_utf8_lossy(bytes).as_ref()));
        Ok(())
    }

    /// Reads once from the server, passing complete replies to `handler`.
    ///
    /// Returns `false` once the server closed the connection; `handler` has
    /// then been disconnected.
    pub async fn fill<H>(&mut self, handler: &mut H) -> DecodeResult<bool>
    where
        H: ResponseHandler + ?Sized,
    {
        self.state.fill(&mut self.inner, handler).await
    }

    /// Passes every reply to `handler` until the server closes the connection.
    pub async fn run<H: ResponseHandler + ?Sized>(&mut self, handler: &mut H) -> DecodeResult<()> {
        while self.fill(handler).await? {}
        Ok(())
    }

    /// Read an SMTP response from the wire.
    pub async fn read_response(&mut self) -> DecodeResult<ResponseGroup> {
        loop {
            if let Some(group) = self.responses.pop() {
                return Ok(group);
            }
            if !self.state.fill(&mut self.inner, &mut self.responses).await? {
                return Err(Error::UnexpectedEof);
            }
        }
    }
}

/// Returns the string replacing all the CRLF with "\<CRLF\>"
/// Used for debug displays
fn escape_crlf(string: &str) -> String {
    string.replace("\r\n", "<CRLF>")
}
