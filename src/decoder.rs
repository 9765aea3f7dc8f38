//! Incremental framing of server replies
//!
//! A reply may span several lines and arrive in arbitrary fragments. The
//! decoder only hands out complete reply groups and leaves everything else in
//! the receive buffer until more bytes arrive.

use std::collections::VecDeque;
use std::fmt;
use std::str;

use log::{debug, trace, warn};

use crate::buffer::ReceiveBuffer;
use crate::error::DecodeResult;
use crate::response::{parse_server_message, ResponseGroup, ServerMessage};

fn parse_line(raw: &[u8]) -> DecodeResult<ServerMessage> {
    let line = str::from_utf8(raw).map_err(|err| {
        warn!("undecodable reply line: {}", err);
        err
    })?;
    parse_server_message(line).map_err(|err| {
        warn!("{}", err);
        err
    })
}

/// Receiver of the decoded reply groups of one connection
pub trait ResponseHandler {
    /// Called once per complete reply group, in arrival order.
    fn receive(&mut self, group: ResponseGroup);

    /// Called once, when the connection reached end-of-stream.
    fn disconnect(&mut self);
}

/// Outcome of a decode pass
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum DecodingState {
    /// A group was delivered; the buffer may hold another one
    Continue,
    /// The buffered bytes do not hold a complete group
    NeedMoreData,
}

/// Decoder of the replies buffered for one connection
///
/// Borrows the connection's receive buffer and handler for the duration of
/// the decoding; both outlive it.
pub struct ResponseDecoder<'a, H: ResponseHandler + ?Sized> {
    buffer: &'a mut ReceiveBuffer,
    handler: &'a mut H,
}

impl<'a, H: ResponseHandler + ?Sized> fmt::Debug for ResponseDecoder<'a, H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ResponseDecoder")
            .field("buffer", &self.buffer)
            .finish()
    }
}

impl<'a, H: ResponseHandler + ?Sized> ResponseDecoder<'a, H> {
    /// Creates a decoder over `buffer` delivering to `handler`
    pub fn new(buffer: &'a mut ReceiveBuffer, handler: &'a mut H) -> Self {
        ResponseDecoder { buffer, handler }
    }

    /// Extracts the complete reply group held by the buffer, if any.
    ///
    /// Every terminated line is parsed, and the pass delivers all of them as
    /// one group once the last one closes it. Nothing is consumed unless a
    /// group is delivered. A line that is not valid UTF-8 or not a valid
    /// status line is a fatal error.
    pub fn decode(&mut self) -> DecodeResult<DecodingState> {
        // a line may still be split across deliveries
        if !self.buffer.ends_with_crlf() {
            trace!("need more data: {} bytes unterminated", self.buffer.len());
            return Ok(DecodingState::NeedMoreData);
        }
        self.buffer.scan_lines();

        // lines before `parsed` passed an earlier pass that ended on a
        // continuation line
        let parsed = self.buffer.parsed_lines();
        let mut last_closing = false;
        for raw in self.buffer.lines().skip(parsed) {
            last_closing = parse_line(raw)?.is_closing;
        }

        let count = self.buffer.scanned_lines();
        if count == parsed || !last_closing {
            self.buffer.set_parsed_lines(count);
            trace!("need more data: {} lines of an open reply", count);
            return Ok(DecodingState::NeedMoreData);
        }

        let group = self
            .buffer
            .lines()
            .map(parse_line)
            .collect::<DecodeResult<ResponseGroup>>()?;
        self.buffer.consume_lines(count);
        for message in &group {
            debug!(
                "<< {}{}{}",
                message.code,
                if message.is_closing { ' ' } else { '-' },
                message.message
            );
        }
        self.handler.receive(group);
        Ok(DecodingState::Continue)
    }

    /// Decodes until the buffer holds no complete group.
    ///
    /// Returns the number of groups delivered.
    pub fn decode_all(&mut self) -> DecodeResult<usize> {
        let mut delivered = 0;
        while self.decode()? == DecodingState::Continue {
            delivered += 1;
        }
        Ok(delivered)
    }

    /// Final pass once the transport reached end-of-stream.
    ///
    /// Delivers whatever complete groups remain, then notifies the handler of
    /// the disconnection. The notification happens even if decoding fails;
    /// the error is returned afterwards.
    pub fn decode_last(&mut self) -> DecodeResult<()> {
        let result = if self.buffer.is_empty() {
            Ok(())
        } else {
            self.decode_all().map(|_| ())
        };
        if !self.buffer.is_empty() {
            debug!("{} bytes left at end of stream", self.buffer.len());
        }
        self.handler.disconnect();
        result
    }
}

/// Handler queueing the received groups
#[derive(Default, Debug, Clone)]
pub struct ResponseCollector {
    groups: VecDeque<ResponseGroup>,
    disconnected: bool,
}

impl ResponseCollector {
    /// Creates an empty collector
    pub fn new() -> Self {
        ResponseCollector::default()
    }

    /// Takes the oldest received group
    pub fn pop(&mut self) -> Option<ResponseGroup> {
        self.groups.pop_front()
    }

    /// Number of groups waiting to be taken
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Tells if no group is waiting
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Tells if the connection reached end-of-stream
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl ResponseHandler for ResponseCollector {
    fn receive(&mut self, group: ResponseGroup) {
        self.groups.push_back(group);
    }

    fn disconnect(&mut self) {
        self.disconnected = true;
    }
}
