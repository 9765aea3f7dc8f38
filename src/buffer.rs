//! Receive buffer shared by the transport and the decoder

use std::collections::VecDeque;

use crate::codec::CRLF;

/// Consumed bytes are dropped once they exceed this size and half the buffer
const COMPACT_THRESHOLD: usize = 4096;

/// Bytes received from the server and not yet consumed by the decoder
///
/// The write cursor is the end of the stored bytes; the read cursor only
/// moves forward, when the decoder consumes a complete reply group. The
/// buffer also keeps the offsets of the line ends found so far, so a decode
/// pass only scans bytes appended since the previous one.
#[derive(Default, Debug, Clone)]
pub struct ReceiveBuffer {
    data: Vec<u8>,
    read: usize,
    scanned: usize,
    /// offsets just past each CRLF between `read` and `scanned`
    line_ends: VecDeque<usize>,
    /// leading scanned lines that parsed without closing the pass
    parsed_lines: usize,
}

impl ReceiveBuffer {
    /// Creates an empty buffer
    pub fn new() -> Self {
        ReceiveBuffer::default()
    }

    /// Creates an empty buffer able to hold `capacity` bytes without
    /// reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        ReceiveBuffer {
            data: Vec::with_capacity(capacity),
            ..ReceiveBuffer::default()
        }
    }

    /// Appends bytes received from the transport.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Position of the read cursor
    pub fn read_index(&self) -> usize {
        self.read
    }

    /// Position of the write cursor
    pub fn write_index(&self) -> usize {
        self.data.len()
    }

    /// Bytes between the read and the write cursor
    pub fn unconsumed(&self) -> &[u8] {
        &self.data[self.read..]
    }

    /// Number of unconsumed bytes
    pub fn len(&self) -> usize {
        self.data.len() - self.read
    }

    /// Tells if every received byte was consumed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn ends_with_crlf(&self) -> bool {
        self.unconsumed().ends_with(CRLF)
    }

    /// Records the line ends among the bytes appended since the last scan.
    ///
    /// Must only be called while the unconsumed bytes end in CRLF, so a scan
    /// never stops between CR and LF.
    pub(crate) fn scan_lines(&mut self) {
        let mut idx = self.scanned.max(self.read);
        while idx + 1 < self.data.len() {
            if self.data[idx] == b'\r' && self.data[idx + 1] == b'\n' {
                idx += 2;
                self.line_ends.push_back(idx);
            } else {
                idx += 1;
            }
        }
        self.scanned = self.data.len();
    }

    /// Scanned lines, in order, without their CRLF
    pub(crate) fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let starts = std::iter::once(self.read).chain(self.line_ends.iter().copied());
        starts
            .zip(self.line_ends.iter())
            .map(move |(start, &end)| &self.data[start..end - CRLF.len()])
    }

    pub(crate) fn scanned_lines(&self) -> usize {
        self.line_ends.len()
    }

    pub(crate) fn parsed_lines(&self) -> usize {
        self.parsed_lines
    }

    /// Records that the first `count` scanned lines are well-formed and the
    /// last of them continues a reply.
    pub(crate) fn set_parsed_lines(&mut self, count: usize) {
        self.parsed_lines = count.min(self.line_ends.len());
    }

    /// Moves the read cursor past the first `count` scanned lines.
    pub(crate) fn consume_lines(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        if let Some(&end) = self.line_ends.get(count - 1) {
            self.line_ends.drain(..count);
            self.parsed_lines = self.parsed_lines.saturating_sub(count);
            self.read = end;
            self.compact();
        }
    }

    fn compact(&mut self) {
        if self.read == self.data.len() {
            self.data.clear();
            self.read = 0;
            self.scanned = 0;
            self.line_ends.clear();
            self.parsed_lines = 0;
        } else if self.read >= COMPACT_THRESHOLD && self.read * 2 >= self.data.len() {
            let consumed = self.read;
            self.data.drain(..consumed);
            self.read = 0;
            self.scanned -= consumed;
            for end in self.line_ends.iter_mut() {
                *end -= consumed;
            }
        }
    }
}
