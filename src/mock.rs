#![allow(missing_docs)]

//! In-memory stream replaying server bytes in fragments

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::io;

#[cfg(feature = "runtime-async-std")]
use async_std::io::{Read, Write};
#[cfg(feature = "runtime-tokio")]
use tokio::io::{AsyncRead as Read, AsyncWrite as Write};

/// Stream handing out its input one fragment per read, at most, and
/// recording everything written to it. Reads past the last fragment report
/// end-of-stream.
#[derive(Clone, Debug, Default)]
pub struct MockStream {
    fragments: VecDeque<Vec<u8>>,
    writer: Vec<u8>,
}

impl MockStream {
    pub fn new() -> MockStream {
        MockStream::default()
    }

    pub fn with_vec(vec: Vec<u8>) -> MockStream {
        let mut mock = MockStream::new();
        mock.push_fragment(&vec);
        mock
    }

    /// Input delivered as the given pieces, each read returns at most one
    pub fn with_fragments<I: IntoIterator<Item = Vec<u8>>>(fragments: I) -> MockStream {
        let mut mock = MockStream::new();
        for fragment in fragments {
            mock.push_fragment(&fragment);
        }
        mock
    }

    pub fn push_fragment(&mut self, fragment: &[u8]) {
        // an empty read means end-of-stream
        if !fragment.is_empty() {
            self.fragments.push_back(fragment.to_vec());
        }
    }

    pub fn take_vec(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.writer)
    }

    fn read_into(&mut self, buf: &mut [u8]) -> usize {
        let fragment = match self.fragments.front_mut() {
            Some(fragment) => fragment,
            None => return 0,
        };
        let len = fragment.len().min(buf.len());
        buf[..len].copy_from_slice(&fragment[..len]);
        fragment.drain(..len);
        if fragment.is_empty() {
            self.fragments.pop_front();
        }
        len
    }
}

#[cfg(feature = "runtime-tokio")]
impl Read for MockStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let read = self.get_mut().read_into(buf.initialize_unfilled());
        buf.advance(read);
        Poll::Ready(Ok(()))
    }
}

#[cfg(feature = "runtime-tokio")]
impl Write for MockStream {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.get_mut().writer.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[cfg(feature = "runtime-async-std")]
impl Read for MockStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Ok(self.get_mut().read_into(buf)))
    }
}

#[cfg(feature = "runtime-async-std")]
impl Write for MockStream {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.get_mut().writer.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
