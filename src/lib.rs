//! Smtp-wire is the wire codec of an SMTP client.
//!
//! [`ClientCodec`] renders [`ClientCommand`]s to bytes. [`ResponseDecoder`]
//! frames the bytes received from the server into complete reply groups and
//! hands them to a [`ResponseHandler`]. [`SmtpStream`] drives both over an
//! async stream.

#![deny(
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    missing_debug_implementations,
    clippy::unwrap_used
)]

#[cfg(all(feature = "runtime-tokio", feature = "runtime-async-std"))]
compile_error!("features `runtime-tokio` and `runtime-async-std` are mutually exclusive");

pub mod authentication;
mod buffer;
mod codec;
mod commands;
mod decoder;
pub mod error;
#[cfg(any(feature = "runtime-tokio", feature = "runtime-async-std"))]
pub mod mock;
mod response;
#[cfg(any(feature = "runtime-tokio", feature = "runtime-async-std"))]
mod runtime;
#[cfg(any(feature = "runtime-tokio", feature = "runtime-async-std"))]
mod stream;

pub use crate::buffer::ReceiveBuffer;
pub use crate::codec::{ClientCodec, CRLF};
pub use crate::commands::{local_hostname, ClientCommand, MailData, DEFAULT_HELLO_NAME};
pub use crate::decoder::{DecodingState, ResponseCollector, ResponseDecoder, ResponseHandler};
pub use crate::error::{DecodeResult, Error};
pub use crate::response::{parse_server_message, ResponseGroup, ServerMessage, Severity};
#[cfg(any(feature = "runtime-tokio", feature = "runtime-async-std"))]
pub use crate::stream::{
    SmtpStream, StreamConfig, DEFAULT_MAX_BUFFERED, DEFAULT_READ_CHUNK_SIZE,
};

/// Defines an async test running on the runtime selected by feature
#[cfg(feature = "runtime-tokio")]
#[macro_export]
macro_rules! async_test {
    ($name:ident, $block:block) => {
        #[tokio::test]
        async fn $name() {
            $block
        }
    };
}

/// Defines an async test running on the runtime selected by feature
#[cfg(feature = "runtime-async-std")]
#[macro_export]
macro_rules! async_test {
    ($name:ident, $block:block) => {
        #[async_std::test]
        async fn $name() {
            $block
        }
    };
}
