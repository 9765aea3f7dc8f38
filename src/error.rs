//! Error and result type for the SMTP wire codec

use std::io;
use std::str::Utf8Error;

use base64::DecodeError;

/// An enum of all error kinds.
///
/// Every decoding error is fatal for the connection it happened on: the
/// reply stream cannot be resynchronized once a line fails to parse.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A reply line is not of the form `<3-digit-code><'-' or ' '><text>`
    ///
    /// [RFC 5321, section 4.2](https://tools.ietf.org/html/rfc5321#section-4.2)
    #[error("malformed status line {line:?}: {kind:?}")]
    MalformedStatusLine {
        /// The offending line, without its CRLF
        line: String,
        /// The parsing step that failed
        kind: nom::error::ErrorKind,
    },
    /// Buffered bytes could not be decoded as text
    #[error("utf8: {0}")]
    Utf8Parsing(#[from] Utf8Error),
    /// Error parsing a base64 string in response
    #[error("challenge parsing: {0}")]
    ChallengeParsing(#[from] DecodeError),
    /// More unconsumed bytes were buffered than the configured limit
    #[error("receive buffer exceeded {0} bytes without a complete reply")]
    BufferLimitExceeded(usize),
    /// The stream ended before a complete reply was received
    #[error("connection closed before a complete reply")]
    UnexpectedEof,
    /// IO error
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn malformed(line: &str, kind: nom::error::ErrorKind) -> Error {
        Error::MalformedStatusLine {
            line: line.to_string(),
            kind,
        }
    }

    /// Tells if this error was raised while decoding the reply stream.
    pub fn is_decoding(&self) -> bool {
        matches!(
            self,
            Error::MalformedStatusLine { .. } | Error::Utf8Parsing(_)
        )
    }
}

/// Decoding result type
pub type DecodeResult<T> = Result<T, Error>;
