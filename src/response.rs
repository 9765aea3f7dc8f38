//! SMTP response, containing a three digit code and a text line

use nom::bytes::complete::take_while_m_n;
use nom::character::complete::one_of;
use nom::combinator::map_res;
use nom::error::ErrorKind;
use nom::IResult;

use crate::error::{DecodeResult, Error};

/// First digit of a reply code
///
/// [RFC 5321, section 4.2.1](https://tools.ietf.org/html/rfc5321#section-4.2.1)
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[cfg_attr(
    feature = "serde-impls",
    derive(serde_derive::Serialize, serde_derive::Deserialize)
)]
pub enum Severity {
    /// 2yx
    PositiveCompletion,
    /// 3yz
    PositiveIntermediate,
    /// 4yz
    TransientNegativeCompletion,
    /// 5yz
    PermanentNegativeCompletion,
}

/// One line of a server reply
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(
    feature = "serde-impls",
    derive(serde_derive::Serialize, serde_derive::Deserialize)
)]
pub struct ServerMessage {
    /// Three digit status code
    pub code: u16,
    /// True on the last line of a reply group
    pub is_closing: bool,
    /// Text following the code and the separator
    pub message: String,
}

/// A complete reply: its lines in arrival order, the last one closing
pub type ResponseGroup = Vec<ServerMessage>;

impl ServerMessage {
    /// Severity of the code, `None` if the first digit is not 2 to 5
    pub fn severity(&self) -> Option<Severity> {
        match self.code / 100 {
            2 => Some(Severity::PositiveCompletion),
            3 => Some(Severity::PositiveIntermediate),
            4 => Some(Severity::TransientNegativeCompletion),
            5 => Some(Severity::PermanentNegativeCompletion),
            _ => None,
        }
    }

    /// Tells if the code is 2yz or 3yz
    pub fn is_positive(&self) -> bool {
        matches!(
            self.severity(),
            Some(Severity::PositiveCompletion) | Some(Severity::PositiveIntermediate)
        )
    }

    /// Tells if the message has the given code
    pub fn has_code(&self, code: u16) -> bool {
        self.code == code
    }
}

fn reply_code(input: &str) -> IResult<&str, u16> {
    map_res(take_while_m_n(3, 3, |c: char| c.is_ascii_digit()), |digits: &str| {
        digits.parse::<u16>()
    })(input)
}

fn separator(input: &str) -> IResult<&str, bool> {
    let (input, separator) = one_of("- ")(input)?;
    Ok((input, separator == ' '))
}

fn malformed(line: &str, err: nom::Err<nom::error::Error<&str>>) -> Error {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => Error::malformed(line, e.code),
        nom::Err::Incomplete(_) => Error::malformed(line, ErrorKind::Complete),
    }
}

/// Parses one reply line, given without its CRLF.
///
/// The line must be `<3 digits><'-' or ' '><text>` with a non-empty text.
pub fn parse_server_message(line: &str) -> DecodeResult<ServerMessage> {
    let (input, code) = reply_code(line).map_err(|err| malformed(line, err))?;
    // separator plus at least one character of text
    if input.chars().nth(1).is_none() {
        return Err(Error::malformed(line, ErrorKind::Eof));
    }
    let (message, is_closing) = separator(input).map_err(|err| malformed(line, err))?;

    Ok(ServerMessage {
        code,
        is_closing,
        message: message.to_string(),
    })
}
