//! SMTP commands sent by the client

use std::fmt::{self, Display, Formatter};

/// Name used in HELO/EHLO when the local host name cannot be determined
pub const DEFAULT_HELLO_NAME: &str = "localhost";

/// Message content sent after a `DATA` command was accepted
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(
    feature = "serde-impls",
    derive(serde_derive::Serialize, serde_derive::Deserialize)
)]
pub struct MailData {
    /// Header fields, emitted in this order
    pub headers: Vec<(String, String)>,
    /// Media type of the body, the charset is always utf-8
    pub content_type: String,
    /// Body text, sent verbatim
    pub body: String,
}

/// A command sent by the client
///
/// The `Display` implementation renders the exact wire text, without the
/// trailing CRLF which is added by the [`ClientCodec`](crate::ClientCodec).
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(
    feature = "serde-impls",
    derive(serde_derive::Serialize, serde_derive::Deserialize)
)]
pub enum ClientCommand {
    /// Sends nothing at all, not even a line terminator
    Noop,
    /// HELO command
    Helo(String),
    /// EHLO command
    Ehlo(String),
    /// Raw line, sent verbatim
    Custom(String),
    /// MAIL command with the given sender address
    StartMail(String),
    /// RCPT command with the given recipient address
    MailRecipient(String),
    /// DATA command
    StartMailData,
    /// Message headers and body, followed by the end of data marker
    MailData(MailData),
    /// STARTTLS command
    StartTls,
    /// AUTH PLAIN command
    AuthPlain,
    /// AUTH LOGIN command
    AuthLogin,
    /// AUTH CRAM-MD5 command
    AuthCramMd5,
    /// AUTH XOAUTH2 command with its base64 token
    AuthXOAuth2(String),
    /// Base64 encoded user name line
    AuthUser(String),
    /// Base64 encoded password line
    AuthPassword(String),
    /// QUIT command
    Quit,
}

impl ClientCommand {
    /// EHLO with the name of the local host
    pub fn ehlo_local() -> ClientCommand {
        ClientCommand::Ehlo(local_hostname())
    }

    /// HELO with the name of the local host
    pub fn helo_local() -> ClientCommand {
        ClientCommand::Helo(local_hostname())
    }

    /// Builds a `MailData` command.
    pub fn mail_data<I, K, V>(headers: I, content_type: &str, body: &str) -> ClientCommand
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ClientCommand::MailData(MailData {
            headers: headers
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
            content_type: content_type.to_string(),
            body: body.to_string(),
        })
    }

    /// Tells if encoding this command produces any bytes.
    pub fn is_empty(&self) -> bool {
        matches!(self, ClientCommand::Noop)
    }
}

impl Display for ClientCommand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ClientCommand::Noop => Ok(()),
            ClientCommand::Helo(hostname) => write!(f, "HELO {}", hostname),
            ClientCommand::Ehlo(hostname) => write!(f, "EHLO {}", hostname),
            ClientCommand::Custom(text) => f.write_str(text),
            ClientCommand::StartMail(address) => {
                write!(f, "MAIL FROM: <{}> BODY=8BITMIME", address)
            }
            ClientCommand::MailRecipient(address) => write!(f, "RCPT TO: <{}>", address),
            ClientCommand::StartMailData => f.write_str("DATA"),
            ClientCommand::MailData(data) => {
                for (name, value) in &data.headers {
                    write!(f, "{}: {}\r\n", name, value)?;
                }
                write!(
                    f,
                    "Content-Type: {}; charset=\"utf-8\"\r\n\r\n",
                    data.content_type
                )?;
                f.write_str(&data.body)?;
                // the codec's line terminator completes "\r\n.\r\n"
                f.write_str("\r\n.")
            }
            ClientCommand::StartTls => f.write_str("STARTTLS"),
            ClientCommand::AuthPlain => f.write_str("AUTH PLAIN"),
            ClientCommand::AuthLogin => f.write_str("AUTH LOGIN"),
            ClientCommand::AuthCramMd5 => f.write_str("AUTH CRAM-MD5"),
            ClientCommand::AuthXOAuth2(token) => write!(f, "AUTH XOAUTH2 {}", token),
            ClientCommand::AuthUser(payload) | ClientCommand::AuthPassword(payload) => {
                f.write_str(payload)
            }
            ClientCommand::Quit => f.write_str("QUIT"),
        }
    }
}

/// Returns the name of the local host, or `localhost` if it is unknown or not
/// valid unicode.
pub fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_HELLO_NAME.to_string())
}
