//! Payloads for the SASL mechanisms usable with `AUTH`

use std::fmt::{self, Display, Formatter};

use crate::commands::ClientCommand;
use crate::error::{DecodeResult, Error};
use crate::response::ServerMessage;

/// Code of the server challenge during authentication
pub const CHALLENGE_CODE: u16 = 334;

/// Represents authentication mechanisms
#[derive(PartialEq, Eq, Copy, Clone, Hash, Debug)]
#[cfg_attr(
    feature = "serde-impls",
    derive(serde_derive::Serialize, serde_derive::Deserialize)
)]
pub enum Mechanism {
    /// PLAIN authentication mechanism
    /// RFC 4616: https://tools.ietf.org/html/rfc4616
    Plain,
    /// LOGIN authentication mechanism
    /// Obsolete but needed for some providers (like office365)
    /// https://www.ietf.org/archive/id/draft-murchison-sasl-login-00.txt
    Login,
    /// CRAM-MD5 authentication mechanism
    /// RFC 2195: https://tools.ietf.org/html/rfc2195
    CramMd5,
    /// Non-standard XOAUTH2 mechanism
    /// https://developers.google.com/gmail/imap/xoauth2-protocol
    Xoauth2,
}

impl Display for Mechanism {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            Mechanism::Plain => "PLAIN",
            Mechanism::Login => "LOGIN",
            Mechanism::CramMd5 => "CRAM-MD5",
            Mechanism::Xoauth2 => "XOAUTH2",
        })
    }
}

/// Contains user credentials
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct Credentials {
    authentication_identity: String,
    secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("authentication_identity", &self.authentication_identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Create a `Credentials` struct from username and password
    pub fn new(username: String, password: String) -> Credentials {
        Credentials {
            authentication_identity: username,
            secret: password,
        }
    }

    /// The `AUTH` command starting `mechanism`
    ///
    /// XOAUTH2 carries its token inline, the secret being the access token.
    pub fn auth_command(&self, mechanism: Mechanism) -> ClientCommand {
        match mechanism {
            Mechanism::Plain => ClientCommand::AuthPlain,
            Mechanism::Login => ClientCommand::AuthLogin,
            Mechanism::CramMd5 => ClientCommand::AuthCramMd5,
            Mechanism::Xoauth2 => ClientCommand::AuthXOAuth2(self.xoauth2_token()),
        }
    }

    /// Line answering the empty challenge of `AUTH PLAIN`
    pub fn plain_payload(&self) -> ClientCommand {
        ClientCommand::AuthUser(base64::encode(format!(
            "\u{0}{}\u{0}{}",
            self.authentication_identity, self.secret
        )))
    }

    /// Line answering the user name challenge of `AUTH LOGIN`
    pub fn login_user(&self) -> ClientCommand {
        ClientCommand::AuthUser(base64::encode(&self.authentication_identity))
    }

    /// Line answering the password challenge of `AUTH LOGIN`
    pub fn login_password(&self) -> ClientCommand {
        ClientCommand::AuthPassword(base64::encode(&self.secret))
    }

    /// Base64 token of `AUTH XOAUTH2`
    pub fn xoauth2_token(&self) -> String {
        base64::encode(format!(
            "user={}\x01auth=Bearer {}\x01\x01",
            self.authentication_identity, self.secret
        ))
    }
}

/// Decodes the base64 text of a `334` challenge.
pub fn decode_challenge(message: &ServerMessage) -> DecodeResult<String> {
    let decoded = base64::decode(message.message.trim())?;
    String::from_utf8(decoded).map_err(|err| Error::Utf8Parsing(err.utf8_error()))
}
