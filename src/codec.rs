use crate::commands::ClientCommand;

/// Line terminator for commands and replies
pub const CRLF: &[u8] = b"\r\n";

/// The codec rendering client commands to wire bytes
///
/// It carries no state, so one value can be shared freely between
/// connections and threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ClientCodec;

impl ClientCodec {
    /// Creates a new client codec
    pub fn new() -> Self {
        ClientCodec
    }

    /// Appends the wire form of `command` and its CRLF to `buf`.
    ///
    /// [`ClientCommand::Noop`] appends nothing. Values are written verbatim:
    /// CR or LF inside a hostname or address, and body lines starting with a
    /// dot, are the caller's concern.
    pub fn encode(&self, command: &ClientCommand, buf: &mut Vec<u8>) {
        if command.is_empty() {
            return;
        }
        buf.extend_from_slice(command.to_string().as_bytes());
        buf.extend_from_slice(CRLF);
    }

    /// Renders `command` into a new buffer.
    pub fn encode_to_vec(&self, command: &ClientCommand) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(command, &mut buf);
        buf
    }
}
