use smtp_wire::{
    ClientCodec, ClientCommand, DecodingState, Error, ReceiveBuffer, ResponseDecoder,
    ResponseGroup, ResponseHandler, ServerMessage,
};

#[derive(Default, Debug)]
struct Session {
    groups: Vec<ResponseGroup>,
    disconnects: usize,
}

impl ResponseHandler for Session {
    fn receive(&mut self, group: ResponseGroup) {
        assert!(!group.is_empty());
        self.groups.push(group);
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
    }
}

const EHLO_REPLY: &[u8] = b"250-mail.example.org greets you\r\n\
250-PIPELINING\r\n\
250-SIZE 35882577\r\n\
250-8BITMIME\r\n\
250-AUTH PLAIN LOGIN XOAUTH2\r\n\
250 SMTPUTF8\r\n";

/// Feeds `input` cut at `cuts`, decoding after every piece
fn feed(input: &[u8], cuts: &[usize]) -> Session {
    let mut buffer = ReceiveBuffer::new();
    let mut session = Session::default();
    let mut start = 0;
    for &end in cuts.iter().chain(std::iter::once(&input.len())) {
        buffer.extend_from_slice(&input[start..end]);
        start = end;
        ResponseDecoder::new(&mut buffer, &mut session)
            .decode_all()
            .unwrap();
    }
    assert!(buffer.is_empty());
    session
}

fn assert_ehlo_group(session: &Session) {
    assert_eq!(session.groups.len(), 1);
    let group = &session.groups[0];
    assert_eq!(group.len(), 6);
    assert!(group.iter().all(|message| message.code == 250));
    assert!(group[..5].iter().all(|message| !message.is_closing));
    assert!(group[5].is_closing);
    assert_eq!(group[0].message, "mail.example.org greets you");
    assert_eq!(group[4].message, "AUTH PLAIN LOGIN XOAUTH2");
    assert_eq!(group[5].message, "SMTPUTF8");
}

#[test]
fn every_single_split() {
    for cut in 0..=EHLO_REPLY.len() {
        assert_ehlo_group(&feed(EHLO_REPLY, &[cut]));
    }
}

#[test]
fn every_pair_of_splits() {
    for first in 0..=EHLO_REPLY.len() {
        for second in first..=EHLO_REPLY.len() {
            assert_ehlo_group(&feed(EHLO_REPLY, &[first, second]));
        }
    }
}

#[test]
fn byte_by_byte() {
    let cuts: Vec<usize> = (1..EHLO_REPLY.len()).collect();
    assert_ehlo_group(&feed(EHLO_REPLY, &cuts));
}

#[test]
fn unterminated_bytes_never_deliver() {
    let inputs: &[&[u8]] = &[
        b"250 OK",
        b"250 OK\r",
        b"250 OK\r\n250-next",
        b"garbage without terminator",
        b"\n",
    ];
    for input in inputs {
        let mut buffer = ReceiveBuffer::new();
        let mut session = Session::default();
        buffer.extend_from_slice(input);
        let state = ResponseDecoder::new(&mut buffer, &mut session)
            .decode()
            .unwrap();
        assert_eq!(state, DecodingState::NeedMoreData);
        assert_eq!(buffer.read_index(), 0);
        assert_eq!(buffer.unconsumed(), *input);
        assert!(session.groups.is_empty());
    }
}

#[test]
fn single_ok() {
    let session = feed(b"250 OK\r\n", &[]);
    assert_eq!(
        session.groups,
        vec![vec![ServerMessage {
            code: 250,
            is_closing: true,
            message: "OK".to_string(),
        }]]
    );
}

fn codes(session: &Session) -> Vec<Vec<u16>> {
    session
        .groups
        .iter()
        .map(|group| group.iter().map(|message| message.code).collect())
        .collect()
}

#[test]
fn dialogue_reply_by_reply() {
    let replies: &[&[u8]] = &[
        b"220 ready\r\n",
        b"250-first\r\n250 second\r\n",
        b"354 go ahead\r\n",
        b"250 queued\r\n",
        b"221 bye\r\n",
    ];
    let mut buffer = ReceiveBuffer::new();
    let mut session = Session::default();
    for reply in replies {
        buffer.extend_from_slice(reply);
        let delivered = ResponseDecoder::new(&mut buffer, &mut session)
            .decode_all()
            .unwrap();
        assert_eq!(delivered, 1);
    }
    assert_eq!(
        codes(&session),
        vec![vec![220], vec![250, 250], vec![354], vec![250], vec![221]]
    );
}

#[test]
fn pipelined_replies_in_one_delivery_form_one_group() {
    let session = feed(b"250 A\r\n251 B\r\n354 go ahead\r\n", &[]);
    assert_eq!(codes(&session), vec![vec![250, 251, 354]]);
}

#[test]
fn trailing_continuation_line_holds_back_everything() {
    let input = b"250 OK\r\n250-a\r\n";
    let mut buffer = ReceiveBuffer::new();
    let mut session = Session::default();
    buffer.extend_from_slice(input);
    let state = ResponseDecoder::new(&mut buffer, &mut session)
        .decode()
        .unwrap();
    assert_eq!(state, DecodingState::NeedMoreData);
    assert_eq!(buffer.read_index(), 0);
    assert_eq!(buffer.unconsumed(), &input[..]);
    assert!(session.groups.is_empty());
}

#[test]
fn malformed_line_anywhere_prevents_delivery() {
    let inputs: &[&[u8]] = &[
        b"250 OK\r\nabc\r\n",
        b"250 OK\r\nabc\r\n221 bye\r\n",
        b"250-a\r\n250\r\n250 b\r\n",
    ];
    for input in inputs {
        let mut buffer = ReceiveBuffer::new();
        let mut session = Session::default();
        buffer.extend_from_slice(input);
        let err = ResponseDecoder::new(&mut buffer, &mut session)
            .decode()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedStatusLine { .. }));
        assert!(session.groups.is_empty());
        assert_eq!(buffer.read_index(), 0);
    }
}

#[test]
fn malformed_code_is_fatal() {
    let mut buffer = ReceiveBuffer::new();
    let mut session = Session::default();
    buffer.extend_from_slice(b"abc-x\r\n");
    let result = ResponseDecoder::new(&mut buffer, &mut session).decode();
    assert!(matches!(result, Err(Error::MalformedStatusLine { .. })));
    assert!(session.groups.is_empty());
}

#[test]
fn eof_with_complete_reply() {
    let mut buffer = ReceiveBuffer::new();
    let mut session = Session::default();
    buffer.extend_from_slice(b"221 2.0.0 Bye\r\n");
    ResponseDecoder::new(&mut buffer, &mut session)
        .decode_last()
        .unwrap();
    assert_eq!(session.groups.len(), 1);
    assert_eq!(session.disconnects, 1);
}

#[test]
fn eof_with_incomplete_or_unparseable_reply() {
    let inputs: &[&[u8]] = &[b"221 2.0.0 By", b"250-more to come\r\n", b"bye\r\n"];
    for input in inputs {
        let mut buffer = ReceiveBuffer::new();
        let mut session = Session::default();
        buffer.extend_from_slice(input);
        let _ = ResponseDecoder::new(&mut buffer, &mut session).decode_last();
        assert!(session.groups.is_empty());
        assert_eq!(session.disconnects, 1);
    }
}

#[test]
fn encoder_examples() {
    let codec = ClientCodec::new();
    assert_eq!(
        codec.encode_to_vec(&ClientCommand::Helo("example.com".to_string())),
        b"HELO example.com\r\n".to_vec()
    );
    assert_eq!(
        codec.encode_to_vec(&ClientCommand::mail_data(
            vec![("From", "a@b")],
            "text/plain",
            "hi"
        )),
        b"From: a@b\r\nContent-Type: text/plain; charset=\"utf-8\"\r\n\r\nhi\r\n.\r\n".to_vec()
    );
}
