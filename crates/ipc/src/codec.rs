//! Wire format of a single message:
//!
//! ```text
//! msg_id:u8 { tag:u8 payload }* 0x00
//! ```
//!
//! An `INT32` (tag 1) payload is four little-endian bytes, a `STRING` (tag 2)
//! payload is UTF-8 terminated by a NUL byte. Tag 0 (`NONE`) ends the frame.

use crate::error::Error;
use crate::message::{Arg, Message, MsgId};
use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Upper bound on a frame still waiting for its terminator.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

const TAG_NONE: u8 = 0;
const TAG_INT32: u8 = 1;
const TAG_STRING: u8 = 2;

/// Frame codec. Decoding is incremental: arguments already read from an
/// incomplete frame are kept, and the next call resumes after them.
#[derive(Debug, Default, Clone)]
pub struct IpcCodec {
    partial: Option<Partial>,
}

/// Frame at the front of the read buffer that has no terminator yet.
#[derive(Debug, Clone)]
struct Partial {
    message: Message,
    /// Bytes of the frame already turned into `message`.
    parsed: usize,
    /// Payload bytes of a pending string already searched for its NUL.
    scanned: usize,
}

impl IpcCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse as far as `src` allows. Consumes `src` only once a whole frame
    /// is available.
    fn advance(&mut self, src: &mut BytesMut) -> Result<Option<Message>, Error> {
        if self.partial.is_none() {
            let Some(&id) = src.first() else {
                return Ok(None);
            };
            self.partial = Some(Partial {
                message: Message::new(MsgId(id)),
                parsed: 1,
                scanned: 0,
            });
        }
        let Some(partial) = self.partial.as_mut() else {
            return Ok(None);
        };

        loop {
            let Some((&tag, payload)) = src
                .get(partial.parsed..)
                .and_then(<[u8]>::split_first)
            else {
                return Ok(None);
            };

            match tag {
                TAG_NONE => {
                    let len = partial.parsed + 1;
                    let _ = src.split_to(len);
                    return Ok(self.partial.take().map(|partial| partial.message));
                }
                TAG_INT32 => {
                    let Some(bytes) = payload.first_chunk::<4>() else {
                        return Ok(None);
                    };
                    partial.message.push(i32::from_le_bytes(*bytes));
                    partial.parsed += 1 + 4;
                }
                TAG_STRING => {
                    let scanned = partial.scanned.min(payload.len());
                    let Some(found) = payload[scanned..].iter().position(|&b| b == 0) else {
                        partial.scanned = payload.len();
                        return Ok(None);
                    };
                    let nul = scanned + found;
                    partial.message.push(std::str::from_utf8(&payload[..nul])?);
                    partial.parsed += 1 + nul + 1;
                    partial.scanned = 0;
                }
                other => return Err(Error::UnknownTag(other)),
            }
        }
    }
}

impl Decoder for IpcCodec {
    type Item = Message;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let decoded = self.advance(src).and_then(|message| match message {
            Some(message) => Ok(Some(message)),
            None if src.len() > MAX_FRAME_LEN => Err(Error::FrameTooLarge {
                max: MAX_FRAME_LEN,
            }),
            None => Ok(None),
        });
        if decoded.is_err() {
            self.partial = None;
        }
        decoded
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(message) => Ok(Some(message)),
            None if buf.is_empty() => Ok(None),
            None => {
                self.partial = None;
                Err(Error::TruncatedFrame)
            }
        }
    }
}

impl Encoder<Message> for IpcCodec {
    type Error = Error;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let has_nul = item.args().iter().any(|arg| match arg {
            Arg::Str(s) => s.as_bytes().contains(&0),
            Arg::Int32(_) => false,
        });
        if has_nul {
            return Err(Error::EmbeddedNul);
        }

        dst.put_u8(item.id().0);
        for arg in item.args() {
            match arg {
                Arg::Int32(value) => {
                    dst.put_u8(TAG_INT32);
                    dst.put_i32_le(*value);
                }
                Arg::Str(value) => {
                    dst.put_u8(TAG_STRING);
                    dst.extend_from_slice(value.as_bytes());
                    dst.put_u8(0);
                }
            }
        }
        dst.put_u8(TAG_NONE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode(message: Message) -> BytesMut {
        let mut buf = BytesMut::new();
        IpcCodec::new().encode(message, &mut buf).unwrap();
        buf
    }

    #[test]
    fn request_has_no_arguments() {
        let buf = encode(Message::new(MsgId::INFO));
        assert_eq!(&buf[..], &[6, TAG_NONE]);
    }

    #[test]
    fn layout_of_mixed_arguments() {
        let buf = encode(Message::new(MsgId::INFO_END).with_arg(2).with_arg("ok"));
        assert_eq!(
            &buf[..],
            &[8, TAG_INT32, 2, 0, 0, 0, TAG_STRING, b'o', b'k', 0, TAG_NONE]
        );
    }

    #[test]
    fn waits_for_complete_frame() {
        let full = encode(Message::new(MsgId::INFO_MODULE).with_arg("module").with_arg(-7));
        let mut codec = IpcCodec::new();
        let mut buf = BytesMut::new();

        // Feed one byte per read, the way a slow socket would.
        for (at, &byte) in full[..full.len() - 1].iter().enumerate() {
            buf.put_u8(byte);
            assert!(codec.decode(&mut buf).unwrap().is_none(), "cut at {at}");
            assert_eq!(buf.len(), at + 1);
        }

        buf.put_u8(full[full.len() - 1]);
        buf.put_u8(MsgId::INFO_END.0);
        let message = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(message.str_at(0).unwrap(), "module");
        assert_eq!(message.int32_at(1).unwrap(), -7);
        assert_eq!(message.argc(), 2);
        assert_eq!(&buf[..], &[MsgId::INFO_END.0]);
    }

    #[test]
    fn resumes_inside_a_long_string() {
        let name = "x".repeat(10_000);
        let full = encode(Message::new(MsgId::INFO_MODULE).with_arg(1).with_arg(name.as_str()));
        let mut codec = IpcCodec::new();
        let mut buf = BytesMut::new();

        for chunk in full.chunks(1000) {
            buf.extend_from_slice(chunk);
            if buf.len() < full.len() {
                assert!(codec.decode(&mut buf).unwrap().is_none());
                let partial = codec.partial.as_ref().unwrap();
                // The int32 is parsed once and not revisited.
                assert_eq!(partial.message.argc(), 1);
                assert_eq!(partial.parsed, 1 + 5);
                assert_eq!(partial.scanned, buf.len() - partial.parsed - 1);
            }
        }

        let message = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(message.int32_at(0).unwrap(), 1);
        assert_eq!(message.str_at(1).unwrap(), name);
        assert!(buf.is_empty());
        assert!(codec.partial.is_none());
    }

    #[test]
    fn back_to_back_frames() {
        let mut buf = encode(Message::new(MsgId::INFO_MODULE).with_arg("a"));
        buf.extend_from_slice(&encode(Message::new(MsgId::INFO_END).with_arg(3)));
        let mut codec = IpcCodec::new();

        let first = codec.decode(&mut buf).unwrap().unwrap();
        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.str_at(0).unwrap(), "a");
        assert_eq!(second.id(), MsgId::INFO_END);
        assert_eq!(second.int32_at(0).unwrap(), 3);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn rejects_unknown_tag() {
        let mut codec = IpcCodec::new();
        let mut buf = BytesMut::from(&[7u8, 9, 0][..]);
        assert!(matches!(codec.decode(&mut buf), Err(Error::UnknownTag(9))));

        // Nothing of the rejected frame leaks into the next one.
        let mut buf = encode(Message::new(MsgId::INFO_END).with_arg(1));
        let message = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(message, Message::new(MsgId::INFO_END).with_arg(1));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let mut buf = BytesMut::from(&[7u8, TAG_STRING, 0xff, 0xfe, 0, TAG_NONE][..]);
        assert!(matches!(
            IpcCodec::new().decode(&mut buf),
            Err(Error::InvalidUtf8(_))
        ));
    }

    #[test]
    fn refuses_to_encode_embedded_nul() {
        let mut buf = BytesMut::new();
        let message = Message::new(MsgId::INFO_MODULE).with_arg("a\0b");
        assert!(matches!(
            IpcCodec::new().encode(message, &mut buf),
            Err(Error::EmbeddedNul)
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn truncated_frame_at_eof() {
        let mut buf = BytesMut::from(&[7u8, TAG_STRING, b'x'][..]);
        assert!(matches!(
            IpcCodec::new().decode_eof(&mut buf),
            Err(Error::TruncatedFrame)
        ));

        let mut empty = BytesMut::new();
        assert!(IpcCodec::new().decode_eof(&mut empty).unwrap().is_none());
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let mut buf = BytesMut::with_capacity(MAX_FRAME_LEN + 3);
        buf.put_u8(7);
        buf.put_u8(TAG_STRING);
        buf.put_bytes(b'a', MAX_FRAME_LEN);
        assert!(matches!(
            IpcCodec::new().decode(&mut buf),
            Err(Error::FrameTooLarge { .. })
        ));
    }

    fn arg_strategy() -> impl Strategy<Value = Arg> {
        prop_oneof![
            any::<i32>().prop_map(Arg::Int32),
            "[^\\x00]{0,32}".prop_map(Arg::Str),
        ]
    }

    proptest! {
        #[test]
        fn decodes_what_it_encodes(
            id in any::<u8>(),
            args in prop::collection::vec(arg_strategy(), 0..8),
            step in 1usize..16,
        ) {
            let mut message = Message::new(MsgId(id));
            for arg in args {
                message.push(arg);
            }

            let full = encode(message.clone());
            let mut codec = IpcCodec::new();
            let mut buf = BytesMut::new();
            let mut decoded = None;
            for chunk in full.chunks(step) {
                prop_assert!(decoded.is_none());
                buf.extend_from_slice(chunk);
                decoded = codec.decode(&mut buf).unwrap();
            }
            prop_assert_eq!(decoded, Some(message));
            prop_assert!(buf.is_empty());
        }
    }
}
