/*
[ version: u8 ]
[ frame_type: u8 ]
[ payload_len: u32 ]
[ checksum: u32 ]
[ payload bytes... ]
*/

use crate::ProtocolError;
use bytes::{Buf, BufMut, BytesMut};
use xxhash_rust::xxh32::xxh32;

pub const PROTOCOL_VERSION: u8 = 1;

const HEADER_LEN: usize = 10;

#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameType {
    Event = 1,
    Heartbeat = 2, // (future: keepalive)
}

impl TryFrom<u8> for FrameType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, ProtocolError> {
        match value {
            1 => Ok(FrameType::Event),
            2 => Ok(FrameType::Heartbeat),
            _ => Err(ProtocolError::UnknownFrameType(value)),
        }
    }
}

#[derive(Debug)]
pub struct Frame {
    pub version: u8,
    pub frame_type: FrameType,
    pub payload: Vec<u8>, // Raw payload: one event-code byte + JSON body
}

impl Frame {
    pub fn event(payload: Vec<u8>) -> Frame {
        Frame {
            version: PROTOCOL_VERSION,
            frame_type: FrameType::Event,
            payload,
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.version);
        buf.put_u8(self.frame_type as u8);
        buf.put_u32(self.payload.len() as u32);
        let hash = xxh32(&self.payload, 0);
        buf.put_u32(hash);
        buf.extend_from_slice(&self.payload);
    }

    pub fn decode(buf: &mut BytesMut) -> Result<Option<Frame>, ProtocolError> {
        if buf.len() < HEADER_LEN {
            return Ok(None); // Not enough for frame header
        }

        let mut cursor = &buf[..];

        let version = cursor.get_u8();
        let frame_type_raw = cursor.get_u8();
        let payload_len = cursor.get_u32() as usize;
        let checksum_expected = cursor.get_u32();

        if cursor.remaining() < payload_len {
            return Ok(None); // Payload not fully available yet
        }

        // At this point, full frame is available
        buf.advance(HEADER_LEN);
        let payload = buf.split_to(payload_len).to_vec();
        let checksum_actual = xxh32(&payload, 0);

        if checksum_actual != checksum_expected {
            return Err(ProtocolError::ChecksumMismatch {
                expected: checksum_expected,
                found: checksum_actual,
            });
        }

        Ok(Some(Frame {
            version,
            frame_type: FrameType::try_from(frame_type_raw)?,
            payload,
        }))
    }
}
