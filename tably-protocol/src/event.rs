use crate::ProtocolError;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// One byte in front of every event payload naming the message kind.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum EventCode {
    PlaceOrder = 1,
    CompleteOrder = 2,
    InitialOrders = 3,
    NewOrderReceived = 4,
}

impl TryFrom<u8> for EventCode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EventCode::PlaceOrder),
            2 => Ok(EventCode::CompleteOrder),
            3 => Ok(EventCode::InitialOrders),
            4 => Ok(EventCode::NewOrderReceived),
            _ => Err(ProtocolError::UnknownEventCode(value)),
        }
    }
}

#[derive(Debug)]
pub struct EventPayload {
    pub code: EventCode,
    pub data: Bytes, // JSON body
}

impl EventPayload {
    pub fn serialize(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(1 + self.data.len());
        buf.put_u8(self.code as u8);
        buf.extend_from_slice(&self.data);
        buf.freeze()
    }

    pub fn deserialize(mut buf: Bytes) -> Result<Self, ProtocolError> {
        if buf.remaining() < 1 {
            return Err(ProtocolError::PayloadError("Empty event payload".into()));
        }

        let code = EventCode::try_from(buf.get_u8())?;
        let data = buf; // Remaining bytes are the body

        Ok(EventPayload { code, data })
    }
}
