use crate::errors::ProtocolError;
use crate::order::Order;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Body of the `new_order_received` push sent after every mutation: the
/// entire current list, never a delta. A duplicate or late snapshot simply
/// overwrites the receiver's view with an equivalent value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewOrderReceived {
    pub orders: Vec<Order>,
}

impl NewOrderReceived {
    pub fn serialize(&self) -> Result<Bytes, ProtocolError> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }

    pub fn deserialize(buf: Bytes) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(&buf)?)
    }
}
