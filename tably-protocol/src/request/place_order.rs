use crate::errors::ProtocolError;
use crate::order::Order;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Body of a `place_order` event: the fully-formed order. The submitting
/// client has already set id, timestamp and total; the hub takes it as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceOrder {
    pub order: Order,
}

impl PlaceOrder {
    pub fn serialize(&self) -> Result<Bytes, ProtocolError> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }

    pub fn deserialize(buf: Bytes) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(&buf)?)
    }
}
