use crate::errors::ProtocolError;
use crate::order::Order;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Body of the `initial_orders` push: the full active list, sent once to a
/// connection right after it registers, before any broadcast can reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InitialOrders {
    pub orders: Vec<Order>,
}

impl InitialOrders {
    pub fn serialize(&self) -> Result<Bytes, ProtocolError> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }

    pub fn deserialize(buf: Bytes) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(&buf)?)
    }
}
