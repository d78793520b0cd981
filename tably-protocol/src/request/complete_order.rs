use crate::errors::ProtocolError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Body of a `complete_order` event. Completing an id that is no longer
/// active is a valid no-op on the server side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteOrder {
    pub order_id: String,
}

impl CompleteOrder {
    pub fn serialize(&self) -> Result<Bytes, ProtocolError> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }

    pub fn deserialize(buf: Bytes) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(&buf)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_camel_case_field() {
        let req = CompleteOrder {
            order_id: "o1".into(),
        };
        let wire = req.serialize().unwrap();
        assert_eq!(&wire[..], br#"{"orderId":"o1"}"#);

        let back = CompleteOrder::deserialize(wire).unwrap();
        assert_eq!(back.order_id, "o1");
    }
}
