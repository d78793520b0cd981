use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Unknown event code: {0}")]
    UnknownEventCode(u8),

    #[error("Unknown frame type: {0}")]
    UnknownFrameType(u8),

    #[error("Payload decode error: {0}")]
    PayloadError(String),

    #[error("Checksum Mismatch expected: {expected} found: {found}")]
    ChecksumMismatch { expected: u32, found: u32 },

    #[error("Event body error: {0}")]
    BodyError(#[from] serde_json::Error),
}
