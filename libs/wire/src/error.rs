//! Wire-level errors for fixed-layout message decoding.

use crate::registry::MsgKind;
use thiserror::Error;

/// Errors raised while moving a message through its wire representation.
///
/// Each variant carries the context needed to diagnose a contract breach
/// between independently compiled runtimes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Payload length does not match the fixed layout of the declared kind.
    #[error("payload size mismatch for {kind:?}: need {need} bytes, got {got}")]
    PayloadSizeMismatch {
        kind: MsgKind,
        need: usize,
        got: usize,
    },

    /// Numeric type id is not in the cross-runtime registry.
    #[error("unknown message kind {type_id}: cross-runtime ids start at 1000")]
    UnknownKind { type_id: i32 },

    /// Payload bytes could not be reinterpreted as the declared layout.
    #[error("malformed payload for {kind:?}: {reason}")]
    MalformedPayload { kind: MsgKind, reason: String },
}

impl WireError {
    pub fn payload_size_mismatch(kind: MsgKind, need: usize, got: usize) -> Self {
        Self::PayloadSizeMismatch { kind, need, got }
    }

    pub fn malformed(kind: MsgKind, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            kind,
            reason: reason.into(),
        }
    }
}

/// Result type for wire operations.
pub type WireResult<T> = std::result::Result<T, WireError>;
