//! Cross-Runtime Bridge
//!
//! The boundary-crossing seam: a language-neutral delivery call plus an
//! existence query. The trait is what a reference's `Remote` variant holds;
//! [`InProcessBridge`] is the implementation for two runtimes sharing one
//! address space (the only transport this layer defines).
//!
//! Lifecycle is a host contract: both runtimes finish their own startup
//! before the first cross-boundary send, and shutdown is ordered the same
//! way. The bridge itself only moves bytes.

use crate::system::{ActorSystem, SystemShared};
use std::sync::Arc;

/// Delivery outcome of a boundary crossing.
///
/// `Delivered` means the receiving side accepted responsibility for the
/// bytes - not that an application handler ran, or ran successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    NotFound,
}

impl DeliveryStatus {
    /// Wire-level status code: 0 = delivered, -1 = not found.
    pub fn status_code(self) -> i32 {
        match self {
            DeliveryStatus::Delivered => 0,
            DeliveryStatus::NotFound => -1,
        }
    }

    pub fn is_delivered(self) -> bool {
        matches!(self, DeliveryStatus::Delivered)
    }
}

/// Boundary transport between two actor runtimes.
///
/// `deliver` blocks the caller until the peer's dispatch path has taken the
/// message or rejected the target; there is no timeout or cancellation.
/// `exists` must be idempotent and free of side effects - in particular it
/// never creates reply proxies.
pub trait Bridge: Send + Sync {
    /// Deliver a wire payload to a named actor in the peer runtime.
    ///
    /// When `sender` is present the peer makes a reply proxy available under
    /// that name before the message reaches its handler.
    fn deliver(
        &self,
        target: &str,
        sender: Option<&str>,
        type_id: i32,
        payload: &[u8],
    ) -> DeliveryStatus;

    /// Whether the peer runtime currently knows an actor under this name.
    fn exists(&self, name: &str) -> bool;
}

/// Bridge between two [`ActorSystem`]s in the same process.
///
/// Delivery is a direct synchronous call into the peer's dispatch path, so
/// this implementation serializes per-target delivery: messages from one
/// sender to one target arrive in send order. That is a property of this
/// bridge, not of the [`Bridge`] contract.
pub struct InProcessBridge {
    peer: Arc<SystemShared>,
}

impl InProcessBridge {
    /// Bridge pointing into `peer`'s dispatch path.
    pub fn new(peer: &ActorSystem) -> Self {
        Self {
            peer: peer.shared(),
        }
    }
}

impl Bridge for InProcessBridge {
    fn deliver(
        &self,
        target: &str,
        sender: Option<&str>,
        type_id: i32,
        payload: &[u8],
    ) -> DeliveryStatus {
        self.peer.deliver_inbound(target, sender, type_id, payload)
    }

    fn exists(&self, name: &str) -> bool {
        self.peer.has_local(name)
    }
}

impl std::fmt::Debug for InProcessBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InProcessBridge")
            .field("peer", &self.peer.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_the_contract() {
        assert_eq!(DeliveryStatus::Delivered.status_code(), 0);
        assert_eq!(DeliveryStatus::NotFound.status_code(), -1);
        assert!(DeliveryStatus::Delivered.is_delivered());
        assert!(!DeliveryStatus::NotFound.is_delivered());
    }
}
