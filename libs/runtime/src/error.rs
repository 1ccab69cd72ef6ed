//! Dispatch-layer errors.
//!
//! Deliberately small: target-not-found is a recoverable
//! [`DeliveryStatus`](crate::DeliveryStatus), and unknown inbound kinds are
//! dropped by policy, so the only hard error a send can raise is a caller
//! bug. Nothing in this layer is fatal to the process.

use thiserror::Error;

/// Errors surfaced by [`ActorRef::send`](crate::ActorRef::send).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// The reference was never bound: a default-constructed reference was
    /// sent to without resolving it through the directory first. This is a
    /// caller bug and must not be swallowed.
    #[error("reference is unbound: resolve the target through the directory before sending")]
    UnresolvedTarget,
}
