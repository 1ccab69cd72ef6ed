//! Owned, type-erased messages for dispatch.
//!
//! Every registered wire layout is a [`Message`] through the blanket impl;
//! sends take `Box<dyn Message>` **by value**, so the transfer of exclusive
//! ownership - and the release-exactly-once invariant on every send branch -
//! is enforced by the type system instead of by convention.

use std::any::Any;
use tandem_wire::{MsgKind, WireMessage};

/// A dispatchable message: a kind id plus its fixed-layout bytes.
///
/// Local delivery hands the box to the target untouched (no serialization);
/// remote delivery reads `wire_bytes` and the peer decodes a fresh value.
/// Handlers recover the concrete type with [`Inbound::get`] or `as_any`.
pub trait Message: Send + std::fmt::Debug + 'static {
    /// Registered kind id of this message.
    fn kind(&self) -> MsgKind;

    /// Fixed-layout wire bytes of this value.
    fn wire_bytes(&self) -> &[u8];

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<M: WireMessage> Message for M {
    fn kind(&self) -> MsgKind {
        M::KIND
    }

    fn wire_bytes(&self) -> &[u8] {
        self.to_wire()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// One message as it arrives in a target's mailbox.
///
/// `sender` is the originating actor's name when the sender supplied one;
/// resolving it through the receiving system's directory yields a reference
/// that replies correctly whether the origin is local or in the peer runtime.
#[derive(Debug)]
pub struct Inbound {
    pub sender: Option<String>,
    pub msg: Box<dyn Message>,
}

impl Inbound {
    pub fn kind(&self) -> MsgKind {
        self.msg.kind()
    }

    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// Downcast to a concrete registered kind.
    pub fn get<M: WireMessage>(&self) -> Option<&M> {
        self.msg.as_any().downcast_ref::<M>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_wire::{Ping, Pong};

    #[test]
    fn blanket_impl_exposes_kind_and_bytes() {
        let msg: Box<dyn Message> = Box::new(Ping::new(3));
        assert_eq!(msg.kind(), MsgKind::Ping);
        assert_eq!(msg.wire_bytes(), &3i32.to_le_bytes()[..]);
    }

    #[test]
    fn inbound_downcast() {
        let inbound = Inbound {
            sender: Some("pinger".to_string()),
            msg: Box::new(Ping::new(7)),
        };
        assert_eq!(inbound.kind(), MsgKind::Ping);
        assert_eq!(inbound.sender(), Some("pinger"));
        assert_eq!(inbound.get::<Ping>().map(|p| p.count), Some(7));
        assert!(inbound.get::<Pong>().is_none());
    }
}
