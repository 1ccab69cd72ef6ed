//! Location-Transparent Actor Reference
//!
//! A closed, tagged variant over the target's locality, dispatched by
//! pattern matching - no virtual dispatch across a boundary where the peer
//! is not even the same compiled type system. Callers obtain references from
//! [`ActorSystem::resolve`](crate::ActorSystem::resolve) and never branch on
//! locality themselves.

use crate::bridge::{Bridge, DeliveryStatus};
use crate::error::SendError;
use crate::message::{Inbound, Message};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Reference to an actor that may live in this runtime or in the peer.
///
/// The default value is `Unbound`: it names nothing and refuses to send.
/// Code must resolve a reference through the directory before using it.
#[derive(Clone, Default)]
pub enum ActorRef {
    /// Never bound; sending is a caller bug.
    #[default]
    Unbound,
    /// Direct handle to a local actor's mailbox.
    Local(LocalRef),
    /// Peer-name token routed through the bridge.
    Remote(RemoteRef),
}

/// Direct handle to a local mailbox.
#[derive(Clone)]
pub struct LocalRef {
    pub(crate) name: String,
    pub(crate) mailbox: mpsc::UnboundedSender<Inbound>,
}

/// Name token plus the bridge that reaches the peer runtime.
#[derive(Clone)]
pub struct RemoteRef {
    pub(crate) name: String,
    pub(crate) bridge: Arc<dyn Bridge>,
}

impl ActorRef {
    pub(crate) fn local(name: impl Into<String>, mailbox: mpsc::UnboundedSender<Inbound>) -> Self {
        ActorRef::Local(LocalRef {
            name: name.into(),
            mailbox,
        })
    }

    /// Reference to a peer-runtime actor by name, routed through `bridge`.
    pub fn remote(name: impl Into<String>, bridge: Arc<dyn Bridge>) -> Self {
        ActorRef::Remote(RemoteRef {
            name: name.into(),
            bridge,
        })
    }

    /// Target name, if the reference is bound.
    pub fn name(&self) -> Option<&str> {
        match self {
            ActorRef::Unbound => None,
            ActorRef::Local(l) => Some(&l.name),
            ActorRef::Remote(r) => Some(&r.name),
        }
    }

    pub fn is_unbound(&self) -> bool {
        matches!(self, ActorRef::Unbound)
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ActorRef::Local(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ActorRef::Remote(_))
    }

    /// Send an owned message to the target.
    ///
    /// `sender` is the originating actor's name, used by the receiving side
    /// for reply routing; pass `None` when no reply is expected.
    ///
    /// The message is consumed and released exactly once on every branch,
    /// including the error path. Delivery is fire-and-forget: the returned
    /// [`DeliveryStatus`] is the only signal, and `Delivered` does not mean
    /// a handler ran.
    ///
    /// # Errors
    ///
    /// [`SendError::UnresolvedTarget`] if the reference is unbound - a
    /// missing directory lookup on the caller's side.
    pub fn send(
        &self,
        msg: Box<dyn Message>,
        sender: Option<&str>,
    ) -> Result<DeliveryStatus, SendError> {
        match self {
            ActorRef::Unbound => {
                // msg is dropped here; the error still releases it once
                Err(SendError::UnresolvedTarget)
            }
            ActorRef::Local(local) => {
                trace!(target_actor = %local.name, kind = msg.kind().name(), "local send");
                let inbound = Inbound {
                    sender: sender.map(str::to_owned),
                    msg,
                };
                match local.mailbox.send(inbound) {
                    Ok(()) => Ok(DeliveryStatus::Delivered),
                    Err(_) => {
                        debug!(target_actor = %local.name, "mailbox closed, send dropped");
                        Ok(DeliveryStatus::NotFound)
                    }
                }
            }
            ActorRef::Remote(remote) => {
                trace!(target_actor = %remote.name, kind = msg.kind().name(), "bridge send");
                let status =
                    remote
                        .bridge
                        .deliver(&remote.name, sender, msg.kind() as i32, msg.wire_bytes());
                Ok(status)
            }
        }
    }
}

impl std::fmt::Debug for ActorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorRef::Unbound => write!(f, "ActorRef::Unbound"),
            ActorRef::Local(l) => write!(f, "ActorRef::Local({})", l.name),
            ActorRef::Remote(r) => write!(f, "ActorRef::Remote({})", r.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_wire::{MsgKind, Ping};

    #[test]
    fn default_reference_is_unbound_and_refuses_to_send() {
        let unbound = ActorRef::default();
        assert!(unbound.is_unbound());
        assert_eq!(unbound.name(), None);

        let err = unbound.send(Box::new(Ping::new(1)), None).unwrap_err();
        assert_eq!(err, SendError::UnresolvedTarget);
    }

    #[test]
    fn local_send_enqueues_into_mailbox() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let actor = ActorRef::local("echo", tx);
        assert!(actor.is_local());

        let status = actor.send(Box::new(Ping::new(5)), Some("caller")).unwrap();
        assert_eq!(status, DeliveryStatus::Delivered);

        let inbound = rx.try_recv().unwrap();
        assert_eq!(inbound.kind(), MsgKind::Ping);
        assert_eq!(inbound.sender(), Some("caller"));
        assert_eq!(inbound.get::<Ping>().map(|p| p.count), Some(5));
    }

    #[test]
    fn local_send_to_closed_mailbox_reports_not_found() {
        let (tx, rx) = mpsc::unbounded_channel::<Inbound>();
        drop(rx);
        let actor = ActorRef::local("gone", tx);

        let status = actor.send(Box::new(Ping::new(1)), None).unwrap();
        assert_eq!(status, DeliveryStatus::NotFound);
    }
}
