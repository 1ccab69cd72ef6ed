//! Actor System and Directory
//!
//! One [`ActorSystem`] per runtime instance: an explicit context object
//! holding the name directory, the reply-proxy table, the inbound codec
//! table, and the slot for the peer bridge. Components that resolve names or
//! cross the boundary receive it explicitly - there are no globals, so two
//! systems can be linked in one test and torn down in a deterministic order.
//!
//! The directory maps short names to mailboxes. Name uniqueness across the
//! combined address space is a host configuration responsibility; the core
//! does not detect collisions and re-registration replaces the entry.

use crate::actor_ref::ActorRef;
use crate::bridge::{Bridge, DeliveryStatus, InProcessBridge};
use crate::codec_table::CodecTable;
use crate::message::Inbound;
use crate::proxy::ReplyProxy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tandem_wire::WireError;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Receiving end of a registered actor's mailbox.
///
/// The host runtime decides how the mailbox is drained (task per actor,
/// shared executor, synchronous loop); this core only guarantees that a
/// delivered message is enqueued atomically.
pub type Mailbox = mpsc::UnboundedReceiver<Inbound>;

/// One runtime's view of the combined address space.
pub struct ActorSystem {
    shared: Arc<SystemShared>,
}

/// State shared with bridges that deliver into this system.
pub(crate) struct SystemShared {
    name: String,
    locals: RwLock<HashMap<String, mpsc::UnboundedSender<Inbound>>>,
    proxies: RwLock<HashMap<String, ReplyProxy>>,
    peer: RwLock<Option<Arc<dyn Bridge>>>,
    codecs: CodecTable,
    started: AtomicBool,
}

impl ActorSystem {
    /// System with the full built-in wire contract registered.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_codecs(name, CodecTable::with_builtin())
    }

    /// System with a caller-assembled codec table (partial registration is
    /// how forward-compatibility drops are exercised).
    pub fn with_codecs(name: impl Into<String>, codecs: CodecTable) -> Self {
        Self {
            shared: Arc::new(SystemShared {
                name: name.into(),
                locals: RwLock::new(HashMap::new()),
                proxies: RwLock::new(HashMap::new()),
                peer: RwLock::new(None),
                codecs,
                started: AtomicBool::new(false),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub(crate) fn shared(&self) -> Arc<SystemShared> {
        Arc::clone(&self.shared)
    }

    /// Install in-process bridges in both directions between two systems.
    ///
    /// Call after both systems exist and before either side's first
    /// cross-boundary send; part of the host's ordered startup.
    pub fn link(a: &ActorSystem, b: &ActorSystem) {
        a.set_bridge(Arc::new(InProcessBridge::new(b)));
        b.set_bridge(Arc::new(InProcessBridge::new(a)));
        info!(a = %a.name(), b = %b.name(), "runtimes linked");
    }

    /// Install the bridge this system uses to reach its peer.
    pub fn set_bridge(&self, bridge: Arc<dyn Bridge>) {
        *self.shared.peer.write() = Some(bridge);
    }

    /// Bridge to the peer runtime, when linked.
    pub fn peer_bridge(&self) -> Option<Arc<dyn Bridge>> {
        self.shared.peer.read().clone()
    }

    /// Register an actor name and hand back its mailbox.
    ///
    /// Collisions are not detected: registering an existing name replaces
    /// the previous mailbox.
    pub fn register(&self, name: &str) -> Mailbox {
        let (tx, rx) = mpsc::unbounded_channel();
        let previous = self.shared.locals.write().insert(name.to_owned(), tx);
        if previous.is_some() {
            warn!(system = %self.shared.name, actor = name, "re-registered name, previous mailbox replaced");
        } else {
            debug!(system = %self.shared.name, actor = name, "actor registered");
        }
        rx
    }

    /// Remove an actor name from the directory.
    pub fn unregister(&self, name: &str) {
        if self.shared.locals.write().remove(name).is_some() {
            debug!(system = %self.shared.name, actor = name, "actor unregistered");
        }
    }

    /// Resolve a name to a location-transparent reference.
    ///
    /// Lookup order: local directory, then reply proxies, then the peer
    /// runtime via `bridge.exists`. A name known nowhere yields `None`; the
    /// caller should treat that like an unbound reference.
    pub fn resolve(&self, name: &str) -> Option<ActorRef> {
        if let Some(mailbox) = self.shared.locals.read().get(name) {
            return Some(ActorRef::local(name, mailbox.clone()));
        }
        if let Some(proxy) = self.shared.proxies.read().get(name) {
            return Some(proxy.actor_ref());
        }
        if let Some(bridge) = self.peer_bridge() {
            if bridge.exists(name) {
                return Some(ActorRef::remote(name, bridge));
            }
        }
        None
    }

    /// Mark startup complete. Paired with [`shutdown`](Self::shutdown); the
    /// host sequences both sides before any cross-boundary traffic.
    pub fn init(&self) {
        if self.shared.started.swap(true, Ordering::SeqCst) {
            warn!(system = %self.shared.name, "init called twice");
        } else {
            info!(system = %self.shared.name, "actor system started");
        }
    }

    /// Tear down the directory and proxy table.
    ///
    /// Subsequent deliveries from the peer report `NotFound`; our own bridge
    /// handle is dropped so no further outbound crossing is possible.
    pub fn shutdown(&self) {
        self.shared.started.store(false, Ordering::SeqCst);
        let dropped = {
            let mut locals = self.shared.locals.write();
            let n = locals.len();
            locals.clear();
            n
        };
        self.shared.proxies.write().clear();
        *self.shared.peer.write() = None;
        info!(system = %self.shared.name, actors = dropped, "actor system shut down");
    }

    pub fn is_started(&self) -> bool {
        self.shared.started.load(Ordering::SeqCst)
    }

    /// Names currently registered in the local directory.
    pub fn local_actors(&self) -> Vec<String> {
        self.shared.locals.read().keys().cloned().collect()
    }

    /// Number of reply proxies currently held for peer senders.
    pub fn proxy_count(&self) -> usize {
        self.shared.proxies.read().len()
    }
}

impl std::fmt::Debug for ActorSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorSystem")
            .field("name", &self.shared.name)
            .field("locals", &self.shared.locals.read().len())
            .field("proxies", &self.shared.proxies.read().len())
            .field("linked", &self.shared.peer.read().is_some())
            .finish()
    }
}

impl SystemShared {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn has_local(&self, name: &str) -> bool {
        self.locals.read().contains_key(name)
    }

    /// Peer-side dispatch path: target lookup, decode, proxy attach,
    /// enqueue. Called by a bridge on behalf of the other runtime.
    pub(crate) fn deliver_inbound(
        &self,
        target: &str,
        sender: Option<&str>,
        type_id: i32,
        payload: &[u8],
    ) -> DeliveryStatus {
        let mailbox = match self.locals.read().get(target) {
            Some(mailbox) => mailbox.clone(),
            None => {
                debug!(system = %self.name, target_actor = target, "inbound target not found");
                return DeliveryStatus::NotFound;
            }
        };

        let msg = match self.codecs.decode(type_id, payload) {
            Ok(msg) => msg,
            Err(WireError::UnknownKind { type_id }) => {
                // Forward-compatibility policy: old runtimes ignore kinds a
                // newer peer sends. Payload is released, status stays 0.
                debug!(system = %self.name, type_id, "unknown inbound kind dropped");
                return DeliveryStatus::Delivered;
            }
            Err(err) => {
                warn!(system = %self.name, type_id, %err, "undecodable inbound payload dropped");
                return DeliveryStatus::Delivered;
            }
        };

        if let Some(sender) = sender {
            self.ensure_proxy(sender);
        }

        let inbound = Inbound {
            sender: sender.map(str::to_owned),
            msg,
        };
        match mailbox.send(inbound) {
            Ok(()) => DeliveryStatus::Delivered,
            Err(_) => {
                debug!(system = %self.name, target_actor = target, "inbound mailbox closed");
                DeliveryStatus::NotFound
            }
        }
    }

    /// Record a reply proxy for a peer sender, once.
    ///
    /// Only `deliver` creates proxies; existence queries never do.
    fn ensure_proxy(&self, sender: &str) {
        if self.has_local(sender) {
            // A local actor under the sender's name shadows any proxy
            return;
        }
        let bridge = match self.peer.read().clone() {
            Some(bridge) => bridge,
            None => {
                warn!(system = %self.name, sender, "inbound sender but no peer bridge installed");
                return;
            }
        };
        let mut proxies = self.proxies.write();
        if !proxies.contains_key(sender) {
            debug!(system = %self.name, sender, "reply proxy created");
            proxies.insert(sender.to_owned(), ReplyProxy::new(sender, bridge));
        }
    }
}
