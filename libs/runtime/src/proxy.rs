//! Reply Proxy
//!
//! A local stand-in for a peer-runtime sender. When an inbound
//! cross-boundary message carries a sender name, the receiving system
//! records a proxy under that name so the ordinary directory lookup finds
//! it; any message sent to it forwards back across the boundary to the true
//! origin. One proxy per distinct sender name, created on first delivery and
//! reused afterwards - no churn per message.

use crate::actor_ref::ActorRef;
use crate::bridge::{Bridge, DeliveryStatus};
use crate::message::Message;
use std::sync::Arc;

/// Stand-in for a sender that lives in the peer runtime.
#[derive(Clone)]
pub struct ReplyProxy {
    name: String,
    bridge: Arc<dyn Bridge>,
}

impl ReplyProxy {
    pub(crate) fn new(name: impl Into<String>, bridge: Arc<dyn Bridge>) -> Self {
        Self {
            name: name.into(),
            bridge,
        }
    }

    /// Name of the peer sender this proxy stands in for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference that routes back across the boundary to the origin sender.
    ///
    /// This is what the directory hands out when the proxy's name is
    /// resolved; "reply to whoever sent this" needs no special casing.
    pub fn actor_ref(&self) -> ActorRef {
        ActorRef::remote(self.name.clone(), Arc::clone(&self.bridge))
    }

    /// Forward a message across the boundary to the origin sender.
    pub fn forward(&self, msg: Box<dyn Message>, sender: Option<&str>) -> DeliveryStatus {
        self.bridge
            .deliver(&self.name, sender, msg.kind() as i32, msg.wire_bytes())
    }
}

impl std::fmt::Debug for ReplyProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyProxy").field("name", &self.name).finish()
    }
}
