//! Inbound decode table.
//!
//! Maps numeric kind ids to decode functions, populated at startup.
//! Replaces a hand-maintained switch over ids: adding a message kind is one
//! `register::<M>()` call, never an edit to a central dispatcher.
//!
//! A type id with no entry is the forward-compatibility path: the inbound
//! payload is dropped silently (logged at debug) so an older runtime ignores
//! kinds a newer peer has learned to send.

use crate::message::Message;
use std::collections::HashMap;
use tandem_wire::{MsgKind, WireError, WireMessage};
use tracing::debug;

type DecodeFn = fn(&[u8]) -> Result<Box<dyn Message>, WireError>;

fn decode_as<M: WireMessage>(payload: &[u8]) -> Result<Box<dyn Message>, WireError> {
    Ok(Box::new(M::from_wire(payload)?))
}

/// Registry of inbound decoders for one runtime.
#[derive(Default)]
pub struct CodecTable {
    decoders: HashMap<MsgKind, DecodeFn>,
}

impl CodecTable {
    /// Empty table; kinds must be registered before the runtime is linked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with every kind of the wire contract registered.
    pub fn with_builtin() -> Self {
        let mut table = Self::new();
        table.register::<tandem_wire::Ping>();
        table.register::<tandem_wire::Pong>();
        table.register::<tandem_wire::DataRequest>();
        table.register::<tandem_wire::DataResponse>();
        table.register::<tandem_wire::Subscribe>();
        table.register::<tandem_wire::Unsubscribe>();
        table.register::<tandem_wire::MarketUpdate>();
        table.register::<tandem_wire::MarketDepth>();
        table
    }

    /// Register a kind's decoder.
    pub fn register<M: WireMessage>(&mut self) {
        if self.decoders.insert(M::KIND, decode_as::<M>).is_some() {
            debug!(kind = M::KIND.name(), "decoder re-registered");
        }
    }

    pub fn is_registered(&self, kind: MsgKind) -> bool {
        self.decoders.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decode an inbound payload by its raw type id.
    ///
    /// `UnknownKind` covers both an id outside the registry and an id this
    /// runtime has no decoder for; the caller decides the drop policy.
    pub fn decode(&self, type_id: i32, payload: &[u8]) -> Result<Box<dyn Message>, WireError> {
        let kind =
            MsgKind::try_from(type_id).map_err(|_| WireError::UnknownKind { type_id })?;
        let decode = self
            .decoders
            .get(&kind)
            .ok_or(WireError::UnknownKind { type_id })?;
        decode(payload)
    }
}

impl std::fmt::Debug for CodecTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecTable")
            .field("registered", &self.decoders.len())
            .finish()
    }
}
