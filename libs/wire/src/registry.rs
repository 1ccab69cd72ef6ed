//! # Message Kind Registry
//!
//! Flat, centrally allocated namespace of numeric message ids shared by both
//! runtimes. The registry is declarative data: id, name, and fixed wire size
//! per kind. Adding a kind means adding it here and to the peer runtime in
//! lockstep; the [`EXPECTED_WIRE_SIZES`] table is the recorded contract that
//! regression tests check against.

use crate::error::WireError;
use crate::messages::{
    DataRequest, DataResponse, MarketDepth, MarketUpdate, Ping, Pong, Subscribe, Unsubscribe,
};
use num_enum::TryFromPrimitive;
use zerocopy::{AsBytes, FromBytes};

/// Lowest id allocated to cross-runtime kinds. Everything below is reserved
/// for runtime-internal messages so the two numbering spaces never collide.
pub const CROSS_RUNTIME_ID_FLOOR: i32 = 1000;

/// Numeric identifiers of every cross-runtime message kind.
///
/// Closed registry: each id maps to exactly one fixed layout. Changing a
/// layout without allocating a new id is a silent contract violation - there
/// is no version negotiation on the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(i32)]
pub enum MsgKind {
    Ping = 1000,
    Pong = 1001,
    DataRequest = 1002,
    DataResponse = 1003,
    Subscribe = 1010,
    Unsubscribe = 1011,
    MarketUpdate = 1012,
    MarketDepth = 1013,
}

impl MsgKind {
    /// Human-readable kind name for logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            MsgKind::Ping => "Ping",
            MsgKind::Pong => "Pong",
            MsgKind::DataRequest => "DataRequest",
            MsgKind::DataResponse => "DataResponse",
            MsgKind::Subscribe => "Subscribe",
            MsgKind::Unsubscribe => "Unsubscribe",
            MsgKind::MarketUpdate => "MarketUpdate",
            MsgKind::MarketDepth => "MarketDepth",
        }
    }

    /// Fixed wire size of this kind's layout in bytes.
    pub fn wire_size(&self) -> usize {
        match self {
            MsgKind::Ping => Ping::WIRE_SIZE,
            MsgKind::Pong => Pong::WIRE_SIZE,
            MsgKind::DataRequest => DataRequest::WIRE_SIZE,
            MsgKind::DataResponse => DataResponse::WIRE_SIZE,
            MsgKind::Subscribe => Subscribe::WIRE_SIZE,
            MsgKind::Unsubscribe => Unsubscribe::WIRE_SIZE,
            MsgKind::MarketUpdate => MarketUpdate::WIRE_SIZE,
            MsgKind::MarketDepth => MarketDepth::WIRE_SIZE,
        }
    }

    /// Every kind in the registry, in id order.
    pub fn all() -> [MsgKind; 8] {
        [
            MsgKind::Ping,
            MsgKind::Pong,
            MsgKind::DataRequest,
            MsgKind::DataResponse,
            MsgKind::Subscribe,
            MsgKind::Unsubscribe,
            MsgKind::MarketUpdate,
            MsgKind::MarketDepth,
        ]
    }

    /// Whether a raw type id belongs to the cross-runtime numbering space.
    pub fn is_cross_runtime(type_id: i32) -> bool {
        type_id >= CROSS_RUNTIME_ID_FLOOR
    }
}

/// Recorded contract sizes. The regression test asserts `size_of` of every
/// layout against this table so an independent recompilation cannot drift.
pub const EXPECTED_WIRE_SIZES: [(MsgKind, usize); 8] = [
    (MsgKind::Ping, 4),
    (MsgKind::Pong, 4),
    (MsgKind::DataRequest, 72),
    (MsgKind::DataResponse, 16),
    (MsgKind::Subscribe, 32),
    (MsgKind::Unsubscribe, 32),
    (MsgKind::MarketUpdate, 32),
    (MsgKind::MarketDepth, 136),
];

/// A registered wire message: a fixed layout bound to its kind id.
///
/// `from_wire(to_wire(v)) == v` must hold for every valid value; the default
/// implementations get that from zerocopy and the macro-enforced layouts.
pub trait WireMessage:
    AsBytes + FromBytes + Copy + PartialEq + Send + Sync + std::fmt::Debug + 'static
{
    /// The kind id this layout is registered under.
    const KIND: MsgKind;

    /// Fixed-layout bytes of this value.
    fn to_wire(&self) -> &[u8] {
        self.as_bytes()
    }

    /// Reconstruct a value from fixed-layout bytes.
    ///
    /// The payload must be exactly the contract size; anything else is a
    /// framing bug on the sending side.
    fn from_wire(bytes: &[u8]) -> Result<Self, WireError> {
        let need = std::mem::size_of::<Self>();
        if bytes.len() != need {
            return Err(WireError::payload_size_mismatch(
                Self::KIND,
                need,
                bytes.len(),
            ));
        }
        Self::read_from(bytes)
            .ok_or_else(|| WireError::malformed(Self::KIND, "byte reinterpretation failed"))
    }
}

impl WireMessage for Ping {
    const KIND: MsgKind = MsgKind::Ping;
}

impl WireMessage for Pong {
    const KIND: MsgKind = MsgKind::Pong;
}

impl WireMessage for DataRequest {
    const KIND: MsgKind = MsgKind::DataRequest;
}

impl WireMessage for DataResponse {
    const KIND: MsgKind = MsgKind::DataResponse;
}

impl WireMessage for Subscribe {
    const KIND: MsgKind = MsgKind::Subscribe;
}

impl WireMessage for Unsubscribe {
    const KIND: MsgKind = MsgKind::Unsubscribe;
}

impl WireMessage for MarketUpdate {
    const KIND: MsgKind = MsgKind::MarketUpdate;
}

impl WireMessage for MarketDepth {
    const KIND: MsgKind = MsgKind::MarketDepth;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_the_contract() {
        assert_eq!(MsgKind::Ping as i32, 1000);
        assert_eq!(MsgKind::Pong as i32, 1001);
        assert_eq!(MsgKind::DataRequest as i32, 1002);
        assert_eq!(MsgKind::DataResponse as i32, 1003);
        assert_eq!(MsgKind::Subscribe as i32, 1010);
        assert_eq!(MsgKind::Unsubscribe as i32, 1011);
        assert_eq!(MsgKind::MarketUpdate as i32, 1012);
        assert_eq!(MsgKind::MarketDepth as i32, 1013);
    }

    #[test]
    fn try_from_primitive() {
        assert_eq!(MsgKind::try_from(1000i32).unwrap(), MsgKind::Ping);
        assert_eq!(MsgKind::try_from(1013i32).unwrap(), MsgKind::MarketDepth);
        // Gaps and runtime-internal ids are not in the registry
        assert!(MsgKind::try_from(1004i32).is_err());
        assert!(MsgKind::try_from(999i32).is_err());
    }

    #[test]
    fn all_ids_are_cross_runtime() {
        for kind in MsgKind::all() {
            assert!(MsgKind::is_cross_runtime(kind as i32), "{kind:?}");
        }
        assert!(!MsgKind::is_cross_runtime(1));
        assert!(!MsgKind::is_cross_runtime(999));
    }

    #[test]
    fn wire_sizes_match_recorded_table() {
        for (kind, expected) in EXPECTED_WIRE_SIZES {
            assert_eq!(
                kind.wire_size(),
                expected,
                "{} wire size drifted from the recorded contract",
                kind.name()
            );
        }
    }

    #[test]
    fn from_wire_rejects_wrong_length() {
        let err = Ping::from_wire(&[0u8; 3]).unwrap_err();
        assert_eq!(
            err,
            WireError::PayloadSizeMismatch {
                kind: MsgKind::Ping,
                need: 4,
                got: 3
            }
        );
        assert!(Ping::from_wire(&[0u8; 5]).is_err());
    }
}
