//! # Tandem Wire Contract
//!
//! Fixed-layout message definitions shared by both actor runtimes. Each
//! message kind pairs a `#[repr(C)]` value type with a numeric kind id; the
//! two runtimes compile against this crate independently, so the byte layout
//! *is* the contract. There is no version negotiation: changing a layout
//! without allocating a new id silently corrupts cross-runtime traffic.
//!
//! ## Layout rules
//!
//! - Fixed-width integers only (`i32`/`i64`, never native-width types)
//! - Booleans encoded as `i32` (1 = true, 0 = false)
//! - Text as fixed-capacity byte buffers: either NUL-terminated or carrying
//!   an explicit length field ([`WireText64`]); a given field commits to one
//! - No heap pointers, no dynamically sized payloads
//! - Kind ids >= 1000 are cross-runtime; ids below 1000 are reserved for
//!   runtime-internal messages so the numbering spaces never collide
//!
//! ## Quick start
//!
//! ```rust
//! use tandem_wire::{MarketUpdate, WireMessage};
//!
//! let update = MarketUpdate::new("ETH-USD", 2000.25, 1_700_000_000, 42);
//! let bytes = update.to_wire();
//! let back = MarketUpdate::from_wire(bytes).unwrap();
//! assert_eq!(back, update);
//! ```

pub mod error;
pub mod macros;
pub mod messages;
pub mod registry;
pub mod text;

pub use error::{WireError, WireResult};
pub use messages::{
    DataRequest, DataResponse, MarketDepth, MarketUpdate, Ping, Pong, Subscribe, Unsubscribe,
};
pub use registry::{MsgKind, WireMessage, CROSS_RUNTIME_ID_FLOOR, EXPECTED_WIRE_SIZES};
pub use text::{get_cstr, put_cstr, WireText64};
