//! # Tandem Dispatch Core
//!
//! Location-transparent message dispatch between two independently built
//! actor runtimes sharing one address space. A sender resolves a name
//! through its runtime's directory and sends a typed message through one
//! uniform call; whether the target lives in this runtime or in the peer is
//! the reference's problem, not the caller's.
//!
//! ```text
//! ┌──────────────────────┐          ┌──────────────────────┐
//! │  ActorSystem "alpha" │          │  ActorSystem "beta"  │
//! │                      │          │                      │
//! │  resolve("ponger")   │          │  locals: ponger ──┐  │
//! │        │             │  bridge  │                   │  │
//! │        ▼             │ deliver()│  codec table      │  │
//! │  ActorRef::Remote ───┼──────────┼─► decode ► mailbox┘  │
//! │                      │          │  proxies: pinger     │
//! │  locals: pinger ◄────┼──────────┼── reply via proxy    │
//! └──────────────────────┘          └──────────────────────┘
//! ```
//!
//! # Guarantees
//!
//! - A `send` is atomic from the caller's view: it fully delivers or drops,
//!   and the owned message is released exactly once on every branch.
//! - Cross-boundary delivery is a synchronous call into the peer runtime;
//!   there is no timeout, cancellation, or delivery confirmation beyond the
//!   [`DeliveryStatus`] code.
//! - Per-target ordering across the boundary is a property of the bridge
//!   implementation, not of this contract.
//!
//! # Example
//!
//! ```rust
//! use tandem_runtime::ActorSystem;
//! use tandem_wire::Ping;
//!
//! let alpha = ActorSystem::new("alpha");
//! let beta = ActorSystem::new("beta");
//! ActorSystem::link(&alpha, &beta);
//!
//! let _mailbox = beta.register("ponger");
//! let ponger = alpha.resolve("ponger").unwrap();
//! ponger.send(Box::new(Ping::new(1)), Some("pinger")).unwrap();
//! ```

pub mod actor_ref;
pub mod bridge;
pub mod codec_table;
pub mod error;
pub mod message;
pub mod proxy;
pub mod pubsub;
pub mod system;

pub use actor_ref::ActorRef;
pub use bridge::{Bridge, DeliveryStatus, InProcessBridge};
pub use codec_table::CodecTable;
pub use error::SendError;
pub use message::{Inbound, Message};
pub use proxy::ReplyProxy;
pub use pubsub::{SubscriberEntry, SubscriberTable};
pub use system::{ActorSystem, Mailbox};
