//! Cross-Runtime Message Layouts
//!
//! The eight message kinds of the interop contract, defined with
//! [`define_wire!`](crate::define_wire) so each struct carries its recorded
//! contract size as a compile-time assertion. Ids live in
//! [`MsgKind`](crate::registry::MsgKind); both tables grow in lockstep.

use crate::define_wire;
use crate::text::{get_cstr, put_cstr, WireText64};

define_wire! {
    /// Request one round-trip hop; the receiver replies with [`Pong`]
    /// carrying the same count.
    Ping {
        size: 4,
        u32: { count: i32 }
    }
}

impl Ping {
    pub fn new(count: i32) -> Self {
        Self { count }
    }
}

define_wire! {
    /// Reply to a [`Ping`], echoing its count.
    Pong {
        size: 4,
        u32: { count: i32 }
    }
}

impl Pong {
    pub fn new(count: i32) -> Self {
        Self { count }
    }
}

define_wire! {
    /// Ask a peer actor for the latest value of a symbol.
    ///
    /// `symbol` uses the explicit-length text convention.
    DataRequest {
        size: 72,
        u32: { request_id: i32 }
        special: { symbol: WireText64 }
    }
}

impl DataRequest {
    pub fn new(request_id: i32, symbol: &str) -> Self {
        Self {
            request_id,
            symbol: WireText64::new(symbol),
        }
    }

    pub fn symbol(&self) -> &str {
        self.symbol.as_str()
    }
}

define_wire! {
    /// Answer to a [`DataRequest`]. `found` is a wire boolean (1/0); when 0
    /// the value field is meaningless.
    DataResponse {
        size: 16,
        u64: { value: f64 }
        u32: {
            request_id: i32,
            found: i32
        }
    }
}

impl DataResponse {
    pub fn new(request_id: i32, value: f64, found: bool) -> Self {
        Self {
            value,
            request_id,
            found: found as i32,
        }
    }

    pub fn found(&self) -> bool {
        self.found != 0
    }
}

define_wire! {
    /// Subscribe the sending actor to a topic. `topic` is NUL-terminated.
    Subscribe {
        size: 32,
        u8: { topic: [u8; 32] }
    }
}

impl Subscribe {
    pub fn new(topic: &str) -> Self {
        let mut buf = [0u8; 32];
        put_cstr(&mut buf, topic);
        Self { topic: buf }
    }

    pub fn topic(&self) -> &str {
        get_cstr(&self.topic)
    }
}

define_wire! {
    /// Remove the sending actor's subscription to a topic. NUL-terminated.
    Unsubscribe {
        size: 32,
        u8: { topic: [u8; 32] }
    }
}

impl Unsubscribe {
    pub fn new(topic: &str) -> Self {
        let mut buf = [0u8; 32];
        put_cstr(&mut buf, topic);
        Self { topic: buf }
    }

    pub fn topic(&self) -> &str {
        get_cstr(&self.topic)
    }
}

define_wire! {
    /// One published tick for a symbol. `symbol` is NUL-terminated.
    MarketUpdate {
        size: 32,
        u64: {
            price: f64,
            timestamp: i64
        }
        u32: { volume: i32 }
        u8: {
            symbol: [u8; 8],
            _pad: [u8; 4]
        }
    }
}

impl MarketUpdate {
    pub fn new(symbol: &str, price: f64, timestamp: i64, volume: i32) -> Self {
        let mut buf = [0u8; 8];
        put_cstr(&mut buf, symbol);
        Self::new_raw(price, timestamp, volume, buf, [0; 4])
    }

    pub fn symbol(&self) -> &str {
        get_cstr(&self.symbol)
    }
}

/// Depth levels carried by [`MarketDepth`]; deeper books are truncated.
pub const MAX_DEPTH_LEVELS: usize = 5;

define_wire! {
    /// Top-of-book depth snapshot: up to [`MAX_DEPTH_LEVELS`] bid and ask
    /// levels. `num_levels` says how many entries of each array are valid.
    MarketDepth {
        size: 136,
        u64: {
            bid_prices: [f64; 5],
            ask_prices: [f64; 5]
        }
        u32: {
            num_levels: i32,
            bid_sizes: [i32; 5],
            ask_sizes: [i32; 5]
        }
        u8: {
            symbol: [u8; 8],
            _pad: [u8; 4]
        }
    }
}

impl MarketDepth {
    /// Build a snapshot from per-level `(bid_price, bid_size, ask_price,
    /// ask_size)` tuples, truncating beyond [`MAX_DEPTH_LEVELS`].
    pub fn new(symbol: &str, levels: &[(f64, i32, f64, i32)]) -> Self {
        let mut buf = [0u8; 8];
        put_cstr(&mut buf, symbol);

        let count = levels.len().min(MAX_DEPTH_LEVELS);
        let mut bid_prices = [0f64; 5];
        let mut ask_prices = [0f64; 5];
        let mut bid_sizes = [0i32; 5];
        let mut ask_sizes = [0i32; 5];
        for (i, &(bp, bs, ap, asz)) in levels.iter().take(count).enumerate() {
            bid_prices[i] = bp;
            bid_sizes[i] = bs;
            ask_prices[i] = ap;
            ask_sizes[i] = asz;
        }

        Self::new_raw(
            bid_prices,
            ask_prices,
            count as i32,
            bid_sizes,
            ask_sizes,
            buf,
            [0; 4],
        )
    }

    pub fn symbol(&self) -> &str {
        get_cstr(&self.symbol)
    }

    /// Valid level count, clamped to the array capacity.
    pub fn levels(&self) -> usize {
        (self.num_levels.max(0) as usize).min(MAX_DEPTH_LEVELS)
    }

    /// Bid `(price, size)` at a level, `None` past `num_levels`.
    pub fn bid(&self, level: usize) -> Option<(f64, i32)> {
        (level < self.levels()).then(|| (self.bid_prices[level], self.bid_sizes[level]))
    }

    /// Ask `(price, size)` at a level, `None` past `num_levels`.
    pub fn ask(&self, level: usize) -> Option<(f64, i32)> {
        (level < self.levels()).then(|| (self.ask_prices[level], self.ask_sizes[level]))
    }
}
