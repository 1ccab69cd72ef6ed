//! Wire Structure Generation Macro
//!
//! Provides the `define_wire!` macro for declaratively defining fixed-layout
//! interop message structs with explicit field ordering, padding, and
//! constructor generation.
//!
//! The macro enforces the layout discipline the wire contract depends on:
//!
//! - Field ordering by alignment class (u64 → u32 → u16 → u8) so the struct
//!   contains no hidden compiler padding; any padding is an explicit
//!   `_pad: [u8; N]` field the writer zeroes
//! - Required zerocopy trait impls for byte-level encode/decode
//! - A compile-time assertion that the struct size matches the recorded
//!   contract size, so an accidental layout change fails the build instead
//!   of corrupting cross-runtime traffic
//!
//! ## Usage
//!
//! ```rust
//! use tandem_wire::define_wire;
//!
//! define_wire! {
//!     /// Example fill report
//!     Fill {
//!         size: 24,
//!         u64: { price: f64, quantity: i64 }
//!         u32: { order_id: i32 }
//!         u16: {}
//!         u8: { side: u8, _pad: [u8; 3] }
//!         special: {}
//!     }
//! }
//! ```

/// Generate a fixed-layout wire struct with alignment-ordered fields.
///
/// Field groups are keyed by alignment requirement:
/// - `u64`: 8-byte aligned fields (`u64`, `i64`, `f64`, and arrays of them)
/// - `u32`: 4-byte aligned fields (`u32`, `i32`, and arrays of them)
/// - `u16`: 2-byte aligned fields
/// - `u8`: single bytes, byte arrays, and explicit `_pad` fields
/// - `special`: trailing composite fields such as [`crate::WireText64`]
///
/// The `#[repr(C)]` layout means fields may be under-aligned when the struct
/// itself sits in a byte buffer; copy a field to a local before comparing it.
#[macro_export]
macro_rules! define_wire {
    (
        $(#[$meta:meta])*
        $name:ident {
            size: $expected_size:expr,
            $(u64: { $($u64_field:ident: $u64_type:ty),* $(,)? })?
            $(u32: { $($u32_field:ident: $u32_type:ty),* $(,)? })?
            $(u16: { $($u16_field:ident: $u16_type:ty),* $(,)? })?
            $(u8: { $($u8_field:ident: $u8_type:ty),* $(,)? })?
            $(special: { $($special_field:ident: $special_type:ty),* $(,)? })?
        }
    ) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name {
            // Fields ordered by alignment; padding is always explicit
            $($(pub $u64_field: $u64_type,)*)?
            $($(pub $u32_field: $u32_type,)*)?
            $($(pub $u16_field: $u16_type,)*)?
            $($(pub $u8_field: $u8_type,)*)?
            $($(pub $special_field: $special_type,)*)?
        }

        // Manual zerocopy impls: the alignment-ordered groups plus explicit
        // _pad fields guarantee there are no uninitialized padding bytes.
        unsafe impl ::zerocopy::AsBytes for $name {
            fn only_derive_is_allowed_to_implement_this_trait() {}
        }

        unsafe impl ::zerocopy::FromBytes for $name {
            fn only_derive_is_allowed_to_implement_this_trait() {}
        }

        unsafe impl ::zerocopy::FromZeroes for $name {
            fn only_derive_is_allowed_to_implement_this_trait() {}
        }

        impl $name {
            /// Contract size of this wire layout in bytes.
            pub const WIRE_SIZE: usize = $expected_size;

            /// Auto-generated constructor with fields in alignment order.
            /// Prefer the semantic `new()` constructors where they exist.
            #[allow(clippy::too_many_arguments)]
            pub fn new_raw(
                $($($u64_field: $u64_type,)*)?
                $($($u32_field: $u32_type,)*)?
                $($($u16_field: $u16_type,)*)?
                $($($u8_field: $u8_type,)*)?
                $($($special_field: $special_type,)*)?
            ) -> Self {
                Self {
                    $($($u64_field,)*)?
                    $($($u32_field,)*)?
                    $($($u16_field,)*)?
                    $($($u8_field,)*)?
                    $($($special_field,)*)?
                }
            }

            /// Size of this wire layout in bytes.
            pub const fn wire_size() -> usize {
                ::std::mem::size_of::<Self>()
            }
        }

        // Layout regression guard: fails the build if the struct drifts from
        // the recorded contract size.
        const _: () = {
            const ACTUAL: usize = ::std::mem::size_of::<$name>();
            const EXPECTED: usize = $expected_size;
            if ACTUAL != EXPECTED {
                panic!(concat!(
                    stringify!($name),
                    " wire size drifted from the recorded contract size ",
                    stringify!($expected_size),
                    " - check field alignment and explicit padding"
                ));
            }
        };
    };
}

#[cfg(test)]
mod tests {
    use zerocopy::{AsBytes, FromBytes};

    define_wire! {
        /// Test layout exercising every field group
        Probe {
            size: 24,
            u64: { stamp: i64 }
            u32: { count: u32 }
            u16: { flags: u16 }
            u8: {
                status: u8,
                _pad: [u8; 1]
            }
            special: { tail: [u8; 8] }
        }
    }

    #[test]
    fn macro_generates_struct_and_constructor() {
        let probe = Probe::new_raw(7, 3, 0x0101, 1, [0; 1], *b"ABCDEFGH");

        let stamp = probe.stamp;
        let count = probe.count;
        assert_eq!(stamp, 7);
        assert_eq!(count, 3);
        assert_eq!(Probe::wire_size(), 24);
        assert_eq!(Probe::WIRE_SIZE, 24);
    }

    #[test]
    fn byte_round_trip() {
        let probe = Probe::new_raw(-5, 9, 2, 0, [0; 1], [0xAA; 8]);

        let bytes = probe.as_bytes();
        assert_eq!(bytes.len(), Probe::wire_size());

        let parsed = Probe::read_from(bytes).unwrap();
        assert_eq!(parsed, probe);
    }
}
