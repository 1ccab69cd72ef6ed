//! Fixed-capacity text fields for wire messages.
//!
//! Two conventions exist in the contract and every text field commits to
//! exactly one of them:
//!
//! - **Explicit length**: [`WireText64`] carries a byte buffer plus a `u32`
//!   length; the reader stops at `len`.
//! - **NUL-terminated**: a plain `[u8; N]` field written by [`put_cstr`] and
//!   read by [`get_cstr`]; the reader stops at the first NUL.
//!
//! Writers truncate, never grow: over-long input is cut deterministically at
//! the last UTF-8 boundary that fits, so both runtimes observe the same
//! bytes and no write can overflow the buffer.

use tracing::trace;

/// Capacity of the explicit-length text field, in bytes.
pub const WIRE_TEXT_MAX: usize = 64;

/// Fixed-capacity text with an explicit length field (no heap, no pointers).
///
/// Mirrors the interop string layout: 64 data bytes followed by a `u32`
/// length. 68 bytes on the wire, 4-byte aligned, zero padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireText64 {
    pub data: [u8; WIRE_TEXT_MAX],
    pub len: u32,
}

unsafe impl ::zerocopy::AsBytes for WireText64 {
    fn only_derive_is_allowed_to_implement_this_trait() {}
}

unsafe impl ::zerocopy::FromBytes for WireText64 {
    fn only_derive_is_allowed_to_implement_this_trait() {}
}

unsafe impl ::zerocopy::FromZeroes for WireText64 {
    fn only_derive_is_allowed_to_implement_this_trait() {}
}

impl WireText64 {
    /// Empty text.
    pub const fn empty() -> Self {
        Self {
            data: [0; WIRE_TEXT_MAX],
            len: 0,
        }
    }

    /// Build from a string, truncating to capacity.
    pub fn new(s: &str) -> Self {
        let mut text = Self::empty();
        text.set(s);
        text
    }

    /// Overwrite the contents, truncating to capacity.
    pub fn set(&mut self, s: &str) {
        let take = floor_char_boundary(s, WIRE_TEXT_MAX);
        if take < s.len() {
            trace!(len = s.len(), kept = take, "wire text truncated");
        }
        self.data = [0; WIRE_TEXT_MAX];
        self.data[..take].copy_from_slice(&s.as_bytes()[..take]);
        self.len = take as u32;
    }

    /// Read back as a string slice.
    ///
    /// A corrupt length field is clamped to capacity; bytes that are not
    /// valid UTF-8 read as empty rather than panicking.
    pub fn as_str(&self) -> &str {
        let len = (self.len as usize).min(WIRE_TEXT_MAX);
        std::str::from_utf8(&self.data[..len]).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for WireText64 {
    fn default() -> Self {
        Self::empty()
    }
}

/// Write a NUL-terminated string into a fixed buffer.
///
/// Clears the buffer, copies at most `buf.len() - 1` bytes (cut at a UTF-8
/// boundary), and leaves at least one trailing NUL. Truncation is
/// deterministic; the buffer can never overflow.
pub fn put_cstr(buf: &mut [u8], s: &str) {
    buf.fill(0);
    if buf.is_empty() {
        return;
    }
    let take = floor_char_boundary(s, buf.len() - 1);
    if take < s.len() {
        trace!(len = s.len(), kept = take, cap = buf.len(), "cstr field truncated");
    }
    buf[..take].copy_from_slice(&s.as_bytes()[..take]);
}

/// Read a NUL-terminated string from a fixed buffer.
///
/// Stops at the first NUL, or at the end of the buffer if no terminator is
/// present. Invalid UTF-8 reads as empty.
pub fn get_cstr(buf: &[u8]) -> &str {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    std::str::from_utf8(&buf[..end]).unwrap_or("")
}

/// Largest index `<= max` that falls on a UTF-8 character boundary of `s`.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    let mut idx = max;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::AsBytes;

    #[test]
    fn wire_text_round_trip() {
        let text = WireText64::new("ETH-USD");
        assert_eq!(text.as_str(), "ETH-USD");
        assert_eq!(text.len, 7);
    }

    #[test]
    fn wire_text_truncates_at_capacity() {
        let long = "x".repeat(200);
        let text = WireText64::new(&long);
        assert_eq!(text.len as usize, WIRE_TEXT_MAX);
        assert_eq!(text.as_str(), &long[..WIRE_TEXT_MAX]);
    }

    #[test]
    fn wire_text_truncates_on_char_boundary() {
        // 63 ASCII bytes followed by a 2-byte codepoint that cannot fit whole
        let s = format!("{}é", "a".repeat(63));
        let text = WireText64::new(&s);
        assert_eq!(text.len, 63);
        assert_eq!(text.as_str(), "a".repeat(63));
    }

    #[test]
    fn wire_text_layout_is_68_bytes() {
        assert_eq!(std::mem::size_of::<WireText64>(), 68);
        let text = WireText64::new("abc");
        assert_eq!(text.as_bytes().len(), 68);
    }

    #[test]
    fn cstr_round_trip() {
        let mut buf = [0u8; 8];
        put_cstr(&mut buf, "BTC");
        assert_eq!(get_cstr(&buf), "BTC");
    }

    #[test]
    fn cstr_reserves_terminator() {
        let mut buf = [0u8; 8];
        put_cstr(&mut buf, "ABCDEFGHIJ");
        assert_eq!(get_cstr(&buf), "ABCDEFG");
        assert_eq!(buf[7], 0);
    }

    #[test]
    fn cstr_reader_stops_at_first_nul() {
        let buf = *b"AB\0CD\0EF";
        assert_eq!(get_cstr(&buf), "AB");
    }

    #[test]
    fn cstr_reader_handles_missing_terminator() {
        let buf = *b"ABCDEFGH";
        assert_eq!(get_cstr(&buf), "ABCDEFGH");
    }

    #[test]
    fn corrupt_length_is_clamped() {
        let mut text = WireText64::new("ok");
        text.len = 5000;
        // Clamped read stays within the buffer and must not panic
        assert!(text.as_str().len() <= WIRE_TEXT_MAX);
        assert!(text.as_str().starts_with("ok"));
    }
}
