//! Unsigned variable-width integers.
//!
//! Each byte carries 7 value bits, least significant group first, with the
//! high bit set on every byte except the last. A `u64` takes 1 to 10 bytes.

/// Longest encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Why a varint could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    /// The buffer ended while the continuation bit was still set
    Truncated,
    /// More than 64 bits of value
    Overflow,
}

/// Append `value` to `buf`.
#[inline]
pub fn put_uvarint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Read a varint from the front of `buf`, returning the value and the number
/// of bytes consumed.
#[inline]
pub fn uvarint(buf: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut value = 0u64;
    let mut shift = 0u32;
    for (i, &byte) in buf.iter().enumerate() {
        // the tenth byte holds only the top bit of a u64
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(VarintError::Overflow);
        }
        value |= u64::from(byte & 0x7f) << shift;
        if byte < 0x80 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }
    Err(VarintError::Truncated)
}
