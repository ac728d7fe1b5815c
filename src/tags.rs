//! Dense encodings for common tag shapes.
//!
//! Most tags are written element by element with a length prefix. Two shapes
//! are common enough to get a denser form for their second element:
//!
//! - `["e", <event id hex>, ...]` and `["p", <pubkey hex>, ...]`: the hex is
//!   stored as 32 raw bytes with no length prefix.
//! - `["a", "<kind>:<pubkey hex>:<identifier>", ...]`: stored under one length
//!   prefix as a little-endian `u16` kind, 32 raw pubkey bytes and the raw
//!   identifier bytes.
//!
//! The writer and the reader both decide the layout with [`element_encoding`],
//! keyed on the tag's first element, so the two sides cannot disagree.

use std::fmt;

use crate::error::{CodecError, Result};
use crate::{Field, PUBKEY_LEN, parse_hex};

/// First elements whose second element is a 32-byte hex reference.
pub const HEX_REF_MARKERS: &[&str] = &["e", "p"];

/// First elements whose second element is a `kind:pubkey:identifier` coordinate.
pub const COORDINATE_MARKERS: &[&str] = &["a"];

/// How a single tag element is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementEncoding {
    /// Varint length prefix followed by the UTF-8 bytes
    Generic,
    /// 32 raw bytes, no prefix
    HexRef,
    /// Varint length prefix over kind, pubkey and identifier
    Coordinate,
}

/// Layout of the element at `index` in a tag whose first element is `first`.
///
/// Only the second element is ever encoded densely.
#[inline]
pub fn element_encoding(first: Option<&str>, index: usize) -> ElementEncoding {
    if index != 1 {
        return ElementEncoding::Generic;
    }
    match first {
        Some(marker) if marker.len() == 1 && HEX_REF_MARKERS.contains(&marker) => {
            ElementEncoding::HexRef
        }
        Some(marker) if COORDINATE_MARKERS.contains(&marker) => ElementEncoding::Coordinate,
        _ => ElementEncoding::Generic,
    }
}

/// Decode the hex of a reference tag value.
pub(crate) fn parse_hex_ref(value: &str) -> Result<[u8; PUBKEY_LEN]> {
    parse_hex(value, Field::Tags).map_err(|_| CodecError::InvalidHexRef)
}

/// An addressable event coordinate, `<kind>:<pubkey hex>:<identifier>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate<'a> {
    pub kind: u16,
    pub pubkey: [u8; PUBKEY_LEN],
    pub identifier: &'a str,
}

impl<'a> Coordinate<'a> {
    /// Bytes preceding the identifier in the encoded form.
    pub const FIXED_LEN: usize = 2 + PUBKEY_LEN;

    /// Parse the textual form.
    ///
    /// The kind must be a canonical decimal `u16` and the pubkey exactly 64
    /// lowercase hex characters, so that [`Display`](fmt::Display) gives back
    /// the same string. The identifier may be empty and may contain `:`.
    pub fn parse(value: &'a str) -> Result<Self> {
        let mut parts = value.splitn(3, ':');
        let kind = parts.next().unwrap_or_default();
        let pubkey = parts
            .next()
            .ok_or(CodecError::InvalidCoordinate("missing pubkey"))?;
        let identifier = parts
            .next()
            .ok_or(CodecError::InvalidCoordinate("missing identifier"))?;

        let kind = parse_kind(kind)?;
        let pubkey = parse_hex(pubkey, Field::Tags).map_err(|_| {
            CodecError::InvalidCoordinate("pubkey is not 64 lowercase hex characters")
        })?;
        Ok(Coordinate {
            kind,
            pubkey,
            identifier,
        })
    }

    /// Length of the encoded form, excluding its length prefix.
    pub fn encoded_len(&self) -> usize {
        Self::FIXED_LEN + self.identifier.len()
    }

    /// Append the encoded form, without the length prefix.
    pub fn append_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.kind.to_le_bytes());
        buf.extend_from_slice(&self.pubkey);
        buf.extend_from_slice(self.identifier.as_bytes());
    }

    /// Split an encoded form back into its parts. `bytes` is exactly the
    /// region covered by the length prefix.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < Self::FIXED_LEN {
            return Err(CodecError::InvalidCoordinate("shorter than kind and pubkey"));
        }
        let (kind, rest) = bytes.split_at(2);
        let (pubkey, identifier) = rest.split_at(PUBKEY_LEN);
        let identifier =
            std::str::from_utf8(identifier).map_err(|_| CodecError::InvalidUtf8(Field::Tags))?;

        let mut key = [0u8; PUBKEY_LEN];
        key.copy_from_slice(pubkey);
        Ok(Coordinate {
            kind: u16::from_le_bytes([kind[0], kind[1]]),
            pubkey: key,
            identifier,
        })
    }
}

impl fmt::Display for Coordinate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.kind,
            hex::encode(self.pubkey),
            self.identifier
        )
    }
}

fn parse_kind(kind: &str) -> Result<u16> {
    let canonical = !kind.is_empty()
        && kind.bytes().all(|b| b.is_ascii_digit())
        && (kind == "0" || !kind.starts_with('0'));
    if !canonical {
        return Err(CodecError::InvalidCoordinate("kind is not a decimal number"));
    }
    kind.parse()
        .map_err(|_| CodecError::InvalidCoordinate("kind does not fit in 16 bits"))
}
