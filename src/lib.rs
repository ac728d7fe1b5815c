//! # Nostr Binary Library
//!
//! A compact binary encoder/decoder for Nostr events, used in place of JSON
//! where size and speed matter.
//!
//! ## Layout
//! Fields are written back to back in a fixed order:
//!
//! | Field | Width | Encoding |
//! |---|---|---|
//! | `id` | 32 | raw digest bytes |
//! | `pubkey` | 32 | raw bytes of the 64 character hex |
//! | `created_at` | 1-10 | unsigned varint |
//! | `kind` | 2 | little-endian `u16` |
//! | tag count | 1-10 | unsigned varint |
//! | per tag: element count | 1-10 | unsigned varint |
//! | element | varies | varint length + UTF-8, or a dense form (see [`tags`]) |
//! | `content` | varies | varint length + UTF-8 |
//! | `sig` | 64 | raw bytes of the 128 character hex |
//!
//! ## Features
//! - `e`/`p` tag values stored as 32 raw bytes, `a` tag coordinates stored as
//!   kind + raw pubkey + identifier
//! - Output buffers sized once with [`estimate_size`], so encoding never
//!   reallocates; a [`Writer`] can be cleared and reused
//! - Zero-copy decoding with [`from_slice_ref`]: content and plain tag values
//!   borrow the input buffer
//! - Every read is bounds-checked; truncated or hostile input returns a
//!   [`CodecError`] and never panics
//!
//! The codec logs through the [`log`] facade only when a dense tag value is
//! malformed or a decode fails. It works the same with no logger installed.
//!
//! ## Example
//! ```rust
//! use nostr_binary::{Event, Tag, from_slice, to_vec};
//!
//! let event = Event {
//!     pubkey: "11".repeat(32),
//!     created_at: 1_700_000_000,
//!     kind: 1,
//!     tags: vec![Tag::new(["e".to_string(), "aa".repeat(32)])],
//!     content: "hello".to_string(),
//!     sig: "22".repeat(64),
//!     ..Event::default()
//! };
//!
//! let bytes = to_vec(&event).unwrap();
//! assert_eq!(bytes.len(), 177);
//! assert_eq!(from_slice(&bytes).unwrap(), event);
//! ```

use std::fmt;

pub mod error;
pub mod event;
pub mod reader;
pub mod sample;
pub mod tags;
pub mod varint;
pub mod writer;

pub use error::{CodecError, ErrorKind, Result};
pub use event::{Event, EventId, EventRef, Tag};
pub use reader::{Reader, from_slice, from_slice_partial, from_slice_ref};
pub use writer::{Writer, estimate_size, to_vec};

// Fixed field widths
pub const ID_LEN: usize = 32;
pub const PUBKEY_LEN: usize = 32;
pub const KIND_LEN: usize = 2;
pub const SIGNATURE_LEN: usize = 64;

/// The fields of an encoded event, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    PubKey,
    CreatedAt,
    Kind,
    Tags,
    Content,
    Signature,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Id,
        Field::PubKey,
        Field::CreatedAt,
        Field::Kind,
        Field::Tags,
        Field::Content,
        Field::Signature,
    ];

    /// Encoded width of a fixed-width field, `None` for variable ones.
    pub const fn fixed_len(self) -> Option<usize> {
        match self {
            Field::Id => Some(ID_LEN),
            Field::PubKey => Some(PUBKEY_LEN),
            Field::Kind => Some(KIND_LEN),
            Field::Signature => Some(SIGNATURE_LEN),
            Field::CreatedAt | Field::Tags | Field::Content => None,
        }
    }

    /// Largest encoding of the field itself, ignoring any payload: the
    /// fixed width, or the widest varint prefix.
    pub const fn max_len(self) -> usize {
        match self.fixed_len() {
            Some(len) => len,
            None => varint::MAX_VARINT_LEN,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::PubKey => "pubkey",
            Field::CreatedAt => "created_at",
            Field::Kind => "kind",
            Field::Tags => "tags",
            Field::Content => "content",
            Field::Signature => "signature",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decode exactly `N` bytes from `2 * N` lowercase hex characters.
///
/// Uppercase digits are rejected because the decoder always produces
/// lowercase, and accepting them would break the round trip.
pub(crate) fn parse_hex<const N: usize>(text: &str, field: Field) -> Result<[u8; N]> {
    if text.len() != 2 * N {
        return Err(CodecError::InvalidHexLength {
            field,
            expected: 2 * N,
            got: text.len(),
        });
    }
    if !text.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(CodecError::InvalidHex(field));
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(text, &mut out).map_err(|_| CodecError::InvalidHex(field))?;
    Ok(out)
}
