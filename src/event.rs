//! Nostr event model.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CodecError, Result};
use crate::{Field, ID_LEN, parse_hex};

/// SHA-256 digest identifying an event.
///
/// Held as raw bytes; its textual form (JSON, `Display`, `FromStr`) is 64
/// lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EventId([u8; ID_LEN]);

impl EventId {
    pub const fn new(bytes: [u8; ID_LEN]) -> Self {
        EventId(bytes)
    }

    /// Build an id from a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(EventId)
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; ID_LEN]> for EventId {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        EventId(bytes)
    }
}

impl AsRef<[u8]> for EventId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for EventId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hex(s, Field::Id).map(EventId)
    }
}

impl Serialize for EventId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EventIdVisitor;

        impl Visitor<'_> for EventIdVisitor {
            type Value = EventId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 64 character lowercase hex string")
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<EventId, E>
            where
                E: de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(EventIdVisitor)
    }
}

/// Wrapper for a Nostr tag expressed as an array of strings.
///
/// The first element names the tag, the rest carry data:
///
/// - `e` – references another event by id
/// - `p` – references another author's public key
/// - `a` – references an addressable event as `kind:pubkey:identifier`
/// - `t` – free-form topic or hashtag
///
/// Element order is significant and preserved by the codec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag(pub Vec<String>);

impl Tag {
    pub fn new<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tag(elements.into_iter().map(Into::into).collect())
    }
}

impl AsRef<[String]> for Tag {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

/// Core Nostr event.
///
/// ```json
/// {
///   "id": "5c83…",
///   "pubkey": "7e7e…",
///   "created_at": 1700000000,
///   "kind": 1,
///   "tags": [["e", "aaaa…"], ["t", "news"]],
///   "content": "hello",
///   "sig": "9081…"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// SHA-256 of the canonical serialization.
    pub id: EventId,
    /// Author public key (64 lowercase hex characters).
    pub pubkey: String,
    /// Unix timestamp of creation.
    pub created_at: u64,
    /// Kind number, e.g. `1` or `30023`.
    pub kind: u16,
    pub tags: Vec<Tag>,
    pub content: String,
    /// Schnorr signature (128 lowercase hex characters).
    pub sig: String,
}

impl Event {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// An event decoded without copying its text out of the input buffer.
///
/// `content` and generic tag elements borrow the buffer the event was read
/// from; reference and coordinate tag values are rebuilt as owned strings.
/// The view is tied to the buffer's lifetime, so the buffer cannot be dropped
/// or rewritten while the view exists. Call [`EventRef::into_owned`] to keep
/// the event longer than the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRef<'a> {
    pub id: EventId,
    pub pubkey: String,
    pub created_at: u64,
    pub kind: u16,
    pub tags: Vec<Vec<Cow<'a, str>>>,
    pub content: &'a str,
    pub sig: String,
}

impl EventRef<'_> {
    pub fn into_owned(self) -> Event {
        Event {
            id: self.id,
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self
                .tags
                .into_iter()
                .map(|tag| Tag(tag.into_iter().map(Cow::into_owned).collect()))
                .collect(),
            content: self.content.to_owned(),
            sig: self.sig,
        }
    }
}
