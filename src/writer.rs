//! Event serializer.
//!
//! Fields are appended in the order `id, pubkey, created_at, kind, tags,
//! content, sig` into a buffer that [`estimate_size`] has sized up front, so
//! writing an event never reallocates.

use crate::error::Result;
use crate::event::{Event, EventId};
use crate::tags::{Coordinate, ElementEncoding, element_encoding, parse_hex_ref};
use crate::varint::{MAX_VARINT_LEN, put_uvarint};
use crate::{Field, KIND_LEN, PUBKEY_LEN, SIGNATURE_LEN, parse_hex};

/// Upper bound on the encoded length of `event`.
///
/// Every count and length prefix is charged at the maximum varint width and
/// every tag element at its full text length, which covers both dense tag
/// forms: a reference is 32 bytes for 64 characters of hex, a coordinate
/// drops at least 33 characters.
pub fn estimate_size(event: &Event) -> usize {
    let mut size = Field::Id.max_len()
        + Field::PubKey.max_len()
        + Field::CreatedAt.max_len()
        + Field::Kind.max_len()
        + Field::Signature.max_len();
    // tag count
    size += MAX_VARINT_LEN;
    for tag in &event.tags {
        size += MAX_VARINT_LEN;
        for element in &tag.0 {
            size += MAX_VARINT_LEN + element.len();
        }
    }
    size + MAX_VARINT_LEN + event.content.len()
}

/// Encode `event` into a freshly sized buffer.
pub fn to_vec(event: &Event) -> Result<Vec<u8>> {
    let mut writer = Writer::for_event(event);
    writer.write_event(event)?;
    Ok(writer.into_inner())
}

/// Appends encoded fields to an owned buffer.
///
/// The buffer's length is the write cursor. A writer can be reused for many
/// events by calling [`Writer::clear`] between them; the borrow checker keeps
/// any slice returned by [`Writer::as_bytes`] from outliving that reset. If a
/// write fails the buffer holds a partial event and must be cleared before
/// reuse. A writer is not synchronized: give each worker its own.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Writer { buf: Vec::new() }
    }

    /// Empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Writer {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Empty writer with room for the largest encoding of `event`.
    pub fn for_event(event: &Event) -> Self {
        Self::with_capacity(estimate_size(event))
    }

    /// Reset the cursor, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_id(&mut self, id: &EventId) {
        self.buf.extend_from_slice(id.as_bytes());
    }

    /// Append the 32 bytes behind a 64 character hex pubkey. Nothing is
    /// written if the hex is invalid.
    pub fn write_pubkey(&mut self, pubkey: &str) -> Result<()> {
        let bytes: [u8; PUBKEY_LEN] = parse_hex(pubkey, Field::PubKey)?;
        self.buf.extend_from_slice(&bytes);
        Ok(())
    }

    pub fn write_created_at(&mut self, created_at: u64) {
        put_uvarint(&mut self.buf, created_at);
    }

    pub fn write_kind(&mut self, kind: u16) {
        let bytes: [u8; KIND_LEN] = kind.to_le_bytes();
        self.buf.extend_from_slice(&bytes);
    }

    /// Append the tag list.
    ///
    /// A reference or coordinate value that does not have the shape its tag
    /// name promises is an error rather than a fallback to the generic form,
    /// since the reader picks the layout from the tag name alone.
    pub fn write_tags<T, S>(&mut self, tags: &[T]) -> Result<()>
    where
        T: AsRef<[S]>,
        S: AsRef<str>,
    {
        put_uvarint(&mut self.buf, tags.len() as u64);
        for tag in tags {
            let tag = tag.as_ref();
            put_uvarint(&mut self.buf, tag.len() as u64);
            let first: Option<&str> = tag.first().map(|element| element.as_ref());
            for (index, element) in tag.iter().enumerate() {
                let element: &str = element.as_ref();
                match element_encoding(first, index) {
                    ElementEncoding::Generic => self.write_text(element),
                    ElementEncoding::HexRef => {
                        let bytes = parse_hex_ref(element).inspect_err(|_| {
                            log::warn!("reference tag {:?} has a malformed value", first)
                        })?;
                        self.buf.extend_from_slice(&bytes);
                    }
                    ElementEncoding::Coordinate => {
                        let coordinate = Coordinate::parse(element).inspect_err(|err| {
                            log::warn!("coordinate tag value {:?}: {}", element, err)
                        })?;
                        put_uvarint(&mut self.buf, coordinate.encoded_len() as u64);
                        coordinate.append_to(&mut self.buf);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn write_content(&mut self, content: &str) {
        self.write_text(content);
    }

    /// Append the 64 bytes behind a 128 character hex signature. Nothing is
    /// written if the hex is invalid.
    pub fn write_sig(&mut self, sig: &str) -> Result<()> {
        let bytes: [u8; SIGNATURE_LEN] = parse_hex(sig, Field::Signature)?;
        self.buf.extend_from_slice(&bytes);
        Ok(())
    }

    /// Append a whole event, stopping at the first field that fails.
    pub fn write_event(&mut self, event: &Event) -> Result<()> {
        self.write_id(&event.id);
        self.write_pubkey(&event.pubkey)?;
        self.write_created_at(event.created_at);
        self.write_kind(event.kind);
        self.write_tags(&event.tags)?;
        self.write_content(&event.content);
        self.write_sig(&event.sig)
    }

    fn write_text(&mut self, text: &str) {
        put_uvarint(&mut self.buf, text.len() as u64);
        self.buf.extend_from_slice(text.as_bytes());
    }
}

impl AsRef<[u8]> for Writer {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}
