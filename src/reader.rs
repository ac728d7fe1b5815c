//! Event deserializer.
//!
//! [`Reader`] walks a byte slice with a cursor, one field at a time, in the
//! same order the writer appends them. Every read checks the remaining
//! length first, so truncated or hostile input produces an error and never a
//! panic.

use std::borrow::Cow;

use crate::error::{CodecError, Result};
use crate::event::{Event, EventId, EventRef};
use crate::tags::{Coordinate, ElementEncoding, element_encoding};
use crate::varint::{VarintError, uvarint};
use crate::{Field, ID_LEN, KIND_LEN, PUBKEY_LEN, SIGNATURE_LEN};

/// Decode an event that fills `bytes` exactly.
pub fn from_slice(bytes: &[u8]) -> Result<Event> {
    from_slice_ref(bytes).map(EventRef::into_owned)
}

/// Decode an event that fills `bytes` exactly, borrowing its text from
/// `bytes`.
pub fn from_slice_ref(bytes: &[u8]) -> Result<EventRef<'_>> {
    let mut reader = Reader::new(bytes);
    let event = reader
        .read_event_ref()
        .inspect_err(|err| log::debug!("event decode failed: {}", err))?;
    match reader.remaining().len() {
        0 => Ok(event),
        n => Err(CodecError::TrailingBytes(n)),
    }
}

/// Decode one event from the front of `bytes`, also returning the bytes
/// after it.
pub fn from_slice_partial(bytes: &[u8]) -> Result<(Event, &[u8])> {
    let mut reader = Reader::new(bytes);
    let event = reader
        .read_event()
        .inspect_err(|err| log::debug!("event decode failed: {}", err))?;
    Ok((event, reader.remaining()))
}

/// Cursor over an encoded event.
///
/// Each `read_*` method consumes its field and advances; the cursor never
/// moves backwards. After an error the cursor position is unspecified and the
/// reader should be dropped.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// The unread part of the input.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn read_id(&mut self) -> Result<EventId> {
        self.read_array::<ID_LEN>(Field::Id).map(EventId::new)
    }

    /// Read the pubkey as 64 lowercase hex characters.
    pub fn read_pubkey(&mut self) -> Result<String> {
        let bytes = self.take(PUBKEY_LEN, Field::PubKey)?;
        Ok(hex::encode(bytes))
    }

    pub fn read_created_at(&mut self) -> Result<u64> {
        self.read_uvarint(Field::CreatedAt)
    }

    pub fn read_kind(&mut self) -> Result<u16> {
        self.read_array::<KIND_LEN>(Field::Kind)
            .map(u16::from_le_bytes)
    }

    /// Read the tag list.
    ///
    /// Generic elements borrow the input. Reference and coordinate values are
    /// turned back into their textual form, using the already decoded first
    /// element of the tag to pick the layout exactly as the writer did.
    pub fn read_tags(&mut self) -> Result<Vec<Vec<Cow<'a, str>>>> {
        let count = self.read_len(Field::Tags)?;
        // every tag takes at least one byte, which bounds the allocation
        let mut tags = Vec::with_capacity(count.min(self.remaining().len()));
        for _ in 0..count {
            let len = self.read_len(Field::Tags)?;
            let mut tag: Vec<Cow<'a, str>> = Vec::with_capacity(len.min(self.remaining().len()));
            for index in 0..len {
                let encoding = element_encoding(tag.first().map(|first| &**first), index);
                let element = match encoding {
                    ElementEncoding::Generic => Cow::Borrowed(self.read_text(Field::Tags)?),
                    ElementEncoding::HexRef => {
                        let bytes = self.take(PUBKEY_LEN, Field::Tags)?;
                        Cow::Owned(hex::encode(bytes))
                    }
                    ElementEncoding::Coordinate => {
                        let len = self.read_len(Field::Tags)?;
                        let bytes = self.take(len, Field::Tags)?;
                        Cow::Owned(Coordinate::from_bytes(bytes)?.to_string())
                    }
                };
                tag.push(element);
            }
            tags.push(tag);
        }
        Ok(tags)
    }

    pub fn read_content(&mut self) -> Result<&'a str> {
        self.read_text(Field::Content)
    }

    /// Read the signature as 128 lowercase hex characters.
    pub fn read_sig(&mut self) -> Result<String> {
        let bytes = self.take(SIGNATURE_LEN, Field::Signature)?;
        Ok(hex::encode(bytes))
    }

    /// Read a whole event, borrowing text from the input.
    ///
    /// Nothing is returned unless every field decoded.
    pub fn read_event_ref(&mut self) -> Result<EventRef<'a>> {
        Ok(EventRef {
            id: self.read_id()?,
            pubkey: self.read_pubkey()?,
            created_at: self.read_created_at()?,
            kind: self.read_kind()?,
            tags: self.read_tags()?,
            content: self.read_content()?,
            sig: self.read_sig()?,
        })
    }

    /// Read a whole event into owned strings.
    pub fn read_event(&mut self) -> Result<Event> {
        self.read_event_ref().map(EventRef::into_owned)
    }

    fn take(&mut self, n: usize, field: Field) -> Result<&'a [u8]> {
        let available = self.buf.len() - self.pos;
        if n > available {
            return Err(CodecError::UnexpectedEof {
                field,
                needed: n,
                available,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self, field: Field) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    fn read_uvarint(&mut self, field: Field) -> Result<u64> {
        match uvarint(self.remaining()) {
            Ok((value, read)) => {
                self.pos += read;
                Ok(value)
            }
            Err(VarintError::Truncated) => Err(CodecError::UnexpectedEof {
                field,
                needed: self.remaining().len() + 1,
                available: self.remaining().len(),
            }),
            Err(VarintError::Overflow) => Err(CodecError::VarintOverflow(field)),
        }
    }

    fn read_len(&mut self, field: Field) -> Result<usize> {
        let value = self.read_uvarint(field)?;
        usize::try_from(value).map_err(|_| CodecError::LengthOverflow { field, value })
    }

    fn read_text(&mut self, field: Field) -> Result<&'a str> {
        let len = self.read_len(field)?;
        let bytes = self.take(len, field)?;
        std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8(field))
    }
}
