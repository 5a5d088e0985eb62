//! Binary reader.
//!
//! Reads the big-endian NBT layout back into a [`NamedTag`] tree. Every read
//! is bounds-checked against the decompressed buffer; running out of bytes is
//! a [`DecodeError::UnexpectedEof`], never a panic.

use crate::compress;
use crate::error::{DecodeError, Result};
use crate::tag::TagKind;
use crate::value::{Array, Compound, List, NamedTag, Tag, TagString};

/// Deepest list/compound nesting the reader accepts.
pub const MAX_DEPTH: usize = 512;

type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Cursor over an uncompressed document.
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            depth: 0,
        }
    }

    /// Bytes consumed so far.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(DecodeError::UnexpectedEof)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(DecodeError::UnexpectedEof)?;
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        self.take(N)?
            .try_into()
            .map_err(|_| DecodeError::UnexpectedEof)
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> DecodeResult<i8> {
        Ok(i8::from_be_bytes(self.array()?))
    }

    pub fn read_i16(&mut self) -> DecodeResult<i16> {
        Ok(i16::from_be_bytes(self.array()?))
    }

    pub fn read_i32(&mut self) -> DecodeResult<i32> {
        Ok(i32::from_be_bytes(self.array()?))
    }

    pub fn read_i64(&mut self) -> DecodeResult<i64> {
        Ok(i64::from_be_bytes(self.array()?))
    }

    pub fn read_f32(&mut self) -> DecodeResult<f32> {
        Ok(f32::from_bits(u32::from_be_bytes(self.array()?)))
    }

    pub fn read_f64(&mut self) -> DecodeResult<f64> {
        Ok(f64::from_bits(u64::from_be_bytes(self.array()?)))
    }

    /// Read a tag id byte.
    pub fn read_kind(&mut self) -> DecodeResult<TagKind> {
        let id = self.read_u8()?;
        TagKind::from_id(id).ok_or(DecodeError::InvalidTagId(id))
    }

    /// Read a non-negative `i32` element count.
    fn read_len(&mut self) -> DecodeResult<usize> {
        let len = self.read_i32()?;
        usize::try_from(len).map_err(|_| DecodeError::NegativeLength(len))
    }

    /// Read an `i16`-prefixed string payload.
    pub fn read_string(&mut self) -> DecodeResult<TagString> {
        let len = self.read_i16()?;
        let len = usize::try_from(len).map_err(|_| DecodeError::NegativeLength(len.into()))?;
        Ok(TagString::new(self.take(len)?)?)
    }

    /// Read `count` fixed-width elements, without trusting `count` for the
    /// initial allocation.
    fn read_elements<T>(
        &mut self,
        width: usize,
        mut read: impl FnMut(&mut Self) -> DecodeResult<T>,
    ) -> DecodeResult<Vec<T>> {
        let len = self.read_len()?;
        if len.saturating_mul(width) > self.remaining() {
            return Err(DecodeError::UnexpectedEof);
        }
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(read(self)?);
        }
        Ok(items)
    }

    /// Read the payload of a value of the given kind.
    pub fn read_payload(&mut self, kind: TagKind) -> DecodeResult<Tag> {
        Ok(match kind {
            TagKind::End => Tag::End,
            TagKind::Byte => Tag::Byte(self.read_i8()?),
            TagKind::Short => Tag::Short(self.read_i16()?),
            TagKind::Int => Tag::Int(self.read_i32()?),
            TagKind::Long => Tag::Long(self.read_i64()?),
            TagKind::Float => Tag::Float(self.read_f32()?),
            TagKind::Double => Tag::Double(self.read_f64()?),
            TagKind::ByteArray => {
                Tag::ByteArray(Array::new(self.read_elements(1, Self::read_i8)?)?)
            }
            TagKind::String => Tag::String(self.read_string()?),
            TagKind::List => Tag::List(self.nested(Self::read_list)?),
            TagKind::Compound => Tag::Compound(self.nested(Self::read_compound)?),
            TagKind::IntArray => {
                Tag::IntArray(Array::new(self.read_elements(4, Self::read_i32)?)?)
            }
            TagKind::LongArray => {
                Tag::LongArray(Array::new(self.read_elements(8, Self::read_i64)?)?)
            }
        })
    }

    fn nested<T>(&mut self, read: impl FnOnce(&mut Self) -> DecodeResult<T>) -> DecodeResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(DecodeError::MaxDepthExceeded);
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    fn read_list(&mut self) -> DecodeResult<List> {
        let kind = self.read_kind()?;
        let raw_len = self.read_i32()?;
        let len = usize::try_from(raw_len).map_err(|_| DecodeError::NegativeLength(raw_len))?;
        if kind == TagKind::End && len > 0 {
            return Err(DecodeError::NonEmptyEndList(raw_len));
        }
        // Every payload is at least one byte except End, ruled out above.
        if len > self.remaining() {
            return Err(DecodeError::UnexpectedEof);
        }
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.read_payload(kind)?);
        }
        Ok(List::new(kind, items)?)
    }

    fn read_compound(&mut self) -> DecodeResult<Compound> {
        let mut compound = Compound::new();
        loop {
            let kind = self.read_kind()?;
            if kind == TagKind::End {
                return Ok(compound);
            }
            let name = self.read_string()?;
            let value = self.read_payload(kind)?;
            compound.push(NamedTag { name, value })?;
        }
    }

    /// Read a full document root: id, name, compound payload.
    pub fn read_root(&mut self) -> DecodeResult<NamedTag> {
        let kind = self.read_kind()?;
        if kind != TagKind::Compound {
            return Err(DecodeError::RootNotCompound(kind));
        }
        let name = self.read_string()?;
        let value = self.read_payload(kind)?;
        Ok(NamedTag { name, value })
    }
}

/// Read an uncompressed document.
///
/// Bytes after the root compound are ignored.
///
/// # Errors
///
/// Returns a `DecodeError` if the buffer is truncated or malformed, or if the
/// root is not a compound. No partial tree is returned.
pub fn from_slice(data: &[u8]) -> std::result::Result<NamedTag, DecodeError> {
    let mut reader = Reader::new(data);
    let root = reader.read_root()?;
    if reader.remaining() > 0 {
        tracing::debug!(trailing = reader.remaining(), "ignoring bytes after root compound");
    }
    tracing::debug!(bytes = reader.position(), "decoded document");
    Ok(root)
}

/// Gunzip and read a document.
///
/// # Errors
///
/// Returns `Error::Compression` if the envelope is not valid gzip and
/// `Error::Decode` if the payload is malformed.
pub fn decode(data: &[u8]) -> Result<NamedTag> {
    let raw = compress::decompress(data)?;
    Ok(from_slice(&raw)?)
}
