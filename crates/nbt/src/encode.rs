//! Binary writer.
//!
//! Serializes a tree into the big-endian NBT layout. The whole document is
//! built in one growable buffer, then handed to the gzip envelope.
//!
//! # The `Encode` Trait
//!
//! [`Encode`] writes a value's payload (no tag id, no name). It is
//! implemented for every payload type of the tree:
//!
//! | Rust Type     | Payload                                  |
//! |---------------|------------------------------------------|
//! | `i8`..`i64`   | big-endian two's complement, 1/2/4/8 B   |
//! | `f32`, `f64`  | big-endian IEEE-754 bits, 4/8 B          |
//! | `TagString`   | `i16` length + raw bytes                 |
//! | `Array<T>`    | `i32` count + elements                   |
//! | `List`        | element id + `i32` count + payloads      |
//! | `Compound`    | `(id, name, payload)`* + `0x00`          |

use crate::compress;
use crate::error::{EncodeError, Result};
use crate::tag::TagKind;
use crate::value::{Array, Compound, List, NamedTag, Tag, TagString};

/// Trait for payloads that can be written in binary form.
pub trait Encode {
    /// Append this payload to `out`.
    fn encode(&self, out: &mut Vec<u8>);
}

impl Encode for i8 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }
}

impl Encode for i16 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }
}

impl Encode for i32 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }
}

impl Encode for i64 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }
}

impl Encode for f32 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_bits().to_be_bytes());
    }
}

impl Encode for f64 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_bits().to_be_bytes());
    }
}

impl Encode for TagString {
    fn encode(&self, out: &mut Vec<u8>) {
        // Length fits: TagString::new caps it at i16::MAX.
        (self.len() as i16).encode(out);
        out.extend_from_slice(self.as_bytes());
    }
}

impl<T: Encode> Encode for Array<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        (self.len() as i32).encode(out);
        for item in self.iter() {
            item.encode(out);
        }
    }
}

impl Encode for List {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.element_kind().id());
        (self.len() as i32).encode(out);
        for item in self {
            item.encode(out);
        }
    }
}

impl Encode for Compound {
    fn encode(&self, out: &mut Vec<u8>) {
        for entry in self {
            entry.encode(out);
        }
        out.push(TagKind::End.id());
    }
}

impl Encode for NamedTag {
    /// Writes the full `(id, name, payload)` triple.
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.value.kind().id());
        self.name.encode(out);
        self.value.encode(out);
    }
}

impl Encode for Tag {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Tag::End => {}
            Tag::Byte(n) => n.encode(out),
            Tag::Short(n) => n.encode(out),
            Tag::Int(n) => n.encode(out),
            Tag::Long(n) => n.encode(out),
            Tag::Float(n) => n.encode(out),
            Tag::Double(n) => n.encode(out),
            Tag::ByteArray(a) => a.encode(out),
            Tag::String(s) => s.encode(out),
            Tag::List(l) => l.encode(out),
            Tag::Compound(c) => c.encode(out),
            Tag::IntArray(a) => a.encode(out),
            Tag::LongArray(a) => a.encode(out),
        }
    }
}

/// Serialize a document without the gzip envelope.
///
/// # Errors
///
/// Returns `EncodeError::RootNotCompound` if the root value is not a
/// compound; nothing is written in that case.
pub fn to_vec(root: &NamedTag) -> std::result::Result<Vec<u8>, EncodeError> {
    let kind = root.value.kind();
    if kind != TagKind::Compound {
        return Err(EncodeError::RootNotCompound(kind));
    }
    let mut out = Vec::new();
    root.encode(&mut out);
    tracing::debug!(bytes = out.len(), "wrote document to buffer");
    Ok(out)
}

/// Serialize a document and gzip it.
///
/// ```
/// use nbt::value::{Compound, NamedTag};
///
/// let root = NamedTag::root(Compound::new().with("foo", 42i32).unwrap());
/// let bytes = nbt::encode::encode(&root).unwrap();
/// assert_eq!(nbt::decode::decode(&bytes).unwrap(), root);
/// ```
///
/// # Errors
///
/// Returns `Error::Encode` for a non-compound root and `Error::Compression`
/// if the gzip encoder fails.
pub fn encode(root: &NamedTag) -> Result<Vec<u8>> {
    let raw = to_vec(root)?;
    Ok(compress::compress(&raw)?)
}
