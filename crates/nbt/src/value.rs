//! In-memory NBT value tree.
//!
//! Trees are built bottom-up by the decoder and the text parser, then read by
//! the encoder and the printer. Every payload whose width is bounded by the
//! wire format goes through a checked constructor, so a tree built through
//! this API always encodes.
//!
//! # Matching on values
//!
//! [`Tag`] is a closed enum; consumers match on it exhaustively:
//!
//! ```
//! use nbt::value::Tag;
//!
//! fn describe(tag: &Tag) -> String {
//!     match tag {
//!         Tag::End => "end".to_string(),
//!         Tag::Byte(n) => format!("byte: {n}"),
//!         Tag::Short(n) => format!("short: {n}"),
//!         Tag::Int(n) => format!("int: {n}"),
//!         Tag::Long(n) => format!("long: {n}"),
//!         Tag::Float(n) => format!("float: {n}"),
//!         Tag::Double(n) => format!("double: {n}"),
//!         Tag::ByteArray(a) => format!("byte array: {} entries", a.len()),
//!         Tag::String(s) => format!("string: {:?}", s.to_string_lossy()),
//!         Tag::List(l) => format!("list: {} entries", l.len()),
//!         Tag::Compound(c) => format!("compound: {} entries", c.len()),
//!         Tag::IntArray(a) => format!("int array: {} entries", a.len()),
//!         Tag::LongArray(a) => format!("long array: {} entries", a.len()),
//!     }
//! }
//!
//! assert_eq!(describe(&Tag::Int(42)), "int: 42");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

use crate::error::ConstructionError;
use crate::tag::TagKind;

/// One node of the value tree.
#[derive(Debug, Clone)]
pub enum Tag {
    /// Marker only; terminates compounds on the wire and types empty lists.
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Array<i8>),
    String(TagString),
    List(List),
    Compound(Compound),
    IntArray(Array<i32>),
    LongArray(Array<i64>),
}

impl Tag {
    /// Get the kind of this value.
    #[must_use]
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::End => TagKind::End,
            Tag::Byte(_) => TagKind::Byte,
            Tag::Short(_) => TagKind::Short,
            Tag::Int(_) => TagKind::Int,
            Tag::Long(_) => TagKind::Long,
            Tag::Float(_) => TagKind::Float,
            Tag::Double(_) => TagKind::Double,
            Tag::ByteArray(_) => TagKind::ByteArray,
            Tag::String(_) => TagKind::String,
            Tag::List(_) => TagKind::List,
            Tag::Compound(_) => TagKind::Compound,
            Tag::IntArray(_) => TagKind::IntArray,
            Tag::LongArray(_) => TagKind::LongArray,
        }
    }

    /// Build a string tag from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionError::StringTooLong` past `i16::MAX` bytes.
    pub fn string(bytes: impl Into<Vec<u8>>) -> Result<Self, ConstructionError> {
        TagString::new(bytes).map(Tag::String)
    }

    /// Build a byte array tag.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionError::ArrayTooLong` past `i32::MAX` elements.
    pub fn byte_array(items: Vec<i8>) -> Result<Self, ConstructionError> {
        Array::new(items).map(Tag::ByteArray)
    }

    /// Build an int array tag.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionError::ArrayTooLong` past `i32::MAX` elements.
    pub fn int_array(items: Vec<i32>) -> Result<Self, ConstructionError> {
        Array::new(items).map(Tag::IntArray)
    }

    /// Build a long array tag.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionError::ArrayTooLong` past `i32::MAX` elements.
    pub fn long_array(items: Vec<i64>) -> Result<Self, ConstructionError> {
        Array::new(items).map(Tag::LongArray)
    }

    /// Build a list tag; see [`List::new`].
    ///
    /// # Errors
    ///
    /// Same as [`List::new`].
    pub fn list(kind: TagKind, items: Vec<Tag>) -> Result<Self, ConstructionError> {
        List::new(kind, items).map(Tag::List)
    }

    /// Get the compound payload, if this is a compound.
    #[must_use]
    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Get the list payload, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Tag::List(l) => Some(l),
            _ => None,
        }
    }
}

// Floats compare by bit pattern: a decoded NaN must equal the NaN it was
// encoded from, and 0.0 and -0.0 are different documents.
impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Tag::End, Tag::End) => true,
            (Tag::Byte(a), Tag::Byte(b)) => a == b,
            (Tag::Short(a), Tag::Short(b)) => a == b,
            (Tag::Int(a), Tag::Int(b)) => a == b,
            (Tag::Long(a), Tag::Long(b)) => a == b,
            (Tag::Float(a), Tag::Float(b)) => a.to_bits() == b.to_bits(),
            (Tag::Double(a), Tag::Double(b)) => a.to_bits() == b.to_bits(),
            (Tag::ByteArray(a), Tag::ByteArray(b)) => a == b,
            (Tag::String(a), Tag::String(b)) => a == b,
            (Tag::List(a), Tag::List(b)) => a == b,
            (Tag::Compound(a), Tag::Compound(b)) => a == b,
            (Tag::IntArray(a), Tag::IntArray(b)) => a == b,
            (Tag::LongArray(a), Tag::LongArray(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Tag {}

impl From<i8> for Tag {
    fn from(n: i8) -> Self {
        Tag::Byte(n)
    }
}

impl From<bool> for Tag {
    fn from(b: bool) -> Self {
        Tag::Byte(i8::from(b))
    }
}

impl From<i16> for Tag {
    fn from(n: i16) -> Self {
        Tag::Short(n)
    }
}

impl From<i32> for Tag {
    fn from(n: i32) -> Self {
        Tag::Int(n)
    }
}

impl From<i64> for Tag {
    fn from(n: i64) -> Self {
        Tag::Long(n)
    }
}

impl From<f32> for Tag {
    fn from(n: f32) -> Self {
        Tag::Float(n)
    }
}

impl From<f64> for Tag {
    fn from(n: f64) -> Self {
        Tag::Double(n)
    }
}

impl From<TagString> for Tag {
    fn from(s: TagString) -> Self {
        Tag::String(s)
    }
}

impl From<List> for Tag {
    fn from(l: List) -> Self {
        Tag::List(l)
    }
}

impl From<Compound> for Tag {
    fn from(c: Compound) -> Self {
        Tag::Compound(c)
    }
}

impl From<Array<i8>> for Tag {
    fn from(a: Array<i8>) -> Self {
        Tag::ByteArray(a)
    }
}

impl From<Array<i32>> for Tag {
    fn from(a: Array<i32>) -> Self {
        Tag::IntArray(a)
    }
}

impl From<Array<i64>> for Tag {
    fn from(a: Array<i64>) -> Self {
        Tag::LongArray(a)
    }
}

/// Raw string payload, at most `i16::MAX` bytes, not required to be UTF-8.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct TagString(Vec<u8>);

impl TagString {
    /// Longest payload the wire format can carry.
    pub const MAX_LEN: usize = i16::MAX as usize;

    /// Create a string from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionError::StringTooLong` past [`Self::MAX_LEN`].
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ConstructionError> {
        let bytes = bytes.into();
        if bytes.len() > Self::MAX_LEN {
            return Err(ConstructionError::StringTooLong(bytes.len()));
        }
        Ok(Self(bytes))
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for TagString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl TryFrom<&str> for TagString {
    type Error = ConstructionError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        TagString::new(s)
    }
}

impl PartialEq<str> for TagString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for TagString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// Numeric array payload, at most `i32::MAX` elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Array<T>(Vec<T>);

impl<T> Array<T> {
    /// Longest array the wire format can carry.
    pub const MAX_LEN: usize = i32::MAX as usize;

    /// Create an array.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionError::ArrayTooLong` past [`Self::MAX_LEN`].
    pub fn new(items: Vec<T>) -> Result<Self, ConstructionError> {
        if items.len() > Self::MAX_LEN {
            return Err(ConstructionError::ArrayTooLong(items.len()));
        }
        Ok(Self(items))
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Deref for Array<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

/// Homogeneous sequence of unnamed values.
///
/// An empty list always carries element kind `End`, matching the wire
/// encoding of zero-length lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    kind: TagKind,
    items: Vec<Tag>,
}

impl List {
    /// Longest list the wire format can carry.
    pub const MAX_LEN: usize = i32::MAX as usize;

    /// Create a list whose elements are all of `kind`.
    ///
    /// # Errors
    ///
    /// - `ConstructionError::MisplacedEnd` for a non-empty list of `End`
    /// - `ConstructionError::MixedList` if an element is not of `kind`
    /// - `ConstructionError::ListTooLong` past [`Self::MAX_LEN`]
    pub fn new(kind: TagKind, items: Vec<Tag>) -> Result<Self, ConstructionError> {
        if items.is_empty() {
            return Ok(Self::empty());
        }
        if kind == TagKind::End {
            return Err(ConstructionError::MisplacedEnd);
        }
        if items.len() > Self::MAX_LEN {
            return Err(ConstructionError::ListTooLong(items.len()));
        }
        if let Some(bad) = items.iter().find(|item| item.kind() != kind) {
            return Err(ConstructionError::MixedList {
                expected: kind,
                found: bad.kind(),
            });
        }
        Ok(Self { kind, items })
    }

    /// Create a list typed by its first element.
    ///
    /// # Errors
    ///
    /// Same as [`List::new`].
    pub fn from_items(items: Vec<Tag>) -> Result<Self, ConstructionError> {
        let kind = items.first().map_or(TagKind::End, Tag::kind);
        Self::new(kind, items)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            kind: TagKind::End,
            items: Vec::new(),
        }
    }

    /// Element kind (`End` for an empty list).
    #[inline]
    #[must_use]
    pub fn element_kind(&self) -> TagKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &[Tag] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.items.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn into_items(self) -> Vec<Tag> {
        self.items
    }
}

impl Default for List {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Ordered collection of named values.
///
/// This is a sequence, not a map: duplicate names are kept in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    entries: Vec<NamedTag>,
}

impl Compound {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionError::MisplacedEnd` if the value is `End`.
    pub fn push(&mut self, entry: NamedTag) -> Result<(), ConstructionError> {
        if entry.value.kind() == TagKind::End {
            return Err(ConstructionError::MisplacedEnd);
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Append `name: value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is too long or the value is `End`.
    pub fn insert(
        &mut self,
        name: impl Into<Vec<u8>>,
        value: impl Into<Tag>,
    ) -> Result<(), ConstructionError> {
        self.push(NamedTag::new(name, value)?)
    }

    /// Builder form of [`Compound::insert`].
    ///
    /// # Errors
    ///
    /// Same as [`Compound::insert`].
    pub fn with(
        mut self,
        name: impl Into<Vec<u8>>,
        value: impl Into<Tag>,
    ) -> Result<Self, ConstructionError> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Get the first value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.value)
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[NamedTag] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedTag> {
        self.entries.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<NamedTag> {
        self.entries
    }
}

impl TryFrom<Vec<NamedTag>> for Compound {
    type Error = ConstructionError;

    fn try_from(entries: Vec<NamedTag>) -> Result<Self, Self::Error> {
        let mut compound = Compound::new();
        for entry in entries {
            compound.push(entry)?;
        }
        Ok(compound)
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = &'a NamedTag;
    type IntoIter = std::slice::Iter<'a, NamedTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A `(name, value)` pair: a compound entry or a document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTag {
    pub name: TagString,
    pub value: Tag,
}

impl NamedTag {
    /// Create a named tag.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionError::StringTooLong` if the name is too long.
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Tag>) -> Result<Self, ConstructionError> {
        Ok(Self {
            name: TagString::new(name)?,
            value: value.into(),
        })
    }

    /// Create a document root with an empty name.
    #[must_use]
    pub fn root(compound: Compound) -> Self {
        Self {
            name: TagString::default(),
            value: Tag::Compound(compound),
        }
    }

    /// Get the root compound, if the value is one.
    #[must_use]
    pub fn compound(&self) -> Option<&Compound> {
        self.value.as_compound()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(Tag::End.kind(), TagKind::End);
        assert_eq!(Tag::Byte(1).kind(), TagKind::Byte);
        assert_eq!(Tag::Double(1.0).kind(), TagKind::Double);
        assert_eq!(Tag::string("x").unwrap().kind(), TagKind::String);
        assert_eq!(Tag::long_array(vec![1]).unwrap().kind(), TagKind::LongArray);
        assert_eq!(Tag::from(Compound::new()).kind(), TagKind::Compound);
    }

    #[test]
    fn test_string_length_limit() {
        assert!(TagString::new(vec![b'a'; TagString::MAX_LEN]).is_ok());
        assert_eq!(
            TagString::new(vec![b'a'; TagString::MAX_LEN + 1]),
            Err(ConstructionError::StringTooLong(TagString::MAX_LEN + 1))
        );
    }

    #[test]
    fn test_string_raw_bytes() {
        let s = TagString::new(vec![0xFF, b'a']).unwrap();
        assert_eq!(s.as_bytes(), &[0xFF, b'a']);
        assert_eq!(s.to_string_lossy(), "\u{FFFD}a");
        assert_eq!(TagString::try_from("hi").unwrap(), "hi");
    }

    #[test]
    fn test_empty_list_is_end_typed() {
        let list = List::new(TagKind::Int, vec![]).unwrap();
        assert_eq!(list.element_kind(), TagKind::End);
        assert_eq!(list, List::empty());
    }

    #[test]
    fn test_list_rejects_mixed_elements() {
        let result = List::new(TagKind::Int, vec![Tag::Int(1), Tag::Byte(2)]);
        assert_eq!(
            result,
            Err(ConstructionError::MixedList {
                expected: TagKind::Int,
                found: TagKind::Byte,
            })
        );
    }

    #[test]
    fn test_list_rejects_end_elements() {
        assert_eq!(
            List::new(TagKind::End, vec![Tag::End]),
            Err(ConstructionError::MisplacedEnd)
        );
    }

    #[test]
    fn test_list_from_items() {
        let list = List::from_items(vec![Tag::Long(1), Tag::Long(2)]).unwrap();
        assert_eq!(list.element_kind(), TagKind::Long);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_compound_keeps_duplicates_in_order() {
        let c = Compound::new()
            .with("a", 1i32)
            .unwrap()
            .with("a", 2i32)
            .unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.get("a"), Some(&Tag::Int(1)));
        let values: Vec<_> = c.iter().map(|e| e.value.clone()).collect();
        assert_eq!(values, vec![Tag::Int(1), Tag::Int(2)]);
    }

    #[test]
    fn test_compound_rejects_end() {
        let mut c = Compound::new();
        assert_eq!(c.insert("x", Tag::End), Err(ConstructionError::MisplacedEnd));
        assert!(c.is_empty());
    }

    #[test]
    fn test_structural_equality_is_order_sensitive() {
        let a = Compound::new().with("x", 1i32).unwrap().with("y", 2i32).unwrap();
        let b = Compound::new().with("y", 2i32).unwrap().with("x", 1i32).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn test_float_equality_by_bits() {
        assert_eq!(Tag::Float(f32::NAN), Tag::Float(f32::NAN));
        assert_ne!(Tag::Double(0.0), Tag::Double(-0.0));
        assert_ne!(Tag::Int(1), Tag::Long(1));
    }

    #[test]
    fn test_bool_is_byte() {
        assert_eq!(Tag::from(true), Tag::Byte(1));
        assert_eq!(Tag::from(false), Tag::Byte(0));
    }
}
