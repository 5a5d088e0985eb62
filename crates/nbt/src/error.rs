//! Error types for NBT operations.

use std::fmt;

use crate::tag::TagKind;

pub use crate::diagnostic::ParseError;

/// A tag constructor was given a payload that does not fit the format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// String payload longer than `i16::MAX` bytes.
    StringTooLong(usize),
    /// Array payload longer than `i32::MAX` elements.
    ArrayTooLong(usize),
    /// List longer than `i32::MAX` elements.
    ListTooLong(usize),
    /// List element does not match the list's element kind.
    MixedList { expected: TagKind, found: TagKind },
    /// `End` used as a list element or compound value.
    MisplacedEnd,
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::StringTooLong(len) => {
                write!(f, "string of {len} bytes exceeds {} bytes", i16::MAX)
            }
            ConstructionError::ArrayTooLong(len) => {
                write!(f, "array of {len} elements exceeds {} elements", i32::MAX)
            }
            ConstructionError::ListTooLong(len) => {
                write!(f, "list of {len} elements exceeds {} elements", i32::MAX)
            }
            ConstructionError::MixedList { expected, found } => {
                write!(f, "list of {expected} cannot hold {found}")
            }
            ConstructionError::MisplacedEnd => write!(f, "TAG_End cannot be stored as a value"),
        }
    }
}

impl std::error::Error for ConstructionError {}

/// Failure while reading an uncompressed binary document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer exhausted before the expected bytes.
    UnexpectedEof,
    /// Top-level tag is not a compound.
    RootNotCompound(TagKind),
    /// Tag id outside 0-12.
    InvalidTagId(u8),
    /// Negative string, array or list length.
    NegativeLength(i32),
    /// List of `TAG_End` with a non-zero element count.
    NonEmptyEndList(i32),
    /// Nesting deeper than the decoder allows.
    MaxDepthExceeded,
    /// A decoded payload was rejected by the tag model.
    Construction(ConstructionError),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnexpectedEof => write!(f, "unexpected end of input"),
            DecodeError::RootNotCompound(kind) => {
                write!(f, "root tag is not compound (found {kind})")
            }
            DecodeError::InvalidTagId(id) => write!(f, "invalid tag id: {id}"),
            DecodeError::NegativeLength(len) => write!(f, "negative length: {len}"),
            DecodeError::NonEmptyEndList(len) => {
                write!(f, "list of TAG_End with {len} elements")
            }
            DecodeError::MaxDepthExceeded => write!(f, "maximum nesting depth exceeded"),
            DecodeError::Construction(e) => write!(f, "invalid payload: {e}"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<ConstructionError> for DecodeError {
    fn from(e: ConstructionError) -> Self {
        DecodeError::Construction(e)
    }
}

/// Failure while writing a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Caller supplied a root whose value is not a compound.
    RootNotCompound(TagKind),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::RootNotCompound(kind) => {
                write!(f, "root tag is not compound (found {kind})")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Failure reported by the gzip envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionError(pub String);

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gzip error: {}", self.0)
    }
}

impl std::error::Error for CompressionError {}

impl From<std::io::Error> for CompressionError {
    fn from(e: std::io::Error) -> Self {
        CompressionError(e.to_string())
    }
}

/// Error type for NBT operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Construction(ConstructionError),
    Decode(DecodeError),
    Encode(EncodeError),
    Parse(ParseError),
    Compression(CompressionError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Construction(e) => write!(f, "construction error: {e}"),
            Error::Decode(e) => write!(f, "decode error: {e}"),
            Error::Encode(e) => write!(f, "encode error: {e}"),
            Error::Parse(e) => write!(f, "parse error: {e}"),
            Error::Compression(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Construction(e) => Some(e),
            Error::Decode(e) => Some(e),
            Error::Encode(e) => Some(e),
            Error::Parse(e) => Some(e),
            Error::Compression(e) => Some(e),
        }
    }
}

impl From<ConstructionError> for Error {
    fn from(e: ConstructionError) -> Self {
        Error::Construction(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Error::Encode(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<CompressionError> for Error {
    fn from(e: CompressionError) -> Self {
        Error::Compression(e)
    }
}

/// Result type alias for NBT operations.
pub type Result<T> = std::result::Result<T, Error>;
