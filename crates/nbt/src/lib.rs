//! Read and write NBT documents in their binary and text (SNBT) forms.
//!
//! ```
//! let root = nbt::parse::parse("{foo: 5b, bar: [1,2,3]}").unwrap();
//! let bytes = nbt::encode::encode(&root).unwrap();
//! assert_eq!(nbt::decode::decode(&bytes).unwrap(), root);
//! ```

pub mod compress;
pub mod cursor;
pub mod decode;
pub mod diagnostic;
pub mod encode;
pub mod error;
pub mod parse;
pub mod print;
pub mod tag;
pub mod value;

pub use error::{Error, Result};
pub use tag::TagKind;
pub use value::{Compound, List, NamedTag, Tag, TagString};
