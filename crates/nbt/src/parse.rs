//! SNBT text parser.
//!
//! A backtracking recursive-descent parser. Every production records its
//! entry offset and rewinds there on failure, so a failed attempt never moves
//! the cursor.
//!
//! # Ambiguity
//!
//! At an unconstrained value position the text does not say which tag it is:
//! `5` is a valid int, byte, short, long, double and float. [`Parser::parse_any`]
//! tries every candidate from the same offset and keeps the one that consumed
//! the most input, preferring the earlier candidate on ties:
//!
//! ```
//! use nbt::parse::parse_value;
//! use nbt::value::Tag;
//!
//! assert_eq!(parse_value("5").unwrap(), Tag::Int(5));
//! assert_eq!(parse_value("5b").unwrap(), Tag::Byte(5));
//! assert_eq!(parse_value("5.0").unwrap(), Tag::Double(5.0));
//! assert_eq!(parse_value("5.0f").unwrap(), Tag::Float(5.0));
//! ```
//!
//! Lists are typed by their first element. When a later element does not fit,
//! the element is re-examined with `parse_any` and, if it has another type,
//! the whole list is parsed again under that type, so `[1, 2, 3000000000]`
//! becomes a list of longs.

use std::str::FromStr;

use crate::cursor::Cursor;
use crate::diagnostic::ParseError;
use crate::tag::TagKind;
use crate::value::{Array, Compound, List, NamedTag, Tag, TagString};

/// Deepest list/compound nesting the parser accepts.
pub const MAX_DEPTH: usize = 512;

/// Candidates tried at an unconstrained value position, in priority order.
const CANDIDATES: [TagKind; 12] = [
    TagKind::Int,
    TagKind::Byte,
    TagKind::Short,
    TagKind::Long,
    TagKind::Double,
    TagKind::Float,
    TagKind::ByteArray,
    TagKind::IntArray,
    TagKind::LongArray,
    TagKind::List,
    TagKind::String,
    TagKind::Compound,
];

type PResult<T> = Result<T, ParseError>;

/// Parse a document: one root compound, returned with an empty name.
///
/// Text after the root compound is ignored.
///
/// ```
/// use nbt::value::Tag;
///
/// let root = nbt::parse::parse("{foo: 5b, bar: [1,2,3]}").unwrap();
/// let compound = root.compound().unwrap();
/// assert_eq!(compound.get("foo"), Some(&Tag::Byte(5)));
/// ```
///
/// # Errors
///
/// Returns the cause chain of the failure; no partial tree is produced.
pub fn parse(text: impl AsRef<[u8]>) -> PResult<NamedTag> {
    let src = text.as_ref();
    let mut parser = Parser::new(src);
    parser.cursor.skip_whitespace();
    let compound = parser.parse_compound()?;
    parser.cursor.skip_whitespace();
    if !parser.cursor.is_eof() {
        tracing::warn!(
            offset = parser.cursor.offset(),
            "ignoring text after the root compound"
        );
    }
    tracing::debug!(bytes = src.len(), "parsed document");
    Ok(NamedTag {
        name: TagString::default(),
        value: compound,
    })
}

/// Parse a single unconstrained value, disambiguated by longest match.
///
/// # Errors
///
/// Returns the cause chain of the failure, or "Unexpected trailing
/// characters." if anything but whitespace follows the value.
pub fn parse_value(text: impl AsRef<[u8]>) -> PResult<Tag> {
    let mut parser = Parser::new(text.as_ref());
    let tag = parser.parse_any()?;
    parser.cursor.skip_whitespace();
    if !parser.cursor.is_eof() {
        return Err(ParseError::raise(
            parser.cursor.offset(),
            "Unexpected trailing characters.",
        ));
    }
    Ok(tag)
}

/// Parser state for one document.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(src),
            depth: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    /// Run `f`, rewinding to the current offset if it fails.
    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let start = self.cursor.offset();
        let result = f(self);
        if result.is_err() {
            self.cursor.rewind(start);
        }
        result
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        self.depth += 1;
        let result = self.attempt(f);
        self.depth -= 1;
        result
    }

    /// Must run after the opening bracket is consumed.
    fn check_depth(&self) -> PResult<()> {
        if self.depth > MAX_DEPTH {
            return Err(ParseError::raise(
                self.cursor.offset(),
                "Maximum nesting depth exceeded.",
            ));
        }
        Ok(())
    }

    /// Parse a value of a known kind.
    ///
    /// # Errors
    ///
    /// Fails if the text at the cursor is not a `kind` literal.
    pub fn parse_kind(&mut self, kind: TagKind) -> PResult<Tag> {
        match kind {
            TagKind::End => Err(ParseError::raise(
                self.cursor.offset(),
                "TAG_End has no text form.",
            )),
            TagKind::Byte => self.parse_byte().map(Tag::Byte),
            TagKind::Short => self.parse_short().map(Tag::Short),
            TagKind::Int => self.parse_int().map(Tag::Int),
            TagKind::Long => self.parse_long().map(Tag::Long),
            TagKind::Float => self.parse_float().map(Tag::Float),
            TagKind::Double => self.parse_double().map(Tag::Double),
            TagKind::ByteArray => self.parse_byte_array(),
            TagKind::String => self.parse_string().map(Tag::String),
            TagKind::List => self.parse_list(),
            TagKind::Compound => self.parse_compound(),
            TagKind::IntArray => self.parse_int_array(),
            TagKind::LongArray => self.parse_long_array(),
        }
    }

    /// Parse a value of unknown kind by longest match.
    ///
    /// Every candidate is tried from the same offset. The successful one that
    /// ends furthest wins; on a tie the earlier candidate is kept. If all
    /// fail, the failure whose root cause lies deepest in the text is
    /// reported.
    ///
    /// # Errors
    ///
    /// Fails if no candidate accepts the text at the cursor.
    pub fn parse_any(&mut self) -> PResult<Tag> {
        self.parse_any_with(None)
    }

    /// [`Parser::parse_any`] with one candidate's outcome already known.
    ///
    /// `known` holds the kind and its result (tag and end offset) at the
    /// current position. That candidate is not run again but still takes
    /// part in the selection in its usual order.
    fn parse_any_with(&mut self, mut known: Option<(TagKind, PResult<(Tag, usize)>)>) -> PResult<Tag> {
        self.cursor.skip_whitespace();
        let start = self.cursor.offset();

        let mut longest: Option<(Tag, usize)> = None;
        let mut relevant: Option<(ParseError, TagKind)> = None;

        for kind in CANDIDATES {
            let outcome = match known.take_if(|(k, _)| *k == kind) {
                Some((_, outcome)) => outcome,
                None => {
                    self.cursor.rewind(start);
                    self.parse_kind(kind).map(|tag| (tag, self.cursor.offset()))
                }
            };
            match outcome {
                Ok((tag, end)) => {
                    if longest.as_ref().is_none_or(|(_, best)| end > *best) {
                        longest = Some((tag, end));
                    }
                }
                Err(err) => {
                    if relevant
                        .as_ref()
                        .is_none_or(|(best, _)| err.depth() > best.depth())
                    {
                        relevant = Some((err, kind));
                    }
                }
            }
        }

        if let Some((tag, end)) = longest {
            tracing::trace!(offset = start, end, kind = %tag.kind(), "resolved value");
            self.cursor.rewind(end);
            return Ok(tag);
        }

        self.cursor.rewind(start);
        match relevant {
            Some((err, kind)) if err.depth() > start => {
                Err(err.append(start, format!("Failed to parse {kind}.")))
            }
            _ => Err(ParseError::raise(start, "Couldn't parse tag value.")),
        }
    }

    // --- Numbers ---

    /// Scan `-?[0-9]+` and convert it to `T`, then eat an optional suffix.
    fn integer<T: FromStr>(&mut self, kind: TagKind, suffix: Option<u8>) -> PResult<T> {
        self.attempt(|p| {
            let start = p.cursor.offset();
            p.cursor.eat(b'-');
            if p.cursor.eat_while(|b| b.is_ascii_digit()) == 0 {
                return Err(ParseError::raise(start, "No digits found."));
            }
            let digits = p.cursor.slice(start, p.cursor.offset());
            if let Some(s) = suffix {
                p.cursor.eat_ignore_case(s);
            }
            convert(digits).ok_or_else(|| {
                ParseError::raise(p.cursor.offset(), format!("Not a valid {}.", kind.noun()))
            })
        })
    }

    /// Scan a run of digits, `.` and `e`, convert it to `T`, then eat an
    /// optional suffix.
    fn decimal<T: FromStr>(
        &mut self,
        kind: TagKind,
        suffix: u8,
        finite: impl Fn(&T) -> bool,
    ) -> PResult<T> {
        self.attempt(|p| {
            let start = p.cursor.offset();
            p.cursor.eat(b'-');
            let run_start = p.cursor.offset();
            p.cursor
                .eat_while(|b| b.is_ascii_digit() || b == b'.' || b == b'e');
            let run = p.cursor.slice(run_start, p.cursor.offset());
            if !run.iter().any(u8::is_ascii_digit) {
                p.cursor.rewind(start);
                return Err(ParseError::raise(start, "No digits found."));
            }
            let digits = p.cursor.slice(start, p.cursor.offset());
            p.cursor.eat_ignore_case(suffix);
            convert(digits).filter(|v| finite(v)).ok_or_else(|| {
                ParseError::raise(p.cursor.offset(), format!("Not a valid {}.", kind.noun()))
            })
        })
    }

    /// Parse a byte: `true`, `false`, or an integer with optional `b`.
    ///
    /// # Errors
    ///
    /// "No digits found." or "Not a valid byte."
    pub fn parse_byte(&mut self) -> PResult<i8> {
        if self.cursor.eat_str(b"true") {
            return Ok(1);
        }
        if self.cursor.eat_str(b"false") {
            return Ok(0);
        }
        self.integer(TagKind::Byte, Some(b'b'))
    }

    /// Parse a short: an integer with optional `s`.
    ///
    /// # Errors
    ///
    /// "No digits found." or "Not a valid short."
    pub fn parse_short(&mut self) -> PResult<i16> {
        self.integer(TagKind::Short, Some(b's'))
    }

    /// Parse an int: an unsuffixed integer.
    ///
    /// # Errors
    ///
    /// "No digits found." or "Not a valid int."
    pub fn parse_int(&mut self) -> PResult<i32> {
        self.integer(TagKind::Int, None)
    }

    /// Parse a long: an integer with optional `l`.
    ///
    /// # Errors
    ///
    /// "No digits found." or "Not a valid long."
    pub fn parse_long(&mut self) -> PResult<i64> {
        self.integer(TagKind::Long, Some(b'l'))
    }

    /// Parse a float: a decimal with optional `f`.
    ///
    /// # Errors
    ///
    /// "No digits found." or "Not a valid float." (also for values that
    /// overflow `f32`).
    pub fn parse_float(&mut self) -> PResult<f32> {
        self.decimal(TagKind::Float, b'f', |v: &f32| v.is_finite())
    }

    /// Parse a double: a decimal with optional `d`.
    ///
    /// # Errors
    ///
    /// "No digits found." or "Not a valid double."
    pub fn parse_double(&mut self) -> PResult<f64> {
        self.decimal(TagKind::Double, b'd', |v: &f64| v.is_finite())
    }

    // --- Arrays ---

    /// Parse `prefix`, then comma-separated elements up to `]`.
    fn array<T>(
        &mut self,
        prefix: &[u8],
        kind: TagKind,
        mut element: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Array<T>> {
        self.attempt(|p| {
            let start = p.cursor.offset();
            if !p.cursor.eat_str(prefix) {
                return Err(ParseError::raise(start, format!("Invalid {}.", kind.noun())));
            }
            let mut items = Vec::new();
            p.cursor.skip_whitespace();
            if !p.cursor.eat(b']') {
                loop {
                    p.cursor.skip_whitespace();
                    items.push(element(p)?);
                    if p.separator(b']', "Expected a comma or closing brackets.")? {
                        break;
                    }
                }
            }
            Array::new(items).map_err(|e| ParseError::raise(start, e.to_string()))
        })
    }

    /// After an element: skip whitespace, then eat `,` (returns `false`) or
    /// `close` (returns `true`).
    fn separator(&mut self, close: u8, message: &str) -> PResult<bool> {
        let at = self.cursor.offset();
        self.cursor.skip_whitespace();
        if self.cursor.eat(close) {
            Ok(true)
        } else if self.cursor.eat(b',') {
            Ok(false)
        } else {
            Err(ParseError::raise(at, message))
        }
    }

    /// Parse `[B; ...]`.
    ///
    /// # Errors
    ///
    /// Fails on a missing prefix, a bad element, or a missing separator.
    pub fn parse_byte_array(&mut self) -> PResult<Tag> {
        self.array(b"[B;", TagKind::ByteArray, Self::parse_byte)
            .map(Tag::ByteArray)
    }

    /// Parse `[I; ...]`.
    ///
    /// # Errors
    ///
    /// Fails on a missing prefix, a bad element, or a missing separator.
    pub fn parse_int_array(&mut self) -> PResult<Tag> {
        self.array(b"[I;", TagKind::IntArray, Self::parse_int)
            .map(Tag::IntArray)
    }

    /// Parse `[L; ...]`.
    ///
    /// # Errors
    ///
    /// Fails on a missing prefix, a bad element, or a missing separator.
    pub fn parse_long_array(&mut self) -> PResult<Tag> {
        self.array(b"[L;", TagKind::LongArray, Self::parse_long)
            .map(Tag::LongArray)
    }

    // --- Strings ---

    /// Parse a quoted string; `"` and `'` both work, the closer must match.
    ///
    /// # Errors
    ///
    /// Fails on a raw newline, a bad escape, or end of input.
    pub fn parse_string(&mut self) -> PResult<TagString> {
        self.attempt(|p| {
            let start = p.cursor.offset();
            let delim = match p.cursor.peek() {
                Some(q @ (b'"' | b'\'')) => q,
                _ => return Err(ParseError::raise(start, "Invalid string.")),
            };
            p.cursor.bump();

            let mut buf = Vec::new();
            loop {
                let at = p.cursor.offset();
                match p.cursor.bump() {
                    None => return Err(ParseError::raise(at, "Unterminated string.")),
                    Some(b) if b == delim => break,
                    Some(b'\n') => return Err(ParseError::raise(at, "Multiline string literal.")),
                    Some(b'\\') => buf.push(p.escape()?),
                    Some(b) => buf.push(b),
                }
            }
            TagString::new(buf).map_err(|e| ParseError::raise(start, e.to_string()))
        })
    }

    /// Decode the escape after a backslash.
    fn escape(&mut self) -> PResult<u8> {
        let at = self.cursor.offset();
        let simple = match self.cursor.peek() {
            None => return Err(ParseError::raise(at, "Unterminated string.")),
            Some(b'a') => Some(0x07),
            Some(b'b') => Some(0x08),
            Some(b'e') => Some(0x1B),
            Some(b'f') => Some(0x0C),
            Some(b'n') => Some(b'\n'),
            Some(b'r') => Some(b'\r'),
            Some(b't') => Some(b'\t'),
            Some(b'v') => Some(0x0B),
            Some(b @ (b'\\' | b'"' | b'\'')) => Some(b),
            Some(_) => None,
        };
        if let Some(b) = simple {
            self.cursor.bump();
            return Ok(b);
        }

        if self.cursor.eat(b'x') {
            let digits = self.digits(2, |b| b.is_ascii_hexdigit());
            return u32::from_str_radix(digits, 16)
                .map(|v| (v & 0xFF) as u8)
                .map_err(|_| ParseError::raise(self.cursor.offset(), "Invalid hex escape sequence."));
        }

        let digits = self.digits(3, |b| (b'0'..=b'7').contains(&b));
        u32::from_str_radix(digits, 8)
            .map(|v| (v & 0xFF) as u8)
            .map_err(|_| ParseError::raise(self.cursor.offset(), "Invalid escape sequence."))
    }

    /// Consume up to `max` bytes matching `pred`; they are ASCII.
    fn digits(&mut self, max: usize, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.cursor.offset();
        let mut n = 0;
        while n < max && self.cursor.peek().is_some_and(&pred) {
            self.cursor.bump();
            n += 1;
        }
        std::str::from_utf8(self.cursor.slice(start, self.cursor.offset())).unwrap_or_default()
    }

    // --- Aggregates ---

    /// Parse a list; the element type is set by the first element and may
    /// be revised by re-parsing the whole list.
    ///
    /// # Errors
    ///
    /// Fails on a bad element, a missing separator, or a list whose elements
    /// keep demanding types that were already tried ("List is not
    /// homogeneous.").
    pub fn parse_list(&mut self) -> PResult<Tag> {
        self.nested(|p| {
            let start = p.cursor.offset();
            if !p.cursor.eat(b'[') {
                return Err(ParseError::raise(start, "Expected bracket."));
            }
            p.check_depth()?;
            let first = p.cursor.offset();
            p.cursor.skip_whitespace();
            if p.cursor.eat(b']') {
                return Ok(Tag::List(List::empty()));
            }

            // Offset at which each kind was abandoned or adopted.
            let mut tried: [Option<usize>; TagKind::COUNT] = [None; TagKind::COUNT];
            let mut kind: Option<TagKind> = None;
            let mut items: Vec<Tag> = Vec::new();

            loop {
                p.cursor.skip_whitespace();
                let at = p.cursor.offset();

                let Some(k) = kind else {
                    let item = p.parse_any().map_err(|e| {
                        e.append(at, "Expected a valid element or closing brackets.")
                    })?;
                    kind = Some(item.kind());
                    items.push(item);
                    if p.separator(b']', "Expected a comma or closing brackets.")? {
                        break;
                    }
                    continue;
                };

                let mut separator_at = None;
                let outcome = match p.parse_kind(k) {
                    Ok(item) => {
                        let after = p.cursor.offset();
                        p.cursor.skip_whitespace();
                        if p.cursor.eat(b']') {
                            items.push(item);
                            break;
                        }
                        if p.cursor.eat(b',') {
                            items.push(item);
                            continue;
                        }
                        separator_at = Some(after);
                        Ok((item, after))
                    }
                    Err(err) => Err(err),
                };

                // The element does not fit the current type; find out what it is.
                // Its outcome as `k` is reused so nested elements are not re-parsed.
                p.cursor.rewind(at);
                tried[k.index()] = Some(at);
                let item = p
                    .parse_any_with(Some((k, outcome)))
                    .map_err(|e| e.append(at, "Expected a valid element."))?;
                let found = item.kind();
                if let Some(after) = separator_at.filter(|_| found == k) {
                    return Err(ParseError::raise(
                        after,
                        "Expected a comma or closing brackets.",
                    ));
                }
                if let Some(where_tried) = tried[found.index()] {
                    return Err(ParseError::raise(where_tried, "List is not homogeneous."));
                }
                tracing::trace!(offset = at, from = %k, to = %found, "re-parsing list");
                tried[found.index()] = Some(p.cursor.offset());
                kind = Some(found);
                items.clear();
                p.cursor.rewind(first);
            }

            let kind = kind.unwrap_or(TagKind::End);
            List::new(kind, items)
                .map(Tag::List)
                .map_err(|e| ParseError::raise(start, e.to_string()))
        })
    }

    /// Parse a compound key: a bareword or a quoted string.
    ///
    /// # Errors
    ///
    /// "Expected tag name." if neither is present.
    pub fn parse_name(&mut self) -> PResult<TagString> {
        if matches!(self.cursor.peek(), Some(b'"' | b'\'')) {
            return self.parse_string();
        }
        let start = self.cursor.offset();
        if self.cursor.eat_while(is_bareword) == 0 {
            return Err(ParseError::raise(start, "Expected tag name."));
        }
        TagString::new(self.cursor.slice(start, self.cursor.offset()))
            .map_err(|e| ParseError::raise(start, e.to_string()))
    }

    /// Parse `name: value`.
    ///
    /// # Errors
    ///
    /// Fails on a bad name, a missing colon, or a bad value.
    pub fn parse_named_tag(&mut self) -> PResult<NamedTag> {
        self.attempt(|p| {
            let start = p.cursor.offset();
            let name = p
                .parse_name()
                .map_err(|e| e.append(start, "Invalid tag."))?;
            p.cursor.skip_whitespace();
            if !p.cursor.eat(b':') {
                return Err(ParseError::raise(p.cursor.offset(), "Expected a colon."));
            }
            let value = p
                .parse_any()
                .map_err(|e| e.append(start, "Invalid tag."))?;
            Ok(NamedTag { name, value })
        })
    }

    /// Parse `{ name: value, ... }`. Duplicate names are kept.
    ///
    /// # Errors
    ///
    /// Fails on a bad entry or a missing separator; trailing commas are
    /// rejected.
    pub fn parse_compound(&mut self) -> PResult<Tag> {
        self.nested(|p| {
            let start = p.cursor.offset();
            if !p.cursor.eat(b'{') {
                return Err(ParseError::raise(start, "Invalid compound."));
            }
            p.check_depth()?;
            let mut compound = Compound::new();
            p.cursor.skip_whitespace();
            if p.cursor.eat(b'}') {
                return Ok(Tag::Compound(compound));
            }
            loop {
                p.cursor.skip_whitespace();
                let at = p.cursor.offset();
                let entry = p
                    .parse_named_tag()
                    .map_err(|e| e.append(at, "Expected a valid tag or closing braces."))?;
                compound
                    .push(entry)
                    .map_err(|e| ParseError::raise(at, e.to_string()))?;
                if p.separator(b'}', "Expected a comma or closing braces.")? {
                    break;
                }
            }
            Ok(Tag::Compound(compound))
        })
    }
}

/// Characters allowed in an unquoted compound key.
#[inline]
#[must_use]
pub fn is_bareword(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b'+')
}

fn convert<T: FromStr>(digits: &[u8]) -> Option<T> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}
