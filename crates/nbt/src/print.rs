//! SNBT text renderer.
//!
//! Output always parses back to the same tree (for finite floats): suffixes
//! mark every non-int number, strings use fixed-width octal escapes, and keys
//! are quoted whenever they would not read back as a bareword.

use std::fmt::Display;
use std::fmt::Write as _;

use crate::error::EncodeError;
use crate::parse::is_bareword;
use crate::value::{Compound, List, NamedTag, Tag, TagString};

const CLEAR: &str = "\x1b[0m";
const STR: &str = "\x1b[33m";
const VAL: &str = "\x1b[32m";
const TYPE: &str = "\x1b[36m";
const PUNCT: &str = "\x1b[37m";

/// Whitespace style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// No whitespace: `{foo:42,bar:[1,2]}`.
    #[default]
    Compact,
    /// One line: `{foo: 42, bar: [1, 2]}`.
    Spaced,
    /// Lists and compounds one entry per line, two-space indent.
    Indented,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrintOptions {
    pub layout: Layout,
    /// Emit ANSI colour codes.
    pub color: bool,
}

/// Render a document as SNBT. The root name is not printed.
///
/// ```
/// use nbt::print::{render, Layout, PrintOptions};
/// use nbt::value::{Compound, NamedTag};
///
/// let root = NamedTag::root(Compound::new().with("foo", 42i32).unwrap());
/// let opts = PrintOptions { layout: Layout::Spaced, color: false };
/// assert_eq!(render(&root, &opts).unwrap(), "{foo: 42}");
/// ```
///
/// # Errors
///
/// Returns `EncodeError::RootNotCompound` if the root is not a compound.
pub fn render(root: &NamedTag, opts: &PrintOptions) -> Result<String, EncodeError> {
    let Tag::Compound(compound) = &root.value else {
        return Err(EncodeError::RootNotCompound(root.value.kind()));
    };
    let mut printer = Printer::new(*opts);
    printer.compound(compound);
    Ok(printer.finish())
}

/// Render any value as SNBT.
#[must_use]
pub fn render_tag(tag: &Tag, opts: &PrintOptions) -> String {
    let mut printer = Printer::new(*opts);
    printer.tag(tag);
    printer.finish()
}

struct Printer {
    out: String,
    opts: PrintOptions,
    indent: usize,
}

impl Printer {
    fn new(opts: PrintOptions) -> Self {
        Self {
            out: String::new(),
            opts,
            indent: 0,
        }
    }

    fn finish(mut self) -> String {
        if self.opts.color {
            self.out.push_str(CLEAR);
        }
        self.out
    }

    fn paint(&mut self, color: &str) {
        if self.opts.color {
            self.out.push_str(color);
        }
    }

    fn punct(&mut self, s: &str) {
        self.paint(PUNCT);
        self.out.push_str(s);
    }

    fn number(&mut self, n: impl Display, suffix: &str) {
        self.paint(VAL);
        let _ = write!(self.out, "{n}");
        if !suffix.is_empty() {
            self.paint(TYPE);
            self.out.push_str(suffix);
        }
    }

    fn space(&mut self) {
        if self.opts.layout != Layout::Compact {
            self.out.push(' ');
        }
    }

    fn newline(&mut self) {
        if self.opts.layout == Layout::Indented {
            self.out.push('\n');
            for _ in 0..self.indent {
                self.out.push_str("  ");
            }
        }
    }

    /// Between two entries of a list, compound or array.
    fn comma(&mut self, multiline: bool) {
        self.punct(",");
        if multiline && self.opts.layout == Layout::Indented {
            self.newline();
        } else {
            self.space();
        }
    }

    fn tag(&mut self, tag: &Tag) {
        match tag {
            // Never reachable from a valid tree; rendered so it stands out.
            Tag::End => {
                self.paint(TYPE);
                self.out.push_str("END");
            }
            Tag::Byte(n) => self.number(n, "b"),
            Tag::Short(n) => self.number(n, "s"),
            Tag::Int(n) => self.number(n, ""),
            Tag::Long(n) => self.number(n, "l"),
            Tag::Float(n) => self.number(n, "f"),
            Tag::Double(n) => self.number(n, "d"),
            Tag::ByteArray(a) => self.array("B", a, "b"),
            Tag::String(s) => self.string(s),
            Tag::List(l) => self.list(l),
            Tag::Compound(c) => self.compound(c),
            Tag::IntArray(a) => self.array("I", a, ""),
            Tag::LongArray(a) => self.array("L", a, "l"),
        }
    }

    fn array<T: Display>(&mut self, letter: &str, items: &[T], suffix: &str) {
        self.punct("[");
        self.paint(TYPE);
        self.out.push_str(letter);
        self.punct(";");
        if !items.is_empty() {
            self.space();
        }
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.comma(false);
            }
            self.number(item, suffix);
        }
        self.punct("]");
    }

    fn list(&mut self, list: &List) {
        self.punct("[");
        if list.is_empty() {
            self.punct("]");
            return;
        }
        self.indent += 1;
        self.newline();
        for (i, item) in list.iter().enumerate() {
            if i > 0 {
                self.comma(true);
            }
            self.tag(item);
        }
        self.indent -= 1;
        self.newline();
        self.punct("]");
    }

    fn compound(&mut self, compound: &Compound) {
        self.punct("{");
        if compound.is_empty() {
            self.punct("}");
            return;
        }
        self.indent += 1;
        self.newline();
        for (i, entry) in compound.iter().enumerate() {
            if i > 0 {
                self.comma(true);
            }
            self.key(&entry.name);
            self.punct(":");
            self.space();
            self.tag(&entry.value);
        }
        self.indent -= 1;
        self.newline();
        self.punct("}");
    }

    fn key(&mut self, name: &TagString) {
        let bytes = name.as_bytes();
        if !bytes.is_empty() && bytes.iter().copied().all(is_bareword) {
            self.paint(STR);
            // Bareword bytes are ASCII.
            self.out.push_str(&name.to_string_lossy());
        } else {
            self.string(name);
        }
    }

    fn string(&mut self, s: &TagString) {
        self.paint(STR);
        self.out.push('"');
        for &b in s.as_bytes() {
            match b {
                b'"' | b'\\' => {
                    self.out.push('\\');
                    self.out.push(b as char);
                }
                0x20..=0x7E => self.out.push(b as char),
                _ => {
                    let _ = write!(self.out, "\\{b:03o}");
                }
            }
        }
        self.out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse, parse_value};
    use crate::tag::TagKind;

    const COMPACT: PrintOptions = PrintOptions {
        layout: Layout::Compact,
        color: false,
    };
    const SPACED: PrintOptions = PrintOptions {
        layout: Layout::Spaced,
        color: false,
    };
    const INDENTED: PrintOptions = PrintOptions {
        layout: Layout::Indented,
        color: false,
    };

    fn sample() -> NamedTag {
        let list = List::new(TagKind::Int, vec![Tag::Int(1), Tag::Int(2)]).unwrap();
        NamedTag::root(
            Compound::new()
                .with("foo", 5i8)
                .unwrap()
                .with("bar", list)
                .unwrap()
                .with("a b", Tag::string("x\"y").unwrap())
                .unwrap()
                .with("arr", Tag::long_array(vec![1, -2]).unwrap())
                .unwrap(),
        )
    }

    #[test]
    fn test_render_spaced() {
        let root = NamedTag::root(Compound::new().with("foo", 42i32).unwrap());
        assert_eq!(render(&root, &SPACED).unwrap(), "{foo: 42}");
    }

    #[test]
    fn test_render_layouts() {
        let root = sample();
        assert_eq!(
            render(&root, &COMPACT).unwrap(),
            r#"{foo:5b,bar:[1,2],"a b":"x\"y",arr:[L;1l,-2l]}"#
        );
        assert_eq!(
            render(&root, &SPACED).unwrap(),
            r#"{foo: 5b, bar: [1, 2], "a b": "x\"y", arr: [L; 1l, -2l]}"#
        );
        let expected = r#"{
  foo: 5b,
  bar: [
    1,
    2
  ],
  "a b": "x\"y",
  arr: [L; 1l, -2l]
}"#;
        assert_eq!(render(&root, &INDENTED).unwrap(), expected);
    }

    #[test]
    fn test_render_empty_aggregates() {
        let root = NamedTag::root(
            Compound::new()
                .with("c", Compound::new())
                .unwrap()
                .with("l", List::empty())
                .unwrap()
                .with("b", Tag::byte_array(vec![]).unwrap())
                .unwrap(),
        );
        assert_eq!(render(&root, &SPACED).unwrap(), "{c: {}, l: [], b: [B;]}");
        assert_eq!(render(&NamedTag::root(Compound::new()), &INDENTED).unwrap(), "{}");
    }

    #[test]
    fn test_render_numbers() {
        assert_eq!(render_tag(&Tag::Short(-3), &COMPACT), "-3s");
        assert_eq!(render_tag(&Tag::Long(i64::MIN), &COMPACT), "-9223372036854775808l");
        assert_eq!(render_tag(&Tag::Float(0.1), &COMPACT), "0.1f");
        assert_eq!(render_tag(&Tag::Double(2.5), &COMPACT), "2.5d");
        assert_eq!(render_tag(&Tag::Double(1e20), &COMPACT), "100000000000000000000d");
        assert_eq!(
            render_tag(&Tag::byte_array(vec![1, -1]).unwrap(), &COMPACT),
            "[B;1b,-1b]"
        );
        assert_eq!(render_tag(&Tag::int_array(vec![7]).unwrap(), &COMPACT), "[I;7]");
    }

    #[test]
    fn test_render_string_escapes() {
        let s = Tag::string(vec![b'a', b'\\', b'\n', 0xFF, b'1']).unwrap();
        assert_eq!(render_tag(&s, &COMPACT), r#""a\\\012\3771""#);
        assert_eq!(parse_value(render_tag(&s, &COMPACT)).unwrap(), s);
    }

    #[test]
    fn test_render_keys() {
        let root = NamedTag::root(
            Compound::new()
                .with("", 1i32)
                .unwrap()
                .with("ok_key.1+-", 2i32)
                .unwrap()
                .with("é", 3i32)
                .unwrap(),
        );
        assert_eq!(
            render(&root, &COMPACT).unwrap(),
            r#"{"":1,ok_key.1+-:2,"\303\251":3}"#
        );
    }

    #[test]
    fn test_render_root_not_compound() {
        let root = NamedTag::new("", Tag::Int(1)).unwrap();
        assert_eq!(
            render(&root, &SPACED),
            Err(EncodeError::RootNotCompound(TagKind::Int))
        );
    }

    #[test]
    fn test_render_color() {
        let root = NamedTag::root(Compound::new().with("k", 1i8).unwrap());
        let opts = PrintOptions {
            layout: Layout::Compact,
            color: true,
        };
        let text = render(&root, &opts).unwrap();
        assert_eq!(
            text,
            format!("{PUNCT}{{{STR}k{PUNCT}:{VAL}1{TYPE}b{PUNCT}}}{CLEAR}")
        );
    }

    #[test]
    fn test_render_parse_roundtrip() {
        let nested = List::new(
            TagKind::Compound,
            vec![
                Tag::Compound(Compound::new().with("x", -0.0f64).unwrap()),
                Tag::Compound(Compound::new().with("y", f32::MAX).unwrap()),
            ],
        )
        .unwrap();
        let mut root = sample();
        if let Tag::Compound(c) = &mut root.value {
            c.insert("nested", nested).unwrap();
            c.insert("tiny", 1e-30f64).unwrap();
            c.insert("neg", i8::MIN).unwrap();
            c.insert("dup", 1i16).unwrap();
            c.insert("dup", 2i64).unwrap();
        }
        for opts in [COMPACT, SPACED, INDENTED] {
            let text = render(&root, &opts).unwrap();
            assert_eq!(parse(&text).unwrap(), root, "{text}");
        }
    }
}
