//! Parse failure cause chains.
//!
//! A [`ParseError`] is a chain of `(offset, message)` frames, innermost cause
//! first. A low-level failure starts a fresh chain with [`ParseError::raise`];
//! callers wrap it with [`ParseError::append`], which adds an outer frame and
//! keeps the inner ones.

use std::fmt;
use std::fmt::Write as _;

const CLEAR: &str = "\x1b[0m";
const ERR: &str = "\x1b[31m";

/// Characters shown on each side of the offset in rendered context.
const CONTEXT: usize = 10;

/// One diagnostic frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Absolute byte offset into the parsed text.
    pub offset: usize,
    pub message: String,
}

/// Failure to parse text, as a cause chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    // Innermost first; never empty.
    frames: Vec<Frame>,
}

impl ParseError {
    /// Start a new chain.
    #[must_use]
    pub fn raise(offset: usize, message: impl Into<String>) -> Self {
        Self {
            frames: vec![Frame {
                offset,
                message: message.into(),
            }],
        }
    }

    /// Wrap this failure in an outer frame.
    #[must_use]
    pub fn append(mut self, offset: usize, message: impl Into<String>) -> Self {
        self.frames.push(Frame {
            offset,
            message: message.into(),
        });
        self
    }

    /// The root cause.
    #[must_use]
    pub fn innermost(&self) -> &Frame {
        &self.frames[0]
    }

    /// The last frame added.
    #[must_use]
    pub fn outermost(&self) -> &Frame {
        &self.frames[self.frames.len() - 1]
    }

    /// All frames, innermost first.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Offset of the root cause; deeper means the parser got further.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.innermost().offset
    }

    /// Render the chain for a human, root cause first.
    ///
    /// Each frame gets its line and column in `source` and a window of the
    /// surrounding text with a caret under the offset.
    #[must_use]
    pub fn render(&self, source: &[u8], color: bool) -> String {
        let (err, clear) = if color { (ERR, CLEAR) } else { ("", "") };
        let mut out = String::new();
        for (i, frame) in self.frames.iter().enumerate() {
            let loc = Location::of(source, frame.offset);
            if i > 0 {
                let _ = write!(out, "{err}Which caused: ");
            }
            let _ = writeln!(out, "{err}Error! {clear}{}", frame.message);
            let _ = writeln!(out, "{err}- at line {}, column {}.{clear}", loc.line, loc.column);
            out.push_str(&context_window(source, frame.offset));
            let _ = writeln!(out, "\n{err}{}^{clear}", " ".repeat(CONTEXT));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outer = self.outermost();
        write!(f, "{} (at offset {})", outer.message, outer.offset)?;
        if self.frames.len() > 1 {
            let inner = self.innermost();
            write!(f, ", caused by: {} (at offset {})", inner.message, inner.offset)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// 1-based line and column of an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Locate `offset` by scanning `source` for newlines.
    #[must_use]
    pub fn of(source: &[u8], offset: usize) -> Self {
        let mut loc = Location { line: 1, column: 1 };
        for &b in source.iter().take(offset) {
            if b == b'\n' {
                loc.line += 1;
                loc.column = 1;
            } else {
                loc.column += 1;
            }
        }
        loc
    }
}

/// Fixed-width excerpt around `offset`; `.` pads past either end.
fn context_window(source: &[u8], offset: usize) -> String {
    (0..2 * CONTEXT)
        .map(|i| {
            let idx = (offset + i).checked_sub(CONTEXT);
            match idx.and_then(|idx| source.get(idx)) {
                None => '.',
                Some(b'\t' | b'\n' | b'\r') => ' ',
                Some(&b) if b.is_ascii_graphic() || b == b' ' => b as char,
                Some(_) => '?',
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_and_append() {
        let err = ParseError::raise(6, "No digits found.")
            .append(1, "Invalid tag.")
            .append(1, "Expected a valid tag or closing braces.");
        assert_eq!(err.frames().len(), 3);
        assert_eq!(err.innermost().offset, 6);
        assert_eq!(err.outermost().message, "Expected a valid tag or closing braces.");
        assert_eq!(err.depth(), 6);
    }

    #[test]
    fn test_location() {
        let src = b"{a: 1,\n b: x}";
        assert_eq!(Location::of(src, 0), Location { line: 1, column: 1 });
        assert_eq!(Location::of(src, 4), Location { line: 1, column: 5 });
        assert_eq!(Location::of(src, 7), Location { line: 2, column: 1 });
        assert_eq!(Location::of(src, 11), Location { line: 2, column: 5 });
    }

    #[test]
    fn test_context_window() {
        assert_eq!(context_window(b"{foo: }", 6), "....{foo: }.........");
        assert_eq!(context_window(b"{a:\t1}", 0), "..........{a: 1}....");
    }

    #[test]
    fn test_render_plain() {
        let src = b"{foo: }";
        let err = ParseError::raise(6, "Couldn't parse tag value.").append(1, "Invalid tag.");
        let text = err.render(src, false);
        let expected = "\
Error! Couldn't parse tag value.
- at line 1, column 7.
....{foo: }.........
          ^

Which caused: Error! Invalid tag.
- at line 1, column 2.
.........{foo: }....
          ^

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_display() {
        let err = ParseError::raise(3, "inner").append(0, "outer");
        assert_eq!(err.to_string(), "outer (at offset 0), caused by: inner (at offset 3)");
        assert_eq!(ParseError::raise(2, "x").to_string(), "x (at offset 2)");
    }
}
