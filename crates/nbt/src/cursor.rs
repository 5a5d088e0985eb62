//! Byte cursor over SNBT text.

/// Position in an immutable text buffer.
///
/// Backtracking is done by saving [`Cursor::offset`] and restoring it with
/// [`Cursor::rewind`]; the buffer itself never changes.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0 }
    }

    /// The whole buffer.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &'a [u8] {
        self.src
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn rewind(&mut self, offset: usize) {
        debug_assert!(offset <= self.src.len());
        self.pos = offset;
    }

    #[inline]
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    /// Consume and return the next byte.
    #[inline]
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Consume `b` if it is next.
    #[inline]
    pub fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume either case of an ASCII letter.
    #[inline]
    pub fn eat_ignore_case(&mut self, b: u8) -> bool {
        self.eat(b.to_ascii_lowercase()) || self.eat(b.to_ascii_uppercase())
    }

    /// Consume `s` if the input continues with it; otherwise consume nothing.
    pub fn eat_str(&mut self, s: &[u8]) -> bool {
        if self.src[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consume bytes while `pred` holds; return how many.
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.pos - start
    }

    pub fn skip_whitespace(&mut self) {
        self.eat_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
    }

    /// Bytes between two offsets.
    #[inline]
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.src[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_bump() {
        let mut c = Cursor::new(b"ab");
        assert_eq!(c.peek(), Some(b'a'));
        assert_eq!(c.bump(), Some(b'a'));
        assert_eq!(c.bump(), Some(b'b'));
        assert_eq!(c.bump(), None);
        assert!(c.is_eof());
    }

    #[test]
    fn test_eat_str_is_transactional() {
        let mut c = Cursor::new(b"[B;1]");
        assert!(!c.eat_str(b"[I;"));
        assert_eq!(c.offset(), 0);
        assert!(c.eat_str(b"[B;"));
        assert_eq!(c.offset(), 3);
        assert!(!c.eat_str(b"1]xyz"));
        assert_eq!(c.offset(), 3);
    }

    #[test]
    fn test_skip_whitespace() {
        let mut c = Cursor::new(b" \t\r\n x");
        c.skip_whitespace();
        assert_eq!(c.peek(), Some(b'x'));
    }

    #[test]
    fn test_eat_ignore_case() {
        let mut c = Cursor::new(b"bB");
        assert!(c.eat_ignore_case(b'b'));
        assert!(c.eat_ignore_case(b'b'));
        assert!(!c.eat_ignore_case(b'b'));
    }

    #[test]
    fn test_rewind() {
        let mut c = Cursor::new(b"123");
        assert_eq!(c.eat_while(|b| b.is_ascii_digit()), 3);
        c.rewind(1);
        assert_eq!(c.peek(), Some(b'2'));
        assert_eq!(c.slice(0, 2), b"12");
    }
}
