//! Byte scanner over raw markup
//!
//! Uses the memchr crate for fast byte and substring searching with SIMD
//! acceleration where available. All positions are byte offsets into the
//! original input.

use memchr::{memchr, memmem};

/// Cursor over a markup byte slice
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Find next occurrence of a specific byte at or after the cursor
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Find next occurrence of a literal byte sequence at or after the cursor
    #[inline]
    pub fn find_substring(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(&self.input[self.pos..], needle).map(|i| self.pos + i)
    }

    /// Check if input starts with a byte sequence at the current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input[self.pos..].starts_with(needle)
    }

    /// Find the '>' terminating the current tag, skipping '>' inside quotes
    pub fn find_tag_end_quoted(&self) -> Option<usize> {
        let mut pos = self.pos;
        let mut in_single_quote = false;
        let mut in_double_quote = false;

        while pos < self.input.len() {
            match self.input[pos] {
                b'"' if !in_single_quote => in_double_quote = !in_double_quote,
                b'\'' if !in_double_quote => in_single_quote = !in_single_quote,
                b'>' if !in_single_quote && !in_double_quote => return Some(pos),
                _ => {}
            }
            pos += 1;
        }
        None
    }

    /// Read a XAML element or attribute name
    ///
    /// Names start with a letter, underscore, or colon and continue with
    /// alphanumerics, `_ - . :`. Non-ASCII bytes are accepted as they may
    /// be UTF-8 encoded Unicode letters.
    pub fn read_name(&mut self) -> Option<&'a [u8]> {
        let start = self.pos;

        let first = *self.input.get(start)?;
        if !is_name_start_char(first) {
            return None;
        }
        self.pos += 1;

        while self.pos < self.input.len() && is_name_char(self.input[self.pos]) {
            self.pos += 1;
        }

        Some(&self.input[start..self.pos])
    }
}

/// Check if byte is a valid name start character
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

/// Check if byte is valid inside a name
#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}

/// Check if byte is markup whitespace
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Split a qualified name into prefix and local name at the colon
pub fn split_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_byte() {
        let scanner = Scanner::new(b"hello <world>");
        assert_eq!(scanner.find_byte(b'<'), Some(6));
    }

    #[test]
    fn test_find_substring() {
        let scanner = Scanner::new(b"<Grid><Grid.RowDefinitions>");
        assert_eq!(scanner.find_substring(b"<Grid.Row"), Some(6));
    }

    #[test]
    fn test_find_tag_end_quoted() {
        let scanner = Scanner::new(b"<a Text=\">quoted\">content");
        assert_eq!(scanner.find_tag_end_quoted(), Some(17));
    }

    #[test]
    fn test_read_name() {
        let mut scanner = Scanner::new(b"Grid.RowDefinitions>");
        assert_eq!(scanner.read_name(), Some(b"Grid.RowDefinitions" as &[u8]));
        assert_eq!(scanner.position(), 19);
    }

    #[test]
    fn test_read_name_namespaced() {
        let mut scanner = Scanner::new(b"x:Bind Path");
        assert_eq!(scanner.read_name(), Some(b"x:Bind" as &[u8]));
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("x:Bind"), (Some("x"), "Bind"));
        assert_eq!(split_name("TextBlock"), (None, "TextBlock"));
    }
}
