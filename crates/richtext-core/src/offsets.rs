//! Host offset encodings.
//!
//! The engine works in character offsets. Many native text boxes report selections in
//! UTF-16 code units instead; [`OffsetEncoding`] converts between the two against the
//! current plain text.

use crate::text::char_len;

/// Unit in which a host reports and receives text offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetEncoding {
    /// Unicode scalar values (Rust `char`s).
    #[default]
    Chars,
    /// UTF-16 code units.
    Utf16,
}

impl OffsetEncoding {
    /// Length of `text` in this encoding.
    pub fn len(self, text: &str) -> usize {
        match self {
            OffsetEncoding::Chars => char_len(text),
            OffsetEncoding::Utf16 => text.encode_utf16().count(),
        }
    }

    /// Convert a host offset into a character offset.
    pub fn to_char_offset(self, text: &str, offset: usize) -> usize {
        match self {
            OffsetEncoding::Chars => offset.min(char_len(text)),
            OffsetEncoding::Utf16 => utf16_to_char_offset(text, offset),
        }
    }

    /// Convert a character offset into a host offset.
    pub fn from_char_offset(self, text: &str, char_offset: usize) -> usize {
        match self {
            OffsetEncoding::Chars => char_offset.min(char_len(text)),
            OffsetEncoding::Utf16 => char_offset_to_utf16(text, char_offset),
        }
    }
}

/// UTF-16 code units before the `char_offset`-th character.
pub fn char_offset_to_utf16(text: &str, char_offset: usize) -> usize {
    text.chars().take(char_offset).map(char::len_utf16).sum()
}

/// Character offset for a UTF-16 offset.
///
/// An offset that lands inside a surrogate pair rounds up to the next character.
pub fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> usize {
    let mut current_utf16 = 0;
    for (char_offset, ch) in text.chars().enumerate() {
        if current_utf16 >= utf16_offset {
            return char_offset;
        }
        current_utf16 += ch.len_utf16();
    }
    char_len(text)
}
