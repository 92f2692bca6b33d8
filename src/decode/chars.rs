//! Byte classification for the lexer. Identifiers and numbers are ASCII;
//! anything at or below the space character counts as whitespace.

#[inline]
pub(crate) fn is_whitespace(byte: u8) -> bool {
    byte <= b' '
}

#[inline]
pub(crate) fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

#[inline]
pub(crate) fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

#[inline]
pub(crate) fn is_identifier_part(byte: u8) -> bool {
    is_identifier_start(byte) || byte.is_ascii_digit()
}
