use memchr::{memchr, memchr_iter};
use smallvec::SmallVec;

use super::chars;
use super::guard::ScanGuard;
use super::token::{Token, TokenKind};

/// Lazy tokenizer over one input buffer.
///
/// Tokens are produced on demand by `get_token` and memoized permanently, so
/// rewinding the cursor never re-lexes. Comments and whitespace are consumed
/// transparently and never become tokens.
pub struct Scanner<'a> {
    input: &'a str,
    lex_pos: usize,
    tokens: SmallVec<[Token; 64]>,
    cursor: usize,
    exhausted: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            lex_pos: 0,
            tokens: SmallVec::new(),
            cursor: 0,
            exhausted: false,
        }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Returns the `index`-th token, extending the memoized stream as needed.
    /// Past end of input this yields an empty `Unknown` token at the buffer
    /// end instead of failing; the parser decides what EOF means.
    pub fn get_token(&mut self, index: usize) -> Token {
        while self.tokens.len() <= index && !self.exhausted {
            match self.lex_next() {
                Some(token) => self.tokens.push(token),
                None => self.exhausted = true,
            }
        }
        self.tokens.get(index).copied().unwrap_or(Token {
            kind: TokenKind::Unknown,
            begin: self.input.len(),
            end: self.input.len(),
        })
    }

    /// The token at the cursor, without consuming it.
    pub fn peek(&mut self) -> Token {
        self.get_token(self.cursor)
    }

    /// Opens a transactional view over the cursor. Dropping the guard rolls
    /// the cursor back; `commit` keeps the consumed tokens.
    pub fn guard(&mut self) -> ScanGuard<'_, 'a> {
        ScanGuard::new(self)
    }

    /// True for the synthesized token that marks exhausted input.
    pub fn is_end_token(&self, token: Token) -> bool {
        token.kind == TokenKind::Unknown && token.is_empty() && token.begin == self.input.len()
    }

    /// 1-based line of a token, counting newlines from the buffer start.
    pub fn token_line(&self, token: Token) -> usize {
        let upto = token.begin.min(self.input.len());
        memchr_iter(b'\n', &self.input.as_bytes()[..upto]).count() + 1
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.get_token(self.cursor);
        self.cursor += 1;
        token
    }

    pub(crate) fn retreat(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn lex_next(&mut self) -> Option<Token> {
        let bytes = self.input.as_bytes();
        loop {
            while self.lex_pos < bytes.len() && chars::is_whitespace(bytes[self.lex_pos]) {
                self.lex_pos += 1;
            }
            if self.lex_pos >= bytes.len() {
                return None;
            }

            let begin = self.lex_pos;
            let byte = bytes[begin];

            if byte == b'/' {
                match bytes.get(begin + 1) {
                    Some(b'/') => {
                        self.lex_pos = match memchr(b'\n', &bytes[begin..]) {
                            Some(offset) => begin + offset + 1,
                            None => bytes.len(),
                        };
                        continue;
                    }
                    Some(b'*') => {
                        self.lex_pos = self.block_comment_end(begin + 2);
                        continue;
                    }
                    _ => {}
                }
            }

            let kind = match byte {
                b'(' => TokenKind::LeftParen,
                b')' => TokenKind::RightParen,
                b'{' => TokenKind::LeftBrace,
                b'}' => TokenKind::RightBrace,
                b'=' => TokenKind::Assign,
                b',' => TokenKind::Comma,
                b'+' => TokenKind::Plus,
                b'-' => TokenKind::Minus,
                b'"' => return Some(self.lex_string(begin)),
                _ if chars::is_identifier_start(byte) => return Some(self.lex_identifier(begin)),
                _ if chars::is_digit(byte) => return Some(self.lex_decimal(begin)),
                _ => {
                    // one whole character of unclassifiable input
                    let width = self.input[begin..].chars().next().map_or(1, char::len_utf8);
                    self.lex_pos = begin + width;
                    return Some(Token {
                        kind: TokenKind::Unknown,
                        begin,
                        end: self.lex_pos,
                    });
                }
            };
            self.lex_pos = begin + 1;
            return Some(Token {
                kind,
                begin,
                end: self.lex_pos,
            });
        }
    }

    // An unterminated block comment swallows the rest of the input.
    fn block_comment_end(&self, mut from: usize) -> usize {
        let bytes = self.input.as_bytes();
        while let Some(offset) = memchr(b'*', &bytes[from..]) {
            let star = from + offset;
            if bytes.get(star + 1) == Some(&b'/') {
                return star + 2;
            }
            from = star + 1;
        }
        bytes.len()
    }

    fn lex_identifier(&mut self, begin: usize) -> Token {
        let bytes = self.input.as_bytes();
        let mut idx = begin + 1;
        while idx < bytes.len() && chars::is_identifier_part(bytes[idx]) {
            idx += 1;
        }
        self.lex_pos = idx;
        Token {
            kind: TokenKind::Identifier,
            begin,
            end: idx,
        }
    }

    // digit+('.' digit+)?; only the first dot joins the token, so "1.2.3"
    // lexes as Decimal "1.2" followed by a stray '.' and Decimal "3".
    fn lex_decimal(&mut self, begin: usize) -> Token {
        let bytes = self.input.as_bytes();
        let mut idx = begin;
        while idx < bytes.len() && chars::is_digit(bytes[idx]) {
            idx += 1;
        }
        if bytes.get(idx) == Some(&b'.') && idx + 1 < bytes.len() && chars::is_digit(bytes[idx + 1])
        {
            idx += 1;
            while idx < bytes.len() && chars::is_digit(bytes[idx]) {
                idx += 1;
            }
        }
        self.lex_pos = idx;
        Token {
            kind: TokenKind::Decimal,
            begin,
            end: idx,
        }
    }

    // The token spans the raw text between the quotes; '\' shields the next
    // byte from terminating the scan but is decoded later, in the parser.
    // A string with no closing quote lexes as Unknown so the parser fails.
    fn lex_string(&mut self, quote: usize) -> Token {
        let bytes = self.input.as_bytes();
        let begin = quote + 1;
        let mut idx = begin;
        while idx < bytes.len() {
            match bytes[idx] {
                b'\\' => idx = (idx + 2).min(bytes.len()),
                b'"' => {
                    self.lex_pos = idx + 1;
                    return Token {
                        kind: TokenKind::String,
                        begin,
                        end: idx,
                    };
                }
                _ => idx += 1,
            }
        }
        self.lex_pos = bytes.len();
        Token {
            kind: TokenKind::Unknown,
            begin: quote,
            end: bytes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(input);
        let mut result = Vec::new();
        let mut index = 0;
        loop {
            let token = scanner.get_token(index);
            if scanner.is_end_token(token) {
                return result;
            }
            result.push(token.kind);
            index += 1;
        }
    }

    #[rstest::rstest]
    fn test_punctuation_kinds() {
        assert_eq!(
            kinds("(){}=,+-"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Assign,
                TokenKind::Comma,
                TokenKind::Plus,
                TokenKind::Minus,
            ]
        );
    }

    #[rstest::rstest]
    fn test_identifier_and_decimal() {
        let mut scanner = Scanner::new("_name2 = 42.5");
        let ident = scanner.get_token(0);
        assert_eq!(ident.kind, TokenKind::Identifier);
        assert_eq!(ident.text(scanner.input()), "_name2");
        assert_eq!(scanner.get_token(1).kind, TokenKind::Assign);
        let number = scanner.get_token(2);
        assert_eq!(number.kind, TokenKind::Decimal);
        assert_eq!(number.text(scanner.input()), "42.5");
    }

    #[rstest::rstest]
    fn test_decimal_stops_at_second_dot() {
        let mut scanner = Scanner::new("1.2.3");
        let first = scanner.get_token(0);
        assert_eq!(first.kind, TokenKind::Decimal);
        assert_eq!(first.text(scanner.input()), "1.2");
        let stray = scanner.get_token(1);
        assert_eq!(stray.kind, TokenKind::Unknown);
        assert_eq!(stray.text(scanner.input()), ".");
        let second = scanner.get_token(2);
        assert_eq!(second.kind, TokenKind::Decimal);
        assert_eq!(second.text(scanner.input()), "3");
    }

    #[rstest::rstest]
    fn test_decimal_without_fractional_digits() {
        let mut scanner = Scanner::new("7.");
        let number = scanner.get_token(0);
        assert_eq!(number.text(scanner.input()), "7");
        assert_eq!(scanner.get_token(1).kind, TokenKind::Unknown);
    }

    #[rstest::rstest]
    fn test_string_token_spans_raw_inner_text() {
        let mut scanner = Scanner::new(r#""a\"b""#);
        let token = scanner.get_token(0);
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.text(scanner.input()), r#"a\"b"#);
        let next = scanner.get_token(1);
        assert!(scanner.is_end_token(next));
    }

    #[rstest::rstest]
    fn test_unterminated_string_is_unknown() {
        let mut scanner = Scanner::new("\"open");
        assert_eq!(scanner.get_token(0).kind, TokenKind::Unknown);
    }

    #[rstest::rstest]
    fn test_comments_are_transparent() {
        assert_eq!(
            kinds("a // rest of line\n/* block\nspanning */ = 1"),
            vec![TokenKind::Identifier, TokenKind::Assign, TokenKind::Decimal]
        );
    }

    #[rstest::rstest]
    fn test_lone_slash_is_unknown() {
        assert_eq!(kinds("/"), vec![TokenKind::Unknown]);
    }

    #[rstest::rstest]
    fn test_unterminated_block_comment_swallows_input() {
        assert_eq!(kinds("a /* never closed"), vec![TokenKind::Identifier]);
    }

    #[rstest::rstest]
    fn test_memoization_is_stable() {
        let mut scanner = Scanner::new("a = 1");
        let early = scanner.get_token(0);
        scanner.get_token(2);
        assert_eq!(scanner.get_token(0), early);
    }

    #[rstest::rstest]
    fn test_end_token_is_synthesized() {
        let mut scanner = Scanner::new("x");
        let end = scanner.get_token(5);
        assert!(scanner.is_end_token(end));
        assert_eq!(end.begin, 1);
    }

    #[rstest::rstest]
    fn test_token_line_counts_newlines() {
        let mut scanner = Scanner::new("a = 1\nb = 2\n\nc = 3");
        let mut index = 0;
        let mut lines = Vec::new();
        loop {
            let token = scanner.get_token(index);
            if scanner.is_end_token(token) {
                break;
            }
            if token.kind == TokenKind::Identifier {
                lines.push(scanner.token_line(token));
            }
            index += 1;
        }
        assert_eq!(lines, vec![1, 2, 4]);
    }

    #[rstest::rstest]
    fn test_non_ascii_is_single_unknown_token() {
        let mut scanner = Scanner::new("é");
        let token = scanner.get_token(0);
        assert_eq!(token.kind, TokenKind::Unknown);
        assert_eq!(token.text(scanner.input()), "é");
        let next = scanner.get_token(1);
        assert!(scanner.is_end_token(next));
    }
}
