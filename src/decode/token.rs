#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Unknown,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Assign,
    Comma,
    Plus,
    Minus,
    Identifier,
    Decimal,
    String,
}

/// A classified slice of the input, addressed by byte offsets.
///
/// String tokens span the raw text between the quotes; escapes are decoded
/// by the parser, not the lexer. The scanner synthesizes an `Unknown` token
/// with an empty span at the end of the buffer once input is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub begin: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.begin..self.end]
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}
