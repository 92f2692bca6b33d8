use smol_str::SmolStr;

use super::scanner::Scanner;
use super::token::{Token, TokenKind};
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::types::{DataType, IntegerLiteral, Numeric};

/// Grammar-level operations over the token stream.
///
/// Every operation comes in two forms: the `Result`-returning form fails
/// fast with a positioned error, and the `try_*` form reports failure as
/// `None`/`false` and leaves the cursor exactly where it was, which is what
/// makes alternation ("try table, else try array") possible without
/// re-lexing.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::default())
    }

    pub fn with_options(input: &'a str, options: ParseOptions) -> Self {
        Self {
            scanner: Scanner::new(input),
            options,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Line of the token at the cursor.
    pub fn current_line(&mut self) -> usize {
        let token = self.scanner.peek();
        self.scanner.token_line(token)
    }

    /// Classifies the upcoming value by one token of lookahead, without
    /// consuming anything.
    pub fn detect_data_type(&mut self) -> Result<DataType> {
        let token = self.scanner.peek();
        match token.kind {
            TokenKind::Plus | TokenKind::Minus | TokenKind::Decimal => Ok(DataType::Integer),
            TokenKind::String => Ok(DataType::String),
            TokenKind::LeftBrace => Ok(DataType::Array),
            TokenKind::LeftParen => Ok(DataType::Table),
            _ => Err(self.value_expected(token)),
        }
    }

    pub fn try_detect_data_type(&mut self) -> Option<DataType> {
        self.detect_data_type().ok()
    }

    /// Consumes an optional sign and a decimal token, converting the digit
    /// span into `T`. A '-' only matches when `T` is signed; an unsigned
    /// target facing '-' fails the production instead of parsing and then
    /// rejecting.
    pub fn parse_integer<T: Numeric>(&mut self) -> Result<T> {
        self.expect_data_type(DataType::Integer)?;
        let mut token = self.scanner.advance();
        let mut negative = false;
        match token.kind {
            TokenKind::Plus => token = self.scanner.advance(),
            TokenKind::Minus => {
                if !T::SIGNED {
                    return Err(self.unexpected(token, "an unsigned number"));
                }
                negative = true;
                token = self.scanner.advance();
            }
            _ => {}
        }
        if token.kind != TokenKind::Decimal {
            return Err(self.unexpected(token, "a number"));
        }
        T::from_digits(token.text(self.scanner.input()), negative)
    }

    pub fn try_parse_integer<T: Numeric>(&mut self) -> Option<T> {
        self.attempt(|parser| parser.parse_integer::<T>())
    }

    /// Like `parse_integer` but keeps the raw literal: either sign is
    /// accepted here and conversion is deferred to extraction.
    pub fn parse_integer_literal(&mut self) -> Result<IntegerLiteral> {
        self.expect_data_type(DataType::Integer)?;
        let mut token = self.scanner.advance();
        let mut negative = false;
        match token.kind {
            TokenKind::Plus => token = self.scanner.advance(),
            TokenKind::Minus => {
                negative = true;
                token = self.scanner.advance();
            }
            _ => {}
        }
        if token.kind != TokenKind::Decimal {
            return Err(self.unexpected(token, "a number"));
        }
        Ok(IntegerLiteral::new(
            negative,
            token.text(self.scanner.input()),
        ))
    }

    pub fn try_parse_integer_literal(&mut self) -> Option<IntegerLiteral> {
        self.attempt(Parser::parse_integer_literal)
    }

    /// Consumes a string token and decodes its escapes.
    pub fn parse_string(&mut self) -> Result<String> {
        self.expect_data_type(DataType::String)?;
        let token = self.scanner.advance();
        self.decode_escapes(token)
    }

    pub fn try_parse_string(&mut self) -> Option<String> {
        self.attempt(Parser::parse_string)
    }

    pub fn enter_array(&mut self) -> Result<()> {
        self.expect_token(TokenKind::LeftBrace, "'{'")
    }

    pub fn leave_array(&mut self) -> Result<()> {
        self.expect_token(TokenKind::RightBrace, "'}'")
    }

    pub fn enter_table(&mut self) -> Result<()> {
        self.expect_token(TokenKind::LeftParen, "'('")
    }

    pub fn leave_table(&mut self) -> Result<()> {
        self.expect_token(TokenKind::RightParen, "')'")
    }

    pub fn try_enter_array(&mut self) -> bool {
        self.attempt(Parser::enter_array).is_some()
    }

    pub fn try_leave_array(&mut self) -> bool {
        self.attempt(Parser::leave_array).is_some()
    }

    pub fn try_enter_table(&mut self) -> bool {
        self.attempt(Parser::enter_table).is_some()
    }

    pub fn try_leave_table(&mut self) -> bool {
        self.attempt(Parser::leave_table).is_some()
    }

    /// Consumes a comma if one is next.
    pub fn try_comma(&mut self) -> bool {
        let mut guard = self.scanner.guard();
        if guard.next().kind == TokenKind::Comma {
            guard.commit();
            true
        } else {
            false
        }
    }

    /// `','? identifier '='`, returning the key. The leading comma is part
    /// of the assignment production, which is why a stray comma before a
    /// key (or before a closing paren) is tolerated in tables but not
    /// inside arrays.
    pub fn parse_assignment(&mut self) -> Result<SmolStr> {
        self.try_comma();
        let token = self.scanner.advance();
        if token.kind != TokenKind::Identifier {
            return Err(self.unexpected(token, "an identifier"));
        }
        let name = SmolStr::new(token.text(self.scanner.input()));
        let assign = self.scanner.advance();
        if assign.kind != TokenKind::Assign {
            return Err(self.unexpected(assign, "'='"));
        }
        Ok(name)
    }

    pub fn try_parse_assignment(&mut self) -> Option<SmolStr> {
        self.attempt(Parser::parse_assignment)
    }

    /// Parses a whole array of one element kind, passing each element to
    /// `insert`. Commas between elements are recognized but not required.
    pub fn parse_array<T: ParseElement>(&mut self, mut insert: impl FnMut(T)) -> Result<()> {
        self.expect_data_type(DataType::Array)?;
        self.enter_array()?;
        let mut first = true;
        loop {
            if self.try_leave_array() {
                return Ok(());
            }
            if !first {
                self.try_comma();
            }
            insert(T::parse_element(self)?);
            first = false;
        }
    }

    /// Validates and advances past one value of any kind without building
    /// tree nodes.
    pub fn skip_value(&mut self) -> Result<()> {
        self.skip_value_at(0)
    }

    pub fn skip_integer(&mut self) -> Result<()> {
        self.parse_integer_literal().map(drop)
    }

    pub fn skip_string(&mut self) -> Result<()> {
        self.parse_string().map(drop)
    }

    pub fn skip_array(&mut self) -> Result<()> {
        self.skip_array_at(0)
    }

    pub fn skip_table(&mut self) -> Result<()> {
        self.skip_table_at(0)
    }

    fn skip_value_at(&mut self, depth: usize) -> Result<()> {
        match self.detect_data_type()? {
            DataType::Integer => self.skip_integer(),
            DataType::String => self.skip_string(),
            DataType::Array => self.skip_array_at(depth),
            DataType::Table => self.skip_table_at(depth),
        }
    }

    fn skip_array_at(&mut self, depth: usize) -> Result<()> {
        self.check_depth(depth)?;
        self.expect_data_type(DataType::Array)?;
        self.enter_array()?;
        let mut first = true;
        loop {
            if self.try_leave_array() {
                return Ok(());
            }
            if !first {
                self.try_comma();
            }
            self.skip_value_at(depth + 1)?;
            first = false;
        }
    }

    fn skip_table_at(&mut self, depth: usize) -> Result<()> {
        self.check_depth(depth)?;
        self.expect_data_type(DataType::Table)?;
        self.enter_table()?;
        loop {
            if self.try_close_table(false) {
                return Ok(());
            }
            self.parse_assignment()?;
            self.skip_value_at(depth + 1)?;
        }
    }

    /// Matches the end of a table body: an optional trailing comma followed
    /// by `)` (or, for the document root, end of input). Rolls back when the
    /// body continues.
    pub(crate) fn try_close_table(&mut self, root: bool) -> bool {
        let mut guard = self.scanner.guard();
        let mut token = guard.next();
        if token.kind == TokenKind::Comma {
            token = guard.next();
        }
        let closed = if root {
            guard.is_end_token(token)
        } else {
            token.kind == TokenKind::RightParen
        };
        if closed {
            guard.commit();
        }
        closed
    }

    pub(crate) fn check_depth(&mut self, depth: usize) -> Result<()> {
        if depth >= self.options.max_depth {
            let line = self.current_line();
            return Err(Error::TooDeep { line });
        }
        Ok(())
    }

    fn attempt<T>(&mut self, operation: impl FnOnce(&mut Self) -> Result<T>) -> Option<T> {
        let start = self.scanner.cursor();
        match operation(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.scanner.set_cursor(start);
                None
            }
        }
    }

    fn expect_data_type(&mut self, expected: DataType) -> Result<()> {
        let found = self.detect_data_type()?;
        if found != expected {
            let token = self.scanner.peek();
            return Err(Error::TypeMismatch {
                line: self.scanner.token_line(token),
                expected,
                found,
            });
        }
        Ok(())
    }

    fn expect_token(&mut self, kind: TokenKind, expected: &'static str) -> Result<()> {
        let token = self.scanner.advance();
        if token.kind != kind {
            return Err(self.unexpected(token, expected));
        }
        Ok(())
    }

    fn decode_escapes(&self, token: Token) -> Result<String> {
        let raw = token.text(self.scanner.input());
        let mut decoded = String::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                decoded.push(ch);
                continue;
            }
            match chars.next() {
                Some('\\') => decoded.push('\\'),
                Some('\'') => decoded.push('\''),
                Some('"') => decoded.push('"'),
                Some('n') => decoded.push('\n'),
                Some('r') => decoded.push('\r'),
                Some('t') => decoded.push('\t'),
                other => {
                    return Err(Error::InvalidEscape {
                        line: self.scanner.token_line(token),
                        escape: other.unwrap_or('\\'),
                    });
                }
            }
        }
        Ok(decoded)
    }

    fn unexpected(&self, token: Token, expected: &'static str) -> Error {
        if self.scanner.is_end_token(token) {
            return Error::EndOfInput {
                line: self.scanner.token_line(token),
            };
        }
        Error::UnexpectedToken {
            line: self.scanner.token_line(token),
            found: token.text(self.scanner.input()).to_string(),
            expected,
        }
    }

    fn value_expected(&self, token: Token) -> Error {
        if self.scanner.is_end_token(token) {
            return Error::EndOfInput {
                line: self.scanner.token_line(token),
            };
        }
        Error::ValueExpected {
            line: self.scanner.token_line(token),
            found: token.text(self.scanner.input()).to_string(),
        }
    }
}

/// Element kinds `Parser::parse_array` can produce.
pub trait ParseElement: Sized {
    fn parse_element(parser: &mut Parser<'_>) -> Result<Self>;
}

impl ParseElement for String {
    fn parse_element(parser: &mut Parser<'_>) -> Result<Self> {
        parser.parse_string()
    }
}

impl ParseElement for IntegerLiteral {
    fn parse_element(parser: &mut Parser<'_>) -> Result<Self> {
        parser.parse_integer_literal()
    }
}

macro_rules! numeric_element {
    ($($target:ty)*) => {$(
        impl ParseElement for $target {
            fn parse_element(parser: &mut Parser<'_>) -> Result<Self> {
                parser.parse_integer::<$target>()
            }
        }
    )*};
}

numeric_element!(i8 i16 i32 i64 u8 u16 u32 u64 f32 f64);
