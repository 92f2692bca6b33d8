//! Reading side: byte-level lexing, the memoizing scanner, and the
//! recursive-descent parser that builds the document tree.

mod chars;
mod guard;
mod parser;
mod scanner;
mod token;

pub use guard::ScanGuard;
pub use parser::{ParseElement, Parser};
pub use scanner::Scanner;
pub use token::{Token, TokenKind};

use crate::error::Result;
use crate::options::ParseOptions;
use crate::types::{Array, DataType, Table, Value};

/// Parses a whole document into its root table.
///
/// The document body is a table without surrounding parentheses, so
/// `width = 800` at the top level and `(width = 800)` as a nested value
/// read the same way.
pub fn from_str(input: &str) -> Result<Table> {
    from_str_with_options(input, ParseOptions::default())
}

pub fn from_str_with_options(input: &str, options: ParseOptions) -> Result<Table> {
    let mut parser = Parser::with_options(input, options);
    let mut root = Table::new();
    parse_table_entries(&mut parser, &mut root, true, 0)?;
    Ok(root)
}

/// Parses one value of any kind at the parser's current position.
pub fn parse_value(parser: &mut Parser<'_>) -> Result<Value> {
    build_value(parser, 0)
}

/// Parses one value and checks it against the wanted kind first, so a
/// mismatch reports the found type instead of a token-level error.
pub fn parse_value_of(parser: &mut Parser<'_>, expected: DataType) -> Result<Value> {
    let found = parser.detect_data_type()?;
    if found != expected {
        let line = parser.current_line();
        return Err(crate::error::Error::TypeMismatch {
            line,
            expected,
            found,
        });
    }
    build_value(parser, 0)
}

fn build_value(parser: &mut Parser<'_>, depth: usize) -> Result<Value> {
    match parser.detect_data_type()? {
        DataType::Integer => Ok(Value::Integer(parser.parse_integer_literal()?)),
        DataType::String => Ok(Value::String(parser.parse_string()?)),
        DataType::Array => {
            parser.check_depth(depth)?;
            parser.enter_array()?;
            let mut array = Array::new();
            loop {
                if parser.try_leave_array() {
                    return Ok(Value::Array(array));
                }
                if !array.is_empty() {
                    parser.try_comma();
                }
                array.push(build_value(parser, depth + 1)?);
            }
        }
        DataType::Table => {
            parser.check_depth(depth)?;
            parser.enter_table()?;
            let mut table = Table::new();
            parse_table_entries(parser, &mut table, false, depth + 1)?;
            Ok(Value::Table(table))
        }
    }
}

fn parse_table_entries(
    parser: &mut Parser<'_>,
    table: &mut Table,
    root: bool,
    depth: usize,
) -> Result<()> {
    loop {
        if parser.try_close_table(root) {
            return Ok(());
        }
        let key = parser.parse_assignment()?;
        let value = build_value(parser, depth)?;
        table.insert(key, value);
    }
}
