//! SFF is a small nestable configuration format: documents are tables of
//! `key = value` assignments where a value is an integer, a string, an
//! array, or another table. This crate provides the tokenizer, a tree
//! parser, grammar-level parsing primitives for streaming readers, and a
//! structured writer whose output always re-parses.
//!
//! ```
//! let table = sff::from_str("width = 800, view = (x = 1, y = 2)")?;
//! assert_eq!(table.integer::<u32>("width")?, Some(800));
//!
//! let text = sff::to_string(&table, sff::WriteOptions::inline())?;
//! assert_eq!(text, "width = 800, view = (x = 1, y = 2)");
//! # Ok::<(), sff::Error>(())
//! ```

pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod options;
pub mod types;

mod de;
mod ser;

pub use crate::decode::{
    from_str, from_str_with_options, parse_value, parse_value_of, ParseElement, Parser, ScanGuard,
    Scanner, Token, TokenKind,
};
pub use crate::encode::{
    escape_string, format_float, save_to_path, to_string, to_writer, ArrayWriter, TableWriter,
    Writer,
};
pub use crate::error::{Error, Result};
pub use crate::options::{ParseOptions, WriteOptions};
pub use crate::types::{Array, DataType, IntegerLiteral, Numeric, Table, Value};
