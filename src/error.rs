use std::io;

use thiserror::Error;

use crate::types::DataType;

/// Failures raised by the reader and writer.
///
/// Parser errors carry the 1-based line of the offending token, computed by
/// counting newlines from the start of the input buffer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("line {line}: unexpected end of input")]
    EndOfInput { line: usize },

    #[error("line {line}: '{found}' - {expected} expected")]
    UnexpectedToken {
        line: usize,
        found: String,
        expected: &'static str,
    },

    #[error("line {line}: invalid escape sequence '\\{escape}'")]
    InvalidEscape { line: usize, escape: char },

    #[error("line {line}: '{found}' - value expected")]
    ValueExpected { line: usize, found: String },

    #[error("line {line}: {expected} expected, found {found}")]
    TypeMismatch {
        line: usize,
        expected: DataType,
        found: DataType,
    },

    #[error("negative literal '{literal}' cannot be read into an unsigned type")]
    NegativeIntoUnsigned { literal: String },

    #[error("literal '{literal}' is out of range for the requested type")]
    IntegerOverflow { literal: String },

    #[error("line {line}: nesting exceeds the depth limit")]
    TooDeep { line: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
