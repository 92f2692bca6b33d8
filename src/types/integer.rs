use std::fmt;

use smol_str::SmolStr;

use crate::error::{Error, Result};

/// A numeric literal as parsed: a sign flag plus the raw digit span
/// (digits with at most one embedded dot). The numeric value is computed
/// on extraction, not at parse time, so a literal that fits no concrete
/// type still parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerLiteral {
    negative: bool,
    digits: SmolStr,
}

impl IntegerLiteral {
    pub fn new(negative: bool, digits: impl Into<SmolStr>) -> Self {
        Self {
            negative,
            digits: digits.into(),
        }
    }

    pub fn from_i64(value: i64) -> Self {
        let mut buffer = itoa::Buffer::new();
        let formatted = buffer.format(value);
        match formatted.strip_prefix('-') {
            Some(magnitude) => Self::new(true, magnitude),
            None => Self::new(false, formatted),
        }
    }

    pub fn from_u64(value: u64) -> Self {
        let mut buffer = itoa::Buffer::new();
        Self::new(false, buffer.format(value))
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn is_fractional(&self) -> bool {
        self.digits.contains('.')
    }

    /// Extracts the numeric value into `T`.
    ///
    /// Signed and floating targets apply the sign flag; unsigned targets
    /// reject a negative literal with `Error::NegativeIntoUnsigned`, even
    /// though the literal itself parsed fine. Integer targets read the
    /// integral part of a fractional literal.
    pub fn value<T: Numeric>(&self) -> Result<T> {
        T::from_digits(&self.digits, self.negative)
    }
}

impl fmt::Display for IntegerLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.digits)
    }
}

/// Numeric types an integer literal can be extracted into.
pub trait Numeric: Sized + Copy {
    /// Whether a leading '-' matches this target at the grammar level.
    const SIGNED: bool;

    fn from_digits(digits: &str, negative: bool) -> Result<Self>;
}

fn integral_part(digits: &str) -> &str {
    match digits.find('.') {
        Some(dot) => &digits[..dot],
        None => digits,
    }
}

fn signed_literal(digits: &str, negative: bool) -> String {
    if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    }
}

fn parse_magnitude(digits: &str, negative: bool) -> Result<u128> {
    integral_part(digits)
        .parse::<u128>()
        .map_err(|_| Error::IntegerOverflow {
            literal: signed_literal(digits, negative),
        })
}

macro_rules! signed_numeric {
    ($($target:ty)*) => {$(
        impl Numeric for $target {
            const SIGNED: bool = true;

            fn from_digits(digits: &str, negative: bool) -> Result<Self> {
                let magnitude = i128::try_from(parse_magnitude(digits, negative)?)
                    .map_err(|_| Error::IntegerOverflow {
                        literal: signed_literal(digits, negative),
                    })?;
                let value = if negative { -magnitude } else { magnitude };
                <$target>::try_from(value).map_err(|_| Error::IntegerOverflow {
                    literal: signed_literal(digits, negative),
                })
            }
        }
    )*};
}

macro_rules! unsigned_numeric {
    ($($target:ty)*) => {$(
        impl Numeric for $target {
            const SIGNED: bool = false;

            fn from_digits(digits: &str, negative: bool) -> Result<Self> {
                if negative {
                    return Err(Error::NegativeIntoUnsigned {
                        literal: signed_literal(digits, true),
                    });
                }
                let magnitude = parse_magnitude(digits, false)?;
                <$target>::try_from(magnitude).map_err(|_| Error::IntegerOverflow {
                    literal: digits.to_string(),
                })
            }
        }
    )*};
}

macro_rules! float_numeric {
    ($($target:ty)*) => {$(
        impl Numeric for $target {
            const SIGNED: bool = true;

            fn from_digits(digits: &str, negative: bool) -> Result<Self> {
                let magnitude = digits.parse::<f64>().map_err(|_| Error::IntegerOverflow {
                    literal: signed_literal(digits, negative),
                })?;
                let value = if negative { -magnitude } else { magnitude };
                Ok(value as $target)
            }
        }
    )*};
}

signed_numeric!(i8 i16 i32 i64);
unsigned_numeric!(u8 u16 u32 u64);
float_numeric!(f32 f64);
