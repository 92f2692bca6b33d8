use std::io::Write;

use crate::constants::FLOAT_PRECISION;
use crate::error::Result;
use crate::types::IntegerLiteral;

/// Escapes a string for inclusion between double quotes.
pub fn escape_string(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renders a float as a plain decimal literal: fixed precision, trailing
/// zeros stripped, never scientific notation. Non-finite values and
/// negative zero render as "0" so the output always re-parses.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut formatted = format!("{value:.prec$}", prec = FLOAT_PRECISION);
    if formatted.contains('.') {
        while formatted.ends_with('0') {
            formatted.pop();
        }
        if formatted.ends_with('.') {
            formatted.pop();
        }
    }
    if formatted == "-0" {
        return "0".to_string();
    }
    formatted
}

/// Token-level output primitives over any `io::Write` sink. Tracks the
/// current indentation level; layout decisions (when to indent, where the
/// separators go) belong to the scope layer above.
pub struct Writer<W: Write> {
    out: W,
    level: usize,
}

impl<W: Write> Writer<W> {
    pub fn new(out: W) -> Self {
        Self { out, level: 0 }
    }

    pub fn write_key(&mut self, name: &str) -> Result<()> {
        self.out.write_all(name.as_bytes())?;
        self.out.write_all(b" = ")?;
        Ok(())
    }

    pub fn write_string(&mut self, value: &str, quoted: bool) -> Result<()> {
        if quoted {
            self.out.write_all(b"\"")?;
            self.out.write_all(escape_string(value).as_bytes())?;
            self.out.write_all(b"\"")?;
        } else {
            self.out.write_all(value.as_bytes())?;
        }
        Ok(())
    }

    pub fn write_integer(&mut self, value: impl itoa::Integer) -> Result<()> {
        let mut buffer = itoa::Buffer::new();
        self.out.write_all(buffer.format(value).as_bytes())?;
        Ok(())
    }

    pub fn write_float(&mut self, value: f64) -> Result<()> {
        self.out.write_all(format_float(value).as_bytes())?;
        Ok(())
    }

    pub fn write_literal(&mut self, literal: &IntegerLiteral) -> Result<()> {
        if literal.is_negative() {
            self.out.write_all(b"-")?;
        }
        self.out.write_all(literal.digits().as_bytes())?;
        Ok(())
    }

    pub fn enter_array(&mut self) -> Result<()> {
        self.out.write_all(b"{")?;
        Ok(())
    }

    pub fn leave_array(&mut self) -> Result<()> {
        self.out.write_all(b"}")?;
        Ok(())
    }

    pub fn enter_table(&mut self) -> Result<()> {
        self.out.write_all(b"(")?;
        Ok(())
    }

    pub fn leave_table(&mut self) -> Result<()> {
        self.out.write_all(b")")?;
        Ok(())
    }

    pub fn line_comment(&mut self, text: &str) -> Result<()> {
        self.out.write_all(b"// ")?;
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    pub fn block_comment(&mut self, text: &str) -> Result<()> {
        self.out.write_all(b"/* ")?;
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b" */")?;
        Ok(())
    }

    pub fn write_comma(&mut self) -> Result<()> {
        self.out.write_all(b",")?;
        Ok(())
    }

    pub fn space(&mut self) -> Result<()> {
        self.out.write_all(b" ")?;
        Ok(())
    }

    pub fn new_line(&mut self) -> Result<()> {
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_indentation(&mut self) -> Result<()> {
        for _ in 0..self.level {
            self.out.write_all(b"\t")?;
        }
        Ok(())
    }

    pub fn enter_level(&mut self) {
        self.level += 1;
    }

    pub fn leave_level(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
