use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::integer::{IntegerLiteral, Numeric};
use crate::error::Result;

/// The four value kinds the grammar can produce, detectable by one token
/// of lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    String,
    Array,
    Table,
}

impl DataType {
    pub fn name(self) -> &'static str {
        match self {
            DataType::Integer => "integer",
            DataType::String => "string",
            DataType::Array => "array",
            DataType::Table => "table",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One node of a parsed document. Strings are stored decoded; integers keep
/// their raw literal and convert on extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(IntegerLiteral),
    String(String),
    Array(Array),
    Table(Table),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::String(_) => DataType::String,
            Value::Array(_) => DataType::Array,
            Value::Table(_) => DataType::Table,
        }
    }

    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub const fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    pub fn as_literal(&self) -> Option<&IntegerLiteral> {
        match self {
            Value::Integer(literal) => Some(literal),
            _ => None,
        }
    }

    /// Numeric extraction; `Ok(None)` for non-integer values, `Err` only
    /// for the extraction-time sign and range checks.
    pub fn as_integer<T: Numeric>(&self) -> Result<Option<T>> {
        match self {
            Value::Integer(literal) => literal.value().map(Some),
            _ => Ok(None),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(string) => Some(string),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(literal) => write!(f, "{literal}"),
            Value::String(string) => write!(f, "\"{string}\""),
            Value::Array(array) => {
                write!(f, "{{")?;
                for (index, item) in array.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "}}")
            }
            Value::Table(table) => {
                write!(f, "(")?;
                for (index, (key, value)) in table.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<IntegerLiteral> for Value {
    fn from(literal: IntegerLiteral) -> Self {
        Value::Integer(literal)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(IntegerLiteral::from_i64(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Integer(IntegerLiteral::from_u64(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<Table> for Value {
    fn from(table: Table) -> Self {
        Value::Table(table)
    }
}

/// Ordered sequence of owned child values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    items: Vec<Value>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn string(&self, index: usize) -> Option<&str> {
        self.get(index)?.as_str()
    }

    pub fn string_or<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        self.string(index).unwrap_or(default)
    }

    pub fn integer<T: Numeric>(&self, index: usize) -> Result<Option<T>> {
        match self.get(index) {
            Some(value) => value.as_integer(),
            None => Ok(None),
        }
    }

    pub fn integer_or<T: Numeric>(&self, index: usize, default: T) -> Result<T> {
        Ok(self.integer(index)?.unwrap_or(default))
    }

    pub fn table(&self, index: usize) -> Option<&Table> {
        self.get(index)?.as_table()
    }

    pub fn array(&self, index: usize) -> Option<&Array> {
        self.get(index)?.as_array()
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Mapping from key to owned child value.
///
/// Entries iterate in file-declaration (insertion) order; assigning an
/// existing key replaces the value but keeps the original position.
/// Lookups never fail loudly: absence and type mismatch both read as
/// "not present".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    entries: IndexMap<SmolStr, Value>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: impl Into<SmolStr>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(SmolStr::as_str)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.string(key).unwrap_or(default)
    }

    pub fn integer<T: Numeric>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            Some(value) => value.as_integer(),
            None => Ok(None),
        }
    }

    pub fn integer_or<T: Numeric>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.integer(key)?.unwrap_or(default))
    }

    pub fn table(&self, key: &str) -> Option<&Table> {
        self.get(key)?.as_table()
    }

    pub fn array(&self, key: &str) -> Option<&Array> {
        self.get(key)?.as_array()
    }
}
