//! `serde::Deserialize` into the tree model. The format has no null and no
//! boolean, so units are rejected and booleans map to the 0/1 convention.

use std::fmt;

use serde::de::{Deserialize, Deserializer, Error, MapAccess, SeqAccess, Visitor};

use crate::encode::format_float;
use crate::types::{Array, IntegerLiteral, Table, Value};

fn float_literal(value: f64) -> IntegerLiteral {
    let text = format_float(value);
    match text.strip_prefix('-') {
        Some(digits) => IntegerLiteral::new(true, digits),
        None => IntegerLiteral::new(false, text),
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, string, sequence, or map")
    }

    fn visit_bool<E: Error>(self, value: bool) -> Result<Value, E> {
        let digits = if value { "1" } else { "0" };
        Ok(Value::Integer(IntegerLiteral::new(false, digits)))
    }

    fn visit_i64<E: Error>(self, value: i64) -> Result<Value, E> {
        Ok(Value::Integer(IntegerLiteral::from_i64(value)))
    }

    fn visit_u64<E: Error>(self, value: u64) -> Result<Value, E> {
        Ok(Value::Integer(IntegerLiteral::from_u64(value)))
    }

    fn visit_f64<E: Error>(self, value: f64) -> Result<Value, E> {
        Ok(Value::Integer(float_literal(value)))
    }

    fn visit_str<E: Error>(self, value: &str) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_string<E: Error>(self, value: String) -> Result<Value, E> {
        Ok(Value::String(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut array = Array::new();
        while let Some(item) = seq.next_element::<Value>()? {
            array.push(item);
        }
        Ok(Value::Array(array))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut table = Table::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            table.insert(key.as_str(), value);
        }
        Ok(Value::Table(table))
    }

    fn visit_unit<E: Error>(self) -> Result<Value, E> {
        Err(E::custom("the format has no null value"))
    }

    fn visit_none<E: Error>(self) -> Result<Value, E> {
        Err(E::custom("the format has no null value"))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for Table {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Table(table) => Ok(table),
            other => Err(D::Error::custom(format!(
                "expected a map, got {}",
                other.data_type()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Array {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(array) => Ok(array),
            other => Err(D::Error::custom(format!(
                "expected a sequence, got {}",
                other.data_type()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_tree_deserializes_from_json() {
        let table: Table = serde_json::from_str(
            r#"{"name":"editor","width":800,"scale":0.5,"offset":-3,"tags":["a","b"]}"#,
        )
        .unwrap();
        assert_eq!(table.string("name"), Some("editor"));
        assert_eq!(table.integer::<u32>("width").unwrap(), Some(800));
        assert_eq!(table.integer::<f64>("scale").unwrap(), Some(0.5));
        assert_eq!(table.integer::<i32>("offset").unwrap(), Some(-3));
        assert_eq!(table.array("tags").unwrap().string(1), Some("b"));
    }

    #[rstest::rstest]
    fn test_bool_maps_to_zero_or_one() {
        let table: Table = serde_json::from_str(r#"{"on":true,"off":false}"#).unwrap();
        assert_eq!(table.integer::<i32>("on").unwrap(), Some(1));
        assert_eq!(table.integer::<i32>("off").unwrap(), Some(0));
    }

    #[rstest::rstest]
    fn test_null_is_rejected() {
        let result: Result<Table, _> = serde_json::from_str(r#"{"gap":null}"#);
        assert!(result.is_err());
    }

    #[rstest::rstest]
    fn test_non_map_root_is_rejected() {
        let result: Result<Table, _> = serde_json::from_str("[1, 2]");
        assert!(result.is_err());
    }

    #[rstest::rstest]
    fn test_float_literal_keeps_sign() {
        let literal = float_literal(-0.25);
        assert!(literal.is_negative());
        assert_eq!(literal.digits(), "0.25");
        assert!(!float_literal(0.25).is_negative());
    }
}
