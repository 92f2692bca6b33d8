//! `serde::Serialize` for the tree model, so parsed documents can feed any
//! serde-based sink.

use serde::ser::{Error as _, Serialize, Serializer};

use crate::types::{Array, IntegerLiteral, Table, Value};

impl Serialize for IntegerLiteral {
    /// Fractional literals serialize as f64, negative integral ones as
    /// i64, everything else as u64.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_fractional() {
            let value: f64 = self.value().map_err(S::Error::custom)?;
            serializer.serialize_f64(value)
        } else if self.is_negative() {
            let value: i64 = self.value().map_err(S::Error::custom)?;
            serializer.serialize_i64(value)
        } else {
            let value: u64 = self.value().map_err(S::Error::custom)?;
            serializer.serialize_u64(value)
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Integer(literal) => literal.serialize(serializer),
            Value::String(string) => serializer.serialize_str(string),
            Value::Array(array) => array.serialize(serializer),
            Value::Table(table) => table.serialize(serializer),
        }
    }
}

impl Serialize for Array {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_tree_serializes_to_json() {
        let table = crate::decode::from_str(
            "name = \"editor\", width = 800, scale = 0.5, offset = -3, tags = {\"a\", \"b\"}",
        )
        .unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(
            json,
            r#"{"name":"editor","width":800,"scale":0.5,"offset":-3,"tags":["a","b"]}"#
        );
    }

    #[rstest::rstest]
    fn test_array_serializes_directly() {
        let mut array = Array::new();
        array.push(1i64);
        array.push("two");
        assert_eq!(serde_json::to_string(&array).unwrap(), r#"[1,"two"]"#);
    }

    #[rstest::rstest]
    fn test_literal_kind_selection() {
        assert_eq!(
            serde_json::to_string(&IntegerLiteral::new(false, "4.5")).unwrap(),
            "4.5"
        );
        assert_eq!(
            serde_json::to_string(&IntegerLiteral::new(true, "7")).unwrap(),
            "-7"
        );
        assert_eq!(
            serde_json::to_string(&IntegerLiteral::from_u64(u64::MAX)).unwrap(),
            u64::MAX.to_string()
        );
    }
}
