mod integer;
mod value;

pub use integer::{IntegerLiteral, Numeric};
pub use value::{Array, DataType, Table, Value};
