//! Value types, parameter encoding and record marshaling shared by the connector.

pub mod parameters;
pub mod records;
pub mod value;

pub use parameters::{Params, to_sql_parameter};
pub use records::{BatchResult, Column, ResultSet, Row, field_to_value};
pub use value::{FromValue, Value};
