use std::fmt;

use serde::{Deserialize, Serialize};

/// SQL type of a column as known to the catalog.
///
/// Only the shape matters to analysis: types are carried through derived
/// schemas untouched and are never coerced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// BOOLEAN
    Boolean,
    /// 32-bit INTEGER
    Integer,
    /// 64-bit BIGINT, also used for ROWTIME and window bounds
    BigInt,
    /// DOUBLE
    Double,
    /// STRING / VARCHAR
    String,
    /// BYTES
    Bytes,
    /// TIMESTAMP
    Timestamp,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SqlType::Boolean => "BOOLEAN",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Double => "DOUBLE",
            SqlType::String => "STRING",
            SqlType::Bytes => "BYTES",
            SqlType::Timestamp => "TIMESTAMP",
        };
        f.write_str(name)
    }
}
