pub mod sql_type;
pub use sql_type::*;

pub mod column;
pub use column::*;

pub mod logical_schema;
pub use logical_schema::*;
