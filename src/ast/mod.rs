pub mod literal;
pub use literal::*;

pub mod expression;
pub use expression::*;

pub mod select_item;
pub use select_item::*;

pub mod window;
pub use window::*;

pub mod join;
pub use join::*;

pub mod with_properties;
pub use with_properties::*;

pub mod query;
pub use query::*;
