pub mod analyzer_error;
pub use analyzer_error::*;

pub mod aliased_data_source;
pub use aliased_data_source::*;

pub mod join_info;
pub use join_info::*;

pub mod into;
pub use into::*;

pub mod source_schemas;
pub use source_schemas::*;

pub mod analysis;
pub use analysis::*;

pub mod immutable_analysis;
pub use immutable_analysis::*;

pub mod query_analyzer;
pub use query_analyzer::*;
