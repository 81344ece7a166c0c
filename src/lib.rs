pub mod metastore;
pub use metastore::{MetaStore, InMemoryMetaStore, DataSource, DataSourceType, LogicalSchema, SourceName, ColumnName};

pub mod ast;

pub mod analyzer;
pub use analyzer::{Analysis, ImmutableAnalysis, AnalyzerError, QueryAnalyzer};
