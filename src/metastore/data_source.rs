use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metastore::{KsqlTopic, LogicalSchema, SourceName};

/// Kind of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSourceType {
    /// Append-only change log of events.
    Stream,
    /// Materialized, keyed point-in-time view.
    Table,
    /// Registered query result used as an input. Not analyzable yet.
    Subquery,
}

impl fmt::Display for DataSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSourceType::Stream => "STREAM",
            DataSourceType::Table => "TABLE",
            DataSourceType::Subquery => "SUBQUERY",
        };
        f.write_str(name)
    }
}

/// A resolved catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub name: SourceName,
    pub source_type: DataSourceType,
    pub schema: LogicalSchema,
    pub topic: KsqlTopic,
}

impl DataSource {
    pub fn new(name: SourceName, source_type: DataSourceType, schema: LogicalSchema, topic: KsqlTopic) -> Self {
        Self { name, source_type, schema, topic }
    }

    pub fn stream(name: SourceName, schema: LogicalSchema, topic: KsqlTopic) -> Self {
        Self::new(name, DataSourceType::Stream, schema, topic)
    }

    pub fn table(name: SourceName, schema: LogicalSchema, topic: KsqlTopic) -> Self {
        Self::new(name, DataSourceType::Table, schema, topic)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (topic: {})", self.source_type, self.name, self.topic.kafka_topic_name)
    }
}
