use crate::{
    analyzer::AnalyzerError,
    metastore::{DataSource, DataSourceType, KsqlTopic, LogicalSchema, SourceName},
};

/// A catalog source of a kind the analysis can consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceKind {
    Stream(DataSource),
    Table(DataSource),
}

impl DataSourceKind {
    pub fn data_source(&self) -> &DataSource {
        match self {
            DataSourceKind::Stream(ds) | DataSourceKind::Table(ds) => ds,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, DataSourceKind::Table(_))
    }
}

impl TryFrom<DataSource> for DataSourceKind {
    type Error = AnalyzerError;

    fn try_from(source: DataSource) -> Result<Self, Self::Error> {
        match source.source_type {
            DataSourceType::Stream => Ok(DataSourceKind::Stream(source)),
            DataSourceType::Table => Ok(DataSourceKind::Table(source)),
            DataSourceType::Subquery => Err(AnalyzerError::UnsupportedSourceKind {
                source: source.name,
                source_type: source.source_type,
            }),
        }
    }
}

/// A source bound into the query under the name it is visible as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasedDataSource {
    alias: SourceName,
    data_source: DataSourceKind,
}

impl AliasedDataSource {
    pub fn new(alias: SourceName, data_source: DataSource) -> Result<Self, AnalyzerError> {
        Ok(Self { alias, data_source: DataSourceKind::try_from(data_source)? })
    }

    pub fn alias(&self) -> &SourceName {
        &self.alias
    }

    pub fn kind(&self) -> &DataSourceKind {
        &self.data_source
    }

    pub fn data_source(&self) -> &DataSource {
        self.data_source.data_source()
    }

    pub fn schema(&self) -> &LogicalSchema {
        &self.data_source().schema
    }

    pub fn topic(&self) -> &KsqlTopic {
        &self.data_source().topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metastore::{Format, KeyFormat, ValueFormat};

    fn source(name: &str, source_type: DataSourceType) -> DataSource {
        let topic = KsqlTopic::new(name, KeyFormat::non_windowed(Format::Kafka), ValueFormat::of(Format::Json));
        DataSource::new(SourceName::of(name), source_type, LogicalSchema::new(), topic)
    }

    #[test]
    fn test_stream_and_table_accepted() {
        let s = AliasedDataSource::new(SourceName::of("s"), source("orders", DataSourceType::Stream)).unwrap();
        assert_eq!(s.alias(), &SourceName::of("S"));
        assert!(!s.kind().is_table());
        assert_eq!(s.data_source().name, SourceName::of("orders"));

        let t = AliasedDataSource::new(SourceName::of("t"), source("users", DataSourceType::Table)).unwrap();
        assert!(t.kind().is_table());
    }

    #[test]
    fn test_subquery_rejected() {
        let err = AliasedDataSource::new(SourceName::of("q"), source("q1", DataSourceType::Subquery)).unwrap_err();
        assert_eq!(err, AnalyzerError::UnsupportedSourceKind {
            source: SourceName::of("q1"),
            source_type: DataSourceType::Subquery,
        });
    }
}
