use indexmap::IndexMap;
use tracing::debug;

use crate::metastore::{DataSource, MetaStore, SourceName};

/// Catalog kept in memory, keyed by source name in registration order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetaStore {
    sources: IndexMap<SourceName, DataSource>,
}

impl InMemoryMetaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source, replacing any previous entry with the same name.
    pub fn put_source(&mut self, source: DataSource) -> Option<DataSource> {
        debug!(source = %source.name, source_type = %source.source_type, "registering data source");
        self.sources.insert(source.name.clone(), source)
    }

    pub fn delete_source(&mut self, name: &SourceName) -> Option<DataSource> {
        self.sources.shift_remove(name)
    }

    pub fn source_names(&self) -> Vec<SourceName> {
        self.sources.keys().cloned().collect()
    }
}

impl MetaStore for InMemoryMetaStore {
    fn data_source(&self, name: &SourceName) -> Option<DataSource> {
        self.sources.get(name).cloned()
    }
}
