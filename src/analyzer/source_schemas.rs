use indexmap::IndexMap;

use crate::{
    analyzer::AnalyzerError,
    ast::ColumnReference,
    metastore::{ColumnName, LogicalSchema, SourceName},
};

/// Derived schemas of the sources bound to a query, keyed by alias in FROM
/// order. Answers which source a column belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSchemas {
    schemas: IndexMap<SourceName, LogicalSchema>,
}

impl SourceSchemas {
    pub fn new(schemas: IndexMap<SourceName, LogicalSchema>) -> Self {
        Self { schemas }
    }

    pub fn is_join(&self) -> bool {
        self.schemas.len() > 1
    }

    pub fn source_names(&self) -> Vec<SourceName> {
        self.schemas.keys().cloned().collect()
    }

    pub fn schema_of(&self, source: &SourceName) -> Option<&LogicalSchema> {
        self.schemas.get(source)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SourceName, &LogicalSchema)> {
        self.schemas.iter()
    }

    /// Aliases of the sources that expose `column`, limited to `source` when
    /// one is given.
    pub fn sources_with_column(&self, source: Option<&SourceName>, column: &ColumnName) -> Vec<SourceName> {
        self.schemas
            .iter()
            .filter(|(alias, _)| source.is_none_or(|s| s == *alias))
            .filter(|(_, schema)| schema.find_column(column).is_some())
            .map(|(alias, _)| alias.clone())
            .collect()
    }

    /// The single source a column reference belongs to.
    pub fn resolve(&self, column: &ColumnReference) -> Result<SourceName, AnalyzerError> {
        match column {
            ColumnReference::Qualified { source, name } => {
                let schema = self.schemas.get(source)
                    .ok_or_else(|| AnalyzerError::UnknownSource(source.clone()))?;
                match schema.find_column(name) {
                    Some(_) => Ok(source.clone()),
                    None => Err(AnalyzerError::UnknownColumn {
                        name: column.to_string(),
                        candidates: schema.column_names().iter().map(|c| c.to_string()).collect(),
                    }),
                }
            }
            ColumnReference::Unqualified { name } => {
                let mut matches = self.sources_with_column(None, name);
                match matches.len() {
                    0 => Err(AnalyzerError::UnknownColumn { name: name.to_string(), candidates: vec![] }),
                    1 => Ok(matches.remove(0)),
                    _ => Err(AnalyzerError::AmbiguousColumn { name: name.to_string(), sources: matches }),
                }
            }
        }
    }

    /// True when the column resolves to a key or meta column that is not
    /// also exposed as a value column of its source.
    pub fn matches_non_value_field(&self, column: &ColumnReference) -> bool {
        let Ok(source) = self.resolve(column) else {
            return false;
        };
        self.schemas
            .get(&source)
            .map(|schema| schema.find_value_column(column.name()).is_none())
            .unwrap_or(false)
    }
}
