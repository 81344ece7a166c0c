use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metastore::{Column, ColumnName, Namespace, SqlType};

/// Named, typed column layout of a source or query result.
///
/// Columns are split into three namespaces: `key` columns read from the
/// record key, `value` columns read from the record value and `meta` columns
/// supplied by the platform (the implicit ROWTIME). Column order inside each
/// namespace is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalSchema {
    meta: Vec<Column>,
    key: Vec<Column>,
    value: Vec<Column>,
}

impl Default for LogicalSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl LogicalSchema {
    /// An empty schema carrying only the implicit ROWTIME meta column.
    pub fn new() -> Self {
        Self {
            meta: vec![Column::new(ColumnName::rowtime(), SqlType::BigInt, Namespace::Meta)],
            key: Vec::new(),
            value: Vec::new(),
        }
    }

    pub fn with_key_column(mut self, name: ColumnName, sql_type: SqlType) -> Self {
        self.key.push(Column::new(name, sql_type, Namespace::Key));
        self
    }

    pub fn with_value_column(mut self, name: ColumnName, sql_type: SqlType) -> Self {
        self.value.push(Column::new(name, sql_type, Namespace::Value));
        self
    }

    pub fn meta_columns(&self) -> &[Column] {
        &self.meta
    }

    pub fn key_columns(&self) -> &[Column] {
        &self.key
    }

    pub fn value_columns(&self) -> &[Column] {
        &self.value
    }

    /// Look a column up by name: value columns win over key columns, which
    /// win over meta columns.
    pub fn find_column(&self, name: &ColumnName) -> Option<&Column> {
        self.find_value_column(name)
            .or_else(|| self.key.iter().find(|c| &c.name == name))
            .or_else(|| self.meta.iter().find(|c| &c.name == name))
    }

    pub fn find_value_column(&self, name: &ColumnName) -> Option<&Column> {
        self.value.iter().find(|c| &c.name == name)
    }

    /// Every column name visible through this schema, in meta, key, value
    /// order, without duplicates.
    pub fn column_names(&self) -> Vec<ColumnName> {
        let mut names: Vec<ColumnName> = Vec::new();
        for col in self.meta.iter().chain(&self.key).chain(&self.value) {
            if !names.contains(&col.name) {
                names.push(col.name.clone());
            }
        }
        names
    }

    /// Returns a schema where the meta columns, the key columns and the
    /// window bounds are also exposed as value columns, ahead of the
    /// original value columns. When `merge` is false the schema is returned
    /// unchanged.
    pub fn with_meta_and_key_cols_in_value(&self, merge: bool) -> LogicalSchema {
        if !merge {
            return self.clone();
        }

        let window_bounds = [
            Column::new(ColumnName::window_start(), SqlType::BigInt, Namespace::Value),
            Column::new(ColumnName::window_end(), SqlType::BigInt, Namespace::Value),
        ];

        let mut value: Vec<Column> = Vec::with_capacity(
            self.meta.len() + self.key.len() + window_bounds.len() + self.value.len(),
        );
        let mut push = |col: Column| {
            // a later copy of an already-exposed name is dropped
            if !value.iter().any(|c| c.name == col.name) {
                value.push(col);
            }
        };

        for col in self.meta.iter().chain(&self.key) {
            push(col.in_namespace(Namespace::Value));
        }
        for col in window_bounds {
            push(col);
        }
        for col in &self.value {
            push(col.clone());
        }

        LogicalSchema {
            meta: self.meta.clone(),
            key: self.key.clone(),
            value,
        }
    }
}

impl fmt::Display for LogicalSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols: Vec<String> = self.meta.iter()
            .chain(&self.key)
            .chain(&self.value)
            .map(|c| c.to_string())
            .collect();
        write!(f, "[{}]", cols.join(", "))
    }
}
