use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metastore::{ColumnName, SqlType};

/// Which portion of a record a column is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Namespace {
    Key,
    Value,
    /// Record metadata, e.g. ROWTIME.
    Meta,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub name: ColumnName,
    pub sql_type: SqlType,
    pub namespace: Namespace,
}

impl Column {
    pub fn new(name: ColumnName, sql_type: SqlType, namespace: Namespace) -> Self {
        Self { name, sql_type, namespace }
    }

    /// Same column re-homed into another namespace.
    pub fn in_namespace(&self, namespace: Namespace) -> Self {
        Self { name: self.name.clone(), sql_type: self.sql_type, namespace }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace {
            Namespace::Key => write!(f, "{} {} KEY", self.name, self.sql_type),
            Namespace::Value => write!(f, "{} {}", self.name, self.sql_type),
            Namespace::Meta => write!(f, "{} {} META", self.name, self.sql_type),
        }
    }
}
