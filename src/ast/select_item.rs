use std::fmt;

use crate::{ast::Expression, metastore::{ColumnName, SourceName}};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectItem {
    /// `expr [AS alias]`
    Single { expression: Expression, alias: Option<ColumnName> },
    /// `*` or `source.*`
    AllColumns { source: Option<SourceName> },
}

impl SelectItem {
    pub fn single(expression: Expression) -> Self {
        SelectItem::Single { expression, alias: None }
    }

    pub fn aliased(expression: Expression, alias: &str) -> Self {
        SelectItem::Single { expression, alias: Some(ColumnName::of(alias)) }
    }

    pub fn all() -> Self {
        SelectItem::AllColumns { source: None }
    }

    pub fn all_from(source: &str) -> Self {
        SelectItem::AllColumns { source: Some(SourceName::of(source)) }
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectItem::Single { expression, alias: Some(alias) } => write!(f, "{} AS {}", expression, alias),
            SelectItem::Single { expression, alias: None } => write!(f, "{}", expression),
            SelectItem::AllColumns { source: Some(source) } => write!(f, "{}.*", source),
            SelectItem::AllColumns { source: None } => write!(f, "*"),
        }
    }
}
