use std::fmt::{self, Display};

use crate::{ast::Expression, metastore::{DataSourceType, SourceName}};

/// Single-valued clauses an analysis holds at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    Into,
    Where,
    GroupBy,
    Window,
    Having,
    PartitionBy,
    Limit,
}

impl Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Clause::Into => "INTO",
            Clause::Where => "WHERE",
            Clause::GroupBy => "GROUP BY",
            Clause::Window => "WINDOW",
            Clause::Having => "HAVING",
            Clause::PartitionBy => "PARTITION BY",
            Clause::Limit => "LIMIT",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    DuplicateClauseElement { clause: Clause, expression: Expression },
    StructuralInvariantViolation(String),
    UnsupportedSourceKind { source: SourceName, source_type: DataSourceType },
    NoSourcesBound,
    ClauseAlreadySet { clause: Clause },
    UnknownSource(SourceName),
    UnknownColumn { name: String, candidates: Vec<String> },
    AmbiguousColumn { name: String, sources: Vec<SourceName> },
    DuplicateAlias(SourceName),
    UnsupportedJoinCriteria(String),
    InvalidProperty { name: String, reason: String },
}

impl AnalyzerError {
    /// True for violations of the analyzer's own calling contract, as opposed
    /// to problems with the query text or the catalog.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AnalyzerError::StructuralInvariantViolation(_)
                | AnalyzerError::NoSourcesBound
                | AnalyzerError::ClauseAlreadySet { .. }
        )
    }
}

impl Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerError::DuplicateClauseElement { clause, expression } =>
                write!(f, "Duplicate {} expression: {}", clause, expression),
            AnalyzerError::StructuralInvariantViolation(msg) =>
                write!(f, "Invalid analysis state: {}", msg),
            AnalyzerError::UnsupportedSourceKind { source, source_type } =>
                write!(f, "Data source type not supported yet: {} ({})", source, source_type),
            AnalyzerError::NoSourcesBound =>
                write!(f, "No data sources bound to the analysis"),
            AnalyzerError::ClauseAlreadySet { clause } =>
                write!(f, "{} clause already set", clause),
            AnalyzerError::UnknownSource(name) =>
                write!(f, "Unknown source: {}", name),
            AnalyzerError::UnknownColumn { name, candidates } if candidates.is_empty() =>
                write!(f, "Column '{}' cannot be resolved", name),
            AnalyzerError::UnknownColumn { name, candidates } =>
                write!(f, "Column '{}' cannot be resolved, known columns: {}", name, candidates.join(", ")),
            AnalyzerError::AmbiguousColumn { name, sources } => {
                let sources: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
                write!(f, "Column '{}' is ambiguous, it exists in: {}", name, sources.join(", "))
            }
            AnalyzerError::DuplicateAlias(alias) =>
                write!(f, "Source alias '{}' is used more than once", alias),
            AnalyzerError::UnsupportedJoinCriteria(criteria) =>
                write!(f, "Unsupported join criteria: {}, only equality between the two sides is supported", criteria),
            AnalyzerError::InvalidProperty { name, reason } =>
                write!(f, "Invalid property {}: {}", name, reason),
        }
    }
}

impl std::error::Error for AnalyzerError {}
