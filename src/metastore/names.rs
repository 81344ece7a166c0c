use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a stream, table or alias. Identifiers are case-insensitive and
/// stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceName(String);

impl SourceName {
    pub fn of(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_uppercase())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a column inside a `LogicalSchema`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnName(String);

impl ColumnName {
    pub fn of(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_uppercase())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// Implicit record timestamp, present on every source.
    pub fn rowtime() -> Self {
        Self::of(ROWTIME_NAME)
    }

    pub fn window_start() -> Self {
        Self::of(WINDOWSTART_NAME)
    }

    pub fn window_end() -> Self {
        Self::of(WINDOWEND_NAME)
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const ROWTIME_NAME: &str = "ROWTIME";
pub const WINDOWSTART_NAME: &str = "WINDOWSTART";
pub const WINDOWEND_NAME: &str = "WINDOWEND";
