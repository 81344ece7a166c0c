use std::fmt;

use crate::ast::{Expression, Relation, WithinExpression};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Outer,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Outer => "FULL OUTER",
        };
        f.write_str(name)
    }
}

/// `<type> JOIN relation [WITHIN ...] ON criteria`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub relation: Relation,
    pub criteria: Expression,
    pub within: Option<WithinExpression>,
}

impl Join {
    pub fn new(join_type: JoinType, relation: Relation, criteria: Expression) -> Self {
        Self { join_type, relation, criteria, within: None }
    }

    pub fn within(mut self, within: WithinExpression) -> Self {
        self.within = Some(within);
        self
    }
}
