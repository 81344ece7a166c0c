use std::fmt;

use crate::ast::{Expression, JoinType, WithinExpression};

/// One pairwise join: the sources joined so far on the left, the next bound
/// source on the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinInfo {
    left_join_expression: Expression,
    right_join_expression: Expression,
    join_type: JoinType,
    within: Option<WithinExpression>,
}

impl JoinInfo {
    pub fn new(
        left_join_expression: Expression,
        right_join_expression: Expression,
        join_type: JoinType,
        within: Option<WithinExpression>,
    ) -> Self {
        Self { left_join_expression, right_join_expression, join_type, within }
    }

    pub fn left_join_expression(&self) -> &Expression {
        &self.left_join_expression
    }

    pub fn right_join_expression(&self) -> &Expression {
        &self.right_join_expression
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn within(&self) -> Option<&WithinExpression> {
        self.within.as_ref()
    }
}

impl fmt::Display for JoinInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} JOIN ON {} = {}", self.join_type, self.left_join_expression, self.right_join_expression)?;
        if let Some(within) = &self.within {
            write!(f, " {}", within)?;
        }
        Ok(())
    }
}
