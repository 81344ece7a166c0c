use std::fmt;

use crate::{ast::Literal, metastore::{ColumnName, SourceName}};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnReference {
    Unqualified { name: ColumnName },
    Qualified { source: SourceName, name: ColumnName },
}

impl ColumnReference {
    pub fn unqualified(name: ColumnName) -> Self {
        ColumnReference::Unqualified { name }
    }

    pub fn qualified(source: SourceName, name: ColumnName) -> Self {
        ColumnReference::Qualified { source, name }
    }

    pub fn name(&self) -> &ColumnName {
        match self {
            ColumnReference::Unqualified { name } => name,
            ColumnReference::Qualified { name, .. } => name,
        }
    }

    pub fn source(&self) -> Option<&SourceName> {
        match self {
            ColumnReference::Unqualified { .. } => None,
            ColumnReference::Qualified { source, .. } => Some(source),
        }
    }
}

impl fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnReference::Unqualified { name } => write!(f, "{}", name),
            ColumnReference::Qualified { source, name } => write!(f, "{}.{}", source, name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expression>,
}

impl FunctionCall {
    pub fn new(name: impl AsRef<str>, args: Vec<Expression>) -> Self {
        Self { name: name.as_ref().to_uppercase(), args }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.name, args.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::NotEq => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::LtEq => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::GtEq => ">=",
        };
        f.write_str(op)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Mod => "%",
        };
        f.write_str(op)
    }
}

/// Parsed scalar or boolean expression. Compared and hashed structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    Literal(Literal),
    Column(ColumnReference),
    Function(FunctionCall),
    Comparison { op: ComparisonOp, left: Box<Expression>, right: Box<Expression> },
    Arithmetic { op: ArithmeticOp, left: Box<Expression>, right: Box<Expression> },
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    IsNull { expr: Box<Expression>, negated: bool },
}

impl Expression {
    pub fn column(name: &str) -> Expression {
        Expression::Column(ColumnReference::unqualified(ColumnName::of(name)))
    }

    pub fn qualified_column(source: &str, name: &str) -> Expression {
        Expression::Column(ColumnReference::qualified(SourceName::of(source), ColumnName::of(name)))
    }

    pub fn int(value: i64) -> Expression {
        Expression::Literal(Literal::Int(value))
    }

    pub fn string(value: &str) -> Expression {
        Expression::Literal(Literal::String(value.to_string()))
    }

    pub fn function(name: &str, args: Vec<Expression>) -> Expression {
        Expression::Function(FunctionCall::new(name, args))
    }

    pub fn compare(op: ComparisonOp, left: Expression, right: Expression) -> Expression {
        Expression::Comparison { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn eq(left: Expression, right: Expression) -> Expression {
        Expression::compare(ComparisonOp::Eq, left, right)
    }

    pub fn and(left: Expression, right: Expression) -> Expression {
        Expression::And(Box::new(left), Box::new(right))
    }

    /// Every column reference in the expression, depth first, left to right.
    pub fn column_references(&self) -> Vec<&ColumnReference> {
        let mut out = Vec::new();
        self.visit(&mut |e| {
            if let Expression::Column(c) = e {
                out.push(c);
            }
        });
        out
    }

    /// Every function call in the expression, outermost first.
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        let mut out = Vec::new();
        self.visit(&mut |e| {
            if let Expression::Function(call) = e {
                out.push(call);
            }
        });
        out
    }

    fn visit<'a, F: FnMut(&'a Expression)>(&'a self, f: &mut F) {
        f(self);
        match self {
            Expression::Literal(_) | Expression::Column(_) => {}
            Expression::Function(call) => {
                for arg in &call.args {
                    arg.visit(f);
                }
            }
            Expression::Comparison { left, right, .. }
            | Expression::Arithmetic { left, right, .. }
            | Expression::And(left, right)
            | Expression::Or(left, right) => {
                left.visit(f);
                right.visit(f);
            }
            Expression::Not(inner) => inner.visit(f),
            Expression::IsNull { expr, .. } => expr.visit(f),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(l) => write!(f, "{}", l),
            Expression::Column(c) => write!(f, "{}", c),
            Expression::Function(call) => write!(f, "{}", call),
            Expression::Comparison { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expression::Arithmetic { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expression::And(l, r) => write!(f, "({} AND {})", l, r),
            Expression::Or(l, r) => write!(f, "({} OR {})", l, r),
            Expression::Not(e) => write!(f, "(NOT {})", e),
            Expression::IsNull { expr, negated: false } => write!(f, "({} IS NULL)", expr),
            Expression::IsNull { expr, negated: true } => write!(f, "({} IS NOT NULL)", expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let a = Expression::eq(Expression::qualified_column("o", "id"), Expression::int(1));
        let b = Expression::eq(Expression::qualified_column("O", "ID"), Expression::int(1));
        assert_eq!(a, b);
        assert_ne!(a, Expression::eq(Expression::column("id"), Expression::int(1)));
    }

    #[test]
    fn test_display() {
        let e = Expression::and(
            Expression::eq(Expression::qualified_column("o", "id"), Expression::int(1)),
            Expression::function("ucase", vec![Expression::string("x")]),
        );
        assert_eq!(e.to_string(), "((O.ID = 1) AND UCASE('x'))");
    }

    #[test]
    fn test_column_references_and_function_calls() {
        let e = Expression::and(
            Expression::eq(Expression::qualified_column("o", "id"), Expression::column("user_id")),
            Expression::function("len", vec![Expression::function("trim", vec![Expression::column("name")])]),
        );

        let cols: Vec<String> = e.column_references().iter().map(|c| c.to_string()).collect();
        assert_eq!(cols, vec!["O.ID", "USER_ID", "NAME"]);

        let fns: Vec<&str> = e.function_calls().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(fns, vec!["LEN", "TRIM"]);
    }
}
