use std::fmt;

use super::Value;

/// Comparison operators supported in rule conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Whether this operator orders its operands (`<`, `<=`, `>`, `>=`).
    #[must_use]
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            CompareOp::Gt | CompareOp::Gte | CompareOp::Lt | CompareOp::Lte
        )
    }
}

/// One side of a comparison.
///
/// Literals cover the number, string and `null` forms of the rule language.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Variable(String),
    Literal(Value),
}

/// Condition AST. The set of node types is closed; evaluation only ever
/// walks these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Comparison {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    Conjunction(Box<Expression>, Box<Expression>),
    Disjunction(Box<Expression>, Box<Expression>),
    /// The literal `true` or `false` used as a whole condition.
    Constant(bool),
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Variable(name) => write!(f, "{name}"),
            Operand::Literal(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Comparison { left, op, right } => write!(f, "{left} {op} {right}"),
            Expression::Conjunction(a, b) => write!(f, "({a} AND {b})"),
            Expression::Disjunction(a, b) => write!(f, "({a} OR {b})"),
            Expression::Constant(v) => write!(f, "{v}"),
        }
    }
}

impl Expression {
    #[must_use]
    pub fn and(self, other: Expression) -> Expression {
        Expression::Conjunction(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Expression) -> Expression {
        Expression::Disjunction(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn constant(value: bool) -> Expression {
        Expression::Constant(value)
    }

    /// Names of all variables referenced by this expression, in the order
    /// they appear (duplicates included).
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_variables(self, &mut out);
        out
    }
}

fn collect_variables<'a>(expr: &'a Expression, out: &mut Vec<&'a str>) {
    match expr {
        Expression::Comparison { left, right, .. } => {
            for operand in [left, right] {
                if let Operand::Variable(name) = operand {
                    out.push(name);
                }
            }
        }
        Expression::Conjunction(a, b) | Expression::Disjunction(a, b) => {
            collect_variables(a, out);
            collect_variables(b, out);
        }
        Expression::Constant(_) => {}
    }
}

/// Intermediate builder for a comparison against a record field.
/// Created by [`var()`]; requires a comparison method to produce an [`Expression`].
#[derive(Debug, Clone)]
pub struct VarExpr {
    name: String,
}

impl VarExpr {
    fn compare(self, op: CompareOp, value: impl Into<Value>) -> Expression {
        Expression::Comparison {
            left: Operand::Variable(self.name),
            op,
            right: Operand::Literal(value.into()),
        }
    }

    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Expression {
        self.compare(CompareOp::Eq, value)
    }

    #[must_use]
    pub fn neq(self, value: impl Into<Value>) -> Expression {
        self.compare(CompareOp::Neq, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> Expression {
        self.compare(CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(self, value: impl Into<Value>) -> Expression {
        self.compare(CompareOp::Gte, value)
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> Expression {
        self.compare(CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(self, value: impl Into<Value>) -> Expression {
        self.compare(CompareOp::Lte, value)
    }

    /// `name == null`
    #[must_use]
    pub fn is_null(self) -> Expression {
        self.compare(CompareOp::Eq, Value::Null)
    }

    /// `name != null`
    #[must_use]
    pub fn is_not_null(self) -> Expression {
        self.compare(CompareOp::Neq, Value::Null)
    }
}

#[must_use]
pub fn var(name: &str) -> VarExpr {
    VarExpr {
        name: name.to_owned(),
    }
}
