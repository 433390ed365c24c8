//! Expression tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use common_error::{FlowError, FlowResult};
use tidyflow_core::{is_reserved, Value};

use super::{BinaryOp, TernaryOp, UnaryOp};

/// Row-level expression.
///
/// The tree is pure data: it serializes to the persisted form directly and is
/// evaluated by a separate evaluator that matches on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Expr {
    /// Literal value.
    Constant { constant: Value },
    /// Value of a named column in the current row.
    Value { value: String },
    /// Unary operation.
    Unary { op: UnaryOp, child: Box<Expr> },
    /// Binary operation.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Ternary operation.
    Ternary {
        op: TernaryOp,
        left: Box<Expr>,
        middle: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Create a literal expression.
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant {
            constant: value.into(),
        }
    }

    /// Create a column reference expression.
    pub fn column(name: impl Into<String>) -> Self {
        Self::Value { value: name.into() }
    }

    /// Create a unary expression.
    pub fn unary(op: UnaryOp, child: Expr) -> Self {
        Self::Unary {
            op,
            child: Box::new(child),
        }
    }

    /// Create a binary expression.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a ternary expression.
    pub fn ternary(op: TernaryOp, left: Expr, middle: Expr, right: Expr) -> Self {
        Self::Ternary {
            op,
            left: Box::new(left),
            middle: Box::new(middle),
            right: Box::new(right),
        }
    }

    /// Conditional: `cond ? then : otherwise`.
    pub fn if_else(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Self::ternary(TernaryOp::IfElse, cond, then, otherwise)
    }

    // Arithmetic operators

    /// Addition.
    pub fn add(self, other: Expr) -> Self {
        Self::binary(BinaryOp::Add, self, other)
    }

    /// Subtraction.
    pub fn sub(self, other: Expr) -> Self {
        Self::binary(BinaryOp::Subtract, self, other)
    }

    /// Multiplication.
    pub fn mul(self, other: Expr) -> Self {
        Self::binary(BinaryOp::Multiply, self, other)
    }

    /// Division.
    pub fn div(self, other: Expr) -> Self {
        Self::binary(BinaryOp::Divide, self, other)
    }

    /// Remainder.
    pub fn rem(self, other: Expr) -> Self {
        Self::binary(BinaryOp::Remainder, self, other)
    }

    /// Exponentiation.
    pub fn pow(self, other: Expr) -> Self {
        Self::binary(BinaryOp::Power, self, other)
    }

    /// Negation.
    pub fn neg(self) -> Self {
        Self::unary(UnaryOp::Negate, self)
    }

    // Comparison operators

    /// Equality comparison.
    pub fn eq(self, other: Expr) -> Self {
        Self::binary(BinaryOp::Equal, self, other)
    }

    /// Inequality comparison.
    pub fn not_eq(self, other: Expr) -> Self {
        Self::binary(BinaryOp::NotEqual, self, other)
    }

    /// Greater than comparison.
    pub fn gt(self, other: Expr) -> Self {
        Self::binary(BinaryOp::Greater, self, other)
    }

    /// Greater than or equal comparison.
    pub fn gt_eq(self, other: Expr) -> Self {
        Self::binary(BinaryOp::GreaterEqual, self, other)
    }

    /// Less than comparison.
    pub fn lt(self, other: Expr) -> Self {
        Self::binary(BinaryOp::Less, self, other)
    }

    /// Less than or equal comparison.
    pub fn lt_eq(self, other: Expr) -> Self {
        Self::binary(BinaryOp::LessEqual, self, other)
    }

    // Logical operators

    /// Logical AND.
    pub fn and(self, other: Expr) -> Self {
        Self::binary(BinaryOp::And, self, other)
    }

    /// Logical OR.
    pub fn or(self, other: Expr) -> Self {
        Self::binary(BinaryOp::Or, self, other)
    }

    /// Logical NOT.
    pub fn not(self) -> Self {
        Self::unary(UnaryOp::Not, self)
    }

    /// Apply any unary operator (type check, conversion, datetime part).
    pub fn apply(self, op: UnaryOp) -> Self {
        Self::unary(op, self)
    }

    /// Columns referenced anywhere in this expression, in first-use order.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Constant { .. } => {}
            Self::Value { value } => {
                if !out.contains(&value.as_str()) {
                    out.push(value);
                }
            }
            Self::Unary { child, .. } => child.collect_columns(out),
            Self::Binary { left, right, .. } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Self::Ternary {
                left,
                middle,
                right,
                ..
            } => {
                left.collect_columns(out);
                middle.collect_columns(out);
                right.collect_columns(out);
            }
        }
    }

    /// Check that every column reference names a usable column.
    pub fn validate(&self) -> FlowResult<()> {
        for name in self.columns() {
            if name.is_empty() {
                return Err(FlowError::invalid_parameter(
                    "column reference must be a non-empty name",
                ));
            }
            if is_reserved(name) {
                return Err(FlowError::invalid_parameter(format!(
                    "column '{name}' is reserved"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant { constant: Value::Text(s) } => write!(f, "{s:?}"),
            Self::Constant { constant } => write!(f, "{constant}"),
            Self::Value { value } => write!(f, "{value}"),
            Self::Unary { op, child } => write!(f, "{op}({child})"),
            Self::Binary { op, left, right } => write!(f, "({left} {} {right})", op.symbol()),
            Self::Ternary {
                op,
                left,
                middle,
                right,
            } => write!(f, "{op}({left}, {middle}, {right})"),
        }
    }
}

/// Create a column reference expression.
pub fn col(name: impl Into<String>) -> Expr {
    Expr::column(name)
}

/// Create a literal expression.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::constant(value)
}
