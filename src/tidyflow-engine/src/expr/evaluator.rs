//! Expression evaluator implementation.

use std::cmp::Ordering;

use common_error::{FlowError, FlowResult};
use tidyflow_core::{check_comparable, Row, Value};
use tidyflow_logical::{BinaryOp, Expr, TernaryOp, UnaryOp};

use super::convert::{
    datetime_part, to_bool, to_datetime, to_number, to_text, truthy, type_check,
};

/// Expression evaluator for row-at-a-time execution.
///
/// Walks an [`Expr`] tree against a single [`Row`]. The evaluator holds no
/// state, so one instance can be shared by every stage of a run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExprEvaluator;

impl ExprEvaluator {
    /// Create a new expression evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluate an expression against a row.
    pub fn evaluate(&self, expr: &Expr, row: &Row) -> FlowResult<Value> {
        match expr {
            Expr::Constant { constant } => Ok(constant.clone()),
            Expr::Value { value } => row
                .get(value)
                .cloned()
                .ok_or_else(|| FlowError::column_not_found(value.clone())),
            Expr::Unary { op, child } => {
                let value = self.evaluate(child, row)?;
                self.eval_unary(*op, &value)
            }
            Expr::Binary { op, left, right } => {
                let left = self.evaluate(left, row)?;
                let right = self.evaluate(right, row)?;
                self.eval_binary(*op, &left, &right)
            }
            Expr::Ternary {
                op: TernaryOp::IfElse,
                left,
                middle,
                right,
            } => {
                let cond = self.evaluate(left, row)?;
                match truthy(&cond) {
                    None => Ok(Value::Missing),
                    Some(true) => self.evaluate(middle, row),
                    Some(false) => self.evaluate(right, row),
                }
            }
        }
    }

    /// Evaluate a predicate; only an exact `true` selects the row.
    pub fn evaluate_predicate(&self, expr: &Expr, row: &Row) -> FlowResult<bool> {
        Ok(matches!(self.evaluate(expr, row)?, Value::Bool(true)))
    }

    /// Evaluate an expression against every row, in order.
    pub fn evaluate_all(&self, expr: &Expr, rows: &[Row]) -> FlowResult<Vec<Value>> {
        rows.iter().map(|row| self.evaluate(expr, row)).collect()
    }

    fn eval_unary(&self, op: UnaryOp, value: &Value) -> FlowResult<Value> {
        if op.is_typecheck() {
            return Ok(type_check(op, value));
        }
        if op.is_datetime_part() {
            return datetime_part(op, value);
        }
        match op {
            UnaryOp::Negate => match value {
                Value::Missing => Ok(Value::Missing),
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(FlowError::type_error(format!(
                    "negate requires a number, got {} '{other}'",
                    other.kind()
                ))),
            },
            UnaryOp::Not => Ok(truthy(value).map_or(Value::Missing, |b| Value::Bool(!b))),
            UnaryOp::ToBool => Ok(to_bool(value)),
            UnaryOp::ToDatetime => Ok(to_datetime(value)),
            UnaryOp::ToNumber => Ok(to_number(value)),
            UnaryOp::ToText => Ok(to_text(value)),
            other => Err(FlowError::internal(format!("unhandled unary operation {other}"))),
        }
    }

    fn eval_binary(&self, op: BinaryOp, left: &Value, right: &Value) -> FlowResult<Value> {
        if op.is_logical() {
            return Ok(eval_logical(op, truthy(left), truthy(right)));
        }
        if op.is_comparison() {
            return eval_comparison(op, left, right);
        }
        eval_arithmetic(op, left, right)
    }
}

/// Three-valued AND/OR over already coerced operands.
fn eval_logical(op: BinaryOp, left: Option<bool>, right: Option<bool>) -> Value {
    let dominant = op == BinaryOp::Or;
    if left == Some(dominant) || right == Some(dominant) {
        return Value::Bool(dominant);
    }
    if left.is_none() || right.is_none() {
        return Value::Missing;
    }
    Value::Bool(!dominant)
}

fn eval_comparison(op: BinaryOp, left: &Value, right: &Value) -> FlowResult<Value> {
    check_comparable(left, right)?;
    if left.is_missing() || right.is_missing() {
        return Ok(Value::Missing);
    }
    let is_equality = matches!(op, BinaryOp::Equal | BinaryOp::NotEqual);
    if !is_equality && !left.kind().is_ordered() {
        return Err(FlowError::type_error(format!(
            "{op} requires ordered values, got {} '{left}'",
            left.kind()
        )));
    }
    let Some(ordering) = left.cmp_same_kind(right) else {
        // NaN never compares; treat as unknown.
        return Ok(Value::Missing);
    };
    let result = match op {
        BinaryOp::Equal => ordering == Ordering::Equal,
        BinaryOp::NotEqual => ordering != Ordering::Equal,
        BinaryOp::Greater => ordering == Ordering::Greater,
        BinaryOp::GreaterEqual => ordering != Ordering::Less,
        BinaryOp::Less => ordering == Ordering::Less,
        BinaryOp::LessEqual => ordering != Ordering::Greater,
        other => {
            return Err(FlowError::internal(format!(
                "{other} is not a comparison"
            )))
        }
    };
    Ok(Value::Bool(result))
}

fn eval_arithmetic(op: BinaryOp, left: &Value, right: &Value) -> FlowResult<Value> {
    if left.is_missing() || right.is_missing() {
        return Ok(Value::Missing);
    }
    let (Some(l), Some(r)) = (left.as_number(), right.as_number()) else {
        let culprit = if left.as_number().is_none() { left } else { right };
        return Err(FlowError::type_error(format!(
            "{op} requires numbers, got {} '{culprit}'",
            culprit.kind()
        )));
    };
    let result = match op {
        BinaryOp::Add => l + r,
        BinaryOp::Subtract => l - r,
        BinaryOp::Multiply => l * r,
        BinaryOp::Divide | BinaryOp::Remainder if r == 0.0 => return Ok(Value::Missing),
        BinaryOp::Divide => l / r,
        BinaryOp::Remainder => l % r,
        BinaryOp::Power => l.powf(r),
        other => {
            return Err(FlowError::internal(format!(
                "{other} is not an arithmetic operation"
            )))
        }
    };
    Ok(Value::number_or_missing(result))
}
