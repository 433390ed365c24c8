//! Operator enums for expressions.
//!
//! Every operator has a fixed wire name used by the JSON protocol; the
//! evaluator in `tidyflow-engine` gives each one its semantics.

use std::fmt;
use std::str::FromStr;

use common_error::FlowError;
use serde::{Deserialize, Serialize};

/// Single-operand operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnaryOp {
    // Arithmetic and logic
    /// Numeric negation.
    Negate,
    /// Three-valued logical NOT.
    Not,

    // Type checks (never missing)
    /// Is the value a boolean?
    IsBool,
    /// Is the value a datetime?
    IsDatetime,
    /// Is the value missing?
    IsMissing,
    /// Is the value a number?
    IsNumber,
    /// Is the value text?
    IsText,

    // Conversions
    /// Convert to boolean.
    ToBool,
    /// Convert to datetime.
    ToDatetime,
    /// Convert to number.
    ToNumber,
    /// Convert to text.
    ToText,

    // Datetime extraction
    /// Calendar year.
    Year,
    /// Month, 1 to 12.
    Month,
    /// Day of month.
    Day,
    /// Day of week, 0 (Sunday) to 6.
    Weekday,
    /// Hour of day.
    Hours,
    /// Minute of hour.
    Minutes,
    /// Second of minute.
    Seconds,
}

/// Two-operand operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOp {
    // Arithmetic
    /// Addition.
    Add,
    /// Division (by zero yields missing).
    Divide,
    /// Multiplication.
    Multiply,
    /// Exponentiation.
    Power,
    /// Remainder (by zero yields missing).
    Remainder,
    /// Subtraction.
    Subtract,

    // Logical (three-valued)
    /// Logical AND.
    And,
    /// Logical OR.
    Or,

    // Comparison
    /// Equality.
    Equal,
    /// Inequality.
    NotEqual,
    /// Greater than.
    Greater,
    /// Greater than or equal.
    GreaterEqual,
    /// Less than.
    Less,
    /// Less than or equal.
    LessEqual,
}

/// Three-operand operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TernaryOp {
    /// Conditional selection.
    IfElse,
}

impl UnaryOp {
    /// All unary operators.
    pub const ALL: [Self; 18] = [
        Self::Negate,
        Self::Not,
        Self::IsBool,
        Self::IsDatetime,
        Self::IsMissing,
        Self::IsNumber,
        Self::IsText,
        Self::ToBool,
        Self::ToDatetime,
        Self::ToNumber,
        Self::ToText,
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Weekday,
        Self::Hours,
        Self::Minutes,
        Self::Seconds,
    ];

    /// Wire name of this operator.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Negate => "negate",
            Self::Not => "not",
            Self::IsBool => "isBool",
            Self::IsDatetime => "isDatetime",
            Self::IsMissing => "isMissing",
            Self::IsNumber => "isNumber",
            Self::IsText => "isText",
            Self::ToBool => "toBool",
            Self::ToDatetime => "toDatetime",
            Self::ToNumber => "toNumber",
            Self::ToText => "toText",
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Weekday => "weekday",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
        }
    }

    /// Check if this is a type check.
    pub const fn is_typecheck(self) -> bool {
        matches!(
            self,
            Self::IsBool | Self::IsDatetime | Self::IsMissing | Self::IsNumber | Self::IsText
        )
    }

    /// Check if this is a conversion.
    pub const fn is_conversion(self) -> bool {
        matches!(
            self,
            Self::ToBool | Self::ToDatetime | Self::ToNumber | Self::ToText
        )
    }

    /// Check if this extracts a datetime component.
    pub const fn is_datetime_part(self) -> bool {
        matches!(
            self,
            Self::Year
                | Self::Month
                | Self::Day
                | Self::Weekday
                | Self::Hours
                | Self::Minutes
                | Self::Seconds
        )
    }
}

impl BinaryOp {
    /// All binary operators.
    pub const ALL: [Self; 14] = [
        Self::Add,
        Self::Divide,
        Self::Multiply,
        Self::Power,
        Self::Remainder,
        Self::Subtract,
        Self::And,
        Self::Or,
        Self::Equal,
        Self::NotEqual,
        Self::Greater,
        Self::GreaterEqual,
        Self::Less,
        Self::LessEqual,
    ];

    /// Wire name of this operator.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Divide => "divide",
            Self::Multiply => "multiply",
            Self::Power => "power",
            Self::Remainder => "remainder",
            Self::Subtract => "subtract",
            Self::And => "and",
            Self::Or => "or",
            Self::Equal => "equal",
            Self::NotEqual => "notEqual",
            Self::Greater => "greater",
            Self::GreaterEqual => "greaterEqual",
            Self::Less => "less",
            Self::LessEqual => "lessEqual",
        }
    }

    /// Check if this is an arithmetic operator.
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Divide
                | Self::Multiply
                | Self::Power
                | Self::Remainder
                | Self::Subtract
        )
    }

    /// Check if this is a comparison operator.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::Greater
                | Self::GreaterEqual
                | Self::Less
                | Self::LessEqual
        )
    }

    /// Check if this is a logical operator.
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Get the operator symbol for display.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Divide => "/",
            Self::Multiply => "*",
            Self::Power => "^",
            Self::Remainder => "%",
            Self::Subtract => "-",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<=",
        }
    }
}

impl TernaryOp {
    /// All ternary operators.
    pub const ALL: [Self; 1] = [Self::IfElse];

    /// Wire name of this operator.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IfElse => "ifElse",
        }
    }
}

macro_rules! impl_op_name {
    ($ty:ident, $arity:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = FlowError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|op| op.as_str() == s)
                    .ok_or_else(|| {
                        FlowError::unknown_name(format!("'{s}' is not a {} operation", $arity))
                    })
            }
        }
    };
}

impl_op_name!(UnaryOp, "unary");
impl_op_name!(BinaryOp, "binary");
impl_op_name!(TernaryOp, "ternary");

/// Any operator, resolved from its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpName {
    /// A unary operator.
    Unary(UnaryOp),
    /// A binary operator.
    Binary(BinaryOp),
    /// A ternary operator.
    Ternary(TernaryOp),
}

impl OpName {
    /// Number of operands the operator takes.
    pub const fn arity(self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
            Self::Ternary(_) => 3,
        }
    }
}

/// Resolve an operation name to its operator.
pub fn op_lookup(name: &str) -> Result<OpName, FlowError> {
    if let Ok(op) = name.parse::<UnaryOp>() {
        return Ok(OpName::Unary(op));
    }
    if let Ok(op) = name.parse::<BinaryOp>() {
        return Ok(OpName::Binary(op));
    }
    if let Ok(op) = name.parse::<TernaryOp>() {
        return Ok(OpName::Ternary(op));
    }
    Err(FlowError::unknown_name(format!("unknown operation '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_serde() {
        for op in UnaryOp::ALL {
            let json = serde_json::to_value(op).unwrap();
            assert_eq!(json, serde_json::Value::from(op.as_str()));
        }
        for op in BinaryOp::ALL {
            let json = serde_json::to_value(op).unwrap();
            assert_eq!(json, serde_json::Value::from(op.as_str()));
        }
        assert_eq!(
            serde_json::to_value(TernaryOp::IfElse).unwrap(),
            serde_json::Value::from("ifElse")
        );
    }

    #[test]
    fn test_op_lookup() {
        assert_eq!(op_lookup("isBool").unwrap(), OpName::Unary(UnaryOp::IsBool));
        assert_eq!(
            op_lookup("greaterEqual").unwrap(),
            OpName::Binary(BinaryOp::GreaterEqual)
        );
        assert_eq!(op_lookup("ifElse").unwrap().arity(), 3);
        let err = op_lookup("whoops").unwrap_err();
        assert!(matches!(err, FlowError::UnknownName(_)));
    }

    #[test]
    fn test_operator_classification() {
        assert!(BinaryOp::Add.is_arithmetic());
        assert!(!BinaryOp::Add.is_comparison());
        assert!(BinaryOp::LessEqual.is_comparison());
        assert!(BinaryOp::Or.is_logical());
        assert!(UnaryOp::IsMissing.is_typecheck());
        assert!(UnaryOp::ToText.is_conversion());
        assert!(UnaryOp::Weekday.is_datetime_part());
        assert!(!UnaryOp::Negate.is_typecheck());
    }

    #[test]
    fn test_unary_parse_rejects_binary_name() {
        assert!("add".parse::<UnaryOp>().is_err());
        assert_eq!("toNumber".parse::<UnaryOp>().unwrap(), UnaryOp::ToNumber);
    }
}
