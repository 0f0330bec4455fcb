//! Default binary operator table
//!
//! Arithmetic (`+ - * / % ^`), comparison (`< <= > >= == !=`), and logical
//! (`and` / `or`) operators. Logical operators do not short-circuit: by the
//! time an operator runs, both operands are already evaluated.

use crate::context::{OperatorFn, Operators};
use crate::core::error::{ExpressionError, ExpressionResult};
use crate::core::value::Value;

/// The seeded operator table
pub fn default_operators() -> Operators {
    let mut operators = Operators::new();
    operators.insert("+".to_string(), add as OperatorFn);
    operators.insert("-".to_string(), subtract as OperatorFn);
    operators.insert("*".to_string(), multiply as OperatorFn);
    operators.insert("/".to_string(), divide as OperatorFn);
    operators.insert("%".to_string(), modulo as OperatorFn);
    operators.insert("^".to_string(), power as OperatorFn);
    operators.insert("<".to_string(), less_than as OperatorFn);
    operators.insert("<=".to_string(), less_equal as OperatorFn);
    operators.insert(">".to_string(), greater_than as OperatorFn);
    operators.insert(">=".to_string(), greater_equal as OperatorFn);
    operators.insert("==".to_string(), equal as OperatorFn);
    operators.insert("!=".to_string(), not_equal as OperatorFn);
    operators.insert("and".to_string(), logical_and as OperatorFn);
    operators.insert("or".to_string(), logical_or as OperatorFn);
    operators
}

fn numeric_pair(left: &Value, right: &Value) -> ExpressionResult<(f64, f64)> {
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(ExpressionError::type_error(
            "number",
            format!("{} and {}", left.kind_name(), right.kind_name()),
        )),
    }
}

/// Numeric addition or string concatenation
pub fn add(left: &Value, right: &Value) -> ExpressionResult<Value> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::number(l + r)),
        (Value::Text(l), Value::Text(r)) => Ok(Value::text(format!("{l}{r}"))),
        _ => Err(ExpressionError::type_error(
            "number or string",
            format!("{} and {}", left.kind_name(), right.kind_name()),
        )),
    }
}

/// Numeric subtraction
pub fn subtract(left: &Value, right: &Value) -> ExpressionResult<Value> {
    let (l, r) = numeric_pair(left, right)?;
    Ok(Value::number(l - r))
}

/// Numeric multiplication
pub fn multiply(left: &Value, right: &Value) -> ExpressionResult<Value> {
    let (l, r) = numeric_pair(left, right)?;
    Ok(Value::number(l * r))
}

/// Numeric division
pub fn divide(left: &Value, right: &Value) -> ExpressionResult<Value> {
    let (l, r) = numeric_pair(left, right)?;
    Ok(Value::number(l / r))
}

/// Numeric remainder
pub fn modulo(left: &Value, right: &Value) -> ExpressionResult<Value> {
    let (l, r) = numeric_pair(left, right)?;
    Ok(Value::number(l % r))
}

/// Exponentiation
pub fn power(left: &Value, right: &Value) -> ExpressionResult<Value> {
    let (l, r) = numeric_pair(left, right)?;
    Ok(Value::number(l.powf(r)))
}

/// Less than, over numbers or strings
pub fn less_than(left: &Value, right: &Value) -> ExpressionResult<Value> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::boolean(l < r)),
        (Value::Text(l), Value::Text(r)) => Ok(Value::boolean(l < r)),
        _ => Err(ExpressionError::type_error(
            "number or string",
            format!("{} and {}", left.kind_name(), right.kind_name()),
        )),
    }
}

/// Less than or equal, over numbers or strings
pub fn less_equal(left: &Value, right: &Value) -> ExpressionResult<Value> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::boolean(l <= r)),
        (Value::Text(l), Value::Text(r)) => Ok(Value::boolean(l <= r)),
        _ => Err(ExpressionError::type_error(
            "number or string",
            format!("{} and {}", left.kind_name(), right.kind_name()),
        )),
    }
}

/// Greater than, over numbers or strings
pub fn greater_than(left: &Value, right: &Value) -> ExpressionResult<Value> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::boolean(l > r)),
        (Value::Text(l), Value::Text(r)) => Ok(Value::boolean(l > r)),
        _ => Err(ExpressionError::type_error(
            "number or string",
            format!("{} and {}", left.kind_name(), right.kind_name()),
        )),
    }
}

/// Greater than or equal, over numbers or strings
pub fn greater_equal(left: &Value, right: &Value) -> ExpressionResult<Value> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::boolean(l >= r)),
        (Value::Text(l), Value::Text(r)) => Ok(Value::boolean(l >= r)),
        _ => Err(ExpressionError::type_error(
            "number or string",
            format!("{} and {}", left.kind_name(), right.kind_name()),
        )),
    }
}

/// Structural equality over any two values
pub fn equal(left: &Value, right: &Value) -> ExpressionResult<Value> {
    Ok(Value::boolean(left == right))
}

/// Structural inequality over any two values
pub fn not_equal(left: &Value, right: &Value) -> ExpressionResult<Value> {
    Ok(Value::boolean(left != right))
}

/// Logical conjunction of truthiness
pub fn logical_and(left: &Value, right: &Value) -> ExpressionResult<Value> {
    Ok(Value::boolean(left.is_truthy() && right.is_truthy()))
}

/// Logical disjunction of truthiness
pub fn logical_or(left: &Value, right: &Value) -> ExpressionResult<Value> {
    Ok(Value::boolean(left.is_truthy() || right.is_truthy()))
}
