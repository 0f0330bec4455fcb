//! Type predicates and general utilities

use super::{check_arg_count, check_min_arg_count};
use crate::context::CallContext;
use crate::core::error::{ExpressionError, ExpressionResult};
use crate::core::value::Value;

/// Check if a value is a string
pub fn is_string(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("is_string", args, 1)?;
    Ok(Value::boolean(matches!(args[0], Value::Text(_))))
}

/// Check if a value is a boolean
pub fn is_boolean(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("is_boolean", args, 1)?;
    Ok(Value::boolean(matches!(args[0], Value::Bool(_))))
}

/// Check if a value is an array
pub fn is_array(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("is_array", args, 1)?;
    Ok(Value::boolean(matches!(args[0], Value::Array(_))))
}

/// Check if a value is an object
pub fn is_object(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("is_object", args, 1)?;
    Ok(Value::boolean(matches!(args[0], Value::Object(_))))
}

/// Check if a value is a number or a string parseable as one
pub fn is_number(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("is_number", args, 1)?;
    let numeric = match &args[0] {
        Value::Number(_) => true,
        Value::Text(text) => text.trim().parse::<f64>().is_ok(),
        _ => false,
    };
    Ok(Value::boolean(numeric))
}

/// Pick between two values on a condition's truthiness; registered as `if`
pub fn if_else(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("if", args, 3)?;
    if args[0].is_truthy() {
        Ok(args[1].clone())
    } else {
        Ok(args[2].clone())
    }
}

/// Length of a string (in characters) or an array
pub fn length(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("length", args, 1)?;
    match &args[0] {
        Value::Text(text) => Ok(Value::number(text.chars().count() as f64)),
        Value::Array(items) => Ok(Value::number(items.len() as f64)),
        other => Err(ExpressionError::type_error(
            "string or array",
            other.kind_name(),
        )),
    }
}

/// Check whether the first argument equals any of the remaining ones
pub fn includes(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("includes", args, 1)?;
    Ok(Value::boolean(args[1..].contains(&args[0])))
}
