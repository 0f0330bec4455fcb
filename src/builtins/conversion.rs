//! Conversions between value kinds and JSON text

use super::{check_arg_count, text_arg};
use crate::context::CallContext;
use crate::core::error::{ExpressionError, ExpressionResult};
use crate::core::value::Value;

/// Render any value as its display string
pub fn to_string(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("to_string", args, 1)?;
    Ok(Value::text(args[0].to_string()))
}

/// Coerce a value to a number: numbers pass through, strings are parsed,
/// booleans become 1 or 0
pub fn to_number(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("to_number", args, 1)?;
    match &args[0] {
        Value::Number(n) => Ok(Value::number(*n)),
        Value::Text(text) => text
            .trim()
            .parse::<f64>()
            .map(Value::number)
            .map_err(|_| {
                ExpressionError::invalid_argument(
                    "to_number",
                    format!("cannot parse '{text}' as a number"),
                )
            }),
        Value::Bool(b) => Ok(Value::number(if *b { 1.0 } else { 0.0 })),
        other => Err(ExpressionError::type_error(
            "number, string, or boolean",
            other.kind_name(),
        )),
    }
}

/// Coerce any value to a boolean by truthiness
pub fn to_boolean(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("to_boolean", args, 1)?;
    Ok(Value::boolean(args[0].is_truthy()))
}

/// Serialize any value to JSON text
pub fn to_json(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("to_json", args, 1)?;
    let json = serde_json::to_string(&args[0])
        .map_err(|e| ExpressionError::invalid_argument("to_json", e.to_string()))?;
    Ok(Value::text(json))
}

/// Parse JSON text into a value.
///
/// JSON nulls have no counterpart in the value model, so documents
/// containing them are rejected.
pub fn parse_json(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("parse_json", args, 1)?;
    let text = text_arg("parse_json", args, 0)?;
    serde_json::from_str::<Value>(text)
        .map_err(|e| ExpressionError::invalid_argument("parse_json", e.to_string()))
}
