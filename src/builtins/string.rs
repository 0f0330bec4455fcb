//! String manipulation functions

use super::{check_arg_count, check_min_arg_count, text_arg};
use crate::context::CallContext;
use crate::core::error::{ExpressionError, ExpressionResult};
use crate::core::value::Value;
use regex::Regex;

/// Split a string on a delimiter; an empty delimiter splits into characters
pub fn split(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("split", args, 2)?;
    let text = text_arg("split", args, 0)?;
    let delimiter = text_arg("split", args, 1)?;

    let pieces: Vec<Value> = if delimiter.is_empty() {
        text.chars().map(|c| Value::text(c.to_string())).collect()
    } else {
        text.split(delimiter).map(Value::text).collect()
    };
    Ok(Value::Array(pieces))
}

/// Uppercase a string
pub fn upper(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("upper", args, 1)?;
    let text = text_arg("upper", args, 0)?;
    Ok(Value::text(text.to_uppercase()))
}

/// Lowercase a string
pub fn lower(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("lower", args, 1)?;
    let text = text_arg("lower", args, 0)?;
    Ok(Value::text(text.to_lowercase()))
}

/// Test a string against a regular expression, with optional inline flags
/// (`i`, `m`, `s`); registered as `regex`
pub fn regex_test(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("regex", args, 2)?;
    let text = text_arg("regex", args, 0)?;
    let pattern = text_arg("regex", args, 1)?;

    let source = match args.get(2) {
        Some(Value::Text(flags)) if !flags.is_empty() => {
            for flag in flags.chars() {
                if !matches!(flag, 'i' | 'm' | 's') {
                    return Err(ExpressionError::invalid_argument(
                        "regex",
                        format!("unsupported flag '{flag}'"),
                    ));
                }
            }
            format!("(?{flags}){pattern}")
        }
        _ => pattern.to_string(),
    };

    let compiled = Regex::new(&source)
        .map_err(|e| ExpressionError::invalid_argument("regex", e.to_string()))?;
    Ok(Value::boolean(compiled.is_match(text)))
}
