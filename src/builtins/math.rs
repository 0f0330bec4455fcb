//! Numeric functions

use super::{check_arg_count, check_min_arg_count, number_arg};
use crate::context::CallContext;
use crate::core::error::ExpressionResult;
use crate::core::value::Value;

/// Ceiling
pub fn ceil(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("ceil", args, 1)?;
    let n = number_arg("ceil", args, 0)?;
    Ok(Value::number(n.ceil()))
}

/// Floor
pub fn floor(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("floor", args, 1)?;
    let n = number_arg("floor", args, 0)?;
    Ok(Value::number(n.floor()))
}

/// Round to the nearest integer
pub fn round(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("round", args, 1)?;
    let n = number_arg("round", args, 0)?;
    Ok(Value::number(n.round()))
}

/// Absolute value
pub fn abs(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("abs", args, 1)?;
    let n = number_arg("abs", args, 0)?;
    Ok(Value::number(n.abs()))
}

/// Uniform random number in `[0, 1)`
pub fn random(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("random", args, 0)?;
    Ok(Value::number(rand::random::<f64>()))
}

/// Minimum of one or more numbers
pub fn min(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("min", args, 1)?;
    let mut result = number_arg("min", args, 0)?;
    for index in 1..args.len() {
        let n = number_arg("min", args, index)?;
        if n < result {
            result = n;
        }
    }
    Ok(Value::number(result))
}

/// Maximum of one or more numbers
pub fn max(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("max", args, 1)?;
    let mut result = number_arg("max", args, 0)?;
    for index in 1..args.len() {
        let n = number_arg("max", args, index)?;
        if n > result {
            result = n;
        }
    }
    Ok(Value::number(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExpressionEngine;

    #[test]
    fn test_rounding() {
        let engine = ExpressionEngine::new();
        assert_eq!(engine.evaluate("ceil(1.2)").unwrap(), Value::number(2.0));
        assert_eq!(engine.evaluate("floor(1.8)").unwrap(), Value::number(1.0));
        assert_eq!(engine.evaluate("round(2.5)").unwrap(), Value::number(3.0));
        assert_eq!(engine.evaluate("abs(0 - 4)").unwrap(), Value::number(4.0));
    }

    #[test]
    fn test_min_max_variadic() {
        let engine = ExpressionEngine::new();
        assert_eq!(
            engine.evaluate("min(3, 1, 2)").unwrap(),
            Value::number(1.0)
        );
        assert_eq!(
            engine.evaluate("max(3, 1, 2)").unwrap(),
            Value::number(3.0)
        );
        assert!(engine.evaluate("min()").is_err());
    }

    #[test]
    fn test_random_range() {
        let engine = ExpressionEngine::new();
        let value = engine.evaluate("random()").unwrap();
        let n = value.as_number().unwrap();
        assert!((0.0..1.0).contains(&n));
    }
}
