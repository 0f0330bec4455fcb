//! Object inspection functions

use super::{check_arg_count, object_arg, text_arg};
use crate::context::CallContext;
use crate::core::error::ExpressionResult;
use crate::core::value::Value;

/// Keys of an object as a sorted array of strings.
///
/// Sorted because the underlying map has no stable iteration order.
pub fn keys(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("keys", args, 1)?;
    let object = object_arg("keys", args, 0)?;

    let mut names: Vec<&String> = object.keys().collect();
    names.sort();
    Ok(Value::Array(
        names.into_iter().map(Value::text).collect(),
    ))
}

/// Values of an object as an array, ordered by key
pub fn values(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("values", args, 1)?;
    let object = object_arg("values", args, 0)?;

    let mut entries: Vec<(&String, &Value)> = object.iter().collect();
    entries.sort_by_key(|(key, _)| key.as_str());
    Ok(Value::Array(
        entries.into_iter().map(|(_, value)| value.clone()).collect(),
    ))
}

/// Whether an object carries a key
pub fn has(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("has", args, 2)?;
    let object = object_arg("has", args, 0)?;
    let key = text_arg("has", args, 1)?;
    Ok(Value::boolean(object.contains_key(key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Scope;
    use crate::ExpressionEngine;

    #[test]
    fn test_keys_and_values_sorted() {
        let engine = ExpressionEngine::new();
        let result = engine
            .evaluate("keys({b: 2, a: 1, c: 3})")
            .unwrap();
        assert_eq!(
            result,
            Value::array(vec![Value::text("a"), Value::text("b"), Value::text("c")])
        );
        let result = engine.evaluate("values({b: 2, a: 1})").unwrap();
        assert_eq!(
            result,
            Value::array(vec![Value::number(1.0), Value::number(2.0)])
        );
    }

    #[test]
    fn test_has() {
        let engine = ExpressionEngine::new();
        let scope = Scope::new().variable(
            "config",
            serde_json::from_str::<Value>(r#"{"retries": 3}"#).expect("valid fixture"),
        );
        assert_eq!(
            engine.evaluate_in("has(config, 'retries')", &scope).unwrap(),
            Value::boolean(true)
        );
        assert_eq!(
            engine.evaluate_in("has(config, 'timeout')", &scope).unwrap(),
            Value::boolean(false)
        );
        assert!(engine.evaluate("has([1], 'x')").is_err());
    }
}
