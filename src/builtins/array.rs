//! Array functions, including the re-entrant higher-order set
//!
//! The higher-order functions (filter, map, some, find, reduce, sort,
//! unique, sum, avg) take a sub-formula string and evaluate it once per
//! element through [`CallContext::evaluate`], binding the element under
//! `_item_`, its position under `_index_`, and (for reduce) the accumulator
//! under `_curr_`. Optional trailing string arguments rename those bindings
//! when they would collide with host variables. Each nested call owns its
//! own cursor and merged environment, so nesting a filter inside a map
//! inside a reduce is plain recursion.

use super::{
    array_arg, check_arg_count, check_min_arg_count, optional_text_arg, text_arg,
    ACCUMULATOR_BINDING, INDEX_BINDING, ITEM_BINDING,
};
use crate::context::CallContext;
use crate::core::error::{ExpressionError, ExpressionResult};
use crate::core::value::Value;
use std::cmp::Ordering;

/// Element ordering for sort: numbers and strings order naturally,
/// `false < true`; anything else compares as equal
fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Evaluate a per-element sub-formula with item/index bindings
fn eval_for_item(
    ctx: &CallContext<'_>,
    formula: &str,
    item: &Value,
    index: usize,
    item_key: &str,
    index_key: &str,
) -> ExpressionResult<Value> {
    let variables = ctx.nested_variables([
        (item_key.to_string(), item.clone()),
        (index_key.to_string(), Value::number(index as f64)),
    ]);
    ctx.evaluate(formula, variables)
}

/// Sum of an array's numbers, or of a per-element sub-formula
pub fn sum(ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("sum", args, 1)?;
    let items = array_arg("sum", args, 0)?;
    let formula = optional_text_arg("sum", args, 1)?;
    let item_key = optional_text_arg("sum", args, 2)?.unwrap_or(ITEM_BINDING);
    let index_key = optional_text_arg("sum", args, 3)?.unwrap_or(INDEX_BINDING);

    let mut total = 0.0;
    for (index, item) in items.iter().enumerate() {
        let value = match formula {
            Some(formula) => eval_for_item(ctx, formula, item, index, item_key, index_key)?,
            None => item.clone(),
        };
        total += value
            .as_number()
            .ok_or_else(|| ExpressionError::type_error("number", value.kind_name()))?;
    }
    Ok(Value::number(total))
}

/// Arithmetic mean of an array's numbers, or of a per-element sub-formula
pub fn avg(ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("avg", args, 1)?;
    let items = array_arg("avg", args, 0)?;
    if items.is_empty() {
        return Err(ExpressionError::invalid_argument("avg", "array is empty"));
    }
    let total = sum(ctx, args)?;
    let total = total
        .as_number()
        .ok_or_else(|| ExpressionError::type_error("number", total.kind_name()))?;
    Ok(Value::number(total / items.len() as f64))
}

/// Join an array's elements into a string with a separator
pub fn join(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("join", args, 2)?;
    let items = array_arg("join", args, 0)?;
    let separator = text_arg("join", args, 1)?;

    let joined = items
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(separator);
    Ok(Value::text(joined))
}

/// Keep the elements whose sub-formula evaluates to exactly `true`
pub fn filter(ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("filter", args, 2)?;
    let items = array_arg("filter", args, 0)?;
    let formula = text_arg("filter", args, 1)?;
    let item_key = optional_text_arg("filter", args, 2)?.unwrap_or(ITEM_BINDING);
    let index_key = optional_text_arg("filter", args, 3)?.unwrap_or(INDEX_BINDING);

    let mut kept = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let result = eval_for_item(ctx, formula, item, index, item_key, index_key)?;
        if result == Value::Bool(true) {
            kept.push(item.clone());
        }
    }
    Ok(Value::Array(kept))
}

/// Transform every element through a sub-formula
pub fn map(ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("map", args, 2)?;
    let items = array_arg("map", args, 0)?;
    let formula = text_arg("map", args, 1)?;
    let item_key = optional_text_arg("map", args, 2)?.unwrap_or(ITEM_BINDING);
    let index_key = optional_text_arg("map", args, 3)?.unwrap_or(INDEX_BINDING);

    let mut mapped = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        mapped.push(eval_for_item(ctx, formula, item, index, item_key, index_key)?);
    }
    Ok(Value::Array(mapped))
}

/// Whether any element's sub-formula evaluates truthy
pub fn some(ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("some", args, 2)?;
    let items = array_arg("some", args, 0)?;
    let formula = text_arg("some", args, 1)?;
    let item_key = optional_text_arg("some", args, 2)?.unwrap_or(ITEM_BINDING);
    let index_key = optional_text_arg("some", args, 3)?.unwrap_or(INDEX_BINDING);

    for (index, item) in items.iter().enumerate() {
        if eval_for_item(ctx, formula, item, index, item_key, index_key)?.is_truthy() {
            return Ok(Value::boolean(true));
        }
    }
    Ok(Value::boolean(false))
}

/// First element whose sub-formula evaluates truthy.
///
/// Fails when nothing matches: the value model has no null to return.
pub fn find(ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("find", args, 2)?;
    let items = array_arg("find", args, 0)?;
    let formula = text_arg("find", args, 1)?;
    let item_key = optional_text_arg("find", args, 2)?.unwrap_or(ITEM_BINDING);
    let index_key = optional_text_arg("find", args, 3)?.unwrap_or(INDEX_BINDING);

    for (index, item) in items.iter().enumerate() {
        if eval_for_item(ctx, formula, item, index, item_key, index_key)?.is_truthy() {
            return Ok(item.clone());
        }
    }
    Err(ExpressionError::invalid_argument(
        "find",
        "no element matched",
    ))
}

/// Fold an array through a sub-formula, starting from an initial
/// accumulator bound under `_curr_`
pub fn reduce(ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("reduce", args, 3)?;
    let items = array_arg("reduce", args, 0)?;
    let formula = text_arg("reduce", args, 1)?;
    let mut accumulator = args[2].clone();
    let curr_key = optional_text_arg("reduce", args, 3)?.unwrap_or(ACCUMULATOR_BINDING);
    let item_key = optional_text_arg("reduce", args, 4)?.unwrap_or(ITEM_BINDING);
    let index_key = optional_text_arg("reduce", args, 5)?.unwrap_or(INDEX_BINDING);

    for (index, item) in items.iter().enumerate() {
        let variables = ctx.nested_variables([
            (curr_key.to_string(), accumulator),
            (item_key.to_string(), item.clone()),
            (index_key.to_string(), Value::number(index as f64)),
        ]);
        accumulator = ctx.evaluate(formula, variables)?;
    }
    Ok(accumulator)
}

/// Sort an array, either by natural element order or by a per-element
/// key sub-formula
pub fn sort(ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("sort", args, 1)?;
    let items = array_arg("sort", args, 0)?;
    let formula = optional_text_arg("sort", args, 1)?;
    let item_key = optional_text_arg("sort", args, 2)?.unwrap_or(ITEM_BINDING);
    let index_key = optional_text_arg("sort", args, 3)?.unwrap_or(INDEX_BINDING);

    match formula {
        None => {
            let mut sorted = items.to_vec();
            sorted.sort_by(compare);
            Ok(Value::Array(sorted))
        }
        Some(formula) => {
            let mut keyed = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let key = eval_for_item(ctx, formula, item, index, item_key, index_key)?;
                keyed.push((key, item.clone()));
            }
            keyed.sort_by(|(a, _), (b, _)| compare(a, b));
            Ok(Value::Array(keyed.into_iter().map(|(_, item)| item).collect()))
        }
    }
}

/// Drop duplicate elements, keeping first occurrences; an optional
/// sub-formula computes the deduplication key
pub fn unique(ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_min_arg_count("unique", args, 1)?;
    let items = array_arg("unique", args, 0)?;
    let formula = optional_text_arg("unique", args, 1)?;
    let item_key = optional_text_arg("unique", args, 2)?.unwrap_or(ITEM_BINDING);
    let index_key = optional_text_arg("unique", args, 3)?.unwrap_or(INDEX_BINDING);

    let mut seen: Vec<Value> = Vec::new();
    let mut result = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let key = match formula {
            Some(formula) => eval_for_item(ctx, formula, item, index, item_key, index_key)?,
            None => item.clone(),
        };
        if !seen.contains(&key) {
            seen.push(key);
            result.push(item.clone());
        }
    }
    Ok(Value::Array(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Scope;
    use crate::ExpressionEngine;

    fn products() -> Value {
        serde_json::from_str(r#"[{"price": 150}, {"price": 80}, {"price": 210}]"#)
            .expect("valid fixture")
    }

    #[test]
    fn test_sum_and_avg() {
        let engine = ExpressionEngine::new();
        assert_eq!(
            engine.evaluate("sum([1, 2, 3])").unwrap(),
            Value::number(6.0)
        );
        assert_eq!(
            engine.evaluate("avg([1, 2, 3])").unwrap(),
            Value::number(2.0)
        );
        assert!(engine.evaluate("avg([])").is_err());
    }

    #[test]
    fn test_sum_with_sub_formula() {
        let engine = ExpressionEngine::new();
        let scope = Scope::new().variable("products", products());
        let result = engine
            .evaluate_in("sum(products, '_item_.price')", &scope)
            .unwrap();
        assert_eq!(result, Value::number(440.0));
    }

    #[test]
    fn test_join() {
        let engine = ExpressionEngine::new();
        assert_eq!(
            engine.evaluate("join(['a', 'b'], '-')").unwrap(),
            Value::text("a-b")
        );
        assert_eq!(
            engine.evaluate("join([1, 2.5], ',')").unwrap(),
            Value::text("1,2.5")
        );
    }

    #[test]
    fn test_filter_binds_item() {
        let engine = ExpressionEngine::new();
        let scope = Scope::new().variable("products", products());
        let result = engine
            .evaluate_in(r#"filter(products, "_item_.price > 100")"#, &scope)
            .unwrap();
        let kept = result.as_array().unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(
            kept[0].as_object().unwrap()["price"],
            Value::number(150.0)
        );
    }

    #[test]
    fn test_filter_binds_index() {
        let engine = ExpressionEngine::new();
        let result = engine
            .evaluate(r#"filter([10, 20, 30], "_index_ > 0")"#)
            .unwrap();
        assert_eq!(
            result,
            Value::array(vec![Value::number(20.0), Value::number(30.0)])
        );
    }

    #[test]
    fn test_filter_with_renamed_binding() {
        let engine = ExpressionEngine::new();
        // A host variable named _item_ stays visible under the renamed key
        let scope = Scope::new().variable("_item_", Value::number(99.0));
        let result = engine
            .evaluate_in(r#"filter([1, 200], "_el_ > _item_", '_el_')"#, &scope)
            .unwrap();
        assert_eq!(result, Value::array(vec![Value::number(200.0)]));
    }

    #[test]
    fn test_map() {
        let engine = ExpressionEngine::new();
        let result = engine.evaluate(r#"map([1, 2, 3], "_item_ * 2")"#).unwrap();
        assert_eq!(
            result,
            Value::array(vec![
                Value::number(2.0),
                Value::number(4.0),
                Value::number(6.0)
            ])
        );
    }

    #[test]
    fn test_some_and_find() {
        let engine = ExpressionEngine::new();
        let scope = Scope::new().variable("products", products());
        assert_eq!(
            engine
                .evaluate_in(r#"some(products, "_item_.price > 200")"#, &scope)
                .unwrap(),
            Value::boolean(true)
        );
        let found = engine
            .evaluate_in(r#"find(products, "_item_.price < 100")"#, &scope)
            .unwrap();
        assert_eq!(found.as_object().unwrap()["price"], Value::number(80.0));
        assert!(engine
            .evaluate_in(r#"find(products, "_item_.price > 1000")"#, &scope)
            .is_err());
    }

    #[test]
    fn test_reduce() {
        let engine = ExpressionEngine::new();
        let result = engine
            .evaluate(r#"reduce([1, 2, 3, 4], "_curr_ + _item_", 0)"#)
            .unwrap();
        assert_eq!(result, Value::number(10.0));
    }

    #[test]
    fn test_sort_natural_and_by_key() {
        let engine = ExpressionEngine::new();
        assert_eq!(
            engine.evaluate("sort([3, 1, 2])").unwrap(),
            Value::array(vec![
                Value::number(1.0),
                Value::number(2.0),
                Value::number(3.0)
            ])
        );

        let scope = Scope::new().variable("products", products());
        let sorted = engine
            .evaluate_in(r#"sort(products, "_item_.price")"#, &scope)
            .unwrap();
        let prices: Vec<_> = sorted
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_object().unwrap()["price"].clone())
            .collect();
        assert_eq!(
            prices,
            vec![
                Value::number(80.0),
                Value::number(150.0),
                Value::number(210.0)
            ]
        );
    }

    #[test]
    fn test_unique() {
        let engine = ExpressionEngine::new();
        assert_eq!(
            engine.evaluate("unique([1, 2, 1, 3, 2])").unwrap(),
            Value::array(vec![
                Value::number(1.0),
                Value::number(2.0),
                Value::number(3.0)
            ])
        );

        let scope = Scope::new().variable("products", products());
        let result = engine
            .evaluate_in(r#"unique(products, "_item_.price > 100")"#, &scope)
            .unwrap();
        // Keys true/false: first representative of each is kept
        assert_eq!(result.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_nested_higher_order_calls() {
        let engine = ExpressionEngine::new();
        let scope = Scope::new().variable(
            "groups",
            serde_json::from_str(r#"[{"items": [1, 200]}, {"items": [300, 4]}]"#)
                .expect("valid fixture"),
        );
        // A filter inside a map: each nested call owns its own environment
        let result = engine
            .evaluate_in(
                r#"map(groups, "length(filter(_item_.items, '_item_ > 100'))")"#,
                &scope,
            )
            .unwrap();
        assert_eq!(
            result,
            Value::array(vec![Value::number(1.0), Value::number(1.0)])
        );
    }
}
