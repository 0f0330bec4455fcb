//! Default function and operator library
//!
//! Everything here is registered through the same contract a host uses:
//! ordinary [`FunctionFn`] and [`OperatorFn`] entries in the base registry.
//! Nothing in the tokenizer or parser knows these names specially.

pub mod array;
pub mod conversion;
#[cfg(feature = "datetime")]
pub mod datetime;
pub mod math;
pub mod object;
pub mod operators;
pub mod string;
pub mod util;

use crate::context::{FunctionFn, Functions, Operators, Variables};
use crate::core::error::{ExpressionError, ExpressionResult};
use crate::core::value::{Value, ValueMap};

/// Conventional binding key for the current element in higher-order
/// function sub-expressions
pub const ITEM_BINDING: &str = "_item_";
/// Conventional binding key for the current position
pub const INDEX_BINDING: &str = "_index_";
/// Conventional binding key for the reduce accumulator
pub const ACCUMULATOR_BINDING: &str = "_curr_";

/// Variables every engine starts with
pub fn default_variables() -> Variables {
    let mut variables = Variables::new();
    variables.insert("pi".to_string(), Value::number(std::f64::consts::PI));
    variables
}

/// The default function library
pub fn default_functions() -> Functions {
    let mut functions = Functions::new();
    register_util_functions(&mut functions);
    register_math_functions(&mut functions);
    register_string_functions(&mut functions);
    register_array_functions(&mut functions);
    register_object_functions(&mut functions);
    register_conversion_functions(&mut functions);
    #[cfg(feature = "datetime")]
    register_datetime_functions(&mut functions);
    functions
}

/// The default operator table
pub fn default_operators() -> Operators {
    operators::default_operators()
}

fn register_util_functions(functions: &mut Functions) {
    functions.insert("is_string".to_string(), util::is_string as FunctionFn);
    functions.insert("is_boolean".to_string(), util::is_boolean as FunctionFn);
    functions.insert("is_array".to_string(), util::is_array as FunctionFn);
    functions.insert("is_object".to_string(), util::is_object as FunctionFn);
    functions.insert("is_number".to_string(), util::is_number as FunctionFn);
    functions.insert("if".to_string(), util::if_else as FunctionFn);
    functions.insert("length".to_string(), util::length as FunctionFn);
    functions.insert("includes".to_string(), util::includes as FunctionFn);
}

fn register_math_functions(functions: &mut Functions) {
    functions.insert("ceil".to_string(), math::ceil as FunctionFn);
    functions.insert("floor".to_string(), math::floor as FunctionFn);
    functions.insert("round".to_string(), math::round as FunctionFn);
    functions.insert("abs".to_string(), math::abs as FunctionFn);
    functions.insert("random".to_string(), math::random as FunctionFn);
    functions.insert("min".to_string(), math::min as FunctionFn);
    functions.insert("max".to_string(), math::max as FunctionFn);
}

fn register_string_functions(functions: &mut Functions) {
    functions.insert("split".to_string(), string::split as FunctionFn);
    functions.insert("upper".to_string(), string::upper as FunctionFn);
    functions.insert("lower".to_string(), string::lower as FunctionFn);
    functions.insert("regex".to_string(), string::regex_test as FunctionFn);
}

fn register_array_functions(functions: &mut Functions) {
    functions.insert("sum".to_string(), array::sum as FunctionFn);
    functions.insert("avg".to_string(), array::avg as FunctionFn);
    functions.insert("join".to_string(), array::join as FunctionFn);
    functions.insert("filter".to_string(), array::filter as FunctionFn);
    functions.insert("map".to_string(), array::map as FunctionFn);
    functions.insert("some".to_string(), array::some as FunctionFn);
    functions.insert("find".to_string(), array::find as FunctionFn);
    functions.insert("reduce".to_string(), array::reduce as FunctionFn);
    functions.insert("sort".to_string(), array::sort as FunctionFn);
    functions.insert("unique".to_string(), array::unique as FunctionFn);
}

fn register_object_functions(functions: &mut Functions) {
    functions.insert("keys".to_string(), object::keys as FunctionFn);
    functions.insert("values".to_string(), object::values as FunctionFn);
    functions.insert("has".to_string(), object::has as FunctionFn);
}

fn register_conversion_functions(functions: &mut Functions) {
    functions.insert("to_string".to_string(), conversion::to_string as FunctionFn);
    functions.insert("to_number".to_string(), conversion::to_number as FunctionFn);
    functions.insert(
        "to_boolean".to_string(),
        conversion::to_boolean as FunctionFn,
    );
    functions.insert("to_json".to_string(), conversion::to_json as FunctionFn);
    functions.insert("parse_json".to_string(), conversion::parse_json as FunctionFn);
}

#[cfg(feature = "datetime")]
fn register_datetime_functions(functions: &mut Functions) {
    functions.insert("now".to_string(), datetime::now as FunctionFn);
    functions.insert("date_add".to_string(), datetime::date_add as FunctionFn);
    functions.insert(
        "date_subtract".to_string(),
        datetime::date_subtract as FunctionFn,
    );
    functions.insert("date_diff".to_string(), datetime::date_diff as FunctionFn);
    functions.insert("date_year".to_string(), datetime::date_year as FunctionFn);
    functions.insert("date_month".to_string(), datetime::date_month as FunctionFn);
    functions.insert("date_day".to_string(), datetime::date_day as FunctionFn);
    functions.insert(
        "format_date".to_string(),
        datetime::format_date as FunctionFn,
    );
    functions.insert("parse_date".to_string(), datetime::parse_date as FunctionFn);
}

// Argument helpers shared by the builtin modules

pub(crate) fn check_arg_count(
    func_name: &str,
    args: &[Value],
    expected: usize,
) -> ExpressionResult<()> {
    if args.len() != expected {
        Err(ExpressionError::invalid_argument(
            func_name,
            format!("expected {} arguments, got {}", expected, args.len()),
        ))
    } else {
        Ok(())
    }
}

pub(crate) fn check_min_arg_count(
    func_name: &str,
    args: &[Value],
    min: usize,
) -> ExpressionResult<()> {
    if args.len() < min {
        Err(ExpressionError::invalid_argument(
            func_name,
            format!("expected at least {} arguments, got {}", min, args.len()),
        ))
    } else {
        Ok(())
    }
}

pub(crate) fn number_arg(func_name: &str, args: &[Value], index: usize) -> ExpressionResult<f64> {
    args.get(index).and_then(Value::as_number).ok_or_else(|| {
        ExpressionError::invalid_argument(func_name, format!("argument {} must be a number", index + 1))
    })
}

pub(crate) fn text_arg<'v>(
    func_name: &str,
    args: &'v [Value],
    index: usize,
) -> ExpressionResult<&'v str> {
    args.get(index).and_then(Value::as_str).ok_or_else(|| {
        ExpressionError::invalid_argument(func_name, format!("argument {} must be a string", index + 1))
    })
}

pub(crate) fn array_arg<'v>(
    func_name: &str,
    args: &'v [Value],
    index: usize,
) -> ExpressionResult<&'v [Value]> {
    args.get(index).and_then(Value::as_array).ok_or_else(|| {
        ExpressionError::invalid_argument(func_name, format!("argument {} must be an array", index + 1))
    })
}

pub(crate) fn object_arg<'v>(
    func_name: &str,
    args: &'v [Value],
    index: usize,
) -> ExpressionResult<&'v ValueMap> {
    args.get(index).and_then(Value::as_object).ok_or_else(|| {
        ExpressionError::invalid_argument(func_name, format!("argument {} must be an object", index + 1))
    })
}

/// A trailing optional string argument, used for binding-key renames
pub(crate) fn optional_text_arg<'v>(
    func_name: &str,
    args: &'v [Value],
    index: usize,
) -> ExpressionResult<Option<&'v str>> {
    match args.get(index) {
        None => Ok(None),
        Some(Value::Text(text)) => Ok(Some(text.as_str())),
        Some(other) => Err(ExpressionError::invalid_argument(
            func_name,
            format!(
                "argument {} must be a string, got {}",
                index + 1,
                other.kind_name()
            ),
        )),
    }
}
