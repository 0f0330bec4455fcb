//! Evaluation environment and the host-function calling contract
//!
//! An [`Environment`] is the merged view of variables, functions, and
//! operators visible during one evaluation call: the engine's base registry
//! with a caller-supplied [`Scope`] layered on top (override wins, shallow).
//! It is built fresh on every `evaluate` invocation and discarded after the
//! call returns; nothing mutates it mid-call.
//!
//! A [`CallContext`] is handed to every registered function as its first
//! argument. It exposes the merged variable map and is the only channel by
//! which a host function can trigger nested evaluation.

use crate::core::error::ExpressionResult;
use crate::core::value::Value;
use crate::engine::ExpressionEngine;
use std::collections::HashMap;

/// Variable mapping: name to value
pub type Variables = HashMap<String, Value>;

/// A registered function: receives the call context and the argument
/// values, already evaluated left to right
pub type FunctionFn = fn(&CallContext<'_>, &[Value]) -> ExpressionResult<Value>;

/// A registered binary operator: `(left, right) -> value`
pub type OperatorFn = fn(&Value, &Value) -> ExpressionResult<Value>;

/// Function mapping: name to callable
pub type Functions = HashMap<String, FunctionFn>;

/// Operator mapping: symbol or bare word to callable
pub type Operators = HashMap<String, OperatorFn>;

/// Per-call overrides layered onto the engine's base registry.
///
/// Overriding a name wins on collision; unrelated base entries remain
/// visible.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Variable overrides
    pub variables: Variables,
    /// Function overrides
    pub functions: Functions,
    /// Operator overrides
    pub operators: Operators,
}

impl Scope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope carrying only variable overrides
    pub fn with_variables(variables: Variables) -> Self {
        Self {
            variables,
            ..Self::default()
        }
    }

    /// Add a variable override
    pub fn variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Add a function override
    pub fn function(mut self, name: impl Into<String>, function: FunctionFn) -> Self {
        self.functions.insert(name.into(), function);
        self
    }

    /// Add an operator override
    pub fn operator(mut self, name: impl Into<String>, operator: OperatorFn) -> Self {
        self.operators.insert(name.into(), operator);
        self
    }
}

/// The merged environment visible during one evaluation call
#[derive(Debug)]
pub struct Environment {
    /// Merged variables
    pub variables: Variables,
    /// Merged functions
    pub functions: Functions,
    /// Merged operators
    pub operators: Operators,
}

impl Environment {
    /// Merge a base registry with per-call overrides; overrides win on
    /// key collision
    pub(crate) fn merged(
        variables: &Variables,
        functions: &Functions,
        operators: &Operators,
        scope: &Scope,
    ) -> Self {
        let mut merged_variables = variables.clone();
        merged_variables.extend(
            scope
                .variables
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );

        let mut merged_functions = functions.clone();
        merged_functions.extend(
            scope
                .functions
                .iter()
                .map(|(name, function)| (name.clone(), *function)),
        );

        let mut merged_operators = operators.clone();
        merged_operators.extend(
            scope
                .operators
                .iter()
                .map(|(name, operator)| (name.clone(), *operator)),
        );

        Self {
            variables: merged_variables,
            functions: merged_functions,
            operators: merged_operators,
        }
    }
}

/// Call context handed to every registered function
pub struct CallContext<'a> {
    engine: &'a ExpressionEngine,
    variables: &'a Variables,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(engine: &'a ExpressionEngine, variables: &'a Variables) -> Self {
        Self { engine, variables }
    }

    /// The variable mapping active at the call site
    pub fn variables(&self) -> &Variables {
        self.variables
    }

    /// The call-site variables extended with the given bindings, for
    /// constructing a nested evaluation scope
    pub fn nested_variables(
        &self,
        bindings: impl IntoIterator<Item = (String, Value)>,
    ) -> Variables {
        let mut variables = self.variables.clone();
        variables.extend(bindings);
        variables
    }

    /// Re-enter the engine with a sub-formula and a variable override map.
    ///
    /// The nested call owns its own cursor and merged environment; failures
    /// propagate to the enclosing evaluation.
    pub fn evaluate(&self, formula: &str, variables: Variables) -> ExpressionResult<Value> {
        self.engine
            .evaluate_in(formula, &Scope::with_variables(variables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_override_wins() {
        let mut base = Variables::new();
        base.insert("x".to_string(), Value::number(1.0));
        base.insert("y".to_string(), Value::number(2.0));

        let scope = Scope::new().variable("x", Value::number(10.0));
        let env = Environment::merged(&base, &Functions::new(), &Operators::new(), &scope);

        assert_eq!(env.variables["x"], Value::number(10.0));
        assert_eq!(env.variables["y"], Value::number(2.0));
    }

    #[test]
    fn test_merged_does_not_touch_base() {
        let mut base = Variables::new();
        base.insert("x".to_string(), Value::number(1.0));

        let scope = Scope::new().variable("x", Value::number(10.0));
        let _env = Environment::merged(&base, &Functions::new(), &Operators::new(), &scope);

        assert_eq!(base["x"], Value::number(1.0));
    }
}
