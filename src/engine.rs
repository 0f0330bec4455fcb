//! Expression engine: base registry and evaluation entry point
//!
//! The engine owns the base registry of variables, functions, and operators.
//! Registration is configuration (`&mut self`, before concurrent use);
//! evaluation is `&self` and never mutates the registry, so independent
//! evaluations may run concurrently against a shared engine. Every
//! `evaluate` call re-tokenizes and re-parses the formula; no AST or cache
//! is kept.

use crate::builtins;
use crate::context::{Environment, Functions, Operators, Scope, Variables};
use crate::core::error::ExpressionResult;
use crate::core::value::Value;
use crate::lexer::Lexer;
use crate::parser::Parser;
use tracing::{debug, trace};

/// Expression engine holding the base registry
pub struct ExpressionEngine {
    lexer: Lexer,
    variables: Variables,
    functions: Functions,
    operators: Operators,
    uppercase_word_operators: bool,
}

impl ExpressionEngine {
    /// Create an engine with the default variables (`pi`), operators, and
    /// builtin function library
    pub fn new() -> Self {
        ExpressionEngineBuilder::new()
            .build()
            .expect("default engine configuration is valid")
    }

    /// Create a builder for configuring an engine
    pub fn builder() -> ExpressionEngineBuilder {
        ExpressionEngineBuilder::new()
    }

    /// Merge functions into the base registry; existing entries with other
    /// names are kept
    pub fn set_functions(&mut self, functions: Functions) {
        debug!(count = functions.len(), "registering functions");
        self.functions.extend(functions);
    }

    /// Merge operators into the base registry; existing entries with other
    /// names are kept
    pub fn set_operators(&mut self, operators: Operators) {
        debug!(count = operators.len(), "registering operators");
        for (name, operator) in operators {
            if self.uppercase_word_operators && name.chars().all(char::is_alphabetic) {
                self.operators.insert(name.to_uppercase(), operator);
            }
            self.operators.insert(name, operator);
        }
    }

    /// Evaluate a formula against the base registry
    pub fn evaluate(&self, formula: &str) -> ExpressionResult<Value> {
        self.evaluate_in(formula, &Scope::new())
    }

    /// Evaluate a formula with per-call overrides layered onto the base
    /// registry.
    ///
    /// Steps: merge the scope onto the base (override wins, shallow),
    /// tokenize, parse one expression from a fresh cursor, and fail if any
    /// token remains unconsumed. The base registry is never mutated.
    pub fn evaluate_in(&self, formula: &str, scope: &Scope) -> ExpressionResult<Value> {
        trace!(formula, "evaluating expression");

        let env = Environment::merged(&self.variables, &self.functions, &self.operators, scope);
        let tokens = self.lexer.tokenize(formula);
        let mut parser = Parser::new(tokens, &env, self);
        let value = parser.parse()?;

        trace!(result = %value, "expression evaluated");
        Ok(value)
    }
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring an [`ExpressionEngine`]
#[derive(Debug, Default)]
pub struct ExpressionEngineBuilder {
    variables: Variables,
    extra_pattern: Option<String>,
    uppercase_word_operators: bool,
}

impl ExpressionEngineBuilder {
    /// Create a builder with no overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a variable into the base registry
    pub fn variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Seed variables into the base registry
    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables.extend(variables);
        self
    }

    /// Extend the tokenizer with an extra alternative pattern for custom
    /// literal shapes
    pub fn extra_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.extra_pattern = Some(pattern.into());
        self
    }

    /// Also accept word operators in uppercase (`AND`/`OR` alongside
    /// `and`/`or`)
    pub fn uppercase_word_operators(mut self, enabled: bool) -> Self {
        self.uppercase_word_operators = enabled;
        self
    }

    /// Build the engine.
    ///
    /// Fails only when the extra tokenizer pattern does not compile.
    pub fn build(self) -> ExpressionResult<ExpressionEngine> {
        let lexer = Lexer::with_extra_pattern(self.extra_pattern.as_deref())?;

        let mut variables = builtins::default_variables();
        variables.extend(self.variables);

        let mut engine = ExpressionEngine {
            lexer,
            variables,
            functions: Functions::new(),
            operators: Operators::new(),
            uppercase_word_operators: self.uppercase_word_operators,
        };
        engine.set_functions(builtins::default_functions());
        engine.set_operators(builtins::default_operators());

        debug!(
            functions = engine.functions.len(),
            operators = engine.operators.len(),
            "expression engine built"
        );
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CallContext;
    use crate::core::error::ExpressionError;

    #[test]
    fn test_evaluate_literal() {
        let engine = ExpressionEngine::new();
        let result = engine.evaluate("42").unwrap();
        assert_eq!(result.as_number(), Some(42.0));
    }

    #[test]
    fn test_pi_is_seeded() {
        let engine = ExpressionEngine::new();
        let result = engine.evaluate("pi").unwrap();
        assert_eq!(result.as_number(), Some(std::f64::consts::PI));
    }

    #[test]
    fn test_seeded_variable() {
        let engine = ExpressionEngine::builder()
            .variable("offset", Value::number(10.0))
            .build()
            .unwrap();
        let result = engine.evaluate("offset + 1").unwrap();
        assert_eq!(result.as_number(), Some(11.0));
    }

    #[test]
    fn test_scope_override_wins_without_removing_base() {
        let engine = ExpressionEngine::builder()
            .variable("a", Value::number(1.0))
            .variable("b", Value::number(2.0))
            .build()
            .unwrap();

        let scope = Scope::new().variable("a", Value::number(100.0));
        let result = engine.evaluate_in("a + b", &scope).unwrap();
        assert_eq!(result.as_number(), Some(102.0));
    }

    #[test]
    fn test_evaluation_does_not_mutate_base_registry() {
        let engine = ExpressionEngine::builder()
            .variable("a", Value::number(1.0))
            .build()
            .unwrap();

        let scope = Scope::new().variable("a", Value::number(100.0));
        engine.evaluate_in("a", &scope).unwrap();

        let result = engine.evaluate("a").unwrap();
        assert_eq!(result.as_number(), Some(1.0));
    }

    #[test]
    fn test_custom_function_registration() {
        fn double(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
            let n = args[0].as_number().unwrap_or(0.0);
            Ok(Value::number(n * 2.0))
        }

        let mut engine = ExpressionEngine::new();
        let mut functions = Functions::new();
        functions.insert("double".to_string(), double as crate::context::FunctionFn);
        engine.set_functions(functions);

        let result = engine.evaluate("double(21)").unwrap();
        assert_eq!(result.as_number(), Some(42.0));
    }

    #[test]
    fn test_custom_operator_registration() {
        fn spaceship(left: &Value, right: &Value) -> ExpressionResult<Value> {
            let l = left.as_number().unwrap_or(0.0);
            let r = right.as_number().unwrap_or(0.0);
            Ok(Value::number(if l < r {
                -1.0
            } else if l > r {
                1.0
            } else {
                0.0
            }))
        }

        let mut engine = ExpressionEngine::new();
        let mut operators = Operators::new();
        operators.insert("<=>".to_string(), spaceship as crate::context::OperatorFn);
        engine.set_operators(operators);

        // "<=>" tokenizes as "<=" then ">", so register a word form too
        let mut word = Operators::new();
        word.insert("cmp".to_string(), spaceship as crate::context::OperatorFn);
        engine.set_operators(word);
        let result = engine.evaluate("1 cmp 2").unwrap();
        assert_eq!(result.as_number(), Some(-1.0));
    }

    #[test]
    fn test_uppercase_word_operators_flag() {
        let engine = ExpressionEngine::builder()
            .uppercase_word_operators(true)
            .build()
            .unwrap();
        let result = engine.evaluate("true AND false").unwrap();
        assert_eq!(result.as_bool(), Some(false));

        let default_engine = ExpressionEngine::new();
        assert!(matches!(
            default_engine.evaluate("true AND false"),
            Err(ExpressionError::InvalidExpression(_))
        ));
    }

    #[test]
    fn test_extra_pattern_reaches_parser() {
        // A host-specific literal shape becomes a token; a variable with
        // that exact name makes it resolvable.
        let engine = ExpressionEngine::builder()
            .extra_pattern("#\\w+")
            .variable("#tag", Value::text("marker"))
            .build()
            .unwrap();
        let result = engine.evaluate("#tag").unwrap();
        assert_eq!(result.as_str(), Some("marker"));
    }

    #[test]
    fn test_trailing_tokens_fail() {
        let engine = ExpressionEngine::new();
        assert!(matches!(
            engine.evaluate("2 + 3 4"),
            Err(ExpressionError::InvalidExpression(_))
        ));
    }

    #[test]
    fn test_idempotent_evaluation() {
        let engine = ExpressionEngine::builder()
            .variable("x", Value::number(5.0))
            .build()
            .unwrap();
        let first = engine.evaluate("x * 2 + 1").unwrap();
        let second = engine.evaluate("x * 2 + 1").unwrap();
        assert_eq!(first, second);
    }
}
