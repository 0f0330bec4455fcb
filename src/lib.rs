//! Embeddable expression evaluation engine.
//!
//! Formulas are tokenized with a single composed regular expression and
//! evaluated in one recursive-descent pass; no syntax tree is built and no
//! results are cached. Values are dynamically typed (numbers, strings,
//! booleans, arrays, objects) and round-trip through JSON via serde. Hosts
//! extend the engine by registering variables, functions, and operators,
//! either on the engine itself or per call through a [`Scope`].
//!
//! ```
//! use formula_engine::{ExpressionEngine, Scope, Value};
//!
//! let engine = ExpressionEngine::new();
//! assert_eq!(engine.evaluate("5 + 4 * 4").unwrap(), Value::number(21.0));
//!
//! let scope = Scope::new().variable("price", Value::number(150.0));
//! let result = engine.evaluate_in("if(price > 100, 'premium', 'standard')", &scope);
//! assert_eq!(result.unwrap(), Value::text("premium"));
//! ```
//!
//! Registered functions receive a [`CallContext`] and may re-enter the
//! engine, which is how the higher-order builtins (`filter`, `map`,
//! `reduce`, ...) evaluate their sub-formulas:
//!
//! ```
//! use formula_engine::{ExpressionEngine, Scope, Value};
//!
//! let engine = ExpressionEngine::new();
//! let scope = Scope::new().variable(
//!     "products",
//!     serde_json::from_str(r#"[{"price": 150}, {"price": 80}]"#).unwrap(),
//! );
//! let expensive = engine
//!     .evaluate_in(r#"filter(products, "_item_.price > 100")"#, &scope)
//!     .unwrap();
//! assert_eq!(expensive.as_array().unwrap().len(), 1);
//! ```

pub mod builtins;
pub mod context;
pub mod core;
pub mod engine;
pub mod lexer;
pub mod parser;

pub use context::{
    CallContext, Environment, FunctionFn, Functions, OperatorFn, Operators, Scope, Variables,
};
pub use core::error::{ExpressionError, ExpressionResult};
pub use core::value::{Value, ValueMap};
pub use engine::{ExpressionEngine, ExpressionEngineBuilder};
pub use lexer::Lexer;

/// Commonly used types, importable in one line
pub mod prelude {
    pub use crate::context::{CallContext, Scope};
    pub use crate::core::error::{ExpressionError, ExpressionResult};
    pub use crate::core::value::{Value, ValueMap};
    pub use crate::engine::{ExpressionEngine, ExpressionEngineBuilder};
}
