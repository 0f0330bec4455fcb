//! Recursive descent parser that evaluates as it parses
//!
//! The grammar, highest precedence first:
//!
//! 1. factor: parenthesized expression, literals (number, string, boolean,
//!    array, object), dotted path lookup, variable lookup, function call,
//!    prefix operator application
//! 2. unary factor: `!` negation, chainable
//! 3. term: left-associative `*` and `/`
//! 4. expression: left-associative application of any registered binary
//!    operator; all of them share one precedence level
//!
//! No syntax tree is retained: each parse function returns the evaluated
//! [`Value`] directly. The first grammar violation aborts the whole
//! evaluation.

use crate::context::{CallContext, Environment, FunctionFn, OperatorFn};
use crate::core::cursor::TokenCursor;
use crate::core::error::{ExpressionError, ExpressionResult};
use crate::core::value::{Value, ValueMap};
use crate::engine::ExpressionEngine;

/// One segment of a dotted/indexed variable path
enum PathPart<'t> {
    Key(&'t str),
    Index(usize),
}

/// Parser over one formula's token stream
pub struct Parser<'a> {
    cursor: TokenCursor<'a>,
    env: &'a Environment,
    engine: &'a ExpressionEngine,
}

impl<'a> Parser<'a> {
    /// Create a parser with a fresh cursor at position 0
    pub fn new(tokens: Vec<&'a str>, env: &'a Environment, engine: &'a ExpressionEngine) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            env,
            engine,
        }
    }

    /// Parse and evaluate exactly one expression.
    ///
    /// Tokens remaining after the expression are a hard error, which guards
    /// against malformed input like `2 + 3 4`.
    pub fn parse(&mut self) -> ExpressionResult<Value> {
        let value = self.parse_expression()?;

        if !self.cursor.is_exhausted() {
            return Err(ExpressionError::invalid_expression(
                "trailing tokens after expression",
            ));
        }

        Ok(value)
    }

    /// expression: term (operator term)*
    ///
    /// Every registered binary operator shares this single precedence
    /// level; application is strictly left to right.
    fn parse_expression(&mut self) -> ExpressionResult<Value> {
        let mut value = self.parse_term()?;

        while let Some(token) = self.cursor.current() {
            let Some(operator) = self.env.operators.get(token).copied() else {
                break;
            };
            self.cursor.advance();
            let term = self.parse_term()?;
            value = operator(&value, &term)?;
        }

        Ok(value)
    }

    /// term: unary-factor (('*' | '/') unary-factor)*
    fn parse_term(&mut self) -> ExpressionResult<Value> {
        let mut value = self.parse_unary_factor()?;

        loop {
            match self.cursor.current() {
                Some(token @ ("*" | "/")) => {
                    self.cursor.advance();
                    let factor = self.parse_unary_factor()?;
                    let left = self.number_operand(&value)?;
                    let right = self.number_operand(&factor)?;
                    value = if token == "*" {
                        Value::number(left * right)
                    } else {
                        Value::number(left / right)
                    };
                }
                _ => break,
            }
        }

        Ok(value)
    }

    /// unary-factor: '!'* factor
    fn parse_unary_factor(&mut self) -> ExpressionResult<Value> {
        if self.cursor.current() == Some("!") {
            self.cursor.advance();
            let factor = self.parse_unary_factor()?;
            return Ok(Value::boolean(!factor.is_truthy()));
        }

        self.parse_factor()
    }

    /// factor: the primary grammar
    fn parse_factor(&mut self) -> ExpressionResult<Value> {
        let Some(token) = self.cursor.current() else {
            return Err(ExpressionError::invalid_expression(
                "unexpected end of input",
            ));
        };

        if token == "(" {
            self.cursor.advance();
            let value = self.parse_expression()?;
            self.expect(")")?;
            return Ok(value);
        }

        // The leading-digit check keeps words like "inf" and "nan", which
        // f64::from_str would accept, resolving as identifiers instead.
        if token.starts_with(|c: char| c.is_ascii_digit()) {
            let number = token.parse::<f64>().map_err(|_| {
                ExpressionError::invalid_expression(format!("malformed number '{token}'"))
            })?;
            self.cursor.advance();
            return Ok(Value::number(number));
        }

        if let Some(text) = quoted_contents(token, '"').or_else(|| quoted_contents(token, '\'')) {
            self.cursor.advance();
            return Ok(Value::text(text));
        }

        if token == "true" || token == "false" {
            self.cursor.advance();
            return Ok(Value::boolean(token == "true"));
        }

        if token == "[" {
            return self.parse_array();
        }

        if token == "{" {
            self.cursor.advance();
            return self.parse_object();
        }

        // A dotted identifier resolves as a path lookup preferentially: a
        // variable literally named "a.b" is unreachable except by traversal.
        if token.contains('.') || token.contains('[') {
            let value = self.resolve_path(token)?;
            self.cursor.advance();
            return Ok(value);
        }

        if let Some(value) = self.env.variables.get(token) {
            let value = value.clone();
            self.cursor.advance();
            return Ok(value);
        }

        if let Some(function) = self.env.functions.get(token).copied() {
            return self.parse_function_call(token, function);
        }

        if let Some(operator) = self.env.operators.get(token).copied() {
            // Prefix use of a binary operator, applied as op(0, operand)
            self.cursor.advance();
            let factor = self.parse_factor()?;
            return operator(&Value::number(0.0), &factor);
        }

        Err(ExpressionError::unknown_identifier(token))
    }

    /// array literal: '[' (expression (',' expression)*)? ']'
    ///
    /// Separators are optional; a comma must be followed by another
    /// element.
    fn parse_array(&mut self) -> ExpressionResult<Value> {
        self.cursor.advance(); // past '['
        let mut elements = Vec::new();

        loop {
            match self.cursor.current() {
                None => {
                    return Err(ExpressionError::invalid_expression(
                        "unterminated array literal",
                    ));
                }
                Some("]") => break,
                Some(_) => {}
            }

            elements.push(self.parse_expression()?);

            if self.cursor.current() == Some(",") {
                self.cursor.advance();
                if matches!(self.cursor.current(), None | Some("]")) {
                    return Err(ExpressionError::invalid_expression(
                        "expected array element after ','",
                    ));
                }
            }
        }

        self.cursor.advance(); // past ']'
        Ok(Value::Array(elements))
    }

    /// object literal: '{' (entry (',' entry)*)? '}' where entry is
    /// `key ':' expression` (bare or quoted key) or `'...' identifier`
    ///
    /// Called with the cursor just past the opening brace. Spread merges
    /// the referenced object's entries at that point; later keys override
    /// earlier ones, including spread-introduced ones.
    fn parse_object(&mut self) -> ExpressionResult<Value> {
        let mut object = ValueMap::new();

        loop {
            let Some(token) = self.cursor.current() else {
                return Err(ExpressionError::invalid_expression(
                    "unterminated object literal",
                ));
            };

            if token == "}" {
                break;
            }

            if token == "..." {
                self.cursor.advance();
                let spread = self.parse_spread_source()?;
                object.extend(
                    spread
                        .iter()
                        .map(|(key, value)| (key.clone(), value.clone())),
                );
            } else {
                let key = quoted_contents(token, '"')
                    .or_else(|| quoted_contents(token, '\''))
                    .unwrap_or(token)
                    .to_string();
                self.cursor.advance();

                if self.cursor.current() != Some(":") {
                    return Err(ExpressionError::invalid_expression(
                        "invalid object literal: expected ':' after key",
                    ));
                }
                self.cursor.advance();

                let value = self.parse_expression()?;
                object.insert(key, value);
            }

            if self.cursor.current() == Some(",") {
                self.cursor.advance();
                if matches!(self.cursor.current(), None | Some("}")) {
                    return Err(ExpressionError::invalid_expression(
                        "expected object entry after ','",
                    ));
                }
            }
        }

        self.cursor.advance(); // past '}'
        Ok(Value::Object(object))
    }

    /// Resolve the identifier following a spread ellipsis to an object
    fn parse_spread_source(&mut self) -> ExpressionResult<ValueMap> {
        let Some(token) = self.cursor.current() else {
            return Err(ExpressionError::invalid_expression(
                "expected identifier after '...'",
            ));
        };

        let value = if token.contains('.') || token.contains('[') {
            self.resolve_path(token)?
        } else {
            self.env
                .variables
                .get(token)
                .cloned()
                .ok_or_else(|| ExpressionError::unknown_identifier(token))?
        };
        self.cursor.advance();

        match value {
            Value::Object(map) => Ok(map),
            other => Err(ExpressionError::type_error("object", other.kind_name())),
        }
    }

    /// function call: name '(' (expression (',' expression)*)? ')'
    ///
    /// Arguments are evaluated left to right before the function is
    /// invoked with the call context.
    fn parse_function_call(
        &mut self,
        name: &str,
        function: FunctionFn,
    ) -> ExpressionResult<Value> {
        self.cursor.advance(); // past the function name

        if self.cursor.current() != Some("(") {
            return Err(ExpressionError::invalid_expression(format!(
                "expected '(' after function '{name}'"
            )));
        }
        self.cursor.advance();

        let mut args = Vec::new();
        loop {
            match self.cursor.current() {
                None => {
                    return Err(ExpressionError::invalid_expression(format!(
                        "unterminated call to '{name}'"
                    )));
                }
                Some(")") => break,
                Some(_) => {}
            }

            args.push(self.parse_expression()?);

            if self.cursor.current() == Some(",") {
                self.cursor.advance();
                if matches!(self.cursor.current(), None | Some(")")) {
                    return Err(ExpressionError::invalid_expression(format!(
                        "expected argument after ',' in call to '{name}'"
                    )));
                }
            }
        }
        self.cursor.advance(); // past ')'

        let context = CallContext::new(self.engine, &self.env.variables);
        function(&context, &args)
    }

    /// Traverse a dotted/indexed path through the variable map.
    ///
    /// Numeric segments index arrays (`object.0.name`, `items[2]`); any
    /// missing key or non-traversable intermediate fails with
    /// `InvalidObjectPath`.
    fn resolve_path(&self, token: &str) -> ExpressionResult<Value> {
        let parts = parse_path(token)?;
        let mut iter = parts.iter();

        let Some(PathPart::Key(root)) = iter.next() else {
            return Err(ExpressionError::invalid_object_path(token));
        };
        let mut current = self
            .env
            .variables
            .get(*root)
            .ok_or_else(|| ExpressionError::invalid_object_path(token))?;

        for part in iter {
            current = match (current, part) {
                (Value::Object(map), PathPart::Key(key)) => map.get(*key),
                (Value::Object(map), PathPart::Index(index)) => map.get(&index.to_string()),
                (Value::Array(items), PathPart::Key(key)) => {
                    key.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                (Value::Array(items), PathPart::Index(index)) => items.get(*index),
                _ => None,
            }
            .ok_or_else(|| ExpressionError::invalid_object_path(token))?;
        }

        Ok(current.clone())
    }

    fn number_operand(&self, value: &Value) -> ExpressionResult<f64> {
        value
            .as_number()
            .ok_or_else(|| ExpressionError::type_error("number", value.kind_name()))
    }

    fn expect(&mut self, expected: &str) -> ExpressionResult<()> {
        if self.cursor.current() == Some(expected) {
            self.cursor.advance();
            Ok(())
        } else {
            Err(ExpressionError::invalid_expression(format!(
                "expected '{expected}'"
            )))
        }
    }
}

/// Strip matching quote marks, returning the verbatim contents
fn quoted_contents(token: &str, quote: char) -> Option<&str> {
    if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}

/// Split a path token into key and index segments
fn parse_path(token: &str) -> ExpressionResult<Vec<PathPart<'_>>> {
    let mut parts = Vec::new();

    for segment in token.split('.') {
        if segment.is_empty() {
            return Err(ExpressionError::invalid_object_path(token));
        }

        match segment.find('[') {
            None => parts.push(PathPart::Key(segment)),
            Some(0) => return Err(ExpressionError::invalid_object_path(token)),
            Some(bracket) => {
                let (head, mut tail) = segment.split_at(bracket);
                parts.push(PathPart::Key(head));

                while let Some(stripped) = tail.strip_prefix('[') {
                    let Some(end) = stripped.find(']') else {
                        return Err(ExpressionError::invalid_object_path(token));
                    };
                    let index = stripped[..end]
                        .parse::<usize>()
                        .map_err(|_| ExpressionError::invalid_object_path(token))?;
                    parts.push(PathPart::Index(index));
                    tail = &stripped[end + 1..];
                }

                if !tail.is_empty() {
                    return Err(ExpressionError::invalid_object_path(token));
                }
            }
        }
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_contents() {
        assert_eq!(quoted_contents(r#""ADI""#, '"'), Some("ADI"));
        assert_eq!(quoted_contents("'ADI'", '\''), Some("ADI"));
        assert_eq!(quoted_contents(r#""""#, '"'), Some(""));
        assert_eq!(quoted_contents("plain", '"'), None);
        assert_eq!(quoted_contents("\"", '"'), None);
    }

    #[test]
    fn test_parse_path_segments() {
        assert!(parse_path("a.b.0").is_ok());
        assert!(parse_path("items[2].name").is_ok());
        assert!(parse_path("a[0][1]").is_ok());
        assert!(parse_path("a..b").is_err());
        assert!(parse_path("a[x]").is_err());
        assert!(parse_path("a[1").is_err());
    }
}
