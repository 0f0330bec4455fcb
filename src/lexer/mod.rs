//! Lexer for splitting a formula into raw tokens
//!
//! Tokenizing uses a single composed pattern whose alternatives are tried in
//! priority order: two-character comparison operators, the spread ellipsis,
//! structural punctuation, numeric literals, quoted strings, and
//! dotted/indexed identifiers. Text matching none of the alternatives is
//! silently dropped, so tokenizing never fails. The host may extend the
//! recognized shapes with one extra alternative at engine construction.

use crate::core::error::{ExpressionError, ExpressionResult};
use regex::Regex;

/// Two-character comparison operators, matched before single characters
const COMPARISON_PATTERN: &str = r"[<>]=|==|!=";
/// Object literal spread ellipsis
const SPREAD_PATTERN: &str = r"\.\.\.";
/// Structural and operator punctuation
const PUNCTUATION_PATTERN: &str = r"[-+*/():,<>!=%^\[\]{}]";
/// Integer or decimal literals; sign and exponent are grammar-level concerns
const NUMBER_PATTERN: &str = r"\b\d+(?:\.\d+)?";
/// Double- or single-quoted strings, contents taken verbatim
const STRING_PATTERN: &str = r#""[^"]*"|'[^']*'"#;
/// Bare words, optionally dotted and with bracketed numeric indices
const IDENTIFIER_PATTERN: &str = r"\w+(?:\.\w+|\[\d+\])*";

/// Lexer holding the composed token pattern
#[derive(Debug)]
pub struct Lexer {
    pattern: Regex,
}

impl Lexer {
    /// Create a lexer recognizing the standard token shapes
    pub fn new() -> Self {
        Self::with_extra_pattern(None)
            .expect("built-in token pattern is valid")
    }

    /// Create a lexer with an optional extra alternative appended to the
    /// standard shapes, for host-specific literals
    pub fn with_extra_pattern(extra: Option<&str>) -> ExpressionResult<Self> {
        let mut source = [
            COMPARISON_PATTERN,
            SPREAD_PATTERN,
            PUNCTUATION_PATTERN,
            NUMBER_PATTERN,
            STRING_PATTERN,
            IDENTIFIER_PATTERN,
        ]
        .join("|");

        if let Some(extra) = extra {
            source.push('|');
            source.push_str(extra);
        }

        let pattern = Regex::new(&source).map_err(|e| {
            ExpressionError::invalid_expression(format!("invalid extra token pattern: {e}"))
        })?;

        Ok(Self { pattern })
    }

    /// Split a formula into raw tokens, left to right.
    ///
    /// Whitespace separates tokens and is never emitted; unrecognizable
    /// text is skipped.
    pub fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.pattern.find_iter(text).map(|m| m.as_str()).collect()
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}
