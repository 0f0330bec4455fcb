//! Mutable position over a token sequence
//!
//! One cursor exists per evaluation call and is threaded by mutable
//! reference through every parse function. It is never shared across calls.

/// Cursor over the raw tokens of one formula
#[derive(Debug)]
pub struct TokenCursor<'a> {
    tokens: Vec<&'a str>,
    position: usize,
}

impl<'a> TokenCursor<'a> {
    /// Create a cursor positioned at the first token
    pub fn new(tokens: Vec<&'a str>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// The token under the cursor, or `None` past the end of the stream
    pub fn current(&self) -> Option<&'a str> {
        self.tokens.get(self.position).copied()
    }

    /// Advance the cursor by one token
    pub fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Whether every token has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk() {
        let mut cursor = TokenCursor::new(vec!["1", "+", "2"]);
        assert_eq!(cursor.current(), Some("1"));
        cursor.advance();
        assert_eq!(cursor.current(), Some("+"));
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.current(), None);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_advance_past_end_is_stable() {
        let mut cursor = TokenCursor::new(vec!["x"]);
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.current(), None);
    }
}
