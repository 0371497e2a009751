// SPDX-License-Identifier: Apache-2.0

use flattok::{Kind, Token};

use crate::parse_error::SchemaError;

/// Forward-only position in a flat token list.
///
/// Every read is bounds-checked: running off the end is reported as
/// [`SchemaError::UnexpectedEnd`] instead of panicking.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    source: &'a [u8],
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a [u8], tokens: &'a [Token]) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// The current token, left unconsumed.
    pub fn peek(&self) -> Result<&'a Token, SchemaError> {
        self.tokens
            .get(self.pos)
            .ok_or(SchemaError::UnexpectedEnd { index: self.pos })
    }

    /// Consumes the current token.
    pub fn take(&mut self) -> Result<&'a Token, SchemaError> {
        let token = self.peek()?;
        self.pos += 1;
        Ok(token)
    }

    /// Consumes the current token if it is of `kind`, failing with `mismatch`
    /// otherwise. The cursor does not move on failure.
    pub fn expect(&mut self, kind: Kind, mismatch: SchemaError) -> Result<&'a Token, SchemaError> {
        if self.peek()?.kind != kind {
            return Err(mismatch);
        }
        self.take()
    }

    /// Skips `count` tokens.
    pub fn advance(&mut self, count: usize) -> Result<(), SchemaError> {
        let target = self.pos.saturating_add(count);
        if target > self.tokens.len() {
            return Err(SchemaError::UnexpectedEnd {
                index: self.tokens.len(),
            });
        }
        self.pos = target;
        Ok(())
    }

    /// Source bytes a token spans.
    pub fn text(&self, token: &Token) -> &'a [u8] {
        token.text(self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        flattok::tokenize(src.as_bytes()).unwrap()
    }

    #[test]
    fn test_take_and_peek() {
        let src = r#"["a", 1]"#;
        let toks = tokens(src);
        let mut cursor = Cursor::new(src.as_bytes(), &toks);
        assert_eq!(cursor.peek().unwrap().kind, Kind::Array);
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.take().unwrap().child_count, 2);
        let s = cursor.take().unwrap();
        assert_eq!(cursor.text(s), b"a");
        assert_eq!(cursor.take().unwrap().kind, Kind::Primitive);
        assert!(cursor.is_at_end());
        assert_eq!(
            cursor.take(),
            Err(SchemaError::UnexpectedEnd { index: 3 })
        );
    }

    #[test]
    fn test_expect_does_not_move_on_mismatch() {
        let src = r#"["a"]"#;
        let toks = tokens(src);
        let mut cursor = Cursor::new(src.as_bytes(), &toks);
        assert_eq!(
            cursor.expect(Kind::Object, SchemaError::InvalidRoot),
            Err(SchemaError::InvalidRoot)
        );
        assert_eq!(cursor.position(), 0);
        assert!(cursor.expect(Kind::Array, SchemaError::InvalidRoot).is_ok());
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_advance_is_bounded() {
        let src = "[1, 2]";
        let toks = tokens(src);
        let mut cursor = Cursor::new(src.as_bytes(), &toks);
        assert!(cursor.advance(3).is_ok());
        assert!(cursor.is_at_end());
        assert_eq!(
            cursor.advance(1),
            Err(SchemaError::UnexpectedEnd { index: 3 })
        );
        assert_eq!(cursor.position(), 3);
        assert_eq!(
            cursor.advance(usize::MAX),
            Err(SchemaError::UnexpectedEnd { index: 3 })
        );
    }
}
