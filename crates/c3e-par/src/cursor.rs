//! One-token-lookahead (occasionally two) access over the token sequence.
//! Borrows the slice rather than owning it, since no mutation of the token
//! sequence ever happens during analysis.

use c3e_lex::Token;
use c3e_util::Span;

pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, position: 0 }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    pub fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.position + n)
    }

    pub fn bump(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.position);
        if tok.is_some() {
            self.position += 1;
        }
        tok
    }

    /// The span to blame for an "unexpected end of input" diagnostic: the
    /// last real token's position, or the origin if the program was empty.
    pub fn last_span(&self) -> Span {
        self.tokens.last().map(|t| t.span).unwrap_or(Span::new(1, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use c3e_lex::TokenKind;

    fn tok(kind: TokenKind) -> Token {
        Token::new(kind, "x", Span::new(1, 1))
    }

    #[test]
    fn bump_advances_and_returns_the_consumed_token() {
        let tokens = vec![tok(TokenKind::Id), tok(TokenKind::Semicolon)];
        let mut cursor = TokenCursor::new(&tokens);
        assert_eq!(cursor.bump().unwrap().kind, TokenKind::Id);
        assert_eq!(cursor.peek().unwrap().kind, TokenKind::Semicolon);
    }

    #[test]
    fn peek_nth_looks_past_the_current_token_without_consuming() {
        let tokens = vec![tok(TokenKind::Id), tok(TokenKind::Assign)];
        let cursor = TokenCursor::new(&tokens);
        assert_eq!(cursor.peek_nth(1).unwrap().kind, TokenKind::Assign);
        assert_eq!(cursor.peek().unwrap().kind, TokenKind::Id);
    }
}
