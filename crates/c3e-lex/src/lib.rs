//! Lexical scanner: turns source text into the token sequence the parser
//! consumes. A straightforward character-by-character dispatcher, kept
//! deliberately simple as a collaborator to the parser/analyzer core.

mod cursor;
mod reserved;
mod token;

pub use reserved::{is_modifier, is_reserved_word, is_return_type_word, is_specifier, is_type_word};
pub use token::{Token, TokenKind};

use c3e_util::Span;
use cursor::Cursor;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unrecognized character '{0}' at line {1}, column {2}")]
    UnrecognizedChar(char, u32, u32),

    #[error("unterminated block comment starting at line {0}, column {1}")]
    UnterminatedComment(u32, u32),
}

pub type LexResult<T> = std::result::Result<T, LexError>;

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(source: &'a str) -> LexResult<Vec<Token>> {
        let mut lexer = Self::new(source);
        lexer.run()?;
        Ok(lexer.tokens)
    }

    fn run(&mut self) -> LexResult<()> {
        loop {
            let Some(c) = self.cursor.peek() else {
                break;
            };
            let (line, column) = (self.cursor.line(), self.cursor.column());

            if c.is_whitespace() {
                self.cursor.bump();
                continue;
            }

            if c == '_' || c.is_ascii_alphabetic() {
                self.lex_identifier(line, column);
                continue;
            }

            if c.is_ascii_digit() {
                self.lex_number(line, column);
                continue;
            }

            if c == '.' && self.cursor.peek_second().is_some_and(|d| d.is_ascii_digit()) {
                self.lex_number(line, column);
                continue;
            }

            self.lex_symbol(c, line, column)?;
        }
        Ok(())
    }

    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) {
        self.tokens.push(Token::new(kind, lexeme, Span::new(line, column)));
    }

    fn lex_identifier(&mut self, line: u32, column: u32) {
        let mut lexeme = String::new();
        while let Some(c) = self.cursor.peek() {
            if c == '_' || c.is_ascii_alphanumeric() {
                lexeme.push(c);
                self.cursor.bump();
            } else {
                break;
            }
        }
        let kind = if reserved::is_reserved_word(&lexeme) {
            TokenKind::ReservedWord
        } else {
            TokenKind::Id
        };
        self.push(kind, lexeme, line, column);
    }

    fn lex_number(&mut self, line: u32, column: u32) {
        let mut lexeme = String::new();
        let mut is_float = false;

        while let Some(c) = self.cursor.peek() {
            if c.is_ascii_digit() {
                lexeme.push(c);
                self.cursor.bump();
            } else {
                break;
            }
        }

        let starts_with_dot = lexeme.is_empty() && self.cursor.peek() == Some('.');
        let dot_introduces_fraction = self.cursor.peek() == Some('.')
            && (starts_with_dot || self.cursor.peek_second().is_some_and(|d| d.is_ascii_digit()));
        if dot_introduces_fraction {
            is_float = true;
            lexeme.push('.');
            self.cursor.bump();
            while let Some(c) = self.cursor.peek() {
                if c.is_ascii_digit() {
                    lexeme.push(c);
                    self.cursor.bump();
                } else {
                    break;
                }
            }
        }

        let kind = if is_float { TokenKind::Float } else { TokenKind::Integer };
        self.push(kind, lexeme, line, column);
    }

    fn lex_symbol(&mut self, c: char, line: u32, column: u32) -> LexResult<()> {
        self.cursor.bump();
        use TokenKind::*;
        match c {
            '(' => self.push(ParenOpen, "(", line, column),
            ')' => self.push(ParenClose, ")", line, column),
            '[' => self.push(BracketOpen, "[", line, column),
            ']' => self.push(BracketClose, "]", line, column),
            '{' => self.push(BraceOpen, "{", line, column),
            '}' => self.push(BraceClose, "}", line, column),
            ',' => self.push(Comma, ",", line, column),
            ';' => self.push(Semicolon, ";", line, column),
            ':' => self.push(Colon, ":", line, column),
            '.' => self.push(Dot, ".", line, column),
            '?' => self.push(QuestionMark, "?", line, column),
            '~' => self.push(BitwiseNot, "~", line, column),

            '=' => {
                if self.cursor.eat_if('=') {
                    self.push(EqualTo, "==", line, column);
                } else {
                    self.push(Assign, "=", line, column);
                }
            }
            '!' => {
                if self.cursor.eat_if('=') {
                    self.push(Different, "!=", line, column);
                } else {
                    self.push(Not, "!", line, column);
                }
            }
            '^' => {
                if self.cursor.eat_if('=') {
                    self.push(BitwiseXorAssignment, "^=", line, column);
                } else {
                    self.push(BitwiseXor, "^", line, column);
                }
            }
            '&' => {
                if self.cursor.eat_if('&') {
                    self.push(And, "&&", line, column);
                } else if self.cursor.eat_if('=') {
                    self.push(BitwiseAndAssignment, "&=", line, column);
                } else {
                    self.push(BitwiseAnd, "&", line, column);
                }
            }
            '|' => {
                if self.cursor.eat_if('|') {
                    self.push(Or, "||", line, column);
                } else if self.cursor.eat_if('=') {
                    self.push(BitwiseOrAssignment, "|=", line, column);
                } else {
                    self.push(BitwiseOr, "|", line, column);
                }
            }
            '>' => {
                if self.cursor.eat_if('=') {
                    self.push(GreaterThanOrEqualTo, ">=", line, column);
                } else if self.cursor.eat_if('>') {
                    if self.cursor.eat_if('=') {
                        self.push(BitwiseRightAssignment, ">>=", line, column);
                    } else {
                        self.push(BitwiseRightShift, ">>", line, column);
                    }
                } else {
                    self.push(GreaterThan, ">", line, column);
                }
            }
            '<' => {
                if self.cursor.eat_if('=') {
                    self.push(LowerThanOrEqualTo, "<=", line, column);
                } else if self.cursor.eat_if('<') {
                    if self.cursor.eat_if('=') {
                        self.push(BitwiseLeftAssignment, "<<=", line, column);
                    } else {
                        self.push(BitwiseLeftShift, "<<", line, column);
                    }
                } else {
                    self.push(LowerThan, "<", line, column);
                }
            }
            '+' => {
                if self.cursor.eat_if('+') {
                    self.push(Increment, "++", line, column);
                } else if self.cursor.eat_if('=') {
                    self.push(CompoundAddition, "+=", line, column);
                } else {
                    self.push(Addition, "+", line, column);
                }
            }
            '-' => {
                if self.cursor.eat_if('-') {
                    self.push(Decrement, "--", line, column);
                } else if self.cursor.eat_if('>') {
                    self.push(Arrow, "->", line, column);
                } else if self.cursor.eat_if('=') {
                    self.push(CompoundSubtraction, "-=", line, column);
                } else {
                    self.push(Subtraction, "-", line, column);
                }
            }
            '*' => {
                if self.cursor.eat_if('=') {
                    self.push(CompoundMultiplication, "*=", line, column);
                } else {
                    self.push(Multiplication, "*", line, column);
                }
            }
            '/' => {
                if self.cursor.eat_if('/') {
                    self.skip_line_comment();
                } else if self.cursor.eat_if('*') {
                    self.skip_block_comment(line, column)?;
                } else if self.cursor.eat_if('=') {
                    self.push(CompoundDivision, "/=", line, column);
                } else {
                    self.push(Division, "/", line, column);
                }
            }
            '%' => {
                if self.cursor.eat_if('=') {
                    self.push(CompoundModulo, "%=", line, column);
                } else {
                    self.push(Modulo, "%", line, column);
                }
            }
            other => return Err(LexError::UnrecognizedChar(other, line, column)),
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.cursor.peek() {
            if c == '\n' {
                break;
            }
            self.cursor.bump();
        }
    }

    fn skip_block_comment(&mut self, line: u32, column: u32) -> LexResult<()> {
        loop {
            match self.cursor.bump() {
                None => return Err(LexError::UnterminatedComment(line, column)),
                Some('*') if self.cursor.eat_if('/') => return Ok(()),
                Some(_) => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn recognizes_reserved_words_and_identifiers() {
        let toks = Lexer::tokenize("int foo").unwrap();
        assert_eq!(toks[0].kind, TokenKind::ReservedWord);
        assert_eq!(toks[1].kind, TokenKind::Id);
    }

    #[test]
    fn loop_and_setup_are_plain_identifiers() {
        // unlike the Arduino-flavored original, "loop"/"setup" are not reserved
        let toks = Lexer::tokenize("loop setup").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Id);
        assert_eq!(toks[1].kind, TokenKind::Id);
    }

    #[test]
    fn disambiguates_multi_char_operators_by_lookahead() {
        use TokenKind::*;
        assert_eq!(kinds(">>="), vec![BitwiseRightAssignment]);
        assert_eq!(kinds(">>"), vec![BitwiseRightShift]);
        assert_eq!(kinds(">="), vec![GreaterThanOrEqualTo]);
        assert_eq!(kinds(">"), vec![GreaterThan]);
        assert_eq!(kinds("&&"), vec![And]);
        assert_eq!(kinds("&="), vec![BitwiseAndAssignment]);
        assert_eq!(kinds("&"), vec![BitwiseAnd]);
    }

    #[test]
    fn leading_dot_float_literal() {
        let toks = Lexer::tokenize(".5").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Float);
        assert_eq!(toks[0].lexeme, ".5");
    }

    #[test]
    fn integer_vs_float_literal() {
        let toks = Lexer::tokenize("42 3.14").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Integer);
        assert_eq!(toks[1].kind, TokenKind::Float);
    }

    #[test]
    fn line_comment_is_fully_suppressed() {
        let toks = Lexer::tokenize("1 // comment here\n2").unwrap();
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[1].line(), 2);
    }

    #[test]
    fn block_comment_is_fully_suppressed() {
        let toks = Lexer::tokenize("1 /* a\nb */ 2").unwrap();
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[1].line(), 2);
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        assert!(matches!(
            Lexer::tokenize("/* never closed"),
            Err(LexError::UnterminatedComment(..))
        ));
    }

    #[test]
    fn unrecognized_character_is_an_error() {
        assert!(matches!(
            Lexer::tokenize("@"),
            Err(LexError::UnrecognizedChar('@', 1, 1))
        ));
    }

    // ------------------------------------------------------------------
    // Property-based tests - fuzzing the identifier/number dispatch and
    // the multi-character operator lookahead with arbitrary inputs.
    // ------------------------------------------------------------------

    #[test]
    fn property_arbitrary_identifier_strings_lex_as_a_single_id_or_reserved_word() {
        use proptest::prelude::*;

        proptest!(|(input in "[a-zA-Z_][a-zA-Z0-9_]{0,30}")| {
            let toks = kinds(&input);
            prop_assert_eq!(toks.len(), 1);
            prop_assert!(matches!(toks[0], TokenKind::Id | TokenKind::ReservedWord));
        });
    }

    #[test]
    fn property_arbitrary_integer_strings_lex_as_a_single_integer() {
        use proptest::prelude::*;

        proptest!(|(input in "[0-9]{1,12}")| {
            let toks = kinds(&input);
            prop_assert_eq!(toks, vec![TokenKind::Integer]);
        });
    }

    #[test]
    fn property_arbitrary_decimal_strings_lex_as_a_single_float() {
        use proptest::prelude::*;

        proptest!(|(whole in "[0-9]{1,6}", frac in "[0-9]{1,6}")| {
            let input = format!("{whole}.{frac}");
            let toks = kinds(&input);
            prop_assert_eq!(toks, vec![TokenKind::Float]);
        });
    }

    #[test]
    fn property_relational_operator_prefix_never_swallows_an_unrelated_trailing_char() {
        use proptest::prelude::*;

        proptest!(|(op in prop::sample::select(vec![">", ">=", ">>", ">>=", "<", "<=", "<<", "<<="]))| {
            let input = format!("{op} 1");
            let toks = Lexer::tokenize(&input).unwrap();
            prop_assert_eq!(toks[0].lexeme.as_str(), op);
            prop_assert_eq!(toks[1].kind, TokenKind::Integer);
        });
    }

    #[test]
    fn property_rendering_tokens_as_space_separated_lexemes_and_relexing_is_stable() {
        use proptest::prelude::*;

        proptest!(|(input in "[a-zA-Z_][a-zA-Z0-9_]{0,15}")| {
            let first = kinds(&input);
            let rendered = Lexer::tokenize(&input).unwrap();
            let rerendered: String = rendered.iter().map(|t| t.lexeme.as_str()).collect::<Vec<_>>().join(" ");
            let second = kinds(&rerendered);
            prop_assert_eq!(first, second);
        });
    }
}
