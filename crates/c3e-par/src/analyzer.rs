//! The fused parser / semantic analyzer / code generator.
//!
//! This grammar threads synthesized and inherited attributes through every
//! production, so there is no intermediate tree: parsing, scope and type
//! resolution, and IR emission all happen in one traversal. `Analyzer` owns
//! the token cursor, the symbol table, the diagnostic handler, and the IR
//! builder, and drives all three concerns together rather than staging them
//! as separate passes over separate tree representations.

use crate::cursor::TokenCursor;
use crate::production::FatalError;
use c3e_ir::{Builder, Code, Instr};
use c3e_lex::{Token, TokenKind};
use c3e_sem::{SymbolTable, GLOBAL_SCOPE};
use c3e_util::diagnostic::{Diagnostic, DiagnosticCode, Handler, E_EOF, E_SYNTAX};
use c3e_util::Span;

pub struct Analyzer<'a> {
    pub(crate) cursor: TokenCursor<'a>,
    pub(crate) symbols: SymbolTable,
    pub(crate) handler: Handler,
    pub(crate) builder: Builder,
    pub(crate) global_code: Code,
    pub(crate) function_code: Code,
    pub(crate) scope: String,
}

/// The result of one full compilation: a populated symbol table, the IR
/// split into its global-initializer and function-body streams (§4.2's
/// "Global declaration initializer ordering"), and any accumulated warnings.
#[derive(Debug)]
pub struct CompiledProgram {
    pub symbols: SymbolTable,
    pub global_code: Vec<Instr>,
    pub function_code: Vec<Instr>,
    pub warnings: Vec<Diagnostic>,
}

pub fn analyze(tokens: &[Token]) -> Result<CompiledProgram, FatalError> {
    let mut analyzer = Analyzer::new(tokens);
    analyzer.program()?;
    Ok(analyzer.finish())
}

impl<'a> Analyzer<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            symbols: SymbolTable::new(),
            handler: Handler::new(),
            builder: Builder::new(),
            global_code: Code::new(),
            function_code: Code::new(),
            scope: GLOBAL_SCOPE.to_string(),
        }
    }

    fn program(&mut self) -> Result<(), FatalError> {
        while self.cursor.peek().is_some() {
            self.definition()?;
        }
        Ok(())
    }

    fn finish(self) -> CompiledProgram {
        CompiledProgram {
            symbols: self.symbols,
            global_code: self.global_code.into_vec(),
            function_code: self.function_code.into_vec(),
            warnings: self.handler.warnings().to_vec(),
        }
    }

    pub(crate) fn error_at(&self, code: DiagnosticCode, message: impl Into<String>, span: Span) -> FatalError {
        FatalError(Diagnostic::error(code, message, span))
    }

    /// Blames the current token, or the end of input if none remains.
    pub(crate) fn error_here(&self, code: DiagnosticCode, message: impl Into<String>) -> FatalError {
        let span = self.cursor.peek().map(|t| t.span).unwrap_or_else(|| self.cursor.last_span());
        self.error_at(code, message, span)
    }

    pub(crate) fn eof_error(&self, expected: &str) -> FatalError {
        self.error_at(
            E_EOF,
            format!("expected {expected}, reached end of input."),
            self.cursor.last_span(),
        )
    }

    pub(crate) fn syntax_error_found(&self, expected: &str, tok: &Token) -> FatalError {
        self.error_at(
            E_SYNTAX,
            format!("expected {expected}, found \"{}\".", tok.lexeme),
            tok.span,
        )
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, FatalError> {
        match self.cursor.peek() {
            None => Err(self.eof_error(expected)),
            Some(tok) if tok.kind == kind => Ok(self.cursor.bump().unwrap().clone()),
            Some(tok) => Err(self.syntax_error_found(expected, tok)),
        }
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.cursor.peek().is_some_and(|t| t.kind == kind) {
            self.cursor.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn peek_is_reserved(&self, word: &str) -> bool {
        self.cursor
            .peek()
            .is_some_and(|t| t.kind == TokenKind::ReservedWord && t.lexeme == word)
    }

    pub(crate) fn expect_reserved(&mut self, word: &str) -> Result<Token, FatalError> {
        match self.cursor.peek() {
            Some(tok) if tok.kind == TokenKind::ReservedWord && tok.lexeme == word => {
                Ok(self.cursor.bump().unwrap().clone())
            }
            Some(tok) => Err(self.syntax_error_found(&format!("'{word}'"), tok)),
            None => Err(self.eof_error(&format!("'{word}'"))),
        }
    }

    /// The function-name position accepts a reserved word as well as a
    /// plain identifier.
    pub(crate) fn expect_ident_or_reserved(&mut self, expected: &str) -> Result<Token, FatalError> {
        match self.cursor.peek() {
            Some(tok) if matches!(tok.kind, TokenKind::Id | TokenKind::ReservedWord) => {
                Ok(self.cursor.bump().unwrap().clone())
            }
            Some(tok) => Err(self.syntax_error_found(expected, tok)),
            None => Err(self.eof_error(expected)),
        }
    }
}
