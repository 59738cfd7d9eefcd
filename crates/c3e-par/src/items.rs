//! Top-level definitions, parameter lists, and local declarations —
//! `definition`, `params`/`param`, and `local_decl`.

use crate::analyzer::Analyzer;
use crate::production::FatalError;
use c3e_ir::{Code, Instr};
use c3e_lex::{Token, TokenKind};
use c3e_sem::{NumericType, GLOBAL_SCOPE};
use c3e_util::diagnostic::{E_MULTIPLE_DECLARATION, E_SYNTAX};
use c3e_util::Span;

impl<'a> Analyzer<'a> {
    pub(crate) fn definition(&mut self) -> Result<(), FatalError> {
        let defined_type = self.parse_return_type()?;
        let name_tok = self.expect_ident_or_reserved("an identifier or function name")?;
        let identifier = name_tok.lexeme.clone();

        if self.eat(TokenKind::ParenOpen) {
            return self.function_definition(identifier, defined_type, name_tok.span);
        }

        self.declare_global(&identifier, &defined_type, name_tok.span)?;
        if self.eat(TokenKind::Assign) {
            self.global_initializer(&identifier, &defined_type, name_tok.span)?;
        }
        while self.eat(TokenKind::Comma) {
            let next_tok = self.expect(TokenKind::Id, "an identifier")?;
            let next_id = next_tok.lexeme.clone();
            self.declare_global(&next_id, &defined_type, next_tok.span)?;
            if self.eat(TokenKind::Assign) {
                self.global_initializer(&next_id, &defined_type, next_tok.span)?;
            }
        }
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(())
    }

    fn declare_global(&mut self, identifier: &str, defined_type: &str, span: Span) -> Result<(), FatalError> {
        self.symbols
            .add_global(identifier, defined_type, false)
            .map_err(|_| self.error_at(E_MULTIPLE_DECLARATION, format!("\"{identifier}\" already declared."), span))
    }

    fn global_initializer(&mut self, identifier: &str, defined_type: &str, span: Span) -> Result<(), FatalError> {
        let rhs = self.right_expr()?;
        let declared = NumericType::classify(defined_type);
        self.maybe_warn_conversion(&declared, rhs.production_type.as_ref(), span);
        let place = self.symbols.get_localized_identifier(identifier, GLOBAL_SCOPE);
        self.global_code.append(rhs.code);
        self.global_code.push(Instr::Assign {
            dest: place,
            value: rhs.place.expect("expression production always carries a place"),
        });
        Ok(())
    }

    fn function_definition(&mut self, identifier: String, defined_type: String, name_span: Span) -> Result<(), FatalError> {
        self.symbols
            .add_global(&identifier, &defined_type, true)
            .map_err(|_| self.error_at(E_MULTIPLE_DECLARATION, format!("\"{identifier}\" already declared."), name_span))?;

        self.scope = identifier.clone();
        self.params()?;
        self.expect(TokenKind::BraceOpen, "'{'")?;

        let mut body = Code::new();
        let param_count = self.symbols.parameter_count(&identifier);
        for i in 0..param_count {
            let param_identifier = self
                .symbols
                .parameter_at(&identifier, i)
                .expect("index within parameter_count is always present")
                .identifier
                .clone();
            let local_name = self.symbols.get_localized_identifier(&param_identifier, &identifier);
            body.push(Instr::Assign {
                dest: local_name,
                value: format!("param[{i}]"),
            });
        }

        while self.cursor.peek().map(|t| t.kind) != Some(TokenKind::BraceClose) {
            if self.cursor.peek().is_none() {
                return Err(self.eof_error("'}'"));
            }
            let stmt_code = self.block_command(None, None)?;
            body.append(stmt_code);
        }
        self.cursor.bump();

        if !body.ends_with_return() {
            let tmp = self.builder.new_temp();
            body.push(Instr::Assign {
                dest: tmp.clone(),
                value: "0".into(),
            });
            body.push(Instr::Return {
                place: tmp,
                param_count,
            });
        }

        self.function_code.push(Instr::Label(identifier.clone()));
        self.function_code.append(body);
        self.scope = GLOBAL_SCOPE.to_string();
        Ok(())
    }

    fn params(&mut self) -> Result<(), FatalError> {
        if self.eat(TokenKind::ParenClose) {
            return Ok(());
        }
        loop {
            self.param()?;
            if self.eat(TokenKind::Comma) {
                continue;
            }
            break;
        }
        self.expect(TokenKind::ParenClose, "')'")?;
        Ok(())
    }

    fn param(&mut self) -> Result<(), FatalError> {
        let defined_type = self.parse_param_type()?;
        let tok = self.expect(TokenKind::Id, "a parameter name")?;
        let scope = self.scope.clone();
        self.symbols
            .add_parameter(&scope, &tok.lexeme, &defined_type)
            .map_err(|_| self.error_at(E_MULTIPLE_DECLARATION, format!("\"{}\" already declared.", tok.lexeme), tok.span))
    }

    pub(crate) fn local_decl(&mut self) -> Result<Code, FatalError> {
        let defined_type = self.parse_param_type()?;
        let mut code = Code::new();
        loop {
            let tok = self.expect(TokenKind::Id, "an identifier")?;
            let identifier = tok.lexeme.clone();
            let scope = self.scope.clone();
            self.symbols
                .add_local(&scope, &identifier, &defined_type)
                .map_err(|_| self.error_at(E_MULTIPLE_DECLARATION, format!("\"{identifier}\" already declared."), tok.span))?;

            if self.eat(TokenKind::Assign) {
                let rhs = self.right_expr()?;
                let declared = NumericType::classify(&defined_type);
                self.maybe_warn_conversion(&declared, rhs.production_type.as_ref(), tok.span);
                code.append(rhs.code);
                let local_name = self.symbols.get_localized_identifier(&identifier, &scope);
                code.push(Instr::Assign {
                    dest: local_name,
                    value: rhs.place.expect("expression production always carries a place"),
                });
            }
            if self.eat(TokenKind::Comma) {
                continue;
            }
            break;
        }
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(code)
    }

    /// `modifiers? specifiers? (type | "void") IDENT` — the return-type
    /// position of a `definition`, which alone among the type productions
    /// admits `void`.
    fn parse_return_type(&mut self) -> Result<String, FatalError> {
        let mut parts = Vec::new();
        if let Some(modifier) = self.eat_word(c3e_lex::is_modifier) {
            parts.push(modifier);
        }
        if let Some(specifier) = self.eat_word(c3e_lex::is_specifier) {
            parts.push(specifier);
        }
        let tok = self.cursor.peek().cloned().ok_or_else(|| self.eof_error("a return type"))?;
        if tok.kind == TokenKind::ReservedWord && c3e_lex::is_return_type_word(&tok.lexeme) {
            parts.push(tok.lexeme.clone());
            self.cursor.bump();
            Ok(parts.join(" "))
        } else {
            Err(self.syntax_error_found("a return type", &tok))
        }
    }

    /// `modifiers? specifiers? type IDENT` — the parameter/local/global
    /// variable-declaration type position; unlike `parse_return_type`,
    /// `void` is not a valid value type here.
    fn parse_param_type(&mut self) -> Result<String, FatalError> {
        let mut parts = Vec::new();
        if let Some(modifier) = self.eat_word(c3e_lex::is_modifier) {
            parts.push(modifier);
        }
        if let Some(specifier) = self.eat_word(c3e_lex::is_specifier) {
            parts.push(specifier);
        }
        let tok = self.cursor.peek().cloned().ok_or_else(|| self.eof_error("a type"))?;
        if tok.kind == TokenKind::ReservedWord && c3e_lex::is_type_word(&tok.lexeme) {
            parts.push(tok.lexeme.clone());
            self.cursor.bump();
            Ok(parts.join(" "))
        } else {
            Err(self.syntax_error_found("a type", &tok))
        }
    }

    fn eat_word(&mut self, predicate: fn(&str) -> bool) -> Option<String> {
        let matches = self
            .cursor
            .peek()
            .is_some_and(|t| t.kind == TokenKind::ReservedWord && predicate(&t.lexeme));
        if matches {
            let tok: Token = self.cursor.bump().unwrap().clone();
            Some(tok.lexeme)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::analyze;
    use crate::analyzer::CompiledProgram;
    use c3e_lex::Lexer;

    fn compile(src: &str) -> CompiledProgram {
        let tokens = Lexer::tokenize(src).unwrap();
        analyze(&tokens).unwrap()
    }

    #[test]
    fn bare_declaration_adds_a_global_with_no_code() {
        let program = compile("int x;");
        assert!(program.symbols.exists("x", c3e_sem::GLOBAL_SCOPE, false));
        assert!(program.global_code.is_empty());
    }

    #[test]
    fn comma_separated_declarators_share_one_type() {
        let program = compile("int a, b = 2;");
        assert!(program.symbols.exists("a", c3e_sem::GLOBAL_SCOPE, false));
        assert!(program.symbols.exists("b", c3e_sem::GLOBAL_SCOPE, false));
        assert_eq!(program.global_code.len(), 2); // `b`'s literal assign + its init
    }

    #[test]
    fn duplicate_global_declaration_is_fatal() {
        let tokens = Lexer::tokenize("int x; int x;").unwrap();
        assert!(analyze(&tokens).is_err());
    }

    #[test]
    fn reserved_word_is_accepted_as_a_function_name() {
        let program = compile("void loop(){}");
        assert!(program.symbols.is_function("loop"));
    }
}
