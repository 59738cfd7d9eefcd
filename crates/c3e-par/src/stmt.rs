//! Statements and the control-flow lowering templates.
//! `break_label`/`continue_label` are the inherited attributes threaded
//! down from the nearest enclosing loop into `block_command` lists and
//! `if`/`else` chains.

use crate::analyzer::Analyzer;
use crate::production::FatalError;
use c3e_ir::{Code, Instr};
use c3e_lex::TokenKind;
use c3e_sem::GLOBAL_SCOPE;
use c3e_util::diagnostic::{E_RETURN_OUT_OF_FUNCTION, E_SYNTAX};

type Labels = (Option<String>, Option<String>);

impl<'a> Analyzer<'a> {
    pub(crate) fn block_command(&mut self, break_label: Option<String>, continue_label: Option<String>) -> Result<Code, FatalError> {
        if self.peek_is_reserved("break") {
            self.cursor.bump();
            self.expect(TokenKind::Semicolon, "';'")?;
            let target = break_label.ok_or_else(|| self.error_here(E_SYNTAX, "'break' outside of a loop."))?;
            return Ok(Code::single(Instr::Jump { target }));
        }
        if self.peek_is_reserved("continue") {
            self.cursor.bump();
            self.expect(TokenKind::Semicolon, "';'")?;
            let target = continue_label.ok_or_else(|| self.error_here(E_SYNTAX, "'continue' outside of a loop."))?;
            return Ok(Code::single(Instr::Jump { target }));
        }
        self.command((break_label, continue_label))
    }

    fn command(&mut self, labels: Labels) -> Result<Code, FatalError> {
        let tok = self.cursor.peek().cloned().ok_or_else(|| self.eof_error("a statement"))?;
        if tok.kind == TokenKind::ReservedWord {
            match tok.lexeme.as_str() {
                "while" => return self.while_stmt(),
                "do" => return self.do_while_stmt(),
                "for" => return self.for_stmt(),
                "if" => return self.if_stmt(labels),
                "return" => return self.return_stmt(),
                word if is_declaration_starter(word) => return self.local_decl(),
                _ => {}
            }
        }
        self.expression_stmt()
    }

    /// A brace-delimited `{ block_command* }`, or a single `block_command`
    /// when no braces are present — both paths call the same
    /// `block_command`, so the `break`/`continue` semicolon is always
    /// consumed exactly once regardless of which path is taken.
    fn braced_or_single(&mut self, break_label: Option<String>, continue_label: Option<String>) -> Result<Code, FatalError> {
        if self.eat(TokenKind::BraceOpen) {
            let mut code = Code::new();
            while self.cursor.peek().map(|t| t.kind) != Some(TokenKind::BraceClose) {
                if self.cursor.peek().is_none() {
                    return Err(self.eof_error("'}'"));
                }
                code.append(self.block_command(break_label.clone(), continue_label.clone())?);
            }
            self.cursor.bump();
            Ok(code)
        } else {
            self.block_command(break_label, continue_label)
        }
    }

    fn while_stmt(&mut self) -> Result<Code, FatalError> {
        self.cursor.bump();
        self.expect(TokenKind::ParenOpen, "'('")?;
        let cond = self.right_expr()?;
        self.expect(TokenKind::ParenClose, "')'")?;

        let l_start = self.builder.new_label();
        let l_end = self.builder.new_label();
        let body = self.braced_or_single(Some(l_end.clone()), Some(l_start.clone()))?;

        let mut code = Code::new();
        code.push(Instr::Label(l_start.clone()));
        code.append(cond.code);
        code.push(Instr::JumpIfZero {
            cond: cond.place.expect("condition production always carries a place"),
            target: l_end.clone(),
        });
        code.append(body);
        code.push(Instr::Jump { target: l_start });
        code.push(Instr::Label(l_end));
        Ok(code)
    }

    fn do_while_stmt(&mut self) -> Result<Code, FatalError> {
        self.cursor.bump();
        let l_start = self.builder.new_label();
        let l_end = self.builder.new_label();
        let body = self.braced_or_single(Some(l_end.clone()), Some(l_start.clone()))?;

        self.expect_reserved("while")?;
        self.expect(TokenKind::ParenOpen, "'('")?;
        let cond = self.right_expr()?;
        self.expect(TokenKind::ParenClose, "')'")?;
        self.expect(TokenKind::Semicolon, "';'")?;

        let mut code = Code::new();
        code.push(Instr::Label(l_start.clone()));
        code.append(body);
        code.append(cond.code);
        code.push(Instr::JumpIfZero {
            cond: cond.place.expect("condition production always carries a place"),
            target: l_end.clone(),
        });
        code.push(Instr::Jump { target: l_start });
        code.push(Instr::Label(l_end));
        Ok(code)
    }

    fn for_stmt(&mut self) -> Result<Code, FatalError> {
        self.cursor.bump();
        self.expect(TokenKind::ParenOpen, "'('")?;

        let init_code = self.for_clause(TokenKind::Semicolon)?;
        self.expect(TokenKind::Semicolon, "';'")?;

        let (cond_place, cond_code) = if self.cursor.peek().map(|t| t.kind) == Some(TokenKind::Semicolon) {
            let tmp = self.builder.new_temp();
            (tmp.clone(), Code::single(Instr::Assign { dest: tmp, value: "1".into() }))
        } else {
            let cond = self.assignment_or_expr()?;
            (cond.place.expect("condition production always carries a place"), cond.code)
        };
        self.expect(TokenKind::Semicolon, "';'")?;

        let step_code = self.for_clause(TokenKind::ParenClose)?;
        self.expect(TokenKind::ParenClose, "')'")?;

        let l_start = self.builder.new_label();
        let l_end = self.builder.new_label();
        let body = self.braced_or_single(Some(l_end.clone()), Some(l_start.clone()))?;

        let mut code = Code::new();
        code.append(init_code);
        code.push(Instr::Label(l_start.clone()));
        code.append(cond_code);
        code.push(Instr::JumpIfZero { cond: cond_place, target: l_end.clone() });
        code.append(body);
        code.append(step_code);
        code.push(Instr::Jump { target: l_start });
        code.push(Instr::Label(l_end));
        Ok(code)
    }

    /// A comma-separated list of `assignment_or_expr` productions, stopping
    /// before `terminator` without consuming it. Empty is permitted.
    fn for_clause(&mut self, terminator: TokenKind) -> Result<Code, FatalError> {
        let mut code = Code::new();
        if self.cursor.peek().map(|t| t.kind) == Some(terminator) {
            return Ok(code);
        }
        loop {
            code.append(self.assignment_or_expr()?.code);
            if self.eat(TokenKind::Comma) {
                continue;
            }
            break;
        }
        Ok(code)
    }

    fn if_stmt(&mut self, labels: Labels) -> Result<Code, FatalError> {
        self.cursor.bump();
        let l_end = self.builder.new_label();
        self.if_chain(&l_end, labels)
    }

    /// One link of the `if`/`else-if*`/`else` chain. `l_end` is allocated
    /// once by the outermost `if` and threaded through every recursive call
    /// so the whole chain shares a single join point.
    fn if_chain(&mut self, l_end: &str, labels: Labels) -> Result<Code, FatalError> {
        self.expect(TokenKind::ParenOpen, "'('")?;
        let cond = self.right_expr()?;
        self.expect(TokenKind::ParenClose, "')'")?;
        let then_body = self.braced_or_single(labels.0.clone(), labels.1.clone())?;

        let mut code = cond.code;
        let cond_place = cond.place.expect("condition production always carries a place");

        if self.peek_is_reserved("else") {
            self.cursor.bump();
            let l_else = self.builder.new_label();
            code.push(Instr::JumpIfZero { cond: cond_place, target: l_else.clone() });
            code.append(then_body);
            code.push(Instr::Jump { target: l_end.to_string() });
            code.push(Instr::Label(l_else));

            if self.peek_is_reserved("if") {
                self.cursor.bump();
                code.append(self.if_chain(l_end, labels)?);
            } else {
                code.append(self.braced_or_single(labels.0, labels.1)?);
                code.push(Instr::Label(l_end.to_string()));
            }
        } else {
            code.push(Instr::JumpIfZero { cond: cond_place, target: l_end.to_string() });
            code.append(then_body);
            code.push(Instr::Label(l_end.to_string()));
        }
        Ok(code)
    }

    fn return_stmt(&mut self) -> Result<Code, FatalError> {
        let tok = self.cursor.bump().unwrap().clone();
        if self.scope == GLOBAL_SCOPE {
            return Err(self.error_at(E_RETURN_OUT_OF_FUNCTION, "'return' outside of a function.", tok.span));
        }
        let value = self.right_expr()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        let param_count = self.symbols.parameter_count(&self.scope);
        let mut code = value.code;
        code.push(Instr::Return {
            place: value.place.expect("expression production always carries a place"),
            param_count,
        });
        Ok(code)
    }

    /// `[IDENT assign_op] right_expr ";"`. A bare right-hand-side expression
    /// with no function call embedded in its code has no side effect and is
    /// discarded entirely; an assignment or a call-bearing expression is
    /// always kept in full.
    pub(crate) fn expression_stmt(&mut self) -> Result<Code, FatalError> {
        let prod = self.assignment_or_expr()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        if prod.operator.is_some() || prod.code.contains_call() {
            Ok(prod.code)
        } else {
            Ok(Code::new())
        }
    }
}

fn is_declaration_starter(lexeme: &str) -> bool {
    c3e_lex::is_type_word(lexeme) || c3e_lex::is_modifier(lexeme) || c3e_lex::is_specifier(lexeme)
}
