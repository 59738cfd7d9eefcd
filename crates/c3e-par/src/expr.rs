//! The expression cascade: `right_expr` down to `element`, left-associative
//! and short-circuit-free, plus function calls and the assignment
//! productions shared by `expression_stmt`, `for` clauses, and call
//! arguments.

use crate::analyzer::Analyzer;
use crate::production::{FatalError, Production};
use c3e_ir::{Code, Instr};
use c3e_lex::TokenKind;
use c3e_sem::{resulting_type, NumericType};
use c3e_util::diagnostic::{Diagnostic, E_INVALID_OPERANDS, E_UNDECLARED, E_UNEXPECTED_PARAMETER, W_IMPLICIT_CONVERSION};
use c3e_util::Span;

impl<'a> Analyzer<'a> {
    pub(crate) fn right_expr(&mut self) -> Result<Production, FatalError> {
        self.logical_or()
    }

    fn logical_or(&mut self) -> Result<Production, FatalError> {
        let mut lhs = self.logical_and()?;
        while self.cursor.peek().map(|t| t.kind) == Some(TokenKind::Or) {
            let op = self.cursor.bump().unwrap().clone();
            let rhs = self.logical_and()?;
            lhs = self.reduce_binary(lhs, &op.lexeme, rhs, op.span)?;
        }
        Ok(lhs)
    }

    fn logical_and(&mut self) -> Result<Production, FatalError> {
        let mut lhs = self.equality()?;
        while self.cursor.peek().map(|t| t.kind) == Some(TokenKind::And) {
            let op = self.cursor.bump().unwrap().clone();
            let rhs = self.equality()?;
            lhs = self.reduce_binary(lhs, &op.lexeme, rhs, op.span)?;
        }
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Production, FatalError> {
        let mut lhs = self.relational()?;
        loop {
            let Some(kind) = self.cursor.peek().map(|t| t.kind) else { break };
            if !matches!(kind, TokenKind::EqualTo | TokenKind::Different) {
                break;
            }
            let op = self.cursor.bump().unwrap().clone();
            let rhs = self.relational()?;
            lhs = self.reduce_binary(lhs, &op.lexeme, rhs, op.span)?;
        }
        Ok(lhs)
    }

    fn relational(&mut self) -> Result<Production, FatalError> {
        let mut lhs = self.additive()?;
        loop {
            let Some(kind) = self.cursor.peek().map(|t| t.kind) else { break };
            if !matches!(
                kind,
                TokenKind::GreaterThan | TokenKind::GreaterThanOrEqualTo | TokenKind::LowerThan | TokenKind::LowerThanOrEqualTo
            ) {
                break;
            }
            let op = self.cursor.bump().unwrap().clone();
            let rhs = self.additive()?;
            lhs = self.reduce_binary(lhs, &op.lexeme, rhs, op.span)?;
        }
        Ok(lhs)
    }

    fn additive(&mut self) -> Result<Production, FatalError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let Some(kind) = self.cursor.peek().map(|t| t.kind) else { break };
            if !matches!(kind, TokenKind::Addition | TokenKind::Subtraction) {
                break;
            }
            let op = self.cursor.bump().unwrap().clone();
            let rhs = self.multiplicative()?;
            lhs = self.reduce_binary(lhs, &op.lexeme, rhs, op.span)?;
        }
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> Result<Production, FatalError> {
        let mut lhs = self.unary_prefix()?;
        loop {
            let Some(kind) = self.cursor.peek().map(|t| t.kind) else { break };
            if !matches!(kind, TokenKind::Multiplication | TokenKind::Division | TokenKind::Modulo) {
                break;
            }
            let op = self.cursor.bump().unwrap().clone();
            let rhs = self.unary_prefix()?;
            lhs = self.reduce_binary(lhs, &op.lexeme, rhs, op.span)?;
        }
        Ok(lhs)
    }

    fn unary_prefix(&mut self) -> Result<Production, FatalError> {
        let Some(kind) = self.cursor.peek().map(|t| t.kind) else {
            return self.element();
        };
        if !matches!(kind, TokenKind::Addition | TokenKind::Subtraction) {
            return self.element();
        }
        let op = self.cursor.bump().unwrap().clone();
        let operand = self.element()?;
        let dest = self.builder.new_temp();
        let mut code = operand.code;
        code.push(Instr::UnaryOp {
            dest: dest.clone(),
            op: op.lexeme.clone(),
            operand: operand.place.expect("operand production always carries a place"),
        });
        Ok(Production {
            place: Some(dest),
            operator: None,
            production_type: operand.production_type,
            code,
        })
    }

    fn element(&mut self) -> Result<Production, FatalError> {
        let tok = self.cursor.peek().cloned().ok_or_else(|| self.eof_error("an expression"))?;
        match tok.kind {
            TokenKind::ParenOpen => {
                self.cursor.bump();
                let inner = self.right_expr()?;
                self.expect(TokenKind::ParenClose, "')'")?;
                Ok(inner)
            }
            TokenKind::Integer => {
                self.cursor.bump();
                let dest = self.builder.new_temp();
                Ok(Production {
                    place: Some(dest.clone()),
                    operator: None,
                    production_type: Some(NumericType::Int),
                    code: Code::single(Instr::Assign { dest, value: tok.lexeme.clone() }),
                })
            }
            TokenKind::Float => {
                self.cursor.bump();
                let dest = self.builder.new_temp();
                Ok(Production {
                    place: Some(dest.clone()),
                    operator: None,
                    production_type: Some(NumericType::Float),
                    code: Code::single(Instr::Assign { dest, value: tok.lexeme.clone() }),
                })
            }
            TokenKind::ReservedWord if tok.lexeme == "true" => {
                self.cursor.bump();
                Ok(Production {
                    place: Some("1".into()),
                    operator: None,
                    production_type: Some(NumericType::Int),
                    code: Code::new(),
                })
            }
            TokenKind::ReservedWord if tok.lexeme == "false" => {
                self.cursor.bump();
                Ok(Production {
                    place: Some("0".into()),
                    operator: None,
                    production_type: Some(NumericType::Int),
                    code: Code::new(),
                })
            }
            TokenKind::Id => self.identifier_or_call(),
            _ => Err(self.syntax_error_found("an expression", &tok)),
        }
    }

    fn identifier_or_call(&mut self) -> Result<Production, FatalError> {
        let tok = self.cursor.bump().unwrap().clone();
        let identifier = tok.lexeme.clone();
        if self.cursor.peek().map(|t| t.kind) == Some(TokenKind::ParenOpen) {
            return self.function_call(identifier, tok.span);
        }
        let defined_type = self
            .symbols
            .get(&identifier, &self.scope)
            .map(str::to_string)
            .ok_or_else(|| self.error_at(E_UNDECLARED, format!("\"{identifier}\" undeclared."), tok.span))?;
        let place = self.symbols.get_localized_identifier(&identifier, &self.scope);
        Ok(Production {
            place: Some(place),
            operator: None,
            production_type: Some(NumericType::classify(&defined_type)),
            code: Code::new(),
        })
    }

    fn function_call(&mut self, name: String, name_span: Span) -> Result<Production, FatalError> {
        self.cursor.bump();
        if !self.symbols.is_function(&name) {
            return Err(self.error_at(E_UNDECLARED, format!("\"{name}\" undeclared."), name_span));
        }
        let declared_count = self.symbols.parameter_count(&name);
        let return_type = self
            .symbols
            .function_entry(&name)
            .map(|f| NumericType::classify(&f.defined_type));

        let mut code = Code::new();
        let mut argc = 0usize;
        if self.cursor.peek().map(|t| t.kind) != Some(TokenKind::ParenClose) {
            loop {
                let arg_span = self.cursor.peek().map(|t| t.span).unwrap_or(name_span);
                let arg = self.assignment_or_expr()?;
                let param_type = self
                    .symbols
                    .parameter_at(&name, argc)
                    .map(|p| NumericType::classify(&p.defined_type));
                if let Some(param_type) = param_type {
                    self.maybe_warn_conversion(&param_type, arg.production_type.as_ref(), arg_span);
                }
                code.append(arg.code);
                code.push(Instr::Param {
                    value: arg.place.expect("argument production always carries a place"),
                });
                argc += 1;
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::ParenClose, "')'")?;

        if argc > declared_count {
            let message = if declared_count == 0 {
                format!("The function {name} only expected parameters")
            } else {
                format!("The function {name} only expected {declared_count} parameters")
            };
            return Err(self.error_at(E_UNEXPECTED_PARAMETER, message, name_span));
        }

        let dest = self.builder.new_temp();
        code.push(Instr::Call { dest: dest.clone(), func: name, argc });
        Ok(Production {
            place: Some(dest),
            operator: None,
            production_type: return_type,
            code,
        })
    }

    /// `[IDENT assign_op] right_expr` — shared by `expression_stmt`, `for`
    /// clauses, and call arguments, which accept the same optional leading
    /// assignment.
    pub(crate) fn assignment_or_expr(&mut self) -> Result<Production, FatalError> {
        if self.cursor.peek().map(|t| t.kind) == Some(TokenKind::Id) {
            if let Some(next) = self.cursor.peek_nth(1) {
                if next.kind.is_assignment_operator() {
                    let id_tok = self.cursor.bump().unwrap().clone();
                    let op_tok = self.cursor.bump().unwrap().clone();
                    let identifier = id_tok.lexeme.clone();
                    let var_type_str = self
                        .symbols
                        .get(&identifier, &self.scope)
                        .map(str::to_string)
                        .ok_or_else(|| self.error_at(E_UNDECLARED, format!("\"{identifier}\" undeclared."), id_tok.span))?;
                    let rhs = self.right_expr()?;
                    let var_type = NumericType::classify(&var_type_str);
                    self.maybe_warn_conversion(&var_type, rhs.production_type.as_ref(), id_tok.span);

                    let local_name = self.symbols.get_localized_identifier(&identifier, &self.scope);
                    let mut code = rhs.code;
                    let value = rhs.place.expect("expression production always carries a place");
                    if op_tok.kind == TokenKind::Assign {
                        code.push(Instr::Assign { dest: local_name.clone(), value });
                    } else {
                        code.push(Instr::CompoundAssign {
                            dest: local_name.clone(),
                            op: op_tok.lexeme.clone(),
                            value,
                        });
                    }
                    return Ok(Production {
                        place: Some(local_name),
                        operator: Some(op_tok.lexeme),
                        production_type: Some(var_type),
                        code,
                    });
                }
            }
        }
        self.right_expr()
    }

    /// `%` requires both operands to be `int`; `||`/`&&` always produce
    /// `int` regardless of operand type; otherwise the coarse numeric
    /// lattice's result-type rule applies.
    fn reduce_binary(&mut self, lhs: Production, op: &str, rhs: Production, op_span: Span) -> Result<Production, FatalError> {
        let lhs_type = lhs.production_type.clone().unwrap_or_else(|| NumericType::Other(String::new()));
        let rhs_type = rhs.production_type.clone().unwrap_or_else(|| NumericType::Other(String::new()));

        if op == "%" && (lhs_type != NumericType::Int || rhs_type != NumericType::Int) {
            return Err(self.error_at(
                E_INVALID_OPERANDS,
                format!("Invalid operands for remainder operation: \"{lhs_type}\" and \"{rhs_type}\""),
                op_span,
            ));
        }

        let result_type = if op == "||" || op == "&&" {
            NumericType::Int
        } else {
            resulting_type(&lhs_type, &rhs_type)
        };

        let mut code = lhs.code;
        code.append(rhs.code);
        let dest = self.builder.new_temp();
        code.push(Instr::BinaryOp {
            dest: dest.clone(),
            lhs: lhs.place.expect("operand production always carries a place"),
            op: op.to_string(),
            rhs: rhs.place.expect("operand production always carries a place"),
        });
        Ok(Production {
            place: Some(dest),
            operator: None,
            production_type: Some(result_type),
            code,
        })
    }

    pub(crate) fn maybe_warn_conversion(&mut self, declared: &NumericType, actual: Option<&NumericType>, span: Span) {
        let Some(actual) = actual else { return };
        if actual.is_in_lattice() && declared.is_in_lattice() && actual != declared {
            self.handler.push_warning(Diagnostic::warning(
                W_IMPLICIT_CONVERSION,
                format!("implicit conversion from \"{actual}\" to \"{declared}\""),
                span,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::analyze;
    use c3e_lex::Lexer;
    use c3e_util::diagnostic::W_IMPLICIT_CONVERSION;

    fn compile(src: &str) -> crate::analyzer::CompiledProgram {
        let tokens = Lexer::tokenize(src).unwrap();
        analyze(&tokens).unwrap()
    }

    #[test]
    fn binary_cascade_is_left_associative_and_allocates_one_temp_per_reduction() {
        let program = compile("void main(){ int a=1; int b=2; int c=3; int d = a+b+c; }");
        let lines: Vec<String> = program.function_code.iter().map(|i| i.to_string()).collect();
        let binary_ops: Vec<&String> = lines.iter().filter(|l| l.contains(" + ")).collect();
        assert_eq!(binary_ops.len(), 2); // (a+b) then (+c), never a+(b+c)
    }

    #[test]
    fn implicit_conversion_on_initializer_warns_with_the_declared_and_actual_types() {
        let program = compile("int main(){ float x = 1; return 0; }");
        assert_eq!(program.warnings.len(), 1);
        assert_eq!(program.warnings[0].code, W_IMPLICIT_CONVERSION);
        assert_eq!(program.warnings[0].message, "implicit conversion from \"int\" to \"float\"");
    }

    #[test]
    fn remainder_of_non_int_operands_is_fatal() {
        let tokens = Lexer::tokenize("void main(){ float a=1; int b=2; int c=a%b; }").unwrap();
        assert!(analyze(&tokens).is_err());
    }

    #[test]
    fn undeclared_identifier_is_fatal() {
        let tokens = Lexer::tokenize("void main(){ y = 1; }").unwrap();
        assert!(analyze(&tokens).is_err());
    }

    #[test]
    fn call_with_too_many_arguments_is_fatal() {
        let tokens = Lexer::tokenize("int f(int a){ return a; } void main(){ f(1, 2); }").unwrap();
        assert!(analyze(&tokens).is_err());
    }

    #[test]
    fn call_arity_message_omits_the_count_for_zero_parameter_functions() {
        let tokens = Lexer::tokenize("void f(){ } void main(){ f(1); }").unwrap();
        let err = analyze(&tokens).unwrap_err();
        assert_eq!(err.0.message, "The function f only expected parameters");
    }

    #[test]
    fn assignment_inside_a_call_argument_both_assigns_and_passes_the_value() {
        let program = compile("void f(int a){} void main(){ int x; f(x = 5); }");
        let lines: Vec<String> = program.function_code.iter().map(|i| i.to_string()).collect();
        assert!(lines.iter().any(|l| l == "main_x := #T0"));
        assert!(lines.iter().any(|l| l == "param main_x"));
        assert!(lines.iter().any(|l| l.starts_with("#T1 := call f")));
    }

    #[test]
    fn boolean_literals_lower_to_0_and_1_without_allocating_a_temporary() {
        let program = compile("void main(){ int x = true; }");
        let lines: Vec<String> = program.function_code.iter().map(|i| i.to_string()).collect();
        assert!(lines.contains(&"main_x := 1".to_string()));
    }
}
