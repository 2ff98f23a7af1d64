//! Statement parsing implementation
//!
//! Handles simple statements (assignments, `return`, `import`, ...) and
//! compound statements (`if`, `while`, `for`, `def`, `class`) with their
//! indented suites. A suite is either an indented block following a newline
//! or a single simple statement on the same line (`while True: x = 1`).

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parser::{ParseError, Parser};

impl Parser {
    /// Parse a single statement (entry point from program/suite level)
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        match self.peek_token() {
            Token::If(_) => self.parse_if(),
            Token::While(_) => self.parse_while(),
            Token::For(_) => self.parse_for(),
            Token::Def(_) => self.parse_def(),
            Token::Class(_) => self.parse_class(),
            Token::Return(_) => {
                self.advance();
                let expr = if self.check(&Token::Newline(loc)) || self.is_at_end() {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect_newline("after 'return'")?;
                Ok(Stmt::Return {
                    expr,
                    location: loc,
                })
            }
            Token::Break(_) => {
                self.advance();
                self.expect_newline("after 'break'")?;
                Ok(Stmt::Break { location: loc })
            }
            Token::Continue(_) => {
                self.advance();
                self.expect_newline("after 'continue'")?;
                Ok(Stmt::Continue { location: loc })
            }
            Token::Pass(_) => {
                self.advance();
                self.expect_newline("after 'pass'")?;
                Ok(Stmt::Pass { location: loc })
            }
            Token::Import(_) => {
                self.advance();
                let module = self.expect_module_path()?;
                self.expect_newline("after import statement")?;
                Ok(Stmt::Import {
                    module,
                    location: loc,
                })
            }
            Token::From(_) => {
                self.advance();
                let module = self.expect_module_path()?;
                self.expect_token(
                    &Token::Import(self.current_location()),
                    "Expected 'import' in from-import",
                )?;
                let mut names = vec![self.expect_identifier()?];
                while self.match_token(&Token::Comma(self.current_location())) {
                    names.push(self.expect_identifier()?);
                }
                self.expect_newline("after from-import statement")?;
                Ok(Stmt::ImportFrom {
                    module,
                    names,
                    location: loc,
                })
            }
            Token::Del(_) => {
                self.advance();
                let target = self.parse_expression()?;
                self.expect_newline("after 'del'")?;
                Ok(Stmt::Delete {
                    target,
                    location: loc,
                })
            }
            Token::Global(_) => {
                self.advance();
                let names = self.parse_name_list()?;
                self.expect_newline("after 'global'")?;
                Ok(Stmt::Global {
                    names,
                    location: loc,
                })
            }
            Token::Nonlocal(_) => {
                self.advance();
                let names = self.parse_name_list()?;
                self.expect_newline("after 'nonlocal'")?;
                Ok(Stmt::Nonlocal {
                    names,
                    location: loc,
                })
            }
            _ => self.parse_expr_or_assignment(),
        }
    }

    /// Parse `name [, name]*`
    fn parse_name_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.expect_identifier()?];
        while self.match_token(&Token::Comma(self.current_location())) {
            names.push(self.expect_identifier()?);
        }
        Ok(names)
    }

    /// Parse an expression statement, assignment, or augmented assignment
    fn parse_expr_or_assignment(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        let expr = self.parse_expression()?;

        if self.match_token(&Token::Eq(loc)) {
            Self::check_assign_target(&expr)?;
            let value = self.parse_expression()?;
            self.expect_newline("after assignment")?;
            return Ok(Stmt::Assign {
                target: expr,
                value,
                location: loc,
            });
        }

        let aug_op = if self.match_token(&Token::PlusEq(loc)) {
            Some(BinOp::Add)
        } else if self.match_token(&Token::MinusEq(loc)) {
            Some(BinOp::Sub)
        } else if self.match_token(&Token::StarEq(loc)) {
            Some(BinOp::Mul)
        } else if self.match_token(&Token::SlashEq(loc)) {
            Some(BinOp::Div)
        } else if self.match_token(&Token::SlashSlashEq(loc)) {
            Some(BinOp::FloorDiv)
        } else if self.match_token(&Token::PercentEq(loc)) {
            Some(BinOp::Mod)
        } else {
            None
        };

        if let Some(op) = aug_op {
            Self::check_assign_target(&expr)?;
            let value = self.parse_expression()?;
            self.expect_newline("after augmented assignment")?;
            return Ok(Stmt::AugAssign {
                target: expr,
                op,
                value,
                location: loc,
            });
        }

        self.expect_newline("after expression statement")?;
        Ok(Stmt::ExprStatement {
            expr,
            location: loc,
        })
    }

    /// Only names, index expressions, and attribute accesses are assignable
    fn check_assign_target(expr: &Expr) -> Result<(), ParseError> {
        match expr {
            Expr::Name(..) | Expr::Index { .. } | Expr::Attribute { .. } => Ok(()),
            other => Err(ParseError {
                message: "cannot assign to this expression".to_string(),
                location: other.location(),
            }),
        }
    }

    /// Parse a suite: `: NEWLINE INDENT stmt+ DEDENT` or `: simple_stmt`
    pub(crate) fn parse_suite(&mut self, ctx: &str) -> Result<Vec<Stmt>, ParseError> {
        self.expect_colon(ctx)?;

        if self.match_token(&Token::Newline(self.current_location())) {
            self.expect_token(
                &Token::Indent(self.current_location()),
                &format!("Expected an indented block {ctx}"),
            )?;
            let mut body = Vec::new();
            loop {
                if self.match_token(&Token::Dedent(self.current_location())) {
                    break;
                }
                if self.is_at_end() {
                    break;
                }
                if self.match_token(&Token::Newline(self.current_location())) {
                    continue;
                }
                body.push(self.parse_statement()?);
            }
            if body.is_empty() {
                return Err(ParseError {
                    message: format!("Expected at least one statement {ctx}"),
                    location: self.current_location(),
                });
            }
            Ok(body)
        } else {
            // Inline suite: one simple statement on the header line
            Ok(vec![self.parse_statement()?])
        }
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'if'

        let condition = self.parse_expression()?;
        let body = self.parse_suite("after 'if' condition")?;
        let mut branches = vec![CondBranch { condition, body }];

        let mut else_body = None;
        loop {
            if self.match_token(&Token::Elif(self.current_location())) {
                let condition = self.parse_expression()?;
                let body = self.parse_suite("after 'elif' condition")?;
                branches.push(CondBranch { condition, body });
            } else if self.match_token(&Token::Else(self.current_location())) {
                else_body = Some(self.parse_suite("after 'else'")?);
                break;
            } else {
                break;
            }
        }

        Ok(Stmt::If {
            branches,
            else_body,
            location: loc,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'while'

        let condition = self.parse_expression()?;
        let body = self.parse_suite("after 'while' condition")?;

        Ok(Stmt::While {
            condition,
            body,
            location: loc,
        })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'for'

        let target = self.expect_identifier()?;
        self.expect_token(&Token::In(self.current_location()), "Expected 'in' in for loop")?;
        let iterable = self.parse_expression()?;
        let body = self.parse_suite("after 'for' header")?;

        Ok(Stmt::For {
            target,
            iterable,
            body,
            location: loc,
        })
    }

    fn parse_def(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'def'

        let name = self.expect_identifier()?;
        self.expect_lparen("after function name")?;
        let mut params = Vec::new();
        if !self.check(&Token::RParen(self.current_location())) {
            params.push(self.expect_identifier()?);
            while self.match_token(&Token::Comma(self.current_location())) {
                params.push(self.expect_identifier()?);
            }
        }
        self.expect_rparen("after parameter list")?;
        let body = self.parse_suite("after function signature")?;

        Ok(Stmt::FunctionDef {
            name,
            params,
            body,
            location: loc,
        })
    }

    fn parse_class(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'class'

        let name = self.expect_identifier()?;
        // Tolerate empty parens; base classes are not supported
        if self.match_token(&Token::LParen(self.current_location())) {
            self.expect_rparen("after class name")?;
        }
        let body = self.parse_suite("after class header")?;

        Ok(Stmt::ClassDef {
            name,
            body,
            location: loc,
        })
    }
}
