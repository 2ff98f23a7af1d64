//! Expression parsing implementation
//!
//! Precedence climbing for binary operators, recursive descent for the rest.
//! From loosest to tightest: `or`, `and`, `not`, comparisons and membership,
//! additive, multiplicative, unary sign, `**` (right-associative), postfix
//! (calls, attribute access, indexing), primary.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parser::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.match_token(&Token::Or(self.current_location())) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_and()?);
            left = Expr::BinaryOp {
                op: BinOp::Or,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;

        while self.match_token(&Token::And(self.current_location())) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_not()?);
            left = Expr::BinaryOp {
                op: BinOp::And,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.match_token(&Token::Not(self.current_location())) {
            let loc = self.previous_location();
            let operand = Box::new(self.parse_not()?);
            return Ok(Expr::UnaryOp {
                op: UnOp::Not,
                operand,
                location: loc,
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::EqEq(loc)) {
                BinOp::Eq
            } else if self.match_token(&Token::NotEq(loc)) {
                BinOp::Ne
            } else if self.match_token(&Token::Lt(loc)) {
                BinOp::Lt
            } else if self.match_token(&Token::Le(loc)) {
                BinOp::Le
            } else if self.match_token(&Token::Gt(loc)) {
                BinOp::Gt
            } else if self.match_token(&Token::Ge(loc)) {
                BinOp::Ge
            } else if self.match_token(&Token::In(loc)) {
                BinOp::In
            } else if self.check(&Token::Not(loc)) {
                // 'not in' is the only postfix use of 'not'
                if let Some(Token::In(_)) = self.tokens.get(self.position + 1) {
                    self.advance();
                    self.advance();
                    BinOp::NotIn
                } else {
                    break;
                }
            } else {
                break;
            };

            let right = Box::new(self.parse_additive()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Plus(loc)) {
                BinOp::Add
            } else if self.match_token(&Token::Minus(loc)) {
                BinOp::Sub
            } else {
                break;
            };

            let right = Box::new(self.parse_multiplicative()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Star(loc)) {
                BinOp::Mul
            } else if self.match_token(&Token::Slash(loc)) {
                BinOp::Div
            } else if self.match_token(&Token::SlashSlash(loc)) {
                BinOp::FloorDiv
            } else if self.match_token(&Token::Percent(loc)) {
                BinOp::Mod
            } else {
                break;
            };

            let right = Box::new(self.parse_unary()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();
        if self.match_token(&Token::Minus(loc)) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(Expr::UnaryOp {
                op: UnOp::Neg,
                operand,
                location: loc,
            });
        }
        if self.match_token(&Token::Plus(loc)) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(Expr::UnaryOp {
                op: UnOp::Pos,
                operand,
                location: loc,
            });
        }
        self.parse_power()
    }

    /// `**` is right-associative and its right operand may carry a sign
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_postfix()?;

        if self.match_token(&Token::StarStar(self.current_location())) {
            let loc = self.previous_location();
            let exponent = Box::new(self.parse_unary()?);
            return Ok(Expr::BinaryOp {
                op: BinOp::Pow,
                left: Box::new(base),
                right: exponent,
                location: loc,
            });
        }

        Ok(base)
    }

    /// Postfix operators: `f(...)`, `obj.attr`, `seq[index]`
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();
            if self.match_token(&Token::LParen(loc)) {
                let mut args = Vec::new();
                if !self.check(&Token::RParen(loc)) {
                    args.push(self.parse_expression()?);
                    while self.match_token(&Token::Comma(self.current_location())) {
                        args.push(self.parse_expression()?);
                    }
                }
                self.expect_rparen("after call arguments")?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    location: loc,
                };
            } else if self.match_token(&Token::Dot(loc)) {
                let name = self.expect_identifier()?;
                expr = Expr::Attribute {
                    object: Box::new(expr),
                    name,
                    location: loc,
                };
            } else if self.match_token(&Token::LBracket(loc)) {
                let index = Box::new(self.parse_expression()?);
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' after index",
                )?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index,
                    location: loc,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        match self.peek_token() {
            Token::IntLiteral(n, _) => {
                self.advance();
                Ok(Expr::IntLiteral(n, loc))
            }
            Token::FloatLiteral(x, _) => {
                self.advance();
                Ok(Expr::FloatLiteral(x, loc))
            }
            Token::StringLiteral(s, _) => {
                self.advance();
                Ok(Expr::StringLiteral(s, loc))
            }
            Token::True(_) => {
                self.advance();
                Ok(Expr::BoolLiteral(true, loc))
            }
            Token::False(_) => {
                self.advance();
                Ok(Expr::BoolLiteral(false, loc))
            }
            Token::None(_) => {
                self.advance();
                Ok(Expr::NoneLiteral(loc))
            }
            Token::Ident(name, _) => {
                self.advance();
                Ok(Expr::Name(name, loc))
            }
            Token::LParen(_) => {
                self.advance();
                // Empty parens make an empty tuple
                if self.match_token(&Token::RParen(loc)) {
                    return Ok(Expr::TupleDisplay {
                        items: Vec::new(),
                        location: loc,
                    });
                }
                let first = self.parse_expression()?;
                if self.match_token(&Token::Comma(self.current_location())) {
                    let mut items = vec![first];
                    while !self.check(&Token::RParen(loc)) {
                        items.push(self.parse_expression()?);
                        if !self.match_token(&Token::Comma(self.current_location())) {
                            break;
                        }
                    }
                    self.expect_rparen("after tuple display")?;
                    Ok(Expr::TupleDisplay {
                        items,
                        location: loc,
                    })
                } else {
                    self.expect_rparen("after parenthesized expression")?;
                    Ok(first)
                }
            }
            Token::LBracket(_) => {
                self.advance();
                let mut items = Vec::new();
                while !self.check(&Token::RBracket(loc)) {
                    items.push(self.parse_expression()?);
                    if !self.match_token(&Token::Comma(self.current_location())) {
                        break;
                    }
                }
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' after list display",
                )?;
                Ok(Expr::ListDisplay {
                    items,
                    location: loc,
                })
            }
            Token::LBrace(_) => {
                self.advance();
                // `{}` is an empty dict, as in Python
                if self.match_token(&Token::RBrace(loc)) {
                    return Ok(Expr::DictDisplay {
                        entries: Vec::new(),
                        location: loc,
                    });
                }
                let first = self.parse_expression()?;
                if self.match_token(&Token::Colon(self.current_location())) {
                    let value = self.parse_expression()?;
                    let mut entries = vec![(first, value)];
                    while self.match_token(&Token::Comma(self.current_location())) {
                        if self.check(&Token::RBrace(loc)) {
                            break;
                        }
                        let key = self.parse_expression()?;
                        self.expect_colon("in dict display")?;
                        let value = self.parse_expression()?;
                        entries.push((key, value));
                    }
                    self.expect_token(
                        &Token::RBrace(self.current_location()),
                        "Expected '}' after dict display",
                    )?;
                    Ok(Expr::DictDisplay {
                        entries,
                        location: loc,
                    })
                } else {
                    let mut items = vec![first];
                    while self.match_token(&Token::Comma(self.current_location())) {
                        if self.check(&Token::RBrace(loc)) {
                            break;
                        }
                        items.push(self.parse_expression()?);
                    }
                    self.expect_token(
                        &Token::RBrace(self.current_location()),
                        "Expected '}' after set display",
                    )?;
                    Ok(Expr::SetDisplay {
                        items,
                        location: loc,
                    })
                }
            }
            other => Err(ParseError {
                message: format!("Unexpected token in expression: {}", other),
                location: loc,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parser::Parser;

    fn parse_expr(source: &str) -> Expr {
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();
        match program.body.into_iter().next().unwrap() {
            Stmt::ExprStatement { expr, .. } => expr,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence_mul_over_add() {
        match parse_expr("1 + 2 * 3\n") {
            Expr::BinaryOp { op: BinOp::Add, right, .. } => {
                assert!(matches!(*right, Expr::BinaryOp { op: BinOp::Mul, .. }));
            }
            other => panic!("Expected add at root, got {:?}", other),
        }
    }

    #[test]
    fn test_power_right_associative() {
        match parse_expr("2 ** 3 ** 2\n") {
            Expr::BinaryOp { op: BinOp::Pow, right, .. } => {
                assert!(matches!(*right, Expr::BinaryOp { op: BinOp::Pow, .. }));
            }
            other => panic!("Expected power at root, got {:?}", other),
        }
    }

    #[test]
    fn test_not_in() {
        assert!(matches!(
            parse_expr("1 not in [1, 2]\n"),
            Expr::BinaryOp { op: BinOp::NotIn, .. }
        ));
    }

    #[test]
    fn test_call_and_attribute_chain() {
        match parse_expr("items.append(4)\n") {
            Expr::Call { callee, args, .. } => {
                assert_eq!(args.len(), 1);
                assert!(matches!(*callee, Expr::Attribute { ref name, .. } if name == "append"));
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_dict_and_set_displays() {
        assert!(matches!(
            parse_expr("{'a': 1, 'b': 2}\n"),
            Expr::DictDisplay { ref entries, .. } if entries.len() == 2
        ));
        assert!(matches!(
            parse_expr("{1, 2, 3}\n"),
            Expr::SetDisplay { ref items, .. } if items.len() == 3
        ));
        assert!(matches!(
            parse_expr("{}\n"),
            Expr::DictDisplay { ref entries, .. } if entries.is_empty()
        ));
    }
}
