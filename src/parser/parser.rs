//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing
//! infrastructure: the error type, token-stream helpers, and the
//! program-level entry point.
//!
//! # Parser Architecture
//!
//! Recursive descent over the token stream produced by the lexer:
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: statement and block (suite) parsing
//! - `expressions`: expression parsing with precedence climbing
//!
//! Parser methods are split across files using `impl Parser` blocks, so each
//! module extends the Parser with related functionality while sharing the
//! parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use std::fmt;

/// Parser error type
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Syntax error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for the teaching language
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the entire program (a sequence of statements)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            // Tolerate stray layout tokens between top-level statements
            if self.match_token(&Token::Newline(self.current_location())) {
                continue;
            }
            let stmt = self.parse_statement()?;
            program.body.push(stmt);
        }

        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if std::mem::discriminant(&self.peek_token()) == std::mem::discriminant(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(&self.peek_token()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_token(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position - 1]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                message: format!("{}, found {}", message, self.peek()),
                location: self.current_location(),
            })
        }
    }

    pub(crate) fn expect_newline(&mut self, ctx: &str) -> Result<(), ParseError> {
        // EOF closes the last logical line as well
        if self.is_at_end() {
            return Ok(());
        }
        self.expect_token(
            &Token::Newline(self.current_location()),
            &format!("Expected end of line {ctx}"),
        )
    }

    pub(crate) fn expect_colon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::Colon(self.current_location()),
            &format!("Expected ':' {ctx}"),
        )
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError {
                message: format!("Expected identifier, found {}", self.peek()),
                location: self.current_location(),
            })
        }
    }

    /// Parse a possibly dotted module path ("math", "matplotlib.pyplot")
    pub(crate) fn expect_module_path(&mut self) -> Result<String, ParseError> {
        let mut path = self.expect_identifier()?;
        while self.match_token(&Token::Dot(self.current_location())) {
            path.push('.');
            path.push_str(&self.expect_identifier()?);
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let mut parser = Parser::new("x = 1 + 2\n").unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Stmt::Assign { target, .. } => {
                assert!(matches!(target, Expr::Name(n, _) if n == "x"));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_if_elif_else() {
        let source = "if x > 0:\n    y = 1\nelif x < 0:\n    y = 2\nelse:\n    y = 3\n";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Stmt::If {
                branches,
                else_body,
                ..
            } => {
                assert_eq!(branches.len(), 2);
                assert!(else_body.is_some());
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_def() {
        let source = "def add(a, b):\n    return a + b\n";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        match &program.body[0] {
            Stmt::FunctionDef { name, params, body, .. } => {
                assert_eq!(name, "add");
                assert_eq!(params, &["a".to_string(), "b".to_string()]);
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected function def, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_inline_suite() {
        let mut parser = Parser::new("while True: x = 1\n").unwrap();
        let program = parser.parse_program().unwrap();

        match &program.body[0] {
            Stmt::While { body, .. } => assert_eq!(body.len(), 1),
            other => panic!("Expected while statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_import_forms() {
        let source = "import math\nfrom math import pi, e\n";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert!(matches!(&program.body[0], Stmt::Import { module, .. } if module == "math"));
        match &program.body[1] {
            Stmt::ImportFrom { module, names, .. } => {
                assert_eq!(module, "math");
                assert_eq!(names, &["pi".to_string(), "e".to_string()]);
            }
            other => panic!("Expected from-import, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = Parser::new("x = (1 +\n")
            .and_then(|mut p| p.parse_program())
            .unwrap_err();
        assert!(err.location.line >= 1);
    }

    #[test]
    fn test_invalid_assignment_target() {
        let mut parser = Parser::new("1 = x\n").unwrap();
        assert!(parser.parse_program().is_err());
    }
}
