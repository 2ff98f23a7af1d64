//! Lexer (tokenizer) for the teaching language
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! parser. Blocks are indentation-delimited, so the lexer tracks an indent
//! stack and emits synthetic [`Token::Indent`]/[`Token::Dedent`] tokens at
//! block boundaries, plus [`Token::Newline`] at the end of each logical line.
//! Newlines inside parentheses, brackets, or braces are implicit line joins
//! and produce no token.

use super::ast::SourceLocation;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i64, SourceLocation),
    FloatLiteral(f64, SourceLocation),
    StringLiteral(String, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Keywords
    Def(SourceLocation),
    Class(SourceLocation),
    Return(SourceLocation),
    If(SourceLocation),
    Elif(SourceLocation),
    Else(SourceLocation),
    While(SourceLocation),
    For(SourceLocation),
    In(SourceLocation),
    And(SourceLocation),
    Or(SourceLocation),
    Not(SourceLocation),
    Break(SourceLocation),
    Continue(SourceLocation),
    Pass(SourceLocation),
    Import(SourceLocation),
    From(SourceLocation),
    Del(SourceLocation),
    Global(SourceLocation),
    Nonlocal(SourceLocation),
    True(SourceLocation),
    False(SourceLocation),
    None(SourceLocation),

    // Operators
    Plus(SourceLocation),         // +
    Minus(SourceLocation),        // -
    Star(SourceLocation),         // *
    StarStar(SourceLocation),     // **
    Slash(SourceLocation),        // /
    SlashSlash(SourceLocation),   // //
    Percent(SourceLocation),      // %
    EqEq(SourceLocation),         // ==
    NotEq(SourceLocation),        // !=
    Lt(SourceLocation),           // <
    Le(SourceLocation),           // <=
    Gt(SourceLocation),           // >
    Ge(SourceLocation),           // >=
    Eq(SourceLocation),           // =
    PlusEq(SourceLocation),       // +=
    MinusEq(SourceLocation),      // -=
    StarEq(SourceLocation),       // *=
    SlashEq(SourceLocation),      // /=
    SlashSlashEq(SourceLocation), // //=
    PercentEq(SourceLocation),    // %=

    // Punctuation
    LParen(SourceLocation),   // (
    RParen(SourceLocation),   // )
    LBracket(SourceLocation), // [
    RBracket(SourceLocation), // ]
    LBrace(SourceLocation),   // {
    RBrace(SourceLocation),   // }
    Comma(SourceLocation),    // ,
    Colon(SourceLocation),    // :
    Dot(SourceLocation),      // .

    // Layout
    Newline(SourceLocation),
    Indent(SourceLocation),
    Dedent(SourceLocation),

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc)
            | Token::FloatLiteral(_, loc)
            | Token::StringLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Def(loc)
            | Token::Class(loc)
            | Token::Return(loc)
            | Token::If(loc)
            | Token::Elif(loc)
            | Token::Else(loc)
            | Token::While(loc)
            | Token::For(loc)
            | Token::In(loc)
            | Token::And(loc)
            | Token::Or(loc)
            | Token::Not(loc)
            | Token::Break(loc)
            | Token::Continue(loc)
            | Token::Pass(loc)
            | Token::Import(loc)
            | Token::From(loc)
            | Token::Del(loc)
            | Token::Global(loc)
            | Token::Nonlocal(loc)
            | Token::True(loc)
            | Token::False(loc)
            | Token::None(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::StarStar(loc)
            | Token::Slash(loc)
            | Token::SlashSlash(loc)
            | Token::Percent(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::Eq(loc)
            | Token::PlusEq(loc)
            | Token::MinusEq(loc)
            | Token::StarEq(loc)
            | Token::SlashEq(loc)
            | Token::SlashSlashEq(loc)
            | Token::PercentEq(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::Comma(loc)
            | Token::Colon(loc)
            | Token::Dot(loc)
            | Token::Newline(loc)
            | Token::Indent(loc)
            | Token::Dedent(loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "int literal {}", n),
            Token::FloatLiteral(x, _) => write!(f, "float literal {}", x),
            Token::StringLiteral(s, _) => write!(f, "string literal \"{}\"", s),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Def(_) => write!(f, "'def'"),
            Token::Class(_) => write!(f, "'class'"),
            Token::Return(_) => write!(f, "'return'"),
            Token::If(_) => write!(f, "'if'"),
            Token::Elif(_) => write!(f, "'elif'"),
            Token::Else(_) => write!(f, "'else'"),
            Token::While(_) => write!(f, "'while'"),
            Token::For(_) => write!(f, "'for'"),
            Token::In(_) => write!(f, "'in'"),
            Token::And(_) => write!(f, "'and'"),
            Token::Or(_) => write!(f, "'or'"),
            Token::Not(_) => write!(f, "'not'"),
            Token::Break(_) => write!(f, "'break'"),
            Token::Continue(_) => write!(f, "'continue'"),
            Token::Pass(_) => write!(f, "'pass'"),
            Token::Import(_) => write!(f, "'import'"),
            Token::From(_) => write!(f, "'from'"),
            Token::Del(_) => write!(f, "'del'"),
            Token::Global(_) => write!(f, "'global'"),
            Token::Nonlocal(_) => write!(f, "'nonlocal'"),
            Token::True(_) => write!(f, "'True'"),
            Token::False(_) => write!(f, "'False'"),
            Token::None(_) => write!(f, "'None'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::StarStar(_) => write!(f, "'**'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::SlashSlash(_) => write!(f, "'//'"),
            Token::Percent(_) => write!(f, "'%'"),
            Token::EqEq(_) => write!(f, "'=='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::Eq(_) => write!(f, "'='"),
            Token::PlusEq(_) => write!(f, "'+='"),
            Token::MinusEq(_) => write!(f, "'-='"),
            Token::StarEq(_) => write!(f, "'*='"),
            Token::SlashEq(_) => write!(f, "'/='"),
            Token::SlashSlashEq(_) => write!(f, "'//='"),
            Token::PercentEq(_) => write!(f, "'%='"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Colon(_) => write!(f, "':'"),
            Token::Dot(_) => write!(f, "'.'"),
            Token::Newline(_) => write!(f, "newline"),
            Token::Indent(_) => write!(f, "indent"),
            Token::Dedent(_) => write!(f, "dedent"),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer error type
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Indentation-aware lexer
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    indents: Vec<usize>,
    bracket_depth: usize,
    at_line_start: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            indents: vec![0],
            bracket_depth: 0,
            at_line_start: true,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            if self.at_line_start && self.bracket_depth == 0 {
                self.handle_indentation(&mut tokens)?;
                if self.is_at_end() {
                    break;
                }
                continue;
            }

            self.skip_inline_whitespace();

            match self.peek() {
                Option::None => {
                    // Input ended mid-line: close the logical line first
                    tokens.push(Token::Newline(self.current_location()));
                    self.at_line_start = true;
                    break;
                }
                Some('#') => {
                    self.skip_to_line_end();
                }
                Some('\n') => {
                    self.advance();
                    if self.bracket_depth == 0 {
                        tokens.push(Token::Newline(SourceLocation::new(
                            self.line - 1,
                            self.column,
                        )));
                        self.at_line_start = true;
                    }
                }
                Some(_) => {
                    tokens.push(self.next_token()?);
                }
            }

            if self.is_at_end() && !self.at_line_start {
                tokens.push(Token::Newline(self.current_location()));
                self.at_line_start = true;
                break;
            }
        }

        // Close any open blocks before EOF
        while self.indents.len() > 1 {
            self.indents.pop();
            tokens.push(Token::Dedent(self.current_location()));
        }
        tokens.push(Token::Eof(self.current_location()));

        Ok(tokens)
    }

    /// Measure the indentation of the next logical line, emitting
    /// Indent/Dedent tokens as the indent stack changes. Blank lines and
    /// comment-only lines are consumed without producing any token.
    fn handle_indentation(&mut self, tokens: &mut Vec<Token>) -> Result<(), LexError> {
        loop {
            let mut width = 0;
            loop {
                match self.peek() {
                    Some(' ') => {
                        width += 1;
                        self.advance();
                    }
                    Some('\t') => {
                        // Tabs advance to the next multiple of 8, as in CPython
                        width = (width / 8 + 1) * 8;
                        self.advance();
                    }
                    _ => break,
                }
            }

            match self.peek() {
                Option::None => {
                    return Ok(());
                }
                Some('\n') => {
                    self.advance();
                    continue; // blank line
                }
                Some('#') => {
                    self.skip_to_line_end();
                    if self.peek() == Some('\n') {
                        self.advance();
                    }
                    continue; // comment-only line
                }
                Some(_) => {
                    let current = *self.indents.last().unwrap_or(&0);
                    if width > current {
                        self.indents.push(width);
                        tokens.push(Token::Indent(self.current_location()));
                    } else if width < current {
                        while *self.indents.last().unwrap_or(&0) > width {
                            self.indents.pop();
                            tokens.push(Token::Dedent(self.current_location()));
                        }
                        if *self.indents.last().unwrap_or(&0) != width {
                            return Err(LexError {
                                message: "unindent does not match any outer indentation level"
                                    .to_string(),
                                location: self.current_location(),
                            });
                        }
                    }
                    self.at_line_start = false;
                    return Ok(());
                }
            }
        }
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            // String literals
            '"' | '\'' => self.string_literal(ch, loc),

            // Numeric literals
            '0'..='9' => self.number_literal(ch, loc),

            // Identifiers and keywords
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(ch, loc),

            '+' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::PlusEq(loc))
                } else {
                    Ok(Token::Plus(loc))
                }
            }
            '-' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::MinusEq(loc))
                } else {
                    Ok(Token::Minus(loc))
                }
            }
            '*' => {
                if self.peek() == Some('*') {
                    self.advance();
                    Ok(Token::StarStar(loc))
                } else if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::StarEq(loc))
                } else {
                    Ok(Token::Star(loc))
                }
            }
            '/' => {
                if self.peek() == Some('/') {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        Ok(Token::SlashSlashEq(loc))
                    } else {
                        Ok(Token::SlashSlash(loc))
                    }
                } else if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::SlashEq(loc))
                } else {
                    Ok(Token::Slash(loc))
                }
            }
            '%' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::PercentEq(loc))
                } else {
                    Ok(Token::Percent(loc))
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::EqEq(loc))
                } else {
                    Ok(Token::Eq(loc))
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::NotEq(loc))
                } else {
                    Err(LexError {
                        message: "Unexpected character: '!'".to_string(),
                        location: loc,
                    })
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::Le(loc))
                } else {
                    Ok(Token::Lt(loc))
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::Ge(loc))
                } else {
                    Ok(Token::Gt(loc))
                }
            }
            '(' => {
                self.bracket_depth += 1;
                Ok(Token::LParen(loc))
            }
            ')' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                Ok(Token::RParen(loc))
            }
            '[' => {
                self.bracket_depth += 1;
                Ok(Token::LBracket(loc))
            }
            ']' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                Ok(Token::RBracket(loc))
            }
            '{' => {
                self.bracket_depth += 1;
                Ok(Token::LBrace(loc))
            }
            '}' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                Ok(Token::RBrace(loc))
            }
            ',' => Ok(Token::Comma(loc)),
            ':' => Ok(Token::Colon(loc)),
            '.' => Ok(Token::Dot(loc)),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse string literal (single or double quoted)
    fn string_literal(&mut self, quote: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == quote {
                self.advance();
                return Ok(Token::StringLiteral(string, loc));
            }
            if ch == '\n' {
                break;
            }

            if ch == '\\' {
                self.advance();
                let escaped = self.advance().ok_or_else(|| LexError {
                    message: "Unexpected end of file in string literal".to_string(),
                    location: self.current_location(),
                })?;

                let unescaped = match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '\'' => '\'',
                    '"' => '"',
                    '0' => '\0',
                    _ => {
                        return Err(LexError {
                            message: format!("Unknown escape sequence: \\{}", escaped),
                            location: self.current_location(),
                        });
                    }
                };
                string.push(unescaped);
            } else {
                string.push(ch);
                self.advance();
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Parse numeric literal (integer or float)
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Fractional part; a trailing '.' followed by a non-digit is a float
        // too ("2." is valid), but ".method" on a literal is not supported.
        let mut is_float = false;
        if self.peek() == Some('.') {
            if let Some(next) = self.peek_ahead(1) {
                if next.is_ascii_digit() {
                    is_float = true;
                    num_str.push('.');
                    self.advance();
                    while let Some(ch) = self.peek() {
                        if ch.is_ascii_digit() {
                            num_str.push(ch);
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
            }
        }

        if is_float {
            let value = num_str.parse::<f64>().map_err(|_| LexError {
                message: format!("Invalid float literal: {}", num_str),
                location: loc,
            })?;
            Ok(Token::FloatLiteral(value, loc))
        } else {
            let value = num_str.parse::<i64>().map_err(|_| LexError {
                message: format!("Invalid integer literal: {}", num_str),
                location: loc,
            })?;
            Ok(Token::IntLiteral(value, loc))
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let token = match ident.as_str() {
            "def" => Token::Def(loc),
            "class" => Token::Class(loc),
            "return" => Token::Return(loc),
            "if" => Token::If(loc),
            "elif" => Token::Elif(loc),
            "else" => Token::Else(loc),
            "while" => Token::While(loc),
            "for" => Token::For(loc),
            "in" => Token::In(loc),
            "and" => Token::And(loc),
            "or" => Token::Or(loc),
            "not" => Token::Not(loc),
            "break" => Token::Break(loc),
            "continue" => Token::Continue(loc),
            "pass" => Token::Pass(loc),
            "import" => Token::Import(loc),
            "from" => Token::From(loc),
            "del" => Token::Del(loc),
            "global" => Token::Global(loc),
            "nonlocal" => Token::Nonlocal(loc),
            "True" => Token::True(loc),
            "False" => Token::False(loc),
            "None" => Token::None(loc),
            _ => Token::Ident(ident, loc),
        };

        Ok(token)
    }

    /// Skip spaces and tabs within a line (not newlines)
    fn skip_inline_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip to the end of the current line without consuming the newline
    fn skip_to_line_end(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("x = 1 + 2\n");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[1], Token::Eq(_)));
        assert!(matches!(tokens[2], Token::IntLiteral(1, _)));
        assert!(matches!(tokens[3], Token::Plus(_)));
        assert!(matches!(tokens[4], Token::IntLiteral(2, _)));
        assert!(matches!(tokens[5], Token::Newline(_)));
        assert!(matches!(tokens[6], Token::Eof(_)));
    }

    #[test]
    fn test_indent_dedent() {
        let mut lexer = Lexer::new("if x:\n    y = 1\nz = 2\n");
        let tokens = lexer.tokenize().unwrap();

        let indents = tokens
            .iter()
            .filter(|t| matches!(t, Token::Indent(_)))
            .count();
        let dedents = tokens
            .iter()
            .filter(|t| matches!(t, Token::Dedent(_)))
            .count();
        assert_eq!(indents, 1);
        assert_eq!(dedents, 1);
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        let mut lexer = Lexer::new("x = 1\n\n# comment\ny = 2\n");
        let tokens = lexer.tokenize().unwrap();

        // No Indent/Dedent, exactly two logical lines
        let newlines = tokens
            .iter()
            .filter(|t| matches!(t, Token::Newline(_)))
            .count();
        assert_eq!(newlines, 2);
        assert!(!tokens.iter().any(|t| matches!(t, Token::Indent(_))));
    }

    #[test]
    fn test_dedent_at_eof() {
        let mut lexer = Lexer::new("while True:\n    x = 1");
        let tokens = lexer.tokenize().unwrap();

        assert!(tokens.iter().any(|t| matches!(t, Token::Dedent(_))));
        assert!(matches!(tokens.last(), Some(Token::Eof(_))));
    }

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("a // b ** c != d <= e\n");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[1], Token::SlashSlash(_)));
        assert!(matches!(tokens[3], Token::StarStar(_)));
        assert!(matches!(tokens[5], Token::NotEq(_)));
        assert!(matches!(tokens[7], Token::Le(_)));
    }

    #[test]
    fn test_string_literals() {
        let mut lexer = Lexer::new("s = 'a\\nb'\nt = \"c\"\n");
        let tokens = lexer.tokenize().unwrap();

        match &tokens[2] {
            Token::StringLiteral(s, _) => assert_eq!(s, "a\nb"),
            other => panic!("Expected string literal, got {}", other),
        }
    }

    #[test]
    fn test_float_literal() {
        let mut lexer = Lexer::new("x = 3.14\n");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[2], Token::FloatLiteral(f, _) if (f - 3.14).abs() < 1e-9));
    }

    #[test]
    fn test_implicit_line_join_in_brackets() {
        let mut lexer = Lexer::new("x = [1,\n     2]\n");
        let tokens = lexer.tokenize().unwrap();

        let newlines = tokens
            .iter()
            .filter(|t| matches!(t, Token::Newline(_)))
            .count();
        assert_eq!(newlines, 1);
    }

    #[test]
    fn test_bad_dedent() {
        let mut lexer = Lexer::new("if x:\n    y = 1\n  z = 2\n");
        assert!(lexer.tokenize().is_err());
    }
}
