//! Parsing pipeline for the teaching language
//!
//! - [`lexer`]: indentation-aware tokenizer
//! - [`ast`]: syntax tree definitions
//! - [`parser`]: recursive descent parser (statements and expressions live in
//!   sibling modules as `impl Parser` blocks)

pub mod ast;
pub mod expressions;
pub mod lexer;
pub mod parser;
pub mod statements;
