//! Lexer, abstract syntax tree and parser of the Lox language.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;
