//! Lexer and parser for the placeholder template language

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::{Directive, Template};
pub use grammar::parse;
