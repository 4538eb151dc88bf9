//! Lexer for the Brook language: converts source text into a token stream,
//! tracking positions and inserting automatic statement terminators.

pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};
