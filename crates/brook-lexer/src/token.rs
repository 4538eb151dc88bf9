//! Token kinds and the `Token` type produced by the lexer.

use brook_common::{Position, Span};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    Integer,
    Float,
    Rational,
    String,
    Char,
    Bool,
    Identifier,

    // Keywords
    If,
    Else,
    While,
    Return,
    Var,
    Const,
    Fn,
    Struct,
    Interface,
    Impl,
    Arr,
    Vec,

    // Punctuation — digraphs
    EqualsEquals,
    BangEquals,
    LessEquals,
    GreaterEquals,

    // Punctuation — monographs
    Equals,
    Star,
    Slash,
    Plus,
    Minus,
    Bang,
    Less,
    Greater,
    Semicolon,
    Comma,
    Dot,
    Colon,
    LeftParen,
    RightParen,
    LeftCurly,
    RightCurly,
    LeftSquare,
    RightSquare,

    /// Automatically inserted at end-of-line following a
    /// terminator-candidate token. Carries no lexeme of its own.
    SyntheticSemicolon,

    Eof,
}

impl TokenKind {
    /// The closed keyword set. `KEYWORDS.get(word)` is how the lexer
    /// distinguishes an identifier from a keyword.
    pub const KEYWORDS: &'static [(&'static str, TokenKind)] = &[
        ("true", TokenKind::Bool),
        ("false", TokenKind::Bool),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("while", TokenKind::While),
        ("return", TokenKind::Return),
        ("var", TokenKind::Var),
        ("const", TokenKind::Const),
        ("fn", TokenKind::Fn),
        ("struct", TokenKind::Struct),
        ("interface", TokenKind::Interface),
        ("impl", TokenKind::Impl),
        ("arr", TokenKind::Arr),
        ("vec", TokenKind::Vec),
    ];

    pub fn keyword(word: &str) -> Option<TokenKind> {
        Self::KEYWORDS
            .iter()
            .find(|(kw, _)| *kw == word)
            .map(|(_, kind)| *kind)
    }

    /// A token of this kind at end-of-line triggers synthetic
    /// semicolon insertion.
    pub fn is_terminator_candidate(self) -> bool {
        matches!(
            self,
            TokenKind::Integer
                | TokenKind::Float
                | TokenKind::Rational
                | TokenKind::String
                | TokenKind::Char
                | TokenKind::Bool
                | TokenKind::Identifier
                | TokenKind::Return
                | TokenKind::RightParen
                | TokenKind::RightCurly
                | TokenKind::RightSquare
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span, position: Position) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            span,
            position,
        }
    }
}
