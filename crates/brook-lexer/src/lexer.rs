//! Converts source text into a token stream.
//!
//! The lexer is a single forward pass over the bytes of the input. It
//! tracks line/column as it goes rather than building a `LineMap` after the
//! fact, since every byte is visited here exactly once anyway.

use crate::token::{Token, TokenKind};
use brook_common::{Diagnostic, ErrorSink, Position, Span};

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: u32,
    col: u32,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src: src.as_bytes(),
            pos: 0,
            line: 0,
            col: 0,
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(source: &'a str, sink: &mut dyn ErrorSink) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        lexer.run(sink);
        lexer.tokens
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(byte)
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    fn run(&mut self, sink: &mut dyn ErrorSink) {
        loop {
            let at_line_end = matches!(self.peek(), Some(b'\n'));
            if at_line_end {
                self.maybe_insert_terminator();
                self.advance();
                continue;
            }
            let Some(byte) = self.peek() else {
                self.maybe_insert_terminator();
                break;
            };
            if byte.is_ascii_whitespace() {
                self.advance();
                continue;
            }
            if byte == b'_' || byte.is_ascii_alphabetic() {
                self.lex_word();
                continue;
            }
            if byte.is_ascii_digit() {
                self.lex_number();
                continue;
            }
            if byte == b'"' {
                self.lex_string(sink);
                continue;
            }
            if byte == b'\'' {
                self.lex_char(sink);
                continue;
            }
            self.lex_punct(sink);
        }
        self.tokens.push(Token::new(
            TokenKind::Eof,
            "",
            Span::at(self.pos as u32),
            self.position(),
        ));
    }

    /// The automatic-terminator rule: if the previous real token is in the
    /// terminator-candidate set, an end-of-line synthesizes a statement
    /// terminator.
    fn maybe_insert_terminator(&mut self) {
        let should_insert = self
            .tokens
            .last()
            .is_some_and(|t| t.kind.is_terminator_candidate());
        if should_insert {
            let pos = self.position();
            self.tokens.push(Token::new(
                TokenKind::SyntheticSemicolon,
                "",
                Span::at(self.pos as u32),
                pos,
            ));
        }
    }

    fn lex_word(&mut self) {
        let start = self.pos;
        let start_span = self.pos as u32;
        let start_pos = self.position();
        while self
            .peek()
            .is_some_and(|b| b == b'_' || b.is_ascii_alphanumeric())
        {
            self.advance();
        }
        let lexeme = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or("");
        let kind = TokenKind::keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.tokens.push(Token::new(
            kind,
            lexeme,
            Span::new(start_span, self.pos as u32),
            start_pos,
        ));
    }

    fn lex_number(&mut self) {
        let start = self.pos;
        let start_span = self.pos as u32;
        let start_pos = self.position();
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
        let mut kind = TokenKind::Integer;
        if self.peek() == Some(b'/') && self.peek_at(1) == Some(b'/') {
            self.advance();
            self.advance();
            kind = TokenKind::Rational;
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.advance();
            }
        } else if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
            kind = TokenKind::Float;
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.advance();
            }
        }
        let lexeme = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or("");
        self.tokens.push(Token::new(
            kind,
            lexeme,
            Span::new(start_span, self.pos as u32),
            start_pos,
        ));
    }

    fn lex_string(&mut self, sink: &mut dyn ErrorSink) {
        let start = self.pos;
        let start_span = self.pos as u32;
        let start_pos = self.position();
        self.advance(); // opening quote
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    sink.report(Diagnostic::lex(
                        Span::new(start_span, self.pos as u32),
                        "unterminated string literal",
                    ));
                    break;
                }
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(b'\\') => {
                    self.advance();
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        let lexeme = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or("");
        self.tokens.push(Token::new(
            TokenKind::String,
            lexeme,
            Span::new(start_span, self.pos as u32),
            start_pos,
        ));
    }

    fn lex_char(&mut self, sink: &mut dyn ErrorSink) {
        let start = self.pos;
        let start_span = self.pos as u32;
        let start_pos = self.position();
        self.advance(); // opening quote
        if self.peek() == Some(b'\\') {
            self.advance();
        }
        self.advance();
        if self.peek() == Some(b'\'') {
            self.advance();
        } else {
            sink.report(Diagnostic::lex(
                Span::new(start_span, self.pos as u32),
                "unterminated char literal",
            ));
        }
        let lexeme = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or("");
        self.tokens.push(Token::new(
            TokenKind::Char,
            lexeme,
            Span::new(start_span, self.pos as u32),
            start_pos,
        ));
    }

    fn lex_punct(&mut self, sink: &mut dyn ErrorSink) {
        let start_span = self.pos as u32;
        let start_pos = self.position();
        let first = self.advance().expect("caller checked peek()");
        let second = self.peek();

        let (kind, consumed_second) = match (first, second) {
            (b'=', Some(b'=')) => (TokenKind::EqualsEquals, true),
            (b'!', Some(b'=')) => (TokenKind::BangEquals, true),
            (b'<', Some(b'=')) => (TokenKind::LessEquals, true),
            (b'>', Some(b'=')) => (TokenKind::GreaterEquals, true),
            (b'=', _) => (TokenKind::Equals, false),
            (b'*', _) => (TokenKind::Star, false),
            (b'/', Some(b'/')) => {
                // A bare `//` outside a number literal has no meaning; treat
                // as a lex error rather than silently emitting two slashes.
                self.advance();
                sink.report(Diagnostic::lex(
                    Span::new(start_span, self.pos as u32),
                    "unexpected '//' outside a rational literal",
                ));
                self.tokens.push(Token::new(
                    TokenKind::Slash,
                    "/",
                    Span::new(start_span, start_span + 1),
                    start_pos,
                ));
                return;
            }
            (b'/', _) => (TokenKind::Slash, false),
            (b'+', _) => (TokenKind::Plus, false),
            (b'-', _) => (TokenKind::Minus, false),
            (b'!', _) => (TokenKind::Bang, false),
            (b'<', _) => (TokenKind::Less, false),
            (b'>', _) => (TokenKind::Greater, false),
            (b';', _) => (TokenKind::Semicolon, false),
            (b',', _) => (TokenKind::Comma, false),
            (b'.', _) => (TokenKind::Dot, false),
            (b':', _) => (TokenKind::Colon, false),
            (b'(', _) => (TokenKind::LeftParen, false),
            (b')', _) => (TokenKind::RightParen, false),
            (b'{', _) => (TokenKind::LeftCurly, false),
            (b'}', _) => (TokenKind::RightCurly, false),
            (b'[', _) => (TokenKind::LeftSquare, false),
            (b']', _) => (TokenKind::RightSquare, false),
            (other, _) => {
                sink.report(Diagnostic::lex(
                    Span::new(start_span, self.pos as u32),
                    format!("unexpected character '{}'", other as char),
                ));
                return;
            }
        };
        if consumed_second {
            self.advance();
        }
        let lexeme = std::str::from_utf8(&self.src[start_span as usize..self.pos]).unwrap_or("");
        self.tokens.push(Token::new(
            kind,
            lexeme,
            Span::new(start_span, self.pos as u32),
            start_pos,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_common::VecSink;

    fn tokenize(src: &str) -> Vec<Token> {
        let mut sink = VecSink::new();
        Lexer::tokenize(src, &mut sink)
    }

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        assert_eq!(
            kinds("var x"),
            vec![TokenKind::Var, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_numeric_literals() {
        assert_eq!(kinds("1").first(), Some(&TokenKind::Integer));
        assert_eq!(kinds("1.5").first(), Some(&TokenKind::Float));
        assert_eq!(kinds("1//2").first(), Some(&TokenKind::Rational));
    }

    #[test]
    fn inserts_synthetic_terminator_after_candidate_tokens() {
        let ks = kinds("var x = 1\nvar y = 2");
        assert!(ks.contains(&TokenKind::SyntheticSemicolon));
    }

    #[test]
    fn does_not_insert_terminator_after_non_candidate_tokens() {
        // A line ending right after an operator should not synthesize ';'.
        let ks = kinds("1 +\n2");
        let plus_idx = ks.iter().position(|k| *k == TokenKind::Plus).unwrap();
        assert_ne!(ks.get(plus_idx + 1), Some(&TokenKind::SyntheticSemicolon));
    }

    #[test]
    fn reports_unterminated_string() {
        let mut sink = VecSink::new();
        Lexer::tokenize("\"abc", &mut sink);
        assert!(!sink.is_empty());
    }

    #[test]
    fn reports_unexpected_character() {
        let mut sink = VecSink::new();
        Lexer::tokenize("@", &mut sink);
        assert!(!sink.is_empty());
    }

    #[test]
    fn lexes_digraph_operators() {
        assert_eq!(
            kinds("a == b"),
            vec![
                TokenKind::Identifier,
                TokenKind::EqualsEquals,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }
}
