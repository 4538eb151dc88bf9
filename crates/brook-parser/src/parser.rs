//! Recursive-descent parser with Pratt-style precedence climbing for
//! expressions.

use crate::ast::*;
use brook_common::{Diagnostic, ErrorSink};
use brook_lexer::{Lexer, Token, TokenKind};

/// Keywords that begin a top-level declaration. Used both by the top-level
/// dispatcher and as resynchronization points after a parse error.
const DECLARATION_KEYWORDS: &[TokenKind] = &[
    TokenKind::Fn,
    TokenKind::Struct,
    TokenKind::Interface,
    TokenKind::Impl,
    TokenKind::Var,
    TokenKind::Const,
];

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    sink: &'a mut dyn ErrorSink,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, sink: &'a mut dyn ErrorSink) -> Self {
        Parser { tokens, pos: 0, sink }
    }

    pub fn parse_source(source: &str, sink: &'a mut dyn ErrorSink) -> Program {
        let mut lex_sink_passthrough = PassthroughSink(sink);
        let tokens = Lexer::tokenize(source, &mut lex_sink_passthrough);
        let mut parser = Parser {
            tokens,
            pos: 0,
            sink,
        };
        parser.parse_program()
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn at_eof(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Token {
        if self.check(kind) {
            self.advance()
        } else {
            let found = self.peek().clone();
            self.sink.report(Diagnostic::parse(
                found.span,
                format!("expected {what}, found '{}'", found.lexeme),
            ));
            found
        }
    }

    /// Skips any number of synthetic or explicit terminators.
    fn skip_terminators(&mut self) {
        while matches!(
            self.peek_kind(),
            TokenKind::Semicolon | TokenKind::SyntheticSemicolon
        ) {
            self.advance();
        }
    }

    fn expect_terminator(&mut self) {
        if matches!(
            self.peek_kind(),
            TokenKind::Semicolon | TokenKind::SyntheticSemicolon
        ) {
            self.advance();
        } else {
            let found = self.peek().clone();
            self.sink.report(Diagnostic::parse(
                found.span,
                "expected ';' to terminate statement",
            ));
        }
        self.skip_terminators();
    }

    /// Resynchronizes at the next top-level declaration keyword after a
    /// parse error, so later declarations still get checked.
    fn resync_to_declaration(&mut self) {
        while !self.at_eof() && !DECLARATION_KEYWORDS.contains(&self.peek_kind()) {
            self.advance();
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let start = self.peek().span;
        self.skip_terminators();
        let mut declarations = Vec::new();
        while !self.at_eof() {
            declarations.push(self.parse_declaration());
            self.skip_terminators();
        }
        let end = self.tokens.last().map(|t| t.span).unwrap_or(start);
        Program {
            declarations,
            span: start.merge(end),
        }
    }

    fn parse_declaration(&mut self) -> Declr {
        let result = match self.peek_kind() {
            TokenKind::Fn => Declr::Function(self.parse_function_declr()),
            TokenKind::Struct => Declr::Struct(self.parse_struct_declr()),
            TokenKind::Interface => Declr::Interface(self.parse_interface_declr()),
            TokenKind::Impl => Declr::Impl(self.parse_impl_declr()),
            TokenKind::Var => Declr::Variable(self.parse_variable_declr()),
            TokenKind::Const => Declr::Constant(self.parse_const_declr()),
            _ => {
                let found = self.peek().clone();
                self.sink.report(Diagnostic::parse(
                    found.span,
                    format!("expected a declaration, found '{}'", found.lexeme),
                ));
                self.resync_to_declaration();
                return Declr::Variable(VariableDeclr {
                    name: String::new(),
                    type_annotation: None,
                    value: None,
                    span: found.span,
                });
            }
        };
        result
    }

    fn parse_function_signature(&mut self) -> FunctionSignature {
        let start = self.expect(TokenKind::Fn, "'fn'").span;
        let name = self.expect(TokenKind::Identifier, "a function name").lexeme;
        self.expect(TokenKind::LeftParen, "'('");
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.parse_param());
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        let rparen = self.expect(TokenKind::RightParen, "')'").span;
        let return_type = if !self.check(TokenKind::LeftCurly) {
            Some(self.parse_type())
        } else {
            None
        };
        let end = return_type.as_ref().map(|t| t.span()).unwrap_or(rparen);
        FunctionSignature {
            name,
            params,
            return_type,
            span: start.merge(end),
        }
    }

    fn parse_param(&mut self) -> Param {
        let name_tok = self.expect(TokenKind::Identifier, "a parameter name");
        let type_annotation = if !matches!(self.peek_kind(), TokenKind::Comma | TokenKind::RightParen) {
            Some(self.parse_type())
        } else {
            None
        };
        let end = type_annotation.as_ref().map(|t| t.span()).unwrap_or(name_tok.span);
        Param {
            name: name_tok.lexeme,
            type_annotation,
            span: name_tok.span.merge(end),
        }
    }

    fn parse_function_declr(&mut self) -> FunctionDeclr {
        let signature = self.parse_function_signature();
        let body = self.parse_block();
        let span = signature.span.merge(body.span);
        FunctionDeclr { signature, body, span }
    }

    fn parse_struct_declr(&mut self) -> StructDeclr {
        let start = self.expect(TokenKind::Struct, "'struct'").span;
        let name = self.expect(TokenKind::Identifier, "a struct name").lexeme;
        self.expect(TokenKind::LeftCurly, "'{'");
        let mut fields = Vec::new();
        while !self.check(TokenKind::RightCurly) && !self.at_eof() {
            let field_start = self.peek().span;
            let field_name = self.expect(TokenKind::Identifier, "a field name").lexeme;
            let type_annotation = self.parse_type();
            self.expect_terminator();
            let span = field_start.merge(type_annotation.span());
            fields.push(FieldDeclr {
                name: field_name,
                type_annotation,
                span,
            });
        }
        let end = self.expect(TokenKind::RightCurly, "'}'").span;
        StructDeclr {
            name,
            fields,
            span: start.merge(end),
        }
    }

    fn parse_interface_declr(&mut self) -> InterfaceDeclr {
        let start = self.expect(TokenKind::Interface, "'interface'").span;
        let name = self.expect(TokenKind::Identifier, "an interface name").lexeme;
        self.expect(TokenKind::LeftCurly, "'{'");
        let mut methods = Vec::new();
        while !self.check(TokenKind::RightCurly) && !self.at_eof() {
            methods.push(self.parse_function_signature());
            self.expect_terminator();
        }
        let end = self.expect(TokenKind::RightCurly, "'}'").span;
        InterfaceDeclr {
            name,
            methods,
            span: start.merge(end),
        }
    }

    fn parse_impl_declr(&mut self) -> ImplDeclr {
        let start = self.expect(TokenKind::Impl, "'impl'").span;
        let type_name = self.expect(TokenKind::Identifier, "a type name").lexeme;
        let interface_name = if self.matches(TokenKind::Colon) {
            Some(self.expect(TokenKind::Identifier, "an interface name").lexeme)
        } else {
            None
        };
        self.expect(TokenKind::LeftCurly, "'{'");
        let mut methods = Vec::new();
        while !self.check(TokenKind::RightCurly) && !self.at_eof() {
            methods.push(self.parse_function_declr());
            self.skip_terminators();
        }
        let end = self.expect(TokenKind::RightCurly, "'}'").span;
        ImplDeclr {
            type_name,
            interface_name,
            methods,
            span: start.merge(end),
        }
    }

    fn parse_variable_declr(&mut self) -> VariableDeclr {
        let start = self.expect(TokenKind::Var, "'var'").span;
        let name = self.expect(TokenKind::Identifier, "a variable name").lexeme;
        let type_annotation = if !matches!(self.peek_kind(), TokenKind::Equals | TokenKind::Semicolon | TokenKind::SyntheticSemicolon) {
            Some(self.parse_type())
        } else {
            None
        };
        let value = if self.matches(TokenKind::Equals) {
            Some(self.parse_expr())
        } else {
            None
        };
        let end = self.peek().span;
        self.expect_terminator();
        VariableDeclr {
            name,
            type_annotation,
            value,
            span: start.merge(end),
        }
    }

    fn parse_const_declr(&mut self) -> ConstDeclr {
        let start = self.expect(TokenKind::Const, "'const'").span;
        let name = self.expect(TokenKind::Identifier, "a constant name").lexeme;
        let type_annotation = if !self.check(TokenKind::Equals) {
            Some(self.parse_type())
        } else {
            None
        };
        self.expect(TokenKind::Equals, "'='");
        let value = self.parse_expr();
        let end = value.span();
        self.expect_terminator();
        ConstDeclr {
            name,
            type_annotation,
            value,
            span: start.merge(end),
        }
    }

    // -- Types ---------------------------------------------------------

    fn parse_type(&mut self) -> TypeExpr {
        match self.peek_kind() {
            TokenKind::Arr => self.parse_array_type(),
            TokenKind::Vec => self.parse_vector_type(),
            TokenKind::Fn => self.parse_function_type(),
            _ => {
                let tok = self.expect(TokenKind::Identifier, "a type");
                TypeExpr::Named(NamedType {
                    name: tok.lexeme,
                    span: tok.span,
                })
            }
        }
    }

    fn parse_array_type(&mut self) -> TypeExpr {
        let start = self.expect(TokenKind::Arr, "'arr'").span;
        self.expect(TokenKind::LeftSquare, "'['");
        let element = Box::new(self.parse_type());
        let len = if self.matches(TokenKind::Comma) {
            let tok = self.expect(TokenKind::Integer, "an array length");
            tok.lexeme.parse().ok()
        } else {
            None
        };
        let end = self.expect(TokenKind::RightSquare, "']'").span;
        TypeExpr::Array(ArrayType {
            element,
            len,
            span: start.merge(end),
        })
    }

    fn parse_vector_type(&mut self) -> TypeExpr {
        let start = self.expect(TokenKind::Vec, "'vec'").span;
        self.expect(TokenKind::LeftSquare, "'['");
        let element = Box::new(self.parse_type());
        let end = self.expect(TokenKind::RightSquare, "']'").span;
        TypeExpr::Vector(VectorType {
            element,
            span: start.merge(end),
        })
    }

    fn parse_function_type(&mut self) -> TypeExpr {
        let start = self.expect(TokenKind::Fn, "'fn'").span;
        self.expect(TokenKind::LeftParen, "'('");
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.parse_type());
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        let rparen = self.expect(TokenKind::RightParen, "')'").span;
        let return_type = if !matches!(
            self.peek_kind(),
            TokenKind::Semicolon | TokenKind::SyntheticSemicolon | TokenKind::Comma | TokenKind::RightParen
        ) {
            Some(Box::new(self.parse_type()))
        } else {
            None
        };
        let end = return_type.as_ref().map(|t| t.span()).unwrap_or(rparen);
        TypeExpr::Function(FunctionType {
            params,
            return_type,
            span: start.merge(end),
        })
    }

    // -- Statements ------------------------------------------------------

    fn parse_block(&mut self) -> Block {
        let start = self.expect(TokenKind::LeftCurly, "'{'").span;
        self.skip_terminators();
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightCurly) && !self.at_eof() {
            statements.push(self.parse_stmt());
            self.skip_terminators();
        }
        let end = self.expect(TokenKind::RightCurly, "'}'").span;
        Block {
            statements,
            span: start.merge(end),
        }
    }

    fn parse_stmt(&mut self) -> Stmt {
        match self.peek_kind() {
            TokenKind::LeftCurly => Stmt::Block(self.parse_block()),
            TokenKind::If => Stmt::If(self.parse_if()),
            TokenKind::While => Stmt::While(self.parse_while()),
            TokenKind::Return => Stmt::Return(self.parse_return()),
            k if DECLARATION_KEYWORDS.contains(&k) => Stmt::Declr(self.parse_declaration()),
            _ => self.parse_expr_or_assignment_stmt(),
        }
    }

    fn parse_if(&mut self) -> IfStmt {
        let start = self.expect(TokenKind::If, "'if'").span;
        let condition = self.parse_expr();
        let then_branch = Box::new(self.parse_braced_or_single_stmt());
        let else_branch = if self.matches(TokenKind::Else) {
            Some(Box::new(self.parse_braced_or_single_stmt()))
        } else {
            None
        };
        let end = else_branch
            .as_ref()
            .map(|s| s.span())
            .unwrap_or_else(|| then_branch.span());
        IfStmt {
            condition,
            then_branch,
            else_branch,
            span: start.merge(end),
        }
    }

    fn parse_braced_or_single_stmt(&mut self) -> Stmt {
        if self.check(TokenKind::LeftCurly) {
            Stmt::Block(self.parse_block())
        } else {
            self.parse_stmt()
        }
    }

    fn parse_while(&mut self) -> WhileStmt {
        let start = self.expect(TokenKind::While, "'while'").span;
        let condition = self.parse_expr();
        let body = self.parse_block();
        let span = start.merge(body.span);
        WhileStmt { condition, body, span }
    }

    fn parse_return(&mut self) -> ReturnStmt {
        let start = self.expect(TokenKind::Return, "'return'").span;
        let value = if matches!(
            self.peek_kind(),
            TokenKind::Semicolon | TokenKind::SyntheticSemicolon
        ) {
            None
        } else {
            Some(self.parse_expr())
        };
        let end = value.as_ref().map(|v| v.span()).unwrap_or(start);
        self.expect_terminator();
        ReturnStmt { value, span: start.merge(end) }
    }

    fn parse_expr_or_assignment_stmt(&mut self) -> Stmt {
        let expr = self.parse_expr();
        if self.matches(TokenKind::Equals) {
            let value = self.parse_expr();
            let span = expr.span().merge(value.span());
            self.expect_terminator();
            Stmt::Assignment(AssignmentStmt {
                target: expr,
                value,
                span,
            })
        } else {
            self.expect_terminator();
            Stmt::Expr(expr)
        }
    }

    // -- Expressions (Pratt-style precedence climbing) --------------------

    pub fn parse_expr(&mut self) -> Expr {
        self.parse_binary(0)
    }

    fn binding_power(kind: TokenKind) -> Option<(u8, BinaryOp)> {
        Some(match kind {
            TokenKind::EqualsEquals => (1, BinaryOp::Eq),
            TokenKind::BangEquals => (1, BinaryOp::NotEq),
            TokenKind::Less => (1, BinaryOp::Less),
            TokenKind::Greater => (1, BinaryOp::Greater),
            TokenKind::LessEquals => (1, BinaryOp::LessEq),
            TokenKind::GreaterEquals => (1, BinaryOp::GreaterEq),
            TokenKind::Plus => (2, BinaryOp::Add),
            TokenKind::Minus => (2, BinaryOp::Sub),
            TokenKind::Star => (3, BinaryOp::Mul),
            TokenKind::Slash => (3, BinaryOp::Div),
            _ => return None,
        })
    }

    fn parse_binary(&mut self, min_bp: u8) -> Expr {
        let mut lhs = self.parse_unary();
        loop {
            let Some((bp, op)) = Self::binding_power(self.peek_kind()) else {
                break;
            };
            if bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_binary(bp + 1);
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary(BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            });
        }
        lhs
    }

    fn parse_unary(&mut self) -> Expr {
        let op = match self.peek_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.advance().span;
            let operand = Box::new(self.parse_unary());
            let span = start.merge(operand.span());
            return Expr::Unary(UnaryExpr { op, operand, span });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        loop {
            expr = match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let name_tok = self.expect(TokenKind::Identifier, "a field or method name");
                    let span = expr.span().merge(name_tok.span);
                    Expr::Selector(SelectorExpr {
                        base: Box::new(expr),
                        name: name_tok.lexeme,
                        span,
                    })
                }
                TokenKind::LeftParen => {
                    self.advance();
                    let mut args = Vec::new();
                    if !self.check(TokenKind::RightParen) {
                        loop {
                            args.push(self.parse_expr());
                            if !self.matches(TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    let end = self.expect(TokenKind::RightParen, "')'").span;
                    let span = expr.span().merge(end);
                    Expr::Call(CallExpr {
                        callee: Box::new(expr),
                        args,
                        span,
                    })
                }
                TokenKind::LeftSquare => {
                    self.advance();
                    let index = self.parse_expr();
                    let end = self.expect(TokenKind::RightSquare, "']'").span;
                    let span = expr.span().merge(end);
                    Expr::Index(IndexExpr {
                        base: Box::new(expr),
                        index: Box::new(index),
                        span,
                    })
                }
                _ => break,
            };
        }
        expr
    }

    fn parse_primary(&mut self) -> Expr {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Integer => {
                self.advance();
                let value = brook_common::parse_int_literal(&tok.lexeme).unwrap_or(0);
                Expr::Literal(LiteralExpr {
                    value: Literal::Integer(value),
                    span: tok.span,
                })
            }
            TokenKind::Float => {
                self.advance();
                let value = brook_common::parse_float_literal(&tok.lexeme).unwrap_or(0.0);
                Expr::Literal(LiteralExpr {
                    value: Literal::Float(value),
                    span: tok.span,
                })
            }
            TokenKind::Rational => {
                self.advance();
                let (n, d) = brook_common::parse_rational_literal(&tok.lexeme).unwrap_or((0, 1));
                Expr::Literal(LiteralExpr {
                    value: Literal::Rational(n, d),
                    span: tok.span,
                })
            }
            TokenKind::String => {
                self.advance();
                let unquoted = tok.lexeme.trim_matches('"').to_string();
                Expr::Literal(LiteralExpr {
                    value: Literal::Str(unquoted),
                    span: tok.span,
                })
            }
            TokenKind::Char => {
                self.advance();
                let ch = tok.lexeme.trim_matches('\'').chars().next().unwrap_or('\0');
                Expr::Literal(LiteralExpr {
                    value: Literal::Char(ch),
                    span: tok.span,
                })
            }
            TokenKind::Bool => {
                self.advance();
                Expr::Literal(LiteralExpr {
                    value: Literal::Bool(tok.lexeme == "true"),
                    span: tok.span,
                })
            }
            TokenKind::Identifier => {
                self.advance();
                Expr::Identifier(IdentifierExpr {
                    name: tok.lexeme,
                    span: tok.span,
                })
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expr();
                let end = self.expect(TokenKind::RightParen, "')'").span;
                Expr::Group(GroupExpr {
                    inner: Box::new(inner),
                    span: tok.span.merge(end),
                })
            }
            TokenKind::Arr | TokenKind::Vec => self.parse_typed_sequence(),
            TokenKind::LeftSquare => self.parse_bracket_expr(),
            _ => {
                self.sink.report(Diagnostic::parse(
                    tok.span,
                    format!("expected an expression, found '{}'", tok.lexeme),
                ));
                self.advance();
                Expr::Literal(LiteralExpr {
                    value: Literal::Integer(0),
                    span: tok.span,
                })
            }
        }
    }

    fn parse_typed_sequence(&mut self) -> Expr {
        let kind = if self.check(TokenKind::Arr) {
            SequenceKind::Array
        } else {
            SequenceKind::Vector
        };
        let start = self.advance().span;
        self.expect(TokenKind::LeftSquare, "'['");
        let element_type = Some(self.parse_type());
        self.expect(TokenKind::RightSquare, "']'");
        self.expect(TokenKind::LeftCurly, "'{'");
        let mut elements = Vec::new();
        if !self.check(TokenKind::RightCurly) {
            loop {
                elements.push(self.parse_expr());
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(TokenKind::RightCurly, "'}'").span;
        Expr::Sequence(SequenceExpr {
            kind,
            element_type,
            elements,
            span: start.merge(end),
        })
    }

    /// `[` here begins either a range `[a:b]` or an untyped sequence
    /// literal `[a, b, c]`; the disambiguation happens after parsing the
    /// first element.
    fn parse_bracket_expr(&mut self) -> Expr {
        let start = self.expect(TokenKind::LeftSquare, "'['").span;
        let first = self.parse_expr();
        if self.matches(TokenKind::Colon) {
            let end_expr = self.parse_expr();
            let end = self.expect(TokenKind::RightSquare, "']'").span;
            return Expr::Range(RangeExpr {
                start: Box::new(first),
                end: Box::new(end_expr),
                span: start.merge(end),
            });
        }
        let mut elements = vec![first];
        while self.matches(TokenKind::Comma) {
            if self.check(TokenKind::RightSquare) {
                break;
            }
            elements.push(self.parse_expr());
        }
        let end = self.expect(TokenKind::RightSquare, "']'").span;
        Expr::Sequence(SequenceExpr {
            kind: SequenceKind::Untyped,
            element_type: None,
            elements,
            span: start.merge(end),
        })
    }
}

/// Forwards lexer diagnostics through the parser's sink unchanged; kept as
/// a thin wrapper so `parse_source` can own the lexing step without
/// borrowing the sink twice.
struct PassthroughSink<'a>(&'a mut dyn ErrorSink);

impl<'a> ErrorSink for PassthroughSink<'a> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.0.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_common::VecSink;

    fn parse(src: &str) -> (Program, Vec<Diagnostic>) {
        let mut sink = VecSink::new();
        let program = Parser::parse_source(src, &mut sink);
        (program, sink.into_diagnostics())
    }

    #[test]
    fn parses_empty_function() {
        let (program, diags) = parse("fn main() {}");
        assert!(diags.is_empty());
        assert_eq!(program.declarations.len(), 1);
        match &program.declarations[0] {
            Declr::Function(f) => {
                assert_eq!(f.signature.name, "main");
                assert!(f.body.statements.is_empty());
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn parses_variable_and_assignment() {
        let (program, diags) = parse("fn main() { var a = 5; a = a + 5; }");
        assert!(diags.is_empty());
        let Declr::Function(f) = &program.declarations[0] else {
            panic!("expected function")
        };
        assert_eq!(f.body.statements.len(), 2);
        assert!(matches!(f.body.statements[0], Stmt::Declr(Declr::Variable(_))));
        assert!(matches!(f.body.statements[1], Stmt::Assignment(_)));
    }

    #[test]
    fn parses_while_loop() {
        let (program, diags) = parse("fn main() { var x int; while x > 0 {} }");
        assert!(diags.is_empty());
        let Declr::Function(f) = &program.declarations[0] else {
            panic!("expected function")
        };
        assert!(matches!(f.body.statements[1], Stmt::While(_)));
    }

    #[test]
    fn parses_struct_and_selector() {
        let (program, diags) =
            parse("struct test { a int; } fn main() { var b test; var c = b.a; }");
        assert!(diags.is_empty());
        assert!(matches!(program.declarations[0], Declr::Struct(_)));
    }

    #[test]
    fn parses_range_and_untyped_sequence() {
        let (program, diags) = parse("fn main() { var a = [1:5]; var b = [1, 2, 3]; }");
        assert!(diags.is_empty());
        let Declr::Function(f) = &program.declarations[0] else {
            panic!()
        };
        let Stmt::Declr(Declr::Variable(v)) = &f.body.statements[0] else {
            panic!()
        };
        assert!(matches!(v.value, Some(Expr::Range(_))));
    }

    #[test]
    fn reports_missing_semicolon() {
        let (_, diags) = parse("fn main() { var a = 5 var b = 6; }");
        assert!(!diags.is_empty());
    }

    #[test]
    fn resyncs_after_bad_top_level_token() {
        let (program, diags) = parse("@@@ fn main() {}");
        assert!(!diags.is_empty());
        assert!(program
            .declarations
            .iter()
            .any(|d| matches!(d, Declr::Function(_))));
    }

    #[test]
    fn precedence_climbing_respects_operator_precedence() {
        let (program, _) = parse("const x = 1 + 2 * 3;");
        let Declr::Constant(c) = &program.declarations[0] else {
            panic!()
        };
        let Expr::Binary(top) = &c.value else { panic!() };
        assert_eq!(top.op, BinaryOp::Add);
        assert!(matches!(*top.rhs, Expr::Binary(_)));
    }
}
