//! Diagnostics and the error-sink boundary shared by every phase of the
//! pipeline (lexer, parser, lowerer, checker).

use crate::span::Span;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
}

/// The five error categories a compilation can report.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    LexError,
    ParseError,
    NameError,
    TypeError,
    ResolutionError,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::LexError => "Syntax error",
            DiagnosticKind::ParseError => "Syntax error",
            DiagnosticKind::NameError => "Name error",
            DiagnosticKind::TypeError => "Type error",
            DiagnosticKind::ResolutionError => "Type error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Error,
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn lex(span: Span, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::LexError, span, message)
    }

    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::ParseError, span, message)
    }

    pub fn name(span: Span, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::NameError, span, message)
    }

    pub fn ty(span: Span, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::TypeError, span, message)
    }

    pub fn resolution(span: Span, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::ResolutionError, span, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

/// The boundary every phase reports diagnostics through. Kept as a trait
/// object (`&mut dyn ErrorSink`) rather than a generic so the pipeline's
/// phases can be compiled independently of whatever collects the output.
pub trait ErrorSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// A sink that panics on the first diagnostic it receives. This is the
/// default when no caller-supplied sink is installed — it matches the
/// pipeline's "first error is fatal when nothing is watching" policy and is
/// convenient as a `#[should_panic]` target in tests.
#[derive(Default)]
pub struct PanicSink;

impl ErrorSink for PanicSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        panic!("{diagnostic}");
    }
}

/// A sink that collects every diagnostic it receives, for tests and for
/// callers that want the whole list rather than the first failure.
#[derive(Default)]
pub struct VecSink {
    diagnostics: Vec<Diagnostic>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl ErrorSink for VecSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_by_category_label() {
        let d = Diagnostic::ty(Span::new(0, 3), "cannot add int and str");
        assert_eq!(d.to_string(), "Type error: cannot add int and str");
        let d = Diagnostic::parse(Span::new(0, 1), "expected ';'");
        assert_eq!(d.to_string(), "Syntax error: expected ';'");
    }

    #[test]
    fn vec_sink_collects_every_diagnostic() {
        let mut sink = VecSink::new();
        sink.report(Diagnostic::lex(Span::at(0), "unexpected character"));
        sink.report(Diagnostic::name(Span::at(1), "undeclared name 'x'"));
        assert_eq!(sink.diagnostics().len(), 2);
    }

    #[test]
    #[should_panic(expected = "Type error: boom")]
    fn panic_sink_panics_on_report() {
        PanicSink.report(Diagnostic::ty(Span::at(0), "boom"));
    }
}
