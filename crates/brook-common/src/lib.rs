//! Shared types used across every Brook compiler crate: source spans,
//! line/column positions, diagnostics and the error-sink boundary, and
//! numeric literal parsing.

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticKind, ErrorSink, PanicSink, VecSink};

pub mod span;
pub use span::{ByteSpan, Span, SpanBuilder, Spanned};

pub mod position;
pub use position::{LineMap, Location, Position, Range, SourceLocation};

pub mod numeric;
pub use numeric::{parse_float_literal, parse_int_literal, parse_rational_literal};
