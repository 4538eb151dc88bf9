//! The front-end and type-checking pipeline for the Brook language: a
//! source string goes in, a checked [`brook_ir::Arena`] (or a diagnostic
//! list) comes out. Lexing, parsing, IR lowering and type checking each
//! live in their own crate; this crate wires them together behind one
//! entry point (`translate`) and defines the boundary ([`IrConsumer`])
//! a downstream interpreter or codegen backend would implement against.

use brook_common::{Diagnostic, VecSink};
use brook_ir::Arena;
use brook_parser::Parser;

/// How far through the pipeline a call to [`translate`] should run.
/// Stopping early is mainly useful for tooling that only needs, say, a
/// syntax tree (an editor's outline view) without paying for type
/// checking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Stage {
    Lex,
    Parse,
    Lower,
    #[default]
    Check,
}

/// Options controlling a single [`translate`] call.
pub struct Options {
    pub stop_after: Stage,
    /// When set, block ids in any later IR printing default to small
    /// monotonic integers rather than hashed tags, matching what golden
    /// tests expect.
    pub test_mode: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            stop_after: Stage::Check,
            test_mode: false,
        }
    }
}

/// Everything a caller gets back from a translation: the diagnostics
/// collected across every phase that ran, plus the IR if lowering ran at
/// all (even a program with type errors still has an `Arena` — only a
/// parse failure severe enough to produce no declarations leaves it
/// absent).
pub struct TranslateOutput {
    pub diagnostics: Vec<Diagnostic>,
    pub ir: Option<Arena>,
}

impl TranslateOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Runs `source` through the pipeline up to `options.stop_after`,
/// collecting every diagnostic along the way rather than stopping at the
/// first one: a caller wants to see every mistake in a file in one pass,
/// not fix-and-recompile one error at a time.
pub fn translate(source: &str, options: &Options) -> TranslateOutput {
    let mut sink = VecSink::new();

    if options.stop_after == Stage::Lex {
        let tokens = brook_lexer::Lexer::tokenize(source, &mut sink);
        tracing::debug!(token_count = tokens.len(), "lexed source");
        return TranslateOutput {
            diagnostics: sink.into_diagnostics(),
            ir: None,
        };
    }

    let program = Parser::parse_source(source, &mut sink);
    if options.stop_after == Stage::Parse {
        tracing::debug!(declaration_count = program.declarations.len(), "parsed source");
        return TranslateOutput {
            diagnostics: sink.into_diagnostics(),
            ir: None,
        };
    }

    let mut arena = brook_ir::lower::lower_program(&program, &mut sink);
    if options.stop_after == Stage::Lower {
        tracing::debug!("lowered to IR, skipping type check");
        return TranslateOutput {
            diagnostics: sink.into_diagnostics(),
            ir: Some(arena),
        };
    }

    brook_check::check_program(&mut arena, &mut sink);
    tracing::debug!(diagnostic_count = sink.diagnostics().len(), "checked IR");
    TranslateOutput {
        diagnostics: sink.into_diagnostics(),
        ir: Some(arena),
    }
}

/// The seam a backend (tree-walking interpreter, bytecode or native
/// codegen) is expected to implement against. This crate only produces
/// the checked IR; nothing in the workspace implements `IrConsumer` yet,
/// but keeping the trait here pins the boundary so a backend crate can
/// depend on `brook` without depending on how the IR was built.
pub trait IrConsumer {
    type Output;
    type Error;

    fn consume(&mut self, program: &Arena) -> Result<Self::Output, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_reports_no_diagnostics_for_well_formed_source() {
        let output = translate("fn main() { var a = 5; }", &Options::default());
        assert!(!output.has_errors());
        assert!(output.ir.is_some());
    }

    #[test]
    fn translate_collects_diagnostics_from_every_phase() {
        let output = translate("fn main() { var a = b; a = true; }", &Options::default());
        assert!(output.has_errors());
    }

    #[test]
    fn stopping_after_parse_skips_lowering() {
        let options = Options {
            stop_after: Stage::Parse,
            ..Options::default()
        };
        let output = translate("fn main() {}", &options);
        assert!(output.ir.is_none());
    }

    #[test]
    fn stopping_after_lower_skips_type_checking() {
        let options = Options {
            stop_after: Stage::Lower,
            ..Options::default()
        };
        // `a` is undeclared, which the lowerer itself reports; the
        // unresolved-type diagnostic the checker would add never appears
        // because the checker never runs.
        let output = translate("fn main() { var b = a; }", &options);
        assert!(output.ir.is_some());
        assert_eq!(output.diagnostics.len(), 1);
    }
}
