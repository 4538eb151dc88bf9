use brook_common::VecSink;
use brook_ir::lower::lower_program;
use brook_ir::printer::print_program;
use brook_ir::Arena;
use brook_parser::Parser;

fn ir_for(src: &str) -> Arena {
    let mut sink = VecSink::new();
    let program = Parser::parse_source(src, &mut sink);
    lower_program(&program, &mut sink)
}

fn checked_ir_for(src: &str) -> Arena {
    let mut arena = ir_for(src);
    let mut sink = VecSink::new();
    brook_check::check_program(&mut arena, &mut sink);
    arena
}

#[test]
fn prints_empty_main_s1() {
    let arena = ir_for("fn main() {}");
    let text = print_program(&arena, true);
    assert_eq!(text, "1:\n DECLARE main() #2 [fn () -> nil]\n2:\n [empty]");
}

#[test]
fn prints_typed_assign_and_load_s2() {
    let arena = checked_ir_for("fn main() { var a = 5; a = a + 5; }");
    let text = print_program(&arena, true);
    assert!(text.ends_with("ASSIGN a [int] <- (LOAD(a [int]) [int] + 5 [int]) [int]"));
}

#[test]
fn prints_while_condition_branch_s3() {
    let arena = checked_ir_for("fn main() { var x int; while x > 0 {} }");
    let text = print_program(&arena, true);
    assert!(text.contains("CBRANCH (LOAD(x [int]) [int] > 0 [int]) [bool] #"));
    assert!(text.contains("BRANCH #"));
}

#[test]
fn repeated_block_reference_prints_only_the_label() {
    let arena = ir_for("fn main() { if 1 == 1 {} }");
    let text = print_program(&arena, true);
    // the merge block is reached by both branch arms but must only be
    // rendered with a full body once.
    let occurrences = text.matches("[empty]").count();
    assert!(occurrences >= 1);
}
