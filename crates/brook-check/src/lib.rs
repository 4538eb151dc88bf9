//! Deferred-resolution type checker.
//!
//! Unlike a single top-down pass, refs and instructions here carry their
//! own [`Progress`] state and get revisited until a full sweep makes no
//! further progress. This lets a function call resolve before its callee's
//! body has finished typing, and lets a struct's fields resolve regardless
//! of declaration order — both cases the lowerer leaves for this phase
//! rather than the parser (see the two-pass note in `brook_ir::lower`).

use brook_common::{Diagnostic, ErrorSink};
use brook_ir::{Arena, BinaryOp, FunctionType, Instr, InstrId, Progress, RefId, RefKind, Type, UnaryOp, ValueId};
use rustc_hash::FxHashSet;

/// Runs the checker to a fixed point over every ref and instruction in
/// `arena`, reporting diagnostics for anything left unresolved.
pub fn check_program(arena: &mut Arena, sink: &mut dyn ErrorSink) {
    let mut checker = Checker { arena, sink };
    checker.run();
}

struct Checker<'a> {
    arena: &'a mut Arena,
    sink: &'a mut dyn ErrorSink,
}

/// A value-producing instruction's operands, copied out before any
/// resolution logic runs so the borrow of the instruction itself never
/// outlives this snapshot.
enum Operands {
    Load(RefId),
    Call(RefId),
    Unary(ValueId),
    Binary(BinaryOp, ValueId, ValueId),
}

impl<'a> Checker<'a> {
    /// Node resolution and return-type inference each converge to their
    /// own fixed point, but neither is independent of the other: a newly
    /// inferred return type can unblock a `Call` instruction elsewhere
    /// that was waiting on it, and a newly resolved argument type can
    /// unblock a `Return` this function was waiting on. So the two run in
    /// an outer loop until a full round of both makes no further change.
    fn run(&mut self) {
        loop {
            let resolved = self.resolve_all_nodes();
            let inferred = self.infer_return_types();
            if !resolved && !inferred {
                break;
            }
        }
        self.check_impls();
        self.report_unresolved();
    }

    fn resolve_all_nodes(&mut self) -> bool {
        let mut progressed = false;
        loop {
            let mut round = false;
            let ref_ids: Vec<RefId> = self.arena.ref_ids().collect();
            for r in ref_ids {
                if self.arena.r#ref(r).progress != Progress::Completed && self.try_resolve_ref(r) {
                    round = true;
                }
            }
            let instr_ids: Vec<InstrId> = self.all_instr_ids();
            for i in instr_ids {
                if self.arena.instr(i).progress != Progress::Completed && self.try_resolve_instr(i) {
                    round = true;
                }
            }
            if !round {
                break;
            }
            progressed = true;
        }
        progressed
    }

    /// A `Return(v)` refines its enclosing function's return type via
    /// `update`, the same way a ref's type is refined from its values.
    /// Only fills in a still-unannotated return type — an explicit
    /// annotation is never overridden, and a function with no `Return`
    /// carrying a value stays `nil` (`return_type: None`).
    fn infer_return_types(&mut self) -> bool {
        let ref_ids: Vec<RefId> = self.arena.ref_ids().collect();
        let mut progressed = false;
        for r in ref_ids {
            let node = self.arena.r#ref(r);
            if node.kind != RefKind::Function && node.kind != RefKind::Method {
                continue;
            }
            let already_annotated = match &node.typ {
                Type::Function(f) => f.return_type.is_some(),
                _ => continue,
            };
            if already_annotated {
                continue;
            }
            let Some(entry) = node.entry_block else { continue };

            let mut resolved: Option<Type> = None;
            for block in self.arena.reachable_blocks(entry) {
                for instr_id in self.arena.block(block).instrs.clone() {
                    let Instr::Return { value: Some(v) } = &self.arena.instr(instr_id).kind else {
                        continue;
                    };
                    let Some(vt) = self.value_type_if_known(*v) else {
                        continue;
                    };
                    resolved = Some(match resolved {
                        None => vt,
                        Some(current) => self.update(current, vt, r),
                    });
                }
            }

            if let Some(t) = resolved.filter(|t| !t.is_unknown()) {
                let Type::Function(f) = self.arena.r#ref(r).typ.clone() else {
                    unreachable!("checked above")
                };
                self.arena.ref_mut(r).typ = Type::Function(FunctionType {
                    params: f.params,
                    return_type: Some(Box::new(t)),
                });
                progressed = true;
            }
        }
        progressed
    }

    fn all_instr_ids(&self) -> Vec<InstrId> {
        let mut ids = Vec::new();
        for block in self.arena.block_ids() {
            ids.extend(self.arena.block(block).instrs.iter().copied());
        }
        ids
    }

    /// Infers `r`'s type from the values assigned/bound to it (spec's
    /// "a ref's type is the unification of its values" rule). Returns
    /// `true` if this call changed anything.
    fn try_resolve_ref(&mut self, r: RefId) -> bool {
        let node = self.arena.r#ref(r);
        if !node.typ.is_unknown() {
            self.arena.ref_mut(r).progress = Progress::Completed;
            return false;
        }
        if node.kind == RefKind::Field {
            return self.try_resolve_field(r);
        }
        if node.kind == RefKind::Index {
            return self.try_resolve_index(r);
        }

        let values = self.arena.r#ref(r).values.clone();
        let mut resolved: Option<Type> = None;
        for value in &values {
            let Some(vt) = self.value_type_if_known(*value) else {
                continue;
            };
            resolved = Some(match resolved {
                None => vt,
                Some(current) => self.update(current, vt, r),
            });
        }
        match resolved {
            Some(t) if !t.is_unknown() => {
                self.arena.ref_mut(r).typ = t;
                self.arena.ref_mut(r).progress = Progress::Completed;
                true
            }
            _ => {
                self.arena.ref_mut(r).progress = Progress::Updating;
                false
            }
        }
    }

    fn try_resolve_field(&mut self, r: RefId) -> bool {
        let Some(parent) = self.arena.r#ref(r).parent else {
            return false;
        };
        let parent_type = self.arena.r#ref(parent).typ.clone();
        let Type::Struct(s) = &parent_type else {
            return false;
        };
        let name = self.arena.r#ref(r).name.clone();
        let Some((_, field_type)) = s.fields.iter().find(|(n, _)| *n == name) else {
            return false;
        };
        self.arena.ref_mut(r).typ = field_type.clone();
        self.arena.ref_mut(r).progress = Progress::Completed;
        true
    }

    fn try_resolve_index(&mut self, r: RefId) -> bool {
        let Some(parent) = self.arena.r#ref(r).parent else {
            return false;
        };
        let parent_type = self.arena.r#ref(parent).typ.clone();
        let Type::Sequence(seq) = &parent_type else {
            return false;
        };
        self.arena.ref_mut(r).typ = (*seq.element).clone();
        self.arena.ref_mut(r).progress = Progress::Completed;
        true
    }

    /// Instructions resolve their own `typ` the same way refs do, from
    /// their operands, except for the control instructions which carry no
    /// value of their own (they resolve immediately to `Unknown` so the
    /// fixed-point loop stops waiting on them).
    fn try_resolve_instr(&mut self, i: InstrId) -> bool {
        let operands = match &self.arena.instr(i).kind {
            Instr::Load { ref_id } => Operands::Load(*ref_id),
            Instr::Call { target, .. } => Operands::Call(*target),
            Instr::Unary { operand, .. } => Operands::Unary(*operand),
            Instr::Binary { op, lhs, rhs } => Operands::Binary(*op, *lhs, *rhs),
            _ => {
                self.check_control_instr(i);
                self.arena.instr_mut(i).progress = Progress::Completed;
                return true;
            }
        };

        let resolved = match operands {
            Operands::Load(ref_id) => self.value_type_if_known(ValueId::Ref(ref_id)),
            Operands::Call(target) => match self.arena.r#ref(target).typ.clone() {
                Type::Function(f) => f.return_type.map(|t| *t),
                _ => None,
            },
            Operands::Unary(operand) => self.value_type_if_known(operand),
            Operands::Binary(op, lhs, rhs) => {
                match (self.value_type_if_known(lhs), self.value_type_if_known(rhs)) {
                    (Some(l), Some(r)) => Some(self.binary_result_type(op, l, r, i)),
                    _ => None,
                }
            }
        };

        match resolved {
            Some(t) => {
                self.check_value_instr(i);
                self.arena.instr_mut(i).typ = t;
                self.arena.instr_mut(i).progress = Progress::Completed;
                true
            }
            None => {
                self.arena.instr_mut(i).progress = Progress::Updating;
                false
            }
        }
    }

    /// Division between two integers yields a float: the language's one
    /// implicit numeric promotion (an explicit decision — spec's division
    /// Open Question — since `frac` exists for exact rational division).
    fn binary_result_type(&mut self, op: BinaryOp, lhs: Type, rhs: Type, at: InstrId) -> Type {
        use BinaryOp::*;
        match op {
            Eq | NotEq | Less | Greater | LessEq | GreaterEq => Type::bool(),
            Div if lhs == Type::int() && rhs == Type::int() => Type::float(),
            Add | Sub | Mul | Div => {
                if !lhs.is_numeric() || !rhs.is_numeric() {
                    self.sink.report(Diagnostic::ty(
                        self.arena.instr(at).span,
                        format!("cannot apply arithmetic operator to '{lhs}' and '{rhs}'"),
                    ));
                    return Type::Unknown;
                }
                if lhs == rhs {
                    lhs
                } else {
                    Type::float()
                }
            }
        }
    }

    fn check_value_instr(&mut self, i: InstrId) {
        match &self.arena.instr(i).kind {
            Instr::Unary { op, operand } => {
                let t = self.value_type_if_known(*operand);
                if let Some(t) = t {
                    let ok = match op {
                        UnaryOp::Neg => t.is_numeric(),
                        UnaryOp::Not => t.is_bool(),
                    };
                    if !ok {
                        self.sink.report(Diagnostic::ty(
                            self.arena.instr(i).span,
                            format!("cannot apply unary operator to '{t}'"),
                        ));
                    }
                }
            }
            Instr::Call { target, args } => {
                let target = *target;
                let args = args.clone();
                let params = match &self.arena.r#ref(target).typ {
                    Type::Function(f) => f.params.clone(),
                    _ => return,
                };
                if params.len() != args.len() {
                    self.sink.report(Diagnostic::resolution(
                        self.arena.instr(i).span,
                        format!(
                            "expected {} argument(s), found {}",
                            params.len(),
                            args.len()
                        ),
                    ));
                    return;
                }
                for (param_type, arg) in params.iter().zip(args.iter()) {
                    if let Some(arg_type) = self.value_type_if_known(*arg) {
                        if !param_type.is_unknown() && !arg_type.is_unknown() && *param_type != arg_type {
                            self.sink.report(Diagnostic::ty(
                                self.arena.instr(i).span,
                                format!("expected argument of type '{param_type}', found '{arg_type}'"),
                            ));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn check_control_instr(&mut self, i: InstrId) {
        match &self.arena.instr(i).kind {
            Instr::CBranch { cond, .. } => {
                if let Some(t) = self.value_type_if_known(*cond) {
                    if !t.is_bool() && !t.is_unknown() {
                        self.sink.report(Diagnostic::ty(
                            self.arena.instr(i).span,
                            format!("branch condition must be 'bool', found '{t}'"),
                        ));
                    }
                }
            }
            Instr::Assign { target, value } => {
                let target = *target;
                let value = *value;
                if let (target_type, Some(value_type)) =
                    (self.arena.r#ref(target).typ.clone(), self.value_type_if_known(value))
                {
                    if !target_type.is_unknown() && !value_type.is_unknown() && target_type != value_type {
                        self.sink.report(Diagnostic::ty(
                            self.arena.instr(i).span,
                            format!("cannot assign '{value_type}' to '{target_type}'"),
                        ));
                    }
                }
            }
            // `Return` carries no local invariant of its own to check here;
            // it refines the enclosing function's return type, which
            // `infer_return_types` handles separately.
            Instr::Return { .. } | Instr::Branch { .. } | Instr::Declare { .. } | Instr::DeclareMethods { .. } => {}
            _ => {}
        }
    }

    /// Merges two types already observed for the same ref. Disagreement is
    /// a type error unless one side is still `Unknown`.
    fn update(&mut self, current: Type, incoming: Type, at: RefId) -> Type {
        if current.is_unknown() {
            return incoming;
        }
        if incoming.is_unknown() || current == incoming {
            return current;
        }
        self.sink.report(Diagnostic::ty(
            self.arena.r#ref(at).span,
            format!("conflicting types '{current}' and '{incoming}' for '{}'", self.arena.r#ref(at).name),
        ));
        current
    }

    fn value_type_if_known(&self, value: ValueId) -> Option<Type> {
        let t = self.arena.value_type(value).clone();
        if t.is_unknown() {
            None
        } else {
            Some(t)
        }
    }

    /// Interface conformance is exact method-set equality: every method
    /// the interface names must be implemented, and no extra ones counted
    /// against it — a `impl Type: Interface` block's method set must equal
    /// the interface's (spec's Open Question on conformance, resolved in
    /// favor of the simpler, stricter rule).
    fn check_impls(&mut self) {
        let impls: Vec<_> = self
            .arena
            .impls
            .iter()
            .map(|i| (i.type_name.clone(), i.interface_name.clone(), i.methods.clone()))
            .collect();
        for (type_name, interface_name, methods) in impls {
            let Some(interface_name) = interface_name else {
                continue;
            };
            let Some(Type::Interface(iface)) = self.arena.named_types.get(&interface_name).cloned() else {
                continue;
            };
            let implemented: FxHashSet<&str> = methods.iter().map(|(n, _)| n.as_str()).collect();
            let required: FxHashSet<&str> = iface.methods.iter().map(|(n, _)| n.as_str()).collect();
            if implemented != required {
                let missing: Vec<&str> = required.difference(&implemented).copied().collect();
                let extra: Vec<&str> = implemented.difference(&required).copied().collect();
                let mut msg = format!("'{type_name}' does not satisfy interface '{interface_name}'");
                if !missing.is_empty() {
                    msg.push_str(&format!(": missing {}", missing.join(", ")));
                }
                if !extra.is_empty() {
                    msg.push_str(&format!(": extraneous {}", extra.join(", ")));
                }
                let span = self.arena.r#ref(methods.first().map(|(_, r)| *r).unwrap_or(RefId(0))).span;
                self.sink.report(Diagnostic::resolution(span, msg));
            }
        }
    }

    fn report_unresolved(&mut self) {
        let ref_ids: Vec<RefId> = self.arena.ref_ids().collect();
        for r in ref_ids {
            let node = self.arena.r#ref(r);
            if node.progress != Progress::Completed && node.kind != RefKind::Function && node.kind != RefKind::Method {
                self.sink.report(Diagnostic::resolution(
                    node.span,
                    format!("could not infer a type for '{}'", node.name),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_common::VecSink;
    use brook_ir::lower::lower_program;
    use brook_parser::Parser;

    fn check(src: &str) -> (Arena, Vec<Diagnostic>) {
        let mut sink = VecSink::new();
        let program = Parser::parse_source(src, &mut sink);
        let mut arena = lower_program(&program, &mut sink);
        check_program(&mut arena, &mut sink);
        (arena, sink.into_diagnostics())
    }

    #[test]
    fn infers_variable_type_from_initializer() {
        let (arena, diags) = check("fn main() { var a = 5; }");
        assert!(diags.is_empty());
        let a = arena.ref_ids().find(|r| arena.r#ref(*r).name == "a").unwrap();
        assert_eq!(arena.r#ref(a).typ, Type::int());
    }

    #[test]
    fn integer_division_promotes_to_float() {
        let (arena, diags) = check("fn main() { var a = 4 / 2; }");
        assert!(diags.is_empty());
        let a = arena.ref_ids().find(|r| arena.r#ref(*r).name == "a").unwrap();
        assert_eq!(arena.r#ref(a).typ, Type::float());
    }

    #[test]
    fn comparison_yields_bool() {
        let (arena, diags) = check("fn main() { var a = 1 < 2; }");
        assert!(diags.is_empty());
        let a = arena.ref_ids().find(|r| arena.r#ref(*r).name == "a").unwrap();
        assert_eq!(arena.r#ref(a).typ, Type::bool());
    }

    #[test]
    fn reports_conflicting_assignment_types() {
        let (_, diags) = check("fn main() { var a = 5; a = true; }");
        assert!(!diags.is_empty());
    }

    #[test]
    fn reports_wrong_branch_condition_type() {
        let (_, diags) = check("fn main() { if 5 {} }");
        assert!(!diags.is_empty());
    }

    #[test]
    fn resolves_struct_field_through_parent_type() {
        let (arena, diags) =
            check("struct test { a int; } fn main() { var b test; var c = b.a; }");
        assert!(diags.is_empty());
        let c = arena.ref_ids().find(|r| arena.r#ref(*r).name == "c").unwrap();
        assert_eq!(arena.r#ref(c).typ, Type::int());
    }

    #[test]
    fn reports_call_argument_count_mismatch() {
        let (_, diags) = check("fn add(a int, b int) int { return a + b; } fn main() { add(1); }");
        assert!(!diags.is_empty());
    }

    #[test]
    fn infers_return_type_from_return_statement() {
        let (arena, diags) = check("fn main() { if true return 0; }");
        assert!(diags.is_empty());
        let main_ref = arena.ref_ids().find(|r| arena.r#ref(*r).name == "main").unwrap();
        match &arena.r#ref(main_ref).typ {
            Type::Function(f) => assert_eq!(f.return_type.as_deref(), Some(&Type::int())),
            other => panic!("expected a function type, got {other:?}"),
        }
    }

    #[test]
    fn checks_interface_conformance_by_exact_method_set() {
        let (_, diags) = check(
            "interface greeter { greet() str; } struct dog { } impl dog: greeter { fn bark() str { return \"woof\"; } }",
        );
        assert!(!diags.is_empty());
    }
}
