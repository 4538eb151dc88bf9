//! AST → IR lowering. Resolves names and builds the control flow graph;
//! performs no type checking of its own beyond recording syntactic type
//! annotations as hints.

use crate::arena::{Arena, BinaryOp, BlockId, Instr, ObjectKind, RefId, RefKind, UnaryOp, ValueId};
use crate::builtins;
use crate::types::{FunctionType, SequenceSpec, SequenceType, StructType, Type};
use crate::ImplBlock;
use brook_common::{Diagnostic, ErrorSink, Span};
use brook_parser::ast::{self as ast, Literal};
use brook_scope::{Scope, ScopeId};

pub fn lower_program(program: &ast::Program, sink: &mut dyn ErrorSink) -> Arena {
    let mut arena = Arena::new();
    let env = builtins::install(&mut arena);
    let mut lowerer = Lowerer {
        arena: &mut arena,
        scope: env.scope,
        current_scope: env.root,
        sink,
        current_block: BlockId(0), // replaced below
    };
    let root_block = lowerer.arena.alloc_block();
    lowerer.current_block = root_block;

    lowerer.register_named_types(program);
    let mut declarations = Vec::new();
    for declr in &program.declarations {
        if let Some(id) = lowerer.lower_top_level(declr) {
            declarations.push(id);
        }
    }

    arena.program = Some(crate::Program {
        block: root_block,
        declarations,
    });
    arena
}

struct Lowerer<'a> {
    arena: &'a mut Arena,
    scope: Scope<RefId>,
    current_scope: ScopeId,
    sink: &'a mut dyn ErrorSink,
    current_block: BlockId,
}

impl<'a> Lowerer<'a> {
    // -- Pass 1: register struct/interface shapes so forward references
    // between declarations resolve (see type_checker.py's deferred-binding
    // TODO). --

    fn register_named_types(&mut self, program: &ast::Program) {
        for declr in &program.declarations {
            match declr {
                ast::Declr::Struct(s) => {
                    self.arena.named_types.insert(
                        s.name.clone(),
                        Type::Struct(StructType {
                            name: s.name.clone(),
                            fields: Vec::new(),
                        }),
                    );
                }
                ast::Declr::Interface(i) => {
                    self.arena.named_types.insert(
                        i.name.clone(),
                        Type::Interface(crate::types::InterfaceType {
                            name: i.name.clone(),
                            methods: Vec::new(),
                        }),
                    );
                }
                _ => {}
            }
        }
        // Second sweep: now every struct/interface name is known, resolve
        // field and method signature types.
        for declr in &program.declarations {
            match declr {
                ast::Declr::Struct(s) => {
                    let fields = s
                        .fields
                        .iter()
                        .map(|f| (f.name.clone(), self.resolve_type(&f.type_annotation)))
                        .collect();
                    self.arena.named_types.insert(
                        s.name.clone(),
                        Type::Struct(StructType {
                            name: s.name.clone(),
                            fields,
                        }),
                    );
                }
                ast::Declr::Interface(i) => {
                    let methods = i
                        .methods
                        .iter()
                        .map(|m| (m.name.clone(), self.resolve_signature_type(m)))
                        .collect();
                    self.arena.named_types.insert(
                        i.name.clone(),
                        Type::Interface(crate::types::InterfaceType {
                            name: i.name.clone(),
                            methods,
                        }),
                    );
                }
                _ => {}
            }
        }
    }

    fn resolve_type(&mut self, t: &ast::TypeExpr) -> Type {
        match t {
            ast::TypeExpr::Named(n) => builtins::primitive_type(&n.name)
                .or_else(|| self.arena.named_types.get(&n.name).cloned())
                .unwrap_or_else(|| {
                    self.sink
                        .report(Diagnostic::name(n.span, format!("undeclared type '{}'", n.name)));
                    Type::Unknown
                }),
            ast::TypeExpr::Array(a) => Type::Sequence(SequenceType {
                spec: SequenceSpec::Array(a.len),
                element: Box::new(self.resolve_type(&a.element)),
            }),
            ast::TypeExpr::Vector(v) => Type::Sequence(SequenceType {
                spec: SequenceSpec::Vector,
                element: Box::new(self.resolve_type(&v.element)),
            }),
            ast::TypeExpr::Function(f) => Type::Function(FunctionType {
                params: f.params.iter().map(|p| self.resolve_type(p)).collect(),
                return_type: f.return_type.as_ref().map(|r| Box::new(self.resolve_type(r))),
            }),
        }
    }

    fn resolve_signature_type(&mut self, sig: &ast::FunctionSignature) -> FunctionType {
        FunctionType {
            params: sig
                .params
                .iter()
                .map(|p| {
                    p.type_annotation
                        .as_ref()
                        .map(|t| self.resolve_type(t))
                        .unwrap_or(Type::Unknown)
                })
                .collect(),
            return_type: sig.return_type.as_ref().map(|r| Box::new(self.resolve_type(r))),
        }
    }

    // -- Pass 2: lower bodies --------------------------------------------

    fn lower_top_level(&mut self, declr: &ast::Declr) -> Option<RefId> {
        match declr {
            ast::Declr::Function(f) => Some(self.lower_function(f)),
            ast::Declr::Struct(_) | ast::Declr::Interface(_) => None,
            ast::Declr::Impl(i) => {
                self.lower_impl(i);
                None
            }
            ast::Declr::Variable(v) => Some(self.lower_variable(v)),
            ast::Declr::Constant(c) => Some(self.lower_constant(c)),
        }
    }

    fn lower_function(&mut self, f: &ast::FunctionDeclr) -> RefId {
        let func_ref = self
            .arena
            .alloc_ref(RefKind::Function, f.signature.name.clone(), f.span);
        self.scope.declare(self.current_scope, f.signature.name.clone(), func_ref);

        let param_types = f
            .signature
            .params
            .iter()
            .map(|p| {
                p.type_annotation
                    .as_ref()
                    .map(|t| self.resolve_type(t))
                    .unwrap_or(Type::Unknown)
            })
            .collect();
        let return_type = f
            .signature
            .return_type
            .as_ref()
            .map(|t| Box::new(self.resolve_type(t)));
        self.arena.ref_mut(func_ref).typ = Type::Function(FunctionType {
            params: param_types,
            return_type,
        });

        let declare = self.arena.alloc_instr(Instr::Declare { ref_id: func_ref }, f.span);
        self.arena.push_instr(self.current_block, declare);

        self.lower_function_body(func_ref, &f.signature.params, &f.body);
        func_ref
    }

    fn lower_function_body(&mut self, func_ref: RefId, params: &[ast::Param], body: &ast::Block) {
        let entry = self.arena.alloc_block();
        self.arena.ref_mut(func_ref).entry_block = Some(entry);

        let saved_scope = self.current_scope;
        let saved_block = self.current_block;
        self.current_scope = self.scope.enter(saved_scope);
        self.current_block = entry;

        let mut param_refs = Vec::new();
        for p in params {
            let typ = p
                .type_annotation
                .as_ref()
                .map(|t| self.resolve_type(t))
                .unwrap_or(Type::Unknown);
            let param_ref = self.arena.alloc_ref(RefKind::Parameter, p.name.clone(), p.span);
            self.arena.ref_mut(param_ref).typ = typ;
            self.scope.declare(self.current_scope, p.name.clone(), param_ref);
            param_refs.push(param_ref);
        }
        self.arena.ref_mut(func_ref).params = param_refs;

        self.lower_block(body);

        self.current_scope = saved_scope;
        self.current_block = saved_block;
    }

    fn lower_impl(&mut self, i: &ast::ImplDeclr) {
        let methods_block = self.arena.alloc_block();
        let mut methods = Vec::new();
        for method in &i.methods {
            let method_ref = self
                .arena
                .alloc_ref(RefKind::Function, method.signature.name.clone(), method.span);
            let self_type = builtins::primitive_type(&i.type_name)
                .or_else(|| self.arena.named_types.get(&i.type_name).cloned())
                .unwrap_or(Type::Unknown);

            let mut param_types = vec![self_type];
            param_types.extend(method.signature.params.iter().map(|p| {
                p.type_annotation
                    .as_ref()
                    .map(|t| self.resolve_type(t))
                    .unwrap_or(Type::Unknown)
            }));
            let return_type = method
                .signature
                .return_type
                .as_ref()
                .map(|t| Box::new(self.resolve_type(t)));
            self.arena.ref_mut(method_ref).typ = Type::Function(FunctionType {
                params: param_types,
                return_type,
            });

            // `self` is parameter 0 of every method.
            let self_param = ast::Param {
                name: "self".to_string(),
                type_annotation: Some(ast::TypeExpr::Named(ast::NamedType {
                    name: i.type_name.clone(),
                    span: method.span,
                })),
                span: method.span,
            };
            let mut params_with_self = vec![self_param];
            params_with_self.extend(method.signature.params.clone());
            self.lower_function_body(method_ref, &params_with_self, &method.body);

            let declare = self.arena.alloc_instr(Instr::Declare { ref_id: method_ref }, method.span);
            self.arena.push_instr(methods_block, declare);
            methods.push((method.signature.name.clone(), method_ref));
        }

        let declare_methods = self.arena.alloc_instr(
            Instr::DeclareMethods {
                type_name: i.type_name.clone(),
                block: methods_block,
            },
            i.span,
        );
        self.arena.push_instr(self.current_block, declare_methods);

        self.arena.impls.push(ImplBlock {
            type_name: i.type_name.clone(),
            interface_name: i.interface_name.clone(),
            methods,
            declare_methods_instr: declare_methods,
        });
    }

    fn lower_variable(&mut self, v: &ast::VariableDeclr) -> RefId {
        let typ = v
            .type_annotation
            .as_ref()
            .map(|t| self.resolve_type(t))
            .unwrap_or(Type::Unknown);
        let var_ref = self.arena.alloc_ref(RefKind::Variable, v.name.clone(), v.span);
        self.arena.ref_mut(var_ref).typ = typ;
        self.scope.declare(self.current_scope, v.name.clone(), var_ref);

        let declare = self.arena.alloc_instr(Instr::Declare { ref_id: var_ref }, v.span);
        self.arena.push_instr(self.current_block, declare);

        if let Some(value) = &v.value {
            let value_id = self.lower_expr(value, true);
            self.arena.ref_mut(var_ref).values.push(value_id);
            let assign = self.arena.alloc_instr(
                Instr::Assign {
                    target: var_ref,
                    value: value_id,
                },
                v.span,
            );
            self.arena.push_instr(self.current_block, assign);
        }
        var_ref
    }

    fn lower_constant(&mut self, c: &ast::ConstDeclr) -> RefId {
        let typ = c
            .type_annotation
            .as_ref()
            .map(|t| self.resolve_type(t))
            .unwrap_or(Type::Unknown);
        let const_ref = self.arena.alloc_ref(RefKind::Constant, c.name.clone(), c.span);
        self.arena.ref_mut(const_ref).typ = typ;
        self.scope.declare(self.current_scope, c.name.clone(), const_ref);

        let declare = self.arena.alloc_instr(Instr::Declare { ref_id: const_ref }, c.span);
        self.arena.push_instr(self.current_block, declare);

        let value_id = self.lower_expr(&c.value, true);
        self.arena.ref_mut(const_ref).values.push(value_id);
        let assign = self.arena.alloc_instr(
            Instr::Assign {
                target: const_ref,
                value: value_id,
            },
            c.span,
        );
        self.arena.push_instr(self.current_block, assign);
        const_ref
    }

    fn lower_block(&mut self, block: &ast::Block) {
        for stmt in &block.statements {
            self.lower_stmt(stmt);
        }
    }

    fn lower_stmt(&mut self, stmt: &ast::Stmt) {
        match stmt {
            ast::Stmt::Block(b) => {
                let saved = self.current_scope;
                self.current_scope = self.scope.enter(saved);
                self.lower_block(b);
                self.current_scope = saved;
            }
            ast::Stmt::Declr(d) => {
                self.lower_top_level(d);
            }
            ast::Stmt::Expr(e) => {
                self.lower_expr(e, true);
            }
            ast::Stmt::If(s) => self.lower_if(s),
            ast::Stmt::While(s) => self.lower_while(s),
            ast::Stmt::Return(r) => {
                let span = r.span;
                let value = r.value.as_ref().map(|v| self.lower_expr(v, true));
                let ret = self.arena.alloc_instr(Instr::Return { value }, span);
                self.arena.push_instr(self.current_block, ret);
            }
            ast::Stmt::Assignment(a) => self.lower_assignment(a),
        }
    }

    fn lower_assignment(&mut self, a: &ast::AssignmentStmt) {
        let Some(target_ref) = self.lower_lvalue(&a.target) else {
            return;
        };
        let value_id = self.lower_expr(&a.value, true);
        self.arena.ref_mut(target_ref).values.push(value_id);
        let assign = self.arena.alloc_instr(
            Instr::Assign {
                target: target_ref,
                value: value_id,
            },
            a.span,
        );
        self.arena.push_instr(self.current_block, assign);
    }

    fn lower_if(&mut self, s: &ast::IfStmt) {
        let cond = self.lower_expr(&s.condition, true);

        let then_block = self.arena.alloc_block();
        let else_block = s.else_branch.as_ref().map(|_| self.arena.alloc_block());
        let merge_block = self.arena.alloc_block();

        let cbranch = self.arena.alloc_instr(
            Instr::CBranch {
                cond,
                then_block,
                else_block: else_block.unwrap_or(merge_block),
            },
            s.span,
        );
        self.arena.push_instr(self.current_block, cbranch);

        self.current_block = then_block;
        self.lower_stmt(&s.then_branch);
        if !self.arena.block(self.current_block).is_terminated(self.arena) {
            let branch = self.arena.alloc_instr(Instr::Branch { target: merge_block }, s.span);
            self.arena.push_instr(self.current_block, branch);
        }

        if let (Some(else_block), Some(else_branch)) = (else_block, &s.else_branch) {
            self.current_block = else_block;
            self.lower_stmt(else_branch);
            if !self.arena.block(self.current_block).is_terminated(self.arena) {
                let branch = self.arena.alloc_instr(Instr::Branch { target: merge_block }, s.span);
                self.arena.push_instr(self.current_block, branch);
            }
        }

        self.current_block = merge_block;
    }

    fn lower_while(&mut self, s: &ast::WhileStmt) {
        let cond_block = self.arena.alloc_block();
        let branch_to_cond = self.arena.alloc_instr(Instr::Branch { target: cond_block }, s.span);
        self.arena.push_instr(self.current_block, branch_to_cond);

        self.current_block = cond_block;
        let cond = self.lower_expr(&s.condition, true);

        let loop_block = self.arena.alloc_block();
        let exit_block = self.arena.alloc_block();
        let cbranch = self.arena.alloc_instr(
            Instr::CBranch {
                cond,
                then_block: loop_block,
                else_block: exit_block,
            },
            s.span,
        );
        self.arena.push_instr(cond_block, cbranch);

        self.current_block = loop_block;
        self.lower_block(&s.body);
        if !self.arena.block(self.current_block).is_terminated(self.arena) {
            let back_edge = self.arena.alloc_instr(Instr::Branch { target: cond_block }, s.span);
            self.arena.push_instr(self.current_block, back_edge);
        }

        self.current_block = exit_block;
    }

    // -- Expressions -------------------------------------------------------

    /// Lowers an expression that must resolve to an assignable ref: plain
    /// identifiers, field selectors, and index expressions. Returns `None`
    /// (after reporting) for anything else.
    fn lower_lvalue(&mut self, expr: &ast::Expr) -> Option<RefId> {
        match expr {
            ast::Expr::Identifier(id) => {
                let found = self.scope.lookup(self.current_scope, &id.name);
                if found.is_none() {
                    self.sink
                        .report(Diagnostic::name(id.span, format!("undeclared name '{}'", id.name)));
                }
                found
            }
            ast::Expr::Selector(sel) => {
                let parent = self.lower_lvalue(&sel.base)?;
                Some(self.field_ref(parent, &sel.name, sel.span))
            }
            ast::Expr::Index(idx) => {
                let parent = self.lower_lvalue(&idx.base)?;
                let index_ref = self.arena.alloc_ref(RefKind::Index, "[]", idx.span);
                self.arena.ref_mut(index_ref).parent = Some(parent);
                let index_value = self.lower_expr(&idx.index, true);
                self.arena.ref_mut(index_ref).values.push(index_value);
                Some(index_ref)
            }
            _ => {
                self.sink
                    .report(Diagnostic::parse(expr.span(), "expression is not assignable"));
                None
            }
        }
    }

    /// Returns (creating if necessary) the `FieldRef` cached on `parent`'s
    /// member table for `name`.
    fn field_ref(&mut self, parent: RefId, name: &str, span: Span) -> RefId {
        if let Some(existing) = self.arena.r#ref(parent).members.get(name).copied() {
            return existing;
        }
        let field_ref = self.arena.alloc_ref(RefKind::Field, name, span);
        self.arena.ref_mut(field_ref).parent = Some(parent);
        self.arena.ref_mut(parent).members.insert(name.to_string(), field_ref);
        field_ref
    }

    fn lower_expr(&mut self, expr: &ast::Expr, load: bool) -> ValueId {
        match expr {
            ast::Expr::Literal(lit) => self.lower_literal(&lit.value, lit.span),
            ast::Expr::Identifier(id) => {
                let Some(target) = self.scope.lookup(self.current_scope, &id.name) else {
                    self.sink
                        .report(Diagnostic::name(id.span, format!("undeclared name '{}'", id.name)));
                    let placeholder = self.arena.alloc_object(
                        ObjectKind::Constant(Literal::Integer(0)),
                        Type::Unknown,
                        id.span,
                    );
                    return ValueId::Object(placeholder);
                };
                if load {
                    let load_instr = self.arena.alloc_instr(Instr::Load { ref_id: target }, id.span);
                    self.arena.push_instr(self.current_block, load_instr);
                    ValueId::Instr(load_instr)
                } else {
                    ValueId::Ref(target)
                }
            }
            ast::Expr::Group(g) => self.lower_expr(&g.inner, load),
            ast::Expr::Range(r) => {
                let start = self.lower_expr(&r.start, true);
                let end = self.lower_expr(&r.end, true);
                let Some(range_fn) = self.scope.lookup(self.current_scope, builtins::RANGE_INTRINSIC_NAME) else {
                    unreachable!("range intrinsic is always installed in the root scope")
                };
                let call = self.arena.alloc_instr(
                    Instr::Call {
                        target: range_fn,
                        args: vec![start, end],
                    },
                    r.span,
                );
                self.arena.push_instr(self.current_block, call);
                ValueId::Instr(call)
            }
            ast::Expr::Unary(u) => {
                let operand = self.lower_expr(&u.operand, true);
                let op = match u.op {
                    ast::UnaryOp::Neg => UnaryOp::Neg,
                    ast::UnaryOp::Not => UnaryOp::Not,
                };
                let instr = self.arena.alloc_instr(Instr::Unary { op, operand }, u.span);
                self.arena.push_instr(self.current_block, instr);
                ValueId::Instr(instr)
            }
            ast::Expr::Binary(b) => {
                let lhs = self.lower_expr(&b.lhs, true);
                let rhs = self.lower_expr(&b.rhs, true);
                let op = match b.op {
                    ast::BinaryOp::Add => BinaryOp::Add,
                    ast::BinaryOp::Sub => BinaryOp::Sub,
                    ast::BinaryOp::Mul => BinaryOp::Mul,
                    ast::BinaryOp::Div => BinaryOp::Div,
                    ast::BinaryOp::Eq => BinaryOp::Eq,
                    ast::BinaryOp::NotEq => BinaryOp::NotEq,
                    ast::BinaryOp::Less => BinaryOp::Less,
                    ast::BinaryOp::Greater => BinaryOp::Greater,
                    ast::BinaryOp::LessEq => BinaryOp::LessEq,
                    ast::BinaryOp::GreaterEq => BinaryOp::GreaterEq,
                };
                let instr = self.arena.alloc_instr(Instr::Binary { op, lhs, rhs }, b.span);
                self.arena.push_instr(self.current_block, instr);
                ValueId::Instr(instr)
            }
            ast::Expr::Selector(sel) => {
                let Some(parent) = self.lower_lvalue(&sel.base) else {
                    let placeholder = self.arena.alloc_object(
                        ObjectKind::Constant(Literal::Integer(0)),
                        Type::Unknown,
                        sel.span,
                    );
                    return ValueId::Object(placeholder);
                };
                let field = self.field_ref(parent, &sel.name, sel.span);
                if load {
                    let load_instr = self.arena.alloc_instr(Instr::Load { ref_id: field }, sel.span);
                    self.arena.push_instr(self.current_block, load_instr);
                    ValueId::Instr(load_instr)
                } else {
                    ValueId::Ref(field)
                }
            }
            ast::Expr::Index(idx) => {
                let Some(parent) = self.lower_lvalue(&idx.base) else {
                    let placeholder = self.arena.alloc_object(
                        ObjectKind::Constant(Literal::Integer(0)),
                        Type::Unknown,
                        idx.span,
                    );
                    return ValueId::Object(placeholder);
                };
                let index_ref = self.arena.alloc_ref(RefKind::Index, "[]", idx.span);
                self.arena.ref_mut(index_ref).parent = Some(parent);
                let index_value = self.lower_expr(&idx.index, true);
                self.arena.ref_mut(index_ref).values.push(index_value);
                if load {
                    let load_instr = self.arena.alloc_instr(Instr::Load { ref_id: index_ref }, idx.span);
                    self.arena.push_instr(self.current_block, load_instr);
                    ValueId::Instr(load_instr)
                } else {
                    ValueId::Ref(index_ref)
                }
            }
            ast::Expr::Call(call) => self.lower_call(call),
            ast::Expr::Sequence(seq) => {
                let elements = seq
                    .elements
                    .iter()
                    .map(|e| self.lower_expr(e, true))
                    .collect::<Vec<_>>();
                let element_type = seq
                    .element_type
                    .as_ref()
                    .map(|t| self.resolve_type(t))
                    .unwrap_or(Type::Unknown);
                let spec = match seq.kind {
                    ast::SequenceKind::Array | ast::SequenceKind::Untyped => {
                        SequenceSpec::Array(Some(elements.len() as u32))
                    }
                    ast::SequenceKind::Vector => SequenceSpec::Vector,
                };
                let typ = Type::Sequence(SequenceType {
                    spec,
                    element: Box::new(element_type),
                });
                let obj = self
                    .arena
                    .alloc_object(ObjectKind::Sequence { elements }, typ, seq.span);
                ValueId::Object(obj)
            }
        }
    }

    fn lower_literal(&mut self, lit: &Literal, span: Span) -> ValueId {
        let typ = match lit {
            Literal::Integer(_) => Type::int(),
            Literal::Float(_) => Type::float(),
            Literal::Rational(..) => Type::rational(),
            Literal::Str(_) => Type::str(),
            Literal::Char(_) => Type::char(),
            Literal::Bool(_) => Type::bool(),
        };
        let obj = self.arena.alloc_object(ObjectKind::Constant(lit.clone()), typ, span);
        ValueId::Object(obj)
    }

    fn lower_call(&mut self, call: &ast::CallExpr) -> ValueId {
        match call.callee.as_ref() {
            ast::Expr::Identifier(id) => {
                let Some(target) = self.scope.lookup(self.current_scope, &id.name) else {
                    self.sink
                        .report(Diagnostic::name(id.span, format!("undeclared name '{}'", id.name)));
                    let placeholder = self.arena.alloc_object(
                        ObjectKind::Constant(Literal::Integer(0)),
                        Type::Unknown,
                        call.span,
                    );
                    return ValueId::Object(placeholder);
                };
                let args: Vec<ValueId> = call.args.iter().map(|a| self.lower_expr(a, true)).collect();
                let params = self.arena.r#ref(target).params.clone();
                for (param_ref, arg) in params.iter().zip(args.iter()) {
                    self.arena.ref_mut(*param_ref).values.push(*arg);
                }
                let instr = self.arena.alloc_instr(
                    Instr::Call {
                        target,
                        args,
                    },
                    call.span,
                );
                self.arena.push_instr(self.current_block, instr);
                ValueId::Instr(instr)
            }
            ast::Expr::Selector(sel) => {
                let Some(parent) = self.lower_lvalue(&sel.base) else {
                    let placeholder = self.arena.alloc_object(
                        ObjectKind::Constant(Literal::Integer(0)),
                        Type::Unknown,
                        call.span,
                    );
                    return ValueId::Object(placeholder);
                };
                let method_ref = self.field_ref(parent, &sel.name, sel.span);
                let self_arg = ValueId::Ref(parent);
                let mut args = vec![self_arg];
                args.extend(call.args.iter().map(|a| self.lower_expr(a, true)));
                let instr = self.arena.alloc_instr(
                    Instr::Call {
                        target: method_ref,
                        args,
                    },
                    call.span,
                );
                self.arena.push_instr(self.current_block, instr);
                ValueId::Instr(instr)
            }
            other => {
                self.sink
                    .report(Diagnostic::parse(other.span(), "expression is not callable"));
                let placeholder = self.arena.alloc_object(
                    ObjectKind::Constant(Literal::Integer(0)),
                    Type::Unknown,
                    call.span,
                );
                ValueId::Object(placeholder)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_common::VecSink;
    use brook_parser::Parser;

    fn lower(src: &str) -> (Arena, Vec<Diagnostic>) {
        let mut sink = VecSink::new();
        let program = Parser::parse_source(src, &mut sink);
        let arena = lower_program(&program, &mut sink);
        (arena, sink.into_diagnostics())
    }

    #[test]
    fn lowers_empty_main() {
        let (arena, diags) = lower("fn main() {}");
        assert!(diags.is_empty());
        assert!(arena.program.is_some());
    }

    #[test]
    fn lowers_variable_and_assignment() {
        let (arena, diags) = lower("fn main() { var a = 5; a = a + 5; }");
        assert!(diags.is_empty());
        // main's entry block should contain Declare, Assign, Load, Binary, Assign.
        let main_ref = arena.ref_ids().find(|r| arena.r#ref(*r).name == "main").unwrap();
        let entry = arena.r#ref(main_ref).entry_block.unwrap();
        assert!(arena.block(entry).instrs.len() >= 4);
    }

    #[test]
    fn lowers_while_into_three_blocks() {
        let (arena, diags) = lower("fn main() { var x int; while x > 0 {} }");
        assert!(diags.is_empty());
        let main_ref = arena.ref_ids().find(|r| arena.r#ref(*r).name == "main").unwrap();
        let entry = arena.r#ref(main_ref).entry_block.unwrap();
        let reachable = arena.reachable_blocks(entry);
        // entry, cond, loop, exit => at least 4 blocks
        assert!(reachable.len() >= 4);
    }

    #[test]
    fn selector_creates_cached_field_ref() {
        let (arena, diags) = lower("struct test { a int; } fn main() { var b test; var c = b.a; }");
        assert!(diags.is_empty());
        let b_ref = arena.ref_ids().find(|r| arena.r#ref(*r).name == "b").unwrap();
        assert!(arena.r#ref(b_ref).members.contains_key("a"));
    }

    #[test]
    fn reports_undeclared_name() {
        let (_, diags) = lower("fn main() { var a = b; }");
        assert!(!diags.is_empty());
    }
}
