//! The predeclared primitive types and the intrinsic range constructor.
//! Builtins are constructed once per compilation and passed explicitly
//! into the lowerer rather than held in global mutable state.

use crate::arena::{Arena, RefKind};
use crate::types::{FunctionType, PrimitiveType, SequenceSpec, SequenceType, Type};
use brook_common::Span;
use brook_scope::{Scope, ScopeId};

/// Resolves one of the six primitive type keywords. Returns `None` for any
/// other name, which the caller then looks up in `named_types` instead.
pub fn primitive_type(name: &str) -> Option<Type> {
    Some(match name {
        "int" => Type::Primitive(PrimitiveType::Int),
        "float" => Type::Primitive(PrimitiveType::Float),
        "frac" => Type::Primitive(PrimitiveType::Rational),
        "char" => Type::Primitive(PrimitiveType::Char),
        "bool" => Type::Primitive(PrimitiveType::Bool),
        "str" => Type::Primitive(PrimitiveType::Str),
        _ => return None,
    })
}

/// The intrinsic backing `[a:b]` range expressions, exposed in the root
/// scope under a name no source identifier can spell.
pub const RANGE_INTRINSIC_NAME: &str = "__range";

pub struct Builtins {
    pub scope: Scope<crate::RefId>,
    pub root: ScopeId,
    pub range_ref: crate::RefId,
}

pub fn install(arena: &mut Arena) -> Builtins {
    let (mut scope, root) = Scope::new();
    let range_ref = arena.alloc_ref(RefKind::Function, RANGE_INTRINSIC_NAME, Span::dummy());
    arena.ref_mut(range_ref).typ = Type::Function(FunctionType {
        params: vec![Type::int(), Type::int()],
        return_type: Some(Box::new(Type::Sequence(SequenceType {
            spec: SequenceSpec::Array(None),
            element: Box::new(Type::int()),
        }))),
    });
    scope.declare(root, RANGE_INTRINSIC_NAME, range_ref);
    Builtins { scope, root, range_ref }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_primitive_keywords() {
        assert_eq!(primitive_type("int"), Some(Type::int()));
        assert_eq!(primitive_type("widget"), None);
    }

    #[test]
    fn installs_range_intrinsic_in_root_scope() {
        let mut arena = Arena::new();
        let builtins = install(&mut arena);
        assert_eq!(
            builtins.scope.lookup(builtins.root, RANGE_INTRINSIC_NAME),
            Some(builtins.range_ref)
        );
    }
}
