//! Semantic types. These are compared structurally and carry no arena
//! indices of their own — unlike the IR graph, a `Type` value has no
//! cycles, so a plain recursive enum (with `Box` for the few self
//! referential spots) is the idiomatic representation.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveType {
    Int,
    Float,
    Rational,
    Char,
    Bool,
    Str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceSpec {
    Array(Option<u32>),
    Vector,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SequenceType {
    pub spec: SequenceSpec,
    pub element: Box<Type>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionType {
    pub params: Vec<Type>,
    pub return_type: Option<Box<Type>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<(String, Type)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceType {
    pub name: String,
    pub methods: Vec<(String, FunctionType)>,
}

/// A semantic type, possibly still partially unresolved. `Unknown` is an
/// explicit value rather than the absence of a node, per invariant I7 —
/// every typed position in the IR always carries a `Type`.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Unknown,
    Primitive(PrimitiveType),
    Sequence(SequenceType),
    Struct(StructType),
    Interface(InterfaceType),
    Function(FunctionType),
}

impl Type {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Type::Primitive(PrimitiveType::Int | PrimitiveType::Float | PrimitiveType::Rational)
        )
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveType::Bool))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveType::Str))
    }

    pub fn int() -> Type {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn float() -> Type {
        Type::Primitive(PrimitiveType::Float)
    }

    pub fn rational() -> Type {
        Type::Primitive(PrimitiveType::Rational)
    }

    pub fn bool() -> Type {
        Type::Primitive(PrimitiveType::Bool)
    }

    pub fn str() -> Type {
        Type::Primitive(PrimitiveType::Str)
    }

    pub fn char() -> Type {
        Type::Primitive(PrimitiveType::Char)
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Unknown => write!(f, "?"),
            Type::Primitive(PrimitiveType::Int) => write!(f, "int"),
            Type::Primitive(PrimitiveType::Float) => write!(f, "float"),
            Type::Primitive(PrimitiveType::Rational) => write!(f, "frac"),
            Type::Primitive(PrimitiveType::Char) => write!(f, "char"),
            Type::Primitive(PrimitiveType::Bool) => write!(f, "bool"),
            Type::Primitive(PrimitiveType::Str) => write!(f, "str"),
            Type::Sequence(s) => match s.spec {
                SequenceSpec::Array(Some(len)) => write!(f, "arr[{}, {len}]", s.element),
                SequenceSpec::Array(None) => write!(f, "arr[{}]", s.element),
                SequenceSpec::Vector => write!(f, "vec[{}]", s.element),
            },
            Type::Struct(s) => write!(f, "{}", s.name),
            Type::Interface(i) => write!(f, "{}", i.name),
            Type::Function(func) => {
                write!(f, "fn (")?;
                for (i, p) in func.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") -> ")?;
                match &func.return_type {
                    Some(ret) => write!(f, "{ret}"),
                    None => write!(f, "nil"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_primitives() {
        assert_eq!(Type::int().to_string(), "int");
        assert_eq!(Type::Unknown.to_string(), "?");
    }

    #[test]
    fn displays_function_type() {
        let f = Type::Function(FunctionType {
            params: vec![Type::int(), Type::int()],
            return_type: Some(Box::new(Type::int())),
        });
        assert_eq!(f.to_string(), "fn (int, int) -> int");
    }
}
