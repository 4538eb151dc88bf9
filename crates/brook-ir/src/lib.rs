//! The IR data model, the AST-to-IR lowerer, the builtin environment, and
//! the textual IR printer.

pub mod arena;
pub mod builtins;
pub mod lower;
pub mod printer;
pub mod types;

pub use arena::{
    Arena, Block, BinaryOp, BlockId, Instr, InstrId, InstrNode, ObjectId, ObjectKind, ObjectNode,
    Program, Progress, RefId, RefKind, RefNode, UnaryOp, ValueId,
};
pub use brook_parser::ast::Literal;
pub use types::{FunctionType, InterfaceType, PrimitiveType, SequenceSpec, SequenceType, StructType, Type};

/// A single `impl Type [: Interface] { ... }` block, recorded at the
/// program level so the type checker can validate interface conformance
/// and resolve method selectors.
pub struct ImplBlock {
    pub type_name: String,
    pub interface_name: Option<String>,
    pub methods: Vec<(String, RefId)>,
    pub declare_methods_instr: InstrId,
}
