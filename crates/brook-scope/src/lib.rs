//! Lexical scope chain for the Brook language.
//!
//! This crate is deliberately ignorant of what is being bound — it only
//! knows how to chain name-to-id maps and walk them. The id type is a
//! generic parameter so this crate has no dependency on the IR; the IR
//! crate instantiates `Scope<RefId>` and is the one that knows what a
//! `RefId` names.

pub mod scope;

pub use scope::{Scope, ScopeId};
