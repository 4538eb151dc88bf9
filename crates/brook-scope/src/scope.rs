//! An arena of lexical scope frames, addressed by `ScopeId`, following the
//! same index-handle discipline the IR arena uses: scopes form a tree, but
//! are stored flat so frames can be referenced from outside without
//! lifetime gymnastics.

use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

struct Frame<Id> {
    parent: Option<ScopeId>,
    names: FxHashMap<String, Id>,
}

/// A chain of lexical scopes mapping names to ids of type `Id`.
pub struct Scope<Id> {
    frames: Vec<Frame<Id>>,
}

impl<Id: Copy> Scope<Id> {
    /// Creates a scope arena with a single root frame and returns its id.
    pub fn new() -> (Self, ScopeId) {
        let mut scope = Scope { frames: Vec::new() };
        let root = scope.push_frame(None);
        (scope, root)
    }

    fn push_frame(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.frames.len() as u32);
        self.frames.push(Frame {
            parent,
            names: FxHashMap::default(),
        });
        id
    }

    /// Creates a new child scope of `parent` and returns its id.
    pub fn enter(&mut self, parent: ScopeId) -> ScopeId {
        self.push_frame(Some(parent))
    }

    fn frame(&self, scope: ScopeId) -> &Frame<Id> {
        &self.frames[scope.0 as usize]
    }

    fn frame_mut(&mut self, scope: ScopeId) -> &mut Frame<Id> {
        &mut self.frames[scope.0 as usize]
    }

    /// Binds `name` in `scope`'s own frame. Returns the previous binding
    /// if `name` was already declared in this exact frame (a caller-level
    /// duplicate-declaration error).
    pub fn declare(&mut self, scope: ScopeId, name: impl Into<String>, id: Id) -> Option<Id> {
        self.frame_mut(scope).names.insert(name.into(), id)
    }

    /// Looks up `name` in `scope`, walking to parent frames as needed.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<Id> {
        let mut current = Some(scope);
        while let Some(s) = current {
            let frame = self.frame(s);
            if let Some(id) = frame.names.get(name) {
                return Some(*id);
            }
            current = frame.parent;
        }
        None
    }

    /// Looks up `name` only in `scope`'s own frame.
    pub fn strict_lookup(&self, scope: ScopeId, name: &str) -> Option<Id> {
        self.frame(scope).names.get(name).copied()
    }

    pub fn parent_of(&self, scope: ScopeId) -> Option<ScopeId> {
        self.frame(scope).parent
    }
}

impl<Id: Copy> Default for Scope<Id> {
    fn default() -> Self {
        Self::new().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_to_parent() {
        let (mut scope, root) = Scope::<u32>::new();
        scope.declare(root, "x", 1);
        let child = scope.enter(root);
        assert_eq!(scope.lookup(child, "x"), Some(1));
    }

    #[test]
    fn strict_lookup_does_not_see_parent() {
        let (mut scope, root) = Scope::<u32>::new();
        scope.declare(root, "x", 1);
        let child = scope.enter(root);
        assert_eq!(scope.strict_lookup(child, "x"), None);
    }

    #[test]
    fn shadowing_is_visible_from_child() {
        let (mut scope, root) = Scope::<u32>::new();
        scope.declare(root, "x", 1);
        let child = scope.enter(root);
        scope.declare(child, "x", 2);
        assert_eq!(scope.lookup(child, "x"), Some(2));
        assert_eq!(scope.lookup(root, "x"), Some(1));
    }

    #[test]
    fn redeclaring_in_same_frame_returns_previous() {
        let (mut scope, root) = Scope::<u32>::new();
        assert_eq!(scope.declare(root, "x", 1), None);
        assert_eq!(scope.declare(root, "x", 2), Some(1));
    }
}
