//! Builder used by hosts (and tests) to assemble scope trees.
//!
//! The parser side of the host walks its syntax tree and emits declarations,
//! references, and scope boundaries in source order; the builder keeps the
//! scope stack so callers never handle element ids directly.

use crate::element::ScopeTree;
use lunar_foundation::{
    ElementId, FileId, OccurrenceId, ScopeKind, SourceSpan, SymbolKind, Visibility,
};

/// Incrementally constructs a [`ScopeTree`] for one file.
pub struct ScopeTreeBuilder {
    tree: ScopeTree,
    stack: Vec<ElementId>,
}

impl ScopeTreeBuilder {
    pub fn new(file: impl Into<FileId>) -> Self {
        let tree = ScopeTree::new(file.into());
        let root = tree.root();
        Self {
            tree,
            stack: vec![root],
        }
    }

    fn current(&self) -> ElementId {
        *self.stack.last().expect("scope stack never empties")
    }

    /// Record a declaration in the current scope.
    pub fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        visibility: Visibility,
        span: SourceSpan,
    ) -> OccurrenceId {
        self.tree
            .add_occurrence(self.current(), name, kind, Some(visibility), span)
    }

    /// Record a non-declaring reference in the current scope.
    pub fn reference(&mut self, name: &str, kind: SymbolKind, span: SourceSpan) -> OccurrenceId {
        self.tree
            .add_occurrence(self.current(), name, kind, None, span)
    }

    /// Record a call-expression occurrence in the current scope.
    pub fn call(&mut self, name: &str, span: SourceSpan) -> OccurrenceId {
        self.reference(name, SymbolKind::Call, span)
    }

    /// Declare a function in the current scope and enter its body scope.
    /// The name belongs to the enclosing scope; parameters and locals that
    /// follow belong to the body.
    pub fn begin_function(
        &mut self,
        name: &str,
        visibility: Visibility,
        span: SourceSpan,
    ) -> OccurrenceId {
        let decl = self.declare(name, SymbolKind::Function, visibility, span);
        let body = self.tree.add_scope(self.current(), ScopeKind::Function);
        self.stack.push(body);
        decl
    }

    /// Enter an anonymous function body scope.
    pub fn begin_anonymous_function(&mut self) {
        let body = self.tree.add_scope(self.current(), ScopeKind::Function);
        self.stack.push(body);
    }

    /// Declare a parameter of the function scope currently open.
    pub fn param(&mut self, name: &str, span: SourceSpan) -> OccurrenceId {
        self.declare(name, SymbolKind::Parameter, Visibility::Local, span)
    }

    /// Close the innermost function scope.
    pub fn end_function(&mut self) {
        debug_assert!(self.stack.len() > 1, "end_function at module scope");
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub fn finish(self) -> ScopeTree {
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn span() -> SourceSpan {
        SourceSpan::on_line(0, 0, 1)
    }

    #[test]
    fn function_name_belongs_to_enclosing_scope() {
        let mut b = ScopeTreeBuilder::new("a.lua");
        let decl = b.begin_function("tick", Visibility::Global, span());
        let param = b.param("dt", span());
        b.end_function();
        let tree = b.finish();

        assert_eq!(tree.occurrence(decl).owner, tree.root());
        assert_ne!(tree.occurrence(param).owner, tree.root());
        assert_eq!(tree.occurrence(param).declaration, Some(Visibility::Local));
    }

    #[test]
    fn nested_functions_unwind_correctly() {
        let mut b = ScopeTreeBuilder::new("a.lua");
        b.begin_function("outer", Visibility::Global, span());
        b.begin_function("inner", Visibility::Local, span());
        b.end_function();
        let after_inner = b.declare("x", SymbolKind::Variable, Visibility::Local, span());
        b.end_function();
        let tree = b.finish();

        // `x` landed in outer's body, not inner's.
        let outer_body = tree.element(tree.root()).children[0];
        assert_eq!(tree.occurrence(after_inner).owner, outer_body);
    }
}
