//! The per-file scoped element tree.
//!
//! A tree is arena-backed: scope elements and symbol occurrences live in
//! flat vectors addressed by [`ElementId`] / [`OccurrenceId`] indices. Ids
//! are only ever minted by the owning tree, so indexing is infallible.

use lunar_foundation::{
    ElementId, FileId, OccurrenceId, ScopeKind, SourceSpan, SymbolKind, Visibility,
};

/// A tree node that can own declarations: the module root or a function body.
#[derive(Debug, Clone)]
pub struct ScopeElementData {
    /// Module or function scope
    pub kind: ScopeKind,
    /// Enclosing scope; `None` only at the module root
    pub parent: Option<ElementId>,
    /// Nested function scopes, in source order
    pub children: Vec<ElementId>,
    /// Occurrences owned directly by this scope, in source order
    pub occurrences: Vec<OccurrenceId>,
}

/// A named leaf of the tree: identifier, function name, call, or literal.
#[derive(Debug, Clone)]
pub struct OccurrenceData {
    /// Current spelling of the symbol
    pub name: String,
    /// Identifier span in the source text
    pub span: SourceSpan,
    /// Scope that owns this occurrence
    pub owner: ElementId,
    /// Syntactic classification
    pub kind: SymbolKind,
    /// `Some` when this occurrence introduces the name into its scope
    pub declaration: Option<Visibility>,
}

impl OccurrenceData {
    pub fn is_declaration(&self) -> bool {
        self.declaration.is_some()
    }
}

/// The parsed scope tree of one file.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    file: FileId,
    root: ElementId,
    elements: Vec<ScopeElementData>,
    occurrences: Vec<OccurrenceData>,
    dirty: bool,
}

impl ScopeTree {
    /// Create an empty tree holding only the module root.
    pub fn new(file: FileId) -> Self {
        Self {
            file,
            root: ElementId(0),
            elements: vec![ScopeElementData {
                kind: ScopeKind::Module,
                parent: None,
                children: Vec::new(),
                occurrences: Vec::new(),
            }],
            occurrences: Vec::new(),
            dirty: false,
        }
    }

    pub fn file(&self) -> &FileId {
        &self.file
    }

    /// The module scope of this file.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Whether the tree has unsynchronized mutations the host must merge.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Called by the host after re-synchronizing its view.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Add a nested function scope under `parent`.
    pub fn add_scope(&mut self, parent: ElementId, kind: ScopeKind) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(ScopeElementData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            occurrences: Vec::new(),
        });
        self.elements[parent.0 as usize].children.push(id);
        id
    }

    /// Add an occurrence owned by `owner`.
    pub fn add_occurrence(
        &mut self,
        owner: ElementId,
        name: impl Into<String>,
        kind: SymbolKind,
        declaration: Option<Visibility>,
        span: SourceSpan,
    ) -> OccurrenceId {
        let id = OccurrenceId(self.occurrences.len() as u32);
        self.occurrences.push(OccurrenceData {
            name: name.into(),
            span,
            owner,
            kind,
            declaration,
        });
        self.elements[owner.0 as usize].occurrences.push(id);
        id
    }

    pub fn element(&self, id: ElementId) -> &ScopeElementData {
        &self.elements[id.0 as usize]
    }

    pub fn occurrence(&self, id: OccurrenceId) -> &OccurrenceData {
        &self.occurrences[id.0 as usize]
    }

    /// Rewrite an occurrence's name field, returning the previous spelling.
    /// Marks the tree dirty: the textual merge back into the host buffer is
    /// the host's responsibility.
    pub fn set_name(&mut self, id: OccurrenceId, name: impl Into<String>) -> String {
        self.dirty = true;
        std::mem::replace(&mut self.occurrences[id.0 as usize].name, name.into())
    }

    /// Occurrences directly owned by `scope`, in source order.
    pub fn occurrences_in(
        &self,
        scope: ElementId,
    ) -> impl Iterator<Item = (OccurrenceId, &OccurrenceData)> {
        self.element(scope)
            .occurrences
            .iter()
            .map(move |&id| (id, self.occurrence(id)))
    }

    /// Declarations directly owned by `scope`.
    pub fn declarations_in(
        &self,
        scope: ElementId,
    ) -> impl Iterator<Item = (OccurrenceId, &OccurrenceData)> {
        self.occurrences_in(scope).filter(|(_, o)| o.is_declaration())
    }

    /// A declaration of `name` directly owned by `scope`, if any.
    pub fn find_declaration(&self, scope: ElementId, name: &str) -> Option<OccurrenceId> {
        self.declarations_in(scope)
            .find(|(_, o)| o.name == name)
            .map(|(id, _)| id)
    }

    /// Depth-first, source-ordered occurrence ids of `scope` and every
    /// scope nested below it.
    pub fn occurrences_below(&self, scope: ElementId) -> Vec<OccurrenceId> {
        let mut out = Vec::new();
        let mut stack = vec![scope];
        while let Some(element) = stack.pop() {
            out.extend(self.element(element).occurrences.iter().copied());
            // Reverse so children pop in source order.
            stack.extend(self.element(element).children.iter().rev().copied());
        }
        out
    }

    /// Walk from `scope` toward the module root, inclusive.
    pub fn scope_chain(&self, scope: ElementId) -> Vec<ElementId> {
        let mut chain = vec![scope];
        let mut current = scope;
        while let Some(parent) = self.element(current).parent {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// The occurrence the name-based rename overload should target:
    /// the first declaration with the given spelling in depth-first order,
    /// else the first occurrence that carries rename semantics at all.
    /// Literals and other non-symbol occurrences never match, so an
    /// incidental spelling cannot hide a renameable declaration.
    pub fn find_occurrence_by_name(&self, name: &str) -> Option<OccurrenceId> {
        let mut first_reference = None;
        for id in self.occurrences_below(self.root) {
            let occ = self.occurrence(id);
            if occ.name != name
                || matches!(occ.kind, SymbolKind::Literal | SymbolKind::Other)
            {
                continue;
            }
            if occ.is_declaration() {
                return Some(id);
            }
            if first_reference.is_none() {
                first_reference = Some(id);
            }
        }
        first_reference
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn occurrence_count(&self) -> usize {
        self.occurrences.len()
    }
}
