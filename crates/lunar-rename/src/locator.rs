//! Declaration Locator: resolve an occurrence (or a bare name) to the
//! canonical declaration it refers to.
//!
//! Resolution walks the owner chain from the occurrence's scope toward the
//! module root. The nearest enclosing declaration of the same name wins; a
//! match inside a function scope stops the search, which is what makes
//! shadowing work. A name with no reachable declaration resolves to an
//! implicit global at module scope, which the engine still renames
//! best-effort across module-scope occurrences of the same spelling.
//!
//! Canonicalization happens here, up front: resolving a call-expression
//! occurrence lands on the function's declaration before any renaming
//! starts, so the walker never needs the original's recursive
//! call-site/declaration convergence.

use lunar_foundation::{
    ElementId, FileId, OccurrenceId, RefactorError, RefactorResult, ScopeKind, SymbolKind,
    Visibility,
};
use lunar_scope::ScopeTree;
use tracing::trace;

/// Where a resolved name is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationSite {
    /// The occurrence that introduces the name.
    Explicit(OccurrenceId),
    /// No reachable declaration; the name is an implicit global.
    Implicit,
}

/// The canonical declaration a rename operation targets.
///
/// Visibility is decided here, once per operation, and never re-examined
/// mid-rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDeclaration {
    /// File whose tree the declaration lives in
    pub file: FileId,
    /// Declaring occurrence, or implicit
    pub site: DeclarationSite,
    /// Scope that owns the declaration (module root when implicit)
    pub scope: ElementId,
    /// Declared spelling
    pub name: String,
    /// Kind used for strategy dispatch
    pub kind: SymbolKind,
    pub visibility: Visibility,
}

impl ResolvedDeclaration {
    pub fn is_implicit(&self) -> bool {
        self.site == DeclarationSite::Implicit
    }
}

/// Resolve the declaration for an existing occurrence.
///
/// Fails with `InvalidElement` for occurrences without declaration
/// semantics (literals, table-field initializers surfaced as `Other`,
/// block constructs), and `InvalidParent` for a parameter that is not
/// owned by a function scope.
pub fn resolve_occurrence(
    tree: &ScopeTree,
    occurrence: OccurrenceId,
) -> RefactorResult<ResolvedDeclaration> {
    let occ = tree.occurrence(occurrence);
    match occ.kind {
        SymbolKind::Literal | SymbolKind::Other => {
            return Err(RefactorError::invalid_element(format!(
                "{} `{}`",
                occ.kind, occ.name
            )));
        }
        SymbolKind::Parameter if tree.element(occ.owner).kind == ScopeKind::Module => {
            return Err(RefactorError::invalid_parent(occ.name.clone()));
        }
        _ => {}
    }

    if occ.is_declaration() {
        let visibility = occ.declaration.expect("checked is_declaration");
        trace!(name = %occ.name, ?visibility, "occurrence is its own declaration");
        return Ok(ResolvedDeclaration {
            file: tree.file().clone(),
            site: DeclarationSite::Explicit(occurrence),
            scope: occ.owner,
            name: occ.name.clone(),
            kind: occ.kind,
            visibility,
        });
    }

    Ok(resolve_name(tree, &occ.name, occ.owner, occ.kind))
}

/// Resolve a bare name from a starting scope; never fails, falling back to
/// an implicit global. `fallback_kind` classifies the result when no
/// explicit declaration is found (a call expression yields a Function).
pub fn resolve_name(
    tree: &ScopeTree,
    name: &str,
    start: ElementId,
    fallback_kind: SymbolKind,
) -> ResolvedDeclaration {
    for scope in tree.scope_chain(start) {
        if let Some(decl) = tree.find_declaration(scope, name) {
            let data = tree.occurrence(decl);
            let visibility = data.declaration.expect("find_declaration filters");
            trace!(name, scope = scope.0, ?visibility, "resolved declaration");
            return ResolvedDeclaration {
                file: tree.file().clone(),
                site: DeclarationSite::Explicit(decl),
                scope,
                name: name.to_string(),
                kind: data.kind,
                visibility,
            };
        }
    }

    trace!(name, "no reachable declaration; treating as implicit global");
    ResolvedDeclaration {
        file: tree.file().clone(),
        site: DeclarationSite::Implicit,
        scope: tree.root(),
        name: name.to_string(),
        kind: canonical_kind(fallback_kind),
        visibility: Visibility::Global,
    }
}

/// Call expressions canonicalize to the Function kind.
fn canonical_kind(kind: SymbolKind) -> SymbolKind {
    match kind {
        SymbolKind::Call => SymbolKind::Function,
        other => other,
    }
}

/// Whether an occurrence in `tree` refers to `target`.
///
/// The occurrence is re-resolved through the same rule used to locate the
/// target, which is what protects shadowed occurrences: an intervening
/// local declaration of the same name resolves to a different site.
pub fn resolves_to(tree: &ScopeTree, occurrence: OccurrenceId, target: &ResolvedDeclaration) -> bool {
    let occ = tree.occurrence(occurrence);
    if occ.name != target.name {
        return false;
    }
    if matches!(occ.kind, SymbolKind::Literal | SymbolKind::Other) {
        return false;
    }

    let resolved = if occ.is_declaration() {
        match resolve_occurrence(tree, occurrence) {
            Ok(r) => r,
            Err(_) => return false,
        }
    } else {
        resolve_name(tree, &occ.name, occ.owner, occ.kind)
    };

    if target.visibility == Visibility::Global && tree.file() != &target.file {
        // Cross-file: a global matches any occurrence that resolves to the
        // other file's module scope, explicitly declared there or implicit.
        return resolved.visibility == Visibility::Global && resolved.scope == tree.root();
    }

    match (resolved.site, target.site) {
        (DeclarationSite::Explicit(a), DeclarationSite::Explicit(b)) => a == b,
        (DeclarationSite::Implicit, DeclarationSite::Implicit) => resolved.scope == tree.root(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunar_foundation::SourceSpan;
    use lunar_scope::ScopeTreeBuilder;
    use pretty_assertions::assert_eq;

    fn span() -> SourceSpan {
        SourceSpan::on_line(0, 0, 1)
    }

    #[test]
    fn reference_resolves_to_nearest_enclosing_declaration() {
        let mut b = ScopeTreeBuilder::new("a.lua");
        let outer = b.declare("x", SymbolKind::Variable, Visibility::Global, span());
        b.begin_function("f", Visibility::Global, span());
        let inner = b.declare("x", SymbolKind::Variable, Visibility::Local, span());
        let reference = b.reference("x", SymbolKind::Variable, span());
        b.end_function();
        let tree = b.finish();

        let resolved = resolve_occurrence(&tree, reference).unwrap();
        assert_eq!(resolved.site, DeclarationSite::Explicit(inner));
        assert_eq!(resolved.visibility, Visibility::Local);
        assert_ne!(resolved.site, DeclarationSite::Explicit(outer));
    }

    #[test]
    fn unshadowed_reference_reaches_module_scope() {
        let mut b = ScopeTreeBuilder::new("a.lua");
        let decl = b.declare("x", SymbolKind::Variable, Visibility::Global, span());
        b.begin_function("f", Visibility::Global, span());
        let reference = b.reference("x", SymbolKind::Variable, span());
        b.end_function();
        let tree = b.finish();

        let resolved = resolve_occurrence(&tree, reference).unwrap();
        assert_eq!(resolved.site, DeclarationSite::Explicit(decl));
        assert_eq!(resolved.visibility, Visibility::Global);
    }

    #[test]
    fn call_canonicalizes_to_the_function_declaration() {
        let mut b = ScopeTreeBuilder::new("a.lua");
        let decl = b.begin_function("tick", Visibility::Global, span());
        b.end_function();
        let call = b.call("tick", span());
        let tree = b.finish();

        let resolved = resolve_occurrence(&tree, call).unwrap();
        assert_eq!(resolved.site, DeclarationSite::Explicit(decl));
        assert_eq!(resolved.kind, SymbolKind::Function);
    }

    #[test]
    fn unknown_name_is_an_implicit_global() {
        let mut b = ScopeTreeBuilder::new("a.lua");
        let reference = b.reference("mystery", SymbolKind::Variable, span());
        let tree = b.finish();

        let resolved = resolve_occurrence(&tree, reference).unwrap();
        assert!(resolved.is_implicit());
        assert_eq!(resolved.visibility, Visibility::Global);
        assert_eq!(resolved.scope, tree.root());
    }

    #[test]
    fn literals_are_not_renameable() {
        let mut b = ScopeTreeBuilder::new("a.lua");
        let lit = b.reference("42", SymbolKind::Literal, span());
        let tree = b.finish();

        assert!(matches!(
            resolve_occurrence(&tree, lit),
            Err(RefactorError::InvalidElement { .. })
        ));
    }

    #[test]
    fn module_level_parameter_is_invalid_parent() {
        let mut b = ScopeTreeBuilder::new("a.lua");
        let param = b.param("dt", span());
        let tree = b.finish();

        assert!(matches!(
            resolve_occurrence(&tree, param),
            Err(RefactorError::InvalidParent { .. })
        ));
    }

    #[test]
    fn shadowed_occurrence_does_not_resolve_to_outer_target() {
        let mut b = ScopeTreeBuilder::new("a.lua");
        let outer = b.declare("x", SymbolKind::Variable, Visibility::Global, span());
        let outer_ref = b.reference("x", SymbolKind::Variable, span());
        b.begin_function("f", Visibility::Global, span());
        b.declare("x", SymbolKind::Variable, Visibility::Local, span());
        let shadowed_ref = b.reference("x", SymbolKind::Variable, span());
        b.end_function();
        let tree = b.finish();

        let target = resolve_occurrence(&tree, outer).unwrap();
        assert!(resolves_to(&tree, outer_ref, &target));
        assert!(!resolves_to(&tree, shadowed_ref, &target));
    }
}
