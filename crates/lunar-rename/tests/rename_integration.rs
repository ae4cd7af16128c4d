//! End-to-end rename scenarios across the engine surface.

use lunar_foundation::{FileId, RefactorError, SourceSpan, SymbolKind, Visibility};
use lunar_rename::{
    ConflictDecision, ConflictSet, ConflictUi, RejectConflicts, RenameEngine,
};
use lunar_scope::{ProjectWorkspace, ScopeTree, ScopeTreeBuilder, StaticTreeProvider};
use pretty_assertions::assert_eq;

fn span(line: u32, col: u32) -> SourceSpan {
    SourceSpan::on_line(line, col, 1)
}

fn engine_with(trees: Vec<ScopeTree>) -> RenameEngine {
    let mut ws = ProjectWorkspace::new(Box::new(StaticTreeProvider::new()));
    for tree in trees {
        ws.insert_tree(tree);
    }
    RenameEngine::new(ws)
}

/// ConflictUi that records what it was asked and replays scripted answers.
struct ScriptedUi {
    answers: Vec<ConflictDecision>,
    prompts: Vec<(String, String, usize)>,
}

impl ScriptedUi {
    fn new(answers: Vec<ConflictDecision>) -> Self {
        Self {
            answers,
            prompts: Vec::new(),
        }
    }
}

impl ConflictUi for ScriptedUi {
    fn resolve_conflicts(
        &mut self,
        old_name: &str,
        kind_label: &str,
        conflicts: &ConflictSet,
    ) -> ConflictDecision {
        self.prompts
            .push((old_name.to_string(), kind_label.to_string(), conflicts.entries.len()));
        if self.answers.is_empty() {
            ConflictDecision::Cancel
        } else {
            self.answers.remove(0)
        }
    }
}

/// Two-file project: a global `x` declared in F1 and referenced in F1 and
/// F2; F2 also has an unrelated function-local `x`.
fn two_file_fixture() -> (RenameEngine, Vec<lunar_foundation::OccurrenceId>) {
    let mut f1 = ScopeTreeBuilder::new("f1.lua");
    let decl = f1.declare("x", SymbolKind::Variable, Visibility::Global, span(0, 0));
    let f1_ref = f1.reference("x", SymbolKind::Variable, span(2, 8));
    let f1 = f1.finish();

    let mut f2 = ScopeTreeBuilder::new("f2.lua");
    let f2_top_ref = f2.reference("x", SymbolKind::Variable, span(0, 4));
    f2.begin_function("helper", Visibility::Global, span(2, 9));
    let f2_local = f2.declare("x", SymbolKind::Variable, Visibility::Local, span(3, 8));
    let f2_local_ref = f2.reference("x", SymbolKind::Variable, span(4, 11));
    f2.end_function();
    let f2 = f2.finish();

    (
        engine_with(vec![f1, f2]),
        vec![decl, f1_ref, f2_top_ref, f2_local, f2_local_ref],
    )
}

#[test]
fn global_rename_crosses_files_but_respects_shadowing() {
    let (mut engine, ids) = two_file_fixture();
    let (decl, f1_ref, f2_top_ref, f2_local, f2_local_ref) =
        (ids[0], ids[1], ids[2], ids[3], ids[4]);

    let op = engine
        .rename_occurrence(&mut RejectConflicts, &FileId::from("f1.lua"), decl, "y")
        .unwrap();

    assert_eq!(op.outcome.changed_count(), 3);
    assert_eq!(
        op.outcome.touched_files,
        vec![FileId::from("f1.lua"), FileId::from("f2.lua")]
    );

    let ws = engine.workspace_mut();
    let f1 = ws.tree(&FileId::from("f1.lua")).unwrap();
    assert_eq!(f1.occurrence(decl).name, "y");
    assert_eq!(f1.occurrence(f1_ref).name, "y");

    let f2 = ws.tree(&FileId::from("f2.lua")).unwrap();
    assert_eq!(f2.occurrence(f2_top_ref).name, "y");
    // The function-local `x` resolves to a different declaration.
    assert_eq!(f2.occurrence(f2_local).name, "x");
    assert_eq!(f2.occurrence(f2_local_ref).name, "x");
}

#[test]
fn local_rename_never_escapes_its_scope() {
    let (mut engine, ids) = two_file_fixture();
    let f2_local = ids[3];

    let op = engine
        .rename_occurrence(&mut RejectConflicts, &FileId::from("f2.lua"), f2_local, "count")
        .unwrap();

    // Only the local declaration and its reference inside the function.
    assert_eq!(op.outcome.changed_count(), 2);
    assert_eq!(op.outcome.touched_files, vec![FileId::from("f2.lua")]);

    let ws = engine.workspace_mut();
    let f1 = ws.tree(&FileId::from("f1.lua")).unwrap();
    assert_eq!(f1.occurrence(ids[0]).name, "x");
    let f2 = ws.tree(&FileId::from("f2.lua")).unwrap();
    assert_eq!(f2.occurrence(ids[2]).name, "x");
}

#[test]
fn call_site_and_declaration_triggers_converge() {
    for call_sites in [0usize, 1, 3] {
        let build = || {
            let mut b = ScopeTreeBuilder::new("m.lua");
            let decl = b.begin_function("tick", Visibility::Global, span(0, 9));
            b.end_function();
            let mut calls = Vec::new();
            for i in 0..call_sites {
                calls.push(b.call("tick", span(2 + i as u32, 0)));
            }
            (b.finish(), decl, calls)
        };

        let (tree, decl, _) = build();
        let mut via_decl = engine_with(vec![tree]);
        via_decl
            .rename_occurrence(&mut RejectConflicts, &FileId::from("m.lua"), decl, "update")
            .unwrap();

        let (tree, _, calls) = build();
        let mut via_call = engine_with(vec![tree]);
        if let Some(&first_call) = calls.first() {
            via_call
                .rename_occurrence(&mut RejectConflicts, &FileId::from("m.lua"), first_call, "update")
                .unwrap();

            let file = FileId::from("m.lua");
            let a = via_decl.workspace_mut().tree(&file).unwrap().clone();
            let b = via_call.workspace_mut().tree(&file).unwrap().clone();
            for id in a.occurrences_below(a.root()) {
                assert_eq!(a.occurrence(id).name, b.occurrence(id).name);
                assert_eq!(a.occurrence(id).name, "update");
            }
        }
    }
}

#[test]
fn conflicting_new_name_is_rejected_with_zero_mutations() {
    let mut b = ScopeTreeBuilder::new("m.lua");
    let decl = b.declare("x", SymbolKind::Variable, Visibility::Global, span(0, 0));
    let other = b.declare("y", SymbolKind::Variable, Visibility::Global, span(1, 0));
    let mut engine = engine_with(vec![b.finish()]);
    let file = FileId::from("m.lua");

    let err = engine
        .rename_occurrence(&mut RejectConflicts, &file, decl, "y")
        .unwrap_err();
    assert!(matches!(err, RefactorError::ConflictUnresolved));

    let tree = engine.workspace_mut().tree(&file).unwrap();
    assert_eq!(tree.occurrence(decl).name, "x");
    assert_eq!(tree.occurrence(other).name, "y");
    assert!(!tree.is_dirty());
}

#[test]
fn conflict_loop_accepts_a_replacement_name() {
    let mut b = ScopeTreeBuilder::new("m.lua");
    let decl = b.declare("x", SymbolKind::Variable, Visibility::Global, span(0, 0));
    b.declare("y", SymbolKind::Variable, Visibility::Global, span(1, 0));
    let mut engine = engine_with(vec![b.finish()]);

    let mut ui = ScriptedUi::new(vec![ConflictDecision::ReplaceName("z".to_string())]);
    let op = engine
        .rename_occurrence(&mut ui, &FileId::from("m.lua"), decl, "y")
        .unwrap();

    assert_eq!(ui.prompts.len(), 1);
    assert_eq!(ui.prompts[0].0, "x");
    assert_eq!(ui.prompts[0].1, "variable");
    assert_eq!(op.undo.new_name, "z");

    let tree = engine.workspace_mut().tree(&FileId::from("m.lua")).unwrap();
    assert_eq!(tree.occurrence(decl).name, "z");
}

#[test]
fn conflict_loop_can_proceed_anyway() {
    let mut b = ScopeTreeBuilder::new("m.lua");
    let decl = b.declare("x", SymbolKind::Variable, Visibility::Global, span(0, 0));
    b.declare("y", SymbolKind::Variable, Visibility::Global, span(1, 0));
    let mut engine = engine_with(vec![b.finish()]);

    let mut ui = ScriptedUi::new(vec![ConflictDecision::ProceedAnyway]);
    let op = engine
        .rename_occurrence(&mut ui, &FileId::from("m.lua"), decl, "y")
        .unwrap();
    assert_eq!(op.undo.new_name, "y");
}

#[test]
fn reserved_names_abort_before_any_mutation() {
    let mut b = ScopeTreeBuilder::new("m.lua");
    let decl = b.declare("x", SymbolKind::Variable, Visibility::Global, span(0, 0));
    b.reference("x", SymbolKind::Variable, span(1, 0));
    let mut engine = engine_with(vec![b.finish()]);
    let file = FileId::from("m.lua");

    let err = engine
        .rename_occurrence(&mut RejectConflicts, &file, decl, "print")
        .unwrap_err();
    assert!(matches!(err, RefactorError::SymbolReserved { .. }));

    let tree = engine.workspace_mut().tree(&file).unwrap();
    assert!(!tree.is_dirty());
    assert_eq!(tree.occurrence(decl).name, "x");
}

#[test]
fn undo_restores_every_file_and_marks_dirty() {
    let (mut engine, ids) = two_file_fixture();
    let decl = ids[0];

    let op = engine
        .rename_occurrence(&mut RejectConflicts, &FileId::from("f1.lua"), decl, "y")
        .unwrap();

    // Host synchronized its buffers; dirty flags are clear before undo.
    for file in ["f1.lua", "f2.lua"] {
        engine
            .workspace_mut()
            .tree_mut(&FileId::from(file))
            .unwrap()
            .clear_dirty();
    }

    op.undo.apply(engine.workspace_mut()).unwrap();

    let ws = engine.workspace_mut();
    for file in ["f1.lua", "f2.lua"] {
        let tree = ws.tree(&FileId::from(file)).unwrap();
        assert!(tree.is_dirty());
        for id in tree.occurrences_below(tree.root()) {
            assert_ne!(tree.occurrence(id).name, "y");
        }
    }
}

#[test]
fn failed_file_is_recorded_without_reverting_siblings() {
    let mut f1 = ScopeTreeBuilder::new("f1.lua");
    let decl = f1.declare("score", SymbolKind::Variable, Visibility::Global, span(0, 0));
    let f1 = f1.finish();

    let mut ok = ScopeTreeBuilder::new("ok.lua");
    let ok_ref = ok.reference("score", SymbolKind::Variable, span(0, 0));
    let ok = ok.finish();

    // Registered but unparsable: the provider has no tree for it.
    let mut provider = StaticTreeProvider::new();
    provider.insert(ok.clone());
    let mut ws = ProjectWorkspace::new(Box::new(provider));
    ws.insert_tree(f1);
    ws.insert_tree(ok);
    ws.register_file("broken.lua");
    let mut engine = RenameEngine::new(ws);

    let op = engine
        .rename_occurrence(&mut RejectConflicts, &FileId::from("f1.lua"), decl, "points")
        .unwrap();

    assert_eq!(op.outcome.failed_files(), vec![&FileId::from("broken.lua")]);
    assert_eq!(op.outcome.changed_count(), 2);

    let tree = engine.workspace_mut().tree(&FileId::from("ok.lua")).unwrap();
    assert_eq!(tree.occurrence(ok_ref).name, "points");
}

#[test]
fn implicit_global_gets_a_best_effort_rename() {
    // `score` is assigned in two files with no explicit declaration node.
    let mut f1 = ScopeTreeBuilder::new("f1.lua");
    let w = f1.reference("score", SymbolKind::Variable, span(0, 0));
    let f1 = f1.finish();

    let mut f2 = ScopeTreeBuilder::new("f2.lua");
    let r = f2.reference("score", SymbolKind::Variable, span(3, 10));
    let f2 = f2.finish();

    let mut engine = engine_with(vec![f1, f2]);
    let op = engine
        .rename_occurrence(&mut RejectConflicts, &FileId::from("f1.lua"), w, "points")
        .unwrap();

    assert_eq!(op.outcome.changed_count(), 2);
    let ws = engine.workspace_mut();
    assert_eq!(
        ws.tree(&FileId::from("f1.lua")).unwrap().occurrence(w).name,
        "points"
    );
    assert_eq!(
        ws.tree(&FileId::from("f2.lua")).unwrap().occurrence(r).name,
        "points"
    );
}
