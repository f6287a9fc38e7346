//! Tests for the editing facade: structural actions, clipboard and undo.
mod common;
use common::*;
use zukei::prelude::*;

fn with_edge(mut snapshot: Snapshot, source: &str, target: &str) -> Snapshot {
    snapshot.edges.push(edge(source, target));
    snapshot
}

#[test]
fn test_builder_rejects_invalid_graph() {
    let broken = Snapshot::new(vec![child("a", "ghost", 0.0, 0.0)], vec![]);
    assert!(matches!(
        Editor::builder(broken).build(),
        Err(GraphError::MissingParent { .. })
    ));
}

#[test]
fn test_each_action_is_one_undo_step() {
    let mut editor = editor(Snapshot::default());
    let a = editor.add_step("A", Point::ORIGIN, None).expect("add A");
    let b = editor.add_step("B", Point::ORIGIN, None).expect("add B");
    let e = editor.connect(&a, &b, "").expect("connect");

    assert_eq!((a.as_str(), b.as_str(), e.as_str()), ("node-1", "node-2", "edge-3"));
    assert_eq!(editor.history().undo_depth(), 3);

    assert!(editor.undo());
    assert!(editor.edges().is_empty());
    assert_eq!(editor.nodes().len(), 2);

    assert!(editor.redo());
    assert_eq!(editor.edges()[0].id, e);
}

#[test]
fn test_connect_declines_without_side_effects() {
    let mut editor = editor(chain(&["a", "b"]));

    assert_eq!(
        editor.connect("a", "a", ""),
        Err(EditError::SelfConnection("a".to_string()))
    );
    assert!(matches!(
        editor.connect("a", "b", ""),
        Err(EditError::DuplicateConnection { .. })
    ));
    assert_eq!(
        editor.connect("a", "ghost", ""),
        Err(EditError::NodeNotFound("ghost".to_string()))
    );
    assert!(!editor.history().can_undo());

    // The reverse direction is a different connection.
    assert!(editor.connect("b", "a", "").is_ok());
}

#[test]
fn test_selection_keeps_existing_ids_once() {
    let mut editor = editor(chain(&["a", "b"]));
    editor.set_selection(["a", "ghost", "a", "b"]);
    assert_eq!(editor.selection(), &["a".to_string(), "b".to_string()]);
}

#[test]
fn test_group_selection_wraps_steps() {
    let snapshot = Snapshot::new(vec![step("a", 0.0, 0.0), step("b", 300.0, 0.0)], vec![]);
    let mut editor = editor(snapshot);
    editor.set_selection(["a", "b"]);

    let group_id = editor.group_selection("Phase").expect("grouping should succeed");

    let ids: Vec<&str> = editor.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec![group_id.as_str(), "a", "b"]);

    let group = editor.node(&group_id).expect("group exists");
    assert!(group.is_group());
    assert_point(group.position, -60.0, -60.0);
    assert_eq!(group.width, Some(620.0));
    assert_eq!(group.height, Some(220.0));

    assert_point(editor.node("a").expect("a").position, 60.0, 60.0);
    assert_eq!(editor.absolute_position("a"), Some(Point::new(0.0, 0.0)));
    assert_eq!(editor.absolute_position("b"), Some(Point::new(300.0, 0.0)));
    assert_eq!(editor.selection(), &[group_id.clone()]);

    assert!(editor.undo());
    assert!(editor.node(&group_id).is_none());
    assert!(editor.selection().is_empty());
    assert!(editor.node("a").expect("a").is_top_level());
}

#[test]
fn test_group_selection_needs_two_top_level_steps() {
    let mut snapshot = fitted_group();
    snapshot.nodes.push(step("c", 900.0, 0.0));
    let mut editor = editor(snapshot);

    // Groups and nested children are not eligible.
    editor.set_selection(["g", "a", "c"]);
    assert_eq!(
        editor.group_selection("Nope"),
        Err(EditError::NotEnoughNodes { found: 1 })
    );
    assert!(!editor.history().can_undo());
}

#[test]
fn test_group_selection_declines_unmeasured_steps() {
    let snapshot = Snapshot::new(vec![step("a", 0.0, 0.0), bare_step("b")], vec![]);
    let mut editor = editor(snapshot);
    editor.set_selection(["a", "b"]);

    assert_eq!(
        editor.group_selection("Phase"),
        Err(EditError::UnmeasuredNodes(vec!["b".to_string()]))
    );
    assert_eq!(editor.nodes().len(), 2);
}

#[test]
fn test_ungroup_restores_absolute_positions() {
    let mut snapshot = fitted_group();
    snapshot.nodes.push(step("c", 900.0, 0.0));
    snapshot.edges.push(edge("g", "c"));
    snapshot.edges.push(edge("a", "c"));
    let mut editor = editor(snapshot);

    editor.ungroup("g").expect("ungroup");

    assert!(editor.node("g").is_none());
    let a = editor.node("a").expect("a");
    assert!(a.is_top_level());
    assert_point(a.position, 160.0, 160.0);
    assert_point(editor.node("b").expect("b").position, 460.0, 160.0);

    let edge_ids: Vec<&str> = editor.edges().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(edge_ids, vec!["a->c"]);

    assert_eq!(editor.ungroup("c"), Err(EditError::NotAGroup("c".to_string())));
}

#[test]
fn test_ungroup_nested_moves_children_to_outer_group() {
    let snapshot = Snapshot::new(
        vec![
            group("outer", 0.0, 0.0, 440.0, 340.0),
            group("inner", 60.0, 60.0, 320.0, 220.0).with_parent("outer"),
            child("a", "inner", 60.0, 60.0),
        ],
        vec![],
    );
    let mut editor = editor(snapshot);

    editor.ungroup("inner").expect("ungroup");
    let a = editor.node("a").expect("a");
    assert_eq!(a.parent_id.as_deref(), Some("outer"));
    assert_eq!(editor.absolute_position("a"), Some(Point::new(120.0, 120.0)));
}

#[test]
fn test_delete_cascades_into_nested_groups() {
    let snapshot = Snapshot::new(
        vec![
            group("outer", 0.0, 0.0, 440.0, 340.0),
            group("inner", 60.0, 60.0, 320.0, 220.0).with_parent("outer"),
            child("a", "inner", 60.0, 60.0),
            step("x", 800.0, 0.0),
        ],
        vec![edge("a", "x")],
    );
    let mut editor = editor(snapshot);

    assert_eq!(editor.delete_nodes(&["outer"]), Ok(3));
    let ids: Vec<&str> = editor.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["x"]);
    assert!(editor.edges().is_empty());

    assert!(editor.undo());
    assert_eq!(editor.nodes().len(), 4);
}

#[test]
fn test_delete_declines_unknown_or_empty() {
    let mut editor = editor(chain(&["a"]));
    let nothing: [&str; 0] = [];
    assert_eq!(editor.delete_nodes(&nothing), Err(EditError::EmptySelection));
    assert_eq!(
        editor.delete_nodes(&["ghost"]),
        Err(EditError::NodeNotFound("ghost".to_string()))
    );
    assert_eq!(editor.delete_selection(), Err(EditError::EmptySelection));
    assert!(!editor.history().can_undo());
}

#[test]
fn test_deleting_a_child_shrinks_its_group() {
    let mut editor = editor(fitted_group());
    editor.set_selection(["b"]);
    assert_eq!(editor.delete_selection(), Ok(1));

    let g = editor.node("g").expect("g");
    assert_eq!(g.width, Some(320.0));
    assert!(editor.selection().is_empty());
}

#[test]
fn test_delete_edges() {
    let mut editor = editor(chain(&["a", "b", "c"]));
    assert_eq!(editor.delete_edges(&["a->b", "ghost"]), Ok(1));
    assert_eq!(editor.edges().len(), 1);
    assert_eq!(
        editor.delete_edges(&["ghost"]),
        Err(EditError::EdgeNotFound("ghost".to_string()))
    );
}

#[test]
fn test_moving_a_child_refits_its_group() {
    let mut editor = editor(fitted_group());
    editor.move_node("b", Point::new(900.0, -40.0)).expect("move");

    let g = editor.node("g").expect("g");
    assert_eq!(g.width, Some(1160.0));
    assert_eq!(g.height, Some(320.0));
    assert_eq!(editor.absolute_position("b"), Some(Point::new(1000.0, 60.0)));
    assert_eq!(editor.absolute_position("a"), Some(Point::new(160.0, 160.0)));
}

#[test]
fn test_drag_gesture_is_a_single_undo_step() {
    let original = fitted_group();
    let mut editor = editor(original.clone());

    editor.take_snapshot();
    for i in 1..=5 {
        let mut nodes = editor.nodes().to_vec();
        nodes[2].position = Point::new(360.0 + i as f64 * 100.0, 60.0);
        editor.sync(nodes, editor.edges().to_vec());
    }
    assert_eq!(editor.history().undo_depth(), 1);
    assert_eq!(editor.node("g").expect("g").width, Some(1120.0));

    assert!(editor.undo());
    assert_eq!(editor.snapshot(), &original);
}

#[test]
fn test_add_step_inside_group_grows_it() {
    let mut editor = editor(fitted_group());
    let id = editor
        .add_step("C", Point::new(60.0, 300.0), Some("g"))
        .expect("add step");

    assert_eq!(editor.node(&id).expect("new").parent_id.as_deref(), Some("g"));
    // Unmeasured: 280 x 80, so the children now span y 60..380.
    assert_eq!(editor.node("g").expect("g").height, Some(440.0));

    assert_eq!(
        editor.add_step("D", Point::ORIGIN, Some("a")),
        Err(EditError::NotAGroup("a".to_string()))
    );
}

#[test]
fn test_update_node_and_label_edge() {
    let mut editor = editor(chain(&["a", "b"]));
    editor
        .update_node("a", |payload| {
            payload.label = "Renamed".to_string();
            payload.color = Some("#ff0000".to_string());
        })
        .expect("update");
    assert_eq!(editor.node("a").expect("a").payload.label, "Renamed");

    editor
        .label_edge("a->b", "approved", Some("check".to_string()))
        .expect("label");
    assert!(editor.edges()[0].is_annotated());
    assert_eq!(
        editor.label_edge("ghost", "x", None),
        Err(EditError::EdgeNotFound("ghost".to_string()))
    );

    assert!(editor.undo());
    assert!(editor.undo());
    assert_eq!(editor.node("a").expect("a").payload.label, "A");
}

#[test]
fn test_deliverables() {
    let snapshot = Snapshot::new(vec![bare_step("a"), group("g", 0.0, 400.0, 100.0, 100.0)], vec![]);
    let mut editor = editor(snapshot);

    let d = editor.add_deliverable("a", "Report").expect("add deliverable");
    assert_eq!(d, "deliverable-1");
    assert_eq!(editor.node("a").expect("a").deliverables().len(), 1);

    assert_eq!(
        editor.add_deliverable("g", "Nope"),
        Err(EditError::NotAStep("g".to_string()))
    );

    editor.remove_deliverable("a", &d).expect("remove");
    assert!(editor.node("a").expect("a").deliverables().is_empty());
    assert!(matches!(
        editor.remove_deliverable("a", &d),
        Err(EditError::DeliverableNotFound { .. })
    ));
}

#[test]
fn test_copy_paste_group_with_children() {
    let mut editor = editor(with_edge(fitted_group(), "a", "b"));
    editor.set_selection(["g"]);
    assert_eq!(editor.copy_selection(), Ok(3));

    let pasted = editor.paste().expect("paste");
    assert_eq!(pasted.len(), 3);
    assert_eq!(editor.nodes().len(), 6);
    assert_eq!(editor.edges().len(), 2);

    let new_group = editor.node(&pasted[0]).expect("pasted group");
    assert!(new_group.is_group());
    assert_point(new_group.position, 150.0, 150.0);
    for id in &pasted[1..] {
        let node = editor.node(id).expect("pasted child");
        assert_eq!(node.parent_id.as_ref(), Some(&pasted[0]));
    }
    assert_eq!(editor.selection(), &[pasted[0].clone()]);

    let copied_edge = editor.edges().last().expect("copied edge");
    assert_eq!(copied_edge.source, pasted[1]);
    assert_eq!(copied_edge.target, pasted[2]);

    // Pasting again yields another set of fresh ids.
    let again = editor.paste().expect("second paste");
    assert!(again.iter().all(|id| !pasted.contains(id)));
    assert_eq!(editor.snapshot().validate(), Ok(()));
}

#[test]
fn test_duplicate_lone_child_stays_in_group() {
    let mut editor = editor(fitted_group());
    editor.set_selection(["a"]);

    let copies = editor.duplicate_selection().expect("duplicate");
    assert_eq!(copies.len(), 1);

    let copy = editor.node(&copies[0]).expect("copy");
    assert_eq!(copy.parent_id.as_deref(), Some("g"));
    assert_point(copy.position, 110.0, 110.0);
    assert_eq!(editor.node("g").expect("g").height, Some(270.0));
    assert!(editor.clipboard().is_none());
}

#[test]
fn test_paste_detaches_copies_whose_group_is_gone() {
    let mut editor = editor(fitted_group());
    editor.set_selection(["a"]);
    editor.copy_selection().expect("copy");
    editor.delete_nodes(&["g"]).expect("delete");

    let pasted = editor.paste().expect("paste");
    let copy = editor.node(&pasted[0]).expect("copy");
    assert!(copy.is_top_level());
    // Original sat at (160, 160) on the canvas; the copy keeps that spot plus the paste offset.
    assert_point(copy.position, 210.0, 210.0);
    assert_eq!(editor.snapshot().validate(), Ok(()));
}

#[test]
fn test_paste_detached_from_nested_group_uses_full_chain() {
    let snapshot = Snapshot::new(
        vec![
            group("outer", 0.0, 0.0, 440.0, 340.0),
            group("inner", 60.0, 60.0, 320.0, 220.0).with_parent("outer"),
            child("a", "inner", 60.0, 60.0),
        ],
        vec![],
    );
    let mut editor = editor(snapshot);
    editor.set_selection(["a"]);
    editor.copy_selection().expect("copy");

    let origins = &editor.clipboard().expect("clipboard").parent_origins;
    assert_eq!(origins.get("inner"), Some(&Point::new(60.0, 60.0)));

    editor.delete_nodes(&["outer"]).expect("delete");
    let pasted = editor.paste().expect("paste");
    let copy = editor.node(&pasted[0]).expect("copy");
    assert!(copy.is_top_level());
    assert_point(copy.position, 170.0, 170.0);
}

#[test]
fn test_clipboard_declines() {
    let mut editor = editor(chain(&["a"]));
    assert_eq!(editor.paste(), Err(EditError::EmptyClipboard));
    assert_eq!(editor.copy_selection(), Err(EditError::EmptySelection));
    assert_eq!(editor.duplicate_selection(), Err(EditError::EmptySelection));
}

#[test]
fn test_auto_layout_is_undoable() {
    let mut editor = editor(chain(&["a", "b", "c"]));
    let report = editor.auto_layout(LayoutMode::Interactive);

    assert_eq!(report.status, LayoutStatus::Complete);
    assert!(report.fit_view);
    assert!(report.notice().is_none());
    assert_eq!(report.columns.len(), 3);
    assert_point(editor.node("c").expect("c").position, 640.0, -50.0);

    assert!(editor.undo());
    assert_point(editor.node("c").expect("c").position, 0.0, 0.0);
}

#[test]
fn test_auto_layout_reports_cycles() {
    let snapshot = Snapshot::new(
        vec![step("a", 0.0, 0.0), step("b", 0.0, 0.0)],
        vec![edge("a", "b"), edge("b", "a")],
    );
    let mut editor = editor(snapshot);
    let report = editor.auto_layout(LayoutMode::Silent);

    assert!(!report.fit_view);
    let notice = report.notice().expect("cycle notice");
    assert!(notice.contains("a, b"));
    assert!(report.to_string().contains("Column 1: a, b"));
}

#[test]
fn test_cycle_notice_names_only_nodes_on_the_cycle() {
    let snapshot = Snapshot::new(
        vec![step("x", 0.0, 0.0), step("y", 0.0, 0.0), step("end", 0.0, 0.0)],
        vec![edge("x", "y"), edge("y", "x"), edge("y", "end")],
    );
    let mut editor = editor(snapshot);
    let report = editor.auto_layout(LayoutMode::Interactive);

    let notice = report.notice().expect("cycle notice");
    assert!(notice.contains("between x, y;"));
    assert!(!notice.contains(", end"));
    assert_eq!(report.columns, vec![vec!["x".to_string(), "y".to_string(), "end".to_string()]]);
}

#[test]
fn test_auto_layout_on_empty_canvas_records_nothing() {
    let mut editor = editor(Snapshot::default());
    let report = editor.auto_layout(LayoutMode::Interactive);

    assert_eq!(report.status, LayoutStatus::Empty);
    assert!(!report.fit_view);
    assert!(!editor.history().can_undo());
}

#[test]
fn test_history_limit_from_config() {
    let config = EngineConfig::from_json_str(r#"{ "history": { "limit": 2 } }"#)
        .expect("Failed to parse config");
    let mut editor = Editor::builder(chain(&["a"]))
        .with_config(config)
        .build()
        .expect("build");

    for i in 1..=4 {
        editor.move_node("a", Point::new(i as f64, 0.0)).expect("move");
    }
    assert_eq!(editor.history().undo_depth(), 2);
    while editor.undo() {}
    assert_point(editor.node("a").expect("a").position, 2.0, 0.0);
}

#[test]
fn test_load_resets_history_and_selection() {
    let mut editor = editor(chain(&["a", "b"]));
    editor.set_selection(["a"]);
    editor.move_node("a", Point::new(10.0, 10.0)).expect("move");

    editor.load(chain(&["x"])).expect("load");
    assert!(!editor.history().can_undo());
    assert!(editor.selection().is_empty());
    assert_eq!(editor.nodes()[0].id, "x");

    let broken = Snapshot::new(vec![], vec![edge("a", "b")]);
    assert!(editor.load(broken).is_err());
    assert_eq!(editor.nodes()[0].id, "x");
}
