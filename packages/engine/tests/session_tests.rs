//! End-to-end session scenarios: pointer/keyboard input on one side,
//! bridge messages on the other.

use loupe_common::{Rect, ResizeDirection};
use loupe_dom::{
    NodePayload, EDIT_ROOT_ATTR, GROUP_ROOT_ATTR, SOURCE_FILE_ATTR, SOURCE_LINE_ATTR,
};
use loupe_engine::{
    EditorSession, EngineConfig, Key, KeyEvent, Modifiers, PointerEvent, SelectionMode,
};
use loupe_protocol::{HostMessage, SurfaceMessage};
use std::collections::HashMap;

fn el(tag: &str, rect: Rect) -> NodePayload {
    let mut p = NodePayload::new(tag);
    p.layout.rect = rect;
    p
}

fn mapped(tag: &str, line: u32, rect: Rect) -> NodePayload {
    let mut p = el(tag, rect);
    p.attributes
        .insert(SOURCE_FILE_ATTR.to_string(), "App.tsx".to_string());
    p.attributes
        .insert(SOURCE_LINE_ATTR.to_string(), line.to_string());
    p
}

/// main[edit-root, :1]
/// ├── div.box [:12]        at (100,100) 200x150
/// ├── p "Hello" [:8]       at (20,400) 120x24
/// └── ul[group-root, :2]   at (400,300) 300x200
///     └── li [:5]          at (410,310) 280x40
///         ├── span         at (415,315) 60x20
///         └── span         at (480,315) 60x20
fn session() -> EditorSession {
    let mut root = mapped("main", 1, Rect::new(0.0, 0.0, 800.0, 600.0));
    root.attributes
        .insert(EDIT_ROOT_ATTR.to_string(), "true".to_string());

    let mut boxed = mapped("div", 12, Rect::new(100.0, 100.0, 200.0, 150.0));
    boxed
        .attributes
        .insert("class".to_string(), "box".to_string());

    let mut text = mapped("p", 8, Rect::new(20.0, 400.0, 120.0, 24.0));
    text.text = Some("Hello".to_string());

    let mut group = mapped("ul", 2, Rect::new(400.0, 300.0, 300.0, 200.0));
    group
        .attributes
        .insert(GROUP_ROOT_ATTR.to_string(), "true".to_string());
    let mut item = mapped("li", 5, Rect::new(410.0, 310.0, 280.0, 40.0));
    item.children
        .push(el("span", Rect::new(415.0, 315.0, 60.0, 20.0)));
    item.children
        .push(el("span", Rect::new(480.0, 315.0, 60.0, 20.0)));
    group.children.push(item);

    root.children.push(boxed);
    root.children.push(text);
    root.children.push(group);

    let mut session = EditorSession::new(EngineConfig::default());
    session.handle_message(HostMessage::SetDocument {
        file: "App.tsx".to_string(),
        document: vec![root],
    });
    session
}

fn update_styles(msgs: &[SurfaceMessage]) -> Vec<(String, u32, HashMap<String, String>)> {
    msgs.iter()
        .filter_map(|m| match m {
            SurfaceMessage::UpdateStyle { file, line, style } => {
                Some((file.clone(), *line, style.clone()))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn test_click_selects_and_notifies() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));

    let msgs = session.drain_outbox();
    let selected = msgs
        .iter()
        .find_map(|m| match m {
            SurfaceMessage::ElementSelected { locator, context } => {
                Some((locator.clone(), context.clone()))
            }
            _ => None,
        })
        .expect("elementSelected");
    assert_eq!(selected.0.file, "App.tsx");
    assert_eq!(selected.0.line, 12);
    assert_eq!(selected.1.tag, "div");
    assert_eq!(selected.1.classes, vec!["box"]);
}

#[test]
fn test_drag_persists_rounded_translate() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.drain_outbox();

    session.pointer_move(PointerEvent::at(1, 160.0, 145.0));
    session.pointer_up(PointerEvent::at(1, 165.0, 142.0));

    let updates = update_styles(&session.drain_outbox());
    assert_eq!(updates.len(), 1);
    let (file, line, style) = &updates[0];
    assert_eq!(file, "App.tsx");
    assert_eq!(*line, 12);
    assert_eq!(
        style.get("transform").map(String::as_str),
        Some("translate(15px, -8px)")
    );
}

#[test]
fn test_click_without_movement_persists_nothing() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.pointer_up(PointerEvent::at(1, 150.0, 150.0));
    assert!(update_styles(&session.drain_outbox()).is_empty());
}

#[test]
fn test_drag_back_to_start_reverts_and_persists_nothing() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.pointer_move(PointerEvent::at(1, 160.0, 145.0));
    session.pointer_up(PointerEvent::at(1, 150.0, 150.0));

    // Released at the start point: the move's displacement is undone
    // and nothing goes over the bridge
    assert!(update_styles(&session.drain_outbox()).is_empty());
    let boxed = session.document().iter()[1];
    let transform = session.document().inline_style(boxed, "transform").unwrap();
    assert_eq!(transform, "translate(0px, 0px)");
}

#[test]
fn test_pointer_cancel_reverts_without_persisting() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.pointer_move(PointerEvent::at(1, 300.0, 300.0));
    session.pointer_cancel(PointerEvent::at(1, 300.0, 300.0));

    assert!(update_styles(&session.drain_outbox()).is_empty());
    let boxed = session.document().iter()[1];
    let transform = session.document().inline_style(boxed, "transform").unwrap();
    assert_eq!(transform, "translate(0px, 0px)");
}

#[test]
fn test_interleaved_pointer_ignored() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.drain_outbox();

    // Another pointer wanders through mid-gesture
    session.pointer_move(PointerEvent::at(2, 500.0, 500.0));
    session.pointer_up(PointerEvent::at(2, 500.0, 500.0));
    assert!(update_styles(&session.drain_outbox()).is_empty());

    session.pointer_up(PointerEvent::at(1, 160.0, 150.0));
    assert_eq!(update_styles(&session.drain_outbox()).len(), 1);
}

#[test]
fn test_resize_persists_size_and_transform_together() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.pointer_up(PointerEvent::at(1, 150.0, 150.0));
    session.drain_outbox();

    session.resize_start(ResizeDirection::Se, PointerEvent::at(1, 300.0, 250.0));
    session.pointer_move(PointerEvent::at(1, 310.0, 255.0));
    session.pointer_up(PointerEvent::at(1, 320.0, 260.0));

    let updates = update_styles(&session.drain_outbox());
    assert_eq!(updates.len(), 1);
    let (_, line, style) = &updates[0];
    assert_eq!(*line, 12);
    assert_eq!(style.get("width").map(String::as_str), Some("220px"));
    assert_eq!(style.get("height").map(String::as_str), Some("160px"));
    assert!(style.contains_key("transform"));
}

#[test]
fn test_resize_west_shifts_translate() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.pointer_up(PointerEvent::at(1, 150.0, 150.0));
    session.drain_outbox();

    session.resize_start(ResizeDirection::W, PointerEvent::at(1, 100.0, 175.0));
    session.pointer_up(PointerEvent::at(1, 90.0, 175.0));

    let updates = update_styles(&session.drain_outbox());
    assert_eq!(updates.len(), 1);
    let style = &updates[0].2;
    assert_eq!(style.get("width").map(String::as_str), Some("210px"));
    assert_eq!(
        style.get("transform").map(String::as_str),
        Some("translate(-10px, 0px)")
    );
}

#[test]
fn test_double_click_edits_text_commit_on_enter() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 30.0, 410.0).with_clicks(2));
    assert!(session.is_text_editing());

    session.text_input("Hello world");
    session.key_down(KeyEvent::plain(Key::Enter));
    assert!(!session.is_text_editing());

    let msgs = session.drain_outbox();
    let update = msgs
        .iter()
        .find_map(|m| match m {
            SurfaceMessage::UpdateText {
                file, line, text, ..
            } => Some((file.clone(), *line, text.clone())),
            _ => None,
        })
        .expect("updateText");
    assert_eq!(update, ("App.tsx".to_string(), 8, "Hello world".to_string()));

    let p = session.document().iter()[2];
    assert_eq!(
        session.document().get(p).unwrap().text.as_deref(),
        Some("Hello world")
    );
}

#[test]
fn test_escape_cancels_text_edit() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 30.0, 410.0).with_clicks(2));
    session.text_input("scrambled");
    session.key_down(KeyEvent::plain(Key::Escape));

    assert!(!session.is_text_editing());
    let p = session.document().iter()[2];
    assert_eq!(
        session.document().get(p).unwrap().text.as_deref(),
        Some("Hello")
    );
    assert!(!session
        .drain_outbox()
        .iter()
        .any(|m| matches!(m, SurfaceMessage::UpdateText { .. })));
}

#[test]
fn test_click_outside_commits_edit_then_selects() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 30.0, 410.0).with_clicks(2));
    session.text_input("Hello world");
    session.drain_outbox();

    session.pointer_down(PointerEvent::at(2, 150.0, 150.0));
    assert!(!session.is_text_editing());

    let msgs = session.drain_outbox();
    let text_pos = msgs
        .iter()
        .position(|m| matches!(m, SurfaceMessage::UpdateText { .. }))
        .expect("commit emitted");
    let select_pos = msgs
        .iter()
        .position(|m| matches!(m, SurfaceMessage::ElementSelected { .. }))
        .expect("new selection emitted");
    assert!(text_pos < select_pos);
}

#[test]
fn test_double_click_on_container_just_selects() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0).with_clicks(2));
    assert!(!session.is_text_editing());
    assert!(session
        .drain_outbox()
        .iter()
        .any(|m| matches!(m, SurfaceMessage::ElementSelected { .. })));
}

#[test]
fn test_nudges_coalesce_into_one_update() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.pointer_up(PointerEvent::at(1, 150.0, 150.0));
    session.drain_outbox();

    session.key_down(KeyEvent::plain(Key::ArrowRight));
    session.key_down(KeyEvent::plain(Key::ArrowRight));
    session.key_down(KeyEvent::plain(Key::ArrowUp));
    session.advance(100);
    assert!(update_styles(&session.drain_outbox()).is_empty());

    // A fourth nudge pushes the deadline out again
    session.key_down(KeyEvent::plain(Key::ArrowRight));
    session.advance(300);
    assert!(update_styles(&session.drain_outbox()).is_empty());

    session.advance(400);
    let updates = update_styles(&session.drain_outbox());
    assert_eq!(updates.len(), 1);
    assert_eq!(
        updates[0].2.get("transform").map(String::as_str),
        Some("translate(3px, -1px)")
    );
}

#[test]
fn test_shift_nudge_steps_large() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.pointer_up(PointerEvent::at(1, 150.0, 150.0));
    session.drain_outbox();

    session.key_down(KeyEvent::shifted(Key::ArrowDown));
    session.advance(250);
    let updates = update_styles(&session.drain_outbox());
    assert_eq!(
        updates[0].2.get("transform").map(String::as_str),
        Some("translate(0px, 10px)")
    );
}

#[test]
fn test_nudge_with_other_modifiers_stands_down() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.pointer_up(PointerEvent::at(1, 150.0, 150.0));
    session.drain_outbox();

    session.key_down(KeyEvent {
        key: Key::ArrowRight,
        modifiers: Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        },
    });
    session.advance(1000);
    assert!(update_styles(&session.drain_outbox()).is_empty());
    let boxed = session.document().iter()[1];
    assert_eq!(session.document().inline_style(boxed, "transform"), None);
}

#[test]
fn test_group_modifier_selects_group_root() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 420.0, 320.0).with_modifiers(Modifiers::SHIFT));

    let selection = session.selection().expect("selection");
    let ul = session.document().iter()[3];
    assert_eq!(selection.selected, ul);
    assert_eq!(selection.locator.as_ref().map(|l| l.line), Some(2));
}

#[test]
fn test_alt_forces_element_in_group_mode() {
    let mut session = session();
    session.set_selection_mode(SelectionMode::Group);
    session.pointer_down(PointerEvent::at(1, 420.0, 320.0).with_modifiers(Modifiers {
        alt: true,
        ..Modifiers::NONE
    }));

    let selection = session.selection().expect("selection");
    let li = session.document().iter()[4];
    assert_eq!(selection.selected, li);
    assert_eq!(selection.locator.as_ref().map(|l| l.line), Some(5));
}

#[test]
fn test_ctrl_click_emits_element_clicked() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0).with_modifiers(Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    }));

    let msgs = session.drain_outbox();
    let clicked = msgs
        .iter()
        .find_map(|m| match m {
            SurfaceMessage::ElementClicked { locator } => Some(locator.clone()),
            _ => None,
        })
        .expect("elementClicked");
    assert_eq!(clicked.line, 12);
    // Selection still happens alongside the jump
    assert!(msgs
        .iter()
        .any(|m| matches!(m, SurfaceMessage::ElementSelected { .. })));
}

#[test]
fn test_preview_round_trip() {
    let mut session = session();
    let mut style = HashMap::new();
    style.insert("width".to_string(), "300px".to_string());
    session.handle_message(HostMessage::PreviewStyle {
        file: "App.tsx".to_string(),
        line: 12,
        style,
    });

    let boxed = session.document().iter()[1];
    assert_eq!(
        session.document().inline_style(boxed, "width").as_deref(),
        Some("300px")
    );

    session.handle_message(HostMessage::ClearPreview);
    assert_eq!(session.document().inline_style(boxed, "width"), None);
}

#[test]
fn test_request_targets_dedups_by_locator() {
    let mut session = session();
    session.handle_message(HostMessage::RequestTargets {
        request_id: "r1".to_string(),
        selector: "span".to_string(),
    });

    let msgs = session.drain_outbox();
    let (request_id, targets) = msgs
        .iter()
        .find_map(|m| match m {
            SurfaceMessage::TargetsList {
                request_id,
                targets,
            } => Some((request_id.clone(), targets.clone())),
            _ => None,
        })
        .expect("targetsList");
    assert_eq!(request_id, "r1");
    // Both spans map to the same li
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].locator.line, 5);
    assert_eq!(targets[0].tag, "li");
}

#[test]
fn test_request_targets_bad_selector_replies_empty() {
    let mut session = session();
    session.handle_message(HostMessage::RequestTargets {
        request_id: "r2".to_string(),
        selector: "div > span".to_string(),
    });

    let msgs = session.drain_outbox();
    assert!(msgs.iter().any(|m| matches!(
        m,
        SurfaceMessage::TargetsList { request_id, targets }
            if request_id == "r2" && targets.is_empty()
    )));
}

#[test]
fn test_set_document_clears_selection_and_previews() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.pointer_up(PointerEvent::at(1, 150.0, 150.0));
    session.run_frame();
    assert!(session.overlay_rect().is_some());

    session.handle_message(HostMessage::SetDocument {
        file: "Other.tsx".to_string(),
        document: vec![mapped("main", 1, Rect::new(0.0, 0.0, 100.0, 100.0))],
    });

    assert!(session.selection().is_none());
    assert!(session.overlay_rect().is_none());
    assert!(!session.is_text_editing());
}

#[test]
fn test_overlay_tracks_selection_per_frame() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.pointer_up(PointerEvent::at(1, 150.0, 150.0));

    session.run_frame();
    assert_eq!(
        session.overlay_rect(),
        Some(Rect::new(100.0, 100.0, 200.0, 150.0))
    );

    session.key_down(KeyEvent::plain(Key::Escape));
    assert!(session.overlay_rect().is_none());
    assert!(session.selection().is_none());
}

#[test]
fn test_breadcrumb_click_keeps_leaf_base() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 420.0, 320.0));
    session.drain_outbox();

    let span = session.document().iter()[5];
    let trail: Vec<String> = session
        .selection()
        .unwrap()
        .breadcrumbs
        .iter()
        .map(|b| b.label.clone())
        .collect();
    assert_eq!(trail, vec!["canvas", "group", "span"]);

    // Pick the group crumb: selection moves, trail base stays the leaf
    session.select_breadcrumb(1);
    let selection = session.selection().unwrap();
    let ul = session.document().iter()[3];
    assert_eq!(selection.selected, ul);
    assert_eq!(selection.leaf, span);
    assert_eq!(selection.breadcrumbs.len(), 3);

    let msgs = session.drain_outbox();
    assert!(msgs.iter().any(|m| matches!(
        m,
        SurfaceMessage::ElementSelected { locator, .. } if locator.line == 2
    )));
}

#[test]
fn test_raw_message_round_trip() -> anyhow::Result<()> {
    let mut session = EditorSession::new(EngineConfig::default());
    let msg = HostMessage::SetDocument {
        file: "App.tsx".to_string(),
        document: vec![mapped("main", 1, Rect::new(0.0, 0.0, 400.0, 300.0))],
    };
    session.handle_raw_message(&serde_json::to_string(&msg)?);
    assert!(!session.document().is_empty());
    assert_eq!(session.document().file(), "App.tsx");
    Ok(())
}

#[test]
fn test_malformed_raw_message_dropped() {
    let mut session = session();
    session.handle_raw_message("{not json");
    session.handle_raw_message(r#"{"command":"mystery"}"#);
    assert!(session.drain_outbox().is_empty());
    assert!(session.is_open());
}

#[test]
fn test_closed_session_is_inert() {
    let mut session = session();
    session.close();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.key_down(KeyEvent::plain(Key::ArrowRight));
    assert!(session.selection().is_none());
    assert!(session.drain_outbox().is_empty());
}

#[test]
fn test_miss_leaves_selection_untouched() {
    let mut session = session();
    session.pointer_down(PointerEvent::at(1, 150.0, 150.0));
    session.pointer_up(PointerEvent::at(1, 150.0, 150.0));
    session.drain_outbox();

    // Outside the tree entirely
    session.pointer_down(PointerEvent::at(2, 2000.0, 2000.0));
    let selection = session.selection().expect("selection kept");
    assert_eq!(selection.locator.as_ref().map(|l| l.line), Some(12));
}
