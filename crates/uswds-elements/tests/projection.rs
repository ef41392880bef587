//! Slot projection through the runtime
//!
//! Rendering, projection order, idempotence, suppression and missing
//! targets, driven from parsed consumer markup.

mod common;

use std::rc::Rc;

use common::*;
use uswds_dom::{serialize, NodeId};
use uswds_elements::{DiagnosticsMode, Diagnostic, ElementError, FieldValue};

const ALERT: &str = r#"<body>
  <usa-alert id="alert" type="warning">
    <span slot="heading" id="heading">Heads up</span>
    <span slot="text" id="text">Your session expires soon.</span>
  </usa-alert>
</body>"#;

const ACCORDION: &str = r#"<body>
  <usa-accordion id="acc">
    <h4 slot="item" id="h1" class="usa-accordion__heading">
      <button class="usa-accordion__button" id="b1" aria-expanded="true" aria-controls="p1">First</button>
    </h4>
    <div slot="item" id="p1" class="usa-accordion__content">First panel</div>
  </usa-accordion>
</body>"#;

// ============================================================================
// FIRST RENDER
// ============================================================================

#[test]
fn test_exactly_one_visible_copy() {
    let mut runtime = uswds(ALERT);
    let report = runtime.flush().unwrap();
    assert_eq!(report.connected, 1);

    let alert = by_id(&runtime, "alert");
    let heading = by_id(&runtime, "heading");
    let text = by_id(&runtime, "text");
    let tree = runtime.tree();

    assert_eq!(copies_of(tree, "Heads up"), 1);
    assert_eq!(copies_of(tree, "Your session expires soon."), 1);
    assert!(runtime.document().is_rendered(heading));
    assert!(runtime.document().is_rendered(text));

    let host = runtime.host(alert).unwrap();
    let structure = host.structure().unwrap();
    assert_eq!(tree.parent(heading), structure.target("heading"));
    assert_eq!(tree.parent(text), structure.target("text"));
    assert_eq!(tree.element_children(alert), vec![structure.container()]);
}

#[test]
fn test_structure_rendered_without_children() {
    let mut runtime = uswds("<body><usa-alert id=\"alert\"></usa-alert></body>");
    runtime.flush().unwrap();

    let host = runtime.host(by_id(&runtime, "alert")).unwrap();
    let structure = host.structure().unwrap();
    assert!(structure.target("heading").is_some());
    assert!(structure.target("text").is_some());
    assert!(host.projected().is_empty());
    assert!(runtime.tree().has_class(structure.container(), "usa-alert--info"));
}

#[test]
fn test_items_projected_in_order() {
    let mut runtime = uswds(ACCORDION);
    runtime.flush().unwrap();

    let acc = by_id(&runtime, "acc");
    let h1 = by_id(&runtime, "h1");
    let p1 = by_id(&runtime, "p1");
    let container = runtime.host(acc).unwrap().container().unwrap();

    assert_eq!(runtime.tree().element_children(container), vec![h1, p1]);
    assert_eq!(runtime.tree().element_children(acc), vec![container]);
    assert_eq!(runtime.host(acc).unwrap().projected().get("item"), &[h1, p1]);
}

#[test]
fn test_bridge_writes_parts_on_first_render() {
    let mut runtime = uswds(r#"<body><usa-alert id="alert" type="error" slim></usa-alert></body>"#);
    runtime.flush().unwrap();

    let container = runtime.host(by_id(&runtime, "alert")).unwrap().container().unwrap();
    let tree = runtime.tree();
    assert!(tree.has_class(container, "usa-alert--error"));
    assert!(tree.has_class(container, "usa-alert--slim"));
    assert!(!tree.has_class(container, "usa-alert--info"));
}

// ============================================================================
// RE-PROJECTION
// ============================================================================

#[test]
fn test_unchanged_cycle_mutates_nothing() {
    let mut runtime = uswds(ACCORDION);
    runtime.flush().unwrap();
    let acc = by_id(&runtime, "acc");
    let before = serialize::outer_html(runtime.tree(), acc);

    runtime.document_mut().tree_mut().record_mutations(true);
    runtime.set_field(acc, "bordered", false).unwrap();
    let report = runtime.flush().unwrap();

    assert_eq!(report.updated, 1);
    assert!(runtime.document_mut().tree_mut().take_records().is_empty());
    assert_eq!(serialize::outer_html(runtime.tree(), acc), before);
    assert_eq!(runtime.host(acc).unwrap().init_cycles(), 1);
}

#[test]
fn test_new_child_appended_after_projected() {
    let mut runtime = uswds(ACCORDION);
    runtime.flush().unwrap();
    let acc = by_id(&runtime, "acc");

    let heading = runtime.create_element("h4");
    runtime.set_attribute(heading, "slot", Some("item")).unwrap();
    runtime.insert(acc, heading).unwrap();
    runtime.flush().unwrap();

    let container = runtime.host(acc).unwrap().container().unwrap();
    let children = runtime.tree().element_children(container);
    assert_eq!(children.len(), 3);
    assert_eq!(children[2], heading);
    assert_eq!(runtime.tree().parent(heading), Some(container));
}

#[test]
fn test_one_insertion_per_target() {
    let mut runtime = uswds("<body><usa-accordion id=\"acc\"></usa-accordion></body>");
    runtime.flush().unwrap();
    let acc = by_id(&runtime, "acc");
    let container = runtime.host(acc).unwrap().container().unwrap();

    let mut items = Vec::new();
    for _ in 0..3 {
        let item = runtime.create_element("div");
        runtime.set_attribute(item, "slot", Some("item")).unwrap();
        runtime.document_mut().tree_mut().append_child(acc, item).unwrap();
        items.push(item);
    }
    runtime.document_mut().tree_mut().record_mutations(true);
    runtime.set_field(acc, "bordered", true).unwrap();
    runtime.flush().unwrap();

    let records = runtime.document_mut().tree_mut().take_records();
    let insertions: Vec<_> = records
        .iter()
        .filter(|r| r.target == container && !r.added_nodes.is_empty())
        .collect();
    assert_eq!(insertions.len(), 1);
    assert_eq!(insertions[0].added_nodes, items);
}

#[test]
fn test_slot_change_moves_between_targets() {
    let mut runtime = uswds(ALERT);
    runtime.flush().unwrap();
    let alert = by_id(&runtime, "alert");
    let heading = by_id(&runtime, "heading");

    runtime.set_attribute(heading, "slot", Some("text")).unwrap();
    runtime.flush().unwrap();

    let structure = runtime.host(alert).unwrap().structure().unwrap().clone();
    let text_target = structure.target("text").unwrap();
    assert_eq!(runtime.tree().parent(heading), Some(text_target));
    assert_eq!(runtime.tree().element_children(text_target).len(), 2);
    assert!(runtime.tree().element_children(structure.target("heading").unwrap()).is_empty());
}

#[test]
fn test_removed_marker_hands_node_back() {
    let mut runtime = uswds(ALERT);
    runtime.flush().unwrap();
    let alert = by_id(&runtime, "alert");
    let text = by_id(&runtime, "text");

    runtime.set_attribute(text, "slot", None).unwrap();
    runtime.flush().unwrap();

    assert_eq!(runtime.tree().parent(text), Some(alert));
    assert!(runtime.document().is_rendered(text));
    assert!(!runtime.host(alert).unwrap().projected().contains(text));
}

#[test]
fn test_fallback_returns_when_slot_empties() {
    let sample = Rc::new(CountingBehavior::default());
    let mut runtime = sample_runtime(
        r#"<body><usa-sample id="sample"><p slot="body" id="msg">Hello</p></usa-sample></body>"#,
        sample,
        DiagnosticsMode::Strict,
    );
    runtime.flush().unwrap();
    let host = by_id(&runtime, "sample");
    let msg = by_id(&runtime, "msg");
    let target = runtime.host(host).unwrap().structure().unwrap().target("body").unwrap();
    assert_eq!(runtime.tree().text_content(target), "Hello");

    runtime.remove(msg).unwrap();
    runtime.flush().unwrap();
    assert_eq!(runtime.tree().text_content(target), "Nothing to show");
}

#[test]
fn test_structural_field_rebuilds_and_keeps_nodes() {
    let mut runtime = uswds(ALERT);
    runtime.flush().unwrap();
    let alert = by_id(&runtime, "alert");
    let heading = by_id(&runtime, "heading");
    let old_container = runtime.host(alert).unwrap().container().unwrap();

    runtime.set_field(alert, "headingLevel", "h2").unwrap();
    runtime.flush().unwrap();

    let host = runtime.host(alert).unwrap();
    let structure = host.structure().unwrap();
    let target = structure.target("heading").unwrap();
    assert_ne!(structure.container(), old_container);
    assert!(!runtime.tree().is_connected(old_container));
    assert_eq!(runtime.tree().tag_name(target), Some("h2"));
    assert_eq!(runtime.tree().parent(heading), Some(target));
    assert_eq!(copies_of(runtime.tree(), "Heads up"), 1);
    assert_eq!(host.generation(), 2);
    assert!(runtime.tree().has_class(structure.container(), "usa-alert--warning"));
}

// ============================================================================
// SUPPRESSION
// ============================================================================

#[test]
fn test_suppression_sheet_covers_projected_slots() {
    let mut runtime = uswds(ALERT);
    runtime.flush().unwrap();
    let alert = by_id(&runtime, "alert");
    let scope = runtime.host(alert).unwrap().scope_id();

    assert_eq!(
        runtime.tree().get_attribute(alert, "data-uswds-host"),
        Some(scope.to_string().as_str())
    );
    let css = runtime.document().to_css();
    assert!(css.contains(&format!("[data-uswds-host=\"{scope}\"] > [slot=\"heading\"] {{ display: none; }}")));
    assert!(css.contains(&format!("[data-uswds-host=\"{scope}\"] > [slot=\"text\"] {{ display: none; }}")));
}

#[test]
fn test_late_direct_child_is_suppressed_until_projected() {
    let mut runtime = uswds(ALERT);
    runtime.flush().unwrap();
    let alert = by_id(&runtime, "alert");

    let extra = runtime.create_element("span");
    runtime.set_attribute(extra, "slot", Some("text")).unwrap();
    runtime.document_mut().tree_mut().append_child(alert, extra).unwrap();
    assert!(!runtime.document().is_rendered(extra));

    runtime.set_field(alert, "slim", true).unwrap();
    runtime.flush().unwrap();
    assert!(runtime.document().is_rendered(extra));
}

#[test]
fn test_unknown_slot_stays_visible() {
    let mut runtime = uswds(
        r#"<body><usa-alert id="alert"><span slot="footer" id="footer">Footer</span></usa-alert></body>"#,
    );
    let report = runtime.flush().unwrap();
    assert_eq!(report.updated, 1);

    let alert = by_id(&runtime, "alert");
    let footer = by_id(&runtime, "footer");
    assert_eq!(runtime.tree().parent(footer), Some(alert));
    assert!(runtime.document().is_rendered(footer));
}

#[test]
fn test_disconnect_removes_sheet() {
    let mut runtime = uswds(ALERT);
    runtime.flush().unwrap();
    let alert = by_id(&runtime, "alert");
    let scope = runtime.host(alert).unwrap().scope_id();

    runtime.remove(alert).unwrap();
    assert!(runtime.document().style_sheet(scope).is_none());
    assert!(runtime.document().to_css().is_empty());
}

// ============================================================================
// MISSING TARGETS
// ============================================================================

fn break_text_target(runtime: &mut uswds_elements::Runtime, alert: NodeId) {
    let target = runtime.host(alert).unwrap().structure().unwrap().target("text").unwrap();
    runtime.document_mut().tree_mut().detach(target);
}

#[test]
fn test_missing_target_strict_fails_loud() {
    let mut runtime = uswds(ALERT);
    runtime.flush().unwrap();
    let alert = by_id(&runtime, "alert");
    break_text_target(&mut runtime, alert);

    runtime.set_field(alert, "slim", true).unwrap();
    let err = runtime.flush().unwrap_err();
    assert_eq!(
        err,
        ElementError::ProjectionTargetMissing {
            tag: "usa-alert".into(),
            host: alert,
            slot: "text".into(),
            target: "text".into(),
        }
    );
}

#[test]
fn test_missing_target_lenient_keeps_content_visible() {
    let mut runtime = uswds_with(ALERT, DiagnosticsMode::Lenient);
    runtime.flush().unwrap();
    let alert = by_id(&runtime, "alert");
    break_text_target(&mut runtime, alert);

    let late = runtime.create_element("span");
    runtime.set_attribute(late, "slot", Some("text")).unwrap();
    runtime.insert(alert, late).unwrap();
    runtime.flush().unwrap();

    assert_eq!(runtime.tree().parent(late), Some(alert));
    assert!(runtime.document().is_rendered(late));
    let diagnostics = runtime.host(alert).unwrap().diagnostics();
    assert!(diagnostics.contains(&Diagnostic::ProjectionTargetMissing {
        slot: "text".into(),
        target: "text".into(),
    }));
    assert!(!runtime.document().to_css().contains("slot=\"text\""));
}

// ============================================================================
// BRIDGE
// ============================================================================

#[test]
fn test_invalid_enum_reflects_default_once() {
    let mut runtime = uswds(ALERT);
    runtime.flush().unwrap();
    let alert = by_id(&runtime, "alert");

    runtime.set_field(alert, "type", "purple").unwrap();
    runtime.flush().unwrap();

    let host = runtime.host(alert).unwrap();
    let container = host.container().unwrap();
    assert_eq!(runtime.tree().get_attribute(alert, "type"), Some("info"));
    assert_eq!(host.field("type"), Some(&FieldValue::Text("info".into())));
    assert!(runtime.tree().has_class(container, "usa-alert--info"));
    assert!(!runtime.tree().has_class(container, "usa-alert--warning"));
    let warnings: Vec<_> = host
        .diagnostics()
        .iter()
        .filter(|d| matches!(d, Diagnostic::InvalidValue { .. }))
        .collect();
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_invalid_authored_attribute_is_corrected() {
    let mut runtime = uswds(r#"<body><usa-alert id="alert" type="loud"></usa-alert></body>"#);
    runtime.flush().unwrap();
    let alert = by_id(&runtime, "alert");

    assert_eq!(runtime.tree().get_attribute(alert, "type"), Some("info"));
    assert_eq!(runtime.host(alert).unwrap().diagnostics().len(), 1);
}

#[test]
fn test_field_set_before_connection() {
    let mut runtime = uswds("<body></body>");
    let combo = runtime.create_element("usa-combo-box");
    runtime.set_field(combo, "disableFiltering", true).unwrap();
    runtime.set_field(combo, "placeholder", "Pick a fruit").unwrap();

    let body = runtime.document().body();
    runtime.insert(body, combo).unwrap();
    runtime.flush().unwrap();

    let structure = runtime.host(combo).unwrap().structure().unwrap().clone();
    let part = structure.part("combo").unwrap();
    assert_eq!(runtime.tree().get_attribute(part, "data-disable-filtering"), Some("true"));
    assert_eq!(runtime.tree().get_attribute(part, "data-placeholder"), Some("Pick a fruit"));
}

#[test]
fn test_unknown_field_is_an_error() {
    let mut runtime = uswds(ALERT);
    let alert = by_id(&runtime, "alert");
    assert!(matches!(
        runtime.set_field(alert, "colour", "red"),
        Err(ElementError::UnknownField { .. })
    ));
}
