//! Character count behavior
//!
//! Generates the visible and screen-reader status messages for each
//! `.usa-character-count` and keeps them in sync with the field's length.
//! The limit comes from `data-maxlength` on the container, or from the
//! field's own `maxlength` (which is moved to the container so the browser
//! does not truncate input).

use std::rc::Rc;

use uswds_dom::{DomTree, NodeId};

use super::ledger::{BoundRoots, SideEffects};
use crate::{Behavior, BehaviorError};

const NAME: &str = "character-count";
const CONTAINER: &str = "usa-character-count";
const FIELD: &str = "usa-character-count__field";
const STATUS: &str = "usa-character-count__status";
const SR_STATUS: &str = "usa-character-count__sr-status";
const STATUS_INVALID: &str = "usa-character-count__status--invalid";
const INPUT_ERROR: &str = "usa-input--error";
const DATA_MAXLENGTH: &str = "data-maxlength";

#[derive(Default)]
pub struct CharacterCountBehavior {
    bound: BoundRoots,
}

impl Behavior for CharacterCountBehavior {
    fn name(&self) -> &str {
        NAME
    }

    fn init(&self, tree: &mut DomTree, root: NodeId) -> Result<(), BehaviorError> {
        self.bound.bind(tree, root, |tree, effects| bind(tree, root, effects))
    }

    fn teardown(&self, tree: &mut DomTree, root: NodeId) -> Result<(), BehaviorError> {
        self.bound.release(tree, root);
        Ok(())
    }
}

#[derive(Clone, Copy)]
struct Counter {
    field: NodeId,
    status: NodeId,
    sr_status: NodeId,
    max: usize,
}

fn bind(tree: &mut DomTree, root: NodeId, effects: &mut SideEffects) -> Result<(), BehaviorError> {
    for container in tree.elements_by_class(root, CONTAINER) {
        let field = tree
            .descendants(container)
            .into_iter()
            .find(|&n| matches!(tree.tag_name(n), Some("input" | "textarea")))
            .ok_or_else(|| BehaviorError::MissingElement {
                behavior: NAME.to_string(),
                expected: "an input or textarea",
            })?;

        let raw = tree
            .get_attribute(container, DATA_MAXLENGTH)
            .or_else(|| tree.get_attribute(field, "maxlength"))
            .map(str::to_string);
        let max = raw
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .ok_or_else(|| BehaviorError::MissingAttribute {
                behavior: NAME.to_string(),
                element: "character count",
                attribute: DATA_MAXLENGTH,
            })?;

        effects.set_attribute(tree, container, DATA_MAXLENGTH, &max.to_string())?;
        effects.remove_attribute(tree, field, "maxlength");
        effects.add_class(tree, field, FIELD)?;

        let status = tree.create_element("div");
        tree.set_attribute(status, "class", &format!("{STATUS} usa-hint"))?;
        tree.set_attribute(status, "aria-hidden", "true")?;
        effects.generate(tree, container, status)?;

        let sr_status = tree.create_element("div");
        tree.set_attribute(sr_status, "class", &format!("{SR_STATUS} usa-sr-only"))?;
        tree.set_attribute(sr_status, "aria-live", "polite")?;
        effects.generate(tree, container, sr_status)?;

        let counter = Counter { field, status, sr_status, max };
        update(tree, counter);
        effects.listen(tree, field, "input", Rc::new(move |tree, _| update(tree, counter)));
    }
    Ok(())
}

/// Status text for a field length
pub fn status_message(length: usize, max: usize) -> String {
    if length == 0 {
        return format!("{max} characters allowed");
    }
    let difference = length.abs_diff(max);
    let noun = if difference == 1 { "character" } else { "characters" };
    let guidance = if length > max { "over limit" } else { "left" };
    format!("{difference} {noun} {guidance}")
}

fn field_length(tree: &DomTree, field: NodeId) -> usize {
    let value = match tree.tag_name(field) {
        Some("textarea") => tree.text_content(field),
        _ => tree.get_attribute(field, "value").unwrap_or("").to_string(),
    };
    value.chars().count()
}

fn update(tree: &mut DomTree, counter: Counter) {
    let length = field_length(tree, counter.field);
    let message = status_message(length, counter.max);
    let over = length > counter.max;

    let result = tree
        .set_text_content(counter.status, &message)
        .and_then(|_| tree.set_text_content(counter.sr_status, &message))
        .and_then(|_| {
            if over {
                tree.add_class(counter.status, STATUS_INVALID)?;
                tree.add_class(counter.field, INPUT_ERROR)?;
            } else {
                tree.remove_class(counter.status, STATUS_INVALID)?;
                tree.remove_class(counter.field, INPUT_ERROR)?;
            }
            Ok(())
        });
    if let Err(err) = result {
        tracing::warn!(field = %counter.field, error = %err, "character count update failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(tree: &mut DomTree, maxlength_on_input: bool) -> (NodeId, NodeId) {
        let root = tree.create_element("div");
        tree.add_class(root, CONTAINER).unwrap();
        let group = tree.create_element("div");
        let input = tree.create_element("input");
        if maxlength_on_input {
            tree.set_attribute(input, "maxlength", "10").unwrap();
        } else {
            tree.set_attribute(root, DATA_MAXLENGTH, "10").unwrap();
        }
        tree.append_child(group, input).unwrap();
        tree.append_child(root, group).unwrap();
        tree.append_child(NodeId::ROOT, root).unwrap();
        (root, input)
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(status_message(0, 20), "20 characters allowed");
        assert_eq!(status_message(19, 20), "1 character left");
        assert_eq!(status_message(5, 20), "15 characters left");
        assert_eq!(status_message(22, 20), "2 characters over limit");
    }

    #[test]
    fn test_generates_status_outside_field_group() {
        let mut tree = DomTree::new();
        let (root, input) = component(&mut tree, false);
        CharacterCountBehavior::default().init(&mut tree, root).unwrap();

        let children = tree.element_children(root);
        assert_eq!(children.len(), 3);
        assert!(tree.has_class(children[1], STATUS));
        assert_eq!(tree.text_content(children[1]), "10 characters allowed");
        assert!(tree.has_class(input, FIELD));
    }

    #[test]
    fn test_input_event_updates_status() {
        let mut tree = DomTree::new();
        let (root, input) = component(&mut tree, true);
        CharacterCountBehavior::default().init(&mut tree, root).unwrap();
        assert_eq!(tree.get_attribute(root, DATA_MAXLENGTH), Some("10"));
        assert!(!tree.has_attribute(input, "maxlength"));

        tree.set_attribute(input, "value", "hello world!").unwrap();
        tree.dispatch_event(input, "input");
        let status = tree.elements_by_class(root, STATUS)[0];
        assert_eq!(tree.text_content(status), "2 characters over limit");
        assert!(tree.has_class(status, STATUS_INVALID));
        assert!(tree.has_class(input, INPUT_ERROR));
    }

    #[test]
    fn test_missing_limit() {
        let mut tree = DomTree::new();
        let (root, _) = component(&mut tree, false);
        tree.remove_attribute(root, DATA_MAXLENGTH);
        let err = CharacterCountBehavior::default().init(&mut tree, root).unwrap_err();
        assert!(matches!(err, BehaviorError::MissingAttribute { attribute: DATA_MAXLENGTH, .. }));
        assert_eq!(tree.element_children(root).len(), 1);
    }

    #[test]
    fn test_teardown_restores_markup() {
        let mut tree = DomTree::new();
        let (root, input) = component(&mut tree, true);
        let behavior = CharacterCountBehavior::default();
        behavior.init(&mut tree, root).unwrap();
        behavior.teardown(&mut tree, root).unwrap();

        assert_eq!(tree.element_children(root).len(), 1);
        assert_eq!(tree.get_attribute(input, "maxlength"), Some("10"));
        assert!(!tree.has_attribute(root, DATA_MAXLENGTH));
        assert!(!tree.has_class(input, FIELD));
        assert_eq!(tree.total_listeners(), 0);
    }
}
