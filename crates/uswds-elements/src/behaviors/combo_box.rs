//! Combo box behavior
//!
//! Enhances the `<select>` inside each `.usa-combo-box`: the select is
//! visually hidden and an input, a toggle button and a listbox built from
//! its options are generated next to it. Typing filters the list unless
//! the container has `data-disable-filtering="true"`.

use std::rc::Rc;

use uswds_dom::{DomResult, DomTree, NodeId};

use super::ledger::{BoundRoots, SideEffects};
use crate::{Behavior, BehaviorError};

const NAME: &str = "combo-box";
const COMBO_BOX: &str = "usa-combo-box";
const INPUT: &str = "usa-combo-box__input";
const TOGGLE: &str = "usa-combo-box__toggle-list";
const LIST: &str = "usa-combo-box__list";
const OPTION: &str = "usa-combo-box__list-option";
const DISABLE_FILTERING: &str = "data-disable-filtering";

#[derive(Default)]
pub struct ComboBoxBehavior {
    bound: BoundRoots,
}

impl Behavior for ComboBoxBehavior {
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
struct Parts {
    combo: NodeId,
    input: NodeId,
    list: NodeId,
}

fn bind(tree: &mut DomTree, root: NodeId, effects: &mut SideEffects) -> Result<(), BehaviorError> {
    for combo in tree.elements_by_class(root, COMBO_BOX) {
        let select = tree
            .elements_by_tag(combo, "select")
            .into_iter()
            .next()
            .ok_or_else(|| BehaviorError::MissingElement {
                behavior: NAME.to_string(),
                expected: "a select",
            })?;
        let select_id = tree
            .get_attribute(select, "id")
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| BehaviorError::MissingAttribute {
                behavior: NAME.to_string(),
                element: "combo box select",
                attribute: "id",
            })?;
        let list_id = format!("{select_id}--list");

        effects.add_class(tree, select, "usa-sr-only")?;
        effects.set_attribute(tree, select, "aria-hidden", "true")?;
        effects.set_attribute(tree, select, "tabindex", "-1")?;

        let input = tree.create_element("input");
        for (name, value) in [
            ("class", INPUT),
            ("type", "text"),
            ("role", "combobox"),
            ("autocomplete", "off"),
            ("aria-expanded", "false"),
            ("aria-controls", list_id.as_str()),
        ] {
            tree.set_attribute(input, name, value)?;
        }
        if let Some(placeholder) = tree.get_attribute(combo, "data-placeholder").map(str::to_string) {
            tree.set_attribute(input, "placeholder", &placeholder)?;
        }
        effects.generate(tree, combo, input)?;

        let toggle = tree.create_element("button");
        tree.set_attribute(toggle, "type", "button")?;
        tree.set_attribute(toggle, "class", TOGGLE)?;
        tree.set_attribute(toggle, "tabindex", "-1")?;
        tree.set_attribute(toggle, "aria-label", "Toggle the dropdown list")?;
        effects.generate(tree, combo, toggle)?;

        let list = build_list(tree, select, &list_id)?;
        effects.generate(tree, combo, list)?;

        let parts = Parts { combo, input, list };
        effects.listen(tree, toggle, "click", Rc::new(move |tree, _| toggle_list(tree, parts)));
        effects.listen(tree, input, "input", Rc::new(move |tree, _| filter(tree, parts)));
    }
    Ok(())
}

fn build_list(tree: &mut DomTree, select: NodeId, list_id: &str) -> DomResult<NodeId> {
    let list = tree.create_element("ul");
    tree.set_attribute(list, "id", list_id)?;
    tree.set_attribute(list, "class", LIST)?;
    tree.set_attribute(list, "role", "listbox")?;
    tree.set_attribute(list, "hidden", "")?;

    for option in tree.elements_by_tag(select, "option") {
        let Some(value) = tree.get_attribute(option, "value").filter(|v| !v.is_empty()).map(str::to_string) else {
            continue;
        };
        let label = tree.text_content(option);
        let item = tree.create_element("li");
        tree.set_attribute(item, "class", OPTION)?;
        tree.set_attribute(item, "role", "option")?;
        tree.set_attribute(item, "data-value", &value)?;
        tree.set_text_content(item, label.trim())?;
        tree.append_child(list, item)?;
    }
    Ok(list)
}

fn set_open(tree: &mut DomTree, parts: Parts, open: bool) -> DomResult<()> {
    if open {
        tree.remove_attribute(parts.list, "hidden");
    } else {
        tree.set_attribute(parts.list, "hidden", "")?;
    }
    tree.set_attribute(parts.input, "aria-expanded", if open { "true" } else { "false" })
}

fn toggle_list(tree: &mut DomTree, parts: Parts) {
    let open = tree.has_attribute(parts.list, "hidden");
    if let Err(err) = set_open(tree, parts, open) {
        tracing::warn!(list = %parts.list, error = %err, "combo box toggle failed");
    }
}

fn filter(tree: &mut DomTree, parts: Parts) {
    let query = tree.get_attribute(parts.input, "value").unwrap_or("").trim().to_lowercase();
    let disabled = tree.get_attribute(parts.combo, DISABLE_FILTERING) == Some("true");
    if let Err(err) = apply_filter(tree, parts, &query, disabled) {
        tracing::warn!(list = %parts.list, error = %err, "combo box filter failed");
    }
}

fn apply_filter(tree: &mut DomTree, parts: Parts, query: &str, disabled: bool) -> DomResult<()> {
    for item in tree.element_children(parts.list) {
        let shown = disabled || query.is_empty() || tree.text_content(item).to_lowercase().contains(query);
        if shown {
            tree.remove_attribute(item, "hidden");
        } else {
            tree.set_attribute(item, "hidden", "")?;
        }
    }
    set_open(tree, parts, true)
}
