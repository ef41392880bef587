//! Accordion behavior
//!
//! Reads `.usa-accordion__button[aria-controls]` inside each
//! `.usa-accordion`, syncs panel `hidden` with `aria-expanded`, and toggles
//! on click. Only one panel stays open unless the accordion carries
//! `data-allow-multiple`.

use std::rc::Rc;

use uswds_dom::{DomTree, NodeId};

use super::ledger::{BoundRoots, SideEffects};
use super::closest;
use crate::{Behavior, BehaviorError};

const NAME: &str = "accordion";
const ACCORDION: &str = "usa-accordion";
const BUTTON: &str = "usa-accordion__button";
const EXPANDED: &str = "aria-expanded";
const CONTROLS: &str = "aria-controls";
const MULTISELECTABLE: &str = "data-allow-multiple";

#[derive(Default)]
pub struct AccordionBehavior {
    bound: BoundRoots,
}

impl Behavior for AccordionBehavior {
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

fn bind(tree: &mut DomTree, root: NodeId, effects: &mut SideEffects) -> Result<(), BehaviorError> {
    for accordion in tree.elements_by_class(root, ACCORDION) {
        for button in buttons(tree, accordion) {
            let panel = panel_for(tree, accordion, button)?;
            let expanded = tree.get_attribute(button, EXPANDED) == Some("true");
            effects.set_attribute(tree, button, EXPANDED, if expanded { "true" } else { "false" })?;
            if expanded {
                effects.remove_attribute(tree, panel, "hidden");
            } else {
                effects.set_attribute(tree, panel, "hidden", "")?;
            }
            effects.listen(tree, button, "click", Rc::new(move |tree, _| toggle(tree, accordion, button)));
        }
    }
    Ok(())
}

/// Buttons belonging to this accordion, not to one nested inside it
fn buttons(tree: &DomTree, accordion: NodeId) -> Vec<NodeId> {
    tree.elements_by_class(accordion, BUTTON)
        .into_iter()
        .filter(|&b| closest(tree, b, ACCORDION) == Some(accordion))
        .collect()
}

fn panel_for(tree: &DomTree, accordion: NodeId, button: NodeId) -> Result<NodeId, BehaviorError> {
    let id = tree
        .get_attribute(button, CONTROLS)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| BehaviorError::MissingAttribute {
            behavior: NAME.to_string(),
            element: "accordion button",
            attribute: CONTROLS,
        })?;
    tree.element_by_id(accordion, id)
        .or_else(|| tree.element_by_id(NodeId::ROOT, id))
        .ok_or_else(|| BehaviorError::MissingTarget {
            behavior: NAME.to_string(),
            attribute: CONTROLS,
            id: id.to_string(),
        })
}

fn toggle(tree: &mut DomTree, accordion: NodeId, button: NodeId) {
    let expand = tree.get_attribute(button, EXPANDED) != Some("true");
    if expand && !tree.has_attribute(accordion, MULTISELECTABLE) {
        for other in buttons(tree, accordion) {
            if other != button {
                set_expanded(tree, accordion, other, false);
            }
        }
    }
    set_expanded(tree, accordion, button, expand);
}

fn set_expanded(tree: &mut DomTree, accordion: NodeId, button: NodeId, expanded: bool) {
    let result = tree
        .set_attribute(button, EXPANDED, if expanded { "true" } else { "false" })
        .and_then(|_| match panel_for(tree, accordion, button) {
            Ok(panel) if expanded => {
                tree.remove_attribute(panel, "hidden");
                Ok(())
            }
            Ok(panel) => tree.set_attribute(panel, "hidden", ""),
            Err(_) => Ok(()),
        });
    if let Err(err) = result {
        tracing::warn!(%button, error = %err, "accordion toggle failed");
    }
}
