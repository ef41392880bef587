//! Bundled USWDS behaviors
//!
//! Each behavior binds per root and keeps a ledger of what it changed, so
//! init is idempotent for a given root and teardown restores the markup.
//! Generated nodes are placed beside projection targets, never inside one.

mod accordion;
mod character_count;
mod combo_box;
mod ledger;

use uswds_dom::{DomTree, NodeId};

pub use accordion::AccordionBehavior;
pub use character_count::{status_message, CharacterCountBehavior};
pub use combo_box::ComboBoxBehavior;
pub use ledger::{BoundRoots, SideEffects};

/// Nearest inclusive ancestor carrying `class`
fn closest(tree: &DomTree, node: NodeId, class: &str) -> Option<NodeId> {
    tree.ancestors_inclusive(node)
        .into_iter()
        .find(|&n| tree.has_class(n, class))
}
