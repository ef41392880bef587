//! Side-effect ledger
//!
//! Bundled behaviors route every DOM change they make during init through
//! [`SideEffects`] so teardown (or a failed init) can undo exactly that.

use std::cell::RefCell;
use std::collections::HashMap;

use uswds_dom::{DomResult, DomTree, Listener, ListenerId, NodeId};

/// Changes made by one init call
#[derive(Default)]
pub struct SideEffects {
    listeners: Vec<ListenerId>,
    generated: Vec<NodeId>,
    classes: Vec<(NodeId, String)>,
    attributes: Vec<(NodeId, String, Option<String>)>,
}

impl SideEffects {
    pub fn listen(&mut self, tree: &mut DomTree, node: NodeId, event_type: &str, listener: Listener) {
        let id = tree.add_event_listener(node, event_type, listener);
        self.listeners.push(id);
    }

    /// Insert a generated node as the last child of `parent`
    pub fn generate(&mut self, tree: &mut DomTree, parent: NodeId, node: NodeId) -> DomResult<()> {
        tree.append_child(parent, node)?;
        self.generated.push(node);
        Ok(())
    }

    pub fn add_class(&mut self, tree: &mut DomTree, node: NodeId, class: &str) -> DomResult<()> {
        if tree.add_class(node, class)? {
            self.classes.push((node, class.to_string()));
        }
        Ok(())
    }

    pub fn set_attribute(&mut self, tree: &mut DomTree, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        if tree.get_attribute(node, name) == Some(value) {
            return Ok(());
        }
        self.remember(tree, node, name);
        tree.set_attribute(node, name, value)
    }

    pub fn remove_attribute(&mut self, tree: &mut DomTree, node: NodeId, name: &str) {
        if tree.has_attribute(node, name) {
            self.remember(tree, node, name);
            tree.remove_attribute(node, name);
        }
    }

    // First write wins: that is the value to restore
    fn remember(&mut self, tree: &DomTree, node: NodeId, name: &str) {
        if !self.attributes.iter().any(|(n, a, _)| *n == node && a == name) {
            let previous = tree.get_attribute(node, name).map(str::to_string);
            self.attributes.push((node, name.to_string(), previous));
        }
    }

    pub fn generated(&self) -> &[NodeId] {
        &self.generated
    }

    /// Undo everything, newest first
    pub fn revert(self, tree: &mut DomTree) {
        for id in self.listeners {
            tree.remove_event_listener(id);
        }
        for node in self.generated.into_iter().rev() {
            tree.detach(node);
        }
        for (node, class) in self.classes.into_iter().rev() {
            if let Err(err) = tree.remove_class(node, &class) {
                tracing::debug!(%node, error = %err, "could not restore class");
            }
        }
        for (node, name, previous) in self.attributes.into_iter().rev() {
            let restored = match previous {
                Some(value) => tree.set_attribute(node, &name, &value),
                None => {
                    tree.remove_attribute(node, &name);
                    Ok(())
                }
            };
            if let Err(err) = restored {
                tracing::debug!(%node, attribute = name, error = %err, "could not restore attribute");
            }
        }
    }
}

/// Roots a behavior is bound to, with the effects to revert for each
#[derive(Default)]
pub struct BoundRoots {
    roots: RefCell<HashMap<NodeId, SideEffects>>,
}

impl BoundRoots {
    pub fn is_bound(&self, root: NodeId) -> bool {
        self.roots.borrow().contains_key(&root)
    }

    pub fn len(&self) -> usize {
        self.roots.borrow().len()
    }

    /// Bind `root` using `bind`; a failed bind is reverted before returning
    pub fn bind<E>(
        &self,
        tree: &mut DomTree,
        root: NodeId,
        bind: impl FnOnce(&mut DomTree, &mut SideEffects) -> Result<(), E>,
    ) -> Result<(), E> {
        if self.is_bound(root) {
            return Ok(());
        }
        let mut effects = SideEffects::default();
        match bind(tree, &mut effects) {
            Ok(()) => {
                self.roots.borrow_mut().insert(root, effects);
                Ok(())
            }
            Err(err) => {
                effects.revert(tree);
                Err(err)
            }
        }
    }

    /// Revert and forget `root`; returns whether it was bound
    pub fn release(&self, tree: &mut DomTree, root: NodeId) -> bool {
        let effects = self.roots.borrow_mut().remove(&root);
        match effects {
            Some(effects) => {
                effects.revert(tree);
                true
            }
            None => false,
        }
    }
}
