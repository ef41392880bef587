//! Slot projection
//!
//! Light-DOM children marked with a slot attribute are moved into the
//! rendered structure's projection targets. Moves always go through a
//! detached fragment so each target is rewritten with a single insertion,
//! and a target whose content already matches is left untouched.

use std::collections::BTreeMap;

use uswds_dom::{DomError, DomResult, DomTree, NodeId};

use crate::RenderedStructure;

/// Slot name to target mapping. Several slots may share a target; their
/// nodes are concatenated in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub name: &'static str,
    pub target: &'static str,
}

/// Nodes currently projected, per slot, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedSet {
    slots: BTreeMap<&'static str, Vec<NodeId>>,
}

impl ProjectedSet {
    pub fn get(&self, slot: &str) -> &[NodeId] {
        self.slots.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.slots.values().any(|nodes| nodes.contains(&node))
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.values().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, slot: &'static str, nodes: Vec<NodeId>) {
        if !nodes.is_empty() {
            self.slots.insert(slot, nodes);
        }
    }
}

/// Slot whose target could not be found in the rendered structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingTarget {
    pub slot: &'static str,
    pub target: &'static str,
}

/// Outcome of one projection pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionReport {
    pub projected: ProjectedSet,
    /// Targets whose children were rewritten
    pub rewritten_targets: usize,
    /// Nodes inserted through fragments
    pub moved: usize,
    pub missing: Vec<MissingTarget>,
    /// Host children carrying a slot name nobody declared
    pub unassigned: Vec<NodeId>,
    /// Previously projected nodes that lost their marker, handed back to the host
    pub released: Vec<NodeId>,
    /// Slots whose target exists, eligible for a suppression rule
    pub resolved_slots: Vec<&'static str>,
}

impl ProjectionReport {
    pub fn is_unchanged(&self) -> bool {
        self.rewritten_targets == 0 && self.released.is_empty()
    }
}

/// Projects a host's marked children into its rendered targets
pub struct SlotProjector<'a> {
    slots: &'static [SlotSpec],
    slot_attribute: &'a str,
}

impl<'a> SlotProjector<'a> {
    pub fn new(slots: &'static [SlotSpec], slot_attribute: &'a str) -> Self {
        Self { slots, slot_attribute }
    }

    fn spec(&self, name: Option<&str>) -> Option<&'static SlotSpec> {
        let name = name?;
        self.slots.iter().find(|s| s.name == name)
    }

    /// Run a projection pass.
    ///
    /// `previous` is the set returned by the last pass. Nodes in it that are
    /// still inside the host keep their position ahead of newly marked host
    /// children, so re-projection is stable across updates and rebuilds.
    pub fn project(
        &self,
        tree: &mut DomTree,
        host: NodeId,
        structure: &RenderedStructure,
        previous: &ProjectedSet,
    ) -> DomResult<ProjectionReport> {
        let mut report = ProjectionReport::default();
        let mut candidates: BTreeMap<&'static str, Vec<NodeId>> = BTreeMap::new();

        for slot in self.slots {
            for &node in previous.get(slot.name) {
                if tree.parent(node) == Some(host) || !tree.contains(host, node) {
                    continue;
                }
                match self.spec(tree.get_attribute(node, self.slot_attribute)) {
                    Some(spec) => candidates.entry(spec.name).or_default().push(node),
                    None => {
                        tree.append_child(host, node)?;
                        report.released.push(node);
                    }
                }
            }
        }

        for child in tree.element_children(host) {
            let Some(name) = tree.get_attribute(child, self.slot_attribute) else {
                continue;
            };
            match self.spec(Some(name)) {
                Some(spec) => candidates.entry(spec.name).or_default().push(child),
                None => {
                    tracing::debug!(%host, %child, slot = name, "no slot declared with this name");
                    report.unassigned.push(child);
                }
            }
        }

        let mut targets: Vec<&'static str> = Vec::new();
        for slot in self.slots {
            if !targets.contains(&slot.target) {
                targets.push(slot.target);
            }
        }

        let container = structure.container();
        for target_name in targets {
            let sharing = self.slots.iter().filter(|s| s.target == target_name);
            let target = structure
                .target(target_name)
                .filter(|&t| tree.contains(container, t) && tree.contains(host, t));
            let Some(target) = target else {
                report.missing.extend(sharing.map(|s| MissingTarget {
                    slot: s.name,
                    target: target_name,
                }));
                continue;
            };

            let mut desired = Vec::new();
            for slot in sharing {
                let nodes = candidates.remove(slot.name).unwrap_or_default();
                desired.extend(nodes.iter().copied());
                report.projected.insert(slot.name, nodes);
                report.resolved_slots.push(slot.name);
            }
            if desired.is_empty() {
                desired = structure.fallback(target_name).to_vec();
            }

            if tree.child_ids(target) == desired {
                continue;
            }
            if let Some(&bad) = desired.iter().find(|&&n| tree.contains(n, target)) {
                return Err(DomError::HierarchyRequest { parent: target, child: bad });
            }

            let fragment = tree.create_fragment();
            for &node in &desired {
                tree.append_child(fragment, node)?;
            }
            for stale in tree.child_ids(target) {
                tree.detach(stale);
            }
            tree.append_child(target, fragment)?;

            report.moved += desired.len();
            report.rewritten_targets += 1;
        }

        tracing::trace!(
            %host,
            rewritten = report.rewritten_targets,
            moved = report.moved,
            "projection pass"
        );
        Ok(report)
    }
}
