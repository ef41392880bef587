//! Element runtime
//!
//! Owns the document, the definitions and every upgraded host. DOM changes
//! that matter to hosts go through the runtime so it can queue lifecycle
//! reactions; [`Runtime::flush`] then runs them, standing in for the
//! microtask checkpoint a browser would use.

use std::collections::BTreeMap;
use std::rc::Rc;

use uswds_dom::{Document, DomTree, NodeId, NodeType};

use crate::{
    components, Behavior, BehaviorRegistry, ComponentDefinition, CustomElementRegistry,
    DefinitionError, ElementError, ElementResult, ElementsConfig, FieldValue, HostElement, Reaction,
    ReactionQueue,
};

/// Work done by one flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub connected: usize,
    pub updated: usize,
}

pub struct Runtime {
    document: Document,
    registry: CustomElementRegistry,
    behaviors: BehaviorRegistry,
    config: ElementsConfig,
    hosts: BTreeMap<NodeId, HostElement>,
    queue: ReactionQueue,
}

impl Runtime {
    /// Runtime over an empty document, nothing defined
    pub fn new(config: ElementsConfig) -> Self {
        Self::with_document(Document::default(), config)
    }

    pub fn with_document(document: Document, config: ElementsConfig) -> Self {
        Self {
            document,
            registry: CustomElementRegistry::new(),
            behaviors: BehaviorRegistry::new(),
            config,
            hosts: BTreeMap::new(),
            queue: ReactionQueue::new(),
        }
    }

    /// Runtime with the bundled components and behaviors; elements already
    /// in `document` are upgraded and queued
    pub fn uswds(document: Document, config: ElementsConfig) -> Result<Self, DefinitionError> {
        let mut runtime = Self::with_document(document, config);
        runtime.behaviors = BehaviorRegistry::uswds();
        for definition in components::all() {
            runtime.define(definition)?;
        }
        Ok(runtime)
    }

    /// Define a component and upgrade matching elements in the document.
    /// Returns the number of elements upgraded.
    pub fn define(&mut self, definition: ComponentDefinition) -> Result<usize, DefinitionError> {
        self.registry.define(definition)?;
        Ok(self.upgrade_all())
    }

    pub fn register_behavior(&mut self, behavior: Rc<dyn Behavior>) {
        self.behaviors.register(behavior);
    }

    // --- Accessors ---

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct document access. Changes made here bypass lifecycle reactions.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn tree(&self) -> &DomTree {
        self.document.tree()
    }

    pub fn config(&self) -> &ElementsConfig {
        &self.config
    }

    pub fn registry(&self) -> &CustomElementRegistry {
        &self.registry
    }

    pub fn behaviors(&self) -> &BehaviorRegistry {
        &self.behaviors
    }

    pub fn host(&self, id: NodeId) -> Option<&HostElement> {
        self.hosts.get(&id)
    }

    pub fn host_mut(&mut self, id: NodeId) -> Option<&mut HostElement> {
        self.hosts.get_mut(&id)
    }

    /// Upgraded hosts in node order
    pub fn hosts(&self) -> impl Iterator<Item = &HostElement> {
        self.hosts.values()
    }

    pub fn pending_reactions(&self) -> usize {
        self.queue.len()
    }

    // --- DOM operations ---

    /// Upgrade defined elements at or under `root`, queueing connected ones
    pub fn upgrade(&mut self, root: NodeId) -> usize {
        let candidates = self
            .document
            .tree()
            .find_all(root, |tree, n| tree.tag_name(n).is_some_and(|t| t.contains('-')));

        let mut upgraded = 0;
        for node in candidates {
            if self.hosts.contains_key(&node) {
                continue;
            }
            let Some(definition) = self.document.tree().tag_name(node).and_then(|t| self.registry.get(t)) else {
                continue;
            };
            let behavior = definition.behavior.as_deref().and_then(|name| {
                let behavior = self.behaviors.get(name);
                if behavior.is_none() {
                    tracing::warn!(tag = %definition.tag, behavior = name, "behavior not registered, element stays static");
                }
                behavior
            });

            self.hosts.insert(node, HostElement::new(node, definition, behavior));
            upgraded += 1;
            if self.document.tree().is_connected(node) {
                self.queue.enqueue(Reaction::Connected(node));
            }
        }
        if upgraded > 0 {
            tracing::debug!(%root, upgraded, "upgraded elements");
        }
        upgraded
    }

    /// Upgrade everything in the document
    pub fn upgrade_all(&mut self) -> usize {
        self.upgrade(NodeId::ROOT)
    }

    /// Create an element, upgraded if its tag is defined
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let node = self.document.tree_mut().create_element(tag);
        self.upgrade(node);
        node
    }

    /// Append `node` under `parent`
    pub fn insert(&mut self, parent: NodeId, node: NodeId) -> ElementResult<()> {
        self.insert_before(parent, node, None)
    }

    /// Insert (or move) `node`; fragments insert their children
    pub fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) -> ElementResult<()> {
        let moved = if self.tree().node_type(node) == Some(NodeType::DocumentFragment) {
            self.tree().child_ids(node)
        } else {
            vec![node]
        };
        let old_parents: Vec<NodeId> = moved.iter().filter_map(|&n| self.tree().parent(n)).collect();

        let mut disconnected = Vec::new();
        for &n in &moved {
            if self.tree().is_connected(n) {
                disconnected.extend(self.disconnect_subtree(n));
            }
        }

        if let Err(err) = self.document.tree_mut().insert_before(parent, node, reference) {
            for host in disconnected {
                self.queue.enqueue(Reaction::Connected(host));
            }
            return Err(err.into());
        }

        for old in old_parents {
            self.schedule_update(old);
        }
        for &n in &moved {
            self.upgrade(n);
            if self.tree().is_connected(n) {
                for host in self.hosts_in(n) {
                    self.queue.enqueue(Reaction::Connected(host));
                }
            }
        }
        self.schedule_update(parent);
        Ok(())
    }

    /// Remove `node` from its parent. Hosts inside it are torn down first.
    pub fn remove(&mut self, node: NodeId) -> ElementResult<()> {
        let Some(parent) = self.tree().parent(node) else {
            return Ok(());
        };
        let owner = self.projection_owner(node);
        self.disconnect_subtree(node);
        self.document.tree_mut().detach(node);

        self.schedule_update(parent);
        if let Some(owner) = owner {
            self.schedule_update(owner);
        }
        Ok(())
    }

    /// Set (`Some`) or remove (`None`) an attribute
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: Option<&str>) -> ElementResult<()> {
        let tree = self.document.tree_mut();
        match value {
            Some(value) => tree.set_attribute(node, name, value)?,
            None => {
                tree.remove_attribute(node, name);
            }
        }

        if let Some(host) = self.hosts.get_mut(&node) {
            if host.attribute_changed(self.document.tree_mut(), name, value)? {
                self.schedule_update(node);
            }
        }

        // A changed projection marker can move the node between slots
        if name == self.config.slot_attribute {
            if let Some(parent) = self.tree().parent(node) {
                self.schedule_update(parent);
            }
            if let Some(owner) = self.projection_owner(node) {
                self.schedule_update(owner);
            }
        }
        Ok(())
    }

    /// Typed field assignment on a host
    pub fn set_field(&mut self, host: NodeId, name: &str, value: impl Into<FieldValue>) -> ElementResult<()> {
        let element = self.hosts.get_mut(&host).ok_or(ElementError::NotAHost(host))?;
        element.set_field(self.document.tree_mut(), name, value.into())?;
        self.schedule_update(host);
        Ok(())
    }

    /// Run queued reactions until the queue is empty.
    ///
    /// In strict mode the first failing update is returned and the rest of
    /// the queue is left for the next flush.
    pub fn flush(&mut self) -> ElementResult<FlushReport> {
        let mut report = FlushReport::default();
        while let Some(reaction) = self.queue.pop() {
            let id = reaction.host();
            if !self.document.tree().is_connected(id) {
                continue;
            }
            let Some(host) = self.hosts.get_mut(&id) else {
                continue;
            };
            match reaction {
                Reaction::Connected(_) => {
                    host.connected(&mut self.document, &self.config)?;
                    self.queue.enqueue(Reaction::Update(id));
                    report.connected += 1;
                }
                Reaction::Update(_) => {
                    host.update(&mut self.document, &self.config)?;
                    report.updated += 1;
                }
            }
        }
        Ok(report)
    }

    // --- Internals ---

    fn hosts_in(&self, root: NodeId) -> Vec<NodeId> {
        std::iter::once(root)
            .chain(self.tree().descendants(root))
            .filter(|n| self.hosts.contains_key(n))
            .collect()
    }

    /// Host whose projected set contains `node`
    fn projection_owner(&self, node: NodeId) -> Option<NodeId> {
        self.hosts
            .values()
            .find(|h| h.projected().contains(node))
            .map(HostElement::id)
    }

    fn schedule_update(&mut self, node: NodeId) {
        if self.hosts.get(&node).is_some_and(HostElement::is_connected) {
            self.queue.enqueue(Reaction::Update(node));
        }
    }

    /// Tear down every host in the subtree, innermost first
    fn disconnect_subtree(&mut self, root: NodeId) -> Vec<NodeId> {
        let hosts = self.hosts_in(root);
        for &id in hosts.iter().rev() {
            self.queue.discard(id);
            if let Some(host) = self.hosts.get_mut(&id) {
                host.disconnected(&mut self.document, &self.config);
            }
        }
        hosts
    }
}
