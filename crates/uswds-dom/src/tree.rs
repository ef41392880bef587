//! DOM Tree (arena-based allocation)
//!
//! Nodes live in one `Vec` and link to each other through [`NodeId`]
//! indices. Removing a node only unlinks it; the slot stays in the arena so
//! IDs held elsewhere keep pointing at the same node when it is re-inserted.

use crate::{
    ClassList, DomError, DomResult, ElementData, Event, EventListeners, InternedString, Listener,
    ListenerId, MutationRecord, Node, NodeData, NodeId, NodeType, StringInterner,
};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    interner: StringInterner,
    listeners: EventListeners,
    records: Option<Vec<MutationRecord>>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            interner: StringInterner::new(),
            listeners: EventListeners::default(),
            records: None,
        }
    }

    /// Document node ID
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.index())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.get_mut(id)
            .ok_or(DomError::NotFound(id))?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType(id))
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// String interner used for tag names
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Resolve an interned string
    pub fn resolve(&self, s: InternedString) -> &str {
        self.interner.get(s)
    }

    // --- Node creation ---

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(&tag.to_ascii_lowercase());
        self.push(NodeData::Element(ElementData::new(name)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Text(content.to_string()))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Comment(content.to_string()))
    }

    /// Create an empty document fragment
    pub fn create_fragment(&mut self) -> NodeId {
        self.push(NodeData::Fragment)
    }

    // --- Inspection ---

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).map(Node::node_type)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        let elem = self.get(id)?.as_element()?;
        Some(self.interner.get(elem.name))
    }

    /// Text of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_text()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.first_child).filter(|c| c.is_valid())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.next_sibling).filter(|s| s.is_valid())
    }

    /// Iterate over direct children
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(parent).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Direct children, collected
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).collect()
    }

    /// Direct element children
    pub fn element_children(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).filter(|&c| self.is_element(c)).collect()
    }

    /// All descendants in document (pre-)order, excluding `root`
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_ids(root);
        stack.reverse();
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut children = self.child_ids(id);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// `node` followed by each of its ancestors up to the top of its tree
    pub fn ancestors_inclusive(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = Some(node).filter(|&n| self.get(n).is_some());
        while let Some(id) = current {
            out.push(id);
            current = self.parent(id);
        }
        out
    }

    /// Inclusive ancestor check
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node).filter(|&n| self.get(n).is_some());
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether the node is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(NodeId::ROOT, id)
    }

    // --- Mutation ---

    /// Append a child node (moving it if already attached)
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end)
    ///
    /// Inserting a fragment moves all of its children, in order, in a single
    /// step and leaves the fragment empty.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.check_insert(parent, child)?;

        // Inserting a node before itself means before its next sibling
        let reference = if reference == Some(child) {
            self.next_sibling(child)
        } else {
            reference
        };
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild { parent, child: reference });
            }
        }

        if matches!(self.node(child)?.data, NodeData::Fragment) {
            let moved = self.child_ids(child);
            for &node in &moved {
                self.unlink(node);
            }
            for &node in &moved {
                self.link(parent, node, reference);
            }
            if !moved.is_empty() {
                self.record(parent, || MutationRecord::child_list(parent, moved.clone(), Vec::new()));
            }
            return Ok(child);
        }

        self.detach(child);
        self.link(parent, child, reference);
        self.record(parent, || MutationRecord::child_list(parent, vec![child], Vec::new()));
        Ok(child)
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.node(child)?;
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(child)
    }

    /// Unlink a node from its parent, returns whether it had one
    pub fn detach(&mut self, child: NodeId) -> bool {
        let Some(parent) = self.parent(child) else {
            return false;
        };
        self.record(parent, || MutationRecord::child_list(parent, Vec::new(), vec![child]));
        self.unlink(child);
        true
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;
        if !parent_node.is_container()
            || matches!(child_node.data, NodeData::Document)
            || self.contains(child, parent)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn link(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        match reference {
            None => {
                let last = self.nodes[parent.index()].last_child;
                {
                    let node = &mut self.nodes[child.index()];
                    node.parent = parent;
                    node.prev_sibling = last;
                    node.next_sibling = NodeId::NONE;
                }
                if last.is_valid() {
                    self.nodes[last.index()].next_sibling = child;
                } else {
                    self.nodes[parent.index()].first_child = child;
                }
                self.nodes[parent.index()].last_child = child;
            }
            Some(next) => {
                let prev = self.nodes[next.index()].prev_sibling;
                {
                    let node = &mut self.nodes[child.index()];
                    node.parent = parent;
                    node.prev_sibling = prev;
                    node.next_sibling = next;
                }
                self.nodes[next.index()].prev_sibling = child;
                if prev.is_valid() {
                    self.nodes[prev.index()].next_sibling = child;
                } else {
                    self.nodes[parent.index()].first_child = child;
                }
            }
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[child.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }
        let node = &mut self.nodes[child.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    // --- Attributes ---

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.attrs.get(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let old = self.element_mut(id)?.attrs.set(name, value);
        self.record(id, || MutationRecord::attribute(id, name, old));
        Ok(())
    }

    /// Remove an attribute, returns whether it was present
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let removed = match self.element_mut(id) {
            Ok(elem) => elem.attrs.remove(name),
            Err(_) => None,
        };
        match removed {
            Some(attr) => {
                self.record(id, || MutationRecord::attribute(id, name, Some(attr.value)));
                true
            }
            None => false,
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get_attribute(id, "class")
            .is_some_and(|value| ClassList::from_string(value).contains(class))
    }

    /// Add a class, returns whether it was newly added
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<bool> {
        let mut list = ClassList::from_string(self.get_attribute(id, "class").unwrap_or(""));
        if !list.add(class) {
            return Ok(false);
        }
        self.set_attribute(id, "class", &list.value())?;
        Ok(true)
    }

    /// Remove a class, returns whether it was present
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<bool> {
        let mut list = ClassList::from_string(self.get_attribute(id, "class").unwrap_or(""));
        if !list.remove(class) {
            return Ok(false);
        }
        if list.is_empty() {
            self.remove_attribute(id, "class");
        } else {
            self.set_attribute(id, "class", &list.value())?;
        }
        Ok(true)
    }

    // --- Text ---

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Replace all children with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        if !self.node(id)?.is_container() {
            return Err(DomError::InvalidNodeType(id));
        }
        for child in self.child_ids(id) {
            self.detach(child);
        }
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node)?;
        }
        Ok(())
    }

    // --- Queries ---

    /// `root` and its descendants matching a predicate, in document order
    pub fn find_all(&self, root: NodeId, pred: impl Fn(&DomTree, NodeId) -> bool) -> Vec<NodeId> {
        std::iter::once(root)
            .chain(self.descendants(root))
            .filter(|&n| pred(self, n))
            .collect()
    }

    /// Elements carrying a class, `root` included
    pub fn elements_by_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.find_all(root, |tree, n| tree.has_class(n, class))
    }

    /// Elements with a tag name, `root` included
    pub fn elements_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.find_all(root, |tree, n| tree.tag_name(n) == Some(tag))
    }

    /// First element under `root` whose `id` attribute matches
    pub fn element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        std::iter::once(root)
            .chain(self.descendants(root))
            .find(|&n| self.get_attribute(n, "id") == Some(id))
    }

    // --- Events ---

    pub fn add_event_listener(&mut self, node: NodeId, event_type: &str, listener: Listener) -> ListenerId {
        self.listeners.add(node, event_type, listener)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Listeners registered on one node
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.count_for(node)
    }

    /// Listeners registered anywhere in the tree
    pub fn total_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Dispatch an event at `target`, bubbling through its ancestors.
    /// Returns the number of listeners invoked.
    pub fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> usize {
        let mut invoked = 0;
        for current in self.ancestors_inclusive(target) {
            let event = Event {
                event_type: event_type.to_string(),
                target,
                current_target: current,
            };
            for listener in self.listeners.matching(current, event_type) {
                listener(self, &event);
                invoked += 1;
            }
        }
        tracing::trace!(%target, event_type, invoked, "dispatched event");
        invoked
    }

    // --- Mutation records ---

    /// Start or stop recording mutations on connected nodes
    pub fn record_mutations(&mut self, enabled: bool) {
        match (enabled, self.records.is_some()) {
            (true, false) => self.records = Some(Vec::new()),
            (false, true) => self.records = None,
            _ => {}
        }
    }

    /// Drain recorded mutations
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        self.records.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn record(&mut self, target: NodeId, make: impl FnOnce() -> MutationRecord) {
        if self.records.is_none() || !self.is_connected(target) {
            return;
        }
        let record = make();
        if let Some(records) = self.records.as_mut() {
            records.push(record);
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        let node = self.tree.get(current)?;
        self.next = node.next_sibling;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_order() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let a = tree.create_element("li");
        let b = tree.create_element("li");
        tree.append_child(tree.root(), ul).unwrap();
        tree.append_child(ul, a).unwrap();
        tree.append_child(ul, b).unwrap();

        assert_eq!(tree.child_ids(ul), vec![a, b]);
        assert_eq!(tree.parent(a), Some(ul));
        assert!(tree.is_connected(b));
    }

    #[test]
    fn test_append_moves_node() {
        let mut tree = DomTree::new();
        let left = tree.create_element("div");
        let right = tree.create_element("div");
        let item = tree.create_element("p");
        tree.append_child(left, item).unwrap();
        tree.append_child(right, item).unwrap();

        assert!(tree.child_ids(left).is_empty());
        assert_eq!(tree.child_ids(right), vec![item]);
    }

    #[test]
    fn test_insert_before() {
        let mut tree = DomTree::new();
        let parent = tree.create_element("div");
        let a = tree.create_element("span");
        let b = tree.create_element("span");
        let c = tree.create_element("span");
        tree.append_child(parent, a).unwrap();
        tree.append_child(parent, c).unwrap();
        tree.insert_before(parent, b, Some(c)).unwrap();

        assert_eq!(tree.child_ids(parent), vec![a, b, c]);
    }

    #[test]
    fn test_insert_before_foreign_reference() {
        let mut tree = DomTree::new();
        let parent = tree.create_element("div");
        let other = tree.create_element("div");
        let stranger = tree.create_element("span");
        let child = tree.create_element("span");
        tree.append_child(other, stranger).unwrap();

        let err = tree.insert_before(parent, child, Some(stranger)).unwrap_err();
        assert_eq!(err, DomError::NotAChild { parent, child: stranger });
    }

    #[test]
    fn test_hierarchy_request() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();

        assert!(matches!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
        let text = tree.create_text("x");
        assert!(matches!(
            tree.append_child(text, inner),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_fragment_insertion_moves_children() {
        let mut tree = DomTree::new();
        let target = tree.create_element("div");
        tree.append_child(tree.root(), target).unwrap();
        let fragment = tree.create_fragment();
        let a = tree.create_element("p");
        let b = tree.create_element("p");
        tree.append_child(fragment, a).unwrap();
        tree.append_child(fragment, b).unwrap();

        tree.record_mutations(true);
        tree.append_child(target, fragment).unwrap();
        let records = tree.take_records();

        assert_eq!(tree.child_ids(target), vec![a, b]);
        assert!(tree.child_ids(fragment).is_empty());
        assert_eq!(records, vec![MutationRecord::child_list(target, vec![a, b], vec![])]);
    }

    #[test]
    fn test_detached_mutations_not_recorded() {
        let mut tree = DomTree::new();
        tree.record_mutations(true);
        let div = tree.create_element("div");
        tree.set_attribute(div, "class", "usa-alert").unwrap();
        let p = tree.create_element("p");
        tree.append_child(div, p).unwrap();

        assert!(tree.take_records().is_empty());
    }

    #[test]
    fn test_classes() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        assert!(tree.add_class(div, "usa-alert").unwrap());
        assert!(!tree.add_class(div, "usa-alert").unwrap());
        assert!(tree.add_class(div, "usa-alert--info").unwrap());
        assert_eq!(tree.get_attribute(div, "class"), Some("usa-alert usa-alert--info"));

        assert!(tree.remove_class(div, "usa-alert").unwrap());
        assert!(tree.remove_class(div, "usa-alert--info").unwrap());
        assert!(!tree.has_attribute(div, "class"));
    }

    #[test]
    fn test_text_content() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let strong = tree.create_element("strong");
        let a = tree.create_text("Hello, ");
        let b = tree.create_text("World");
        tree.append_child(p, a).unwrap();
        tree.append_child(p, strong).unwrap();
        tree.append_child(strong, b).unwrap();
        assert_eq!(tree.text_content(p), "Hello, World");

        tree.set_text_content(p, "Bye").unwrap();
        assert_eq!(tree.text_content(p), "Bye");
        assert_eq!(tree.child_ids(p).len(), 1);
    }

    #[test]
    fn test_dispatch_bubbles() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let button = tree.create_element("button");
        tree.append_child(outer, button).unwrap();

        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        tree.add_event_listener(outer, "click", Rc::new(move |_, event| {
            assert_eq!(event.target, button);
            counter.set(counter.get() + 1);
        }));

        assert_eq!(tree.dispatch_event(button, "click"), 1);
        assert_eq!(tree.dispatch_event(button, "input"), 0);
        assert_eq!(hits.get(), 1);
    }
}
