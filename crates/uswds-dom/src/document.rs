//! Document - High-level document API

use std::collections::BTreeMap;

use crate::{DomTree, NodeId, ScopedStyleSheet};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Host-scoped sheets keyed by scope id
    styles: BTreeMap<u32, ScopedStyleSheet>,
}

impl Document {
    /// Create a document with `<html><head></head><body></body></html>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes under the document node cannot violate hierarchy rules
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            styles: BTreeMap::new(),
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            styles: BTreeMap::new(),
        }
    }

    /// Locate `<html>`, `<head>` and `<body>` after the tree was filled externally
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self
            .tree
            .element_children(root)
            .into_iter()
            .find(|&n| self.tree.tag_name(n) == Some("html"))
            .unwrap_or(NodeId::NONE);

        let sections = self.tree.element_children(self.html_element);
        let find = |tag: &str| {
            sections
                .iter()
                .copied()
                .find(|&n| self.tree.tag_name(n) == Some(tag))
                .unwrap_or(NodeId::NONE)
        };
        self.head_element = find("head");
        self.body_element = find("body");
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.element_by_id(self.tree.root(), id)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // --- Scoped styles ---

    /// Install a host sheet, replacing the previous one for the same scope
    pub fn adopt_style_sheet(&mut self, sheet: ScopedStyleSheet) -> Option<ScopedStyleSheet> {
        self.styles.insert(sheet.scope_id, sheet)
    }

    pub fn remove_style_sheet(&mut self, scope_id: u32) -> Option<ScopedStyleSheet> {
        self.styles.remove(&scope_id)
    }

    pub fn style_sheet(&self, scope_id: u32) -> Option<&ScopedStyleSheet> {
        self.styles.get(&scope_id)
    }

    pub fn style_sheets(&self) -> impl Iterator<Item = &ScopedStyleSheet> {
        self.styles.values()
    }

    /// All adopted sheets as CSS text
    pub fn to_css(&self) -> String {
        self.styles
            .values()
            .filter(|sheet| !sheet.is_empty())
            .map(ScopedStyleSheet::to_css)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether an adopted sheet hides `node` or one of its ancestors
    pub fn is_suppressed(&self, node: NodeId) -> bool {
        self.tree
            .ancestors_inclusive(node)
            .into_iter()
            .any(|n| self.styles.values().any(|sheet| sheet.hides(&self.tree, n)))
    }

    /// Whether `node` is in the document and not suppressed by a scoped sheet.
    /// The `hidden` attribute is behavior state and is not considered.
    pub fn is_rendered(&self, node: NodeId) -> bool {
        self.tree.is_connected(node) && !self.is_suppressed(node)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
