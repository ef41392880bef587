//! Structure templates
//!
//! A template describes the static USWDS markup a component renders:
//! elements, attributes, named parts the bridge writes to, and named
//! projection targets. Text placed directly inside a target element is
//! that target's fallback content.

use std::collections::HashMap;

use uswds_dom::{DomResult, DomTree, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateNode {
    Element(ElementTemplate),
    Text(String),
}

/// Element in a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementTemplate {
    tag: String,
    attrs: Vec<(String, String)>,
    part: Option<String>,
    target: Option<String>,
    children: Vec<TemplateNode>,
}

impl ElementTemplate {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
        self
    }

    /// Add one or more space separated classes
    pub fn class(self, class: &str) -> Self {
        let joined = match self.attrs.iter().find(|(n, _)| n == "class") {
            Some((_, existing)) => format!("{existing} {class}"),
            None => class.to_string(),
        };
        self.attr("class", &joined)
    }

    /// Name this element as a part
    pub fn part(mut self, name: &str) -> Self {
        self.part = Some(name.to_string());
        self
    }

    /// Name this element as a projection target
    pub fn target(mut self, name: &str) -> Self {
        self.target = Some(name.to_string());
        self
    }

    pub fn child(mut self, child: ElementTemplate) -> Self {
        self.children.push(TemplateNode::Element(child));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.children.push(TemplateNode::Text(text.to_string()));
        self
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ElementTemplate)) {
        visit(self);
        for child in &self.children {
            if let TemplateNode::Element(el) = child {
                el.walk(visit);
            }
        }
    }

    fn build(&self, tree: &mut DomTree, out: &mut RenderedStructure) -> DomResult<NodeId> {
        let node = tree.create_element(&self.tag);
        for (name, value) in &self.attrs {
            tree.set_attribute(node, name, value)?;
        }
        if let Some(part) = &self.part {
            out.parts.insert(part.clone(), node);
        }

        let mut fallback = Vec::new();
        for child in &self.children {
            let child_id = match child {
                TemplateNode::Element(el) => el.build(tree, out)?,
                TemplateNode::Text(text) => tree.create_text(text),
            };
            tree.append_child(node, child_id)?;
            fallback.push(child_id);
        }

        if let Some(target) = &self.target {
            out.targets.insert(target.clone(), node);
            out.fallback.insert(target.clone(), fallback);
        }
        Ok(node)
    }
}

/// Component template, rooted at a single container element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    root: ElementTemplate,
}

impl Template {
    pub fn new(root: ElementTemplate) -> Self {
        Self { root }
    }

    pub fn declares_part(&self, name: &str) -> bool {
        let mut found = false;
        self.root.walk(&mut |el| found |= el.part.as_deref() == Some(name));
        found
    }

    pub fn declares_target(&self, name: &str) -> bool {
        let mut found = false;
        self.root.walk(&mut |el| found |= el.target.as_deref() == Some(name));
        found
    }

    /// Build a fresh, detached copy of the structure
    pub fn render(&self, tree: &mut DomTree) -> DomResult<RenderedStructure> {
        let mut out = RenderedStructure {
            container: NodeId::NONE,
            parts: HashMap::new(),
            targets: HashMap::new(),
            fallback: HashMap::new(),
        };
        out.container = self.root.build(tree, &mut out)?;
        Ok(out)
    }
}

/// Handles into one rendered copy of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedStructure {
    container: NodeId,
    parts: HashMap<String, NodeId>,
    targets: HashMap<String, NodeId>,
    fallback: HashMap<String, Vec<NodeId>>,
}

impl RenderedStructure {
    /// Root element of the structure
    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn part(&self, name: &str) -> Option<NodeId> {
        self.parts.get(name).copied()
    }

    pub fn target(&self, name: &str) -> Option<NodeId> {
        self.targets.get(name).copied()
    }

    /// Content a target shows when nothing is projected into it
    pub fn fallback(&self, target: &str) -> &[NodeId] {
        self.fallback.get(target).map(Vec::as_slice).unwrap_or(&[])
    }
}
