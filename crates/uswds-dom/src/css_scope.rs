//! Host-scoped CSS
//!
//! Light-DOM components cannot rely on shadow encapsulation, so `:host`
//! rules are rewritten against a per-host scope attribute
//! (`[data-uswds-host="12"]`). The sheet can also evaluate its own rules
//! against the tree, which is how suppression of unprojected slot content
//! is checked without a full style engine.

use crate::{DomTree, NodeId};

/// Selector forms a scoped sheet understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopedSelector {
    /// `:host`
    Host,
    /// `:host > [attribute]` or `:host > [attribute="value"]`
    HostChild {
        attribute: String,
        value: Option<String>,
    },
}

/// Scoped CSS rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedRule {
    pub selector: ScopedSelector,
    pub declarations: Vec<(String, String)>,
}

impl ScopedRule {
    fn declares(&self, property: &str, value: &str) -> bool {
        self.declarations
            .iter()
            .any(|(k, v)| k == property && v == value)
    }
}

/// Stylesheet scoped to one host element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedStyleSheet {
    /// Scope identifier (written as the scope attribute's value)
    pub scope_id: u32,
    /// Host element the sheet belongs to
    pub host: NodeId,
    /// Attribute carrying the scope identifier on the host
    pub scope_attribute: String,
    /// Rules in declaration order
    pub rules: Vec<ScopedRule>,
}

impl ScopedStyleSheet {
    /// Create an empty sheet for a host
    pub fn new(scope_id: u32, host: NodeId, scope_attribute: impl Into<String>) -> Self {
        Self {
            scope_id,
            host,
            scope_attribute: scope_attribute.into(),
            rules: Vec::new(),
        }
    }

    pub fn add_rule(&mut self, selector: ScopedSelector, declarations: &[(&str, &str)]) {
        self.rules.push(ScopedRule {
            selector,
            declarations: declarations
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite a selector against the host scope attribute
    pub fn scope_selector(&self, selector: &ScopedSelector) -> String {
        let host = format!("[{}=\"{}\"]", self.scope_attribute, self.scope_id);
        match selector {
            ScopedSelector::Host => host,
            ScopedSelector::HostChild { attribute, value: None } => {
                format!("{host} > [{attribute}]")
            }
            ScopedSelector::HostChild { attribute, value: Some(value) } => {
                format!("{host} > [{attribute}=\"{value}\"]")
            }
        }
    }

    /// Generate CSS text
    pub fn to_css(&self) -> String {
        self.rules
            .iter()
            .map(|rule| {
                let decls = rule
                    .declarations
                    .iter()
                    .map(|(k, v)| format!("{k}: {v};"))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{} {{ {} }}", self.scope_selector(&rule.selector), decls)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether a rule's selector matches `node`
    pub fn matches(&self, tree: &DomTree, rule: &ScopedRule, node: NodeId) -> bool {
        match &rule.selector {
            ScopedSelector::Host => node == self.host,
            ScopedSelector::HostChild { attribute, value } => {
                tree.parent(node) == Some(self.host)
                    && match (tree.get_attribute(node, attribute), value) {
                        (Some(actual), Some(expected)) => actual == expected,
                        (Some(_), None) => true,
                        (None, _) => false,
                    }
            }
        }
    }

    /// Whether any `display: none` rule applies to `node` itself
    pub fn hides(&self, tree: &DomTree, node: NodeId) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.declares("display", "none") && self.matches(tree, rule, node))
    }
}
