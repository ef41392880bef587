//! USWDS DOM - Document Object Model
//!
//! Arena-based DOM tree that custom elements render into and project
//! light-DOM content through. Nodes are addressed by [`NodeId`] handles;
//! moving a node never changes its identity.

mod attributes;
mod classlist;
mod css_scope;
mod document;
mod error;
mod events;
mod interner;
mod node;
mod observer;
pub mod serialize;
mod tree;

use std::fmt;

pub use attributes::{Attr, AttributeMap};
pub use classlist::ClassList;
pub use css_scope::{ScopedRule, ScopedSelector, ScopedStyleSheet};
pub use document::Document;
pub use error::{DomError, DomResult};
pub use events::{Event, EventListeners, Listener, ListenerId};
pub use interner::{InternedString, StringInterner};
pub use node::{ElementData, Node, NodeData, NodeType};
pub use observer::{MutationKind, MutationRecord};
pub use tree::{Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#none")
        }
    }
}
