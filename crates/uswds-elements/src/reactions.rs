//! Deferred lifecycle reactions
//!
//! Insertions and attribute changes enqueue reactions instead of running
//! hooks inline; [`crate::Runtime::flush`] drains the queue. A reaction
//! already pending for the same host is not queued twice.

use std::collections::VecDeque;

use uswds_dom::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Host entered the document
    Connected(NodeId),
    /// Host needs an update cycle
    Update(NodeId),
}

impl Reaction {
    pub fn host(self) -> NodeId {
        match self {
            Self::Connected(id) | Self::Update(id) => id,
        }
    }
}

/// Pending reaction queue, processed in order
#[derive(Debug, Default)]
pub struct ReactionQueue {
    reactions: VecDeque<Reaction>,
}

impl ReactionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if an identical reaction is already pending
    pub fn enqueue(&mut self, reaction: Reaction) -> bool {
        if self.reactions.contains(&reaction) {
            return false;
        }
        self.reactions.push_back(reaction);
        true
    }

    pub fn pop(&mut self) -> Option<Reaction> {
        self.reactions.pop_front()
    }

    /// Drop everything pending for `host`
    pub fn discard(&mut self, host: NodeId) -> usize {
        let before = self.reactions.len();
        self.reactions.retain(|r| r.host() != host);
        before - self.reactions.len()
    }

    pub fn is_pending(&self, reaction: Reaction) -> bool {
        self.reactions.contains(&reaction)
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }
}
