//! DOM Events
//!
//! Event listener registry with bubbling dispatch. Listeners are shared
//! closures so a dispatch can hand the tree back to them mutably.

use std::fmt;
use std::rc::Rc;

use crate::{DomTree, NodeId};

/// Event listener callback
pub type Listener = Rc<dyn Fn(&mut DomTree, &Event)>;

/// Handle returned by `add_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Dispatched event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub target: NodeId,
    pub current_target: NodeId,
}

struct Registration {
    id: ListenerId,
    node: NodeId,
    event_type: String,
    listener: Listener,
}

/// Listener registry owned by the tree
#[derive(Default)]
pub struct EventListeners {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl EventListeners {
    /// Register a listener
    pub fn add(&mut self, node: NodeId, event_type: &str, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.registrations.push(Registration {
            id,
            node,
            event_type: event_type.to_string(),
            listener,
        });
        id
    }

    /// Unregister a listener, returns whether it was registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        before != self.registrations.len()
    }

    /// Listeners registered on a node
    pub fn count_for(&self, node: NodeId) -> usize {
        self.registrations.iter().filter(|r| r.node == node).count()
    }

    /// Total registered listeners
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Listeners for a node and event type, in registration order
    pub fn matching(&self, node: NodeId, event_type: &str) -> Vec<Listener> {
        self.registrations
            .iter()
            .filter(|r| r.node == node && r.event_type == event_type)
            .map(|r| Rc::clone(&r.listener))
            .collect()
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("next_id", &self.next_id)
            .field("registered", &self.registrations.len())
            .finish()
    }
}
