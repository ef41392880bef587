//! USWDS behavior interface
//!
//! A behavior is the interactive half of a USWDS component: it binds to a
//! rendered structure by reading the DOM (classes, `aria-*`, `data-*`) and
//! can be released again from the same root. Behaviors are looked up by
//! name in a [`BehaviorRegistry`] so hosts never depend on a concrete one.

use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Once;

use uswds_dom::{DomError, DomTree, NodeId};

use crate::behaviors::{AccordionBehavior, CharacterCountBehavior, ComboBoxBehavior};

/// Errors raised by a behavior's init or teardown
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BehaviorError {
    #[error("{behavior}: no element with id \"{id}\" for {attribute}")]
    MissingTarget {
        behavior: String,
        attribute: &'static str,
        id: String,
    },

    #[error("{behavior}: expected {expected} inside the component")]
    MissingElement {
        behavior: String,
        expected: &'static str,
    },

    #[error("{behavior}: {element} needs a valid `{attribute}` attribute")]
    MissingAttribute {
        behavior: String,
        element: &'static str,
        attribute: &'static str,
    },

    #[error("{behavior}: {message}")]
    Failed { behavior: String, message: String },

    #[error("{behavior} panicked: {message}")]
    Panicked { behavior: String, message: String },

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Interactive behavior bound to a rendered structure
pub trait Behavior {
    /// Registry key, also written as the init token value
    fn name(&self) -> &str;

    /// Bind to the structure under `root`
    fn init(&self, tree: &mut DomTree, root: NodeId) -> Result<(), BehaviorError>;

    /// Release everything `init` did under `root`
    fn teardown(&self, tree: &mut DomTree, root: NodeId) -> Result<(), BehaviorError>;
}

thread_local! {
    static CONTAINED: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Wrap the process panic hook once so panics raised inside [`invoke`] are
/// reported only through the returned error. Panics elsewhere still reach
/// the previous hook.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !in_behavior_call() {
                previous(info);
            }
        }));
    });
}

/// Whether the current thread is inside a behavior callback
fn in_behavior_call() -> bool {
    CONTAINED.with(Cell::get)
}

/// Run a behavior callback, turning a panic into [`BehaviorError::Panicked`]
pub(crate) fn invoke(
    behavior: &dyn Behavior,
    call: impl FnOnce() -> Result<(), BehaviorError>,
) -> Result<(), BehaviorError> {
    install_quiet_hook();
    let outer = CONTAINED.with(|c| c.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(call));
    CONTAINED.with(|c| c.set(outer));

    match result {
        Ok(result) => result,
        Err(payload) => Err(BehaviorError::Panicked {
            behavior: behavior.name().to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Behaviors by name
#[derive(Clone, Default)]
pub struct BehaviorRegistry {
    behaviors: HashMap<String, Rc<dyn Behavior>>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the bundled USWDS behaviors
    pub fn uswds() -> Self {
        let mut registry = Self::new();
        registry.register(Rc::new(AccordionBehavior::default()));
        registry.register(Rc::new(CharacterCountBehavior::default()));
        registry.register(Rc::new(ComboBoxBehavior::default()));
        registry
    }

    /// Register a behavior, replacing any previous one with the same name
    pub fn register(&mut self, behavior: Rc<dyn Behavior>) -> Option<Rc<dyn Behavior>> {
        self.behaviors.insert(behavior.name().to_string(), behavior)
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn Behavior>> {
        self.behaviors.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.behaviors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

impl fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.behaviors.keys().collect();
        names.sort();
        f.debug_struct("BehaviorRegistry").field("behaviors", &names).finish()
    }
}
