//! Teardown coordination
//!
//! Removal can arrive before the deferred init ever ran, so teardown
//! checks the token first and only calls into the behavior when something
//! is actually bound.

use uswds_dom::{DomTree, NodeId};

use crate::behavior::invoke;
use crate::{Behavior, BehaviorError, InitState, InitToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// Never initialized, or already torn down
    NothingToTearDown,
    TornDown,
    /// Behavior teardown failed; the token is still cleared
    Failed(BehaviorError),
}

pub struct TeardownCoordinator<'a> {
    behavior: &'a dyn Behavior,
    token_attribute: &'a str,
    tag: &'a str,
    host: NodeId,
}

impl<'a> TeardownCoordinator<'a> {
    pub fn new(behavior: &'a dyn Behavior, token_attribute: &'a str, tag: &'a str, host: NodeId) -> Self {
        Self {
            behavior,
            token_attribute,
            tag,
            host,
        }
    }

    pub fn run(&self, token: &mut InitToken, tree: &mut DomTree) -> TeardownOutcome {
        let root = match (token.state(), token.bound_root()) {
            (InitState::Initialized | InitState::Degraded, Some(root)) => root,
            (state, _) => {
                tracing::trace!(tag = self.tag, host = %self.host, ?state, "nothing to tear down");
                return TeardownOutcome::NothingToTearDown;
            }
        };

        let behavior = self.behavior;
        let result = invoke(behavior, || behavior.teardown(tree, root));
        tree.remove_attribute(root, self.token_attribute);
        token.mark_torn_down();

        match result {
            Ok(()) => {
                tracing::debug!(tag = self.tag, host = %self.host, behavior = behavior.name(), "behavior torn down");
                TeardownOutcome::TornDown
            }
            Err(err) => {
                tracing::error!(
                    tag = self.tag,
                    host = %self.host,
                    behavior = behavior.name(),
                    error = %err,
                    "behavior teardown failed"
                );
                TeardownOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::Reinitializer;

    #[derive(Default)]
    struct Recorder {
        teardowns: Cell<u32>,
        panic_on_teardown: bool,
    }

    impl Behavior for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn init(&self, _tree: &mut DomTree, _root: NodeId) -> Result<(), BehaviorError> {
            Ok(())
        }

        fn teardown(&self, _tree: &mut DomTree, _root: NodeId) -> Result<(), BehaviorError> {
            self.teardowns.set(self.teardowns.get() + 1);
            if self.panic_on_teardown {
                panic!("teardown exploded");
            }
            Ok(())
        }
    }

    #[test]
    fn test_uninitialized_is_noop() {
        let mut tree = DomTree::new();
        let recorder = Recorder::default();
        let mut token = InitToken::new();
        let outcome = TeardownCoordinator::new(&recorder, "data-uswds-init", "usa-test", NodeId::ROOT)
            .run(&mut token, &mut tree);
        assert_eq!(outcome, TeardownOutcome::NothingToTearDown);
        assert_eq!(recorder.teardowns.get(), 0);
        assert_eq!(token.state(), InitState::Uninitialized);
    }

    #[test]
    fn test_teardown_once() {
        let mut tree = DomTree::new();
        let root = tree.create_element("div");
        let recorder = Recorder::default();
        let mut token = InitToken::new();
        Reinitializer::new(&recorder, "data-uswds-init", "usa-test", NodeId::ROOT)
            .run(&mut token, &mut tree, root, 1, false);

        let coordinator = TeardownCoordinator::new(&recorder, "data-uswds-init", "usa-test", NodeId::ROOT);
        assert_eq!(coordinator.run(&mut token, &mut tree), TeardownOutcome::TornDown);
        assert_eq!(coordinator.run(&mut token, &mut tree), TeardownOutcome::NothingToTearDown);
        assert_eq!(recorder.teardowns.get(), 1);
        assert!(!tree.has_attribute(root, "data-uswds-init"));
    }

    #[test]
    fn test_panicking_teardown_still_clears_token() {
        let mut tree = DomTree::new();
        let root = tree.create_element("div");
        let recorder = Recorder { panic_on_teardown: true, ..Default::default() };
        let mut token = InitToken::new();
        Reinitializer::new(&recorder, "data-uswds-init", "usa-test", NodeId::ROOT)
            .run(&mut token, &mut tree, root, 1, false);

        let outcome = TeardownCoordinator::new(&recorder, "data-uswds-init", "usa-test", NodeId::ROOT)
            .run(&mut token, &mut tree);
        assert!(matches!(outcome, TeardownOutcome::Failed(BehaviorError::Panicked { .. })));
        assert_eq!(token.state(), InitState::TornDown);
        assert!(!tree.has_attribute(root, "data-uswds-init"));
    }
}
