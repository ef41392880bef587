//! Behavior init tokens
//!
//! Each host carries an [`InitToken`] describing whether its behavior is
//! bound to the current rendered structure. The token also lives in the DOM
//! as an attribute on the bound root, so a structure that was replaced or
//! had its token stripped is recognizably unbound.
//!
//! ```text
//! Uninitialized --init ok--> Initialized --teardown--> TornDown
//!       |                        ^                        |
//!       +--init err--> Degraded  +--------init ok---------+
//! ```

use uswds_dom::{DomTree, NodeId};

use crate::behavior::invoke;
use crate::{Behavior, BehaviorError, TeardownCoordinator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Initialized,
    /// Init failed; structure stays inert until it changes or the host reconnects
    Degraded,
    TornDown,
}

/// Binding state of one host's behavior
#[derive(Debug, Clone)]
pub struct InitToken {
    state: InitState,
    root: NodeId,
    generation: u64,
    cycles: u32,
}

impl Default for InitToken {
    fn default() -> Self {
        Self::new()
    }
}

impl InitToken {
    pub fn new() -> Self {
        Self {
            state: InitState::Uninitialized,
            root: NodeId::NONE,
            generation: 0,
            cycles: 0,
        }
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    /// Root the behavior is (or last was) bound to
    pub fn bound_root(&self) -> Option<NodeId> {
        Some(self.root).filter(|r| r.is_valid())
    }

    /// Successful initializations so far
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub(crate) fn mark_initialized(&mut self, root: NodeId, generation: u64) {
        self.state = InitState::Initialized;
        self.root = root;
        self.generation = generation;
        self.cycles += 1;
    }

    pub(crate) fn mark_degraded(&mut self, root: NodeId, generation: u64) {
        self.state = InitState::Degraded;
        self.root = root;
        self.generation = generation;
    }

    pub(crate) fn mark_torn_down(&mut self) {
        self.state = InitState::TornDown;
    }

    fn matches(&self, root: NodeId, generation: u64) -> bool {
        self.root == root && self.generation == generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// Token present and current, init not called
    AlreadyInitialized,
    Initialized,
    /// Previous binding torn down first
    Reinitialized,
    /// Degraded for this structure, init not retried
    Skipped,
    Failed(BehaviorError),
}

/// Brings a host's behavior in line with its current structure
pub struct Reinitializer<'a> {
    behavior: &'a dyn Behavior,
    token_attribute: &'a str,
    tag: &'a str,
    host: NodeId,
}

impl<'a> Reinitializer<'a> {
    pub fn new(behavior: &'a dyn Behavior, token_attribute: &'a str, tag: &'a str, host: NodeId) -> Self {
        Self {
            behavior,
            token_attribute,
            tag,
            host,
        }
    }

    fn token_present(&self, tree: &DomTree, root: NodeId) -> bool {
        tree.get_attribute(root, self.token_attribute) == Some(self.behavior.name())
    }

    /// Initialize the behavior on `root` unless it is already bound there.
    ///
    /// `content_changed` marks a pass that altered what the behavior sees
    /// under `root` (projected nodes moved, part state rewritten). It
    /// invalidates a current binding and lets a degraded one retry.
    pub fn run(
        &self,
        token: &mut InitToken,
        tree: &mut DomTree,
        root: NodeId,
        generation: u64,
        content_changed: bool,
    ) -> InitOutcome {
        let mut rebinding = false;
        match token.state() {
            InitState::Initialized => {
                if !content_changed && token.matches(root, generation) && self.token_present(tree, root) {
                    return InitOutcome::AlreadyInitialized;
                }
                tracing::debug!(
                    tag = self.tag,
                    host = %self.host,
                    behavior = self.behavior.name(),
                    "binding is stale, tearing down before init"
                );
                TeardownCoordinator::new(self.behavior, self.token_attribute, self.tag, self.host).run(token, tree);
                rebinding = true;
            }
            InitState::Degraded => {
                if !content_changed && token.matches(root, generation) {
                    return InitOutcome::Skipped;
                }
                // Clear whatever the failed attempt left behind
                TeardownCoordinator::new(self.behavior, self.token_attribute, self.tag, self.host).run(token, tree);
            }
            _ => {}
        }

        let behavior = self.behavior;
        match invoke(behavior, || behavior.init(tree, root)) {
            Ok(()) => {
                if let Err(err) = tree.set_attribute(root, self.token_attribute, behavior.name()) {
                    tracing::warn!(tag = self.tag, host = %self.host, error = %err, "could not write init token");
                }
                token.mark_initialized(root, generation);
                tracing::debug!(tag = self.tag, host = %self.host, behavior = behavior.name(), %root, "behavior initialized");
                if rebinding {
                    InitOutcome::Reinitialized
                } else {
                    InitOutcome::Initialized
                }
            }
            Err(err) => {
                tracing::error!(
                    tag = self.tag,
                    host = %self.host,
                    behavior = behavior.name(),
                    error = %err,
                    "behavior init failed, component left without interactivity"
                );
                token.mark_degraded(root, generation);
                InitOutcome::Failed(err)
            }
        }
    }
}
