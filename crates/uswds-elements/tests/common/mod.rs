//! Shared fixtures: runtime builders and behavior test doubles

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use uswds_dom::{DomTree, NodeId};
use uswds_elements::{
    Behavior, BehaviorError, ComponentDefinition, DiagnosticsMode, ElementTemplate, ElementsConfig,
    FieldStore, Runtime, SlotSpec, Template,
};

pub fn config(mode: DiagnosticsMode) -> ElementsConfig {
    ElementsConfig::default().with_diagnostics(mode)
}

/// Runtime over parsed markup with the bundled components, strict mode
pub fn uswds(html: &str) -> Runtime {
    uswds_with(html, DiagnosticsMode::Strict)
}

pub fn uswds_with(html: &str, mode: DiagnosticsMode) -> Runtime {
    let document = uswds_html::parse(html).expect("fixture markup parses");
    Runtime::uswds(document, config(mode)).expect("bundled definitions are valid")
}

/// First element with `tag` in the document
pub fn first(runtime: &Runtime, tag: &str) -> NodeId {
    runtime.tree().elements_by_tag(NodeId::ROOT, tag)[0]
}

pub fn by_id(runtime: &Runtime, id: &str) -> NodeId {
    runtime.document().get_element_by_id(id).expect("fixture id exists")
}

/// Elements whose text content equals `text`, excluding ancestors that
/// merely contain it
pub fn copies_of(tree: &DomTree, text: &str) -> usize {
    tree.find_all(NodeId::ROOT, |tree, n| {
        tree.is_element(n)
            && tree.text_content(n) == text
            && tree.element_children(n).is_empty()
    })
    .len()
}

// ============================================================================
// TEST DOUBLES
// ============================================================================

/// Records calls and which roots are currently bound
#[derive(Default)]
pub struct CountingBehavior {
    pub inits: Cell<u32>,
    pub teardowns: Cell<u32>,
    pub active: RefCell<HashSet<NodeId>>,
}

impl CountingBehavior {
    pub fn active_bindings(&self) -> usize {
        self.active.borrow().len()
    }
}

impl Behavior for CountingBehavior {
    fn name(&self) -> &str {
        "sample"
    }

    fn init(&self, tree: &mut DomTree, root: NodeId) -> Result<(), BehaviorError> {
        self.inits.set(self.inits.get() + 1);
        // Generated marker beside the target, one per binding
        let marker = tree.create_element("span");
        tree.set_attribute(marker, "class", "sample-generated")?;
        tree.append_child(root, marker)?;
        self.active.borrow_mut().insert(root);
        Ok(())
    }

    fn teardown(&self, tree: &mut DomTree, root: NodeId) -> Result<(), BehaviorError> {
        self.teardowns.set(self.teardowns.get() + 1);
        for marker in tree.elements_by_class(root, "sample-generated") {
            tree.detach(marker);
        }
        self.active.borrow_mut().remove(&root);
        Ok(())
    }
}

/// Init always returns an error
pub struct FailingBehavior;

impl Behavior for FailingBehavior {
    fn name(&self) -> &str {
        "sample"
    }

    fn init(&self, _tree: &mut DomTree, _root: NodeId) -> Result<(), BehaviorError> {
        Err(BehaviorError::Failed {
            behavior: "sample".into(),
            message: "third-party script rejected the markup".into(),
        })
    }

    fn teardown(&self, _tree: &mut DomTree, _root: NodeId) -> Result<(), BehaviorError> {
        Ok(())
    }
}

/// Init and teardown panic
pub struct PanickingBehavior;

impl Behavior for PanickingBehavior {
    fn name(&self) -> &str {
        "sample"
    }

    fn init(&self, _tree: &mut DomTree, _root: NodeId) -> Result<(), BehaviorError> {
        panic!("sample init exploded");
    }

    fn teardown(&self, _tree: &mut DomTree, _root: NodeId) -> Result<(), BehaviorError> {
        panic!("sample teardown exploded");
    }
}

// ============================================================================
// SAMPLE COMPONENT
// ============================================================================

pub static SAMPLE_SLOTS: &[SlotSpec] = &[SlotSpec { name: "body", target: "body" }];

fn sample_template(_: &FieldStore) -> Template {
    Template::new(
        ElementTemplate::new("div")
            .class("sample")
            .child(ElementTemplate::new("div").class("sample__body").target("body").text("Nothing to show")),
    )
}

pub fn sample_definition() -> ComponentDefinition {
    ComponentDefinition::new("usa-sample", sample_template)
        .with_slots(SAMPLE_SLOTS)
        .with_behavior("sample")
}

/// Runtime with only `<usa-sample>` defined, bound to `behavior`
pub fn sample_runtime(html: &str, behavior: Rc<dyn Behavior>, mode: DiagnosticsMode) -> Runtime {
    let document = uswds_html::parse(html).expect("fixture markup parses");
    let mut runtime = Runtime::with_document(document, config(mode));
    runtime.register_behavior(behavior);
    runtime.define(sample_definition()).expect("sample definition is valid");
    runtime
}
