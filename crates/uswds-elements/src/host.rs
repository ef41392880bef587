//! Host elements
//!
//! A [`HostElement`] is the per-instance state behind one upgraded custom
//! element: typed fields, the rendered structure, what is projected where,
//! and the behavior's init token. The runtime drives it through four hooks:
//! `connected`, `attribute_changed` / `set_field`, `update` and
//! `disconnected`.
//!
//! An update runs in a fixed order: render the structure if it is missing
//! or invalidated (tearing the behavior down first), write fields onto the
//! parts, project slotted children, adopt the suppression sheet, and only
//! then initialize the behavior. A pass that moved projected nodes or
//! rewrote a part rebinds the behavior so it sees the new content.

use std::fmt;
use std::rc::Rc;

use uswds_dom::{Document, DomTree, NodeId, ScopedSelector, ScopedStyleSheet};

use crate::{
    Assignment, Behavior, ComponentDefinition, Diagnostic, DiagnosticsMode, ElementError,
    ElementResult, ElementsConfig, FieldSpec, FieldStore, FieldValue, InitOutcome, InitState,
    InitToken, ProjectedSet, ProjectionReport, Reinitializer, RenderedStructure, SlotProjector,
    TeardownCoordinator, TeardownOutcome,
};

/// What one update cycle did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// A fresh structure was rendered
    pub rebuilt: bool,
    pub projection: ProjectionReport,
    /// `None` for components without a behavior
    pub init: Option<InitOutcome>,
}

pub struct HostElement {
    id: NodeId,
    definition: Rc<ComponentDefinition>,
    behavior: Option<Rc<dyn Behavior>>,
    fields: FieldStore,
    structure: Option<RenderedStructure>,
    structure_dirty: bool,
    /// A part write changed DOM state the behavior read at init
    binding_stale: bool,
    generation: u64,
    projected: ProjectedSet,
    token: InitToken,
    connected: bool,
    diagnostics: Vec<Diagnostic>,
}

impl HostElement {
    pub fn new(id: NodeId, definition: Rc<ComponentDefinition>, behavior: Option<Rc<dyn Behavior>>) -> Self {
        let fields = FieldStore::new(&definition.tag, definition.fields);
        Self {
            id,
            definition,
            behavior,
            fields,
            structure: None,
            structure_dirty: false,
            binding_stale: false,
            generation: 0,
            projected: ProjectedSet::default(),
            token: InitToken::new(),
            connected: false,
            diagnostics: Vec::new(),
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.definition.tag
    }

    pub fn definition(&self) -> &ComponentDefinition {
        &self.definition
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn structure(&self) -> Option<&RenderedStructure> {
        self.structure.as_ref()
    }

    /// Root of the current rendered structure
    pub fn container(&self) -> Option<NodeId> {
        self.structure.as_ref().map(RenderedStructure::container)
    }

    pub fn projected(&self) -> &ProjectedSet {
        &self.projected
    }

    pub fn init_state(&self) -> InitState {
        self.token.state()
    }

    pub fn init_cycles(&self) -> u32 {
        self.token.cycles()
    }

    /// Incremented on every render
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Scope id used by this host's suppression sheet
    pub fn scope_id(&self) -> u32 {
        self.id.index() as u32
    }

    /// Force a fresh structure on the next update
    pub fn invalidate_structure(&mut self) {
        self.structure_dirty = true;
    }

    // --- Hooks ---

    /// Host entered the document: stamp the scope and read authored attributes
    pub fn connected(&mut self, document: &mut Document, config: &ElementsConfig) -> ElementResult<()> {
        if self.connected {
            return Ok(());
        }
        self.connected = true;

        let tree = document.tree_mut();
        let scope = self.scope_id().to_string();
        if tree.get_attribute(self.id, &config.host_scope_attribute) != Some(scope.as_str()) {
            tree.set_attribute(self.id, &config.host_scope_attribute, &scope)?;
        }

        let fields = self.definition.fields;
        for spec in fields {
            let raw = tree.get_attribute(self.id, spec.attribute).map(str::to_string);
            self.apply_attribute(tree, spec, raw.as_deref())?;
        }
        tracing::debug!(tag = %self.definition.tag, host = %self.id, "connected");
        Ok(())
    }

    /// Observed attribute changed. Returns false for attributes not in the field table.
    pub fn attribute_changed(&mut self, tree: &mut DomTree, name: &str, value: Option<&str>) -> ElementResult<bool> {
        let Some(spec) = self.fields.spec_for_attribute(name) else {
            return Ok(false);
        };
        self.apply_attribute(tree, spec, value)?;
        Ok(true)
    }

    /// Typed property assignment
    pub fn set_field(&mut self, tree: &mut DomTree, name: &str, value: FieldValue) -> ElementResult<()> {
        let assignment = self.fields.assign(name, value)?;
        self.apply(tree, assignment, true)
    }

    fn apply_attribute(&mut self, tree: &mut DomTree, spec: &'static FieldSpec, raw: Option<&str>) -> ElementResult<()> {
        let assignment = self.fields.decode(spec, raw);
        // A rejected attribute value is overwritten with the default it fell back to
        let reflect_host = assignment.warning.is_some();
        self.apply(tree, assignment, reflect_host)
    }

    fn apply(&mut self, tree: &mut DomTree, assignment: Assignment, reflect_host: bool) -> ElementResult<()> {
        if let Some(warning) = assignment.warning {
            tracing::warn!(tag = %self.definition.tag, host = %self.id, "{warning}");
            self.diagnostics.push(warning);
        }
        let spec = assignment.spec;
        if reflect_host {
            spec.write_host(tree, self.id, &assignment.value)?;
        }
        // Without a structure yet the part write happens right after render
        let part = spec.part().and_then(|p| self.structure.as_ref()?.part(p));
        if let Some(part) = part {
            if spec.write_part(tree, part, &assignment.value)? && self.behavior.is_some() {
                self.binding_stale = true;
            }
        }
        if assignment.changed && self.definition.is_structural(spec.name) {
            self.structure_dirty = true;
        }
        Ok(())
    }

    /// Run one update cycle
    pub fn update(&mut self, document: &mut Document, config: &ElementsConfig) -> ElementResult<UpdateReport> {
        let mut report = UpdateReport::default();
        if !self.connected {
            tracing::trace!(tag = %self.definition.tag, host = %self.id, "update skipped, not connected");
            return Ok(report);
        }

        let stale_container = if self.structure.is_none() || self.structure_dirty {
            report.rebuilt = true;
            self.render(document.tree_mut(), config)?
        } else {
            None
        };
        let Some(structure) = self.structure.clone() else {
            return Ok(report);
        };

        let tree = document.tree_mut();
        let projection = SlotProjector::new(self.definition.slots, &config.slot_attribute).project(
            tree,
            self.id,
            &structure,
            &self.projected,
        )?;
        if let Some(stale) = stale_container {
            tree.detach(stale);
        }
        self.projected = projection.projected.clone();

        document.adopt_style_sheet(self.suppression_sheet(config, &projection.resolved_slots));

        for missing in &projection.missing {
            match config.diagnostics {
                DiagnosticsMode::Strict => {
                    return Err(ElementError::ProjectionTargetMissing {
                        tag: self.definition.tag.clone(),
                        host: self.id,
                        slot: missing.slot.to_string(),
                        target: missing.target.to_string(),
                    });
                }
                DiagnosticsMode::Lenient => {
                    tracing::error!(
                        tag = %self.definition.tag,
                        host = %self.id,
                        slot = missing.slot,
                        target = missing.target,
                        "projection target missing, slot content left in place"
                    );
                    self.diagnostics.push(Diagnostic::ProjectionTargetMissing {
                        slot: missing.slot.to_string(),
                        target: missing.target.to_string(),
                    });
                }
            }
        }

        let content_changed = !projection.is_unchanged() || std::mem::take(&mut self.binding_stale);
        if let Some(behavior) = self.behavior.clone() {
            let outcome = Reinitializer::new(behavior.as_ref(), &config.init_token_attribute, &self.definition.tag, self.id)
                .run(
                    &mut self.token,
                    document.tree_mut(),
                    structure.container(),
                    self.generation,
                    content_changed,
                );
            if let InitOutcome::Failed(err) = &outcome {
                self.diagnostics.push(Diagnostic::InitFailed {
                    behavior: behavior.name().to_string(),
                    message: err.to_string(),
                });
            }
            report.init = Some(outcome);
        }

        report.projection = projection;
        Ok(report)
    }

    /// Host left the document
    pub fn disconnected(&mut self, document: &mut Document, config: &ElementsConfig) -> Option<TeardownOutcome> {
        let outcome = self.release_behavior(document.tree_mut(), config);
        document.remove_style_sheet(self.scope_id());
        self.connected = false;
        tracing::debug!(tag = %self.definition.tag, host = %self.id, ?outcome, "disconnected");
        outcome
    }

    /// Render a fresh structure in place of the current one. Returns the
    /// container it replaces, still attached so projection can retain
    /// nodes from it.
    fn render(&mut self, tree: &mut DomTree, config: &ElementsConfig) -> ElementResult<Option<NodeId>> {
        self.release_behavior(tree, config);

        let structure = self.definition.template(&self.fields).render(tree)?;
        let stale = self
            .structure
            .as_ref()
            .map(RenderedStructure::container)
            .filter(|&c| tree.parent(c) == Some(self.id));
        tree.insert_before(self.id, structure.container(), stale)?;

        for (spec, value) in self.fields.iter() {
            if let Some(part) = spec.part().and_then(|p| structure.part(p)) {
                spec.write_part(tree, part, value)?;
            }
        }

        self.structure = Some(structure);
        self.structure_dirty = false;
        self.generation += 1;
        tracing::debug!(
            tag = %self.definition.tag,
            host = %self.id,
            generation = self.generation,
            "rendered structure"
        );
        Ok(stale)
    }

    fn release_behavior(&mut self, tree: &mut DomTree, config: &ElementsConfig) -> Option<TeardownOutcome> {
        let behavior = self.behavior.clone()?;
        let outcome = TeardownCoordinator::new(behavior.as_ref(), &config.init_token_attribute, &self.definition.tag, self.id)
            .run(&mut self.token, tree);
        if let TeardownOutcome::Failed(err) = &outcome {
            self.diagnostics.push(Diagnostic::TeardownFailed {
                behavior: behavior.name().to_string(),
                message: err.to_string(),
            });
        }
        Some(outcome)
    }

    /// Hide marked direct children whose slot was projected
    fn suppression_sheet(&self, config: &ElementsConfig, slots: &[&str]) -> ScopedStyleSheet {
        let mut sheet = ScopedStyleSheet::new(self.scope_id(), self.id, config.host_scope_attribute.clone());
        for slot in slots {
            sheet.add_rule(
                ScopedSelector::HostChild {
                    attribute: config.slot_attribute.clone(),
                    value: Some(slot.to_string()),
                },
                &[("display", "none")],
            );
        }
        sheet
    }
}

impl fmt::Debug for HostElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostElement")
            .field("id", &self.id)
            .field("tag", &self.definition.tag)
            .field("behavior", &self.behavior.as_ref().map(|b| b.name().to_string()))
            .field("generation", &self.generation)
            .field("init_state", &self.token.state())
            .field("connected", &self.connected)
            .finish()
    }
}
