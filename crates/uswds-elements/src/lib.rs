//! USWDS Elements
//!
//! Custom elements that render USWDS markup into the light DOM, project the
//! consumer's slotted children into it, and hand the result to the USWDS
//! behaviors, which only understand plain DOM.
//!
//! ```text
//! consumer markup ──upgrade──> HostElement
//!                                 │ update
//!                                 ├─ render template (parts, targets)
//!                                 ├─ bridge fields -> part attributes/classes
//!                                 ├─ project slotted children (one insert per target)
//!                                 ├─ adopt scoped suppression sheet
//!                                 └─ init behavior (token-guarded)
//! ```

mod behavior;
pub mod behaviors;
mod bridge;
pub mod components;
mod config;
mod definition;
mod diagnostics;
mod error;
mod host;
mod lifecycle;
mod projector;
mod reactions;
mod registry;
mod runtime;
mod teardown;
mod template;

pub use behavior::{Behavior, BehaviorError, BehaviorRegistry};
pub use bridge::{Assignment, BoolEncoding, FieldKind, FieldSpec, FieldStore, FieldValue, Reflect};
pub use config::{ConfigError, DiagnosticsMode, ElementsConfig};
pub use definition::{ComponentDefinition, TemplateFn};
pub use diagnostics::{Diagnostic, Severity};
pub use error::{DefinitionError, ElementError, ElementResult};
pub use host::{HostElement, UpdateReport};
pub use lifecycle::{InitOutcome, InitState, InitToken, Reinitializer};
pub use projector::{MissingTarget, ProjectedSet, ProjectionReport, SlotProjector, SlotSpec};
pub use reactions::{Reaction, ReactionQueue};
pub use registry::CustomElementRegistry;
pub use runtime::{FlushReport, Runtime};
pub use teardown::{TeardownCoordinator, TeardownOutcome};
pub use template::{ElementTemplate, RenderedStructure, Template, TemplateNode};
