//! Element errors

use uswds_dom::{DomError, NodeId};

use crate::BehaviorError;

/// Result type for element operations
pub type ElementResult<T> = Result<T, ElementError>;

/// Errors surfaced by hosts and the runtime
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    /// Field name not in the component's field table
    #[error("<{tag}> has no field named `{field}`")]
    UnknownField { tag: String, field: String },

    /// Value of the wrong kind for a field (text for a boolean, ...)
    #[error("<{tag}> field `{field}` expects a {expected} value")]
    FieldType {
        tag: String,
        field: String,
        expected: &'static str,
    },

    /// Rendered structure and slot table disagree
    #[error("<{tag}> {host}: projection target `{target}` for slot `{slot}` is missing after render")]
    ProjectionTargetMissing {
        tag: String,
        host: NodeId,
        slot: String,
        target: String,
    },

    /// Node is not an upgraded custom element
    #[error("{0} is not a custom element host")]
    NotAHost(NodeId),

    /// Tag has no definition
    #[error("<{0}> is not defined")]
    Undefined(String),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Errors in a component definition, reported by `define`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("Invalid custom element name: {0}")]
    InvalidName(String),

    #[error("Custom element already defined: {0}")]
    AlreadyDefined(String),

    #[error("<{tag}> slot `{slot}` targets `{target}`, which the template does not declare")]
    UnknownTarget {
        tag: String,
        slot: String,
        target: String,
    },

    #[error("<{tag}> field `{field}` reflects to part `{part}`, which the template does not declare")]
    UnknownPart {
        tag: String,
        field: String,
        part: String,
    },

    #[error("<{tag}> field `{field}` has default `{default}` outside its allowed values")]
    InvalidDefault {
        tag: String,
        field: String,
        default: String,
    },

    #[error("<{tag}> structural field `{field}` is not in the field table")]
    UnknownStructuralField { tag: String, field: String },
}
