//! Per-instance diagnostics
//!
//! Everything a host recovers from locally is logged through `tracing` and
//! also kept here, so callers (and tests) can inspect what a given instance
//! went through without a subscriber.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Enumerated field assigned a value outside its allowed set
    InvalidValue {
        field: &'static str,
        value: String,
        fallback: &'static str,
    },
    /// Projection target absent after render (lenient mode only)
    ProjectionTargetMissing { slot: String, target: String },
    /// Behavior init returned an error or panicked
    InitFailed { behavior: String, message: String },
    /// Behavior teardown returned an error or panicked
    TeardownFailed { behavior: String, message: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Self::InvalidValue { .. } => Severity::Warning,
            Self::ProjectionTargetMissing { .. }
            | Self::InitFailed { .. }
            | Self::TeardownFailed { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, value, fallback } => {
                write!(f, "invalid value \"{value}\" for `{field}`, using \"{fallback}\"")
            }
            Self::ProjectionTargetMissing { slot, target } => {
                write!(f, "projection target `{target}` for slot `{slot}` is missing")
            }
            Self::InitFailed { behavior, message } => {
                write!(f, "{behavior} init failed: {message}")
            }
            Self::TeardownFailed { behavior, message } => {
                write!(f, "{behavior} teardown failed: {message}")
            }
        }
    }
}
