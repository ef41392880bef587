//! Runtime configuration
//!
//! Loaded from JSON; every key is optional.
//!
//! ```json
//! { "diagnostics": "lenient", "init_token_attribute": "data-uswds-init" }
//! ```

use std::path::Path;

use serde::Deserialize;

/// How internal-consistency failures surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsMode {
    /// Return the error from the update cycle
    Strict,
    /// Log with full context and keep content visible
    Lenient,
}

impl Default for DiagnosticsMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Element runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ElementsConfig {
    pub diagnostics: DiagnosticsMode,
    /// Attribute recording which behavior is bound to a rendered structure
    pub init_token_attribute: String,
    /// Attribute carrying a host's style scope id
    pub host_scope_attribute: String,
    /// Projection marker on light-DOM children
    pub slot_attribute: String,
    /// Default `tracing` filter for binaries
    pub log_filter: String,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        Self {
            diagnostics: DiagnosticsMode::default(),
            init_token_attribute: "data-uswds-init".to_string(),
            host_scope_attribute: "data-uswds-host".to_string(),
            slot_attribute: "slot".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl ElementsConfig {
    /// Parse from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Same configuration with a different diagnostics mode
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsMode) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
