//! Custom element registry
//!
//! Definitions keyed by tag name. `define` validates the name and the
//! definition's own tables before accepting it.

use std::collections::HashMap;
use std::rc::Rc;

use crate::{ComponentDefinition, DefinitionError};

#[derive(Debug, Default)]
pub struct CustomElementRegistry {
    definitions: HashMap<String, Rc<ComponentDefinition>>,
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a custom element
    pub fn define(&mut self, definition: ComponentDefinition) -> Result<Rc<ComponentDefinition>, DefinitionError> {
        if !Self::is_valid_name(&definition.tag) {
            return Err(DefinitionError::InvalidName(definition.tag));
        }
        if self.definitions.contains_key(&definition.tag) {
            return Err(DefinitionError::AlreadyDefined(definition.tag));
        }
        definition.validate()?;

        let definition = Rc::new(definition);
        self.definitions.insert(definition.tag.clone(), Rc::clone(&definition));
        tracing::debug!(tag = %definition.tag, "defined custom element");
        Ok(definition)
    }

    pub fn get(&self, tag: &str) -> Option<Rc<ComponentDefinition>> {
        self.definitions.get(tag).cloned()
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.definitions.contains_key(tag)
    }

    /// Defined tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Validate custom element name
    pub fn is_valid_name(name: &str) -> bool {
        // Must contain hyphen
        if !name.contains('-') {
            return false;
        }

        // Must start with lowercase letter
        if !name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
            return false;
        }

        const RESERVED: &[&str] = &[
            "annotation-xml", "color-profile", "font-face",
            "font-face-src", "font-face-uri", "font-face-format",
            "font-face-name", "missing-glyph",
        ];
        if RESERVED.contains(&name) {
            return false;
        }

        name.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' || c == '.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components;

    #[test]
    fn test_valid_names() {
        assert!(CustomElementRegistry::is_valid_name("usa-alert"));
        assert!(CustomElementRegistry::is_valid_name("usa-combo-box"));
        assert!(!CustomElementRegistry::is_valid_name("alert"));
        assert!(!CustomElementRegistry::is_valid_name("Usa-alert"));
        assert!(!CustomElementRegistry::is_valid_name("usa-Alert"));
        assert!(!CustomElementRegistry::is_valid_name("font-face"));
    }

    #[test]
    fn test_define_twice() {
        let mut registry = CustomElementRegistry::new();
        registry.define(components::alert::definition()).unwrap();
        assert!(registry.is_defined("usa-alert"));
        assert_eq!(
            registry.define(components::alert::definition()).unwrap_err(),
            DefinitionError::AlreadyDefined("usa-alert".into())
        );
    }

    #[test]
    fn test_define_rejects_bad_name() {
        let mut registry = CustomElementRegistry::new();
        let mut definition = components::alert::definition();
        definition.tag = "alert".into();
        assert!(matches!(registry.define(definition), Err(DefinitionError::InvalidName(_))));
        assert!(registry.is_empty());
    }
}
