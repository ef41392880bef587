//! Element Attributes
//!
//! Attribute manipulation: get, set, remove, has, toggle.

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Attribute collection in insertion order
///
/// Elements rarely carry more than a handful of attributes, so lookups are
/// linear scans over a `Vec`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    attributes: Vec<Attr>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Get attribute value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set attribute, returning the previous value
    pub fn set(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name == name) {
            return Some(std::mem::replace(&mut attr.value, value.to_string()));
        }
        self.attributes.push(Attr::new(name, value));
        None
    }

    /// Remove attribute by name
    pub fn remove(&mut self, name: &str) -> Option<Attr> {
        let pos = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(pos))
    }

    /// Check if attribute exists
    pub fn has(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Toggle a boolean attribute, returns new presence
    pub fn toggle(&mut self, name: &str, force: Option<bool>) -> bool {
        let present = match force {
            Some(force) => force,
            None => !self.has(name),
        };
        if present {
            if !self.has(name) {
                self.set(name, "");
            }
        } else {
            self.remove(name);
        }
        present
    }

    /// Iterate over attributes
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_attribute() {
        let mut attrs = AttributeMap::new();
        assert_eq!(attrs.set("class", "usa-alert"), None);
        attrs.set("slot", "heading");

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("class"), Some("usa-alert"));
        assert_eq!(attrs.set("class", "usa-alert--slim"), Some("usa-alert".to_string()));
    }

    #[test]
    fn test_remove_attribute() {
        let mut attrs = AttributeMap::new();
        attrs.set("hidden", "");

        assert!(attrs.has("hidden"));
        assert!(attrs.remove("hidden").is_some());
        assert!(!attrs.has("hidden"));
        assert!(attrs.remove("hidden").is_none());
    }

    #[test]
    fn test_toggle_attribute() {
        let mut attrs = AttributeMap::new();

        assert!(attrs.toggle("data-allow-multiple", None));
        assert_eq!(attrs.get("data-allow-multiple"), Some(""));
        assert!(!attrs.toggle("data-allow-multiple", None));
        assert!(!attrs.toggle("data-allow-multiple", Some(false)));
        assert!(attrs.toggle("data-allow-multiple", Some(true)));
    }
}
