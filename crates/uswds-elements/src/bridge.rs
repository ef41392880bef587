//! Attribute/Property Bridge
//!
//! Each component declares a static table of [`FieldSpec`]s. A field has a
//! consumer-facing attribute on the host and, optionally, a reflection onto
//! a part of the rendered USWDS structure (an attribute, a class, or a
//! modifier class) in whatever encoding the USWDS script reads. The USWDS
//! script only ever sees the DOM, so every write here is synchronous.

use uswds_dom::{DomResult, DomTree, NodeId};

use crate::{Diagnostic, ElementError, ElementResult};

/// DOM encoding of a boolean field on a part attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolEncoding {
    /// Attribute present with an empty value, absent when false
    Presence,
    /// `"true"` / `"false"`
    TrueFalse,
}

/// Value domain of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text {
        default: &'static str,
    },
    Boolean {
        encoding: BoolEncoding,
    },
    Enumerated {
        allowed: &'static [&'static str],
        default: &'static str,
    },
}

/// Where a field is written besides the host attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reflect {
    /// Host attribute only
    Host,
    /// Attribute on a template part
    PartAttribute {
        part: &'static str,
        attribute: &'static str,
    },
    /// Boolean as class presence on a template part
    PartClass {
        part: &'static str,
        class: &'static str,
    },
    /// Enumerated value as `{prefix}{value}` class on a template part
    PartModifier {
        part: &'static str,
        prefix: &'static str,
    },
}

/// One row of a component's field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Property name
    pub name: &'static str,
    /// Observed host attribute
    pub attribute: &'static str,
    pub kind: FieldKind,
    pub reflect: Reflect,
}

/// Typed field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl FieldSpec {
    /// Value of the field when its attribute is absent
    pub fn default_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Text { default } | FieldKind::Enumerated { default, .. } => {
                FieldValue::Text(default.to_string())
            }
            FieldKind::Boolean { .. } => FieldValue::Bool(false),
        }
    }

    /// Template part this field reflects onto, if any
    pub fn part(&self) -> Option<&'static str> {
        match self.reflect {
            Reflect::Host => None,
            Reflect::PartAttribute { part, .. }
            | Reflect::PartClass { part, .. }
            | Reflect::PartModifier { part, .. } => Some(part),
        }
    }

    /// Attribute value for a field value, `None` meaning "absent"
    fn encode(&self, value: &FieldValue) -> Option<String> {
        match (value, self.kind) {
            (FieldValue::Text(s), _) if s.is_empty() => None,
            (FieldValue::Text(s), _) => Some(s.clone()),
            (FieldValue::Bool(b), FieldKind::Boolean { encoding: BoolEncoding::TrueFalse }) => {
                Some(b.to_string())
            }
            (FieldValue::Bool(true), _) => Some(String::new()),
            (FieldValue::Bool(false), _) => None,
        }
    }

    /// Parse an attribute back into a typed value.
    ///
    /// Absent attributes map to the default. Enumerated values outside the
    /// allowed set map to the default and produce a warning.
    pub fn decode(&self, raw: Option<&str>) -> (FieldValue, Option<Diagnostic>) {
        match self.kind {
            FieldKind::Text { default } => (FieldValue::Text(raw.unwrap_or(default).to_string()), None),
            FieldKind::Boolean { encoding: BoolEncoding::Presence } => (FieldValue::Bool(raw.is_some()), None),
            FieldKind::Boolean { encoding: BoolEncoding::TrueFalse } => {
                (FieldValue::Bool(raw.is_some_and(|v| v != "false")), None)
            }
            FieldKind::Enumerated { .. } => match raw {
                None => (self.default_value(), None),
                Some(value) => self.normalize_enum(value),
            },
        }
    }

    fn normalize_enum(&self, value: &str) -> (FieldValue, Option<Diagnostic>) {
        let FieldKind::Enumerated { allowed, default } = self.kind else {
            return (FieldValue::Text(value.to_string()), None);
        };
        match allowed.iter().find(|a| a.eq_ignore_ascii_case(value.trim())) {
            Some(canonical) => (FieldValue::Text(canonical.to_string()), None),
            None => (
                FieldValue::Text(default.to_string()),
                Some(Diagnostic::InvalidValue {
                    field: self.name,
                    value: value.to_string(),
                    fallback: default,
                }),
            ),
        }
    }

    /// Reflect onto the host attribute. Returns whether the DOM changed.
    pub fn write_host(&self, tree: &mut DomTree, host: NodeId, value: &FieldValue) -> DomResult<bool> {
        let encoded = match (self.kind, value) {
            // Host booleans always use presence, whatever the part encoding
            (FieldKind::Boolean { .. }, FieldValue::Bool(b)) => b.then(String::new),
            _ => self.encode(value),
        };
        set_or_remove(tree, host, self.attribute, encoded.as_deref())
    }

    /// Reflect onto the field's part. Returns whether the DOM changed.
    pub fn write_part(&self, tree: &mut DomTree, part: NodeId, value: &FieldValue) -> DomResult<bool> {
        match self.reflect {
            Reflect::Host => Ok(false),
            Reflect::PartAttribute { attribute, .. } => {
                set_or_remove(tree, part, attribute, self.encode(value).as_deref())
            }
            Reflect::PartClass { class, .. } => {
                let on = match value {
                    FieldValue::Bool(b) => *b,
                    FieldValue::Text(s) => !s.is_empty(),
                };
                if on {
                    tree.add_class(part, class)
                } else {
                    tree.remove_class(part, class)
                }
            }
            Reflect::PartModifier { prefix, .. } => {
                let current = value.as_text().unwrap_or("");
                let mut changed = false;
                if let FieldKind::Enumerated { allowed, .. } = self.kind {
                    for other in allowed.iter().filter(|a| **a != current) {
                        changed |= tree.remove_class(part, &format!("{prefix}{other}"))?;
                    }
                }
                if !current.is_empty() {
                    changed |= tree.add_class(part, &format!("{prefix}{current}"))?;
                }
                Ok(changed)
            }
        }
    }
}

fn set_or_remove(tree: &mut DomTree, node: NodeId, attribute: &str, value: Option<&str>) -> DomResult<bool> {
    if tree.get_attribute(node, attribute) == value {
        return Ok(false);
    }
    match value {
        Some(value) => tree.set_attribute(node, attribute, value)?,
        None => {
            tree.remove_attribute(node, attribute);
        }
    }
    Ok(true)
}

/// Result of assigning or decoding one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub spec: &'static FieldSpec,
    pub value: FieldValue,
    /// Whether the stored value differs from before
    pub changed: bool,
    pub warning: Option<Diagnostic>,
}

/// Typed field values of one host
#[derive(Debug, Clone)]
pub struct FieldStore {
    tag: String,
    fields: &'static [FieldSpec],
    values: Vec<FieldValue>,
}

impl FieldStore {
    /// Store holding every field's default
    pub fn new(tag: &str, fields: &'static [FieldSpec]) -> Self {
        Self {
            tag: tag.to_string(),
            fields,
            values: fields.iter().map(FieldSpec::default_value).collect(),
        }
    }

    pub fn spec(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn spec_for_attribute(&self, attribute: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.attribute == attribute)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        let idx = self.fields.iter().position(|f| f.name == name)?;
        self.values.get(idx)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_text()
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    /// Fields paired with their current values
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &FieldValue)> {
        self.fields.iter().zip(self.values.iter())
    }

    /// Assign a typed value (property path)
    pub fn assign(&mut self, name: &str, value: FieldValue) -> ElementResult<Assignment> {
        let spec = self.spec(name).ok_or_else(|| ElementError::UnknownField {
            tag: self.tag.clone(),
            field: name.to_string(),
        })?;

        let (value, warning) = match (spec.kind, value) {
            (FieldKind::Text { .. }, FieldValue::Text(s)) => (FieldValue::Text(s), None),
            (FieldKind::Boolean { .. }, FieldValue::Bool(b)) => (FieldValue::Bool(b), None),
            (FieldKind::Enumerated { .. }, FieldValue::Text(s)) => spec.normalize_enum(&s),
            (kind, _) => {
                return Err(ElementError::FieldType {
                    tag: self.tag.clone(),
                    field: name.to_string(),
                    expected: match kind {
                        FieldKind::Boolean { .. } => "boolean",
                        _ => "text",
                    },
                });
            }
        };
        Ok(self.store(spec, value, warning))
    }

    /// Decode an observed attribute (attribute path)
    pub fn decode(&mut self, spec: &'static FieldSpec, raw: Option<&str>) -> Assignment {
        let (value, warning) = spec.decode(raw);
        self.store(spec, value, warning)
    }

    fn store(&mut self, spec: &'static FieldSpec, value: FieldValue, warning: Option<Diagnostic>) -> Assignment {
        let idx = self.fields.iter().position(|f| f.name == spec.name);
        let changed = match idx.and_then(|i| self.values.get_mut(i)) {
            Some(slot) if *slot != value => {
                *slot = value.clone();
                true
            }
            _ => false,
        };
        Assignment {
            spec,
            value,
            changed,
            warning,
        }
    }
}
