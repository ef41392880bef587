//! Component definitions

use crate::{DefinitionError, FieldKind, FieldSpec, FieldStore, SlotSpec, Template};

/// Builds the structure template from the current field values
pub type TemplateFn = fn(&FieldStore) -> Template;

/// Everything needed to upgrade one custom element tag
#[derive(Debug, Clone)]
pub struct ComponentDefinition {
    pub tag: String,
    pub fields: &'static [FieldSpec],
    pub slots: &'static [SlotSpec],
    pub template: TemplateFn,
    /// Behavior registry key
    pub behavior: Option<String>,
    /// Fields whose change requires a fresh structure
    pub structural_fields: &'static [&'static str],
}

impl ComponentDefinition {
    pub fn new(tag: &str, template: TemplateFn) -> Self {
        Self {
            tag: tag.to_string(),
            fields: &[],
            slots: &[],
            template,
            behavior: None,
            structural_fields: &[],
        }
    }

    pub fn with_fields(mut self, fields: &'static [FieldSpec]) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_slots(mut self, slots: &'static [SlotSpec]) -> Self {
        self.slots = slots;
        self
    }

    pub fn with_behavior(mut self, name: &str) -> Self {
        self.behavior = Some(name.to_string());
        self
    }

    pub fn with_structural_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.structural_fields = fields;
        self
    }

    /// Host attributes the element reacts to
    pub fn observed_attributes(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.attribute)
    }

    pub fn is_structural(&self, field: &str) -> bool {
        self.structural_fields.contains(&field)
    }

    /// Template for the given field values
    pub fn template(&self, fields: &FieldStore) -> Template {
        (self.template)(fields)
    }

    /// Check the tables against the default template
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let template = self.template(&FieldStore::new(&self.tag, self.fields));

        for slot in self.slots {
            if !template.declares_target(slot.target) {
                return Err(DefinitionError::UnknownTarget {
                    tag: self.tag.clone(),
                    slot: slot.name.to_string(),
                    target: slot.target.to_string(),
                });
            }
        }

        for field in self.fields {
            if let Some(part) = field.part() {
                if !template.declares_part(part) {
                    return Err(DefinitionError::UnknownPart {
                        tag: self.tag.clone(),
                        field: field.name.to_string(),
                        part: part.to_string(),
                    });
                }
            }
            if let FieldKind::Enumerated { allowed, default } = field.kind {
                if !allowed.contains(&default) {
                    return Err(DefinitionError::InvalidDefault {
                        tag: self.tag.clone(),
                        field: field.name.to_string(),
                        default: default.to_string(),
                    });
                }
            }
        }

        if let Some(field) = self
            .structural_fields
            .iter()
            .find(|name| !self.fields.iter().any(|f| f.name == **name))
        {
            return Err(DefinitionError::UnknownStructuralField {
                tag: self.tag.clone(),
                field: field.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementTemplate, Reflect};

    fn template(_: &FieldStore) -> Template {
        Template::new(ElementTemplate::new("div").part("box").child(ElementTemplate::new("p").target("body")))
    }

    static BAD_SLOTS: &[SlotSpec] = &[SlotSpec { name: "text", target: "missing" }];
    static BAD_PART: &[FieldSpec] = &[FieldSpec {
        name: "slim",
        attribute: "slim",
        kind: FieldKind::Boolean { encoding: crate::BoolEncoding::Presence },
        reflect: Reflect::PartClass { part: "nope", class: "x" },
    }];
    static BAD_DEFAULT: &[FieldSpec] = &[FieldSpec {
        name: "type",
        attribute: "type",
        kind: FieldKind::Enumerated { allowed: &["info"], default: "error" },
        reflect: Reflect::Host,
    }];

    #[test]
    fn test_validate() {
        let ok = ComponentDefinition::new("usa-box", template)
            .with_slots(&[SlotSpec { name: "text", target: "body" }]);
        assert!(ok.validate().is_ok());

        let err = ComponentDefinition::new("usa-box", template).with_slots(BAD_SLOTS).validate();
        assert!(matches!(err, Err(DefinitionError::UnknownTarget { .. })));

        let err = ComponentDefinition::new("usa-box", template).with_fields(BAD_PART).validate();
        assert!(matches!(err, Err(DefinitionError::UnknownPart { .. })));

        let err = ComponentDefinition::new("usa-box", template).with_fields(BAD_DEFAULT).validate();
        assert!(matches!(err, Err(DefinitionError::InvalidDefault { .. })));

        let err = ComponentDefinition::new("usa-box", template)
            .with_structural_fields(&["level"])
            .validate();
        assert!(matches!(err, Err(DefinitionError::UnknownStructuralField { .. })));
    }
}
