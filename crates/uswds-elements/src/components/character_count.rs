//! `<usa-character-count>`
//!
//! ```html
//! <usa-character-count maxlength="25">
//!   <label slot="label" class="usa-label" for="name">Full name</label>
//!   <input slot="input" class="usa-input" id="name">
//! </usa-character-count>
//! ```

use crate::{
    ComponentDefinition, ElementTemplate, FieldKind, FieldSpec, FieldStore, Reflect, SlotSpec,
    Template,
};

pub const TAG: &str = "usa-character-count";

pub static FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "maxlength",
    attribute: "maxlength",
    kind: FieldKind::Text { default: "" },
    reflect: Reflect::PartAttribute { part: "count", attribute: "data-maxlength" },
}];

// Label and input share the form group, in that order
pub static SLOTS: &[SlotSpec] = &[
    SlotSpec { name: "label", target: "field" },
    SlotSpec { name: "input", target: "field" },
];

fn template(_: &FieldStore) -> Template {
    Template::new(
        ElementTemplate::new("div")
            .class("usa-character-count")
            .part("count")
            .child(ElementTemplate::new("div").class("usa-form-group").target("field")),
    )
}

pub fn definition() -> ComponentDefinition {
    ComponentDefinition::new(TAG, template)
        .with_fields(FIELDS)
        .with_slots(SLOTS)
        .with_behavior("character-count")
}
