//! `<usa-combo-box>`
//!
//! ```html
//! <usa-combo-box placeholder="Pick one">
//!   <label slot="label" class="usa-label" for="fruit">Fruit</label>
//!   <select slot="select" class="usa-select" id="fruit">...</select>
//! </usa-combo-box>
//! ```
//!
//! The behavior generates its input and list inside `.usa-combo-box`,
//! after the select wrapper.

use crate::{
    BoolEncoding, ComponentDefinition, ElementTemplate, FieldKind, FieldSpec, FieldStore, Reflect,
    SlotSpec, Template,
};

pub const TAG: &str = "usa-combo-box";

pub static FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "disableFiltering",
        attribute: "disable-filtering",
        kind: FieldKind::Boolean { encoding: BoolEncoding::TrueFalse },
        reflect: Reflect::PartAttribute { part: "combo", attribute: "data-disable-filtering" },
    },
    FieldSpec {
        name: "placeholder",
        attribute: "placeholder",
        kind: FieldKind::Text { default: "" },
        reflect: Reflect::PartAttribute { part: "combo", attribute: "data-placeholder" },
    },
];

pub static SLOTS: &[SlotSpec] = &[
    SlotSpec { name: "label", target: "label" },
    SlotSpec { name: "select", target: "select" },
];

fn template(_: &FieldStore) -> Template {
    Template::new(
        ElementTemplate::new("div")
            .class("usa-form-group")
            .child(ElementTemplate::new("div").class("usa-combo-box__label").target("label"))
            .child(
                ElementTemplate::new("div")
                    .class("usa-combo-box")
                    .part("combo")
                    .child(ElementTemplate::new("div").class("usa-combo-box__select").target("select")),
            ),
    )
}

pub fn definition() -> ComponentDefinition {
    ComponentDefinition::new(TAG, template)
        .with_fields(FIELDS)
        .with_slots(SLOTS)
        .with_behavior("combo-box")
}
