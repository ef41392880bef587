//! `<usa-accordion>`
//!
//! Items are heading/panel pairs marked `slot="item"`; the accordion
//! behavior wires each `.usa-accordion__button` to the panel named by its
//! `aria-controls`.
//!
//! ```html
//! <usa-accordion multiselectable>
//!   <h4 slot="item" class="usa-accordion__heading">
//!     <button class="usa-accordion__button" aria-expanded="true" aria-controls="a1">First</button>
//!   </h4>
//!   <div slot="item" id="a1" class="usa-accordion__content">...</div>
//! </usa-accordion>
//! ```

use crate::{
    BoolEncoding, ComponentDefinition, ElementTemplate, FieldKind, FieldSpec, FieldStore, Reflect,
    SlotSpec, Template,
};

pub const TAG: &str = "usa-accordion";

pub static FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "multiselectable",
        attribute: "multiselectable",
        kind: FieldKind::Boolean { encoding: BoolEncoding::Presence },
        reflect: Reflect::PartAttribute { part: "accordion", attribute: "data-allow-multiple" },
    },
    FieldSpec {
        name: "bordered",
        attribute: "bordered",
        kind: FieldKind::Boolean { encoding: BoolEncoding::Presence },
        reflect: Reflect::PartClass { part: "accordion", class: "usa-accordion--bordered" },
    },
];

pub static SLOTS: &[SlotSpec] = &[SlotSpec { name: "item", target: "items" }];

fn template(_: &FieldStore) -> Template {
    Template::new(
        ElementTemplate::new("div")
            .class("usa-accordion")
            .part("accordion")
            .target("items"),
    )
}

pub fn definition() -> ComponentDefinition {
    ComponentDefinition::new(TAG, template)
        .with_fields(FIELDS)
        .with_slots(SLOTS)
        .with_behavior("accordion")
}
