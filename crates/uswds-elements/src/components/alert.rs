//! `<usa-alert>`
//!
//! ```html
//! <usa-alert type="warning" slim>
//!   <span slot="heading">Heads up</span>
//!   <span slot="text">Your session expires soon.</span>
//! </usa-alert>
//! ```
//!
//! Static markup only; there is no alert behavior.

use crate::{
    BoolEncoding, ComponentDefinition, ElementTemplate, FieldKind, FieldSpec, FieldStore, Reflect,
    SlotSpec, Template,
};

pub const TAG: &str = "usa-alert";

const HEADING_LEVELS: &[&str] = &["h2", "h3", "h4", "h5", "h6"];

pub static FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "type",
        attribute: "type",
        kind: FieldKind::Enumerated {
            allowed: &["info", "warning", "error", "success", "emergency"],
            default: "info",
        },
        reflect: Reflect::PartModifier { part: "alert", prefix: "usa-alert--" },
    },
    FieldSpec {
        name: "slim",
        attribute: "slim",
        kind: FieldKind::Boolean { encoding: BoolEncoding::Presence },
        reflect: Reflect::PartClass { part: "alert", class: "usa-alert--slim" },
    },
    FieldSpec {
        name: "noIcon",
        attribute: "no-icon",
        kind: FieldKind::Boolean { encoding: BoolEncoding::Presence },
        reflect: Reflect::PartClass { part: "alert", class: "usa-alert--no-icon" },
    },
    FieldSpec {
        name: "headingLevel",
        attribute: "heading-level",
        kind: FieldKind::Enumerated { allowed: HEADING_LEVELS, default: "h4" },
        reflect: Reflect::Host,
    },
];

pub static SLOTS: &[SlotSpec] = &[
    SlotSpec { name: "heading", target: "heading" },
    SlotSpec { name: "text", target: "text" },
];

fn template(fields: &FieldStore) -> Template {
    let level = fields.text("headingLevel").unwrap_or("h4");
    Template::new(
        ElementTemplate::new("div").class("usa-alert").part("alert").child(
            ElementTemplate::new("div")
                .class("usa-alert__body")
                .child(ElementTemplate::new(level).class("usa-alert__heading").target("heading"))
                .child(ElementTemplate::new("p").class("usa-alert__text").target("text")),
        ),
    )
}

pub fn definition() -> ComponentDefinition {
    ComponentDefinition::new(TAG, template)
        .with_fields(FIELDS)
        .with_slots(SLOTS)
        .with_structural_fields(&["headingLevel"])
}
