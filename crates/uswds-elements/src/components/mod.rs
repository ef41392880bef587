//! Bundled USWDS component definitions

pub mod accordion;
pub mod alert;
pub mod character_count;
pub mod combo_box;

use crate::ComponentDefinition;

/// Every bundled component
pub fn all() -> Vec<ComponentDefinition> {
    vec![
        alert::definition(),
        accordion::definition(),
        character_count::definition(),
        combo_box::definition(),
    ]
}
