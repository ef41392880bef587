//! USWDS HTML Parser
//!
//! Turns consumer markup (pages that use `usa-*` elements with slotted
//! children) into a [`uswds_dom::Document`], using html5ever for tokenizing
//! and tree construction.

mod parser;

pub use parser::HtmlParser;

use uswds_dom::{Document, NodeId};

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse markup and append the resulting body content under `parent`
pub fn append_html(document: &mut Document, parent: NodeId, html: &str) -> Result<Vec<NodeId>, ParseError> {
    HtmlParser::new().append_into(document, parent, html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build DOM: {0}")]
    Dom(#[from] uswds_dom::DomError),
}
