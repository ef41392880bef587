//! HTML serialization
//!
//! Produces markup for a subtree, following the HTML fragment
//! serialization rules for void elements and escaping.

use crate::{DomTree, NodeData, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Markup of `node` including the node itself
pub fn outer_html(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, node, &mut out);
    out
}

/// Markup of `node`'s children
pub fn inner_html(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    for child in tree.children(node) {
        write_node(tree, child, &mut out);
    }
    out
}

fn write_node(tree: &DomTree, node: NodeId, out: &mut String) {
    let Some(n) = tree.get(node) else {
        return;
    };
    match &n.data {
        NodeData::Document | NodeData::Fragment => {
            for child in tree.children(node) {
                write_node(tree, child, out);
            }
        }
        NodeData::Text(text) => escape_text(text, out),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Element(elem) => {
            let tag = tree.resolve(elem.name);
            out.push('<');
            out.push_str(tag);
            for attr in elem.attrs.iter() {
                out.push(' ');
                out.push_str(&attr.name);
                if !attr.value.is_empty() {
                    out.push_str("=\"");
                    escape_attr(&attr.value, out);
                    out.push('"');
                }
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag) {
                return;
            }
            for child in tree.children(node) {
                write_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}
