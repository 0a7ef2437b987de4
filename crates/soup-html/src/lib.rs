//! soup HTML Parser
//!
//! HTML5 parsing built on html5ever, converted into a [`soup_dom::DomTree`],
//! and the matching serializer.

mod parser;
mod serializer;

pub use parser::{HtmlParser, ParseOptions};
pub use serializer::HtmlSerializer;

use soup_dom::{DomTree, NodeId};

/// Parse an HTML string with default options
pub fn parse(html: &str) -> DomTree {
    HtmlParser::new().parse(html)
}

/// Serialize one node and its subtree (outer HTML)
pub fn serialize(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_node(tree, node)
}

/// Serialize a whole document
pub fn serialize_document(tree: &DomTree) -> String {
    HtmlSerializer::new().serialize_document(tree)
}
