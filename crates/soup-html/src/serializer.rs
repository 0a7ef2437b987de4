//! HTML Serialization (outerHTML / whole document)
//!
//! Key features:
//! - Proper HTML escaping
//! - Void element handling
//! - Raw text elements emitted verbatim

use soup_dom::{DomTree, NodeData, NodeId};

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// HTML serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSerializer;

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize a node and its subtree
    pub fn serialize_node(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.write(tree, vec![Frame::Open(node_id)], &mut output);
        output
    }

    /// Serialize the children of a node (innerHTML)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.write(tree, child_frames(tree, node_id), &mut output);
        output
    }

    /// Serialize a whole document
    ///
    /// Top-level nodes are written one after another; a DOCTYPE is followed
    /// by a line break and the output ends with one.
    pub fn serialize_document(&self, tree: &DomTree) -> String {
        let mut output = String::new();
        for (child_id, child) in tree.children(tree.root()) {
            self.write(tree, vec![Frame::Open(child_id)], &mut output);
            if matches!(child.data, NodeData::Doctype { .. }) {
                output.push('\n');
            }
        }
        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }
        output
    }

    /// Drain a work stack; frames are popped from the end
    fn write<'t>(&self, tree: &'t DomTree, mut stack: Vec<Frame<'t>>, output: &mut String) {
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Open(node_id) => self.open(tree, node_id, &mut stack, output),
                Frame::Close(tag) => {
                    output.push_str("</");
                    output.push_str(tag);
                    output.push('>');
                }
            }
        }
    }

    /// Write the start of a node and schedule its children and end tag
    fn open<'t>(
        &self,
        tree: &'t DomTree,
        node_id: NodeId,
        stack: &mut Vec<Frame<'t>>,
        output: &mut String,
    ) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => stack.extend(child_frames(tree, node_id)),
            NodeData::Element(elem) => {
                let tag = tree.resolve(elem.name);

                output.push('<');
                output.push_str(tag);
                for attr in &elem.attrs {
                    output.push(' ');
                    output.push_str(tree.resolve(attr.name));
                    output.push_str("=\"");
                    escape_attribute(&attr.value, output);
                    output.push('"');
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }
                stack.push(Frame::Close(tag));
                if RAW_TEXT_ELEMENTS.contains(&tag) {
                    for (_, child) in tree.children(node_id) {
                        if let Some(text) = child.as_text() {
                            output.push_str(text);
                        }
                    }
                } else {
                    stack.extend(child_frames(tree, node_id));
                }
            }
            NodeData::Text(text) => escape_text(text, output),
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype {
                name,
                public_id,
                system_id,
            } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(tree.resolve(*name));
                if !public_id.is_empty() {
                    output.push_str(" PUBLIC \"");
                    output.push_str(public_id);
                    output.push('"');
                    if !system_id.is_empty() {
                        output.push_str(" \"");
                        output.push_str(system_id);
                        output.push('"');
                    }
                } else if !system_id.is_empty() {
                    output.push_str(" SYSTEM \"");
                    output.push_str(system_id);
                    output.push('"');
                }
                output.push('>');
            }
            NodeData::ProcessingInstruction { target, data } => {
                output.push_str("<?");
                output.push_str(tree.resolve(*target));
                if !data.is_empty() {
                    output.push(' ');
                    output.push_str(data);
                }
                output.push('>');
            }
        }
    }
}

/// Pending serialization work
enum Frame<'t> {
    Open(NodeId),
    Close(&'t str),
}

/// Open frames for the children of a node, last child first
fn child_frames(tree: &DomTree, parent_id: NodeId) -> Vec<Frame<'_>> {
    let mut frames: Vec<Frame<'_>> = tree
        .children(parent_id)
        .map(|(child_id, _)| Frame::Open(child_id))
        .collect();
    frames.reverse();
    frames
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}
