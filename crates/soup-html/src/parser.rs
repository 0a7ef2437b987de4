//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to the arena tree. The conversion
//! walks an explicit stack, so deeply nested markup cannot overflow the call
//! stack, and it creates nodes in document order.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use soup_dom::{DomTree, NodeId};

/// Parser options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep text nodes made only of whitespace
    pub keep_whitespace_text: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            keep_whitespace_text: true,
        }
    }
}

/// HTML5 parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    options: ParseOptions,
}

impl HtmlParser {
    /// Create a parser with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with explicit options
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parse an HTML string into a tree
    ///
    /// Fragments are completed the way browsers do it: `<html>`, `<head>`
    /// and `<body>` are implied when missing. Parsing never fails.
    pub fn parse(&self, html: &str) -> DomTree {
        tracing::debug!("Parsing HTML document ({} bytes)", html.len());

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut tree = DomTree::new();
        let root = tree.root();
        let mut stack: Vec<(Handle, NodeId)> = dom
            .document
            .children
            .borrow()
            .iter()
            .rev()
            .map(|child| (child.clone(), root))
            .collect();

        while let Some((handle, parent)) = stack.pop() {
            let Some(id) = self.convert_node(&handle, &mut tree) else {
                continue;
            };
            tree.append_child(parent, id);
            for child in handle.children.borrow().iter().rev() {
                stack.push((child.clone(), id));
            }
        }

        tracing::debug!("Parsed {} nodes", tree.len());
        tree
    }

    /// Create the arena counterpart of one RcDom node, `None` when skipped
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree) -> Option<NodeId> {
        match &handle.data {
            RcNodeData::Document => None,
            RcNodeData::Doctype {
                name,
                public_id,
                system_id,
            } => Some(tree.create_doctype(name, public_id, system_id)),
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if !self.options.keep_whitespace_text && text.chars().all(|c| c.is_ascii_whitespace()) {
                    tracing::trace!("Dropping whitespace-only text node");
                    return None;
                }
                Some(tree.create_text(&text))
            }
            RcNodeData::Comment { contents } => Some(tree.create_comment(contents)),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    tree.set_attribute(id, &attr.name.local, &attr.value);
                }
                Some(id)
            }
            RcNodeData::ProcessingInstruction { target, contents } => {
                Some(tree.create_processing_instruction(target, contents))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_names(tree: &DomTree) -> Vec<String> {
        tree.descendants(tree.root())
            .filter_map(|(id, _)| tree.tag_name(id).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let tree = HtmlParser::new().parse(html);
        assert_eq!(tag_names(&tree), vec!["html", "head", "title", "body", "p"]);
    }

    #[test]
    fn test_parse_fragment_is_wrapped() {
        let tree = HtmlParser::new().parse("<div><span>Text</span></div>");
        assert_eq!(tag_names(&tree), vec!["html", "head", "body", "div", "span"]);
    }

    fn text_count(tree: &DomTree) -> usize {
        tree.descendants(tree.root())
            .filter(|(_, n)| n.is_text())
            .count()
    }

    #[test]
    fn test_whitespace_text_kept_by_default() {
        let html = "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>";
        let tree = HtmlParser::new().parse(html);
        assert_eq!(text_count(&tree), 5);

        let dropped = HtmlParser::with_options(ParseOptions {
            keep_whitespace_text: false,
        })
        .parse(html);
        assert_eq!(text_count(&dropped), 2);
    }

    #[test]
    fn test_inline_word_breaks_survive() {
        let tree = HtmlParser::new().parse("<p><b>Hello</b> <i>world</i></p>");
        assert_eq!(tree.text_content(tree.root()), "Hello world");
    }
}
