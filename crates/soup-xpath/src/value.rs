//! Values produced by evaluation

use soup_dom::{DomTree, NodeId};

/// A node as seen by the query engine
///
/// Attributes are not tree nodes in the arena, so they are addressed through
/// their owner element and their index in its attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XNode {
    Tree(NodeId),
    Attribute { owner: NodeId, index: usize },
}

impl XNode {
    /// The tree node itself, or the element owning the attribute
    pub fn node_id(self) -> NodeId {
        match self {
            XNode::Tree(id) => id,
            XNode::Attribute { owner, .. } => owner,
        }
    }

    pub fn is_attribute(self) -> bool {
        matches!(self, XNode::Attribute { .. })
    }

    /// Sort key in document order: an element comes before its attributes,
    /// which come before its children
    pub(crate) fn order_key(self, tree: &DomTree) -> (usize, usize) {
        match self {
            XNode::Tree(id) => (tree.document_position(id), 0),
            XNode::Attribute { owner, index } => (tree.document_position(owner), index + 1),
        }
    }
}

/// Sort a node list into document order and drop duplicates
pub(crate) fn sort_document_order(tree: &DomTree, nodes: &mut Vec<XNode>) {
    nodes.sort_by_cached_key(|n| n.order_key(tree));
    nodes.dedup();
}

/// The four XPath 1.0 value types
#[derive(Debug, Clone, PartialEq)]
pub enum XPathValue {
    /// Nodes in document order, without duplicates
    NodeSet(Vec<XNode>),
    Boolean(bool),
    Number(f64),
    String(String),
}

impl XPathValue {
    pub fn to_boolean(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::Boolean(b) => *b,
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::String(s) => !s.is_empty(),
        }
    }

    pub fn into_node_set(self) -> Option<Vec<XNode>> {
        match self {
            XPathValue::NodeSet(nodes) => Some(nodes),
            _ => None,
        }
    }
}

/// String value of a node
pub fn string_value(tree: &DomTree, node: XNode) -> String {
    match node {
        XNode::Tree(id) => tree.text_content(id),
        XNode::Attribute { owner, index } => tree
            .attributes(owner)
            .get(index)
            .map(|attr| attr.value.clone())
            .unwrap_or_default(),
    }
}

/// Format a number the XPath way: integers without a fraction, no exponent
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Parse a string as an XPath number: optional minus, digits with an
/// optional fraction, surrounding whitespace allowed; NaN otherwise
pub fn parse_number(s: &str) -> f64 {
    let s = s.trim_matches(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    let valid = all_digits(int_part)
        && frac_part.is_none_or(all_digits)
        && (!int_part.is_empty() || frac_part.is_some_and(|f| !f.is_empty()));
    if !valid {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

/// XPath whitespace normalization: trim and collapse runs of space, tab,
/// carriage return and line feed into one space
pub fn normalize_space(s: &str) -> String {
    s.split(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 42 "), 42.0);
        assert_eq!(parse_number("-1.5"), -1.5);
        assert_eq!(parse_number(".5"), 0.5);
        assert!(parse_number("1e3").is_nan());
        assert!(parse_number("+1").is_nan());
        assert!(parse_number("").is_nan());
        assert!(parse_number("inf").is_nan());
    }

    #[test]
    fn test_normalize_space() {
        assert_eq!(normalize_space("  a \n\t b  "), "a b");
        assert_eq!(normalize_space("\u{a0}x"), "\u{a0}x");
    }

    #[test]
    fn test_to_boolean() {
        assert!(!XPathValue::Number(f64::NAN).to_boolean());
        assert!(XPathValue::String("false".into()).to_boolean());
        assert!(!XPathValue::NodeSet(Vec::new()).to_boolean());
    }
}
