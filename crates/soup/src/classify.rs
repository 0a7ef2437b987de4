//! Node classification
//!
//! Runs compiled queries and wraps each raw result in its facade.

use soup_dom::NodeKind;
use soup_xpath::XNode;

use crate::compile::Scope;
use crate::document::Soup;
use crate::error::{Result, SoupError};
use crate::node::{CommentNode, Element, Node, TextNode};
use crate::result_set::ResultSet;

/// Wrap one engine result; only elements, text and comments have facades
pub(crate) fn classify(soup: &Soup, node: XNode) -> Result<Node<'_>> {
    let id = match node {
        XNode::Tree(id) => id,
        XNode::Attribute { .. } => return Err(SoupError::UnknownNodeKind { kind: "attribute" }),
    };
    let kind = soup
        .tree()
        .get(id)
        .map(|n| n.kind())
        .ok_or(SoupError::UnknownNodeKind { kind: "dangling" })?;
    match kind {
        NodeKind::Element => Ok(Node::Element(Element::new(soup, id))),
        NodeKind::Text => Ok(Node::Text(TextNode::new(soup, id))),
        NodeKind::Comment => Ok(Node::Comment(CommentNode::new(soup, id))),
        other => Err(SoupError::UnknownNodeKind {
            kind: other.as_str(),
        }),
    }
}

/// Run a query and classify every match, in document order
pub(crate) fn execute<'d>(soup: &'d Soup, query: &str, scope: Scope) -> Result<ResultSet<'d>> {
    let raw = soup_xpath::run_query(soup.tree(), query, scope.node())?;
    let nodes = raw
        .into_iter()
        .map(|node| classify(soup, node))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!("Query `{}` produced {} results", query, nodes.len());
    Ok(ResultSet::new(nodes))
}
