//! Node facades
//!
//! Lightweight, copyable views into the tree owned by a [`Soup`]. A facade
//! never outlives its document.

use std::fmt;

use soup_dom::{NodeData, NodeId, NodeKind};

use crate::classify::classify;
use crate::compile::Scope;
use crate::document::Soup;
use crate::error::{Result, SoupError};
use crate::filter::Filter;
use crate::result_set::ResultSet;
use crate::search;

/// Element facade
#[derive(Clone, Copy)]
pub struct Element<'d> {
    soup: &'d Soup,
    id: NodeId,
}

/// Text node facade
#[derive(Clone, Copy)]
pub struct TextNode<'d> {
    soup: &'d Soup,
    id: NodeId,
}

/// Comment facade
#[derive(Clone, Copy)]
pub struct CommentNode<'d> {
    soup: &'d Soup,
    id: NodeId,
}

/// Any node a search can return
#[derive(Clone, Copy, PartialEq)]
pub enum Node<'d> {
    Element(Element<'d>),
    Text(TextNode<'d>),
    Comment(CommentNode<'d>),
}

/// Parent of a node: an element, or the document itself
#[derive(Clone, Copy)]
pub enum Parent<'d> {
    Element(Element<'d>),
    Document(&'d Soup),
}

/// Value of a named property
#[derive(Debug, Clone, PartialEq)]
pub enum Property<'d> {
    Name(&'d str),
    /// `None` for the document
    Parent(Option<Parent<'d>>),
    Children(Vec<Node<'d>>),
    String(Option<Node<'d>>),
    Text(String),
    Attributes(Vec<(&'d str, &'d str)>),
    /// Result of the named-tag shorthand
    Found(Option<Node<'d>>),
}

impl<'d> Element<'d> {
    pub(crate) fn new(soup: &'d Soup, id: NodeId) -> Self {
        Self { soup, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'d Soup {
        self.soup
    }

    pub fn tag_name(&self) -> &'d str {
        self.soup.tree().tag_name(self.id).unwrap_or_default()
    }

    /// Attributes as name/value pairs, in source order
    pub fn attributes(&self) -> Vec<(&'d str, &'d str)> {
        let tree = self.soup.tree();
        tree.attributes(self.id)
            .iter()
            .map(|attr| (tree.resolve(attr.name), attr.value.as_str()))
            .collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'d str> {
        self.soup.tree().attribute(self.id, name)
    }

    pub fn parent(&self) -> Parent<'d> {
        parent_of(self.soup, self.id)
    }

    /// Element, text and comment children in document order
    pub fn children(&self) -> Vec<Node<'d>> {
        self.soup
            .tree()
            .children(self.id)
            .filter_map(|(child, _)| classify(self.soup, soup_xpath::XNode::Tree(child)).ok())
            .collect()
    }

    /// The only meaningful child, when it is a text or comment node
    ///
    /// Whitespace-only text does not count as a child here.
    pub fn own_string(&self) -> Option<Node<'d>> {
        let mut meaningful = self.children().into_iter().filter(|child| match child {
            Node::Text(text) => !text.content().trim().is_empty(),
            _ => true,
        });
        let only = meaningful.next()?;
        if meaningful.next().is_some() {
            return None;
        }
        match only {
            Node::Text(_) | Node::Comment(_) => Some(only),
            Node::Element(_) => None,
        }
    }

    /// Concatenated descendant text, trimmed
    pub fn own_text(&self) -> String {
        self.soup.tree().text_content(self.id).trim().to_string()
    }

    /// Outer HTML
    pub fn to_html(&self) -> String {
        soup_html::serialize(self.soup.tree(), self.id)
    }

    /// Inner HTML
    pub fn inner_html(&self) -> String {
        soup_html::HtmlSerializer::new().serialize_inner(self.soup.tree(), self.id)
    }

    /// First match below this element
    pub fn find(&self, filter: &Filter) -> Result<Option<Node<'d>>> {
        search::find(self.soup, Scope::Node(self.id), filter)
    }

    /// All matches below this element
    pub fn find_all(&self, filter: &Filter) -> Result<ResultSet<'d>> {
        search::find_all(self.soup, Scope::Node(self.id), filter)
    }

    /// Run a raw XPath query with this element as context node
    pub fn query(&self, xpath: &str) -> Result<ResultSet<'d>> {
        search::query(self.soup, Scope::Node(self.id), xpath)
    }

    /// Property access by name; unknown names find the first descendant
    /// with that tag
    pub fn property(&self, name: &str) -> Result<Property<'d>> {
        Ok(match name {
            "name" | "tag_name" => Property::Name(self.tag_name()),
            "parent" => Property::Parent(Some(self.parent())),
            "children" | "contents" => Property::Children(self.children()),
            "string" | "own_string" => Property::String(self.own_string()),
            "text" | "own_text" => Property::Text(self.own_text()),
            "attrs" | "attributes" => Property::Attributes(self.attributes()),
            tag => Property::Found(self.find(&Filter::tag(tag))?),
        })
    }
}

impl<'d> TextNode<'d> {
    pub(crate) fn new(soup: &'d Soup, id: NodeId) -> Self {
        Self { soup, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn content(&self) -> &'d str {
        self.soup
            .tree()
            .get(self.id)
            .and_then(|n| n.as_text())
            .unwrap_or_default()
    }

    pub fn parent(&self) -> Parent<'d> {
        parent_of(self.soup, self.id)
    }

    pub fn property(&self, name: &str) -> Result<Property<'d>> {
        leaf_property(Node::Text(*self), name)
    }
}

impl<'d> CommentNode<'d> {
    pub(crate) fn new(soup: &'d Soup, id: NodeId) -> Self {
        Self { soup, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn content(&self) -> &'d str {
        self.soup
            .tree()
            .get(self.id)
            .and_then(|n| n.as_comment())
            .unwrap_or_default()
    }

    pub fn parent(&self) -> Parent<'d> {
        parent_of(self.soup, self.id)
    }

    pub fn property(&self, name: &str) -> Result<Property<'d>> {
        leaf_property(Node::Comment(*self), name)
    }
}

fn parent_of(soup: &Soup, id: NodeId) -> Parent<'_> {
    let tree = soup.tree();
    match tree.parent(id) {
        Some(parent) if matches!(tree.get(parent).map(|n| &n.data), Some(NodeData::Element(_))) => {
            Parent::Element(Element::new(soup, parent))
        }
        _ => Parent::Document(soup),
    }
}

/// Properties of text and comment nodes
fn leaf_property<'d>(node: Node<'d>, name: &str) -> Result<Property<'d>> {
    match name {
        "parent" => Ok(Property::Parent(Some(node.parent()))),
        "string" => Ok(Property::String(Some(node))),
        "text" => Ok(Property::Text(node.own_text())),
        other => Err(node.unsupported(format!("property `{other}`"))),
    }
}

impl<'d> Node<'d> {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Element(e) => e.id,
            Node::Text(t) => t.id,
            Node::Comment(c) => c.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Element(_) => NodeKind::Element,
            Node::Text(_) => NodeKind::Text,
            Node::Comment(_) => NodeKind::Comment,
        }
    }

    pub fn as_element(&self) -> Option<Element<'d>> {
        match self {
            Node::Element(e) => Some(*e),
            _ => None,
        }
    }

    /// Text or comment content; `None` for elements
    pub fn content(&self) -> Option<&'d str> {
        match self {
            Node::Element(_) => None,
            Node::Text(t) => Some(t.content()),
            Node::Comment(c) => Some(c.content()),
        }
    }

    pub fn parent(&self) -> Parent<'d> {
        match self {
            Node::Element(e) => e.parent(),
            Node::Text(t) => t.parent(),
            Node::Comment(c) => c.parent(),
        }
    }

    /// The element's only string child, or the text/comment node itself
    pub fn own_string(&self) -> Option<Node<'d>> {
        match self {
            Node::Element(e) => e.own_string(),
            _ => Some(*self),
        }
    }

    pub fn own_text(&self) -> String {
        match self {
            Node::Element(e) => e.own_text(),
            Node::Text(t) => t.content().to_string(),
            Node::Comment(c) => c.content().to_string(),
        }
    }

    /// `own_string` content when there is one, `own_text` otherwise
    pub fn string_value(&self) -> String {
        match self.own_string().and_then(|s| s.content()) {
            Some(content) => content.to_string(),
            None => self.own_text(),
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Node::Element(e) => e.to_html(),
            Node::Text(t) => soup_html::serialize(t.soup.tree(), t.id),
            Node::Comment(c) => soup_html::serialize(c.soup.tree(), c.id),
        }
    }

    pub fn find(&self, filter: &Filter) -> Result<Option<Node<'d>>> {
        self.search_root("find")?.find(filter)
    }

    pub fn find_all(&self, filter: &Filter) -> Result<ResultSet<'d>> {
        self.search_root("find_all")?.find_all(filter)
    }

    pub fn query(&self, xpath: &str) -> Result<ResultSet<'d>> {
        self.search_root("query")?.query(xpath)
    }

    pub fn property(&self, name: &str) -> Result<Property<'d>> {
        match self {
            Node::Element(e) => e.property(name),
            _ => leaf_property(*self, name),
        }
    }

    fn search_root(&self, operation: &str) -> Result<Element<'d>> {
        self.as_element()
            .ok_or_else(|| self.unsupported(operation.to_string()))
    }

    fn unsupported(&self, operation: String) -> SoupError {
        SoupError::UnsupportedOperation {
            operation,
            node: self.kind().as_str(),
        }
    }
}

// ----------------------------------------------------------------------
// Identity, formatting
// ----------------------------------------------------------------------

macro_rules! facade_identity {
    ($($ty:ident),*) => {$(
        impl PartialEq for $ty<'_> {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self.soup, other.soup) && self.id == other.id
            }
        }

        impl Eq for $ty<'_> {}
    )*};
}

facade_identity!(Element, TextNode, CommentNode);

impl PartialEq for Parent<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Parent::Element(a), Parent::Element(b)) => a == b,
            (Parent::Document(a), Parent::Document(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("tag", &self.tag_name())
            .finish()
    }
}

impl fmt::Debug for TextNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextNode").field(&self.content()).finish()
    }
}

impl fmt::Debug for CommentNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommentNode").field(&self.content()).finish()
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(e) => e.fmt(f),
            Node::Text(t) => t.fmt(f),
            Node::Comment(c) => c.fmt(f),
        }
    }
}

impl fmt::Debug for Parent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parent::Element(e) => e.fmt(f),
            Parent::Document(_) => f.write_str("[document]"),
        }
    }
}

impl fmt::Display for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

impl fmt::Display for TextNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content())
    }
}

impl fmt::Display for CommentNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content())
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(e) => e.fmt(f),
            Node::Text(t) => t.fmt(f),
            Node::Comment(c) => c.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_basics() {
        let soup = Soup::new(r#"<p id="x" class="a b">Hello <b>world</b></p>"#);
        let p = soup.find(&Filter::tag("p")).expect("find").and_then(|n| n.as_element());
        let p = p.expect("p element");
        assert_eq!(p.tag_name(), "p");
        assert_eq!(p.attributes(), vec![("id", "x"), ("class", "a b")]);
        assert_eq!(p.attr("class"), Some("a b"));
        assert_eq!(p.attr("title"), None);
        assert_eq!(p.own_text(), "Hello world");
        assert_eq!(p.own_string(), None);
        assert_eq!(p.children().len(), 2);
        assert_eq!(p.to_html(), r#"<p id="x" class="a b">Hello <b>world</b></p>"#);
        assert_eq!(p.inner_html(), "Hello <b>world</b>");
    }

    #[test]
    fn test_own_string() {
        let soup = Soup::new("<a>foo</a><b><!--note--></b><i> </i>");
        let a = soup.find(&Filter::tag("a")).expect("find").expect("a");
        assert_eq!(a.own_string().and_then(|s| s.content()), Some("foo"));
        let b = soup.find(&Filter::tag("b")).expect("find").expect("b");
        let note = b.own_string().expect("comment child");
        assert_eq!(note.kind(), NodeKind::Comment);
        assert_eq!(note.content(), Some("note"));
    }

    #[test]
    fn test_parent_chain() {
        let soup = Soup::new("<p>hi</p>");
        let text = soup.find(&Filter::new().text("hi")).expect("find").expect("text");
        let Parent::Element(p) = text.parent() else {
            panic!("text parent should be an element");
        };
        assert_eq!(p.tag_name(), "p");
        let html = soup.root_element().expect("html");
        assert_eq!(html.parent(), Parent::Document(&soup));
    }

    #[test]
    fn test_text_node_restrictions() {
        let soup = Soup::new("<p>hi</p>");
        let text = soup.find(&Filter::new().text(true)).expect("find").expect("text");
        assert!(matches!(
            text.find_all(&Filter::new()),
            Err(SoupError::UnsupportedOperation { node: "text", .. })
        ));
        assert!(matches!(
            text.property("children"),
            Err(SoupError::UnsupportedOperation { .. })
        ));
        assert_eq!(text.property("text").expect("text"), Property::Text("hi".into()));
        assert_eq!(text.property("string").expect("string"), Property::String(Some(text)));
    }

    #[test]
    fn test_facade_identity() {
        let soup = Soup::new("<a>1</a>");
        let first = soup.find(&Filter::tag("a")).expect("find");
        let again = soup.find(&Filter::tag("a")).expect("find");
        assert_eq!(first, again);

        let other = Soup::new("<a>1</a>");
        let foreign = other.find(&Filter::tag("a")).expect("find");
        assert_ne!(first, foreign);
    }
}
