//! Document facade

use std::fmt;

use soup_dom::{DomTree, NodeId};
use soup_html::HtmlParser;

use crate::classify::classify;
use crate::compile::Scope;
use crate::config::SoupConfig;
use crate::error::Result;
use crate::filter::Filter;
use crate::node::{Element, Node, Property};
use crate::result_set::ResultSet;
use crate::search;

/// A parsed document
///
/// Owns the tree; every facade and result set borrows from it.
#[derive(Debug)]
pub struct Soup {
    tree: DomTree,
    config: SoupConfig,
}

impl Soup {
    /// Parse markup with the default configuration
    pub fn new(markup: &str) -> Self {
        Self::with_config(markup, SoupConfig::default())
    }

    pub fn with_config(markup: &str, config: SoupConfig) -> Self {
        let tree = HtmlParser::with_options(config.parse_options()).parse(markup);
        tracing::debug!("Built document with {} nodes", tree.len());
        Self { tree, config }
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn config(&self) -> &SoupConfig {
        &self.config
    }

    /// First match in the document
    pub fn find(&self, filter: &Filter) -> Result<Option<Node<'_>>> {
        search::find(self, Scope::Document, filter)
    }

    /// All matches in the document
    pub fn find_all(&self, filter: &Filter) -> Result<ResultSet<'_>> {
        search::find_all(self, Scope::Document, filter)
    }

    /// Run a raw XPath query against the document
    pub fn query(&self, xpath: &str) -> Result<ResultSet<'_>> {
        search::query(self, Scope::Document, xpath)
    }

    /// Whole-document text, trimmed
    pub fn text(&self) -> String {
        self.tree.text_content(self.tree.root()).trim().to_string()
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        soup_html::serialize_document(&self.tree)
    }

    /// The document element (`<html>`)
    pub fn root_element(&self) -> Option<Element<'_>> {
        self.tree
            .children(self.tree.root())
            .find(|(_, node)| node.is_element())
            .map(|(id, _)| Element::new(self, id))
    }

    /// Facade for a node of this document
    pub fn node(&self, id: NodeId) -> Result<Node<'_>> {
        classify(self, soup_xpath::XNode::Tree(id))
    }

    /// Property access by name; unknown names find the first element with
    /// that tag
    pub fn property(&self, name: &str) -> Result<Property<'_>> {
        Ok(match name {
            "name" => Property::Name("[document]"),
            "parent" => Property::Parent(None),
            "string" => Property::String(None),
            "text" => Property::Text(self.text()),
            tag => Property::Found(self.find(&Filter::tag(tag))?),
        })
    }
}

impl fmt::Display for Soup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_whole_document() {
        let soup = Soup::new("<!DOCTYPE html>\n<p>Foo</p>");
        assert_eq!(
            soup.to_string(),
            "<!DOCTYPE html>\n<html><head></head><body><p>Foo</p></body></html>\n"
        );
    }

    #[test]
    fn test_document_properties() {
        let soup = Soup::new("<title> T </title><b>x</b>");
        assert_eq!(soup.property("name").expect("name"), Property::Name("[document]"));
        assert_eq!(soup.property("parent").expect("parent"), Property::Parent(None));
        assert_eq!(soup.property("text").expect("text"), Property::Text("T x".into()));
        let Property::Found(Some(b)) = soup.property("b").expect("b") else {
            panic!("expected a <b> element");
        };
        assert_eq!(b.own_text(), "x");
        assert_eq!(soup.property("table").expect("table"), Property::Found(None));
    }

    #[test]
    fn test_root_element() {
        let soup = Soup::new("<p>x</p>");
        let html = soup.root_element().expect("html");
        assert_eq!(html.tag_name(), "html");
        assert_eq!(soup.node(html.id()).expect("node"), Node::Element(html));
    }
}
