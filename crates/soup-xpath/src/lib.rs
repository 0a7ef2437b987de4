//! soup XPath Engine
//!
//! An XPath 1.0 evaluator over [`soup_dom::DomTree`], covering location
//! paths on all axes except `namespace`, predicates, unions, the operators
//! and the core string/boolean/number functions. Variables are not
//! supported.
//!
//! ```ignore
//! let tree = soup_html::parse("<p><a>x</a></p>");
//! let links = soup_xpath::run_query(&tree, "//a", None)?;
//! ```

mod ast;
mod error;
mod eval;
mod lexer;
mod parser;
mod value;

pub use ast::{Axis, BinaryOp, Expr, NodeTest, Step};
pub use error::{Result, XPathError};
pub use value::{format_number, normalize_space, parse_number, string_value, XNode, XPathValue};

use std::fmt;

use soup_dom::{DomTree, NodeId};

use crate::eval::Evaluator;

/// A compiled expression, reusable across trees and context nodes
#[derive(Debug, Clone, PartialEq)]
pub struct XPath {
    source: String,
    expr: Expr,
}

impl XPath {
    /// Parse an expression
    pub fn compile(source: &str) -> Result<Self> {
        let expr = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    /// Expression text as given to [`XPath::compile`]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parsed expression tree
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluate with `context` as the context node
    pub fn evaluate(&self, tree: &DomTree, context: NodeId) -> Result<XPathValue> {
        Evaluator::new(tree).evaluate(&self.expr, context)
    }

    /// Evaluate and require a node-set, returned in document order
    pub fn select(&self, tree: &DomTree, context: NodeId) -> Result<Vec<XNode>> {
        self.evaluate(tree, context)?
            .into_node_set()
            .ok_or(XPathError::NotANodeSet)
    }
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Compile and run a node-set query
///
/// `scope` is the context node; `None` means the document node.
pub fn run_query(tree: &DomTree, query: &str, scope: Option<NodeId>) -> Result<Vec<XNode>> {
    let nodes = XPath::compile(query)?.select(tree, scope.unwrap_or(tree.root()))?;
    tracing::debug!("XPath `{}` matched {} nodes", query, nodes.len());
    Ok(nodes)
}

/// Compile and evaluate an expression of any result type
pub fn evaluate(tree: &DomTree, query: &str, scope: Option<NodeId>) -> Result<XPathValue> {
    XPath::compile(query)?.evaluate(tree, scope.unwrap_or(tree.root()))
}
